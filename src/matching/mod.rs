//! Region overlap matching.
//!
//! Two region collections are matched by spatial containment. Primary regions
//! are visited in a chosen order; each one claims every remaining secondary
//! region it overlaps, and a claimed secondary region leaves the pool.
//!
//! # Greedy claiming
//!
//! A secondary region that overlaps several primary regions goes to whichever
//! of them is visited first, and later ones do not see it. Every secondary
//! region therefore has at most one owner, and the outcome for such shared
//! regions depends on the visiting order, which is why [`MatchOrder`] is an
//! explicit argument.

mod correspondence;

pub use correspondence::{Correspondence, CorrespondenceView};

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use crate::error::RoiError;
use crate::region::{Label, Point, RegionCollection, RegionView};

/// Order in which primary regions are visited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchOrder {
    /// Collection order (the order the upstream tool produced them).
    #[default]
    Collection,
    /// Ascending normalized label.
    Label,
    /// An explicit permutation of primary collection indices.
    Explicit(Vec<usize>),
}

/// A region reduced to its normalized label and pixel set.
#[derive(Clone, Debug)]
struct PreparedRegion {
    label: Label,
    points: BTreeSet<Point>,
}

impl RegionView for PreparedRegion {
    fn label(&self) -> &str {
        self.label.as_str()
    }

    fn contained_points(&self) -> Cow<'_, BTreeSet<Point>> {
        Cow::Borrowed(&self.points)
    }

    fn contains_point(&self, p: Point) -> bool {
        self.points.contains(&p)
    }
}

/// Returns true if two regions share at least one pixel.
///
/// The region with more pixels acts as the container and the other one is
/// probed pixel by pixel; the scan stops at the first shared pixel.
pub fn regions_overlap<A: RegionView + ?Sized, B: RegionView + ?Sized>(a: &A, b: &B) -> bool {
    let a_points = a.contained_points();
    let b_points = b.contained_points();
    if a_points.len() >= b_points.len() {
        b_points.iter().any(|&p| a.contains_point(p))
    } else {
        a_points.iter().any(|&p| b.contains_point(p))
    }
}

/// Normalizes labels, rasterizes regions, and rejects label collisions.
fn prepare<R: RegionView>(
    collection: &str,
    regions: &[R],
) -> Result<Vec<PreparedRegion>, RoiError> {
    let mut seen: HashMap<Label, usize> = HashMap::new();
    let mut prepared = Vec::with_capacity(regions.len());

    for (idx, region) in regions.iter().enumerate() {
        let label = Label::normalize(region.label());
        if let Some(&first) = seen.get(&label) {
            return Err(RoiError::LabelCollision {
                collection: collection.to_string(),
                label: label.to_string(),
                first,
                second: idx,
            });
        }
        seen.insert(label.clone(), idx);
        prepared.push(PreparedRegion {
            label,
            points: region.contained_points().into_owned(),
        });
    }

    Ok(prepared)
}

/// Resolves a [`MatchOrder`] into a permutation of `0..prepared.len()`.
fn visiting_order(order: &MatchOrder, prepared: &[PreparedRegion]) -> Result<Vec<usize>, RoiError> {
    let n = prepared.len();
    match order {
        MatchOrder::Collection => Ok((0..n).collect()),
        MatchOrder::Label => {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.sort_by(|&a, &b| prepared[a].label.cmp(&prepared[b].label));
            Ok(indices)
        }
        MatchOrder::Explicit(indices) => {
            let mut seen = vec![false; n];
            for &i in indices {
                if i >= n {
                    return Err(RoiError::InvalidOrder {
                        reason: format!("index {} out of range for {} region(s)", i, n),
                    });
                }
                if std::mem::replace(&mut seen[i], true) {
                    return Err(RoiError::InvalidOrder {
                        reason: format!("index {} appears more than once", i),
                    });
                }
            }
            if indices.len() != n {
                return Err(RoiError::InvalidOrder {
                    reason: format!("expected {} indices, got {}", n, indices.len()),
                });
            }
            Ok(indices.clone())
        }
    }
}

/// Matches two collections, visiting primary regions in collection order.
///
/// # Errors
/// Returns [`RoiError::LabelCollision`] if two regions of the same collection
/// share a normalized label.
pub fn match_regions(
    primary: &RegionCollection,
    secondary: &RegionCollection,
) -> Result<Correspondence, RoiError> {
    match_regions_in_order(primary, secondary, &MatchOrder::Collection)
}

/// Matches two collections, visiting primary regions in the given order.
///
/// The inputs are left untouched; the secondary pool is a working copy that
/// shrinks as regions are claimed. The correspondence lists primary labels in
/// collection order regardless of the visiting order.
pub fn match_regions_in_order(
    primary: &RegionCollection,
    secondary: &RegionCollection,
    order: &MatchOrder,
) -> Result<Correspondence, RoiError> {
    let primary_regions = prepare(&primary.name, &primary.regions)?;
    let secondary_regions = prepare(&secondary.name, &secondary.regions)?;
    let order = visiting_order(order, &primary_regions)?;

    let secondary_labels: Vec<Label> = secondary_regions.iter().map(|r| r.label.clone()).collect();
    let mut claims: Vec<Vec<Label>> = vec![Vec::new(); primary_regions.len()];

    let mut pool = secondary_regions;
    for idx in order {
        let owner = &primary_regions[idx];
        let (claimed, remaining): (Vec<PreparedRegion>, Vec<PreparedRegion>) = pool
            .into_iter()
            .partition(|candidate| regions_overlap(owner, candidate));
        pool = remaining;

        log::debug!(
            "{} '{}' claimed {} region(s), {} left in pool",
            primary.name,
            owner.label,
            claimed.len(),
            pool.len()
        );
        claims[idx] = claimed.into_iter().map(|r| r.label).collect();
    }

    let correspondence = Correspondence::new(
        primary_regions
            .into_iter()
            .map(|r| r.label)
            .zip(claims)
            .collect(),
        secondary_labels,
    );
    log::info!(
        "matched {} {} region(s) against {} {} region(s): {} claimed",
        primary.len(),
        primary.name,
        secondary.len(),
        secondary.name,
        correspondence.claimed_count()
    );
    Ok(correspondence)
}
