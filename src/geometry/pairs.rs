//! Vertex pair enumeration over a closed boundary.

/// Returns the adjacent pairs of a closed boundary.
///
/// The closing pair `(last, first)` comes first, followed by every
/// consecutive pair `(i, i + 1)` in order. A pair equal to one already
/// produced is not repeated. Fewer than two items produce no pairs.
///
/// ```
/// use roicoloc::geometry::adjacent_pairs;
///
/// let pairs = adjacent_pairs(&["P1", "P2", "P3"]);
/// assert_eq!(pairs, vec![("P3", "P1"), ("P1", "P2"), ("P2", "P3")]);
/// ```
pub fn adjacent_pairs<T: Clone + PartialEq>(items: &[T]) -> Vec<(T, T)> {
    if items.len() < 2 {
        return Vec::new();
    }

    let mut pairs = vec![(items[items.len() - 1].clone(), items[0].clone())];
    for window in items.windows(2) {
        let pair = (window[0].clone(), window[1].clone());
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}

/// Returns every unordered pair of distinct items that is not adjacent.
///
/// `(a, b)` and `(b, a)` count as the same pair both when testing adjacency
/// and when skipping pairs already produced. Pairs are emitted in the order
/// the outer item appears, then the inner item.
pub fn non_adjacent_pairs<T: Clone + PartialEq>(items: &[T]) -> Vec<(T, T)> {
    let adjacent = adjacent_pairs(items);
    let is_adjacent = |a: &T, b: &T| {
        adjacent
            .iter()
            .any(|(p, q)| (p == a && q == b) || (p == b && q == a))
    };

    let mut pairs: Vec<(T, T)> = Vec::new();
    for x in items {
        for y in items {
            if x == y || is_adjacent(x, y) {
                continue;
            }
            if pairs.iter().any(|(p, q)| p == y && q == x) {
                continue;
            }
            pairs.push((x.clone(), y.clone()));
        }
    }
    pairs
}
