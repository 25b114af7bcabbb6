//! Region model shared by matching and morphometry.
//!
//! Regions come from an upstream collaborator (a region manager export or a
//! region archive on disk) and are never mutated here. Closed boundaries are
//! turned into pixel sets on demand through [`RegionView`].
//!
//! # Example
//!
//! ```
//! use roicoloc::region::{Point, Region, RegionView};
//!
//! let square = Region::polygon(
//!     "M1",
//!     vec![Point::new(0, 0), Point::new(2, 0), Point::new(2, 2), Point::new(0, 2)],
//! );
//! assert_eq!(square.contained_points().len(), 4);
//! assert!(square.contains_point(Point::new(1, 1)));
//! ```

mod coord;
pub mod io_json;
mod label;
mod model;
pub mod raster;

pub use coord::{Coord, Point};
pub use label::Label;
pub use model::{Region, RegionCollection, RegionView, ShapeKind};
