//! Geographic geometry for geodraw.
//!
//! Pure functions over ordered rings of `LatLng` points in degrees. Rings are
//! implicitly closed: the last point connects back to the first, callers never
//! repeat the first point.

mod bounds;
mod label;
mod point;
mod ring;

pub use bounds::{circle_bounds, Bounds};
pub use label::{format_distance, format_radius};
pub use point::{destination, distance, LatLng, MEAN_EARTH_RADIUS};
pub use ring::{area, centroid, perimeter, RingStats, EQUATORIAL_EARTH_RADIUS};
