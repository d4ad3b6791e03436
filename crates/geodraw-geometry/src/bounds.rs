use crate::point::{destination, LatLng};

/// Axis-aligned lat/lng bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Bounding box of a set of points; `None` when empty
    pub fn of(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut south_west = *first;
        let mut north_east = *first;

        for p in &points[1..] {
            south_west.lat = south_west.lat.min(p.lat);
            south_west.lng = south_west.lng.min(p.lng);
            north_east.lat = north_east.lat.max(p.lat);
            north_east.lng = north_east.lng.max(p.lng);
        }

        Some(Self { south_west, north_east })
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

/// Bounding box of a circle: the center pushed `radius` meters along each
/// cardinal bearing
pub fn circle_bounds(center: LatLng, radius: f64) -> Bounds {
    let edges = [0.0, 90.0, 180.0, 270.0].map(|bearing| destination(center, bearing, radius));
    Bounds {
        south_west: LatLng::new(edges[2].lat, edges[3].lng),
        north_east: LatLng::new(edges[0].lat, edges[1].lng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_points() {
        assert!(Bounds::of(&[]).is_none());
        let b = Bounds::of(&[
            LatLng::new(1.0, 5.0),
            LatLng::new(-2.0, 7.0),
            LatLng::new(0.5, 6.0),
        ])
        .unwrap();
        assert_eq!(b.south_west, LatLng::new(-2.0, 5.0));
        assert_eq!(b.north_east, LatLng::new(1.0, 7.0));
        assert!(b.contains(LatLng::new(0.0, 6.0)));
    }

    #[test]
    fn circle_bounds_surround_center() {
        let center = LatLng::new(33.7, 73.0);
        let b = circle_bounds(center, 500.0);
        assert!(b.contains(center));
        assert!(b.north_east.lat > center.lat && b.south_west.lat < center.lat);
        assert!(b.north_east.lng > center.lng && b.south_west.lng < center.lng);
        assert!((b.center().lat - center.lat).abs() < 1e-6);
    }
}
