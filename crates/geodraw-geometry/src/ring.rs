use crate::point::{distance, LatLng};

/// Equatorial Earth radius used by the spherical area approximation (meters).
///
/// Deliberately distinct from [`crate::MEAN_EARTH_RADIUS`]; stored areas depend
/// on this value.
pub const EQUATORIAL_EARTH_RADIUS: f64 = 6_378_137.0;

/// Sum of great-circle distances around the closed ring (meters)
pub fn perimeter(points: &[LatLng]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    closed_pairs(points).map(|(a, b)| distance(a, b)).sum()
}

/// Spherical approximation of the enclosed area (square meters)
pub fn area(points: &[LatLng]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let sum: f64 = closed_pairs(points)
        .map(|(a, b)| {
            let (x1, y1) = (a.lng.to_radians(), a.lat.to_radians());
            let (x2, y2) = (b.lng.to_radians(), b.lat.to_radians());
            (x2 - x1) * (2.0 + y1.sin() + y2.sin())
        })
        .sum();

    sum.abs() * EQUATORIAL_EARTH_RADIUS * EQUATORIAL_EARTH_RADIUS / 2.0
}

/// Arithmetic mean of the vertices; `None` for an empty ring
pub fn centroid(points: &[LatLng]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(LatLng::new(lat / n, lng / n))
}

/// Consecutive point pairs including the closing pair (last, first)
fn closed_pairs(points: &[LatLng]) -> impl Iterator<Item = (LatLng, LatLng)> + '_ {
    points
        .iter()
        .enumerate()
        .map(|(i, &a)| (a, points[(i + 1) % points.len()]))
}

/// Derived statistics cached on a polygon
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingStats {
    pub area: f64,
    pub perimeter: f64,
    pub vertices: usize,
}

impl RingStats {
    /// Stats for a polygon ring. Rings with fewer than three vertices have no
    /// area or perimeter.
    pub fn of(points: &[LatLng]) -> Self {
        if points.len() < 3 {
            return Self {
                area: 0.0,
                perimeter: 0.0,
                vertices: points.len(),
            };
        }
        Self {
            area: area(points),
            perimeter: perimeter(points),
            vertices: points.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn degenerate_rings_have_no_area() {
        let p = LatLng::new(1.0, 2.0);
        let q = LatLng::new(3.0, 4.0);
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[p]), 0.0);
        assert_eq!(area(&[p, q]), 0.0);
        assert_eq!(perimeter(&[]), 0.0);
        assert_eq!(perimeter(&[p]), 0.0);
    }

    #[test]
    fn two_points_walk_there_and_back() {
        let p = LatLng::new(0.0, 0.0);
        let q = LatLng::new(1.0, 0.0);
        assert!((perimeter(&[p, q]) - 2.0 * distance(p, q)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_square_at_equator() {
        let ring = square();
        // ~111.3 km on a side at the equator
        let a = area(&ring);
        assert!(a > 1.2e10 && a < 1.3e10, "area {a}");
        let p = perimeter(&ring);
        assert!(p > 4.4e5 && p < 4.5e5, "perimeter {p}");
    }

    #[test]
    fn winding_order_does_not_change_area() {
        let ring = square();
        let mut reversed = ring.clone();
        reversed.reverse();
        assert!((area(&ring) - area(&reversed)).abs() < 1e-3);
    }

    #[test]
    fn centroid_is_plain_average() {
        assert_eq!(centroid(&[]), None);
        assert_eq!(centroid(&square()), Some(LatLng::new(0.5, 0.5)));
    }

    #[test]
    fn stats_for_short_ring_keep_vertex_count() {
        let stats = RingStats::of(&square()[..2]);
        assert_eq!(stats, RingStats { area: 0.0, perimeter: 0.0, vertices: 2 });
    }

    fn regular_ring() -> impl Strategy<Value = Vec<LatLng>> {
        (-60.0f64..60.0, -170.0f64..170.0, 0.01f64..5.0, 3usize..12).prop_map(
            |(lat, lng, radius, n)| {
                (0..n)
                    .map(|i| {
                        let t = std::f64::consts::TAU * i as f64 / n as f64;
                        LatLng::new(lat + radius * t.sin(), lng + radius * t.cos())
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn convex_rings_have_positive_measures(ring in regular_ring()) {
            prop_assert!(area(&ring) > 0.0);
            prop_assert!(perimeter(&ring) > 0.0);
        }

        #[test]
        fn measures_ignore_starting_vertex(ring in regular_ring(), shift in 0usize..12) {
            let mut rotated = ring.clone();
            rotated.rotate_left(shift % ring.len());

            let (a, b) = (area(&ring), area(&rotated));
            prop_assert!((a - b).abs() <= a.abs() * 1e-9 + 1e-6);

            let (p, q) = (perimeter(&ring), perimeter(&rotated));
            prop_assert!((p - q).abs() <= p * 1e-9 + 1e-6);
        }
    }
}
