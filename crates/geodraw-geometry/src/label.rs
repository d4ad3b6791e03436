/// Measurement label: kilometers with two decimals above 1000 m, whole
/// meters otherwise
pub fn format_distance(meters: f64) -> String {
    if meters > 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

/// Radius label shown while sizing a circle
pub fn format_radius(meters: f64) -> String {
    format!("R: {}", format_distance(meters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.6), "1000 m");
        assert_eq!(format_distance(1000.0), "1000 m");
        assert_eq!(format_distance(1534.0), "1.53 km");
        assert_eq!(format_radius(12.4), "R: 12 m");
    }
}
