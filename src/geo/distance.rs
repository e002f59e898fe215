// ============================================================================
// Great-Circle Distance
// Haversine distance and route length over WGS84 degrees
// ============================================================================

use super::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres (haversine).
///
/// Pure and O(1). Inputs are assumed to be valid degrees.
///
/// # Example
/// ```
/// use ride_pooling::geo::{distance_km, Coordinate};
///
/// let airport = Coordinate::new(28.5355, 77.391);
/// let city = Coordinate::new(28.6139, 77.209);
/// let d = distance_km(airport, city);
/// assert!(d > 19.0 && d < 21.0);
/// ```
#[inline]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lng1) = a.to_radians();
    let (lat2, lng2) = b.to_radians();
    let sin_dlat = ((lat2 - lat1) * 0.5).sin();
    let sin_dlng = ((lng2 - lng1) * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    // Rounding can push near-antipodal pairs just past 1
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Sum of consecutive pairwise distances along `points`.
///
/// Returns 0 for sequences of length 0 or 1.
pub fn route_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_km(pair[0], pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    const AIRPORT: Coordinate = Coordinate::new(28.5355, 77.391);
    const CONNAUGHT_PLACE: Coordinate = Coordinate::new(28.6139, 77.209);

    #[test]
    fn test_distance_is_positive_and_plausible() {
        let d = distance_km(AIRPORT, CONNAUGHT_PLACE);
        assert!(d > 0.0);
        assert!(d < 50.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_km(AIRPORT, AIRPORT), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2πR / 360
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.194_93).abs() < 1e-3);
    }

    #[test]
    fn test_antipodal_points_are_half_the_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        let pairs = [
            ((-82.0, -180.0), (82.0, 0.0)),
            ((0.0, 0.0), (0.0, 180.0)),
            ((90.0, 0.0), (-90.0, 0.0)),
            ((28.5355, 77.391), (-28.5355, -102.609)),
        ];
        for (a, b) in pairs {
            let d = distance_km(a.into(), b.into());
            assert!(d.is_finite(), "{a:?} -> {b:?} gave {d}");
            assert!((d - half).abs() < 1e-3, "{a:?} -> {b:?} gave {d}");
        }
    }

    #[test]
    fn test_integer_degree_antipodes_are_finite() {
        for lat in -90..=90 {
            for lng in (-180..=0).step_by(5) {
                let a = Coordinate::new(lat as f64, lng as f64);
                let b = Coordinate::new(-lat as f64, (lng + 180) as f64);
                assert!(distance_km(a, b).is_finite(), "{a:?} -> {b:?}");
            }
        }
    }

    #[test]
    fn test_route_length_short_sequences() {
        assert_eq!(route_length_km(&[]), 0.0);
        assert_eq!(route_length_km(&[AIRPORT]), 0.0);
    }

    #[test]
    fn test_route_length_sums_segments() {
        let mid = Coordinate::new(28.57, 77.30);
        let total = route_length_km(&[AIRPORT, mid, CONNAUGHT_PLACE]);
        let expected = distance_km(AIRPORT, mid) + distance_km(mid, CONNAUGHT_PLACE);
        assert!((total - expected).abs() < 1e-9);
        assert!(total >= distance_km(AIRPORT, CONNAUGHT_PLACE));
    }

    fn clamp_degrees(lat: f64, lng: f64) -> Option<Coordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Coordinate::new(lat % 90.0, lng % 180.0))
    }

    quickcheck! {
        fn prop_distance_is_symmetric(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> bool {
            match (clamp_degrees(lat1, lng1), clamp_degrees(lat2, lng2)) {
                (Some(a), Some(b)) => {
                    (distance_km(a, b) - distance_km(b, a)).abs() < 1e-9
                }
                _ => true,
            }
        }

        fn prop_distance_is_bounded(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> bool {
            match (clamp_degrees(lat1, lng1), clamp_degrees(lat2, lng2)) {
                (Some(a), Some(b)) => {
                    let d = distance_km(a, b);
                    d >= 0.0 && d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6
                }
                _ => true,
            }
        }

        fn prop_distance_to_antipode_is_finite(lat: f64, lng: f64) -> bool {
            match clamp_degrees(lat, lng) {
                Some(a) => {
                    let lng = if a.lng > 0.0 { a.lng - 180.0 } else { a.lng + 180.0 };
                    let antipode = Coordinate::new(-a.lat, lng);
                    let d = distance_km(a, antipode);
                    (d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-3
                }
                None => true,
            }
        }
    }
}
