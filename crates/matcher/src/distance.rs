//! Great-circle distance on a spherical Earth.

/// Mean Earth radius used for all distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// ```text
/// a = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
/// d = 2R · atan2(√a, √(1−a))
/// ```
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for near-antipodal points.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_one_degree_along_equator() {
        assert_relative_eq!(
            haversine_km(0.0, 0.0, 0.0, 1.0),
            EARTH_RADIUS_KM * PI / 180.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_one_degree_along_meridian() {
        assert_relative_eq!(
            haversine_km(45.0, 10.0, 46.0, 10.0),
            EARTH_RADIUS_KM * PI / 180.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_pole_to_pole() {
        assert_relative_eq!(
            haversine_km(90.0, 0.0, -90.0, 0.0),
            EARTH_RADIUS_KM * PI,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_antimeridian_is_short() {
        // 179.9E to 179.9W is 0.2 degrees of longitude.
        let d = haversine_km(0.0, 179.9, 0.0, -179.9);
        assert_relative_eq!(d, 0.2 * EARTH_RADIUS_KM * PI / 180.0, epsilon = 1e-6);
    }

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(47.45, -122.31, 47.45, -122.31), 0.0);
    }
}
