pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A bare latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle (haversine) distance in kilometres.
pub fn distance_km(a: LatLon, b: LatLon) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial great-circle bearing from `a` to `b`, clockwise from north in [0, 360).
///
/// Coincident points yield an arbitrary value.
pub fn bearing_deg(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    normalize_deg(y.atan2(x).to_degrees())
}

/// Signed shortest-arc difference `a - b`, in (-180, 180].
pub fn smallest_angle_diff(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

pub fn normalize_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = LatLon::new(47.37, 8.54);
        let b = LatLon::new(-33.86, 151.21);
        assert_relative_eq!(distance_km(a, b), distance_km(b, a), epsilon = 1e-9);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance_km(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0));
        assert_relative_eq!(d, 111.195, epsilon = 1e-3);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = LatLon::new(0.0, 0.0);
        assert_relative_eq!(bearing_deg(origin, LatLon::new(1.0, 0.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(bearing_deg(origin, LatLon::new(0.0, 1.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(bearing_deg(origin, LatLon::new(-1.0, 0.0)), 180.0, epsilon = 1e-9);
        assert_relative_eq!(bearing_deg(origin, LatLon::new(0.0, -1.0)), 270.0, epsilon = 1e-9);
    }

    #[test]
    fn reverse_bearing_is_roughly_opposite() {
        let pairs = [
            (LatLon::new(10.0, 10.0), LatLon::new(10.5, 11.0)),
            (LatLon::new(-45.0, 170.0), LatLon::new(-44.8, 170.3)),
            (LatLon::new(60.0, -20.0), LatLon::new(59.9, -20.4)),
        ];
        for (a, b) in pairs {
            let forward = bearing_deg(a, b);
            let back = bearing_deg(b, a);
            assert!((0.0..360.0).contains(&forward));
            assert!((0.0..360.0).contains(&back));
            let diff = (forward - back).rem_euclid(360.0);
            assert!((diff - 180.0).abs() < 1.0, "diff was {diff}");
        }
    }

    #[test]
    fn angle_diff_wraps_the_short_way() {
        assert_relative_eq!(smallest_angle_diff(350.0, 10.0), -20.0);
        assert_relative_eq!(smallest_angle_diff(10.0, 350.0), 20.0);
        assert_relative_eq!(smallest_angle_diff(90.0, 90.0), 0.0);
        assert_relative_eq!(smallest_angle_diff(0.0, 180.0), 180.0);
        assert_relative_eq!(smallest_angle_diff(180.0, 0.0), 180.0);
    }
}
