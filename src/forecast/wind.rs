use serde::Serialize;

use crate::geodesy::normalize_deg;

/// Wind as eastward (`u`) and northward (`v`) components in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindVector {
    pub u: f64,
    pub v: f64,
}

impl WindVector {
    /// From a speed and a meteorological direction, i.e. where the wind blows from.
    pub fn from_speed_direction(speed: f64, direction_deg: f64) -> Self {
        let rad = direction_deg.to_radians();
        Self {
            u: -speed * rad.sin(),
            v: -speed * rad.cos(),
        }
    }

    pub fn speed(&self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Direction of travel, clockwise from north in [0, 360).
    pub fn heading_deg(&self) -> f64 {
        normalize_deg(self.u.atan2(self.v).to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn westerly_wind_travels_east() {
        let w = WindVector::from_speed_direction(10.0, 270.0);
        assert_relative_eq!(w.u, 10.0, epsilon = 1e-9);
        assert_relative_eq!(w.v, 0.0, epsilon = 1e-9);
        assert_relative_eq!(w.speed(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(w.heading_deg(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn heading_is_opposite_of_direction() {
        for direction in [0.0, 45.0, 135.0, 200.0, 330.0] {
            let w = WindVector::from_speed_direction(5.0, direction);
            let expected = (direction + 180.0) % 360.0;
            assert_relative_eq!(w.heading_deg(), expected, epsilon = 1e-9);
        }
    }
}
