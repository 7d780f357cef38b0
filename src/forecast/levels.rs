use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Serialize, Serializer};

/// Isobaric forecast layers, in hPa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureLevel {
    Hpa850,
    Hpa700,
    Hpa500,
    Hpa300,
    Hpa250,
    Hpa200,
}

impl PressureLevel {
    pub fn hpa(self) -> u16 {
        match self {
            PressureLevel::Hpa850 => 850,
            PressureLevel::Hpa700 => 700,
            PressureLevel::Hpa500 => 500,
            PressureLevel::Hpa300 => 300,
            PressureLevel::Hpa250 => 250,
            PressureLevel::Hpa200 => 200,
        }
    }

    /// Layer for an altitude in km.
    pub fn for_altitude(alt_km: f64) -> Self {
        if alt_km < 3.0 {
            PressureLevel::Hpa850
        } else if alt_km < 6.0 {
            PressureLevel::Hpa700
        } else if alt_km < 9.0 {
            PressureLevel::Hpa500
        } else if alt_km < 12.0 {
            PressureLevel::Hpa300
        } else if alt_km < 15.0 {
            PressureLevel::Hpa250
        } else {
            PressureLevel::Hpa200
        }
    }
}

impl Serialize for PressureLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.hpa())
    }
}

/// Start of the UTC hour containing `t`.
pub fn round_hour_utc(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::hours(1)).unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn altitude_breakpoints() {
        let cases = [
            (0.0, 850),
            (2.99, 850),
            (3.0, 700),
            (8.9, 500),
            (9.0, 300),
            (12.0, 250),
            (14.99, 250),
            (15.0, 200),
            (35.0, 200),
        ];
        for (alt, hpa) in cases {
            assert_eq!(PressureLevel::for_altitude(alt).hpa(), hpa, "alt {alt}");
        }
    }

    #[test]
    fn truncates_to_hour() {
        let t = Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 59).unwrap();
        assert_eq!(
            round_hour_utc(t),
            Utc.with_ymd_and_hms(2025, 2, 28, 23, 0, 0).unwrap()
        );
    }
}
