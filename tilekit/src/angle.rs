//! Sexagesimal (degree, minute, second) angles.

/// Convert a sexagesimal angle to decimal degrees.
pub fn to_decimal(degrees: i32, minutes: i32, seconds: f64) -> f64 {
    f64::from(degrees) + (f64::from(minutes) + seconds / 60.) / 60.
}

/// Decompose decimal degrees into (degrees, minutes, seconds).
///
/// The sign is carried by every non-zero component, matching the behavior
/// of `modf`: `-48.805639` becomes `(-48, -48, -20.3004)`.
pub fn to_sexagesimal(angle: f64) -> (i32, i32, f64) {
    let degrees = angle.trunc();
    let fraction = (angle - degrees) * 60.;
    let minutes = fraction.trunc();
    let seconds = (fraction - minutes) * 60.;

    (degrees as i32, minutes as i32, seconds)
}

/// Angle expressed as integer degrees, integer minutes and real seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SexagesimalAngle {
    degrees: i32,
    minutes: i32,
    seconds: f64,
}

impl SexagesimalAngle {
    /// Build from components. Out-of-range degrees or minutes yield the
    /// undefined angle (`seconds` is NaN) rather than an error, so a
    /// partially-typed angle in a UI form stays representable.
    pub fn new(degrees: i32, minutes: i32, seconds: f64) -> Self {
        if Self::is_valid_degrees(degrees) && Self::is_valid_minutes(minutes) {
            Self {
                degrees,
                minutes,
                seconds,
            }
        } else {
            Self::undefined()
        }
    }

    /// The undefined angle.
    pub fn undefined() -> Self {
        Self {
            degrees: 0,
            minutes: 0,
            seconds: f64::NAN,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.seconds.is_nan()
    }

    fn is_valid_degrees(degrees: i32) -> bool {
        (-180..=180).contains(&degrees)
    }

    fn is_valid_minutes(minutes: i32) -> bool {
        (0..60).contains(&minutes)
    }

    pub fn degrees(&self) -> i32 {
        self.degrees
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// The angle as decimal degrees.
    pub fn decimal(&self) -> f64 {
        to_decimal(self.degrees, self.minutes, self.seconds)
    }
}

impl From<f64> for SexagesimalAngle {
    fn from(angle: f64) -> Self {
        let (degrees, minutes, seconds) = to_sexagesimal(angle);
        Self {
            degrees,
            minutes,
            seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decimal_and_sexagesimal_are_inverse() {
        let angle = 48.805639;
        let (degrees, minutes, seconds) = to_sexagesimal(angle);
        assert_eq!((degrees, minutes), (48, 48));
        assert_relative_eq!(seconds, 20.3004, epsilon = 1e-6);
        assert_relative_eq!(to_decimal(degrees, minutes, seconds), angle);
    }

    #[test]
    fn negative_angle_carries_sign_in_all_components() {
        let (degrees, minutes, seconds) = to_sexagesimal(-48.805639);
        assert_eq!((degrees, minutes), (-48, -48));
        assert_relative_eq!(seconds, -20.3004, epsilon = 1e-6);
        assert_relative_eq!(to_decimal(degrees, minutes, seconds), -48.805639);
    }

    #[test]
    fn from_decimal_round_trips() {
        let angle = SexagesimalAngle::from(2.478917);
        assert!(angle.is_defined());
        assert_relative_eq!(angle.decimal(), 2.478917);
    }

    #[test]
    fn out_of_range_components_yield_undefined_angle() {
        assert!(!SexagesimalAngle::new(181, 0, 0.).is_defined());
        assert!(!SexagesimalAngle::new(0, 60, 0.).is_defined());
        assert!(!SexagesimalAngle::new(0, -1, 0.).is_defined());
        assert!(SexagesimalAngle::new(-180, 59, 59.9).is_defined());
    }
}
