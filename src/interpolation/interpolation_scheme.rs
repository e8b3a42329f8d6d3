use num_enum::TryFromPrimitive;
use strum_macros::EnumIter;

use crate::error::{AceError, Result};

//=====================================================================
// Enum for possible interpolation schemes from ENDF standard.
//=====================================================================
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Hash, EnumIter, TryFromPrimitive)]
#[repr(i64)]
pub enum InterpolationScheme {
    Histogram = 1,
    LinLin = 2,
    LinLog = 3,
    LogLin = 4,
    LogLog = 5,
    Gamow = 6,
}

impl InterpolationScheme {
    // Convert a raw ENDF INT flag, as stored in the packed ACE arrays
    pub fn from_code(code: i64) -> Result<Self> {
        Self::try_from(code).map_err(|_| AceError::UnknownCode { what: "interpolation scheme", code })
    }

    // Interpolate between (x0, y0) and (x1, y1) at x
    #[inline]
    pub(crate) fn apply(&self, x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> Result<f64> {
        match self {
            InterpolationScheme::Histogram => Ok(y0),
            InterpolationScheme::LinLin => Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0)),
            InterpolationScheme::LinLog => Ok(y0 + (y1 - y0) * (x / x0).ln() / (x1 / x0).ln()),
            InterpolationScheme::LogLin => Ok(y0 * ((x - x0) * (y1 / y0).ln() / (x1 - x0)).exp()),
            InterpolationScheme::LogLog => Ok(y0 * ((x / x0).ln() * (y1 / y0).ln() / (x1 / x0).ln()).exp()),
            InterpolationScheme::Gamow => {
                Err(AceError::UnknownCode { what: "supported interpolation scheme", code: 6 })
            }
        }
    }
}

impl std::fmt::Display for InterpolationScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationScheme::Histogram => write!(f, "Histogram"),
            InterpolationScheme::LinLin => write!(f, "LinLin"),
            InterpolationScheme::LinLog => write!(f, "LinLog"),
            InterpolationScheme::LogLin => write!(f, "LogLin"),
            InterpolationScheme::LogLog => write!(f, "LogLog"),
            InterpolationScheme::Gamow => write!(f, "Gamow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(InterpolationScheme::from_code(1).unwrap(), InterpolationScheme::Histogram);
        assert_eq!(InterpolationScheme::from_code(5).unwrap(), InterpolationScheme::LogLog);
        assert_eq!(
            InterpolationScheme::from_code(7),
            Err(AceError::UnknownCode { what: "interpolation scheme", code: 7 })
        );
        assert!(InterpolationScheme::from_code(0).is_err());
    }

    #[test]
    fn test_display() {
        let names: Vec<String> = InterpolationScheme::iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Histogram", "LinLin", "LinLog", "LogLin", "LogLog", "Gamow"]);
    }

    #[test]
    fn test_gamow_is_rejected() {
        assert!(InterpolationScheme::Gamow.apply(1.5, 1.0, 2.0, 1.0, 2.0).is_err());
    }
}
