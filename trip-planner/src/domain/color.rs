//! Hex color values from route metadata.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {reason}")]
pub struct InvalidHexColor {
    reason: &'static str,
}

/// A CSS hex color, always stored with a leading `#`.
///
/// Transit feeds publish route colors inconsistently (`"FF0000"`,
/// `"#ff0000"`, `" #F00 "`). This type guarantees that any `HexColor` is a
/// `#` followed by 3, 4, 6 or 8 hex digits.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::HexColor;
///
/// assert_eq!(HexColor::parse("E30613").unwrap().as_str(), "#E30613");
/// assert_eq!(HexColor::parse(" #fff ").unwrap().as_str(), "#fff");
///
/// assert!(HexColor::parse("").is_err());
/// assert!(HexColor::parse("#12345").is_err());
/// assert!(HexColor::parse("red").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color, adding the leading `#` when missing.
    pub fn parse(s: &str) -> Result<Self, InvalidHexColor> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidHexColor {
                reason: "must not be empty",
            });
        }

        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !matches!(digits.len(), 3 | 4 | 6 | 8) {
            return Err(InvalidHexColor {
                reason: "must have 3, 4, 6 or 8 digits",
            });
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidHexColor {
                reason: "must contain only hex digits",
            });
        }

        Ok(HexColor(format!("#{digits}")))
    }

    /// Parse an optional color, treating anything invalid as absent.
    pub fn normalize(s: Option<&str>) -> Option<Self> {
        s.and_then(|s| Self::parse(s).ok())
    }

    /// Wrap a literal that is already a valid `#`-prefixed color.
    pub(crate) fn from_static(s: &'static str) -> Self {
        debug_assert!(Self::parse(s).is_ok_and(|c| c.0 == s));
        HexColor(s.to_string())
    }

    /// Returns the color including its leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
