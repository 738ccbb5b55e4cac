//! Displayed text of an endpoint field.

use crate::domain::Coordinate;

use super::CoordinateSource;

/// Text shown in an endpoint field.
///
/// Evaluated in a fixed order:
///
/// 1. A focused field shows its buffer verbatim.
/// 2. A non-empty buffer is shown.
/// 3. An address resolved for the current coordinate is shown.
/// 4. A dragged marker's coordinate is shown as `"lat, lng"`.
/// 5. Otherwise the field is empty.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::Coordinate;
/// use trip_planner::reconcile::{CoordinateSource, display_text};
///
/// let at = Coordinate::new(19.945, 50.0647);
/// let text = display_text(false, "", None, Some(at), CoordinateSource::MarkerDragged);
/// assert_eq!(text, "50.064700, 19.945000");
/// ```
pub fn display_text(
    focused: bool,
    buffer: &str,
    address: Option<&str>,
    coordinate: Option<Coordinate>,
    source: CoordinateSource,
) -> String {
    if focused || !buffer.is_empty() {
        return buffer.to_string();
    }

    if let Some(address) = address.filter(|a| !a.is_empty()) {
        return address.to_string();
    }

    match coordinate {
        Some(c) if source == CoordinateSource::MarkerDragged => c.display_label(),
        _ => String::new(),
    }
}
