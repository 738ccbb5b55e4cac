//! Raw coordinate text recognition.
//!
//! Users paste coordinates in many shapes: `"50.0647, 19.9450"`,
//! `"50.0647 19.9450"`, `"19.945;50.0647"`, or embedded in other text. The
//! first two adjacent numeric tokens are taken as a candidate pair and the
//! axis order is inferred from the valid ranges.

use crate::domain::{Coordinate, MAX_LATITUDE, MAX_LONGITUDE};

/// Parse a coordinate pair out of free text.
///
/// A numeric token is an optional minus sign, one to three integer digits,
/// and an optional fractional part. Tokens are separated by commas,
/// semicolons or whitespace.
///
/// Axis order: if exactly one ordering keeps latitude within ±90 and
/// longitude within ±180, that ordering is used. If both orderings are
/// valid, the text is read as latitude first. If neither is, there is no
/// coordinate.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::Coordinate;
/// use trip_planner::search::parse_coordinate_input;
///
/// assert_eq!(
///     parse_coordinate_input("50.0647, 19.9450"),
///     Some(Coordinate::new(19.945, 50.0647))
/// );
/// assert_eq!(
///     parse_coordinate_input("150.5 -33.9"),
///     Some(Coordinate::new(150.5, -33.9))
/// );
/// assert_eq!(parse_coordinate_input("200, 19.9450"), None);
/// assert_eq!(parse_coordinate_input("Rynek Główny"), None);
/// ```
pub fn parse_coordinate_input(input: &str) -> Option<Coordinate> {
    let tokens: Vec<&str> = input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let (first, second) = tokens.windows(2).find_map(|pair| {
        let first = parse_numeric_token(pair[0])?;
        let second = parse_numeric_token(pair[1])?;
        Some((first, second))
    })?;

    let first_looks_lat = within_lat(first) && within_lng(second);
    let first_looks_lng = within_lng(first) && within_lat(second);

    let (lat, lng) = match (first_looks_lat, first_looks_lng) {
        (true, _) => (first, second),
        (false, true) => (second, first),
        (false, false) => return None,
    };

    Some(Coordinate::new(lng, lat))
}

fn within_lat(value: f64) -> bool {
    value.abs() <= MAX_LATITUDE
}

fn within_lng(value: f64) -> bool {
    value.abs() <= MAX_LONGITUDE
}

/// Parse `-?\d{1,3}(\.\d+)?`.
fn parse_numeric_token(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if int_part.is_empty() || int_part.len() > 3 || !all_digits(int_part) {
        return None;
    }
    if frac_part.is_some_and(|frac| frac.is_empty() || !all_digits(frac)) {
        return None;
    }

    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lat_first_when_ambiguous() {
        assert_eq!(
            parse_coordinate_input("50.0647, 19.9450"),
            Some(Coordinate::new(19.945, 50.0647))
        );
        assert_eq!(
            parse_coordinate_input("19.9450, 50.0647"),
            Some(Coordinate::new(50.0647, 19.945))
        );
    }

    #[test]
    fn lng_first_when_only_valid_order() {
        assert_eq!(
            parse_coordinate_input("-122.4194, 37.7749"),
            Some(Coordinate::new(-122.4194, 37.7749))
        );
    }

    #[test]
    fn neither_order_valid() {
        assert_eq!(parse_coordinate_input("200, 19.9450"), None);
        assert_eq!(parse_coordinate_input("95, 95.5"), None);
        assert_eq!(parse_coordinate_input("181, 181"), None);
    }

    #[test]
    fn separators() {
        let expected = Some(Coordinate::new(19.945, 50.0647));
        assert_eq!(parse_coordinate_input("50.0647 19.945"), expected);
        assert_eq!(parse_coordinate_input("50.0647;19.945"), expected);
        assert_eq!(parse_coordinate_input("  50.0647 ,  19.945  "), expected);
        assert_eq!(parse_coordinate_input("50.0647,,19.945"), expected);
        assert_eq!(parse_coordinate_input("50.0647\t19.945"), expected);
    }

    #[test]
    fn embedded_in_text() {
        assert_eq!(
            parse_coordinate_input("pin at 50.0647, 19.945 please"),
            Some(Coordinate::new(19.945, 50.0647))
        );
    }

    #[test]
    fn integers_are_accepted() {
        assert_eq!(
            parse_coordinate_input("50, 20"),
            Some(Coordinate::new(20.0, 50.0))
        );
    }

    #[test]
    fn malformed_tokens() {
        assert_eq!(parse_coordinate_input(""), None);
        assert_eq!(parse_coordinate_input("50.0647"), None);
        assert_eq!(parse_coordinate_input("1234.5, 19.9"), None);
        assert_eq!(parse_coordinate_input("50., 19.9"), None);
        assert_eq!(parse_coordinate_input(".5, 19.9"), None);
        assert_eq!(parse_coordinate_input("--50, 19.9"), None);
        assert_eq!(parse_coordinate_input("1e2, 19.9"), None);
    }

    #[test]
    fn short_input_still_parses() {
        assert_eq!(parse_coordinate_input("1 2"), Some(Coordinate::new(2.0, 1.0)));
    }
}
