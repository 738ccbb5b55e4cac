//! Places returned by geocoding and synthesized from raw coordinates.

use super::Coordinate;

/// A named location: either a geocoded place or a raw coordinate entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Primary name (for coordinate entries, the `"lat, lng"` text).
    pub name: String,
    /// Longer descriptive label, if the provider or parser supplies one.
    pub label: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// True for a suggestion synthesized from `"lat, lng"` text input.
    pub is_coordinate: bool,
    pub coordinate: Coordinate,
}

impl Place {
    /// A geocoded place with only a name.
    pub fn named(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            label: None,
            street: None,
            house_number: None,
            city: None,
            country: None,
            is_coordinate: false,
            coordinate,
        }
    }

    /// The synthetic suggestion for a coordinate typed as text.
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self {
            name: coordinate.display_label(),
            label: Some(format!(
                "Latitude {:.6}, Longitude {:.6}",
                coordinate.lat, coordinate.lng
            )),
            street: None,
            house_number: None,
            city: None,
            country: None,
            is_coordinate: true,
            coordinate,
        }
    }

    /// Join the available address fragments with `", "`.
    ///
    /// Fragments are: name; street and house number (or street alone);
    /// city; country. Missing or blank fragments are skipped. Returns `None`
    /// when nothing is left.
    pub fn address(&self) -> Option<String> {
        let street = match (non_blank(&self.street), non_blank(&self.house_number)) {
            (Some(street), Some(number)) => Some(format!("{street} {number}")),
            (Some(street), None) => Some(street.to_string()),
            (None, _) => None,
        };

        let parts: Vec<String> = [
            non_blank_str(&self.name).map(str::to_string),
            street,
            non_blank(&self.city).map(str::to_string),
            non_blank(&self.country).map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// The text placed into the input field when this place is selected.
    pub fn display_name(&self) -> String {
        if self.is_coordinate {
            if !self.name.is_empty() {
                return self.name.clone();
            }
            return self
                .label
                .clone()
                .unwrap_or_else(|| self.coordinate.display_label());
        }

        self.address().unwrap_or_else(|| self.name.clone())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().and_then(non_blank_str)
}

fn non_blank_str(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
