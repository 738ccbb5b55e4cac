//! Transport modes.

use std::fmt;

/// The transport mode of a leg.
///
/// Parsed case-insensitively from the planner's mode tag. Common aliases
/// collapse onto one variant; unknown tags are kept verbatim (uppercased)
/// so they can still be shown and drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Walk,
    Bicycle,
    BicycleRental,
    Scooter,
    Micromobility,
    MicromobilityRental,
    Bus,
    Trolleybus,
    Tram,
    Subway,
    Rail,
    Ferry,
    Gondola,
    CableCar,
    Funicular,
    Airplane,
    Car,
    Carpool,
    Other(String),
}

/// Icon category used when rendering a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeIcon {
    Walk,
    Bicycle,
    Scooter,
    Bus,
    Tram,
    Subway,
    Train,
    Boat,
    Airplane,
    Car,
}

impl Mode {
    /// Parse a mode tag such as `"TRAM"` or `"bicycle_rental"`.
    pub fn parse(tag: &str) -> Self {
        let upper = tag.trim().to_ascii_uppercase();
        match upper.as_str() {
            "WALK" => Mode::Walk,
            "BICYCLE" | "BIKE" => Mode::Bicycle,
            "BICYCLE_RENTAL" => Mode::BicycleRental,
            "SCOOTER" => Mode::Scooter,
            "MICROMOBILITY" => Mode::Micromobility,
            "MICROMOBILITY_RENTAL" => Mode::MicromobilityRental,
            "BUS" | "BUSISH" => Mode::Bus,
            "TROLLEYBUS" => Mode::Trolleybus,
            "TRAM" | "STREETCAR" => Mode::Tram,
            "SUBWAY" => Mode::Subway,
            "RAIL" | "RAILWAY" | "TRAIN" | "LONG_DISTANCE" => Mode::Rail,
            "FERRY" | "BOAT" => Mode::Ferry,
            "GONDOLA" => Mode::Gondola,
            "CABLE_CAR" => Mode::CableCar,
            "FUNICULAR" => Mode::Funicular,
            "AIRPLANE" | "AIR" | "PLANE" => Mode::Airplane,
            "CAR" => Mode::Car,
            "CARPOOL" => Mode::Carpool,
            _ => Mode::Other(upper),
        }
    }

    /// Returns the canonical uppercase tag.
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Walk => "WALK",
            Mode::Bicycle => "BICYCLE",
            Mode::BicycleRental => "BICYCLE_RENTAL",
            Mode::Scooter => "SCOOTER",
            Mode::Micromobility => "MICROMOBILITY",
            Mode::MicromobilityRental => "MICROMOBILITY_RENTAL",
            Mode::Bus => "BUS",
            Mode::Trolleybus => "TROLLEYBUS",
            Mode::Tram => "TRAM",
            Mode::Subway => "SUBWAY",
            Mode::Rail => "RAIL",
            Mode::Ferry => "FERRY",
            Mode::Gondola => "GONDOLA",
            Mode::CableCar => "CABLE_CAR",
            Mode::Funicular => "FUNICULAR",
            Mode::Airplane => "AIRPLANE",
            Mode::Car => "CAR",
            Mode::Carpool => "CARPOOL",
            Mode::Other(tag) => tag,
        }
    }

    /// Returns true for human-powered and first/last-mile modes.
    ///
    /// Green legs count towards walking totals, are drawn with the accent
    /// color on the map, and never count as transit.
    pub fn is_green(&self) -> bool {
        matches!(
            self,
            Mode::Walk
                | Mode::Bicycle
                | Mode::BicycleRental
                | Mode::Scooter
                | Mode::Micromobility
                | Mode::MicromobilityRental
        )
    }

    /// Returns true for every mode that is not green.
    pub fn is_transit(&self) -> bool {
        !self.is_green()
    }

    /// Returns the icon category for this mode.
    pub fn icon(&self) -> ModeIcon {
        match self {
            Mode::Walk | Mode::Other(_) => ModeIcon::Walk,
            Mode::Bicycle | Mode::BicycleRental | Mode::Micromobility => ModeIcon::Bicycle,
            Mode::MicromobilityRental | Mode::Scooter => ModeIcon::Scooter,
            Mode::Bus | Mode::Trolleybus => ModeIcon::Bus,
            Mode::Tram | Mode::CableCar | Mode::Funicular => ModeIcon::Tram,
            Mode::Subway => ModeIcon::Subway,
            Mode::Rail => ModeIcon::Train,
            Mode::Ferry | Mode::Gondola => ModeIcon::Boat,
            Mode::Airplane => ModeIcon::Airplane,
            Mode::Car | Mode::Carpool => ModeIcon::Car,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
