//! Timeline node types.

use chrono::{DateTime, Utc};

use crate::domain::{Alert, HexColor, Leg};

use super::BadgeColors;

/// The vertical line joining a node to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    /// Draw the line above the node.
    pub top: bool,
    /// Draw the line below the node.
    pub bottom: bool,
    pub top_color: HexColor,
    pub bottom_color: HexColor,
}

/// A place on the timeline: a leg boundary or an intermediate stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopNode {
    pub label: String,
    pub stop_code: Option<String>,
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_intermediate: bool,
    pub connector: Connector,
}

/// One leg on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LegNode<'a> {
    pub leg: &'a Leg,
    /// Position of the leg within its itinerary.
    pub leg_index: usize,
    /// Route label for transit, `"Walk"` otherwise.
    pub title: String,
    /// Duration, then distance when known.
    pub subtitle_lines: Vec<String>,
    pub route_label: Option<String>,
    pub headsign: Option<String>,
    pub duration_label: String,
    pub distance_label: Option<String>,
    pub badge: BadgeColors,
    /// Alerts that passed the suppression filter.
    pub alerts: Vec<&'a Alert>,
    pub is_transit: bool,
    /// Transit with at least one intermediate stop.
    pub expandable: bool,
    /// Intermediate stops follow this node in the timeline.
    pub expanded: bool,
    pub connector: Connector,
}

/// An entry in the flattened timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineNode<'a> {
    Stop(StopNode),
    Leg(LegNode<'a>),
}

impl<'a> TimelineNode<'a> {
    pub fn connector(&self) -> &Connector {
        match self {
            TimelineNode::Stop(stop) => &stop.connector,
            TimelineNode::Leg(leg) => &leg.connector,
        }
    }

    pub(super) fn connector_mut(&mut self) -> &mut Connector {
        match self {
            TimelineNode::Stop(stop) => &mut stop.connector,
            TimelineNode::Leg(leg) => &mut leg.connector,
        }
    }

    pub fn as_stop(&self) -> Option<&StopNode> {
        match self {
            TimelineNode::Stop(stop) => Some(stop),
            TimelineNode::Leg(_) => None,
        }
    }

    pub fn as_leg(&self) -> Option<&LegNode<'a>> {
        match self {
            TimelineNode::Stop(_) => None,
            TimelineNode::Leg(leg) => Some(leg),
        }
    }
}
