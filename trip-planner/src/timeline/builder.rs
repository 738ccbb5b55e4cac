//! Flattening an itinerary into timeline nodes.

use std::collections::BTreeSet;

use crate::domain::{
    AlertFilter, HexColor, Itinerary, Leg, StopTime, format_distance_compact, format_duration,
};

use super::{Connector, LegNode, StopNode, TimelineNode, TimelineStats, TimelineTheme};

/// Title of non-transit legs.
pub const WALK_TITLE: &str = "Walk";

/// Which legs of the detail view show their intermediate stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedLegs {
    legs: BTreeSet<usize>,
}

impl ExpandedLegs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, leg_index: usize) -> bool {
        self.legs.contains(&leg_index)
    }

    pub fn expand(&mut self, leg_index: usize) {
        self.legs.insert(leg_index);
    }

    pub fn collapse(&mut self, leg_index: usize) {
        self.legs.remove(&leg_index);
    }

    /// Flip one leg. Returns the new state.
    pub fn toggle(&mut self, leg_index: usize) -> bool {
        if self.legs.remove(&leg_index) {
            false
        } else {
            self.legs.insert(leg_index);
            true
        }
    }

    pub fn clear(&mut self) {
        self.legs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

impl FromIterator<usize> for ExpandedLegs {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            legs: iter.into_iter().collect(),
        }
    }
}

/// The detail view of one itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<'a> {
    pub nodes: Vec<TimelineNode<'a>>,
    pub stats: TimelineStats,
}

impl<'a> Timeline<'a> {
    pub fn stops(&self) -> impl Iterator<Item = &StopNode> {
        self.nodes.iter().filter_map(TimelineNode::as_stop)
    }

    pub fn legs(&self) -> impl Iterator<Item = &LegNode<'a>> {
        self.nodes.iter().filter_map(TimelineNode::as_leg)
    }

    /// The intermediate stops shown under a leg. Empty unless expanded.
    pub fn intermediate_stops(&self, leg_index: usize) -> &[TimelineNode<'a>] {
        let Some(start) = self
            .nodes
            .iter()
            .position(|n| n.as_leg().is_some_and(|l| l.leg_index == leg_index))
            .map(|i| i + 1)
        else {
            return &[];
        };

        let len = self.nodes[start..]
            .iter()
            .take_while(|n| n.as_stop().is_some_and(|s| s.is_intermediate))
            .count();
        &self.nodes[start..start + len]
    }
}

/// Builds [`Timeline`]s with a fixed theme and alert filter.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    theme: TimelineTheme,
    alerts: AlertFilter,
}

impl TimelineBuilder {
    pub fn new(theme: TimelineTheme, alerts: AlertFilter) -> Self {
        Self { theme, alerts }
    }

    pub fn theme(&self) -> &TimelineTheme {
        &self.theme
    }

    pub fn alert_filter(&self) -> &AlertFilter {
        &self.alerts
    }

    /// Flatten `itinerary` into alternating stop and leg nodes.
    ///
    /// Every leg contributes its origin stop and its leg node; an expanded
    /// transit leg is followed by its intermediate stops; the last leg's
    /// destination closes the sequence. Connector flags are positional: only
    /// the very first node has no line above and only the very last has no
    /// line below.
    pub fn build<'a>(&self, itinerary: &'a Itinerary, expanded: &ExpandedLegs) -> Timeline<'a> {
        let legs = itinerary.legs();
        let mut nodes = Vec::with_capacity(legs.len() * 2 + 1);
        let mut stats = TimelineStats::default();
        let mut previous_color = None;

        for (index, leg) in legs.iter().enumerate() {
            let segment_color = self.theme.segment_color(leg);

            nodes.push(TimelineNode::Stop(StopNode {
                label: leg.from.label().to_string(),
                stop_code: leg.from.stop_code.clone(),
                arrival: index.checked_sub(1).map(|i| legs[i].end_time),
                departure: Some(leg.start_time),
                is_first: index == 0,
                is_last: false,
                is_intermediate: false,
                connector: Connector {
                    top: false,
                    bottom: false,
                    top_color: previous_color
                        .take()
                        .unwrap_or_else(|| self.theme.connector_default.clone()),
                    bottom_color: segment_color.clone(),
                },
            }));

            let leg_node = self.leg_node(leg, index, expanded);
            let show_stops = leg_node.expanded;
            nodes.push(TimelineNode::Leg(leg_node));

            if show_stops {
                nodes.extend(leg.intermediate_stops.iter().map(|stop| {
                    TimelineNode::Stop(intermediate_stop(stop, &segment_color))
                }));
            }

            stats.add_leg(leg);
            previous_color = Some(segment_color);
        }

        let last = itinerary.last_leg();
        nodes.push(TimelineNode::Stop(StopNode {
            label: last.to.label().to_string(),
            stop_code: last.to.stop_code.clone(),
            arrival: Some(last.end_time),
            departure: None,
            is_first: false,
            is_last: true,
            is_intermediate: false,
            connector: Connector {
                top: false,
                bottom: false,
                top_color: previous_color.unwrap_or_else(|| self.theme.connector_default.clone()),
                bottom_color: self.theme.connector_default.clone(),
            },
        }));

        let count = nodes.len();
        for (i, node) in nodes.iter_mut().enumerate() {
            let connector = node.connector_mut();
            connector.top = i > 0;
            connector.bottom = i + 1 < count;
        }

        Timeline { nodes, stats }
    }

    fn leg_node<'a>(&self, leg: &'a Leg, index: usize, expanded: &ExpandedLegs) -> LegNode<'a> {
        let is_transit = leg.is_transit();
        let segment_color = self.theme.segment_color(leg);
        let route_label = leg.route_label().map(str::to_string);
        let duration_label = format_duration(leg.duration());
        let distance_label = leg.distance.map(format_distance_compact);

        let mut subtitle_lines = Vec::with_capacity(2);
        if is_transit {
            subtitle_lines.push(duration_label.clone());
        } else {
            subtitle_lines.push(format!("ok. {}", duration_label.replace("min", " min")));
        }
        subtitle_lines.extend(distance_label.clone());

        let title = if is_transit {
            route_label
                .clone()
                .unwrap_or_else(|| leg.mode.as_str().to_string())
        } else {
            WALK_TITLE.to_string()
        };

        let expandable = is_transit && !leg.intermediate_stops.is_empty();

        LegNode {
            leg,
            leg_index: index,
            title,
            subtitle_lines,
            route_label,
            headsign: leg.headsign.clone(),
            duration_label,
            distance_label,
            badge: self.theme.badge_colors(leg),
            alerts: self.alerts.visible(&leg.alerts),
            is_transit,
            expandable,
            expanded: expandable && expanded.is_expanded(index),
            connector: Connector {
                top: false,
                bottom: false,
                top_color: segment_color.clone(),
                bottom_color: segment_color,
            },
        }
    }
}

fn intermediate_stop(stop: &StopTime, color: &HexColor) -> StopNode {
    StopNode {
        label: stop.label().to_string(),
        stop_code: stop.stop_code.clone(),
        arrival: stop.arrival,
        departure: stop.departure,
        is_first: false,
        is_last: false,
        is_intermediate: true,
        connector: Connector {
            top: false,
            bottom: false,
            top_color: color.clone(),
            bottom_color: color.clone(),
        },
    }
}
