//! The trip-planning state machine.

use chrono::{FixedOffset, Local, Offset};
use tracing::{debug, info, warn};

use crate::bus::{MapBus, MapEvent, PanelTab, RouteSegmentGeometry, ViewportUpdate};
use crate::config::PlannerConfig;
use crate::domain::{Coordinate, DepartureTime, Itinerary, Place};
use crate::geocode::GeocodeError;
use crate::otp::{PlanEndpoint, PlanError, PlanRequest};
use crate::reconcile::{CoordinateReconciler, Endpoint, Side};
use crate::reverse::ReverseTicket;
use crate::search::SearchTicket;
use crate::timeline::{
    ExpandedLegs, ItineraryAlert, ItinerarySummary, Timeline, TimelineBuilder, detail_labels,
    itinerary_alerts,
};

use super::route::project_route;
use super::state::{Effect, Phase, PlanParams, PlanStatus, PlanTicket};

type Coordinates = (Option<Coordinate>, Option<Coordinate>);

/// Drives one trip-planning panel.
///
/// User actions and map events go in; state changes come out as bus
/// publications and queued [`Effect`]s. The orchestrator never performs
/// I/O itself: the caller drains [`take_effects`](Self::take_effects),
/// runs each request and hands the outcome back through the matching
/// `complete_*` method, which drops results for superseded tickets.
pub struct TripOrchestrator {
    config: PlannerConfig,
    timeline: TimelineBuilder,
    bus: MapBus,
    endpoints: CoordinateReconciler,
    departure: Option<DepartureTime>,

    itineraries: Vec<Itinerary>,
    status: PlanStatus,
    plan_seq: u64,
    /// Inputs of the current plan, requested or received.
    planned_for: Option<PlanParams>,

    selected: Option<usize>,
    detail_open: bool,
    expanded: ExpandedLegs,
    tab: PanelTab,
    last_route: Vec<RouteSegmentGeometry>,

    effects: Vec<Effect>,
}

impl TripOrchestrator {
    /// A planner publishing to `bus`, departing now.
    pub fn new(config: PlannerConfig, bus: MapBus) -> Self {
        let timeline = TimelineBuilder::new(config.theme.clone(), config.alert_filter.clone());
        Self {
            endpoints: CoordinateReconciler::new(config.min_query_len),
            timeline,
            bus,
            departure: Some(DepartureTime::now()),
            itineraries: Vec::new(),
            status: PlanStatus::Idle,
            plan_seq: 0,
            planned_for: None,
            selected: None,
            detail_open: false,
            expanded: ExpandedLegs::new(),
            tab: PanelTab::Trip,
            last_route: Vec::new(),
            effects: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn bus(&self) -> &MapBus {
        &self.bus
    }

    pub fn phase(&self) -> Phase {
        if self.plan_params().is_none() {
            Phase::Idle
        } else if self.selected.is_some() && self.detail_open {
            Phase::Detail
        } else if self.selected.is_some() {
            Phase::Selected
        } else if !self.itineraries.is_empty() {
            Phase::Planned
        } else {
            Phase::Ready
        }
    }

    pub fn endpoints(&self) -> &CoordinateReconciler {
        &self.endpoints
    }

    pub fn endpoint(&self, side: Side) -> &Endpoint {
        self.endpoints.endpoint(side)
    }

    pub fn display_text(&self, side: Side) -> String {
        self.endpoints.display_text(side)
    }

    /// Suggestions shown under a field.
    pub fn suggestions(&self, side: Side) -> &[Place] {
        self.endpoints
            .endpoint(side)
            .search()
            .visible(self.config.visible_suggestions)
    }

    pub fn departure(&self) -> Option<DepartureTime> {
        self.departure
    }

    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    pub fn status(&self) -> &PlanStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == PlanStatus::Loading
    }

    /// Inline message of a failed plan.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            PlanStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// "No route found" is shown only for a settled, empty list between two
    /// known points.
    pub fn show_empty_state(&self) -> bool {
        !self.is_loading() && self.itineraries.is_empty() && self.endpoints.coordinates().is_some()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_itinerary(&self) -> Option<&Itinerary> {
        self.itineraries.get(self.selected?)
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail_open && self.selected.is_some()
    }

    pub fn expanded_legs(&self) -> &ExpandedLegs {
        &self.expanded
    }

    pub fn tab(&self) -> PanelTab {
        self.tab
    }

    /// The route most recently published, replayed when the map is ready.
    pub fn last_route(&self) -> &[RouteSegmentGeometry] {
        &self.last_route
    }

    /// Offset used for displayed clock times.
    pub fn display_offset(&self) -> FixedOffset {
        self.config
            .utc_offset
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    /// One card per listed itinerary.
    pub fn summaries(&self) -> Vec<ItinerarySummary> {
        let offset = self.display_offset();
        self.itineraries
            .iter()
            .map(|itinerary| {
                ItinerarySummary::new(
                    itinerary,
                    self.timeline.theme(),
                    self.timeline.alert_filter(),
                    &offset,
                )
            })
            .collect()
    }

    /// Timeline of the selected itinerary while the detail view is open.
    pub fn timeline(&self) -> Option<Timeline<'_>> {
        if !self.detail_open {
            return None;
        }
        let itinerary = self.selected_itinerary()?;
        Some(self.timeline.build(itinerary, &self.expanded))
    }

    pub fn detail_alerts(&self) -> Vec<ItineraryAlert> {
        match self.selected_itinerary() {
            Some(itinerary) if self.detail_open => {
                itinerary_alerts(itinerary, self.timeline.alert_filter())
            }
            _ => Vec::new(),
        }
    }

    /// From/to header of the detail view.
    pub fn detail_labels(&self) -> Option<(String, String)> {
        if !self.detail_open {
            return None;
        }
        let itinerary = self.selected_itinerary()?;
        Some(detail_labels(
            itinerary,
            &self.endpoints.display_text(Side::From),
            &self.endpoints.display_text(Side::To),
        ))
    }

    /// Requests queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn focus(&mut self, side: Side) {
        self.endpoints.focus(side);
    }

    /// Returns true if the field is left without a coordinate.
    pub fn blur(&mut self, side: Side) -> bool {
        self.endpoints.blur(side)
    }

    pub fn type_text(&mut self, side: Side, text: &str) {
        let before = self.coordinates();
        if let Some(ticket) = self.endpoints.type_text(side, text) {
            self.effects.push(Effect::Search { side, ticket });
        }
        self.endpoints_changed(before);
    }

    /// Commit a suggestion. The camera fits both endpoints once both are
    /// known, otherwise it flies to the new one.
    pub fn select_suggestion(&mut self, side: Side, place: &Place) {
        let before = self.coordinates();
        if let Some(ticket) = self.endpoints.select_suggestion(side, place) {
            self.effects.push(Effect::Reverse { side, ticket });
        }

        let coordinates = self.coordinates();
        let viewport = ViewportUpdate::markers(coordinates.0, coordinates.1);
        let viewport = if self.endpoints.coordinates().is_some() {
            viewport.with_fit_bounds()
        } else {
            viewport.with_fly_to()
        };

        if coordinates != before {
            self.clear_selection();
        }
        self.bus.publish(MapEvent::ViewportUpdate(viewport));
        self.refresh_plan();
    }

    /// Commit the visible suggestion at `index`. Returns false if there is
    /// none.
    pub fn select_suggestion_at(&mut self, side: Side, index: usize) -> bool {
        let Some(place) = self.suggestions(side).get(index).cloned() else {
            return false;
        };
        self.select_suggestion(side, &place);
        true
    }

    pub fn clear(&mut self, side: Side) {
        let before = self.coordinates();
        self.endpoints.clear(side);
        self.endpoints_changed(before);
    }

    /// Exchange both endpoints. Addresses are looked up again only while
    /// the detail view is open.
    pub fn swap(&mut self) {
        let before = self.coordinates();
        let resolve = self.config.reverse_geocode.should_resolve(self.detail_open);
        for (side, ticket) in self.endpoints.swap(resolve) {
            self.effects.push(Effect::Reverse { side, ticket });
        }
        self.endpoints_changed(before);
    }

    /// Move an endpoint to where its marker was dropped.
    ///
    /// Any selection is discarded and a new plan is always requested, even
    /// for an unchanged position. The new position is resolved to an
    /// address only if the detail view was open.
    pub fn drag_marker(&mut self, side: Side, coordinate: Coordinate) {
        let resolve = self.config.reverse_geocode.should_resolve(self.detail_open);
        if let Some(ticket) = self.endpoints.drag_marker(side, coordinate, resolve) {
            self.effects.push(Effect::Reverse { side, ticket });
        }
        self.clear_selection();
        self.planned_for = None;
        self.refresh_plan();
    }

    /// Set or unset the earliest departure. `None` stops planning.
    pub fn set_departure(&mut self, departure: Option<DepartureTime>) {
        self.departure = departure;
        self.refresh_plan();
    }

    /// Set the departure from form fields. Unparsable input unsets it.
    pub fn set_departure_text(&mut self, date: &str, time: &str) {
        self.set_departure(DepartureTime::parse(date, time));
    }

    pub fn depart_now(&mut self) {
        self.set_departure(Some(DepartureTime::now()));
    }

    /// Select the itinerary at `index` and draw it. The detail view closes.
    pub fn select_itinerary(&mut self, index: usize) -> bool {
        if index >= self.itineraries.len() {
            return false;
        }
        if self.selected == Some(index) {
            return true;
        }

        debug!(index, "itinerary selected");
        self.selected = Some(index);
        self.detail_open = false;
        self.expanded.clear();
        self.publish_selected_route();
        true
    }

    /// A click on a result card. Clicking the selected card again opens
    /// its detail view.
    pub fn activate_itinerary(&mut self, index: usize) -> bool {
        if self.selected == Some(index) && !self.detail_open {
            return self.open_detail();
        }
        self.select_itinerary(index)
    }

    pub fn open_detail(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.detail_open = true;
        true
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
        self.expanded.clear();
    }

    /// Expand or collapse a leg's intermediate stops in the open detail
    /// view. Returns the new expansion state.
    pub fn toggle_leg(&mut self, leg_index: usize) -> bool {
        let leg_count = self
            .selected_itinerary()
            .map_or(0, |itinerary| itinerary.legs().len());
        if !self.detail_open || leg_index >= leg_count {
            return false;
        }
        self.expanded.toggle(leg_index)
    }

    /// React to an event from the map or the panel navigation.
    pub fn handle_map_event(&mut self, event: &MapEvent) {
        match event {
            MapEvent::MarkerMoved { side, coordinate } => self.drag_marker(*side, *coordinate),
            MapEvent::MapReady => {
                debug!("map ready, replaying state");
                self.publish_markers();
                self.bus
                    .publish(MapEvent::RouteDraw(self.last_route.clone()));
            }
            MapEvent::PanelTabChanged(tab) => {
                self.tab = *tab;
                if *tab == PanelTab::Trip {
                    self.publish_markers();
                }
            }
            MapEvent::RouteDraw(_) | MapEvent::ViewportUpdate(_) => {}
        }
    }

    /// Apply a place search outcome. Returns false if stale.
    pub fn complete_search(
        &mut self,
        side: Side,
        ticket: &SearchTicket,
        outcome: Result<Vec<Place>, GeocodeError>,
    ) -> bool {
        self.endpoints.complete_search(side, ticket, outcome)
    }

    /// Apply a reverse geocoding outcome. Returns false if stale.
    pub fn complete_reverse(
        &mut self,
        side: Side,
        ticket: &ReverseTicket,
        outcome: Result<Option<Place>, GeocodeError>,
    ) -> bool {
        self.endpoints.complete_reverse(side, ticket, outcome)
    }

    /// Apply a trip-planning outcome. Returns false if the ticket was
    /// superseded or its inputs no longer match.
    pub fn complete_plan(
        &mut self,
        ticket: &PlanTicket,
        outcome: Result<Vec<Itinerary>, PlanError>,
    ) -> bool {
        if ticket.seq != self.plan_seq || self.planned_for != Some(ticket.params) {
            debug!(
                ticket = ticket.seq,
                current = self.plan_seq,
                "discarding stale plan"
            );
            return false;
        }

        match outcome {
            Ok(mut itineraries) => {
                itineraries.truncate(self.config.max_itineraries);
                info!(count = itineraries.len(), "plan received");
                self.itineraries = itineraries;

                if self.itineraries.is_empty() {
                    self.status = PlanStatus::NoRoute;
                    self.clear_selection();
                } else {
                    self.status = PlanStatus::Found;
                    let in_range = self.selected.is_some_and(|i| i < self.itineraries.len());
                    if !in_range {
                        self.selected = None;
                        self.select_itinerary(0);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "trip planning failed");
                self.status = PlanStatus::Failed(e.to_string());
                self.itineraries.clear();
                // A later identical request is a retry, not a duplicate.
                self.planned_for = None;
                self.clear_selection();
            }
        }

        true
    }

    fn coordinates(&self) -> Coordinates {
        (
            self.endpoints.coordinate(Side::From),
            self.endpoints.coordinate(Side::To),
        )
    }

    fn plan_params(&self) -> Option<PlanParams> {
        let (from, to) = self.endpoints.coordinates()?;
        Some(PlanParams {
            from,
            to,
            departure: self.departure?,
        })
    }

    /// Drop the selection and move the markers if a coordinate changed.
    fn endpoints_changed(&mut self, before: Coordinates) {
        if self.coordinates() == before {
            return;
        }

        self.clear_selection();
        self.publish_markers();
        self.refresh_plan();
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.detail_open = false;
        self.expanded.clear();
        self.last_route.clear();
        self.bus.publish(MapEvent::RouteDraw(Vec::new()));
    }

    fn publish_selected_route(&mut self) {
        let route = self
            .selected_itinerary()
            .map(|itinerary| project_route(itinerary, self.timeline.theme()))
            .unwrap_or_default();
        self.last_route = route.clone();
        self.bus.publish(MapEvent::RouteDraw(route));
    }

    fn publish_markers(&self) {
        let (from, to) = self.coordinates();
        self.bus
            .publish(MapEvent::ViewportUpdate(ViewportUpdate::markers(from, to)));
    }

    fn format_departure(&self, departure: &DepartureTime) -> Option<String> {
        match &self.config.utc_offset {
            Some(offset) => departure.to_offset_string(offset),
            None => departure.to_local_offset_string(),
        }
    }

    /// Request a plan if the inputs differ from the current plan's.
    fn refresh_plan(&mut self) {
        let params = self.plan_params();
        if params.is_some() && params == self.planned_for {
            return;
        }

        // Supersede whatever is in flight.
        self.plan_seq += 1;
        self.itineraries.clear();
        if self.selected.is_some() || !self.last_route.is_empty() {
            self.clear_selection();
        }

        let Some(params) = params else {
            self.planned_for = None;
            self.status = PlanStatus::Idle;
            return;
        };

        let Some(earliest_departure) = self.format_departure(&params.departure) else {
            warn!(departure = ?params.departure, "departure time does not exist in this time zone");
            self.planned_for = None;
            self.status = PlanStatus::Idle;
            return;
        };

        let request = PlanRequest::new(
            PlanEndpoint::new(self.endpoints.display_text(Side::From), params.from),
            PlanEndpoint::new(self.endpoints.display_text(Side::To), params.to),
            earliest_departure,
        )
        .with_first(self.config.max_itineraries);

        info!(
            seq = self.plan_seq,
            from = %params.from,
            to = %params.to,
            departure = %request.earliest_departure,
            "requesting plan"
        );

        self.planned_for = Some(params);
        self.status = PlanStatus::Loading;
        self.effects.push(Effect::Plan(PlanTicket {
            seq: self.plan_seq,
            params,
            request,
        }));
    }
}

impl std::fmt::Debug for TripOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripOrchestrator")
            .field("phase", &self.phase())
            .field("status", &self.status)
            .field("itineraries", &self.itineraries.len())
            .field("selected", &self.selected)
            .field("pending_effects", &self.effects.len())
            .finish()
    }
}
