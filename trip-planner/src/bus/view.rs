//! Map-side consumer of the bus.
//!
//! [`MapController`] turns bus events into calls on a [`MapSurface`], the
//! abstraction over the actual map widget. It owns the state that must
//! survive the widget not being ready yet or being hidden behind another
//! panel tab: the last route and the last endpoint coordinates.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{Bounds, Coordinate};
use crate::reconcile::Side;

use super::{
    MapBus, MapEvent, MarkerUpdate, PanelTab, RouteSegmentGeometry, Subscription, Topic,
    ViewportUpdate,
};

/// Padding around fitted bounds, in pixels.
pub const FIT_PADDING: u32 = 100;
/// Zoom range for fitted bounds.
pub const FIT_MIN_ZOOM: f64 = 10.0;
pub const FIT_MAX_ZOOM: f64 = 14.0;
/// Zoom when recentring on a single endpoint.
pub const FLY_TO_ZOOM: f64 = 15.0;

/// Options for [`MapSurface::fit_bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub padding: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: FIT_PADDING,
            min_zoom: FIT_MIN_ZOOM,
            max_zoom: FIT_MAX_ZOOM,
        }
    }
}

/// The drawing operations a map widget provides.
pub trait MapSurface {
    /// Place or move a draggable endpoint marker.
    fn set_endpoint_marker(&mut self, side: Side, coordinate: Coordinate);
    fn remove_endpoint_marker(&mut self, side: Side);
    /// Replace the route overlay.
    fn draw_route(&mut self, segments: &[RouteSegmentGeometry]);
    fn set_route_visible(&mut self, visible: bool);
    /// Replace the small markers at transit boarding and alighting points.
    fn set_stop_markers(&mut self, stops: &[Coordinate]);
    fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions);
    fn fly_to(&mut self, center: Coordinate, zoom: f64);
}

/// Applies bus events to a [`MapSurface`].
#[derive(Debug)]
pub struct MapController<S> {
    surface: S,
    ready: bool,
    trip_active: bool,
    route: Vec<RouteSegmentGeometry>,
    last_from: Option<Coordinate>,
    last_to: Option<Coordinate>,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            ready: false,
            trip_active: true,
            route: Vec::new(),
            last_from: None,
            last_to: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn last_coordinate(&self, side: Side) -> Option<Coordinate> {
        match side {
            Side::From => self.last_from,
            Side::To => self.last_to,
        }
    }

    fn last_mut(&mut self, side: Side) -> &mut Option<Coordinate> {
        match side {
            Side::From => &mut self.last_from,
            Side::To => &mut self.last_to,
        }
    }

    /// Apply one inbound event. Events the map itself emits are ignored.
    pub fn handle(&mut self, event: &MapEvent) {
        match event {
            MapEvent::RouteDraw(segments) => self.draw(segments.clone()),
            MapEvent::ViewportUpdate(update) => self.update_viewport(update),
            MapEvent::PanelTabChanged(tab) => self.change_tab(*tab),
            MapEvent::MarkerMoved { .. } | MapEvent::MapReady => {}
        }
    }

    /// The widget finished loading. Draws whatever arrived before.
    ///
    /// Returns the ready signal for the caller to publish.
    pub fn mark_ready(&mut self) -> MapEvent {
        self.ready = true;
        self.render_route();
        self.surface.set_route_visible(self.trip_active);
        if self.trip_active {
            self.show_markers();
        }
        MapEvent::MapReady
    }

    /// The user dropped an endpoint marker.
    ///
    /// Returns the event for the caller to publish.
    pub fn marker_dragged(&mut self, side: Side, coordinate: Coordinate) -> MapEvent {
        *self.last_mut(side) = Some(coordinate);
        MapEvent::MarkerMoved { side, coordinate }
    }

    fn draw(&mut self, segments: Vec<RouteSegmentGeometry>) {
        self.route = segments;
        self.render_route();
    }

    fn render_route(&mut self) {
        if !self.ready {
            return;
        }

        self.surface.draw_route(&self.route);

        let stops = if self.trip_active {
            stop_markers(&self.route)
        } else {
            Vec::new()
        };
        self.surface.set_stop_markers(&stops);
    }

    fn update_viewport(&mut self, update: &ViewportUpdate) {
        for side in [Side::From, Side::To] {
            match update.marker(side) {
                MarkerUpdate::Unchanged => {}
                MarkerUpdate::Remove => {
                    *self.last_mut(side) = None;
                    if self.ready {
                        self.surface.remove_endpoint_marker(side);
                    }
                }
                MarkerUpdate::Set(coordinate) => {
                    *self.last_mut(side) = Some(coordinate);
                    if !self.ready {
                        continue;
                    }
                    if self.trip_active {
                        self.surface.set_endpoint_marker(side, coordinate);
                    } else {
                        self.surface.remove_endpoint_marker(side);
                    }
                }
            }
        }

        if !self.ready {
            return;
        }

        match (self.last_from, self.last_to) {
            (Some(from), Some(to)) if update.fit_bounds => {
                self.surface
                    .fit_bounds(Bounds::spanning(from, to), FitOptions::default());
            }
            (Some(only), None) | (None, Some(only)) if update.fly_to => {
                self.surface.fly_to(only, FLY_TO_ZOOM);
            }
            _ => {}
        }
    }

    fn change_tab(&mut self, tab: PanelTab) {
        self.trip_active = tab == PanelTab::Trip;
        if !self.ready {
            return;
        }

        if self.trip_active {
            self.surface.set_route_visible(true);
            self.render_route();
            self.show_markers();
        } else {
            self.surface.remove_endpoint_marker(Side::From);
            self.surface.remove_endpoint_marker(Side::To);
            self.surface.set_route_visible(false);
            self.surface.set_stop_markers(&[]);
        }
    }

    fn show_markers(&mut self) {
        for side in [Side::From, Side::To] {
            if let Some(coordinate) = self.last_coordinate(side) {
                self.surface.set_endpoint_marker(side, coordinate);
            }
        }
    }
}

impl<S: MapSurface + Send + 'static> MapController<S> {
    /// Subscribe a shared controller to the planner-to-map topics.
    pub fn attach(controller: &Arc<Mutex<Self>>, bus: &MapBus) -> Subscription {
        let controller = Arc::clone(controller);
        bus.subscribe(
            &[Topic::RouteDraw, Topic::ViewportUpdate, Topic::PanelTabChanged],
            move |event| {
                controller
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle(event);
            },
        )
    }
}

/// Start and end points of transit segments, without duplicates.
fn stop_markers(segments: &[RouteSegmentGeometry]) -> Vec<Coordinate> {
    let mut seen = HashSet::new();
    let mut stops = Vec::new();

    for segment in segments.iter().filter(|s| !s.is_walk && !s.mode.is_green()) {
        for point in [segment.start, segment.end] {
            let key = (format!("{:.6}", point.lng), format!("{:.6}", point.lat));
            if seen.insert(key) {
                stops.push(point);
            }
        }
    }

    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HexColor, Mode};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetMarker(Side, Coordinate),
        RemoveMarker(Side),
        DrawRoute(usize),
        RouteVisible(bool),
        StopMarkers(Vec<Coordinate>),
        FitBounds(Bounds, FitOptions),
        FlyTo(Coordinate, f64),
    }

    #[derive(Debug, Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
    }

    impl MapSurface for RecordingSurface {
        fn set_endpoint_marker(&mut self, side: Side, coordinate: Coordinate) {
            self.calls.push(Call::SetMarker(side, coordinate));
        }
        fn remove_endpoint_marker(&mut self, side: Side) {
            self.calls.push(Call::RemoveMarker(side));
        }
        fn draw_route(&mut self, segments: &[RouteSegmentGeometry]) {
            self.calls.push(Call::DrawRoute(segments.len()));
        }
        fn set_route_visible(&mut self, visible: bool) {
            self.calls.push(Call::RouteVisible(visible));
        }
        fn set_stop_markers(&mut self, stops: &[Coordinate]) {
            self.calls.push(Call::StopMarkers(stops.to_vec()));
        }
        fn fit_bounds(&mut self, bounds: Bounds, options: FitOptions) {
            self.calls.push(Call::FitBounds(bounds, options));
        }
        fn fly_to(&mut self, center: Coordinate, zoom: f64) {
            self.calls.push(Call::FlyTo(center, zoom));
        }
    }

    const FROM: Coordinate = Coordinate {
        lng: 19.93,
        lat: 50.06,
    };
    const TO: Coordinate = Coordinate {
        lng: 19.96,
        lat: 50.08,
    };

    fn segment(mode: Mode, start: Coordinate, end: Coordinate) -> RouteSegmentGeometry {
        RouteSegmentGeometry {
            coordinates: vec![start, end],
            color: HexColor::parse("1976d2").unwrap(),
            is_walk: mode.is_green(),
            mode,
            start,
            end,
        }
    }

    fn ready_controller() -> MapController<RecordingSurface> {
        let mut controller = MapController::new(RecordingSurface::default());
        controller.mark_ready();
        controller.surface_mut().calls.clear();
        controller
    }

    #[test]
    fn caches_until_ready_then_replays() {
        let mut controller = MapController::new(RecordingSurface::default());
        let route = vec![segment(Mode::Tram, FROM, TO)];

        controller.handle(&MapEvent::RouteDraw(route));
        controller.handle(&MapEvent::ViewportUpdate(ViewportUpdate::markers(
            Some(FROM),
            Some(TO),
        )));
        assert!(controller.surface().calls.is_empty());

        assert_eq!(controller.mark_ready(), MapEvent::MapReady);
        assert_eq!(
            controller.surface().calls,
            vec![
                Call::DrawRoute(1),
                Call::StopMarkers(vec![FROM, TO]),
                Call::RouteVisible(true),
                Call::SetMarker(Side::From, FROM),
                Call::SetMarker(Side::To, TO),
            ]
        );
    }

    #[test]
    fn fit_bounds_needs_both_endpoints() {
        let mut controller = ready_controller();

        controller.handle(&MapEvent::ViewportUpdate(
            ViewportUpdate::side(Side::From, MarkerUpdate::Set(FROM)).with_fit_bounds(),
        ));
        assert!(!controller
            .surface()
            .calls
            .iter()
            .any(|c| matches!(c, Call::FitBounds(..))));

        controller.handle(&MapEvent::ViewportUpdate(
            ViewportUpdate::side(Side::To, MarkerUpdate::Set(TO)).with_fit_bounds(),
        ));
        assert_eq!(
            controller.surface().calls.last(),
            Some(&Call::FitBounds(
                Bounds::spanning(FROM, TO),
                FitOptions {
                    padding: 100,
                    min_zoom: 10.0,
                    max_zoom: 14.0
                }
            ))
        );
    }

    #[test]
    fn fly_to_needs_exactly_one_endpoint() {
        let mut controller = ready_controller();

        controller.handle(&MapEvent::ViewportUpdate(
            ViewportUpdate::side(Side::To, MarkerUpdate::Set(TO)).with_fly_to(),
        ));
        assert_eq!(controller.surface().calls.last(), Some(&Call::FlyTo(TO, 15.0)));

        controller.handle(&MapEvent::ViewportUpdate(
            ViewportUpdate::side(Side::From, MarkerUpdate::Set(FROM)).with_fly_to(),
        ));
        assert_eq!(
            controller.surface().calls.last(),
            Some(&Call::SetMarker(Side::From, FROM))
        );
    }

    #[test]
    fn remove_forgets_coordinate() {
        let mut controller = ready_controller();
        controller.handle(&MapEvent::ViewportUpdate(ViewportUpdate::markers(
            Some(FROM),
            Some(TO),
        )));
        controller.handle(&MapEvent::ViewportUpdate(ViewportUpdate::side(
            Side::From,
            MarkerUpdate::Remove,
        )));

        assert_eq!(controller.last_coordinate(Side::From), None);
        assert_eq!(controller.last_coordinate(Side::To), Some(TO));
        assert_eq!(
            controller.surface().calls.last(),
            Some(&Call::RemoveMarker(Side::From))
        );
    }

    #[test]
    fn other_tab_hides_and_trip_tab_restores() {
        let mut controller = ready_controller();
        controller.handle(&MapEvent::RouteDraw(vec![segment(Mode::Bus, FROM, TO)]));
        controller.handle(&MapEvent::ViewportUpdate(ViewportUpdate::markers(
            Some(FROM),
            None,
        )));
        controller.surface_mut().calls.clear();

        controller.handle(&MapEvent::PanelTabChanged(PanelTab::Stops));
        assert_eq!(
            controller.surface().calls,
            vec![
                Call::RemoveMarker(Side::From),
                Call::RemoveMarker(Side::To),
                Call::RouteVisible(false),
                Call::StopMarkers(vec![]),
            ]
        );

        // Marker updates while hidden are remembered but not shown.
        controller.surface_mut().calls.clear();
        controller.handle(&MapEvent::ViewportUpdate(ViewportUpdate::side(
            Side::To,
            MarkerUpdate::Set(TO),
        )));
        assert_eq!(
            controller.surface().calls,
            vec![Call::RemoveMarker(Side::To)]
        );

        controller.surface_mut().calls.clear();
        controller.handle(&MapEvent::PanelTabChanged(PanelTab::Trip));
        assert_eq!(
            controller.surface().calls,
            vec![
                Call::RouteVisible(true),
                Call::DrawRoute(1),
                Call::StopMarkers(vec![FROM, TO]),
                Call::SetMarker(Side::From, FROM),
                Call::SetMarker(Side::To, TO),
            ]
        );
    }

    #[test]
    fn empty_route_clears_overlay() {
        let mut controller = ready_controller();
        controller.handle(&MapEvent::RouteDraw(vec![segment(Mode::Tram, FROM, TO)]));
        controller.handle(&MapEvent::RouteDraw(vec![]));
        assert_eq!(
            &controller.surface().calls[2..],
            &[Call::DrawRoute(0), Call::StopMarkers(vec![])]
        );
    }

    #[test]
    fn stop_markers_skip_green_legs_and_duplicates() {
        let mid = Coordinate::new(19.95, 50.07);
        let segments = vec![
            segment(Mode::Walk, FROM, mid),
            segment(Mode::Tram, mid, TO),
            segment(Mode::Bus, TO, FROM),
            segment(Mode::Bicycle, FROM, TO),
        ];
        assert_eq!(stop_markers(&segments), vec![mid, TO, FROM]);
    }

    #[test]
    fn marker_drag_is_remembered_and_returned() {
        let mut controller = ready_controller();
        let event = controller.marker_dragged(Side::To, TO);
        assert_eq!(
            event,
            MapEvent::MarkerMoved {
                side: Side::To,
                coordinate: TO
            }
        );
        assert_eq!(controller.last_coordinate(Side::To), Some(TO));
    }

    #[test]
    fn attached_controller_follows_bus() {
        let bus = MapBus::new();
        let controller = Arc::new(Mutex::new(ready_controller()));
        let _sub = MapController::attach(&controller, &bus);

        bus.publish(MapEvent::ViewportUpdate(ViewportUpdate::markers(
            Some(FROM),
            None,
        )));

        let guard = controller.lock().unwrap();
        assert_eq!(guard.last_coordinate(Side::From), Some(FROM));
        assert!(guard.surface().calls.contains(&Call::SetMarker(Side::From, FROM)));
    }
}
