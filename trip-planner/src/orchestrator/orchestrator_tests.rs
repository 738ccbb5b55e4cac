use std::sync::{Arc, Mutex};

use chrono::{Duration, FixedOffset};

use super::*;
use crate::bus::{MapBus, MapEvent, MarkerUpdate, PanelTab, Subscription, Topic, ViewportUpdate};
use crate::config::PlannerConfig;
use crate::domain::{
    Coordinate, DepartureTime, Itinerary, Leg, LegPlace, Mode, Place, StopTime, from_epoch_millis,
};
use crate::otp::PlanError;
use crate::reconcile::{CoordinateSource, Side};

const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

const WAWEL: Coordinate = Coordinate {
    lng: 19.9356,
    lat: 50.0540,
};
const RYNEK: Coordinate = Coordinate {
    lng: 19.9372,
    lat: 50.0617,
};
const NOWA_HUTA: Coordinate = Coordinate {
    lng: 20.0377,
    lat: 50.0716,
};
const DRAGGED: Coordinate = Coordinate {
    lng: 19.9123,
    lat: 50.0712,
};

struct Harness {
    planner: TripOrchestrator,
    events: Arc<Mutex<Vec<MapEvent>>>,
    _subscription: Subscription,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    fn with_config(config: PlannerConfig) -> Self {
        let bus = MapBus::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription = bus.subscribe(&Topic::ALL, move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let config = config.with_utc_offset(FixedOffset::east_opt(2 * 3600).unwrap());
        let mut planner = TripOrchestrator::new(config, bus);
        planner.set_departure(DepartureTime::parse("2024-06-01", "08:30"));

        Self {
            planner,
            events,
            _subscription: subscription,
        }
    }

    /// Both endpoints set; returns the plan ticket that was issued.
    fn planned() -> (Self, PlanTicket) {
        let mut h = Self::new();
        h.planner
            .select_suggestion(Side::From, &Place::named("Wawel", WAWEL));
        h.planner
            .select_suggestion(Side::To, &Place::named("Rynek", RYNEK));
        let ticket = h.plan_ticket();
        h.drain_events();
        (h, ticket)
    }

    /// Planned and answered with two itineraries.
    fn selected() -> Self {
        let (mut h, ticket) = Self::planned();
        assert!(
            h.planner
                .complete_plan(&ticket, Ok(vec![itinerary(0), itinerary(10)]))
        );
        h.drain_events();
        h
    }

    fn drain_events(&self) -> Vec<MapEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn plan_ticket(&mut self) -> PlanTicket {
        self.planner
            .take_effects()
            .into_iter()
            .rev()
            .find_map(|effect| match effect {
                Effect::Plan(ticket) => Some(ticket),
                _ => None,
            })
            .expect("a plan request")
    }

    fn reverse_sides(&mut self) -> Vec<Side> {
        self.planner
            .take_effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Reverse { side, .. } => Some(side),
                _ => None,
            })
            .collect()
    }
}

/// walk, tram with two intermediate stops, walk; starting `offset_min`
/// after 06:30 UTC.
fn itinerary(offset_min: i64) -> Itinerary {
    let t0 = from_epoch_millis(1_717_223_400_000).unwrap() + Duration::minutes(offset_min);
    let at = |min: i64| t0 + Duration::minutes(min);

    let mut walk_in = Leg::new(Mode::Walk, at(0), at(4));
    walk_in.geometry = Some(REFERENCE.into());
    walk_in.from = LegPlace {
        name: Some("Origin".into()),
        ..LegPlace::default()
    };

    let mut tram = Leg::new(Mode::Tram, at(5), at(15));
    tram.geometry = Some(REFERENCE.into());
    tram.intermediate_stops = vec![
        StopTime {
            name: Some("Stradom".into()),
            ..StopTime::default()
        },
        StopTime {
            name: Some("Poczta Główna".into()),
            ..StopTime::default()
        },
    ];

    let mut walk_out = Leg::new(Mode::Walk, at(15), at(18));
    walk_out.to = LegPlace {
        name: Some("Destination".into()),
        ..LegPlace::default()
    };

    Itinerary::new(vec![walk_in, tram, walk_out], None).unwrap()
}

fn is_empty_route(event: &MapEvent) -> bool {
    matches!(event, MapEvent::RouteDraw(segments) if segments.is_empty())
}

fn viewports(events: &[MapEvent]) -> Vec<ViewportUpdate> {
    events
        .iter()
        .filter_map(|event| match event {
            MapEvent::ViewportUpdate(update) => Some(*update),
            _ => None,
        })
        .collect()
}

#[test]
fn idle_until_both_endpoints_are_known() {
    let mut h = Harness::new();
    assert_eq!(h.planner.phase(), Phase::Idle);

    h.planner
        .select_suggestion(Side::From, &Place::named("Wawel", WAWEL));
    assert_eq!(h.planner.phase(), Phase::Idle);
    assert!(h.planner.take_effects().is_empty());

    h.planner
        .select_suggestion(Side::To, &Place::named("Rynek", RYNEK));
    assert_eq!(h.planner.phase(), Phase::Ready);
    assert!(h.planner.is_loading());

    let ticket = h.plan_ticket();
    let request = ticket.request();
    assert_eq!(request.origin.label.as_deref(), Some("Wawel"));
    assert_eq!(request.destination.coordinate, RYNEK);
    assert_eq!(request.earliest_departure, "2024-06-01T08:30:00+02:00");
    assert_eq!(request.first, 10);
}

#[test]
fn unchanged_inputs_request_only_once() {
    let (mut h, _ticket) = Harness::planned();
    h.planner
        .select_suggestion(Side::To, &Place::named("Rynek Główny", RYNEK));
    h.planner
        .set_departure(DepartureTime::parse("2024-06-01", "08:30"));
    assert!(h.planner.take_effects().is_empty());
}

#[test]
fn suggestion_camera_flies_then_fits() {
    let mut h = Harness::new();
    h.planner
        .select_suggestion(Side::From, &Place::named("Wawel", WAWEL));
    let first = viewports(&h.drain_events());
    assert_eq!(first.len(), 1);
    assert!(first[0].fly_to && !first[0].fit_bounds);
    assert_eq!(first[0].to, MarkerUpdate::Remove);

    h.planner
        .select_suggestion(Side::To, &Place::named("Rynek", RYNEK));
    let second = viewports(&h.drain_events());
    assert!(second[0].fit_bounds);
    assert_eq!(second[0].from, MarkerUpdate::Set(WAWEL));
    assert_eq!(second[0].to, MarkerUpdate::Set(RYNEK));
}

#[test]
fn first_itinerary_is_auto_selected_and_drawn() {
    let (mut h, ticket) = Harness::planned();
    assert!(
        h.planner
            .complete_plan(&ticket, Ok(vec![itinerary(0), itinerary(10)]))
    );

    assert_eq!(h.planner.phase(), Phase::Selected);
    assert_eq!(h.planner.selected_index(), Some(0));
    assert_eq!(h.planner.status(), &PlanStatus::Found);
    assert_eq!(h.planner.summaries().len(), 2);
    assert_eq!(h.planner.summaries()[0].time_range, "08:30 - 08:48");

    let events = h.drain_events();
    let drawn = events
        .iter()
        .find_map(|event| match event {
            MapEvent::RouteDraw(segments) => Some(segments.clone()),
            _ => None,
        })
        .unwrap();
    // The last walk has no geometry.
    assert_eq!(drawn.len(), 2);
    assert_eq!(h.planner.last_route(), drawn.as_slice());
}

#[test]
fn results_are_truncated() {
    let mut h = Harness::with_config(PlannerConfig::default().with_max_itineraries(2));
    h.planner
        .select_suggestion(Side::From, &Place::named("Wawel", WAWEL));
    h.planner
        .select_suggestion(Side::To, &Place::named("Rynek", RYNEK));
    let ticket = h.plan_ticket();
    assert_eq!(ticket.request().first, 2);

    let answer = vec![itinerary(0), itinerary(5), itinerary(10)];
    h.planner.complete_plan(&ticket, Ok(answer));
    assert_eq!(h.planner.itineraries().len(), 2);
}

#[test]
fn superseded_plan_never_overwrites_newer_one() {
    let (mut h, old) = Harness::planned();
    h.planner
        .select_suggestion(Side::To, &Place::named("Nowa Huta", NOWA_HUTA));
    let new = h.plan_ticket();
    assert!(new.seq() > old.seq());

    assert!(h.planner.complete_plan(&new, Ok(vec![itinerary(20)])));
    assert!(
        !h.planner
            .complete_plan(&old, Ok(vec![itinerary(0), itinerary(10)]))
    );

    assert_eq!(h.planner.itineraries(), &[itinerary(20)]);
    assert_eq!(h.planner.selected_index(), Some(0));
}

#[test]
fn stale_plan_arriving_first_is_discarded() {
    let (mut h, old) = Harness::planned();
    h.planner
        .select_suggestion(Side::To, &Place::named("Nowa Huta", NOWA_HUTA));
    let new = h.plan_ticket();

    assert!(!h.planner.complete_plan(&old, Ok(vec![itinerary(0)])));
    assert!(h.planner.is_loading());
    assert!(h.planner.itineraries().is_empty());

    assert!(h.planner.complete_plan(&new, Ok(vec![itinerary(20)])));
    assert_eq!(h.planner.itineraries(), &[itinerary(20)]);
}

#[test]
fn returning_to_earlier_inputs_issues_a_fresh_request() {
    let (mut h, first) = Harness::planned();
    h.planner
        .set_departure(DepartureTime::parse("2024-06-01", "09:00"));
    let _second = h.plan_ticket();
    h.planner
        .set_departure(DepartureTime::parse("2024-06-01", "08:30"));
    let third = h.plan_ticket();

    assert_eq!(first.params(), third.params());
    assert!(!h.planner.complete_plan(&first, Ok(vec![itinerary(0)])));
    assert!(h.planner.complete_plan(&third, Ok(vec![itinerary(0)])));
}

#[test]
fn clearing_an_endpoint_empties_list_and_map() {
    let mut h = Harness::selected();
    h.planner.clear(Side::From);

    assert!(h.planner.itineraries().is_empty());
    assert_eq!(h.planner.selected_index(), None);
    assert_eq!(h.planner.phase(), Phase::Idle);
    assert_eq!(h.planner.status(), &PlanStatus::Idle);

    let events = h.drain_events();
    assert!(events.iter().any(is_empty_route));
    let viewport = viewports(&events);
    assert_eq!(viewport.len(), 1);
    assert_eq!(viewport[0].from, MarkerUpdate::Remove);
    assert_eq!(viewport[0].to, MarkerUpdate::Set(RYNEK));
    assert!(!viewport[0].fit_bounds && !viewport[0].fly_to);
}

#[test]
fn typing_into_a_resolved_field_drops_the_plan() {
    let mut h = Harness::selected();
    h.planner.type_text(Side::To, "Kazimierz");

    let effects = h.planner.take_effects();
    assert!(matches!(
        effects.as_slice(),
        [Effect::Search { side: Side::To, ticket }] if ticket.query() == "Kazimierz"
    ));
    assert!(h.planner.itineraries().is_empty());

    let events = h.drain_events();
    assert!(events.iter().any(is_empty_route));
    assert_eq!(viewports(&events)[0].to, MarkerUpdate::Remove);
}

#[test]
fn a_pending_plan_is_dropped_when_an_endpoint_clears() {
    let (mut h, ticket) = Harness::planned();
    h.planner.clear(Side::To);
    assert!(!h.planner.complete_plan(&ticket, Ok(vec![itinerary(0)])));
    assert!(h.planner.itineraries().is_empty());
    assert!(!h.planner.is_loading());
}

#[test]
fn clicking_the_selected_card_again_opens_detail() {
    let mut h = Harness::selected();

    assert!(h.planner.activate_itinerary(0));
    assert_eq!(h.planner.phase(), Phase::Detail);
    assert!(h.drain_events().is_empty());

    let timeline = h.planner.timeline().unwrap();
    assert_eq!(timeline.stops().count(), 4);
    assert_eq!(timeline.legs().count(), 3);

    let (from, to) = h.planner.detail_labels().unwrap();
    assert_eq!((from.as_str(), to.as_str()), ("Wawel", "Rynek"));
}

#[test]
fn selecting_another_card_redraws_and_closes_detail() {
    let mut h = Harness::selected();
    h.planner.activate_itinerary(0);
    h.planner.activate_itinerary(0);
    assert!(h.planner.is_detail_open());

    assert!(h.planner.activate_itinerary(1));
    assert_eq!(h.planner.phase(), Phase::Selected);
    assert!(h.planner.timeline().is_none());

    let events = h.drain_events();
    assert!(matches!(
        events.as_slice(),
        [MapEvent::RouteDraw(segments)] if !segments.is_empty()
    ));
    assert!(!h.planner.select_itinerary(7));
}

#[test]
fn legs_expand_only_in_detail() {
    let mut h = Harness::selected();
    assert!(!h.planner.toggle_leg(1));

    h.planner.open_detail();
    assert!(h.planner.toggle_leg(1));
    let timeline = h.planner.timeline().unwrap();
    assert_eq!(timeline.intermediate_stops(1).len(), 2);
    assert!(!h.planner.toggle_leg(9));

    h.planner.close_detail();
    assert!(h.planner.expanded_legs().is_empty());
}

#[test]
fn drag_without_detail_keeps_coordinate_text() {
    let mut h = Harness::selected();
    h.planner.handle_map_event(&MapEvent::MarkerMoved {
        side: Side::From,
        coordinate: DRAGGED,
    });

    assert_eq!(h.planner.selected_index(), None);
    assert_eq!(h.planner.phase(), Phase::Ready);
    assert!(h.drain_events().iter().any(is_empty_route));

    let effects = h.planner.take_effects();
    assert!(
        !effects
            .iter()
            .any(|effect| matches!(effect, Effect::Reverse { .. }))
    );
    let ticket = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Plan(ticket) => Some(ticket),
            _ => None,
        })
        .unwrap();
    assert_eq!(ticket.params().from, DRAGGED);
    assert_eq!(h.planner.display_text(Side::From), "50.071200, 19.912300");
    assert_eq!(
        h.planner.endpoint(Side::From).source(),
        CoordinateSource::MarkerDragged
    );
}

#[test]
fn drag_to_the_same_spot_still_replans() {
    let mut h = Harness::selected();
    h.planner.handle_map_event(&MapEvent::MarkerMoved {
        side: Side::From,
        coordinate: WAWEL,
    });

    assert_eq!(h.planner.selected_index(), None);
    assert!(h.planner.itineraries().is_empty());
    assert!(h.planner.is_loading());
    assert_eq!(h.planner.phase(), Phase::Ready);

    let ticket = h.plan_ticket();
    assert_eq!(ticket.params().from, WAWEL);
    assert!(h.planner.complete_plan(&ticket, Ok(vec![itinerary(0)])));
    assert_eq!(h.planner.phase(), Phase::Selected);
}

#[test]
fn drag_with_detail_open_resolves_the_address() {
    let mut h = Harness::selected();
    h.planner.activate_itinerary(0);
    assert!(h.planner.is_detail_open());

    h.planner.drag_marker(Side::To, DRAGGED);
    assert!(!h.planner.is_detail_open());
    assert_eq!(h.reverse_sides(), vec![Side::To]);
}

#[test]
fn swap_resolves_only_with_detail_open() {
    let mut h = Harness::selected();
    h.planner.swap();
    assert!(h.reverse_sides().is_empty());
    assert_eq!(h.planner.display_text(Side::From), "Rynek");
    assert!(h.drain_events().iter().any(is_empty_route));

    let mut h = Harness::selected();
    h.planner.open_detail();
    h.planner.swap();
    assert_eq!(h.reverse_sides(), vec![Side::From, Side::To]);
}

#[test]
fn swap_replans_with_exchanged_coordinates() {
    let (mut h, _ticket) = Harness::planned();
    h.planner.swap();
    let ticket = h.plan_ticket();
    assert_eq!(ticket.params().from, RYNEK);
    assert_eq!(ticket.params().to, WAWEL);

    let viewport = viewports(&h.drain_events());
    assert_eq!(viewport[0].from, MarkerUpdate::Set(RYNEK));
    assert!(!viewport[0].fit_bounds);
}

#[test]
fn failed_plan_shows_error_and_stays_ready() {
    let (mut h, ticket) = Harness::planned();
    let failure = Err(PlanError::GraphQl("no transit data".into()));
    assert!(h.planner.complete_plan(&ticket, failure));

    assert_eq!(h.planner.phase(), Phase::Ready);
    assert_eq!(h.planner.error(), Some("planner error: no transit data"));
    assert!(h.planner.itineraries().is_empty());
    assert!(h.drain_events().iter().any(is_empty_route));

    // Re-selecting the same place retries.
    h.planner
        .select_suggestion(Side::To, &Place::named("Rynek", RYNEK));
    let retry = h.plan_ticket();
    assert_eq!(retry.params(), ticket.params());
    assert!(h.planner.error().is_none());
}

#[test]
fn empty_result_is_no_route_not_an_error() {
    let (mut h, ticket) = Harness::planned();
    assert!(!h.planner.show_empty_state());

    h.planner.complete_plan(&ticket, Ok(Vec::new()));
    assert_eq!(h.planner.status(), &PlanStatus::NoRoute);
    assert_eq!(h.planner.error(), None);
    assert_eq!(h.planner.phase(), Phase::Ready);
    assert!(h.planner.show_empty_state());
}

#[test]
fn missing_departure_stops_planning() {
    let (mut h, ticket) = Harness::planned();
    h.planner.set_departure_text("2024-13-01", "08:30");

    assert_eq!(h.planner.departure(), None);
    assert_eq!(h.planner.phase(), Phase::Idle);
    assert!(h.planner.take_effects().is_empty());
    assert!(!h.planner.complete_plan(&ticket, Ok(vec![itinerary(0)])));
}

#[test]
fn map_ready_replays_markers_and_route() {
    let mut h = Harness::selected();
    h.planner.handle_map_event(&MapEvent::MapReady);

    let events = h.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        MapEvent::ViewportUpdate(ViewportUpdate::markers(Some(WAWEL), Some(RYNEK)))
    );
    assert_eq!(
        events[1],
        MapEvent::RouteDraw(h.planner.last_route().to_vec())
    );
    assert!(!h.planner.last_route().is_empty());
}

#[test]
fn returning_to_trip_tab_republishes_markers() {
    let mut h = Harness::selected();
    h.planner
        .handle_map_event(&MapEvent::PanelTabChanged(PanelTab::Stops));
    assert_eq!(h.planner.tab(), PanelTab::Stops);
    assert!(h.drain_events().is_empty());

    h.planner
        .handle_map_event(&MapEvent::PanelTabChanged(PanelTab::Trip));
    let viewport = viewports(&h.drain_events());
    assert_eq!(viewport.len(), 1);
    assert_eq!(viewport[0].from, MarkerUpdate::Set(WAWEL));
    // Selection survives the tab switch.
    assert_eq!(h.planner.selected_index(), Some(0));
}

#[test]
fn stale_suggestions_do_not_reach_the_field() {
    let mut h = Harness::new();
    h.planner.focus(Side::From);
    h.planner.type_text(Side::From, "Waw");
    let first = match h.planner.take_effects().pop() {
        Some(Effect::Search { ticket, .. }) => ticket,
        other => panic!("expected a search, got {other:?}"),
    };
    h.planner.type_text(Side::From, "Wawel");
    let second = match h.planner.take_effects().pop() {
        Some(Effect::Search { ticket, .. }) => ticket,
        other => panic!("expected a search, got {other:?}"),
    };

    assert!(h.planner.complete_search(
        Side::From,
        &second,
        Ok(vec![Place::named("Wawel", WAWEL)])
    ));
    assert!(!h.planner.complete_search(
        Side::From,
        &first,
        Ok(vec![Place::named("Warszawa", RYNEK)])
    ));

    assert_eq!(h.planner.suggestions(Side::From).len(), 1);
    assert!(h.planner.select_suggestion_at(Side::From, 0));
    assert_eq!(h.planner.endpoint(Side::From).coordinate(), Some(WAWEL));
    assert!(!h.planner.select_suggestion_at(Side::From, 3));
}
