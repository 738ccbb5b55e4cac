//! Async driver for a [`TripOrchestrator`].
//!
//! The orchestrator is synchronous and performs no I/O. A session feeds it
//! user actions and map events, runs the requests it queues on a
//! [`JoinSet`], and hands each outcome back. Place searches wait out a
//! debounce period first; a newer search for the same field aborts the
//! pending one, as does committing or clearing the field. Everything still
//! outstanding is aborted on shutdown.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::bus::{MapEvent, Topic};
use crate::domain::{DepartureTime, Itinerary, Place};
use crate::geocode::{GeocodeError, PlaceProvider, ReverseProvider};
use crate::orchestrator::{Effect, PlanTicket, TripOrchestrator};
use crate::otp::{PlanError, TripPlanner};
use crate::reconcile::Side;
use crate::reverse::ReverseTicket;
use crate::search::SearchTicket;

/// Something the user did in the planner panel.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Focus(Side),
    Blur(Side),
    Type { side: Side, text: String },
    /// Pick the visible suggestion at an index.
    SelectSuggestion { side: Side, index: usize },
    /// Commit a place directly.
    SelectPlace { side: Side, place: Place },
    Clear(Side),
    Swap,
    SetDeparture(Option<DepartureTime>),
    DepartNow,
    SelectItinerary(usize),
    /// A click on a result card.
    ActivateItinerary(usize),
    OpenDetail,
    CloseDetail,
    ToggleLeg(usize),
}

/// A finished request.
#[derive(Debug)]
enum Completion {
    Search {
        side: Side,
        ticket: SearchTicket,
        outcome: Result<Vec<Place>, GeocodeError>,
    },
    Reverse {
        side: Side,
        ticket: ReverseTicket,
        outcome: Result<Option<Place>, GeocodeError>,
    },
    Plan {
        ticket: PlanTicket,
        outcome: Result<Vec<Itinerary>, PlanError>,
    },
}

/// One planner panel with its collaborators.
pub struct PlannerSession<P, R, T> {
    orchestrator: TripOrchestrator,
    places: Arc<P>,
    reverse: Arc<R>,
    planner: Arc<T>,
    tasks: JoinSet<Completion>,
    pending_search: [Option<AbortHandle>; 2],
}

impl<P, R, T> PlannerSession<P, R, T>
where
    P: PlaceProvider,
    R: ReverseProvider,
    T: TripPlanner,
{
    pub fn new(
        orchestrator: TripOrchestrator,
        places: Arc<P>,
        reverse: Arc<R>,
        planner: Arc<T>,
    ) -> Self {
        Self {
            orchestrator,
            places,
            reverse,
            planner,
            tasks: JoinSet::new(),
            pending_search: [None, None],
        }
    }

    pub fn orchestrator(&self) -> &TripOrchestrator {
        &self.orchestrator
    }

    /// Requests still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Apply a user action and start whatever requests it needs.
    pub fn apply(&mut self, action: UserAction) {
        debug!(?action, "user action");
        let o = &mut self.orchestrator;
        match action {
            UserAction::Focus(side) => o.focus(side),
            UserAction::Blur(side) => {
                o.blur(side);
            }
            UserAction::Type { side, text } => o.type_text(side, &text),
            UserAction::SelectSuggestion { side, index } => {
                o.select_suggestion_at(side, index);
            }
            UserAction::SelectPlace { side, place } => o.select_suggestion(side, &place),
            UserAction::Clear(side) => o.clear(side),
            UserAction::Swap => o.swap(),
            UserAction::SetDeparture(departure) => o.set_departure(departure),
            UserAction::DepartNow => o.depart_now(),
            UserAction::SelectItinerary(index) => {
                o.select_itinerary(index);
            }
            UserAction::ActivateItinerary(index) => {
                o.activate_itinerary(index);
            }
            UserAction::OpenDetail => {
                o.open_detail();
            }
            UserAction::CloseDetail => o.close_detail(),
            UserAction::ToggleLeg(index) => {
                o.toggle_leg(index);
            }
        }
        self.abort_settled_searches();
        self.spawn_effects();
    }

    /// Apply an event from the map or the panel navigation.
    pub fn handle_map_event(&mut self, event: &MapEvent) {
        self.orchestrator.handle_map_event(event);
        self.spawn_effects();
    }

    /// Wait for every outstanding request and apply the outcomes.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            self.on_joined(joined);
        }
    }

    /// Drive the session until `actions` closes, then abort outstanding
    /// work and hand back the orchestrator.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> TripOrchestrator {
        let (_subscription, mut map_events) = self.orchestrator.bus().channel(&[
            Topic::MarkerMoved,
            Topic::MapReady,
            Topic::PanelTabChanged,
        ]);

        info!("planner session started");
        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.apply(action),
                    None => break,
                },
                Some(event) = map_events.recv() => self.handle_map_event(&event),
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    self.on_joined(joined);
                }
            }
        }

        self.shutdown();
        self.orchestrator
    }

    /// Abort every outstanding request.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            info!(outstanding = self.tasks.len(), "aborting planner requests");
        }
        self.tasks.abort_all();
        self.pending_search = [None, None];
    }

    fn on_joined(&mut self, joined: Result<Completion, tokio::task::JoinError>) {
        match joined {
            Ok(completion) => self.complete(completion),
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!(error = %e, "planner request panicked"),
        }
    }

    fn complete(&mut self, completion: Completion) {
        let o = &mut self.orchestrator;
        match completion {
            Completion::Search {
                side,
                ticket,
                outcome,
            } => {
                self.pending_search[slot(side)] = None;
                o.complete_search(side, &ticket, outcome);
            }
            Completion::Reverse {
                side,
                ticket,
                outcome,
            } => {
                o.complete_reverse(side, &ticket, outcome);
            }
            Completion::Plan { ticket, outcome } => {
                o.complete_plan(&ticket, outcome);
            }
        }
        self.spawn_effects();
    }

    fn spawn_effects(&mut self) {
        for effect in self.orchestrator.take_effects() {
            match effect {
                Effect::Search { side, ticket } => self.spawn_search(side, ticket),
                Effect::Reverse { side, ticket } => {
                    let reverse = Arc::clone(&self.reverse);
                    self.tasks.spawn(async move {
                        let outcome = reverse.reverse(ticket.coordinate()).await;
                        Completion::Reverse {
                            side,
                            ticket,
                            outcome,
                        }
                    });
                }
                Effect::Plan(ticket) => {
                    let planner = Arc::clone(&self.planner);
                    self.tasks.spawn(async move {
                        let outcome = planner.plan(ticket.request()).await;
                        Completion::Plan { ticket, outcome }
                    });
                }
            }
        }
    }

    /// Drop debounced searches for fields that no longer wait on one.
    fn abort_settled_searches(&mut self) {
        for side in [Side::From, Side::To] {
            if self.orchestrator.endpoint(side).search().is_loading() {
                continue;
            }
            if let Some(pending) = self.pending_search[slot(side)].take() {
                debug!(?side, "aborting superseded search");
                pending.abort();
            }
        }
    }

    fn spawn_search(&mut self, side: Side, ticket: SearchTicket) {
        if let Some(pending) = self.pending_search[slot(side)].take() {
            pending.abort();
        }

        let places = Arc::clone(&self.places);
        let debounce = self.orchestrator.config().search_debounce;
        let handle = self.tasks.spawn(async move {
            tokio::time::sleep(debounce).await;
            let outcome = places.search(ticket.query()).await;
            Completion::Search {
                side,
                ticket,
                outcome,
            }
        });
        self.pending_search[slot(side)] = Some(handle);
    }
}

fn slot(side: Side) -> usize {
    match side {
        Side::From => 0,
        Side::To => 1,
    }
}
