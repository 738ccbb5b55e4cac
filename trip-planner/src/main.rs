use std::process::ExitCode;
use std::sync::Arc;

use chrono::{FixedOffset, Local};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trip_planner::bus::MapBus;
use trip_planner::config::{PlannerConfig, ServiceConfig};
use trip_planner::domain::{DepartureTime, Place, format_clock};
use trip_planner::geocode::{GeocodeError, PhotonClient};
use trip_planner::incident::{IncidentClient, IncidentError, IncidentKind};
use trip_planner::orchestrator::{PlanStatus, TripOrchestrator};
use trip_planner::otp::{OtpClient, PlanError};
use trip_planner::reconcile::Side;
use trip_planner::search::parse_coordinate_input;
use trip_planner::session::{PlannerSession, UserAction};
use trip_planner::timeline::{Timeline, TimelineNode};

#[derive(Parser, Debug)]
#[command(name = "trip-planner", version, about = "Plan multimodal trips")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a trip between two places or coordinates
    Plan {
        /// Origin: a place name or "lat, lng"
        from: String,

        /// Destination: a place name or "lat, lng"
        to: String,

        /// Departure date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Departure time, HH:MM (default: now)
        #[arg(long)]
        time: Option<String>,
    },

    /// Report an incident on a vehicle
    Report {
        /// Vehicle number
        vehicle: String,

        /// Incident kind: a code 1-6 or a name such as "too-hot"
        kind: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Incident(#[from] IncidentError),

    #[error("no place found for {0:?}")]
    NotFound(String),

    #[error("invalid departure {date} {time}")]
    InvalidDeparture { date: String, time: String },

    #[error("unknown incident kind {0:?}")]
    UnknownKind(String),

    #[error("{0}")]
    Planner(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_planner=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let services = ServiceConfig::from_env();

    let result = match cli.command {
        Command::Plan {
            from,
            to,
            date,
            time,
        } => plan(services, &from, &to, date, time).await,
        Command::Report { vehicle, kind } => report(services, &vehicle, &kind).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn plan(
    services: ServiceConfig,
    from: &str,
    to: &str,
    date: Option<String>,
    time: Option<String>,
) -> Result<(), CliError> {
    let photon = Arc::new(PhotonClient::new(services.photon)?);
    let otp = Arc::new(OtpClient::new(services.otp)?);

    let now = Local::now();
    let date = date.unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
    let time = time.unwrap_or_else(|| now.format("%H:%M").to_string());
    let departure =
        DepartureTime::parse(&date, &time).ok_or(CliError::InvalidDeparture { date, time })?;

    let (origin, destination) =
        futures::future::try_join(resolve(&photon, from), resolve(&photon, to)).await?;
    println!("From: {}", origin.display_name());
    println!("To:   {}", destination.display_name());

    let orchestrator = TripOrchestrator::new(PlannerConfig::default(), MapBus::new());
    let mut session = PlannerSession::new(orchestrator, Arc::clone(&photon), photon, otp);

    session.apply(UserAction::SetDeparture(Some(departure)));
    session.apply(UserAction::SelectPlace {
        side: Side::From,
        place: origin,
    });
    session.apply(UserAction::SelectPlace {
        side: Side::To,
        place: destination,
    });
    session.settle().await;

    match session.orchestrator().status() {
        PlanStatus::Failed(message) => return Err(CliError::Planner(message.clone())),
        PlanStatus::NoRoute => {
            println!("No route found.");
            return Ok(());
        }
        _ => {}
    }

    println!();
    for (index, summary) in session.orchestrator().summaries().iter().enumerate() {
        let modes: Vec<String> = summary
            .badges
            .iter()
            .map(|badge| match &badge.route_label {
                Some(label) => format!("{} {}", badge.mode.as_str(), label),
                None => badge.mode.as_str().to_string(),
            })
            .collect();
        let alert = if summary.has_alerts { " !" } else { "" };
        println!(
            "{:>2}. {}  {:>9}  {}{}",
            index + 1,
            summary.time_range,
            summary.duration_label,
            modes.join(" > "),
            alert
        );
    }

    session.apply(UserAction::OpenDetail);
    let leg_count = session
        .orchestrator()
        .selected_itinerary()
        .map_or(0, |itinerary| itinerary.legs().len());
    for leg in 0..leg_count {
        session.apply(UserAction::ToggleLeg(leg));
    }

    let orchestrator = session.orchestrator();
    if let Some(timeline) = orchestrator.timeline() {
        println!();
        print_timeline(&timeline, &orchestrator.display_offset());
        for alert in orchestrator.detail_alerts() {
            println!("  [{:?}] {}: {}", alert.level, alert.leg_label, alert.header);
        }
    }

    Ok(())
}

/// A raw coordinate, or the best geocoding match.
async fn resolve(photon: &PhotonClient, text: &str) -> Result<Place, CliError> {
    if let Some(coordinate) = parse_coordinate_input(text) {
        return Ok(Place::from_coordinate(coordinate));
    }

    photon
        .search_places(text)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CliError::NotFound(text.to_string()))
}

fn print_timeline(timeline: &Timeline<'_>, offset: &FixedOffset) {
    let clock = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| format_clock(t, offset)).unwrap_or_default()
    };

    for node in &timeline.nodes {
        match node {
            TimelineNode::Stop(stop) if stop.is_intermediate => {
                println!("  {:>5}   · {}", clock(stop.arrival), stop.label);
            }
            TimelineNode::Stop(stop) => {
                let at = stop.departure.or(stop.arrival);
                println!("  {:>5}   ● {}", clock(at), stop.label);
            }
            TimelineNode::Leg(leg) => {
                let headsign = leg
                    .headsign
                    .as_deref()
                    .map(|h| format!(" → {h}"))
                    .unwrap_or_default();
                println!(
                    "          │ {}{}  {}",
                    leg.title,
                    headsign,
                    leg.subtitle_lines.join(", ")
                );
            }
        }
    }

    let stats = &timeline.stats;
    let walk = [stats.walk_distance_label(), stats.walk_duration_label()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    println!();
    println!(
        "  {} transit legs, {} transfers{}",
        stats.transit_legs,
        stats.transfers,
        if walk.is_empty() {
            String::new()
        } else {
            format!(", walking {walk}")
        }
    );
}

async fn report(services: ServiceConfig, vehicle: &str, kind: &str) -> Result<(), CliError> {
    let kind = IncidentKind::parse(kind).ok_or_else(|| CliError::UnknownKind(kind.to_string()))?;
    let client = IncidentClient::new(services.incident)?;
    client.submit(vehicle, kind).await?;
    println!("Reported {kind} on vehicle {}", vehicle.trim());
    Ok(())
}
