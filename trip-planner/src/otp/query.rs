//! The `planConnection` GraphQL query.

pub const PLAN_CONNECTION_QUERY: &str = r#"
query PlanTrip(
  $origin: PlanLabeledLocationInput!
  $destination: PlanLabeledLocationInput!
  $dateTime: PlanDateTimeInput
  $first: Int
) {
  planConnection(
    origin: $origin
    destination: $destination
    dateTime: $dateTime
    first: $first
  ) {
    edges {
      node {
        duration
        legs {
          mode
          startTime
          endTime
          duration
          distance
          realTime
          from { name lat lon stop { name code } }
          to { name lat lon stop { name code } }
          legGeometry { points }
          route { shortName longName color textColor }
          trip { tripHeadsign }
          intermediatePlaces {
            name
            arrivalTime
            departureTime
            stop { name code }
          }
          alerts {
            alertSeverityLevel
            alertHeaderText
            alertDescriptionText
          }
        }
      }
    }
  }
}
"#;
