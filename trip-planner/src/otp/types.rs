//! OTP GraphQL request and response DTOs.
//!
//! Response types use `Option` throughout: the planner omits or nulls
//! fields freely, and an absent value must stay "no value" rather than
//! become zero.

use serde::{Deserialize, Serialize};

/// GraphQL request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Variables of the `planConnection` query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanVariables {
    pub origin: LabeledLocation,
    pub destination: LabeledLocation,
    pub date_time: DateTimeInput,
    pub first: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub location: LocationInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInput {
    pub coordinate: CoordinateInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateInput {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeInput {
    /// `YYYY-MM-DDTHH:MM:SS±HH:MM`
    pub earliest_departure: String,
}

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanData {
    pub plan_connection: Option<PlanConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanConnection {
    #[serde(default)]
    pub edges: Vec<ItineraryEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryEdge {
    pub node: ItineraryNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryNode {
    /// Total duration in seconds.
    pub duration: Option<f64>,
    #[serde(default)]
    pub legs: Vec<LegNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegNode {
    pub mode: Option<String>,
    /// Epoch milliseconds.
    pub start_time: Option<i64>,
    /// Epoch milliseconds.
    pub end_time: Option<i64>,
    /// Seconds.
    pub duration: Option<f64>,
    /// Metres.
    pub distance: Option<f64>,
    pub real_time: Option<bool>,
    pub from: Option<PlaceNode>,
    pub to: Option<PlaceNode>,
    pub leg_geometry: Option<LegGeometry>,
    pub route: Option<RouteNode>,
    pub trip: Option<TripNode>,
    pub intermediate_places: Option<Vec<IntermediatePlace>>,
    pub alerts: Option<Vec<AlertNode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceNode {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub stop: Option<StopRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRef {
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegGeometry {
    pub points: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripNode {
    pub trip_headsign: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediatePlace {
    pub name: Option<String>,
    /// Epoch milliseconds.
    pub arrival_time: Option<i64>,
    /// Epoch milliseconds.
    pub departure_time: Option<i64>,
    pub stop: Option<StopRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNode {
    pub alert_severity_level: Option<String>,
    pub alert_header_text: Option<TranslatedText>,
    pub alert_description_text: Option<TranslatedText>,
}

/// Alert text, sent either as a plain string or as `{"text": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TranslatedText {
    Plain(String),
    Translated { text: Option<String> },
}

impl TranslatedText {
    pub fn into_text(self) -> Option<String> {
        match self {
            TranslatedText::Plain(text) => Some(text),
            TranslatedText::Translated { text } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_text_accepts_both_shapes() {
        let plain: TranslatedText = serde_json::from_str(r#""Objazd""#).unwrap();
        assert_eq!(plain.into_text().as_deref(), Some("Objazd"));

        let nested: TranslatedText = serde_json::from_str(r#"{"text": "Detour"}"#).unwrap();
        assert_eq!(nested.into_text().as_deref(), Some("Detour"));

        let empty: TranslatedText = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert_eq!(empty.into_text(), None);
    }

    #[test]
    fn variables_serialize_to_graphql_shape() {
        let variables = PlanVariables {
            origin: LabeledLocation {
                label: Some("Home".into()),
                location: LocationInput {
                    coordinate: CoordinateInput {
                        latitude: 50.06,
                        longitude: 19.94,
                    },
                },
            },
            destination: LabeledLocation {
                label: None,
                location: LocationInput {
                    coordinate: CoordinateInput {
                        latitude: 50.08,
                        longitude: 19.96,
                    },
                },
            },
            date_time: DateTimeInput {
                earliest_departure: "2024-06-01T08:30:00+02:00".into(),
            },
            first: 10,
        };

        let json = serde_json::to_value(&variables).unwrap();
        assert_eq!(json["origin"]["label"], "Home");
        assert_eq!(json["origin"]["location"]["coordinate"]["longitude"], 19.94);
        assert!(json["destination"].get("label").is_none());
        assert_eq!(
            json["dateTime"]["earliestDeparture"],
            "2024-06-01T08:30:00+02:00"
        );
        assert_eq!(json["first"], 10);
    }

    #[test]
    fn leg_with_nulls_parses() {
        let leg: LegNode = serde_json::from_str(
            r#"{
                "mode": "WALK",
                "startTime": 1717223400000,
                "endTime": 1717223640000,
                "duration": null,
                "distance": 320.5,
                "realTime": false,
                "from": {"name": "Home", "lat": 50.06, "lon": 19.94, "stop": null},
                "to": {"name": "Rondo", "lat": 50.065, "lon": 19.95},
                "legGeometry": {"points": "_p~iF~ps|U"},
                "route": null,
                "trip": null,
                "intermediatePlaces": null,
                "alerts": []
            }"#,
        )
        .unwrap();

        assert_eq!(leg.mode.as_deref(), Some("WALK"));
        assert_eq!(leg.duration, None);
        assert!(leg.from.unwrap().stop.is_none());
    }

    #[test]
    fn envelope_with_errors_only() {
        let response: GraphQlResponse<PlanData> =
            serde_json::from_str(r#"{"errors": [{"message": "boom"}]}"#).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "boom");
    }
}
