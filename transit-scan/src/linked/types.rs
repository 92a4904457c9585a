//! Linked Connections page DTOs.
//!
//! These types map directly to the JSON-LD pages a Linked Connections
//! server publishes. Stops default to empty strings so a missing stop is
//! reported as a malformed record rather than a parse failure of the whole
//! page.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of connections.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsPage {
    /// URI of this page.
    #[serde(rename = "@id")]
    pub id: Option<String>,

    /// URI of the chronologically next page.
    #[serde(rename = "hydra:next")]
    pub next: Option<String>,

    /// Connection records on this page.
    #[serde(rename = "@graph", default)]
    pub graph: Vec<ConnectionRecord>,
}

/// A single `lc:Connection` record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    #[serde(rename = "@id")]
    pub id: Option<String>,

    /// URI of the stop the vehicle leaves.
    #[serde(default)]
    pub departure_stop: String,

    /// URI of the stop the vehicle reaches.
    #[serde(default)]
    pub arrival_stop: String,

    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,

    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,

    /// Departure delay in seconds.
    pub departure_delay: Option<i64>,

    /// Arrival delay in seconds.
    pub arrival_delay: Option<i64>,

    #[serde(rename = "gtfs:trip")]
    pub trip: Option<String>,

    #[serde(rename = "gtfs:route")]
    pub route: Option<String>,
}
