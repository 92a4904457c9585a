//! Timetable provider over a Linked Connections endpoint.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::domain::{Connection, OperatorId};
use crate::timetable::{ProviderError, TimetablePage, TimetableProvider};

use super::convert::{ConvertedPage, convert_page};
use super::loader::DocumentLoader;
use super::types::ConnectionsPage;

/// Serves pages from a Linked Connections server.
///
/// The first page is requested as `{base}?departureTime=<RFC 3339>`; later
/// pages follow the `hydra:next` links.
///
/// Pages are ordered by scheduled departure, so a delayed connection may
/// belong after ones on the following page. Connections are held back
/// until no later page can schedule anything earlier, keeping the stream
/// non-decreasing in expected departure.
#[derive(Clone)]
pub struct LinkedConnectionsProvider {
    loader: Arc<DocumentLoader>,
    base_url: String,
    operator: OperatorId,
    mode: String,
}

impl LinkedConnectionsProvider {
    /// Create a provider for `base_url`, attributing rides to `operator`.
    pub fn new(loader: Arc<DocumentLoader>, base_url: impl Into<String>, operator: OperatorId) -> Self {
        Self {
            loader,
            base_url: base_url.into(),
            operator,
            mode: "train".to_string(),
        }
    }

    /// Set the mode label given to every ride (defaults to `train`).
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    pub fn operator(&self) -> &OperatorId {
        &self.operator
    }

    /// URI of the page holding departures from `time` on.
    pub fn page_uri(&self, time: DateTime<Utc>) -> String {
        format!(
            "{}?departureTime={}",
            self.base_url,
            time.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    async fn fetch(
        &self,
        uri: &str,
        pending: Vec<Connection>,
    ) -> Result<TimetablePage<LinkedCursor>, ProviderError> {
        let document = self.loader.load_document(uri).await?;
        let page: ConnectionsPage =
            serde_json::from_value(document).map_err(|e| ProviderError::Malformed {
                page: uri.to_string(),
                message: e.to_string(),
            })?;

        let converted = convert_page(page, uri, &self.operator, &self.mode)?;
        debug!(
            uri,
            connections = converted.connections.len(),
            held = pending.len(),
            last = converted.next.is_none(),
            "linked connections page"
        );
        Ok(settle(pending, converted))
    }
}

/// Continuation of a Linked Connections stream.
#[derive(Debug, Clone)]
pub struct LinkedCursor {
    next: String,
    /// Connections fetched but not yet released
    pending: Vec<Connection>,
}

impl LinkedCursor {
    /// URI of the page to fetch next.
    pub fn next_uri(&self) -> &str {
        &self.next
    }

    pub fn pending(&self) -> &[Connection] {
        &self.pending
    }
}

/// Releases every connection no later page can precede.
fn settle(mut pending: Vec<Connection>, page: ConvertedPage) -> TimetablePage<LinkedCursor> {
    pending.extend(page.connections);
    pending.sort_by_key(Connection::expected_departure);

    let Some(next) = page.next else {
        return TimetablePage::new(pending, None);
    };

    let held = match page.latest_departure {
        Some(horizon) => pending.partition_point(|c| c.expected_departure() <= horizon),
        None => 0,
    };
    let rest = pending.split_off(held);
    TimetablePage::new(pending, Some(LinkedCursor { next, pending: rest }))
}

impl TimetableProvider for LinkedConnectionsProvider {
    type Cursor = LinkedCursor;

    async fn timetable_at(
        &self,
        time: DateTime<Utc>,
    ) -> Result<TimetablePage<LinkedCursor>, ProviderError> {
        self.fetch(&self.page_uri(time), Vec::new()).await
    }

    async fn next_page(
        &self,
        cursor: &LinkedCursor,
    ) -> Result<TimetablePage<LinkedCursor>, ProviderError> {
        self.fetch(&cursor.next, cursor.pending.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationId, Ride, RouteId, TripId};
    use chrono::{Duration, TimeZone};

    const BASE: &str = "https://graph.irail.be/sncb/connections";

    fn time(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 10, 30, h, m, 0).unwrap()
    }

    fn ride(trip: &str, dep: (u32, u32), delay_mins: i64) -> Connection {
        let departure = time(dep.0, dep.1);
        Ride::new(
            LocationId::parse("A").unwrap(),
            LocationId::parse("B").unwrap(),
            departure,
            departure + Duration::minutes(10),
            TripId::parse(trip).unwrap(),
            RouteId::parse("R1").unwrap(),
            OperatorId::parse("sncb").unwrap(),
            "train",
        )
        .with_delays(Duration::minutes(delay_mins), Duration::minutes(delay_mins))
        .into()
    }

    fn converted(connections: Vec<Connection>, next: Option<&str>) -> ConvertedPage {
        let latest_departure = connections.iter().map(Connection::departure_time).max();
        ConvertedPage {
            connections,
            next: next.map(str::to_string),
            latest_departure,
        }
    }

    fn trips(connections: &[Connection]) -> Vec<&str> {
        connections
            .iter()
            .filter_map(|c| c.trip().map(TripId::as_str))
            .collect()
    }

    fn provider(payload: &str) -> LinkedConnectionsProvider {
        LinkedConnectionsProvider::new(
            Arc::new(DocumentLoader::always_returning(payload)),
            BASE,
            OperatorId::parse("sncb").unwrap(),
        )
    }

    #[test]
    fn page_uri_format() {
        let p = provider("{}");
        let time = Utc.with_ymd_and_hms(2018, 10, 30, 10, 0, 0).unwrap();
        assert_eq!(
            p.page_uri(time),
            "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:00:00Z"
        );
    }

    #[tokio::test]
    async fn follows_next_link() {
        let p = provider(
            r#"{
                "@id": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:00:00Z",
                "hydra:next": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:10:00Z",
                "@graph": [{
                    "departureStop": "http://irail.be/stations/NMBS/008812005",
                    "arrivalStop": "http://irail.be/stations/NMBS/008813003",
                    "departureTime": "2018-10-30T10:05:00Z",
                    "arrivalTime": "2018-10-30T10:09:00Z",
                    "gtfs:trip": "http://irail.be/vehicle/IC1831/20181030",
                    "gtfs:route": "http://irail.be/vehicle/IC1831"
                }]
            }"#,
        );

        let time = Utc.with_ymd_and_hms(2018, 10, 30, 10, 0, 0).unwrap();
        let page = p.timetable_at(time).await.unwrap();

        assert_eq!(page.connections().len(), 1);
        assert_eq!(
            page.continuation().map(LinkedCursor::next_uri),
            Some("https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:10:00Z")
        );
    }

    #[tokio::test]
    async fn self_link_ends_stream() {
        let p = provider(
            r#"{
                "@id": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T23:50:00Z",
                "hydra:next": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T23:50:00Z",
                "@graph": []
            }"#,
        );

        let cursor = LinkedCursor {
            next: "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T23:50:00Z".to_string(),
            pending: Vec::new(),
        };
        let page = p.next_page(&cursor).await.unwrap();
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn non_page_document_is_malformed() {
        let p = provider(r#"{"@graph": "nope"}"#);
        let time = Utc.with_ymd_and_hms(2018, 10, 30, 10, 0, 0).unwrap();

        let err = p.timetable_at(time).await.unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[test]
    fn delayed_connection_waits_for_next_page() {
        // Scheduled 10:05 but running ten minutes late
        let first = settle(
            Vec::new(),
            converted(vec![ride("late", (10, 5), 10)], Some("page-2")),
        );
        assert!(first.connections().is_empty());
        let cursor = first.continuation().unwrap().clone();
        assert_eq!(cursor.next_uri(), "page-2");
        assert_eq!(trips(cursor.pending()), vec!["late"]);

        let second = settle(cursor.pending, converted(vec![ride("on-time", (10, 12), 0)], None));

        assert!(second.is_last());
        assert_eq!(trips(second.connections()), vec!["on-time", "late"]);
        let departures: Vec<_> = second
            .connections()
            .iter()
            .map(Connection::expected_departure)
            .collect();
        assert_eq!(departures, vec![time(10, 12), time(10, 15)]);
    }

    #[test]
    fn releases_up_to_the_schedule_horizon() {
        let page = settle(
            Vec::new(),
            converted(
                vec![
                    ride("late", (10, 0), 10),
                    ride("on-time", (10, 5), 0),
                    ride("slightly-late", (10, 6), 2),
                ],
                Some("page-2"),
            ),
        );

        assert_eq!(trips(page.connections()), vec!["on-time"]);
        let cursor = page.continuation().unwrap();
        assert_eq!(trips(cursor.pending()), vec!["slightly-late", "late"]);
    }

    #[test]
    fn empty_page_holds_everything() {
        let page = settle(vec![ride("late", (10, 0), 30)], converted(Vec::new(), Some("page-3")));

        assert!(page.connections().is_empty());
        assert_eq!(page.continuation().map(|c| c.pending().len()), Some(1));
    }

    #[tokio::test]
    async fn sorts_page_by_expected_departure() {
        let p = provider(
            r#"{
                "@graph": [
                    {
                        "departureStop": "A", "arrivalStop": "B",
                        "departureTime": "2018-10-30T10:00:00Z",
                        "arrivalTime": "2018-10-30T10:10:00Z",
                        "departureDelay": 600, "arrivalDelay": 600,
                        "gtfs:trip": "late", "gtfs:route": "R1"
                    },
                    {
                        "departureStop": "A", "arrivalStop": "C",
                        "departureTime": "2018-10-30T10:05:00Z",
                        "arrivalTime": "2018-10-30T10:15:00Z",
                        "gtfs:trip": "on-time", "gtfs:route": "R2"
                    }
                ]
            }"#,
        );

        let page = p.timetable_at(time(10, 0)).await.unwrap();
        assert!(page.is_last());
        assert_eq!(trips(page.connections()), vec!["on-time", "late"]);
    }
}
