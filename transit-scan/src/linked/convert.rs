//! Conversion from Linked Connections DTOs to domain connections.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Connection, InvalidId, LocationId, OperatorId, Ride, RouteId, TripId};
use crate::timetable::ProviderError;

use super::types::{ConnectionRecord, ConnectionsPage};

/// A page converted to domain connections, in feed order.
///
/// Feeds order pages by scheduled departure, so delayed connections can
/// sit out of expected-departure order; the provider restores that order.
#[derive(Debug)]
pub struct ConvertedPage {
    pub connections: Vec<Connection>,
    /// Same-page or absent links are `None`.
    pub next: Option<String>,
    /// Latest scheduled departure on the page. Later pages schedule
    /// nothing earlier.
    pub latest_departure: Option<DateTime<Utc>>,
}

/// Convert a fetched page. `uri` is where it was fetched from.
pub fn convert_page(
    page: ConnectionsPage,
    uri: &str,
    operator: &OperatorId,
    mode: &str,
) -> Result<ConvertedPage, ProviderError> {
    let connections = page
        .graph
        .iter()
        .map(|record| convert_record(record, uri, operator, mode))
        .collect::<Result<Vec<_>, _>>()?;
    let latest_departure = page.graph.iter().map(|r| r.departure_time).max();

    let own = page.id.as_deref().unwrap_or(uri);
    let next = page.next.filter(|next| next != own && next != uri);

    Ok(ConvertedPage {
        connections,
        next,
        latest_departure,
    })
}

/// Convert a single connection record.
pub fn convert_record(
    record: &ConnectionRecord,
    uri: &str,
    operator: &OperatorId,
    mode: &str,
) -> Result<Connection, ProviderError> {
    let malformed = |e: InvalidId| ProviderError::Malformed {
        page: uri.to_string(),
        message: format!("{}: {e}", record.id.as_deref().unwrap_or("connection")),
    };

    let from = LocationId::parse(&record.departure_stop).map_err(malformed)?;
    let to = LocationId::parse(&record.arrival_stop).map_err(malformed)?;
    let trip = TripId::parse(record.trip.as_deref().unwrap_or_default()).map_err(malformed)?;
    let route = RouteId::parse(record.route.as_deref().unwrap_or_default()).map_err(malformed)?;

    let ride = Ride::new(
        from,
        to,
        record.departure_time,
        record.arrival_time,
        trip,
        route,
        operator.clone(),
        mode,
    )
    .with_delays(delay(record.departure_delay), delay(record.arrival_delay));

    Ok(ride.into())
}

/// Running early counts as on time, so nothing departs before its slot.
fn delay(seconds: Option<i64>) -> Duration {
    Duration::seconds(seconds.unwrap_or(0).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    const PAGE: &str = "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:00:00Z";

    fn time(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 10, 30, h, m, 0).unwrap()
    }

    fn operator() -> OperatorId {
        OperatorId::parse("sncb").unwrap()
    }

    fn parse(json: &str) -> ConnectionsPage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_record_with_delays() {
        let page = parse(
            r#"{
                "@id": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:00:00Z",
                "hydra:next": "https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:10:00Z",
                "@graph": [{
                    "@id": "http://irail.be/connections/8812005/20181030/IC1831",
                    "departureStop": "http://irail.be/stations/NMBS/008812005",
                    "arrivalStop": "http://irail.be/stations/NMBS/008813003",
                    "departureTime": "2018-10-30T11:05:00+01:00",
                    "arrivalTime": "2018-10-30T11:09:00+01:00",
                    "departureDelay": 60,
                    "arrivalDelay": 120,
                    "gtfs:trip": "http://irail.be/vehicle/IC1831/20181030",
                    "gtfs:route": "http://irail.be/vehicle/IC1831"
                }]
            }"#,
        );

        let converted = convert_page(page, PAGE, &operator(), "train").unwrap();
        assert_eq!(converted.connections.len(), 1);
        assert_eq!(
            converted.next.as_deref(),
            Some("https://graph.irail.be/sncb/connections?departureTime=2018-10-30T10:10:00Z")
        );

        let c = &converted.connections[0];
        assert_eq!(
            c.departure_location().as_str(),
            "http://irail.be/stations/NMBS/008812005"
        );
        assert_eq!(c.departure_time(), time(10, 5));
        assert_eq!(c.expected_departure(), time(10, 6));
        assert_eq!(c.expected_arrival(), time(10, 11));
        assert_eq!(
            c.trip().map(TripId::as_str),
            Some("http://irail.be/vehicle/IC1831/20181030")
        );
        assert_eq!(c.operator().map(OperatorId::as_str), Some("sncb"));
        assert_eq!(c.mode(), "train");
    }

    #[test]
    fn self_link_means_exhausted() {
        let page = parse(&format!(
            r#"{{ "@id": "{PAGE}", "hydra:next": "{PAGE}", "@graph": [] }}"#
        ));

        let converted = convert_page(page, PAGE, &operator(), "train").unwrap();
        assert!(converted.next.is_none());
    }

    #[test]
    fn missing_stop_is_malformed() {
        let page = parse(
            r#"{
                "@graph": [{
                    "arrivalStop": "http://irail.be/stations/NMBS/008813003",
                    "departureTime": "2018-10-30T10:05:00Z",
                    "arrivalTime": "2018-10-30T10:09:00Z",
                    "gtfs:trip": "IC1831",
                    "gtfs:route": "IC"
                }]
            }"#,
        );

        let err = convert_page(page, PAGE, &operator(), "train").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { .. }));
    }

    #[test]
    fn keeps_feed_order_and_schedule_horizon() {
        let page = parse(
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

        let converted = convert_page(page, PAGE, &operator(), "bus").unwrap();
        let trips: Vec<&str> = converted
            .connections
            .iter()
            .filter_map(|c| c.trip().map(TripId::as_str))
            .collect();
        assert_eq!(trips, vec!["late", "on-time"]);
        assert_eq!(converted.latest_departure, Some(time(10, 5)));
    }

    #[test]
    fn early_running_counts_as_on_time() {
        let page = parse(
            r#"{
                "@graph": [{
                    "departureStop": "A", "arrivalStop": "B",
                    "departureTime": "2018-10-30T10:00:00Z",
                    "arrivalTime": "2018-10-30T10:10:00Z",
                    "departureDelay": -120, "arrivalDelay": -60,
                    "gtfs:trip": "T1", "gtfs:route": "R1"
                }]
            }"#,
        );

        let converted = convert_page(page, PAGE, &operator(), "train").unwrap();
        let c = &converted.connections[0];
        assert_eq!(c.expected_departure(), time(10, 0));
        assert_eq!(c.expected_arrival(), time(10, 10));
    }
}
