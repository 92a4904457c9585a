//! Identifier types for locations, trips, routes and operators.
//!
//! Linked-data feeds identify everything by URI. The identifiers are kept
//! as shared strings so that cloning one into every journey node is cheap.

use std::fmt;
use std::sync::Arc;

/// Error returned when parsing an empty or blank identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} identifier: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<Arc<str>, InvalidId> {
    if s.trim().is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }
    if s.chars().any(char::is_whitespace) {
        return Err(InvalidId {
            kind,
            reason: "must not contain whitespace",
        });
    }
    Ok(Arc::from(s))
}

/// Identifier of a stop or station.
///
/// # Examples
///
/// ```
/// use transit_scan::domain::LocationId;
///
/// let gent = LocationId::parse("http://irail.be/stations/NMBS/008892007").unwrap();
/// assert_eq!(gent.as_str(), "http://irail.be/stations/NMBS/008892007");
///
/// assert!(LocationId::parse("").is_err());
/// assert!(LocationId::parse("two words").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(Arc<str>);

impl LocationId {
    /// Parse a location identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate("location", s).map(Self)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationId({})", self.as_str())
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a single vehicle run.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TripId(Arc<str>);

impl TripId {
    /// Parse a trip identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate("trip", s).map(Self)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.as_str())
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a route (a line served by many trips).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RouteId(Arc<str>);

impl RouteId {
    /// Parse a route identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate("route", s).map(Self)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.as_str())
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a transit operator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OperatorId(Arc<str>);

impl OperatorId {
    /// Parse an operator identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        validate("operator", s).map(Self)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorId({})", self.as_str())
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(LocationId::parse("http://irail.be/stations/NMBS/008892007").is_ok());
        assert!(TripId::parse("http://irail.be/vehicle/IC1832/20181030").is_ok());
        assert!(RouteId::parse("http://irail.be/routes/IC1832").is_ok());
        assert!(OperatorId::parse("http://irail.be/operators/sncb").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(LocationId::parse("").is_err());
        assert!(TripId::parse("   ").is_err());
        assert!(RouteId::parse("").is_err());
        assert!(OperatorId::parse("\t").is_err());
    }

    #[test]
    fn reject_whitespace() {
        assert!(LocationId::parse("stop A").is_err());
        assert!(TripId::parse("trip\n1").is_err());
    }

    #[test]
    fn error_display() {
        let err = LocationId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "invalid location identifier: must not be empty");

        let err = TripId::parse("a b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid trip identifier: must not contain whitespace"
        );
    }

    #[test]
    fn clones_share_storage() {
        let a = LocationId::parse("stop:A").unwrap();
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn display_and_debug() {
        let a = LocationId::parse("stop:A").unwrap();
        assert_eq!(a.to_string(), "stop:A");
        assert_eq!(format!("{a:?}"), "LocationId(stop:A)");
    }
}
