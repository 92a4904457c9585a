//! Scan configuration.

use chrono::Duration;

use super::profile::TransferIdentity;

/// Configuration parameters for an earliest-arrival scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Minimum time needed to change vehicles (minutes).
    /// Changes tighter than this are rejected.
    pub min_transfer_mins: i64,

    /// What has to differ between two rides for a change to count.
    pub transfer_identity: TransferIdentity,

    /// How far past the start to keep scanning (minutes).
    /// `None` scans until the timetable runs out.
    pub max_search_mins: Option<i64>,
}

impl ScanConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        min_transfer_mins: i64,
        transfer_identity: TransferIdentity,
        max_search_mins: Option<i64>,
    ) -> Self {
        Self {
            min_transfer_mins,
            transfer_identity,
            max_search_mins,
        }
    }

    /// Returns the minimum transfer time as a Duration.
    pub fn min_transfer(&self) -> Duration {
        Duration::minutes(self.min_transfer_mins)
    }

    /// Returns the search window as a Duration, if bounded.
    pub fn max_search(&self) -> Option<Duration> {
        self.max_search_mins.map(Duration::minutes)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_transfer_mins: 5,
            transfer_identity: TransferIdentity::Trip,
            max_search_mins: Some(360), // 6 hours
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ScanConfig::default();

        assert_eq!(config.min_transfer_mins, 5);
        assert_eq!(config.transfer_identity, TransferIdentity::Trip);
        assert_eq!(config.max_search_mins, Some(360));
    }

    #[test]
    fn duration_methods() {
        let config = ScanConfig::default();

        assert_eq!(config.min_transfer(), Duration::minutes(5));
        assert_eq!(config.max_search(), Some(Duration::minutes(360)));
    }

    #[test]
    fn custom_config() {
        let config = ScanConfig::new(2, TransferIdentity::Route, None);

        assert_eq!(config.min_transfer_mins, 2);
        assert_eq!(config.transfer_identity, TransferIdentity::Route);
        assert_eq!(config.max_search(), None);
    }
}
