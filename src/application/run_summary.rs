use std::fmt;

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Products fetched and logged (with or without a price)
    pub processed: usize,
    /// Products skipped because their page could not be fetched
    pub failed: usize,
    pub alerts_sent: usize,
    pub alert_failures: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.alert_failures > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} failed={} alerts_sent={} alert_failures={}",
            self.processed, self.failed, self.alerts_sent, self.alert_failures
        )
    }
}
