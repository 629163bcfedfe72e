//! Alert domain - when to notify and what to say

mod alert_message;
mod alert_policy;

pub use alert_message::{compose, direction};

use crate::shared::types::Price;

/// Outcome of comparing an observation against history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    Skip,
    FirstSeen,
    Changed { previous: Price, delta: Price },
    AtOrBelowThreshold { threshold: Price },
}

impl AlertDecision {
    pub fn should_notify(&self) -> bool {
        !matches!(self, AlertDecision::Skip)
    }
}
