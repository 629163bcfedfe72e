//! Notification decision at the compare step

use crate::shared::types::{AlertPolicy, Price};
use super::AlertDecision;

impl AlertPolicy {
    /// Decide whether a fresh observation warrants an alert.
    ///
    /// An absent price never alerts, whatever the policy.
    pub fn evaluate(
        &self,
        price: Option<Price>,
        previous: Option<Price>,
        threshold: Option<Price>,
    ) -> AlertDecision {
        let Some(price) = price else {
            return AlertDecision::Skip;
        };

        match self {
            AlertPolicy::Threshold => match threshold {
                Some(threshold) if price <= threshold => AlertDecision::AtOrBelowThreshold { threshold },
                _ => AlertDecision::Skip,
            },
            AlertPolicy::Change => changed(price, previous).unwrap_or(AlertDecision::Skip),
            AlertPolicy::ChangeOrFirst => match previous {
                None => AlertDecision::FirstSeen,
                Some(_) => changed(price, previous).unwrap_or(AlertDecision::Skip),
            },
        }
    }
}

fn changed(price: Price, previous: Option<Price>) -> Option<AlertDecision> {
    let previous = previous?;
    if price == previous {
        return None;
    }
    Some(AlertDecision::Changed {
        previous,
        delta: price - previous,
    })
}
