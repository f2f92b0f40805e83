//! Alert thresholds: >3 degradations of one broker in 1 hour → warning, continuously degraded >24h → critical.

use std::collections::HashSet;

use brokerscope_core::models::BrokerKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub broker: BrokerKind,
    pub message: String,
}

/// Evaluate alerts from the current tracker state at `now`, one per broker at most.
pub fn evaluate_alerts(tracker: &DegradationTracker, now: DateTime<Utc>) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen = HashSet::new();

    for tracked in tracker.events() {
        let broker = tracked.event.broker;
        if !seen.insert(broker) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(broker, now) {
            if duration > Duration::hours(24) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    broker,
                    message: format!("{broker} has been degraded for over 24 hours"),
                });
                continue;
            }
        }

        let recent = tracker.count_recent(broker, Duration::hours(1), now);
        if recent > 3 {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                broker,
                message: format!("{broker} has {recent} degradation events in the last hour"),
            });
        }
    }

    alerts
}
