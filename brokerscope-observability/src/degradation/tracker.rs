//! Degradation history per broker: one entry per transition into a degraded
//! tier, refreshed in place while the broker stays on that tier.

use brokerscope_core::models::BrokerKind;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on retained entries. Closed entries are evicted oldest first.
pub const MAX_TRACKED_EVENTS: usize = 1024;

/// A broker served something other than a measured sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub broker: BrokerKind,
    pub failure: String,
    /// Tier that produced the sample, e.g. `fallback` or `missing`.
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(
        broker: BrokerKind,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            broker,
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp: at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    /// The broker moved to a different degraded tier.
    Superseded,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
    /// Start of the continuous degradation this entry belongs to. Carried
    /// across tier changes.
    pub degraded_since: DateTime<Utc>,
    /// Last cycle that observed this state.
    pub last_seen: DateTime<Utc>,
    /// Cycles folded into this entry.
    pub occurrences: u64,
}

impl TrackedDegradation {
    fn is_active(&self) -> bool {
        self.recovery_status == RecoveryStatus::Active
    }

    fn closed_at(&self) -> DateTime<Utc> {
        self.recovered_at.unwrap_or(self.last_seen)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a degraded broker. Returns `true` when this opened a new entry
    /// (first degradation, or a change of tier), `false` when it refreshed
    /// the broker's active entry.
    pub fn record(&mut self, event: DegradationEvent) -> bool {
        let at = event.timestamp;
        let mut degraded_since = at;

        if let Some(active) = self
            .events
            .iter_mut()
            .find(|t| t.event.broker == event.broker && t.is_active())
        {
            if active.event.fallback_used == event.fallback_used {
                active.last_seen = at;
                active.occurrences += 1;
                return false;
            }
            active.recovery_status = RecoveryStatus::Superseded;
            active.recovered_at = Some(at);
            degraded_since = active.degraded_since;
        }

        tracing::warn!(
            event = "degradation_recorded",
            broker = %event.broker,
            failure = %event.failure,
            fallback = %event.fallback_used,
            "broker degraded"
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
            degraded_since,
            last_seen: at,
            occurrences: 1,
        });
        self.enforce_cap();
        true
    }

    /// Close the active entry of `broker`.
    pub fn mark_recovered(&mut self, broker: BrokerKind, at: DateTime<Utc>) {
        for tracked in self.events.iter_mut() {
            if tracked.event.broker == broker && tracked.is_active() {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(at);
                tracing::info!(event = "degradation_recovered", broker = %broker, "broker recovered");
            }
        }
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events.iter().filter(|t| t.is_active()).collect()
    }

    /// Transitions into a degraded tier for `broker` within `window` of `now`.
    pub fn count_recent(&self, broker: BrokerKind, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|t| t.event.broker == broker && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `broker` has been continuously degraded, or `None` if it is not.
    pub fn degraded_duration(&self, broker: BrokerKind, now: DateTime<Utc>) -> Option<Duration> {
        self.events
            .iter()
            .find(|t| t.event.broker == broker && t.is_active())
            .map(|t| now - t.degraded_since)
    }

    /// Drop closed entries older than `max_age`; active ones are kept.
    pub fn compact(&mut self, max_age: Duration, now: DateTime<Utc>) {
        let cutoff = now - max_age;
        self.events.retain(|t| t.is_active() || t.closed_at() > cutoff);
    }

    fn enforce_cap(&mut self) {
        while self.events.len() > MAX_TRACKED_EVENTS {
            match self.events.iter().position(|t| !t.is_active()) {
                Some(oldest_closed) => {
                    self.events.remove(oldest_closed);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn degraded(broker: BrokerKind, tier: &str, at: DateTime<Utc>) -> DegradationEvent {
        DegradationEvent::new(broker, "unreachable", tier, at)
    }

    #[test]
    fn same_tier_refreshes_one_entry() {
        let mut tracker = DegradationTracker::new();
        assert!(tracker.record(degraded(BrokerKind::LogStream, "fallback", t0())));
        for i in 1..100 {
            let at = t0() + Duration::seconds(i * 60);
            assert!(!tracker.record(degraded(BrokerKind::LogStream, "fallback", at)));
        }

        assert_eq!(tracker.events().len(), 1);
        let entry = &tracker.events()[0];
        assert_eq!(entry.occurrences, 100);
        assert_eq!(entry.last_seen, t0() + Duration::seconds(99 * 60));
        assert_eq!(entry.degraded_since, t0());
    }

    #[test]
    fn tier_change_supersedes_and_keeps_start() {
        let mut tracker = DegradationTracker::new();
        tracker.record(degraded(BrokerKind::PubSub, "fallback", t0()));
        let later = t0() + Duration::minutes(10);
        assert!(tracker.record(degraded(BrokerKind::PubSub, "missing", later)));

        assert_eq!(tracker.events()[0].recovery_status, RecoveryStatus::Superseded);
        assert_eq!(tracker.active_degradations().len(), 1);
        let now = t0() + Duration::hours(1);
        assert_eq!(tracker.degraded_duration(BrokerKind::PubSub, now), Some(Duration::hours(1)));
    }

    #[test]
    fn recovery_closes_only_that_broker() {
        let mut tracker = DegradationTracker::new();
        tracker.record(degraded(BrokerKind::Amqp, "missing", t0()));
        tracker.record(degraded(BrokerKind::PubSub, "fallback", t0()));
        tracker.mark_recovered(BrokerKind::Amqp, t0() + Duration::minutes(1));

        let active = tracker.active_degradations();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].event.broker, BrokerKind::PubSub);
        assert!(tracker.degraded_duration(BrokerKind::Amqp, t0()).is_none());
    }

    #[test]
    fn recent_window_excludes_old_transitions() {
        let mut tracker = DegradationTracker::new();
        tracker.record(degraded(BrokerKind::LogStream, "fallback", t0()));
        tracker.mark_recovered(BrokerKind::LogStream, t0() + Duration::minutes(1));
        tracker.record(degraded(BrokerKind::LogStream, "fallback", t0() + Duration::minutes(115)));

        let now = t0() + Duration::minutes(120);
        assert_eq!(tracker.count_recent(BrokerKind::LogStream, Duration::hours(1), now), 1);
    }

    #[test]
    fn compact_keeps_active_entries() {
        let mut tracker = DegradationTracker::new();
        tracker.record(degraded(BrokerKind::Amqp, "missing", t0()));
        tracker.record(degraded(BrokerKind::PubSub, "fallback", t0()));
        tracker.mark_recovered(BrokerKind::PubSub, t0());
        tracker.compact(Duration::hours(1), t0() + Duration::hours(10));

        assert_eq!(tracker.events().len(), 1);
        assert_eq!(tracker.events()[0].event.broker, BrokerKind::Amqp);
    }

    #[test]
    fn flapping_is_capped() {
        let mut tracker = DegradationTracker::new();
        for i in 0..(MAX_TRACKED_EVENTS as i64 + 50) {
            let at = t0() + Duration::seconds(i * 2);
            tracker.record(degraded(BrokerKind::Amqp, "missing", at));
            tracker.mark_recovered(BrokerKind::Amqp, at + Duration::seconds(1));
        }
        assert_eq!(tracker.events().len(), MAX_TRACKED_EVENTS);
    }
}
