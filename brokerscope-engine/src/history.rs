//! Pure helpers for history queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use brokerscope_core::config::HistoryConfig;
use brokerscope_core::models::{AlignedSample, BrokerMetricsSample, TimeRange};

/// Clamp a requested window into `[min_hours, max_hours]`.
pub fn clamp_hours(requested: i64, config: &HistoryConfig) -> u32 {
    let clamped = requested.clamp(i64::from(config.min_hours), i64::from(config.max_hours));
    u32::try_from(clamped).unwrap_or(config.max_hours)
}

pub fn time_range(now: DateTime<Utc>, hours: u32) -> TimeRange {
    TimeRange {
        from: now - Duration::hours(i64::from(hours)),
        to: now,
        hours,
    }
}

/// One entry per distinct capture timestamp, oldest first, each holding
/// whichever brokers were written at exactly that instant.
pub fn align_by_timestamp(samples: Vec<BrokerMetricsSample>) -> Vec<AlignedSample> {
    let mut by_time: BTreeMap<DateTime<Utc>, AlignedSample> = BTreeMap::new();
    for sample in samples {
        by_time
            .entry(sample.captured_at)
            .or_insert_with(|| AlignedSample::new(sample.captured_at))
            .put(sample);
    }
    by_time.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokerscope_core::models::{millis_to_datetime, BrokerKind};

    #[test]
    fn clamps_both_ends() {
        let config = HistoryConfig::default();
        assert_eq!(clamp_hours(0, &config), 1);
        assert_eq!(clamp_hours(-5, &config), 1);
        assert_eq!(clamp_hours(24, &config), 24);
        assert_eq!(clamp_hours(10_000, &config), 168);
    }

    #[test]
    fn aligns_same_instant_across_brokers() {
        let t1 = millis_to_datetime(1_000);
        let t2 = millis_to_datetime(2_000);
        let aligned = align_by_timestamp(vec![
            BrokerMetricsSample::disconnected(BrokerKind::Amqp, t1),
            BrokerMetricsSample::connected(BrokerKind::LogStream, t1),
            BrokerMetricsSample::connected(BrokerKind::Amqp, t2),
        ]);

        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].timestamp, t1);
        assert!(aligned[0].amqp.is_some() && aligned[0].log_stream.is_some());
        assert!(aligned[0].pubsub.is_none());
        assert_eq!(aligned[1].timestamp, t2);
        assert!(aligned[1].log_stream.is_none());
    }

    #[test]
    fn range_spans_requested_hours() {
        let now = millis_to_datetime(10 * 3_600_000);
        let range = time_range(now, 3);
        assert_eq!(range.to - range.from, Duration::hours(3));
    }
}
