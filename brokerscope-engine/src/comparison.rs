//! Baseline vs challenger deltas with quality-based suppression.

use chrono::{DateTime, Utc};

use brokerscope_core::config::ComparisonConfig;
use brokerscope_core::constants::NEAR_ZERO;
use brokerscope_core::models::{
    AggregateSnapshot, BrokerKind, BrokerMetricsSample, ComparisonDeltas, ComparisonReport,
    DataQualitySummary, DataSource, MetricField,
};
use brokerscope_observability::tracing_setup::events;

/// Deltas plus the reasons any of them were withheld.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub deltas: ComparisonDeltas,
    pub suppressed_reasons: Vec<String>,
}

/// `+20.0%`, `-3.5%`.
pub fn format_delta(percent: f64) -> String {
    format!("{percent:+.1}%")
}

fn label(field: MetricField) -> &'static str {
    match field {
        MetricField::MessagesPerSecond => "throughput",
        MetricField::P99LatencyMs => "p99 latency",
        MetricField::MemoryUsageMb => "memory",
        MetricField::P50LatencyMs => "p50 latency",
        MetricField::P95LatencyMs => "p95 latency",
        MetricField::CpuPercentage => "cpu",
        MetricField::ConnectionCount => "connections",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ComparisonEngine {
    config: ComparisonConfig,
}

impl ComparisonEngine {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// `(challenger - baseline) / baseline * 100` for each compared field.
    pub fn compare(&self, baseline: &BrokerMetricsSample, challenger: &BrokerMetricsSample) -> Comparison {
        let mut out = Comparison::default();

        let disconnected: Vec<BrokerKind> = [baseline, challenger]
            .iter()
            .filter(|s| !s.connected)
            .map(|s| s.broker_name)
            .collect();
        if !disconnected.is_empty() {
            for broker in disconnected {
                out.suppressed_reasons
                    .push(format!("all comparisons suppressed: {broker} is disconnected"));
            }
            return out;
        }

        for field in MetricField::COMPARED {
            match self.delta(field, baseline, challenger) {
                Ok(delta) => {
                    let slot = match field {
                        MetricField::MessagesPerSecond => &mut out.deltas.throughput_improvement,
                        MetricField::P99LatencyMs => &mut out.deltas.latency_improvement,
                        _ => &mut out.deltas.memory_efficiency,
                    };
                    *slot = Some(delta);
                }
                Err(reason) => out.suppressed_reasons.push(reason),
            }
        }
        out
    }

    fn delta(
        &self,
        field: MetricField,
        baseline: &BrokerMetricsSample,
        challenger: &BrokerMetricsSample,
    ) -> Result<String, String> {
        let name = label(field);
        let (b, c) = (baseline.broker_name, challenger.broker_name);

        if self.config.measured_only {
            let (bq, cq) = (baseline.quality(field), challenger.quality(field));
            if bq != DataSource::Measured || cq != DataSource::Measured {
                return Err(format!(
                    "{name} suppressed: measured-only mode requires measured data ({b}={bq}, {c}={cq})"
                ));
            }
        }

        let base = baseline
            .metric(field)
            .filter(|v| v.is_finite() && v.abs() > NEAR_ZERO)
            .ok_or_else(|| format!("{name} suppressed: baseline {b} value is zero or unavailable"))?;
        let value = challenger
            .metric(field)
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("{name} suppressed: {c} value is unavailable"))?;

        Ok(format_delta((value - base) / base * 100.0))
    }

    /// Assemble the full report for one cycle.
    pub fn build_report(&self, snapshot: AggregateSnapshot, at: DateTime<Utc>) -> ComparisonReport {
        let ComparisonConfig {
            baseline,
            challenger,
            measured_only,
        } = self.config;

        let comparison = match (snapshot.get(baseline), snapshot.get(challenger)) {
            (Some(b), Some(c)) => self.compare(b, c),
            _ => {
                let absent = if snapshot.get(baseline).is_none() { baseline } else { challenger };
                Comparison {
                    deltas: ComparisonDeltas::default(),
                    suppressed_reasons: vec![format!(
                        "all comparisons suppressed: {absent} is not enabled"
                    )],
                }
            }
        };
        for reason in &comparison.suppressed_reasons {
            events::comparison_suppressed(reason);
        }

        let data_quality = summarize_quality(&snapshot);
        ComparisonReport {
            timestamp: at,
            amqp: snapshot.amqp,
            log_stream: snapshot.log_stream,
            pubsub: snapshot.pubsub,
            baseline,
            challenger,
            measured_only,
            comparison: comparison.deltas,
            suppressed_reasons: comparison.suppressed_reasons,
            data_quality,
        }
    }
}

/// Bucket every present broker by how far its data can be trusted.
pub fn summarize_quality(snapshot: &AggregateSnapshot) -> DataQualitySummary {
    let mut summary = DataQualitySummary::default();
    for sample in snapshot.samples() {
        match (sample.connected, sample.data_source) {
            (true, DataSource::Measured) => summary.measured_brokers.push(sample.broker_name),
            (true, DataSource::Fallback) => summary.fallback_brokers.push(sample.broker_name),
            _ => summary.missing_brokers.push(sample.broker_name),
        }
    }

    summary.summary = if summary.fallback_brokers.is_empty() && summary.missing_brokers.is_empty() {
        "all brokers report measured data".to_string()
    } else {
        let mut parts = Vec::new();
        for (tag, brokers) in [
            ("measured", &summary.measured_brokers),
            ("fallback", &summary.fallback_brokers),
            ("missing", &summary.missing_brokers),
        ] {
            if !brokers.is_empty() {
                let names: Vec<&str> = brokers.iter().map(|b| b.as_str()).collect();
                parts.push(format!("{tag}: {}", names.join(", ")));
            }
        }
        format!(
            "{}; comparisons involving fallback or missing brokers are indicative only",
            parts.join("; ")
        )
    };
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_has_explicit_sign() {
        assert_eq!(format_delta(20.0), "+20.0%");
        assert_eq!(format_delta(-12.345), "-12.3%");
        assert_eq!(format_delta(0.0), "+0.0%");
    }

    #[test]
    fn labels_cover_compared_fields() {
        let names: Vec<_> = MetricField::COMPARED.iter().map(|f| label(*f)).collect();
        assert_eq!(names, vec!["throughput", "p99 latency", "memory"]);
    }
}
