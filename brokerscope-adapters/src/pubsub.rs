//! Pub-sub broker adapter with four tiers: admin listing, per-broker load
//! report, guarded exposition scrape, synthetic oscillation.

use std::f64::consts::PI;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use brokerscope_core::config::PubSubConfig;
use brokerscope_core::errors::{AdapterError, ScopeResult};
use brokerscope_core::models::{millis_to_datetime, BrokerKind, BrokerMetricsSample, DataSource, MetricField};
use brokerscope_core::traits::{IBrokerCollector, IClock};
use brokerscope_observability::tracing_setup::events;
use brokerscope_sampling::{patterns, PatternChain, ScrapedSignals, SignalGuard};

use crate::http::{fetch, join_url, IHttpTransport};

/// Period of the synthetic oscillation.
const SYNTHETIC_PERIOD_SECS: f64 = 120.0;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadReport {
    msg_rate_in: Option<f64>,
    num_producers: Option<f64>,
    num_consumers: Option<f64>,
    system_resource_usage: Option<SystemResourceUsage>,
}

#[derive(Debug, Default, Deserialize)]
struct SystemResourceUsage {
    memory: Option<ResourceUsage>,
    cpu: Option<ResourceUsage>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceUsage {
    usage: Option<f64>,
}

pub struct PubSubCollector {
    config: PubSubConfig,
    transport: Arc<dyn IHttpTransport>,
    clock: Arc<dyn IClock>,
    guard: SignalGuard,
    throughput: PatternChain,
    p99_latency: PatternChain,
    memory: PatternChain,
}

impl PubSubCollector {
    pub fn new(config: PubSubConfig, transport: Arc<dyn IHttpTransport>, clock: Arc<dyn IClock>) -> Self {
        let guard = SignalGuard::new(&config.signal_guard);
        Self {
            config,
            transport,
            clock,
            guard,
            throughput: patterns::pubsub_throughput(),
            p99_latency: patterns::pubsub_p99_latency(),
            memory: patterns::memory(),
        }
    }

    async fn list_brokers(&self) -> ScopeResult<Vec<String>> {
        let url = join_url(
            &self.config.admin_url,
            &format!("/admin/v2/brokers/{}", self.config.cluster),
        );
        fetch(self.transport.as_ref(), &url, None).await
    }

    async fn from_load_report(&self, at: DateTime<Utc>) -> ScopeResult<BrokerMetricsSample> {
        let url = join_url(&self.config.admin_url, "/admin/v2/broker-stats/load-report");
        let report: LoadReport = fetch(self.transport.as_ref(), &url, None).await?;
        let rate_in = report.msg_rate_in.ok_or_else(|| AdapterError::NoSignal {
            source_name: url.clone(),
        })?;

        let mut sample = BrokerMetricsSample::connected(BrokerKind::PubSub, at);
        sample.set_metric(MetricField::MessagesPerSecond, rate_in, DataSource::Measured);
        let connections = match (report.num_producers, report.num_consumers) {
            (None, None) => None,
            (p, c) => Some(p.unwrap_or(0.0) + c.unwrap_or(0.0)),
        };
        sample.set_metric_opt(MetricField::ConnectionCount, connections, DataSource::Measured);
        let usage = report.system_resource_usage.unwrap_or_default();
        sample.set_metric_opt(
            MetricField::MemoryUsageMb,
            usage.memory.and_then(|m| m.usage),
            DataSource::Measured,
        );
        sample.set_metric_opt(
            MetricField::CpuPercentage,
            usage.cpu.and_then(|c| c.usage),
            DataSource::Measured,
        );
        sample.mark_missing(MetricField::P99LatencyMs);
        sample.data_source = DataSource::Measured;
        Ok(sample)
    }

    async fn from_exposition(&self, at: DateTime<Utc>) -> ScopeResult<BrokerMetricsSample> {
        let url = self.config.effective_metrics_url();
        let text = self.transport.get_text(&url, None).await?;
        let signals = ScrapedSignals::extract(&text, &self.throughput, &self.p99_latency, &self.memory);
        if !self.guard.has_measured_signal(&signals) {
            return Err(AdapterError::NoSignal { source_name: url }.into());
        }

        let mut sample = BrokerMetricsSample::connected(BrokerKind::PubSub, at);
        sample.set_metric_opt(MetricField::MessagesPerSecond, signals.throughput, DataSource::Measured);
        sample.set_metric_opt(MetricField::P99LatencyMs, signals.p99_latency_ms, DataSource::Measured);
        sample.set_metric_opt(MetricField::MemoryUsageMb, signals.memory_mb, DataSource::Measured);
        sample.data_source = DataSource::Measured;
        Ok(sample)
    }

    /// Last tier. Never tagged `measured`.
    fn synthetic(&self, now_millis: i64) -> BrokerMetricsSample {
        let at = millis_to_datetime(now_millis);
        let mut sample = BrokerMetricsSample::connected(BrokerKind::PubSub, at);
        if !self.config.synthetic_fallback {
            for field in MetricField::COMPARED {
                sample.mark_missing(field);
            }
            sample.data_source = DataSource::Missing;
            return sample;
        }

        let wave = synthetic_wave(now_millis);
        sample.set_metric(MetricField::MessagesPerSecond, 1000.0 + 250.0 * wave, DataSource::Fallback);
        sample.set_metric(MetricField::P99LatencyMs, 15.0 + 5.0 * wave, DataSource::Fallback);
        sample.set_metric(MetricField::MemoryUsageMb, 512.0 + 64.0 * wave, DataSource::Fallback);
        sample
            .topic_stats
            .insert("synthetic".to_string(), serde_json::Value::Bool(true));
        sample.data_source = DataSource::Fallback;
        sample
    }
}

/// `sin(2πt / period)` for `t` in seconds.
pub fn synthetic_wave(now_millis: i64) -> f64 {
    let t = now_millis as f64 / 1000.0;
    (2.0 * PI * t / SYNTHETIC_PERIOD_SECS).sin()
}

#[async_trait]
impl IBrokerCollector for PubSubCollector {
    fn kind(&self) -> BrokerKind {
        BrokerKind::PubSub
    }

    async fn collect(&self) -> ScopeResult<BrokerMetricsSample> {
        let now = self.clock.now_millis();
        let at = millis_to_datetime(now);

        let brokers = match self.list_brokers().await {
            Ok(b) if !b.is_empty() => b,
            Ok(_) => {
                events::adapter_failed(BrokerKind::PubSub, "admin listed no brokers");
                return Ok(BrokerMetricsSample::disconnected(BrokerKind::PubSub, at));
            }
            Err(e) if e.is_connection() => {
                events::adapter_failed(BrokerKind::PubSub, &e.to_string());
                return Ok(BrokerMetricsSample::disconnected(BrokerKind::PubSub, at));
            }
            Err(e) => return Err(e),
        };

        let load_report = match self.from_load_report(at).await {
            Ok(sample) => Some(sample),
            Err(e) if e.is_not_found() => {
                tracing::debug!(error = %e, "pubsub load report not exposed");
                None
            }
            Err(e) if e.is_connection() => {
                events::tier_fallback(BrokerKind::PubSub, "load-report", "exposition", &e.to_string());
                None
            }
            Err(e) => return Err(e),
        };

        let mut sample = match load_report {
            Some(sample) => sample,
            None => match self.from_exposition(at).await {
                Ok(sample) => sample,
                Err(e) if e.is_connection() => {
                    events::tier_fallback(BrokerKind::PubSub, "exposition", "synthetic", &e.to_string());
                    self.synthetic(now)
                }
                Err(e) => return Err(e),
            },
        };

        sample.topic_stats.insert("brokers".to_string(), serde_json::json!(brokers));
        sample.enforce_quality_invariant();
        events::sample_collected(BrokerKind::PubSub, true, sample.data_source);
        Ok(sample)
    }
}
