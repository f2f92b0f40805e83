//! AMQP broker adapter: management API for queue totals and node stats,
//! optional exposition scrape for the p99 quantile.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use brokerscope_core::config::AmqpConfig;
use brokerscope_core::constants::BYTES_PER_MB;
use brokerscope_core::errors::ScopeResult;
use brokerscope_core::models::{millis_to_datetime, BrokerKind, BrokerMetricsSample, DataSource, MetricField};
use brokerscope_core::traits::{IBrokerCollector, IClock};
use brokerscope_observability::tracing_setup::events;
use brokerscope_sampling::{patterns, PatternChain, RateSampler};

use crate::http::{fetch, join_url, BasicAuth, IHttpTransport};
use crate::uptime::format_uptime_ms;

/// Rate sampler key for `messages_ready + messages_unacknowledged`.
pub const QUEUE_TOTALS_KEY: &str = "amqp:queue_totals";

#[derive(Debug, Default, Deserialize)]
struct Overview {
    #[serde(default)]
    queue_totals: QueueTotals,
    #[serde(default)]
    object_totals: ObjectTotals,
}

#[derive(Debug, Default, Deserialize)]
struct QueueTotals {
    #[serde(default)]
    messages_ready: f64,
    #[serde(default)]
    messages_unacknowledged: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ObjectTotals {
    connections: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NodeStats {
    /// Bytes.
    mem_used: Option<f64>,
    /// Milliseconds.
    uptime: Option<u64>,
}

pub struct AmqpCollector {
    config: AmqpConfig,
    auth: BasicAuth,
    transport: Arc<dyn IHttpTransport>,
    clock: Arc<dyn IClock>,
    sampler: RateSampler,
    p99_latency: PatternChain,
}

impl AmqpCollector {
    pub fn new(config: AmqpConfig, transport: Arc<dyn IHttpTransport>, clock: Arc<dyn IClock>) -> Self {
        let auth = BasicAuth::new(&config.username, &config.password);
        Self {
            config,
            auth,
            transport,
            clock,
            sampler: RateSampler::new(),
            p99_latency: patterns::amqp_p99_latency(),
        }
    }

    /// The collector's own sampler, for diagnostics.
    pub fn sampler(&self) -> &RateSampler {
        &self.sampler
    }

    async fn node_stats(&self) -> ScopeResult<Option<NodeStats>> {
        let url = join_url(&self.config.management_url, "/api/nodes");
        let nodes: Vec<NodeStats> = fetch(self.transport.as_ref(), &url, Some(&self.auth)).await?;
        Ok(nodes.into_iter().next())
    }

    async fn scrape_p99(&self) -> Option<f64> {
        let url = self.config.metrics_url.as_deref()?;
        match self.transport.get_text(url, None).await {
            Ok(text) => self.p99_latency.extract(&text),
            Err(e) if e.is_not_found() => {
                tracing::debug!(url, "amqp latency exposition not exposed");
                None
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "amqp latency scrape failed");
                None
            }
        }
    }
}

#[async_trait]
impl IBrokerCollector for AmqpCollector {
    fn kind(&self) -> BrokerKind {
        BrokerKind::Amqp
    }

    async fn collect(&self) -> ScopeResult<BrokerMetricsSample> {
        let now = self.clock.now_millis();
        let at = millis_to_datetime(now);

        let overview_url = join_url(&self.config.management_url, "/api/overview");
        let overview: Overview =
            match fetch(self.transport.as_ref(), &overview_url, Some(&self.auth)).await {
                Ok(o) => o,
                Err(e) if e.is_connection() => {
                    events::adapter_failed(BrokerKind::Amqp, &e.to_string());
                    return Ok(BrokerMetricsSample::disconnected(BrokerKind::Amqp, at));
                }
                Err(e) => return Err(e),
            };

        let mut sample = BrokerMetricsSample::connected(BrokerKind::Amqp, at);
        let totals = &overview.queue_totals;
        let backlog = totals.messages_ready + totals.messages_unacknowledged;
        sample.topic_stats.insert(
            "queueTotals".to_string(),
            serde_json::json!({
                "messagesReady": totals.messages_ready,
                "messagesUnacknowledged": totals.messages_unacknowledged,
            }),
        );

        let rate = self.sampler.sample(QUEUE_TOTALS_KEY, backlog, now);
        sample.set_metric_opt(
            MetricField::MessagesPerSecond,
            rate.map(|r| r as f64),
            DataSource::Measured,
        );
        sample.set_metric_opt(
            MetricField::ConnectionCount,
            overview.object_totals.connections,
            DataSource::Measured,
        );

        match self.node_stats().await {
            Ok(Some(node)) => {
                sample.set_metric_opt(
                    MetricField::MemoryUsageMb,
                    node.mem_used.map(|b| b / BYTES_PER_MB),
                    DataSource::Measured,
                );
                sample.uptime = node.uptime.map(format_uptime_ms);
            }
            Ok(None) => sample.mark_missing(MetricField::MemoryUsageMb),
            Err(e) => {
                tracing::debug!(error = %e, "amqp node stats unavailable");
                sample.mark_missing(MetricField::MemoryUsageMb);
            }
        }

        let p99 = self.scrape_p99().await;
        sample.set_metric_opt(MetricField::P99LatencyMs, p99, DataSource::Measured);

        sample.data_source = if rate.is_some() && p99.is_some() {
            DataSource::Measured
        } else {
            DataSource::Missing
        };
        sample.enforce_quality_invariant();

        events::sample_collected(BrokerKind::Amqp, true, sample.data_source);
        Ok(sample)
    }
}
