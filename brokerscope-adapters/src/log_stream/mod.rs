//! Log-stream broker adapter.
//!
//! Primary: the optional REST proxy (aggregates, tagged `fallback`).
//! Fallback: the native admin client, summing high-water offsets of every
//! non-internal topic into one counter for the rate sampler, plus an
//! exposition scrape for p99 latency and memory.

pub mod admin;
#[cfg(feature = "native-admin")]
pub mod native;
mod proxy;

use std::sync::Arc;

use async_trait::async_trait;

use brokerscope_core::config::LogStreamConfig;
use brokerscope_core::errors::{AdapterError, ScopeResult};
use brokerscope_core::models::{millis_to_datetime, BrokerKind, BrokerMetricsSample, DataSource, MetricField};
use brokerscope_core::traits::{IBrokerCollector, IClock};
use brokerscope_observability::tracing_setup::events;
use brokerscope_sampling::{patterns, PatternChain, RateSampler};

use crate::http::{fetch, join_url, IHttpTransport};
use proxy::{BrokerListing, BrokerStats, TopicListing, Total};

pub use admin::{ILogAdminClient, TopicInfo};

/// Rate sampler key for the summed high-water offsets.
pub const HIGH_WATERMARKS_KEY: &str = "log-stream:high_watermarks";

/// The native admin client when built with `native-admin`, otherwise none.
pub fn default_admin_client(config: &LogStreamConfig) -> Option<Arc<dyn ILogAdminClient>> {
    #[cfg(feature = "native-admin")]
    {
        Some(Arc::new(native::KafkaAdminClient::new(config)))
    }
    #[cfg(not(feature = "native-admin"))]
    {
        let _ = config;
        None
    }
}

pub struct LogStreamCollector {
    config: LogStreamConfig,
    transport: Arc<dyn IHttpTransport>,
    admin: Option<Arc<dyn ILogAdminClient>>,
    clock: Arc<dyn IClock>,
    sampler: RateSampler,
    p99_latency: PatternChain,
    memory: PatternChain,
}

impl LogStreamCollector {
    pub fn new(
        config: LogStreamConfig,
        transport: Arc<dyn IHttpTransport>,
        admin: Option<Arc<dyn ILogAdminClient>>,
        clock: Arc<dyn IClock>,
    ) -> Self {
        Self {
            config,
            transport,
            admin,
            clock,
            sampler: RateSampler::new(),
            p99_latency: patterns::log_stream_p99_latency(),
            memory: patterns::memory(),
        }
    }

    pub fn sampler(&self) -> &RateSampler {
        &self.sampler
    }

    async fn collect_via_proxy(&self, proxy_url: &str, now: i64) -> ScopeResult<BrokerMetricsSample> {
        let listing: BrokerListing =
            fetch(self.transport.as_ref(), &join_url(proxy_url, "/brokers"), None).await?;
        let ids = listing.ids();

        let mut throughput = Total::default();
        let mut memory = Total::default();
        let mut connections = Total::default();
        for id in &ids {
            let url = join_url(proxy_url, &format!("/brokers/{id}/stats"));
            match fetch::<BrokerStats>(self.transport.as_ref(), &url, None).await {
                Ok(stats) => {
                    throughput.add(stats.messages_in_per_sec);
                    memory.add(stats.memory_used_mb);
                    connections.add(stats.connection_count);
                }
                Err(e) => tracing::debug!(broker_id = %id, error = %e, "skipping broker stats"),
            }
        }

        let mut sample = BrokerMetricsSample::connected(BrokerKind::LogStream, millis_to_datetime(now));
        sample.set_metric_opt(MetricField::MessagesPerSecond, throughput.get(), DataSource::Fallback);
        sample.set_metric_opt(MetricField::MemoryUsageMb, memory.get(), DataSource::Fallback);
        sample.set_metric_opt(MetricField::ConnectionCount, connections.get(), DataSource::Fallback);
        sample.mark_missing(MetricField::P99LatencyMs);
        sample.broker_count = Some(ids.len() as u64);

        match fetch::<TopicListing>(self.transport.as_ref(), &join_url(proxy_url, "/topics"), None).await {
            Ok(listing) => {
                let topics: Vec<TopicInfo> = listing
                    .topics
                    .into_iter()
                    .map(|t| TopicInfo {
                        name: t.name,
                        partitions: t.partitions,
                        internal: t.internal,
                    })
                    .filter(|t| !t.is_internal())
                    .collect();
                sample.partition_count = Some(topics.iter().map(|t| u64::from(t.partitions)).sum());
                for t in topics {
                    sample
                        .topic_stats
                        .insert(t.name, serde_json::json!({ "partitions": t.partitions }));
                }
            }
            Err(e) => tracing::debug!(error = %e, "proxy topic listing unavailable"),
        }

        sample.data_source = DataSource::Fallback;
        Ok(sample)
    }

    async fn collect_via_admin(
        &self,
        admin: &dyn ILogAdminClient,
        now: i64,
    ) -> ScopeResult<BrokerMetricsSample> {
        let topics: Vec<TopicInfo> = admin
            .list_topics()
            .await?
            .into_iter()
            .filter(|t| !t.is_internal())
            .collect();
        let names: Vec<String> = topics.iter().map(|t| t.name.clone()).collect();
        let watermarks = admin.high_watermarks(&names).await?;

        let mut sample = BrokerMetricsSample::connected(BrokerKind::LogStream, millis_to_datetime(now));
        let mut total_offsets = 0.0;
        let mut partitions = 0u64;
        for name in &names {
            let offsets = watermarks.get(name).map(Vec::as_slice).unwrap_or_default();
            let topic_total: i64 = offsets.iter().map(|o| (*o).max(0)).sum();
            total_offsets += topic_total as f64;
            partitions += offsets.len() as u64;
            sample.topic_stats.insert(
                name.clone(),
                serde_json::json!({ "partitions": offsets.len(), "highWatermark": topic_total }),
            );
        }
        sample.partition_count = Some(partitions);
        sample.broker_count = admin.broker_count().await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "broker count unavailable");
            None
        });

        let rate = self.sampler.sample(HIGH_WATERMARKS_KEY, total_offsets, now);
        sample.set_metric_opt(
            MetricField::MessagesPerSecond,
            rate.map(|r| r as f64),
            DataSource::Measured,
        );

        let url = self.config.effective_metrics_url();
        match self.transport.get_text(&url, None).await {
            Ok(text) => {
                sample.set_metric_opt(MetricField::P99LatencyMs, self.p99_latency.extract(&text), DataSource::Measured);
                sample.set_metric_opt(MetricField::MemoryUsageMb, self.memory.extract(&text), DataSource::Measured);
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "log-stream scrape failed");
                sample.mark_missing(MetricField::P99LatencyMs);
                sample.mark_missing(MetricField::MemoryUsageMb);
            }
        }

        sample.data_source = if rate.is_some() {
            DataSource::Measured
        } else {
            DataSource::Missing
        };
        sample.enforce_quality_invariant();
        Ok(sample)
    }
}

#[async_trait]
impl IBrokerCollector for LogStreamCollector {
    fn kind(&self) -> BrokerKind {
        BrokerKind::LogStream
    }

    async fn collect(&self) -> ScopeResult<BrokerMetricsSample> {
        let now = self.clock.now_millis();

        if let Some(proxy_url) = self.config.proxy_url.as_deref() {
            match self.collect_via_proxy(proxy_url, now).await {
                Ok(sample) => {
                    events::sample_collected(BrokerKind::LogStream, true, sample.data_source);
                    return Ok(sample);
                }
                Err(e) if e.is_connection() => {
                    events::tier_fallback(BrokerKind::LogStream, "proxy", "native-admin", &e.to_string())
                }
                Err(e) => return Err(e),
            }
        }

        let result = match self.admin.as_deref() {
            Some(admin) => self.collect_via_admin(admin, now).await,
            None => Err(AdapterError::ConnectionFailed {
                endpoint: self.config.bootstrap_servers.join(","),
                reason: "native admin client not configured".to_string(),
            }
            .into()),
        };

        match result {
            Ok(sample) => {
                events::sample_collected(BrokerKind::LogStream, true, sample.data_source);
                Ok(sample)
            }
            Err(e) if e.is_connection() => {
                events::adapter_failed(BrokerKind::LogStream, &e.to_string());
                Ok(BrokerMetricsSample::disconnected(BrokerKind::LogStream, millis_to_datetime(now)))
            }
            Err(e) => Err(e),
        }
    }
}
