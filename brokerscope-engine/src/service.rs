//! [`MetricsService`]: read-through report cache with single-flight
//! collection, per-broker persistence, history, retention, and health.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::Instrument;

use brokerscope_adapters::ReqwestTransport;
use brokerscope_core::config::{HistoryConfig, ScopeConfig};
use brokerscope_core::constants::CURRENT_METRICS_CACHE_KEY;
use brokerscope_core::errors::{ScopeError, ScopeResult};
use brokerscope_core::models::{
    AggregateSnapshot, BrokerHealth, BrokerKind, ComparisonReport, DataSource, HealthStatus,
    HistoricalMetrics,
};
use brokerscope_core::traits::{IClock, IMetricsStore, SystemClock};
use brokerscope_observability::tracing_setup::events;
use brokerscope_observability::{
    collection_span, evaluate_alerts, CollectorCounters, CollectorStats, DegradationAlert,
    DegradationEvent, DegradationTracker, TrackedDegradation,
};
use brokerscope_storage::SqliteMetricsStore;

use crate::aggregator::MetricsAggregator;
use crate::comparison::ComparisonEngine;
use crate::history;

/// Closed degradation entries older than this are dropped.
const DEGRADATION_RETENTION_HOURS: i64 = 48;

pub struct MetricsService {
    aggregator: MetricsAggregator,
    comparison: ComparisonEngine,
    store: Arc<dyn IMetricsStore>,
    clock: Arc<dyn IClock>,
    history: HistoryConfig,
    cache: Cache<String, Arc<ComparisonReport>>,
    /// Held for the whole of a collection; at most one runs at a time.
    gate: tokio::sync::Mutex<()>,
    /// Bumped after every completed collection.
    generation: AtomicU64,
    counters: Arc<CollectorCounters>,
    degradation: Mutex<DegradationTracker>,
}

impl MetricsService {
    pub fn new(
        config: &ScopeConfig,
        aggregator: MetricsAggregator,
        store: Arc<dyn IMetricsStore>,
        clock: Arc<dyn IClock>,
    ) -> Self {
        let counters = Arc::clone(aggregator.counters());
        let cache = Cache::builder()
            .max_capacity(config.cache.max_capacity)
            .time_to_live(Duration::from_secs(config.cache.ttl_secs))
            .build();
        Self {
            aggregator,
            comparison: ComparisonEngine::new(config.comparison),
            store,
            clock,
            history: config.history.clone(),
            cache,
            gate: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
            counters,
            degradation: Mutex::new(DegradationTracker::new()),
        }
    }

    /// Production wiring: reqwest transport, SQLite store, system clock.
    pub fn from_config(config: &ScopeConfig) -> ScopeResult<Self> {
        config.validate()?;
        let clock: Arc<dyn IClock> = Arc::new(SystemClock);
        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        let aggregator = MetricsAggregator::from_config(config, transport, clock.clone());
        let store = Arc::new(SqliteMetricsStore::from_config(&config.storage)?);
        Ok(Self::new(config, aggregator, store, clock))
    }

    /// The cached report, or a fresh one. `force_refresh` skips the cache
    /// read but still refreshes it. Concurrent callers share one collection.
    pub async fn get_current_metrics(&self, force_refresh: bool) -> ScopeResult<Arc<ComparisonReport>> {
        if !force_refresh {
            if let Some(report) = self.cached() {
                return Ok(report);
            }
        }

        let observed = self.generation.load(Ordering::Acquire);
        let _gate = self.gate.lock().await;

        // A collection finished while we waited: its result is ours.
        let superseded = self.generation.load(Ordering::Acquire) != observed;
        if superseded || !force_refresh {
            if let Some(report) = self.cached() {
                return Ok(report);
            }
        }

        self.counters.record_cache_miss();
        events::cache_miss(CURRENT_METRICS_CACHE_KEY, force_refresh);
        let report = self
            .refresh()
            .instrument(collection_span!(force_refresh))
            .await?;
        self.generation.fetch_add(1, Ordering::Release);
        Ok(report)
    }

    /// Drop the cached report.
    pub fn clear_cache(&self) {
        self.cache.invalidate(CURRENT_METRICS_CACHE_KEY);
    }

    fn cached(&self) -> Option<Arc<ComparisonReport>> {
        let report = self.cache.get(CURRENT_METRICS_CACHE_KEY)?;
        self.counters.record_cache_hit();
        events::cache_hit(CURRENT_METRICS_CACHE_KEY);
        Some(report)
    }

    async fn refresh(&self) -> ScopeResult<Arc<ComparisonReport>> {
        self.counters.record_cycle();
        let at = self.clock.now();
        let snapshot = self.aggregator.collect_all().await.stamped(at);

        self.track_degradation(&snapshot, at);
        self.persist(&snapshot).await;

        let report = Arc::new(self.comparison.build_report(snapshot, at));
        self.cache
            .insert(CURRENT_METRICS_CACHE_KEY.to_string(), Arc::clone(&report));
        Ok(report)
    }

    /// One blocking write per broker; failures are logged and counted only.
    async fn persist(&self, snapshot: &AggregateSnapshot) {
        let writes: Vec<_> = snapshot
            .samples()
            .into_iter()
            .map(|sample| {
                let store = Arc::clone(&self.store);
                let sample = sample.clone();
                let kind = sample.broker_name;
                (kind, tokio::task::spawn_blocking(move || store.insert(&sample)))
            })
            .collect();

        for (kind, write) in writes {
            let error = match write.await {
                Ok(Ok(_)) => {
                    self.counters.record_persisted();
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(join) => join.to_string(),
            };
            self.counters.record_persistence_failure();
            events::persistence_failed(kind, &error);
        }
    }

    /// One tracker entry per transition into a degraded tier; a broker that
    /// stays on the same tier only refreshes its entry.
    fn track_degradation(&self, snapshot: &AggregateSnapshot, at: DateTime<Utc>) {
        let mut tracker = self.degradation.lock();
        for sample in snapshot.samples() {
            let broker = sample.broker_name;
            match (sample.connected, sample.data_source) {
                (true, DataSource::Measured) => tracker.mark_recovered(broker, at),
                (false, _) => {
                    tracker.record(DegradationEvent::new(
                        broker,
                        "unreachable",
                        DataSource::Missing.as_str(),
                        at,
                    ));
                }
                (true, source) => {
                    tracker.record(DegradationEvent::new(
                        broker,
                        format!("{source} data"),
                        source.as_str(),
                        at,
                    ));
                }
            }
        }
        tracker.compact(chrono::Duration::hours(DEGRADATION_RETENTION_HOURS), at);
    }

    /// Aligned samples for the last `hours` (clamped to the configured bounds).
    pub async fn get_historical_metrics(&self, hours: i64) -> ScopeResult<HistoricalMetrics> {
        let hours = history::clamp_hours(hours, &self.history);
        let range = history::time_range(self.clock.now(), hours);
        let store = Arc::clone(&self.store);
        let from = range.from;
        let rows = tokio::task::spawn_blocking(move || store.find_since(from))
            .await
            .map_err(join_err)??;
        Ok(HistoricalMetrics {
            time_range: range,
            samples: history::align_by_timestamp(rows),
        })
    }

    /// Delete samples older than `days_to_keep` days (configured default when `None`).
    pub async fn prune_old_metrics(&self, days_to_keep: Option<u32>) -> ScopeResult<usize> {
        let days = days_to_keep.unwrap_or(self.history.default_retention_days);
        let cutoff = self.clock.now() - chrono::Duration::days(i64::from(days));
        let store = Arc::clone(&self.store);
        let deleted = tokio::task::spawn_blocking(move || store.delete_before(cutoff))
            .await
            .map_err(join_err)??;
        events::retention_pruned(deleted, days);
        Ok(deleted)
    }

    /// Live quick check of one broker, bypassing the cache. Serialized with
    /// collections so rate snapshots are never updated concurrently.
    pub async fn check_broker_health(&self, kind: BrokerKind) -> BrokerHealth {
        let _gate = self.gate.lock().await;
        match self.aggregator.collect_one(kind).await {
            Some(sample) => BrokerHealth::from_sample(&sample),
            None => BrokerHealth {
                broker: kind,
                status: HealthStatus::Unhealthy,
                connected: false,
                data_source: DataSource::Missing,
                message: Some(format!("{kind} adapter is disabled")),
            },
        }
    }

    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&self.degradation.lock(), self.clock.now())
    }

    /// Copy of the tracked degradation entries.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.degradation.lock().events().to_vec()
    }

    pub fn stats(&self) -> CollectorStats {
        self.counters.snapshot()
    }

    pub fn store(&self) -> &Arc<dyn IMetricsStore> {
        &self.store
    }
}

fn join_err(e: tokio::task::JoinError) -> ScopeError {
    ScopeError::Aggregation {
        reason: format!("blocking store task failed: {e}"),
    }
}
