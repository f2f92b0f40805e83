//! Concurrent fan-out over every enabled adapter with per-adapter isolation.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use brokerscope_adapters::{default_admin_client, AmqpCollector, IHttpTransport, LogStreamCollector, PubSubCollector};
use brokerscope_core::config::ScopeConfig;
use brokerscope_core::errors::ScopeResult;
use brokerscope_core::models::{AggregateSnapshot, BrokerKind, BrokerMetricsSample};
use brokerscope_core::traits::{IBrokerCollector, IClock};
use brokerscope_observability::tracing_setup::events;
use brokerscope_observability::{adapter_span, CollectorCounters};

pub struct MetricsAggregator {
    amqp: Arc<dyn IBrokerCollector>,
    log_stream: Arc<dyn IBrokerCollector>,
    pubsub: Option<Arc<dyn IBrokerCollector>>,
    clock: Arc<dyn IClock>,
    counters: Arc<CollectorCounters>,
}

impl MetricsAggregator {
    /// `pubsub` is `None` when its feature flag is off.
    pub fn new(
        amqp: Arc<dyn IBrokerCollector>,
        log_stream: Arc<dyn IBrokerCollector>,
        pubsub: Option<Arc<dyn IBrokerCollector>>,
        clock: Arc<dyn IClock>,
    ) -> Self {
        Self {
            amqp,
            log_stream,
            pubsub,
            clock,
            counters: Arc::new(CollectorCounters::new()),
        }
    }

    /// Build the three adapters from configuration over one transport.
    pub fn from_config(
        config: &ScopeConfig,
        transport: Arc<dyn IHttpTransport>,
        clock: Arc<dyn IClock>,
    ) -> Self {
        let amqp = AmqpCollector::new(config.amqp.clone(), transport.clone(), clock.clone());
        let log_stream = LogStreamCollector::new(
            config.log_stream.clone(),
            transport.clone(),
            default_admin_client(&config.log_stream),
            clock.clone(),
        );
        let pubsub = config.pubsub.enabled.then(|| {
            Arc::new(PubSubCollector::new(config.pubsub.clone(), transport, clock.clone()))
                as Arc<dyn IBrokerCollector>
        });
        Self::new(Arc::new(amqp), Arc::new(log_stream), pubsub, clock)
    }

    /// Share counters with the owning service.
    pub fn with_counters(mut self, counters: Arc<CollectorCounters>) -> Self {
        self.counters = counters;
        self
    }

    pub fn counters(&self) -> &Arc<CollectorCounters> {
        &self.counters
    }

    pub fn pubsub_enabled(&self) -> bool {
        self.pubsub.is_some()
    }

    pub fn collector(&self, kind: BrokerKind) -> Option<&Arc<dyn IBrokerCollector>> {
        match kind {
            BrokerKind::Amqp => Some(&self.amqp),
            BrokerKind::LogStream => Some(&self.log_stream),
            BrokerKind::PubSub => self.pubsub.as_ref(),
        }
    }

    /// Run every enabled adapter concurrently. Never fails: an adapter error
    /// or panic becomes a disconnected sample for that broker.
    pub async fn collect_all(&self) -> AggregateSnapshot {
        let amqp = spawn_collect(&self.amqp);
        let log_stream = spawn_collect(&self.log_stream);
        let pubsub = self.pubsub.as_ref().map(spawn_collect);

        let (amqp, log_stream, pubsub) = tokio::join!(amqp, log_stream, async move {
            match pubsub {
                Some(handle) => Some(handle.await),
                None => None,
            }
        });

        AggregateSnapshot {
            amqp: self.settle(BrokerKind::Amqp, amqp),
            log_stream: self.settle(BrokerKind::LogStream, log_stream),
            pubsub: pubsub.map(|r| self.settle(BrokerKind::PubSub, r)),
        }
    }

    /// Collect a single broker; `None` when that broker is not enabled.
    pub async fn collect_one(&self, kind: BrokerKind) -> Option<BrokerMetricsSample> {
        let collector = self.collector(kind)?;
        let result = spawn_collect(collector).await;
        Some(self.settle(kind, result))
    }

    fn settle(
        &self,
        kind: BrokerKind,
        result: Result<ScopeResult<BrokerMetricsSample>, tokio::task::JoinError>,
    ) -> BrokerMetricsSample {
        let error = match result {
            Ok(Ok(sample)) if sample.broker_name == kind => return sample,
            Ok(Ok(sample)) => format!("adapter returned a sample for {}", sample.broker_name),
            Ok(Err(e)) => e.to_string(),
            Err(join) => format!("adapter task failed: {join}"),
        };
        self.counters.record_adapter_failure();
        events::adapter_failed(kind, &error);
        BrokerMetricsSample::disconnected(kind, self.clock.now())
    }
}

fn spawn_collect(collector: &Arc<dyn IBrokerCollector>) -> JoinHandle<ScopeResult<BrokerMetricsSample>> {
    let collector = Arc::clone(collector);
    let span = adapter_span!(collector.kind());
    tokio::spawn(async move { collector.collect().await }.instrument(span))
}
