//! A broker collector that replays a script instead of calling a broker.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use brokerscope_core::errors::{AdapterError, ScopeResult};
use brokerscope_core::models::{BrokerKind, BrokerMetricsSample, DataSource, MetricField};
use brokerscope_core::traits::IBrokerCollector;

#[derive(Debug, Clone, Copy)]
pub enum Script {
    Measured { rate: f64, p99: f64, memory: f64 },
    Fallback { rate: f64 },
    Disconnected,
    Fail,
    Panic,
}

pub struct ScriptedCollector {
    kind: BrokerKind,
    script: Mutex<Script>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedCollector {
    pub fn new(kind: BrokerKind, script: Script) -> Arc<Self> {
        Self::with_delay(kind, script, Duration::ZERO)
    }

    /// Every `collect` sleeps for `delay` before answering.
    pub fn with_delay(kind: BrokerKind, script: Script, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            kind,
            script: Mutex::new(script),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, script: Script) {
        *self.script.lock() = script;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A connected sample with all three compared fields measured.
pub fn measured(kind: BrokerKind, rate: f64, p99: f64, memory: f64, at: DateTime<Utc>) -> BrokerMetricsSample {
    let mut s = BrokerMetricsSample::connected(kind, at);
    s.set_metric(MetricField::MessagesPerSecond, rate, DataSource::Measured);
    s.set_metric(MetricField::P99LatencyMs, p99, DataSource::Measured);
    s.set_metric(MetricField::MemoryUsageMb, memory, DataSource::Measured);
    s.data_source = DataSource::Measured;
    s
}

/// A connected sample with only a fallback throughput.
pub fn fallback(kind: BrokerKind, rate: f64, at: DateTime<Utc>) -> BrokerMetricsSample {
    let mut s = BrokerMetricsSample::connected(kind, at);
    s.set_metric(MetricField::MessagesPerSecond, rate, DataSource::Fallback);
    s.mark_missing(MetricField::P99LatencyMs);
    s.data_source = DataSource::Fallback;
    s
}

#[async_trait]
impl IBrokerCollector for ScriptedCollector {
    fn kind(&self) -> BrokerKind {
        self.kind
    }

    async fn collect(&self) -> ScopeResult<BrokerMetricsSample> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let script = *self.script.lock();
        let now = Utc::now();
        match script {
            Script::Measured { rate, p99, memory } => Ok(measured(self.kind, rate, p99, memory, now)),
            Script::Fallback { rate } => Ok(fallback(self.kind, rate, now)),
            Script::Disconnected => Ok(BrokerMetricsSample::disconnected(self.kind, now)),
            Script::Fail => Err(AdapterError::ConnectionFailed {
                endpoint: format!("{}-admin", self.kind),
                reason: "connection refused".into(),
            }
            .into()),
            Script::Panic => panic!("collector for {} panicked", self.kind),
        }
    }
}
