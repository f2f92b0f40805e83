//! "Has measured signal" guard for exposition scrapes.

use brokerscope_core::config::SignalGuardConfig;

use crate::exposition::PatternChain;

/// Signals pulled from one scrape. `None` means the text carried no match.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrapedSignals {
    pub throughput: Option<f64>,
    pub p99_latency_ms: Option<f64>,
    pub memory_mb: Option<f64>,
}

impl ScrapedSignals {
    /// Run the three chains over the same text.
    pub fn extract(
        text: &str,
        throughput: &PatternChain,
        p99_latency: &PatternChain,
        memory: &PatternChain,
    ) -> Self {
        Self {
            throughput: throughput.extract(text),
            p99_latency_ms: p99_latency.extract(text),
            memory_mb: memory.extract(text),
        }
    }
}

/// Treats a scrape as absent unless one signal clears its floor. All-zero or
/// placeholder scrapes would otherwise be classified as measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalGuard {
    min_throughput: f64,
    min_p99_latency_ms: f64,
    min_memory_mb: f64,
}

impl SignalGuard {
    pub fn new(config: &SignalGuardConfig) -> Self {
        Self {
            min_throughput: config.min_throughput,
            min_p99_latency_ms: config.min_p99_latency_ms,
            min_memory_mb: config.min_memory_mb,
        }
    }

    pub fn has_measured_signal(&self, signals: &ScrapedSignals) -> bool {
        above(signals.throughput, self.min_throughput)
            || above(signals.p99_latency_ms, self.min_p99_latency_ms)
            || above(signals.memory_mb, self.min_memory_mb)
    }
}

impl Default for SignalGuard {
    fn default() -> Self {
        Self::new(&SignalGuardConfig::default())
    }
}

fn above(value: Option<f64>, floor: f64) -> bool {
    value.is_some_and(|v| v > floor)
}
