//! # brokerscope-sampling
//!
//! The two leaf primitives every broker adapter builds on: a rate sampler that
//! turns monotonically increasing counters into per-second rates by snapshot
//! differencing, and an exposition-text parser that evaluates an ordered chain
//! of metric patterns with unit normalization.

pub mod exposition;
pub mod guard;
pub mod patterns;
pub mod rate;

pub use exposition::{Normalizer, PatternChain, SignalPattern};
pub use guard::{ScrapedSignals, SignalGuard};
pub use rate::{RateSampler, RateSnapshot};
