//! Ordered pattern-chain extraction from exposition-format metrics text.
//!
//! A chain is data: each entry names a metric line shape and how to normalize
//! the captured number. Evaluation stops at the first entry that matches with
//! a finite number.

use std::sync::LazyLock;

use regex::Regex;

use brokerscope_core::constants::{BYTES_PER_MB, SECONDS_TO_MS_THRESHOLD};

/// Numeric sample value as written by exposition encoders, including the
/// special values which are captured and then rejected as non-finite.
pub const VALUE_PATTERN: &str = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?|NaN|[-+]?Inf)";

/// Unit conversion applied to a captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Identity,
    /// Bytes → megabytes.
    BytesToMb,
    /// Seconds → milliseconds, unless the value already looks like milliseconds.
    SecondsToMs,
}

impl Normalizer {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::BytesToMb => value / BYTES_PER_MB,
            Self::SecondsToMs => {
                if value > SECONDS_TO_MS_THRESHOLD {
                    value
                } else {
                    value * 1000.0
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
enum PatternRegex {
    Static(&'static LazyLock<Option<Regex>>),
    Compiled(Regex),
}

impl PatternRegex {
    fn get(&self) -> Option<&Regex> {
        match self {
            Self::Static(lazy) => lazy.as_ref(),
            Self::Compiled(re) => Some(re),
        }
    }
}

/// One entry of a pattern chain. The regex's first capture group is the value.
#[derive(Debug, Clone)]
pub struct SignalPattern {
    pub name: String,
    regex: PatternRegex,
    pub normalizer: Normalizer,
}

impl SignalPattern {
    /// Wrap a lazily compiled static regex.
    pub fn from_static(
        name: &str,
        regex: &'static LazyLock<Option<Regex>>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            name: name.to_string(),
            regex: PatternRegex::Static(regex),
            normalizer,
        }
    }

    /// Match `metric` with any (or no) label set.
    pub fn metric(metric: &str, normalizer: Normalizer) -> Option<Self> {
        let source = format!(
            r"(?m)^{}(?:\{{[^}}]*\}})?[ \t]+{VALUE_PATTERN}",
            regex::escape(metric)
        );
        Self::compiled(metric, &source, normalizer)
    }

    /// Match `metric` only on the line labelled with `quantile="<quantile>"`.
    pub fn quantile(metric: &str, quantile: &str, normalizer: Normalizer) -> Option<Self> {
        let source = format!(
            r#"(?m)^{}\{{[^}}]*quantile="{}"[^}}]*\}}[ \t]+{VALUE_PATTERN}"#,
            regex::escape(metric),
            regex::escape(quantile)
        );
        Self::compiled(&format!("{metric}{{quantile={quantile}}}"), &source, normalizer)
    }

    /// Compile an arbitrary expression; `None` if it does not compile.
    pub fn compiled(name: &str, source: &str, normalizer: Normalizer) -> Option<Self> {
        match Regex::new(source) {
            Ok(re) => Some(Self {
                name: name.to_string(),
                regex: PatternRegex::Compiled(re),
                normalizer,
            }),
            Err(e) => {
                tracing::warn!(pattern = name, error = %e, "signal pattern does not compile");
                None
            }
        }
    }

    /// Normalized value of the first match, if it is a finite number.
    pub fn capture(&self, text: &str) -> Option<f64> {
        let re = self.regex.get()?;
        let raw = re.captures(text)?.get(1)?.as_str();
        let value: f64 = raw.parse().ok()?;
        value.is_finite().then(|| self.normalizer.apply(value))
    }
}

/// Ordered list of patterns for one signal.
#[derive(Debug, Clone, Default)]
pub struct PatternChain {
    patterns: Vec<SignalPattern>,
}

impl PatternChain {
    pub fn new(patterns: Vec<SignalPattern>) -> Self {
        Self { patterns }
    }

    /// Build from patterns that may have failed to compile.
    pub fn from_options(patterns: impl IntoIterator<Item = Option<SignalPattern>>) -> Self {
        Self {
            patterns: patterns.into_iter().flatten().collect(),
        }
    }

    /// Append a pattern at the lowest priority.
    pub fn push(&mut self, pattern: SignalPattern) {
        self.patterns.push(pattern);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First match in declared order. `None` means "no signal", which is
    /// distinct from a measured zero.
    pub fn extract(&self, text: &str) -> Option<f64> {
        self.patterns.iter().find_map(|p| {
            let value = p.capture(text)?;
            tracing::trace!(pattern = %p.name, value, "exposition signal matched");
            Some(value)
        })
    }
}
