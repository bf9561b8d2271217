use std::path::PathBuf;

/// The closed error taxonomy for the chunking/normalization core.
///
/// Only [`CoreError::Input`] and [`CoreError::Fatal`] are meant to propagate
/// all the way to a caller; every other kind is recovered locally by the
/// layer that produced it (see spec §7 for the recovery policy of each
/// kind).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("input error for {path}: {reason}")]
    Input { path: PathBuf, reason: String },

    #[error("no language signature matched {path}, falling back to text")]
    DetectionFallback { path: PathBuf },

    #[error("parse error in {path} ({language}): {reason}")]
    Parse {
        path: PathBuf,
        language: String,
        reason: String,
    },

    #[error("strategy '{strategy}' violated {invariant} on {path}")]
    StrategyViolation {
        strategy: String,
        invariant: String,
        path: PathBuf,
    },

    #[error("strategy '{strategy}' exceeded its {budget_ms}ms deadline on {path}")]
    TimeoutExceeded {
        strategy: String,
        budget_ms: u64,
        path: PathBuf,
    },

    #[error("memory limit of {limit_mb}MB exceeded while running '{strategy}'")]
    MemoryExceeded { strategy: String, limit_mb: u64 },

    #[error("normalization error: {reason}")]
    Normalization { reason: String },

    #[error("cache error for key '{key}': {reason}")]
    Cache { key: String, reason: String },

    #[error("all fallback rungs exhausted for {path}, including the emergency single-chunk wrapper")]
    Fatal { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Reason the coordinator descended the fallback ladder, carried on
/// [`crate::chunking::ProcessingResult::fallback_reason`] instead of being
/// raised as an exception — see spec §9 ("exception-as-control-flow...
/// replaced by a tagged result with an explicit FallbackReason").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoGrammar,
    ParseError,
    StrategyViolation,
    TimeoutExceeded,
    MemoryExceeded,
    EmptyOutput,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NoGrammar => "no-grammar",
            FallbackReason::ParseError => "parse-error",
            FallbackReason::StrategyViolation => "strategy-violation",
            FallbackReason::TimeoutExceeded => "timeout-exceeded",
            FallbackReason::MemoryExceeded => "memory-exceeded",
            FallbackReason::EmptyOutput => "empty-output",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
