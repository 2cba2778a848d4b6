use chrono::Weekday;
use thiserror::Error;

/// Failures of the pure selection core.
///
/// These are never swallowed inside selection; the resolver decides what to
/// do with them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpiryError {
    #[error("no candidate expiries on or after the reference date")]
    EmptyCandidateSet,

    #[error("no weekly candidates fall on {weekday}")]
    NoWeeklyCandidates { weekday: Weekday },

    #[error("next_week needs two {weekday} candidates, found {found}")]
    InsufficientWeeklyCandidates { weekday: Weekday, found: usize },

    #[error("unsupported expiry rule '{0}'")]
    UnsupportedRule(String),
}

/// Operational error raised at the resolver boundary.
#[derive(Debug, Error)]
pub enum ResolveExpiryError {
    #[error("provider failed to list expiries for {index}: {source}")]
    Provider {
        index: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not resolve {rule} expiry for {index}: {source}")]
    Selection {
        index: String,
        rule: String,
        #[source]
        source: ExpiryError,
    },
}

/// Problems loading policy, holiday or expiry files and env values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("weekday index {0} is out of range (0 = Monday .. 6 = Sunday)")]
    InvalidWeekday(u8),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, ExpiryError>;
