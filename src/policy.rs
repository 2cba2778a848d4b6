//! Per-index expiry weekday policy.
//!
//! One canonical table lives here. Callers that need different weekdays
//! build their own [`PolicyTable`] (or load one from JSON) and pass it in;
//! nothing else in the crate carries weekday overrides.

use chrono::Weekday;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::calendar::weekday_from_index;
use crate::config::DEFAULT_EXPIRY_WEEKDAY;
use crate::error::ConfigError;

/// Weekdays on which an index's weekly and monthly contracts expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPolicy {
    pub weekly_dow: Weekday,
    /// Weekday whose last occurrence in a month anchors the monthly contract.
    /// `None` leaves monthly selection to the provider-derived anchors.
    pub monthly_dow: Option<Weekday>,
}

impl IndexPolicy {
    pub fn new(weekly_dow: Weekday, monthly_dow: Option<Weekday>) -> Self {
        Self { weekly_dow, monthly_dow }
    }

    /// Weekly and monthly contracts on the same weekday.
    pub fn same_day(weekday: Weekday) -> Self {
        Self::new(weekday, Some(weekday))
    }

    /// Weekday used when testing for the monthly contract.
    pub fn monthly_or_weekly(&self) -> Weekday {
        self.monthly_dow.unwrap_or(self.weekly_dow)
    }
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self::same_day(DEFAULT_EXPIRY_WEEKDAY)
    }
}

#[derive(Debug, Deserialize)]
struct PolicyEntry {
    weekly_dow: u8,
    #[serde(default)]
    monthly_dow: Option<u8>,
}

impl PolicyEntry {
    fn into_policy(self) -> Result<IndexPolicy, ConfigError> {
        let weekly = weekday_from_index(self.weekly_dow)
            .ok_or(ConfigError::InvalidWeekday(self.weekly_dow))?;
        let monthly = self
            .monthly_dow
            .map(|dow| weekday_from_index(dow).ok_or(ConfigError::InvalidWeekday(dow)))
            .transpose()?;
        Ok(IndexPolicy::new(weekly, monthly))
    }
}

/// Read-only registry of index policies with a default for unknown symbols.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<String, IndexPolicy>,
    default: IndexPolicy,
}

impl PolicyTable {
    /// Table with no entries; every lookup yields `default`.
    pub fn empty(default: IndexPolicy) -> Self {
        Self { entries: HashMap::new(), default }
    }

    /// The canonical exchange table.
    pub fn canonical() -> Self {
        Self::empty(IndexPolicy::default())
            .with_policy("NIFTY", IndexPolicy::same_day(Weekday::Thu))
            .with_policy("BANKNIFTY", IndexPolicy::same_day(Weekday::Wed))
            .with_policy("FINNIFTY", IndexPolicy::same_day(Weekday::Tue))
            .with_policy("MIDCPNIFTY", IndexPolicy::same_day(Weekday::Mon))
            .with_policy("SENSEX", IndexPolicy::same_day(Weekday::Fri))
    }

    pub fn with_policy(mut self, symbol: &str, policy: IndexPolicy) -> Self {
        self.entries.insert(normalize_symbol(symbol), policy);
        self
    }

    /// Policy for `symbol`, falling back to the table default.
    pub fn lookup(&self, symbol: &str) -> IndexPolicy {
        self.entries
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(&normalize_symbol(symbol))
    }

    pub fn default_policy(&self) -> IndexPolicy {
        self.default
    }

    /// Merges a JSON object of `{ "SYMBOL": { "weekly_dow": n, "monthly_dow": n|null } }`
    /// over the canonical table.
    pub fn from_json_str(raw: &str, source: &str) -> Result<Self, ConfigError> {
        let parsed: HashMap<String, PolicyEntry> =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        parsed
            .into_iter()
            .try_fold(Self::canonical(), |table, (symbol, entry)| {
                Ok(table.with_policy(&symbol, entry.into_policy()?))
            })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::canonical()
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
