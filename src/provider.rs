use anyhow::{Context, Result};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use crate::models::CandidateInput;

/// Anything that can list candidate expiries for an index.
///
/// An empty list is a valid answer; errors are reserved for transport or
/// data failures.
pub trait ExpiryProvider: Send + Sync {
    fn get_expiry_dates(
        &self,
        index_symbol: &str,
    ) -> impl Future<Output = Result<Vec<CandidateInput>>> + Send;
}

// -----------------------------------------------
// IN-MEMORY / FILE PROVIDER
// -----------------------------------------------

/// Serves expiries from memory, optionally loaded from a JSON file of
/// `{ "NIFTY": ["2025-10-30", ...], ... }`.
#[derive(Debug, Clone, Default)]
pub struct StaticExpiryProvider {
    expiries: HashMap<String, Vec<CandidateInput>>,
}

impl StaticExpiryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expiries<I, C>(mut self, index_symbol: &str, expiries: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CandidateInput>,
    {
        self.expiries.insert(
            index_symbol.trim().to_uppercase(),
            expiries.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<CandidateInput>> =
            serde_json::from_str(raw).context("Failed to parse expiry listing")?;
        let expiries = parsed
            .into_iter()
            .map(|(symbol, dates)| (symbol.trim().to_uppercase(), dates))
            .collect();
        Ok(Self { expiries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read expiry listing {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.expiries.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl ExpiryProvider for StaticExpiryProvider {
    fn get_expiry_dates(
        &self,
        index_symbol: &str,
    ) -> impl Future<Output = Result<Vec<CandidateInput>>> + Send {
        let dates = self
            .expiries
            .get(&index_symbol.trim().to_uppercase())
            .cloned()
            .unwrap_or_default();
        async move { Ok(dates) }
    }
}
