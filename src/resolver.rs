//! Broker-facing expiry resolution.
//!
//! This is the only place that talks to a provider, fabricates candidates,
//! translates selection failures into [`ResolveExpiryError`], or substitutes
//! a default date. The selection core stays pure and loud.

use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ExpiryError, ResolveExpiryError};
use crate::fabricate::fabricate_candidates;
use crate::holidays::HolidayCalendar;
use crate::models::{CandidateInput, ExpiryResolution};
use crate::policy::{IndexPolicy, PolicyTable};
use crate::provider::ExpiryProvider;
use crate::rules::normalize_rule;
use crate::selector::ExpirySelector;

type CacheKey = (String, String, NaiveDate);

pub struct ExpiryResolver<P: ExpiryProvider> {
    provider: P,
    policies: PolicyTable,
    holidays: Option<HolidayCalendar>,
    fabricate: bool,
    cache: RwLock<HashMap<CacheKey, ExpiryResolution>>,
}

impl<P: ExpiryProvider> ExpiryResolver<P> {
    pub fn new(provider: P, policies: PolicyTable) -> Self {
        Self {
            provider,
            policies,
            holidays: None,
            fabricate: true,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = Some(holidays);
        self
    }

    /// Toggle synthetic candidates when the provider has nothing usable.
    pub fn with_fabrication(mut self, enabled: bool) -> Self {
        self.fabricate = enabled;
        self
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    fn selector(&self) -> ExpirySelector<'_> {
        let selector = ExpirySelector::new(&self.policies);
        match &self.holidays {
            Some(calendar) => selector.with_holidays(calendar),
            None => selector,
        }
    }

    /// Resolve one rule for one index on `today`.
    ///
    /// Results are cached per `(index, rule, today)`.
    pub async fn resolve(
        &self,
        index_symbol: &str,
        rule: &str,
        today: NaiveDate,
    ) -> Result<ExpiryResolution, ResolveExpiryError> {
        let index = index_symbol.trim().to_uppercase();
        let token = normalize_rule(rule);
        let key: CacheKey = (index.clone(), token.clone(), today);

        if let Some(hit) = self.cache.read().await.get(&key) {
            debug!(%index, rule = %token, "expiry cache hit");
            return Ok(hit.clone());
        }

        let mut candidates = self
            .provider
            .get_expiry_dates(&index)
            .await
            .map_err(|source| ResolveExpiryError::Provider {
                index: index.clone(),
                source,
            })?;

        let policy = self.policies.lookup(&index);
        let mut fabricated = false;

        if candidates.is_empty() && self.fabricate {
            warn!(%index, rule = %token, "provider returned no expiries, fabricating candidates");
            candidates = fabricated_inputs(&policy, today);
            fabricated = true;
        }

        let selector = self.selector();
        let expiry = match selector.select(&index, candidates.iter().cloned(), &token, Some(today)) {
            Ok(expiry) => expiry,
            Err(err @ (ExpiryError::NoWeeklyCandidates { .. } | ExpiryError::EmptyCandidateSet))
                if self.fabricate && !fabricated =>
            {
                warn!(%index, rule = %token, error = %err, "retrying selection with fabricated candidates");
                candidates.extend(fabricated_inputs(&policy, today));
                fabricated = true;
                selector
                    .select(&index, candidates, &token, Some(today))
                    .map_err(|source| ResolveExpiryError::Selection {
                        index: index.clone(),
                        rule: token.clone(),
                        source,
                    })?
            }
            Err(source) => {
                return Err(ResolveExpiryError::Selection {
                    index,
                    rule: token,
                    source,
                });
            }
        };

        let resolution = ExpiryResolution {
            index,
            rule: token,
            expiry,
            fabricated,
        };
        info!(
            index = %resolution.index,
            rule = %resolution.rule,
            expiry = %resolution.expiry,
            fabricated,
            "expiry resolved"
        );

        self.cache.write().await.insert(key, resolution.clone());
        Ok(resolution)
    }

    /// Like [`resolve`](Self::resolve) but never fails: any error is logged
    /// and `today` is returned so a collection cycle keeps running.
    pub async fn resolve_or_today(&self, index_symbol: &str, rule: &str, today: NaiveDate) -> NaiveDate {
        match self.resolve(index_symbol, rule, today).await {
            Ok(resolution) => resolution.expiry,
            Err(e) => {
                warn!(index = index_symbol, rule, error = %e, %today, "expiry resolution failed, using today");
                today
            }
        }
    }

    /// Resolve every (index, rule) pair concurrently.
    ///
    /// Output order is indices outer, rules inner.
    pub async fn resolve_matrix(
        &self,
        indices: &[&str],
        rules: &[&str],
        today: NaiveDate,
    ) -> Vec<Result<ExpiryResolution, ResolveExpiryError>> {
        let tasks = indices.iter().flat_map(|index| {
            rules
                .iter()
                .map(move |rule| self.resolve(index, rule, today))
        });
        join_all(tasks).await
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }
}

fn fabricated_inputs(policy: &IndexPolicy, today: NaiveDate) -> Vec<CandidateInput> {
    fabricate_candidates(policy, today)
        .into_iter()
        .map(CandidateInput::from)
        .collect()
}
