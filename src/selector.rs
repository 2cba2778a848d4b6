//! Expiry selection.
//!
//! Pure functions over an already filtered, ascending candidate list, plus
//! [`ExpirySelector`] which wires normalization, filtering, policy and
//! holidays together. Nothing here reads the clock unless `today` is omitted.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use tracing::debug;

use crate::calendar::{last_weekday_of_month, next_month};
use crate::candidates::filter_candidates;
use crate::config::market_today;
use crate::error::{ExpiryError, Result};
use crate::holidays::HolidayCalendar;
use crate::models::CandidateInput;
use crate::policy::{IndexPolicy, PolicyTable};
use crate::rules::{Rule, normalize_rule};

/// Pick this or next week's contract among dates on `weekly_dow`.
///
/// Never falls back to other weekdays and never returns the same date for
/// both weekly rules.
pub fn select_weekly(filtered: &[NaiveDate], rule: Rule, weekly_dow: Weekday) -> Result<NaiveDate> {
    let on_weekday: Vec<NaiveDate> = filtered
        .iter()
        .copied()
        .filter(|d| d.weekday() == weekly_dow)
        .collect();

    if on_weekday.is_empty() {
        return Err(ExpiryError::NoWeeklyCandidates { weekday: weekly_dow });
    }

    match rule {
        Rule::ThisWeek => Ok(on_weekday[0]),
        Rule::NextWeek => on_weekday.get(1).copied().ok_or(
            ExpiryError::InsufficientWeeklyCandidates {
                weekday: weekly_dow,
                found: on_weekday.len(),
            },
        ),
        other => Err(ExpiryError::UnsupportedRule(other.to_string())),
    }
}

/// Last candidate of every calendar month present, ascending.
pub fn monthly_anchors(filtered: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut by_month: BTreeMap<(i32, u32), NaiveDate> = BTreeMap::new();
    for d in filtered {
        by_month
            .entry((d.year(), d.month()))
            .and_modify(|last| *last = (*last).max(*d))
            .or_insert(*d);
    }
    by_month.into_values().collect()
}

/// Pick this or next month's contract.
///
/// Order of fallbacks matters near month boundaries:
/// - this_month: exact anchor this month, exact anchor next month,
///   provider anchor next month, first anchor, first candidate.
/// - next_month: exact anchor next month, provider anchor next month,
///   second anchor, first anchor, second candidate, first candidate.
pub fn select_monthly(
    filtered: &[NaiveDate],
    rule: Rule,
    today: NaiveDate,
    policy: &IndexPolicy,
) -> Result<NaiveDate> {
    if filtered.is_empty() {
        return Err(ExpiryError::EmptyCandidateSet);
    }

    let anchors = monthly_anchors(filtered);
    let present = |d: &NaiveDate| filtered.binary_search(d).is_ok();

    let (next_y, next_m) = next_month(today.year(), today.month());
    let exact_this = policy
        .monthly_dow
        .and_then(|w| last_weekday_of_month(today.year(), today.month(), w))
        .filter(present);
    let exact_next = policy
        .monthly_dow
        .and_then(|w| last_weekday_of_month(next_y, next_m, w))
        .filter(present);
    let provider_next = anchors
        .iter()
        .copied()
        .find(|d| d.year() == next_y && d.month() == next_m);

    let chosen = match rule {
        Rule::ThisMonth => exact_this
            .or(exact_next)
            .or(provider_next)
            .or_else(|| anchors.first().copied())
            .unwrap_or(filtered[0]),
        Rule::NextMonth => exact_next
            .or(provider_next)
            .or_else(|| anchors.get(1).or(anchors.first()).copied())
            .unwrap_or_else(|| filtered.get(1).copied().unwrap_or(filtered[0])),
        other => return Err(ExpiryError::UnsupportedRule(other.to_string())),
    };

    debug!(
        %rule, %today, %chosen,
        exact_this = ?exact_this, exact_next = ?exact_next, provider_next = ?provider_next,
        "monthly expiry selected"
    );
    Ok(chosen)
}

/// Forward-compatible path for tokens outside the four canonical rules.
///
/// Ignores index policy. Tokens mentioning `week` pick among all
/// candidates, tokens mentioning `month` pick among monthly anchors, and
/// `next` in either selects the second entry.
pub fn select_generic(filtered: &[NaiveDate], token: &str) -> Result<NaiveDate> {
    let wants_next = token.contains("next");

    if token.contains("week") {
        let pos = usize::from(wants_next);
        return filtered.get(pos).copied().ok_or_else(|| {
            if filtered.is_empty() {
                ExpiryError::EmptyCandidateSet
            } else {
                ExpiryError::InsufficientWeeklyCandidates {
                    weekday: filtered[0].weekday(),
                    found: filtered.len(),
                }
            }
        });
    }

    if token.contains("month") {
        let anchors = monthly_anchors(filtered);
        let pick = if wants_next {
            anchors.get(1).or(anchors.first())
        } else {
            anchors.first()
        };
        return pick.copied().ok_or(ExpiryError::EmptyCandidateSet);
    }

    Err(ExpiryError::UnsupportedRule(token.to_string()))
}

/// Selection with an injected policy table and optional holiday predicate.
pub struct ExpirySelector<'a> {
    policies: &'a PolicyTable,
    holidays: Option<Box<dyn Fn(NaiveDate) -> bool + Send + Sync + 'a>>,
}

impl<'a> ExpirySelector<'a> {
    pub fn new(policies: &'a PolicyTable) -> Self {
        Self { policies, holidays: None }
    }

    pub fn with_holiday_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'a,
    {
        self.holidays = Some(Box::new(predicate));
        self
    }

    pub fn with_holidays(self, calendar: &'a HolidayCalendar) -> Self {
        self.with_holiday_predicate(move |d| calendar.is_holiday(d))
    }

    /// Resolve `rule` for `index_symbol` among `candidates`.
    ///
    /// `today` defaults to the current market date.
    pub fn select<I, C>(
        &self,
        index_symbol: &str,
        candidates: I,
        rule: &str,
        today: Option<NaiveDate>,
    ) -> Result<NaiveDate>
    where
        I: IntoIterator<Item = C>,
        C: Into<CandidateInput>,
    {
        let today = today.unwrap_or_else(market_today);
        let token = normalize_rule(rule);
        let holiday = self.holidays.as_deref().map(|h| h as &dyn Fn(NaiveDate) -> bool);
        let filtered = filter_candidates(candidates, today, holiday)?;

        let Some(canonical) = Rule::parse(&token) else {
            debug!(index = index_symbol, %token, "falling back to generic expiry selection");
            return select_generic(&filtered, &token);
        };

        let policy = self.policies.lookup(index_symbol);
        let chosen = if canonical.is_weekly() {
            select_weekly(&filtered, canonical, policy.weekly_dow)?
        } else {
            select_monthly(&filtered, canonical, today, &policy)?
        };

        debug!(index = index_symbol, rule = %canonical, %today, expiry = %chosen, "expiry resolved");
        Ok(chosen)
    }

    /// Bucket an observed expiry falls into, checking rules in canonical order.
    pub fn bucket_for<I, C>(
        &self,
        index_symbol: &str,
        expiry: NaiveDate,
        candidates: I,
        today: Option<NaiveDate>,
    ) -> Option<Rule>
    where
        I: IntoIterator<Item = C>,
        C: Into<CandidateInput>,
    {
        let today = today.unwrap_or_else(market_today);
        let candidates: Vec<CandidateInput> = candidates.into_iter().map(Into::into).collect();
        Rule::ALL.into_iter().find(|rule| {
            self.select(index_symbol, candidates.iter().cloned(), rule.as_str(), Some(today))
                .is_ok_and(|d| d == expiry)
        })
    }
}

/// Resolve `rule` for `index_symbol` against the canonical policy table,
/// with no holiday filtering.
pub fn select_expiry_for_index<I, C>(
    index_symbol: &str,
    candidates: I,
    rule: &str,
    today: Option<NaiveDate>,
) -> Result<NaiveDate>
where
    I: IntoIterator<Item = C>,
    C: Into<CandidateInput>,
{
    let policies = PolicyTable::canonical();
    ExpirySelector::new(&policies).select(index_symbol, candidates, rule, today)
}
