use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::trace;

use crate::error::{ExpiryError, Result};
use crate::models::CandidateInput;

/// Coerce, dedupe and forward-filter raw candidates.
///
/// Holiday removal runs before the `>= today` cut. Unreadable inputs are
/// dropped. The result is ascending and never empty.
pub fn filter_candidates<I, C>(
    candidates: I,
    today: NaiveDate,
    is_holiday: Option<&dyn Fn(NaiveDate) -> bool>,
) -> Result<Vec<NaiveDate>>
where
    I: IntoIterator<Item = C>,
    C: Into<CandidateInput>,
{
    let unique: BTreeSet<NaiveDate> = candidates
        .into_iter()
        .map(Into::into)
        .filter_map(|c: CandidateInput| {
            let date = c.to_date();
            if date.is_none() {
                trace!(candidate = ?c, "dropping unreadable expiry candidate");
            }
            date
        })
        .collect();

    let filtered: Vec<NaiveDate> = unique
        .into_iter()
        .filter(|d| !is_holiday.is_some_and(|holiday| holiday(*d)))
        .filter(|d| *d >= today)
        .collect();

    if filtered.is_empty() {
        return Err(ExpiryError::EmptyCandidateSet);
    }
    Ok(filtered)
}
