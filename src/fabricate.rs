//! Synthetic expiry candidates for when a provider returns nothing.
//!
//! Only the resolver calls into this module. Dates produced here follow the
//! index policy exactly and ignore holidays, so they are placeholders, not
//! exchange truth.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::calendar::{add_months, last_weekday_of_month, next_weekday_on_or_after};
use crate::config::{FABRICATED_MONTHS, FABRICATED_WEEKS};
use crate::policy::IndexPolicy;

/// The next `weeks` occurrences of the weekly expiry weekday, from `today` on.
pub fn fabricate_weekly(policy: &IndexPolicy, today: NaiveDate, weeks: usize) -> Vec<NaiveDate> {
    let first = next_weekday_on_or_after(today, policy.weekly_dow);
    (0..weeks)
        .map(|i| first + Duration::weeks(i as i64))
        .collect()
}

/// `months` monthly anchors, skipping this month's when it has already passed.
pub fn fabricate_monthly(policy: &IndexPolicy, today: NaiveDate, months: usize) -> Vec<NaiveDate> {
    let weekday = policy.monthly_or_weekly();
    (0u32..)
        .filter_map(|offset| {
            let (y, m) = add_months(today.year(), today.month(), offset);
            last_weekday_of_month(y, m, weekday)
        })
        .filter(|d| *d >= today)
        .take(months)
        .collect()
}

/// Weekly and monthly placeholders merged, ascending and unique.
pub fn fabricate_candidates(policy: &IndexPolicy, today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates: BTreeSet<NaiveDate> =
        fabricate_weekly(policy, today, FABRICATED_WEEKS).into_iter().collect();
    dates.extend(fabricate_monthly(policy, today, FABRICATED_MONTHS));
    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fabricate_weekly() {
        let policy = IndexPolicy::same_day(Weekday::Thu);
        assert_eq!(
            fabricate_weekly(&policy, d(2025, 10, 27), 3),
            vec![d(2025, 10, 30), d(2025, 11, 6), d(2025, 11, 13)]
        );
        // Expiry day itself counts
        assert_eq!(fabricate_weekly(&policy, d(2025, 10, 30), 1), vec![d(2025, 10, 30)]);
    }

    #[test]
    fn test_fabricate_monthly_skips_passed_anchor() {
        let policy = IndexPolicy::same_day(Weekday::Thu);
        assert_eq!(
            fabricate_monthly(&policy, d(2025, 10, 31), 2),
            vec![d(2025, 11, 27), d(2025, 12, 25)]
        );
        assert_eq!(
            fabricate_monthly(&policy, d(2025, 10, 15), 2),
            vec![d(2025, 10, 30), d(2025, 11, 27)]
        );
    }

    #[test]
    fn test_fabricate_monthly_uses_weekly_day_without_preference() {
        let policy = IndexPolicy::new(Weekday::Tue, None);
        assert_eq!(fabricate_monthly(&policy, d(2025, 10, 1), 1), vec![d(2025, 10, 28)]);
    }

    #[test]
    fn test_fabricate_candidates_merges() {
        let policy = IndexPolicy::same_day(Weekday::Thu);
        let dates = fabricate_candidates(&policy, d(2025, 10, 27));
        assert_eq!(dates.first(), Some(&d(2025, 10, 30)));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.contains(&d(2025, 12, 25)));
        assert!(dates.iter().all(|x| x.weekday() == Weekday::Thu));
    }
}
