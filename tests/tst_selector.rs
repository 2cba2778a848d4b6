use chrono::{Datelike, Duration, NaiveDate, Weekday};
use g6_expiry::{
    ExpiryError, ExpirySelector, HolidayCalendar, IndexPolicy, PolicyTable, Rule,
    is_monthly_expiry, is_monthly_expiry_dow, normalize_rule, select_expiry_for_index,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn october_listing() -> Vec<NaiveDate> {
        vec![d(2025, 10, 23), d(2025, 10, 30), d(2025, 11, 6), d(2025, 11, 27)]
    }

    #[test]
    fn test_this_week_nifty() {
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 30), d(2025, 11, 6)];
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates, "this_week", Some(today)),
            Ok(d(2025, 10, 30))
        );
    }

    #[test]
    fn test_next_week_nifty() {
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 30), d(2025, 11, 6)];
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates, "next_week", Some(today)),
            Ok(d(2025, 11, 6))
        );
    }

    #[test]
    fn test_next_week_with_single_candidate_fails() {
        let today = d(2025, 10, 27);
        let result = select_expiry_for_index("NIFTY", [d(2025, 10, 30)], "next_week", Some(today));
        assert_eq!(
            result,
            Err(ExpiryError::InsufficientWeeklyCandidates { weekday: Weekday::Thu, found: 1 })
        );
    }

    #[test]
    fn test_this_month() {
        let today = d(2025, 10, 15);
        assert_eq!(
            select_expiry_for_index("NIFTY", october_listing(), "this_month", Some(today)),
            Ok(d(2025, 10, 30))
        );
    }

    #[test]
    fn test_next_month() {
        let today = d(2025, 10, 15);
        assert_eq!(
            select_expiry_for_index("NIFTY", october_listing(), "next_month", Some(today)),
            Ok(d(2025, 11, 27))
        );
    }

    #[test]
    fn test_empty_candidates_fail_for_every_rule() {
        let today = d(2025, 10, 27);
        for rule in ["this_week", "next_week", "this_month", "next_month", "weekly"] {
            let none: Vec<NaiveDate> = Vec::new();
            assert_eq!(
                select_expiry_for_index("NIFTY", none, rule, Some(today)),
                Err(ExpiryError::EmptyCandidateSet),
                "rule {rule}"
            );
        }
    }

    #[test]
    fn test_monthly_classification() {
        assert!(is_monthly_expiry(d(2025, 10, 30), Weekday::Thu));
        assert!(!is_monthly_expiry(d(2025, 10, 16), Weekday::Thu));
        assert!(is_monthly_expiry_dow(d(2025, 10, 30), 3));
        assert!(!is_monthly_expiry_dow(d(2025, 10, 16), 3));
    }

    #[test]
    fn test_weekly_rule_never_returns_other_weekday() {
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 28), d(2025, 10, 29), d(2025, 10, 31)];
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates, "this_week", Some(today)),
            Err(ExpiryError::NoWeeklyCandidates { weekday: Weekday::Thu })
        );
    }

    #[test]
    fn test_properties_over_a_quarter() {
        let policies = PolicyTable::canonical();
        let selector = ExpirySelector::new(&policies);
        let listing: Vec<NaiveDate> = (0..26).map(|i| d(2025, 10, 2) + Duration::days(i * 3)).collect();

        for offset in 0..45 {
            let today = d(2025, 10, 1) + Duration::days(offset);
            for index in ["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "SENSEX"] {
                let policy = policies.lookup(index);
                let pick = |rule: Rule| selector.select(index, listing.iter().copied(), rule.as_str(), Some(today));

                // Determinism
                assert_eq!(pick(Rule::ThisMonth), pick(Rule::ThisMonth));

                if let (Ok(this_week), Ok(next_week)) = (pick(Rule::ThisWeek), pick(Rule::NextWeek)) {
                    assert!(this_week < next_week, "{index} {today}");
                    assert_eq!(this_week.weekday(), policy.weekly_dow);
                    assert_eq!(next_week.weekday(), policy.weekly_dow);
                    assert!(this_week >= today);
                }

                if let (Ok(this_month), Ok(next_month)) = (pick(Rule::ThisMonth), pick(Rule::NextMonth)) {
                    assert!(this_month <= next_month, "{index} {today}");
                    assert!(this_month >= today);
                }
            }
        }
    }

    #[test]
    fn test_holiday_is_never_returned() {
        let policies = PolicyTable::canonical();
        let holidays = HolidayCalendar::from_dates([d(2025, 10, 30)]);
        let selector = ExpirySelector::new(&policies).with_holidays(&holidays);
        let today = d(2025, 10, 15);

        for rule in Rule::ALL {
            let picked = selector.select("NIFTY", october_listing(), rule.as_str(), Some(today));
            assert_ne!(picked, Ok(d(2025, 10, 30)), "{rule}");
        }
        // Without the holiday, this_month would have been the 30th
        assert_eq!(
            selector.select("NIFTY", october_listing(), "this_month", Some(today)),
            Ok(d(2025, 11, 27))
        );
    }

    #[test]
    fn test_custom_holiday_predicate() {
        let policies = PolicyTable::canonical();
        let selector = ExpirySelector::new(&policies).with_holiday_predicate(|date| date.day() == 6);
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 30), d(2025, 11, 6), d(2025, 11, 13)];
        assert_eq!(selector.select("NIFTY", candidates, "next_week", Some(today)), Ok(d(2025, 11, 13)));
    }

    #[test]
    fn test_aliases_resolve_like_canonical_rules() {
        let today = d(2025, 10, 15);
        for (alias, canonical) in [
            ("current_week", "this_week"),
            ("Following-Week", "next_week"),
            ("current_month", "this_month"),
            ("following_month", "next_month"),
            ("next_nonth", "next_month"),
        ] {
            assert_eq!(normalize_rule(alias), canonical);
            assert_eq!(
                select_expiry_for_index("NIFTY", october_listing(), alias, Some(today)),
                select_expiry_for_index("NIFTY", october_listing(), canonical, Some(today)),
            );
        }
    }

    #[test]
    fn test_unknown_index_uses_thursday_default() {
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 28), d(2025, 10, 30)];
        assert_eq!(
            select_expiry_for_index("GIFTNIFTY", candidates, "this_week", Some(today)),
            Ok(d(2025, 10, 30))
        );
    }

    #[test]
    fn test_generic_rule_ignores_index_policy() {
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 28), d(2025, 10, 30)];
        assert_eq!(
            select_expiry_for_index("NOT-AN-INDEX", candidates, "weekly", Some(today)),
            Ok(d(2025, 10, 28))
        );
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates, "far_quarter", Some(today)),
            Err(ExpiryError::UnsupportedRule("far_quarter".to_string()))
        );
    }

    #[test]
    fn test_policy_override_changes_weekday() {
        let policies = PolicyTable::canonical().with_policy("NIFTY", IndexPolicy::same_day(Weekday::Tue));
        let selector = ExpirySelector::new(&policies);
        let today = d(2025, 10, 27);
        let candidates = [d(2025, 10, 28), d(2025, 10, 30), d(2025, 11, 4), d(2025, 11, 25)];
        assert_eq!(selector.select("NIFTY", candidates, "this_week", Some(today)), Ok(d(2025, 10, 28)));
        assert_eq!(selector.select("NIFTY", candidates, "this_month", Some(today)), Ok(d(2025, 10, 28)));
        assert_eq!(selector.select("NIFTY", candidates, "next_month", Some(today)), Ok(d(2025, 11, 25)));
    }

    #[test]
    fn test_mixed_input_representations() {
        let today = d(2025, 10, 27);
        let candidates: Vec<g6_expiry::CandidateInput> = vec![
            "06-Nov-2025".into(),
            "2025-10-30T15:30:00".into(),
            "30OCT2025".into(),
            "not a date".into(),
        ];
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates.clone(), "this_week", Some(today)),
            Ok(d(2025, 10, 30))
        );
        assert_eq!(
            select_expiry_for_index("NIFTY", candidates, "next_week", Some(today)),
            Ok(d(2025, 11, 6))
        );
    }
}
