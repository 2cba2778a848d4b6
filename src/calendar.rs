use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Maps `0 = Monday .. 6 = Sunday` to a weekday.
pub fn weekday_from_index(dow: u8) -> Option<Weekday> {
    match dow {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

/// `(year, month)` of the calendar month after the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Steps `n` calendar months forward from `(year, month)`.
pub fn add_months(year: i32, month: u32, n: u32) -> (i32, u32) {
    (0..n).fold((year, month), |(y, m), _| next_month(y, m))
}

/// Last day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// Final occurrence of `weekday` in the given month.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last_day = last_day_of_month(year, month)?;
    let back = (last_day.weekday().num_days_from_monday() + 7
        - weekday.num_days_from_monday())
        % 7;
    Some(last_day - Duration::days(back as i64))
}

/// First date on or after `from` that falls on `weekday`.
pub fn next_weekday_on_or_after(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() + 7 - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(ahead as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Mon));
        assert_eq!(weekday_from_index(3), Some(Weekday::Thu));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_next_month_wraps_december() {
        assert_eq!(next_month(2025, 10), (2025, 11));
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(add_months(2025, 11, 3), (2026, 2));
    }

    #[test]
    fn test_last_weekday_of_month() {
        // October 2025 ends on a Friday
        assert_eq!(last_weekday_of_month(2025, 10, Weekday::Thu), Some(d(2025, 10, 30)));
        assert_eq!(last_weekday_of_month(2025, 10, Weekday::Fri), Some(d(2025, 10, 31)));
        assert_eq!(last_weekday_of_month(2025, 10, Weekday::Tue), Some(d(2025, 10, 28)));
        // February 2024 is a leap month
        assert_eq!(last_weekday_of_month(2024, 2, Weekday::Thu), Some(d(2024, 2, 29)));
        assert_eq!(last_weekday_of_month(2025, 12, Weekday::Thu), Some(d(2025, 12, 25)));
    }

    #[test]
    fn test_next_weekday_on_or_after() {
        let monday = d(2025, 10, 27);
        assert_eq!(next_weekday_on_or_after(monday, Weekday::Thu), d(2025, 10, 30));
        assert_eq!(next_weekday_on_or_after(monday, Weekday::Mon), monday);
        assert_eq!(next_weekday_on_or_after(d(2025, 10, 31), Weekday::Thu), d(2025, 11, 6));
    }
}
