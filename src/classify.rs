use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::calendar::weekday_from_index;
use crate::models::ExpiryKind;
use crate::policy::IndexPolicy;

/// True when `d` falls on the index's weekly expiry weekday.
pub fn is_weekly_expiry(d: NaiveDate, weekly_dow: Weekday) -> bool {
    d.weekday() == weekly_dow
}

/// True when `d` is the last `monthly_dow` of its month.
pub fn is_monthly_expiry(d: NaiveDate, monthly_dow: Weekday) -> bool {
    d.weekday() == monthly_dow && (d + Duration::days(7)).month() != d.month()
}

/// [`is_weekly_expiry`] with `0 = Monday .. 6 = Sunday`; out of range is false.
pub fn is_weekly_expiry_dow(d: NaiveDate, weekly_dow: u8) -> bool {
    weekday_from_index(weekly_dow).is_some_and(|w| is_weekly_expiry(d, w))
}

/// [`is_monthly_expiry`] with `0 = Monday .. 6 = Sunday`; out of range is false.
pub fn is_monthly_expiry_dow(d: NaiveDate, monthly_dow: u8) -> bool {
    weekday_from_index(monthly_dow).is_some_and(|w| is_monthly_expiry(d, w))
}

/// Monthly wins over weekly when a date is both.
pub fn classify_expiry(d: NaiveDate, policy: &IndexPolicy) -> ExpiryKind {
    if is_monthly_expiry(d, policy.monthly_or_weekly()) {
        ExpiryKind::Monthly
    } else if is_weekly_expiry(d, policy.weekly_dow) {
        ExpiryKind::Weekly
    } else {
        ExpiryKind::Other
    }
}
