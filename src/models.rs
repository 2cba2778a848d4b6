use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// A candidate expiry as handed over by a provider.
///
/// Brokers disagree on representation, so dates, datetimes and strings are
/// all accepted and coerced later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CandidateInput {
    /// Coerces to a calendar date, `None` when the value cannot be read.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            CandidateInput::Date(d) => Some(*d),
            CandidateInput::DateTime(dt) => Some(dt.date()),
            CandidateInput::Text(raw) => parse_expiry_text(raw),
        }
    }
}

impl From<NaiveDate> for CandidateInput {
    fn from(d: NaiveDate) -> Self {
        CandidateInput::Date(d)
    }
}

impl From<NaiveDateTime> for CandidateInput {
    fn from(dt: NaiveDateTime) -> Self {
        CandidateInput::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for CandidateInput {
    fn from(dt: DateTime<Tz>) -> Self {
        CandidateInput::DateTime(dt.naive_local())
    }
}

impl From<&str> for CandidateInput {
    fn from(s: &str) -> Self {
        CandidateInput::Text(s.to_string())
    }
}

impl From<String> for CandidateInput {
    fn from(s: String) -> Self {
        CandidateInput::Text(s)
    }
}

/// Parse expiry text in the formats brokers and the exchange emit
/// ("2025-10-30", "2025-10-30T15:30:00", "30-Oct-2025", "30OCT2025").
pub fn parse_expiry_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    // ISO datetimes, with or without offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local().date());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d-%b-%Y") {
        return Some(date);
    }

    let compact = trimmed.to_uppercase().replace('-', "");
    if compact.len() == 9 {
        if let Ok(date) = NaiveDate::parse_from_str(&compact, "%d%b%Y") {
            return Some(date);
        }
    }

    None
}

/// How a date relates to an index's expiry calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryKind {
    Monthly,
    Weekly,
    Other,
}

/// Outcome of a resolver call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryResolution {
    pub index: String,
    pub rule: String,
    pub expiry: NaiveDate,
    /// True when the date came from synthesised candidates.
    pub fabricated: bool,
}

impl ExpiryResolution {
    /// Canonical rule, when the resolved token is one.
    pub fn canonical_rule(&self) -> Option<Rule> {
        Rule::parse(&self.rule)
    }
}
