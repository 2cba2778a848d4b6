use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExpiryError;

/// Canonical expiry buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
}

impl Rule {
    pub const ALL: [Rule; 4] = [Rule::ThisWeek, Rule::NextWeek, Rule::ThisMonth, Rule::NextMonth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::ThisWeek => "this_week",
            Rule::NextWeek => "next_week",
            Rule::ThisMonth => "this_month",
            Rule::NextMonth => "next_month",
        }
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self, Rule::ThisWeek | Rule::NextWeek)
    }

    pub fn is_monthly(&self) -> bool {
        !self.is_weekly()
    }

    /// Normalizes `raw` and maps it to a canonical rule, if it is one.
    pub fn parse(raw: &str) -> Option<Rule> {
        match normalize_rule(raw).as_str() {
            "this_week" => Some(Rule::ThisWeek),
            "next_week" => Some(Rule::NextWeek),
            "this_month" => Some(Rule::ThisMonth),
            "next_month" => Some(Rule::NextMonth),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = ExpiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::parse(s).ok_or_else(|| ExpiryError::UnsupportedRule(normalize_rule(s)))
    }
}

const RULE_ALIASES: &[(&str, &str)] = &[
    ("current_week", "this_week"),
    ("following_week", "next_week"),
    ("current_month", "this_month"),
    ("following_month", "next_month"),
    ("next_nonth", "next_month"),
];

/// Lower-cases, trims and snake-cases a rule string, then applies aliases.
///
/// Unknown tokens come back normalized but otherwise untouched.
pub fn normalize_rule(rule: &str) -> String {
    let token = rule
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('-', "_");

    RULE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(token)
}
