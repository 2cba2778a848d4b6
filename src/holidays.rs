use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;

/// Exchange holidays excluded from candidate expiries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HolidayEntry {
    Plain(String),
    Named {
        date: String,
        #[allow(dead_code)]
        #[serde(default)]
        name: Option<String>,
    },
}

impl HolidayEntry {
    fn date_str(&self) -> &str {
        match self {
            HolidayEntry::Plain(d) => d,
            HolidayEntry::Named { date, .. } => date,
        }
    }
}

impl HolidayCalendar {
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self { dates: dates.into_iter().collect() }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    /// Accepts `["2025-10-21", ...]` or `[{"date": "2025-10-21", "name": "Diwali"}, ...]`.
    pub fn from_json_str(raw: &str, source: &str) -> Result<Self, ConfigError> {
        let entries: Vec<HolidayEntry> =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
                path: source.to_string(),
                source: e,
            })?;

        let dates = entries
            .iter()
            .map(|entry| {
                let raw_date = entry.date_str();
                NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidDate(raw_date.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self { dates })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }
}
