use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::ConfigError;

// -----------------------------------------------
// INDICES
// -----------------------------------------------
pub const G6_INDICES: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "SENSEX"];

// -----------------------------------------------
// POLICY DEFAULTS
// -----------------------------------------------
/// Weekday used when an index has no policy entry.
pub const DEFAULT_EXPIRY_WEEKDAY: Weekday = Weekday::Thu;

// -----------------------------------------------
// FABRICATION
// -----------------------------------------------
pub const FABRICATED_WEEKS: usize = 6;
pub const FABRICATED_MONTHS: usize = 3;

// -----------------------------------------------
// MARKET CALENDAR
// -----------------------------------------------
pub const MARKET_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

/// Current trading date in the exchange timezone.
pub fn market_today() -> NaiveDate {
    Utc::now().with_timezone(&MARKET_TIMEZONE).date_naive()
}

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Get the execution mode from environment or default to matrix
pub fn get_execution_mode() -> String {
    std::env::var("G6_MODE").unwrap_or_else(|_| "matrix".to_string())
}

/// Get index symbol for resolve/classify modes
pub fn get_index_symbol() -> String {
    std::env::var("G6_INDEX")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_else(|_| "NIFTY".to_string())
}

/// Get expiry rule for resolve mode
pub fn get_rule() -> String {
    std::env::var("G6_RULE").unwrap_or_else(|_| "this_week".to_string())
}

/// Reference date override, otherwise today's market date
pub fn get_today() -> Result<NaiveDate, ConfigError> {
    match std::env::var("G6_TODAY") {
        Ok(raw) => parse_iso_date(&raw),
        Err(_) => Ok(market_today()),
    }
}

/// Date to classify in classify mode
pub fn get_classify_date() -> Result<Option<NaiveDate>, ConfigError> {
    std::env::var("G6_DATE")
        .ok()
        .map(|raw| parse_iso_date(&raw))
        .transpose()
}

pub fn get_expiries_file() -> Option<String> {
    std::env::var("G6_EXPIRIES_FILE").ok()
}

pub fn get_holidays_file() -> Option<String> {
    std::env::var("G6_HOLIDAYS_FILE").ok()
}

pub fn get_policy_file() -> Option<String> {
    std::env::var("G6_POLICY_FILE").ok()
}

pub fn get_log_dir() -> String {
    std::env::var("G6_LOG_DIR").unwrap_or_else(|_| "./logs".to_string())
}

/// Fabrication is on unless G6_FABRICATE is 0/false/no/off
pub fn fabrication_enabled() -> bool {
    std::env::var("G6_FABRICATE")
        .map(|v| parse_flag(&v))
        .unwrap_or(true)
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(raw.to_string()))
}

/// Snapshot of every environment setting the binary reads.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub mode: String,
    pub index: String,
    pub rule: String,
    pub today: NaiveDate,
    pub classify_date: Option<NaiveDate>,
    pub expiries_file: Option<String>,
    pub holidays_file: Option<String>,
    pub policy_file: Option<String>,
    pub fabricate: bool,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mode: get_execution_mode(),
            index: get_index_symbol(),
            rule: get_rule(),
            today: get_today()?,
            classify_date: get_classify_date()?,
            expiries_file: get_expiries_file(),
            holidays_file: get_holidays_file(),
            policy_file: get_policy_file(),
            fabricate: fabrication_enabled(),
        })
    }
}
