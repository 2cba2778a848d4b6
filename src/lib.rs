pub mod calendar;
pub mod candidates;
pub mod classify;
pub mod config;
pub mod error;
pub mod fabricate;
pub mod holidays;
pub mod logging;
pub mod models;
pub mod policy;
pub mod provider;
pub mod resolver;
pub mod rules;
pub mod selector;

// Re-exports (public API)
pub use candidates::filter_candidates;
pub use classify::{
    classify_expiry, is_monthly_expiry, is_monthly_expiry_dow, is_weekly_expiry,
    is_weekly_expiry_dow,
};
pub use error::{ConfigError, ExpiryError, ResolveExpiryError};
pub use holidays::HolidayCalendar;
pub use models::{CandidateInput, ExpiryKind, ExpiryResolution};
pub use policy::{IndexPolicy, PolicyTable};
pub use provider::{ExpiryProvider, StaticExpiryProvider};
pub use resolver::ExpiryResolver;
pub use rules::{Rule, normalize_rule};
pub use selector::{
    ExpirySelector, monthly_anchors, select_expiry_for_index, select_generic, select_monthly,
    select_weekly,
};
