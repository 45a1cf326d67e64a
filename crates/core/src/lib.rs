//! Rule-based extraction of cruise travel preferences and date ranges from
//! free text.
//!
//! Both entry points are pure: [`PreferenceExtractor::extract`] and
//! [`DateResolver::resolve_at`] hold no state, do no I/O and never fail.
//! Callers judge result quality from empty fields and
//! [`DateRange::confidence`].

pub mod config;
pub mod dates;
pub mod errors;
pub mod preferences;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use dates::{DateRange, DateResolver, Provenance, Season};
pub use errors::{ApplicationError, InterfaceError};
pub use preferences::{
    Activity, BudgetRange, CabinType, CruiseLine, Destination, KeywordCategory,
    PreferenceExtractor, PreferenceRecord, SpecialRequirement,
};
