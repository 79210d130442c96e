//! # Error Types Module
//!
//! Error types shared by the recommendation core. None of them is fatal for
//! the bot: request errors are turned into chat replies (or dropped), catalog
//! errors only happen while the process starts.

use crate::catalog::Slot;

/// Outcomes of a cooking request that stop the normal flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The user asked again before the rate-limit window elapsed
    RateLimited { retry_in_secs: i64 },
    /// The free allowance is used up and the user is not entitled
    QuotaExceeded,
    /// A preference answer arrived outside the state that expects it
    StaleSessionEvent,
    /// The selector found nothing for the slot, even after the fallback retry
    EmptySelection { slot: Slot },
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::RateLimited { retry_in_secs } => {
                write!(f, "Rate limited: retry in {retry_in_secs}s")
            }
            RequestError::QuotaExceeded => write!(f, "Free quota exceeded"),
            RequestError::StaleSessionEvent => write!(f, "Stale preference answer"),
            RequestError::EmptySelection { slot } => write!(f, "No dishes available for {slot}"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Errors raised while loading and validating a dish catalog
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    Io(std::io::Error),
    /// The catalog document is not valid JSON for the dish schema
    Parse(serde_json::Error),
    /// Two entries share the same dish name
    DuplicateDish(String),
    /// A slot has no dish with the given healthy flag
    MissingCombination { slot: Slot, healthy: bool },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Catalog read error: {e}"),
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {e}"),
            CatalogError::DuplicateDish(name) => write!(f, "Duplicate dish in catalog: {name}"),
            CatalogError::MissingCombination { slot, healthy } => {
                write!(f, "Catalog has no {slot} dish with healthy={healthy}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}
