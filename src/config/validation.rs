//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse method tokens, run each pattern through the route grammar
//! - Flag duplicate (method, pattern) rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Duplicate rules are a warning, not an error: last write wins by
//!   contract, but silent duplicates usually mean a config mistake
//! - Validation is pure: RouteTableConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;

use crate::method::Method;
use crate::routing::{check_pattern, PatternError};

use super::schema::RouteTableConfig;

/// A semantic problem in one route rule.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("route {name:?}: unknown method {method:?}")]
    UnknownMethod { name: String, method: String },

    #[error("route {name:?}: {source}")]
    BadPattern {
        name: String,
        #[source]
        source: PatternError,
    },

    #[error("route {name:?}: pattern must begin with '/': {pattern:?}")]
    MissingLeadingSlash { name: String, pattern: String },

    #[error("route at index {index} has an empty target name")]
    EmptyName { index: usize },
}

/// Check every rule, collecting all errors.
pub fn validate_config(config: &RouteTableConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for (index, rule) in config.routes.iter().enumerate() {
        if rule.name.is_empty() {
            errors.push(ValidationError::EmptyName { index });
        }
        if Method::from_str(&rule.method).is_err() {
            errors.push(ValidationError::UnknownMethod {
                name: rule.name.clone(),
                method: rule.method.clone(),
            });
        }
        if !rule.pattern.starts_with('/') {
            errors.push(ValidationError::MissingLeadingSlash {
                name: rule.name.clone(),
                pattern: rule.pattern.clone(),
            });
        } else if let Err(source) = check_pattern(&rule.pattern) {
            errors.push(ValidationError::BadPattern {
                name: rule.name.clone(),
                source,
            });
        }
        if !seen.insert((rule.method.to_ascii_uppercase(), rule.pattern.clone())) {
            tracing::warn!(
                name = %rule.name,
                method = %rule.method,
                pattern = %rule.pattern,
                "duplicate route rule; the later one wins"
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
