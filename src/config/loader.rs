//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::method::Method;
use crate::mux::Mux;
use crate::routing::PatternError;

use super::schema::RouteTableConfig;
use super::validation::{validate_config, ValidationError};

/// Error type for configuration loading and building.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a route table from a TOML file.
pub fn load_config(path: &Path) -> Result<RouteTableConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RouteTableConfig = toml::from_str(&content)?;

    if let Err(errors) = validate_config(&config) {
        tracing::error!(
            path = %path.display(),
            errors = errors.len(),
            "route table validation failed"
        );
        return Err(ConfigError::Validation(errors));
    }

    tracing::info!(
        path = %path.display(),
        routes = config.routes.len(),
        "route table loaded"
    );
    Ok(config)
}

/// Build a router from a validated route table. Each rule registers its
/// target name as the handler payload, in file order.
pub fn build_router(config: &RouteTableConfig) -> Result<Mux<String>, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let mut mux = Mux::new();
    for rule in &config.routes {
        // validated above; parse again to keep this function standalone
        let method = Method::from_str(&rule.method)
            .map_err(|_| ConfigError::Validation(vec![ValidationError::UnknownMethod {
                name: rule.name.clone(),
                method: rule.method.clone(),
            }]))?;
        mux.method(method, &rule.pattern, rule.name.clone())?;
    }
    Ok(mux)
}
