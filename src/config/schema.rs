//! Configuration schema definitions.
//!
//! The route table maps request shapes to named targets. All types derive
//! Serde traits for deserialization from config files; semantic checks
//! live in `validation.rs`.

use serde::{Deserialize, Serialize};

/// Root configuration: a declarative route table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteTableConfig {
    /// Route definitions, in file order. Order matters for overlapping
    /// regex-constrained patterns.
    pub routes: Vec<RouteRule>,
}

/// One route registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteRule {
    /// Target identifier for logging/dispatch (e.g. a backend group).
    pub name: String,

    /// HTTP method to match: a verb, or "*" / "ANY" for all.
    #[serde(default = "default_method")]
    pub method: String,

    /// Route pattern: literals, `{param}`, `{param:regex}`, `*` wildcard.
    pub pattern: String,
}

fn default_method() -> String {
    "*".to_string()
}
