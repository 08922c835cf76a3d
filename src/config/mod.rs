//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors reported)
//!     → RouteTableConfig (validated)
//!     → loader::build_router → Mux<String> (target names as payloads)
//! ```
//!
//! # Design Decisions
//! - The built router is immutable; config changes mean a rebuild
//! - Rule order is preserved: it is the registration order, which is
//!   semantically significant for overlapping regex patterns
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_router, load_config, ConfigError};
pub use schema::{RouteRule, RouteTableConfig};
pub use validation::{validate_config, ValidationError};
