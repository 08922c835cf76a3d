//! Routing trie subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (once, single owner):
//!     (method, pattern, handler)
//!         → pattern.rs (grammar validation)
//!         → insert.rs (prefix split, edge creation)
//!         → Node tree (frozen after the last insert)
//!
//! Request (concurrent, read-only):
//!     (method, path) + RouteContext
//!         → find.rs (priority descent with backtracking)
//!         → RouteMatch { node, endpoints, handler }
//! ```
//!
//! # Design Decisions
//! - Two phases: mutable configuration, then immutable serving; matching
//!   takes `&self` and is safe from any number of threads
//! - The tree is generic over the handler payload and never invokes it
//! - Sibling precedence is fixed: static, regexp (registration order),
//!   plain param, wildcard

pub mod find;
pub mod insert;
pub mod introspect;
pub mod node;
pub mod pattern;

pub use find::RouteMatch;
pub use introspect::RouteDescriptor;
pub use node::{Endpoint, Endpoints, Node, NodeKind};
pub use pattern::{check_pattern, PatternError};
