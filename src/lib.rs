//! Compressed routing trie for HTTP services.
//!
//! Resolves an incoming method and path to a registered handler, capturing
//! path parameters along the way. Patterns mix literal segments, named
//! parameters (`{id}`), regex-constrained parameters (`{id:^[0-9]+}`) and
//! trailing wildcards (`*`); overlapping patterns resolve with fixed
//! precedence and backtracking. The crate never invokes handlers and has
//! no transport: it answers "which handler, with which parameters?".
//!
//! ```
//! use route_trie::{Method, Mux, Resolution, RouteContext};
//!
//! # fn main() -> Result<(), route_trie::PatternError> {
//! let mut mux: Mux<&'static str> = Mux::new();
//! mux.get("/articles/{id}", "show_article")?;
//! mux.get("/articles/{id:^[0-9]+}/raw", "raw_article")?;
//!
//! let mut ctx = RouteContext::new();
//! match mux.resolve(&mut ctx, Method::Get, "/articles/42") {
//!     Resolution::Found { handler } => {
//!         assert_eq!(*handler, "show_article");
//!         assert_eq!(ctx.url_param("id"), Some("42"));
//!     }
//!     _ => unreachable!("registered above"),
//! }
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod context;
pub mod method;
pub mod mux;
pub mod routing;

// Cross-cutting concerns
pub mod config;

pub use context::{ContextPool, PooledContext, RouteContext, RouteParams};
pub use method::{Method, MethodParseError};
pub use mux::{walk, Middleware, Mux, Resolution, RouteTarget};
pub use routing::{
    check_pattern, Endpoint, Endpoints, Node, NodeKind, PatternError, RouteDescriptor, RouteMatch,
};
