//! Method-aware router over the routing trie.
//!
//! # Data Flow
//! ```text
//! Configuration:
//!     mux.get("/articles/{id}", handler)
//!         → routing::insert (tree build)
//!     mux.mount("/admin", sub_mux)
//!         → RouteTarget::Router leaf at /admin/*
//!
//! Request:
//!     mux.resolve(ctx, method, path)
//!         → routing::find
//!         → Found | MethodNotAllowed | NotFound
//!         → caller invokes the handler (never this crate)
//! ```
//!
//! # Design Decisions
//! - Leaf actions are capability-polymorphic: plain handler or nested
//!   router, so the tree type never depends on the mux type
//! - Explicit no-match variants rather than a silent default
//! - Middleware is a named, inspectable stack; this crate stores and
//!   reports it but never runs it

pub mod handler;
pub mod router;
pub mod walk;

pub use handler::{Middleware, RouteTarget};
pub use router::{Mux, Resolution};
pub use walk::walk;
