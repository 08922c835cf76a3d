//! Leaf actions and middleware.

use std::fmt;
use std::sync::Arc;

use super::router::Mux;

/// What a resolved leaf dispatches to: a handler payload, or a whole
/// nested router mounted at a wildcard leaf. The nested router stays
/// opaque to the parent tree; dispatch into it is a fresh resolution, not
/// a structural join.
pub enum RouteTarget<T> {
    Handler(T),
    Router(Arc<Mux<T>>),
}

impl<T: fmt::Debug> fmt::Debug for RouteTarget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTarget::Handler(h) => f.debug_tuple("Handler").field(h).finish(),
            RouteTarget::Router(_) => f.write_str("Router(..)"),
        }
    }
}

/// A named handler transformer. The mux stores the stack as metadata and
/// reports it through `walk`; `Mux::wrap` folds it over a handler for
/// callers that realize chains themselves. Nothing here executes at
/// request time.
pub struct Middleware<T> {
    name: String,
    wrap: Arc<dyn Fn(T) -> T + Send + Sync>,
}

impl<T> Middleware<T> {
    pub fn new(name: impl Into<String>, wrap: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            wrap: Arc::new(wrap),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, handler: T) -> T {
        (self.wrap)(handler)
    }
}

impl<T> Clone for Middleware<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            wrap: Arc::clone(&self.wrap),
        }
    }
}

impl<T> fmt::Debug for Middleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}
