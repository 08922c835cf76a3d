//! Route registration and dispatch-free resolution.
//!
//! # Responsibilities
//! - Per-method registration helpers over one routing tree
//! - Mount nested routers at wildcard leaves
//! - Resolve (method, path) to a handler, or an explicit no-match
//! - Hold the named middleware stack and fallback handler slots
//!
//! # Design Decisions
//! - Resolution returns an explicit `Resolution` enum rather than a
//!   silent default; callers branch 404 vs 405 on it
//! - The mux never invokes handlers; execution belongs to the caller
//! - Mounted routers re-resolve against "/" + the wildcard capture

use std::sync::Arc;

use crate::context::RouteContext;
use crate::method::Method;
use crate::routing::{Node, PatternError, RouteDescriptor};

use super::handler::{Middleware, RouteTarget};

/// Outcome of [`Mux::resolve`]. The `handler` slots on the miss variants
/// carry the innermost router's custom fallback handler when one is set.
#[derive(Debug)]
pub enum Resolution<'a, T> {
    Found {
        handler: &'a T,
    },
    MethodNotAllowed {
        allowed: Vec<Method>,
        handler: Option<&'a T>,
    },
    NotFound {
        handler: Option<&'a T>,
    },
}

/// A method-aware router over one routing tree.
pub struct Mux<T> {
    tree: Node<RouteTarget<T>>,
    middlewares: Vec<Middleware<T>>,
    not_found: Option<T>,
    method_not_allowed: Option<T>,
}

impl<T> Default for Mux<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mux<T> {
    pub fn new() -> Self {
        Self {
            tree: Node::new(),
            middlewares: Vec::new(),
            not_found: None,
            method_not_allowed: None,
        }
    }

    /// Register `handler` for `method` at `pattern`. Last write wins for a
    /// repeated (method, pattern).
    pub fn method(
        &mut self,
        method: Method,
        pattern: &str,
        handler: T,
    ) -> Result<(), PatternError> {
        self.insert_target(method, pattern, RouteTarget::Handler(handler))
    }

    /// Register `handler` for every method at `pattern`.
    pub fn handle(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Any, pattern, handler)
    }

    pub fn connect(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Connect, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Delete, pattern, handler)
    }

    pub fn get(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Get, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Head, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Options, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Patch, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Post, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Put, pattern, handler)
    }

    pub fn trace(&mut self, pattern: &str, handler: T) -> Result<(), PatternError> {
        self.method(Method::Trace, pattern, handler)
    }

    /// Build a sub-router with `f` and mount it at `pattern`.
    pub fn route(
        &mut self,
        pattern: &str,
        f: impl FnOnce(&mut Mux<T>),
    ) -> Result<(), PatternError> {
        let mut sub = Mux::new();
        f(&mut sub);
        self.mount(pattern, sub)
    }

    /// Mount `sub` beneath `pattern`: requests for `pattern`, `pattern/`
    /// and anything under `pattern/` resolve inside the sub-router.
    pub fn mount(&mut self, pattern: &str, sub: Mux<T>) -> Result<(), PatternError> {
        let sub = Arc::new(sub);
        let mut mount_point = pattern.to_string();
        if mount_point.is_empty() || !mount_point.ends_with('/') {
            self.insert_target(Method::Any, &mount_point, RouteTarget::Router(Arc::clone(&sub)))?;
            mount_point.push('/');
            self.insert_target(Method::Any, &mount_point, RouteTarget::Router(Arc::clone(&sub)))?;
        }
        mount_point.push('*');
        self.insert_target(Method::Any, &mount_point, RouteTarget::Router(sub))
    }

    fn insert_target(
        &mut self,
        method: Method,
        pattern: &str,
        target: RouteTarget<T>,
    ) -> Result<(), PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }
        tracing::debug!(%method, pattern, "registering route");
        self.tree.insert_route(true, method, pattern, target)
    }

    /// Append a named middleware to the stack. The stack is metadata:
    /// reported by `walk`, foldable via [`Mux::wrap`].
    pub fn use_middleware(&mut self, middleware: Middleware<T>) {
        self.middlewares.push(middleware);
    }

    pub fn middlewares(&self) -> &[Middleware<T>] {
        &self.middlewares
    }

    /// Middleware by name, or `None`.
    pub fn get_middleware(&self, name: &str) -> Option<&Middleware<T>> {
        self.middlewares.iter().find(|m| m.name() == name)
    }

    /// Fold the middleware stack over `handler`, outermost-registered
    /// first.
    pub fn wrap(&self, handler: T) -> T {
        self.middlewares
            .iter()
            .rev()
            .fold(handler, |h, m| m.apply(h))
    }

    /// Handler for paths no route matches.
    pub fn set_not_found(&mut self, handler: T) {
        self.not_found = Some(handler);
    }

    pub fn not_found_handler(&self) -> Option<&T> {
        self.not_found.as_ref()
    }

    /// Handler for matched paths whose method has no endpoint.
    pub fn set_method_not_allowed(&mut self, handler: T) {
        self.method_not_allowed = Some(handler);
    }

    pub fn method_not_allowed_handler(&self) -> Option<&T> {
        self.method_not_allowed.as_ref()
    }

    /// Resolve `(method, path)` without invoking anything. Captures and
    /// the matched pattern chain accumulate in `ctx`; a mounted router is
    /// entered with "/" plus its wildcard capture.
    pub fn resolve<'a>(
        &'a self,
        ctx: &mut RouteContext,
        method: Method,
        path: &str,
    ) -> Resolution<'a, T> {
        match self.tree.find_route(ctx, method, path) {
            Some(m) => match m.handler {
                Some(RouteTarget::Handler(h)) => Resolution::Found { handler: h },
                Some(RouteTarget::Router(sub)) => {
                    let sub_path = ctx.next_route_path();
                    sub.as_ref().resolve(ctx, method, &sub_path)
                }
                None => Resolution::NotFound {
                    handler: self.not_found.as_ref(),
                },
            },
            None if ctx.method_not_allowed() => Resolution::MethodNotAllowed {
                allowed: ctx.methods_allowed().to_vec(),
                handler: self.method_not_allowed.as_ref(),
            },
            None => Resolution::NotFound {
                handler: self.not_found.as_ref(),
            },
        }
    }

    /// Whether the exact route template `pattern` is registered here (not
    /// inside mounted routers).
    pub fn has_pattern(&self, pattern: &str) -> bool {
        self.tree.find_pattern(pattern)
    }

    /// This router's own endpoints, mounted routers as opaque entries.
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        self.tree.routes()
    }

    pub(crate) fn tree(&self) -> &Node<RouteTarget<T>> {
        &self.tree
    }
}
