//! Per-match routing context.
//!
//! # Responsibilities
//! - Carry captured parameter keys/values in path order
//! - Record the matched pattern (and the chain of patterns across mounts)
//! - Distinguish "no route" from "route found, method not allowed"
//! - Hold an arbitrary caller-defined scratch value for the request
//!
//! # Design Decisions
//! - One context per in-flight match; never shared between concurrent
//!   matches (caller obligation, not enforced here)
//! - `route_params` is per-tree-search scratch; `url_params` is what
//!   handlers read, accumulated across nested-router dispatches
//! - Pooling is opt-in: `ContextPool::acquire` hands out a guard that
//!   resets and returns the context on drop

use std::any::Any;
use std::fmt;
use std::sync::Mutex;

use crate::method::Method;

/// Ordered parameter keys and values. Values are appended during tree
/// descent; keys are appended from the matched endpoint, so the two sides
/// may be unequal lengths mid-match.
#[derive(Debug, Default, Clone)]
pub struct RouteParams {
    pub(crate) keys: Vec<String>,
    pub(crate) values: Vec<String>,
}

impl RouteParams {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value for the first occurrence of `key`, if captured.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.values.is_empty()
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }
}

/// Reusable carrier for one match attempt.
pub struct RouteContext {
    url_params: RouteParams,
    route_params: RouteParams,
    route_pattern: String,
    route_patterns: Vec<String>,
    methods_allowed: Vec<Method>,
    method_not_allowed: bool,
    arg: Option<Box<dyn Any + Send>>,
}

impl RouteContext {
    pub fn new() -> Self {
        Self {
            url_params: RouteParams::default(),
            route_params: RouteParams::default(),
            route_pattern: String::new(),
            route_patterns: Vec::new(),
            methods_allowed: Vec::new(),
            method_not_allowed: false,
            arg: None,
        }
    }

    /// Clear every field, including the scratch slot. Pooled contexts are
    /// reset with this before reuse.
    pub fn reset(&mut self) {
        self.url_params.clear();
        self.route_params.clear();
        self.route_pattern.clear();
        self.route_patterns.clear();
        self.methods_allowed.clear();
        self.method_not_allowed = false;
        self.arg = None;
    }

    /// Captured parameters as handlers see them.
    pub fn params(&self) -> &RouteParams {
        &self.url_params
    }

    /// Captured keys in left-to-right path order.
    pub fn param_keys(&self) -> &[String] {
        &self.url_params.keys
    }

    /// Captured values, positionally matching `param_keys`.
    pub fn param_values(&self) -> &[String] {
        &self.url_params.values
    }

    /// Value captured for `key`, if any.
    pub fn url_param(&self, key: &str) -> Option<&str> {
        self.url_params.get(key)
    }

    /// The pattern of the most recent successful match ("" if none).
    pub fn matched_pattern(&self) -> &str {
        &self.route_pattern
    }

    /// Every pattern matched during resolution, outermost first. More than
    /// one entry means resolution crossed mounted routers.
    pub fn route_patterns(&self) -> &[String] {
        &self.route_patterns
    }

    /// True when some node matched the path but had no endpoint for the
    /// requested method. Meaningful only when the lookup returned no route.
    pub fn method_not_allowed(&self) -> bool {
        self.method_not_allowed
    }

    /// Methods that would have matched, for an Allow header.
    pub fn methods_allowed(&self) -> &[Method] {
        &self.methods_allowed
    }

    pub fn is_arg_set(&self) -> bool {
        self.arg.is_some()
    }

    /// Store a caller-defined scratch value, replacing any prior one.
    pub fn set_arg<A: Any + Send>(&mut self, arg: A) {
        self.arg = Some(Box::new(arg));
    }

    /// The scratch value, if one of type `A` is set.
    pub fn arg<A: Any>(&self) -> Option<&A> {
        self.arg.as_deref().and_then(|a| a.downcast_ref())
    }

    pub fn clear_arg(&mut self) {
        self.arg = None;
    }

    // -- internals used by the matcher --

    /// Start a fresh tree search. Keeps `url_params` (they accumulate
    /// across nested-router dispatches) and any method-not-allowed state
    /// flagged so far.
    pub(crate) fn begin_attempt(&mut self) {
        self.route_params.clear();
        self.route_pattern.clear();
    }

    pub(crate) fn push_value(&mut self, value: &str) {
        self.route_params.values.push(value.to_string());
    }

    pub(crate) fn pop_value(&mut self) {
        self.route_params.values.pop();
    }

    pub(crate) fn value_mark(&self) -> usize {
        self.route_params.values.len()
    }

    pub(crate) fn truncate_values(&mut self, mark: usize) {
        self.route_params.values.truncate(mark);
    }

    pub(crate) fn push_keys(&mut self, keys: &[String]) {
        self.route_params.keys.extend(keys.iter().cloned());
    }

    pub(crate) fn flag_method_not_allowed<'m>(
        &mut self,
        allowed: impl Iterator<Item = &'m Method>,
    ) {
        self.method_not_allowed = true;
        for m in allowed {
            if *m != Method::Any {
                self.methods_allowed.push(*m);
            }
        }
    }

    /// Promote the search-local captures into the request-visible set and
    /// record the matched pattern.
    pub(crate) fn commit(&mut self, pattern: &str) {
        self.url_params
            .keys
            .extend(self.route_params.keys.iter().cloned());
        self.url_params
            .values
            .extend(self.route_params.values.iter().cloned());
        self.route_pattern = pattern.to_string();
        self.route_patterns.push(pattern.to_string());
    }

    /// Path to route inside a mounted router: "/" plus whatever the
    /// trailing wildcard captured, or "/" when the mount matched exactly.
    pub(crate) fn next_route_path(&self) -> String {
        let keys = &self.route_params.keys;
        let values = &self.route_params.values;
        match keys.last() {
            Some(k) if k == "*" && values.len() >= keys.len() => {
                format!("/{}", values[keys.len() - 1])
            }
            _ => "/".to_string(),
        }
    }
}

impl Default for RouteContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("url_params", &self.url_params)
            .field("route_pattern", &self.route_pattern)
            .field("route_patterns", &self.route_patterns)
            .field("method_not_allowed", &self.method_not_allowed)
            .field("arg_set", &self.arg.is_some())
            .finish()
    }
}

/// Free-list of contexts for callers matching in a hot loop.
#[derive(Debug, Default)]
pub struct ContextPool {
    free: Mutex<Vec<RouteContext>>,
}

impl ContextPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a clean context. The guard returns it to the pool, reset, on
    /// drop. Holding two guards concurrently is fine; sharing one guard
    /// between two in-flight matches is not.
    pub fn acquire(&self) -> PooledContext<'_> {
        let ctx = self
            .free
            .lock()
            .ok()
            .and_then(|mut free| free.pop())
            .unwrap_or_default();
        PooledContext { ctx, pool: self }
    }

    fn release(&self, mut ctx: RouteContext) {
        ctx.reset();
        if let Ok(mut free) = self.free.lock() {
            free.push(ctx);
        }
    }
}

/// RAII guard around a pooled [`RouteContext`].
pub struct PooledContext<'p> {
    ctx: RouteContext,
    pool: &'p ContextPool,
}

impl std::ops::Deref for PooledContext<'_> {
    type Target = RouteContext;

    fn deref(&self) -> &RouteContext {
        &self.ctx
    }
}

impl std::ops::DerefMut for PooledContext<'_> {
    fn deref_mut(&mut self) -> &mut RouteContext {
        &mut self.ctx
    }
}

impl Drop for PooledContext<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.ctx));
    }
}
