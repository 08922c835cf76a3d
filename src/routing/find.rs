//! Route matching.
//!
//! # Responsibilities
//! - Resolve a concrete (method, path) against the trie
//! - Capture parameter values in left-to-right path order
//! - Distinguish not-found from method-not-allowed
//!
//! # Design Decisions
//! - Per-node candidate order: static children, then regexp captures in
//!   registration order, then the plain param, then the wildcard
//! - Backtracking is ordinary recursive unwinding; captures pushed on the
//!   way down are rolled back when a branch fails
//! - Read-only over `&self`: a configured tree is freely shared across
//!   threads, and the hot path performs no allocation besides captures
//! - Nothing is logged here

use crate::context::RouteContext;
use crate::method::Method;

use super::node::{Endpoints, Node, NodeKind};

/// A successful lookup: the terminal node, its endpoint table, and (as
/// convenience) the handler registered for the requested method.
#[derive(Debug)]
pub struct RouteMatch<'n, T> {
    pub node: &'n Node<T>,
    pub endpoints: &'n Endpoints<T>,
    pub handler: Option<&'n T>,
}

impl<T> Node<T> {
    /// Resolve `path` for `method`, filling `ctx` with ordered captures and
    /// the matched pattern.
    ///
    /// `None` means no route: check [`RouteContext::method_not_allowed`] to
    /// tell a bare miss from a node that matched without an endpoint for
    /// this method.
    pub fn find_route<'n>(
        &'n self,
        ctx: &mut RouteContext,
        method: Method,
        path: &str,
    ) -> Option<RouteMatch<'n, T>> {
        ctx.begin_attempt();
        let node = self.search(ctx, method, path)?;
        let endpoint = node.endpoint_for(method);
        if let Some(ep) = endpoint {
            ctx.commit(&ep.pattern);
        }
        Some(RouteMatch {
            node,
            endpoints: node.endpoints(),
            handler: endpoint.map(|ep| &ep.handler),
        })
    }

    /// Recursive descent. Consumes `path` byte-wise against each child
    /// group in priority order and unwinds on failure.
    fn search<'n>(
        &'n self,
        ctx: &mut RouteContext,
        method: Method,
        path: &str,
    ) -> Option<&'n Node<T>> {
        for kind in NodeKind::GROUPS {
            let group = &self.children[kind.index()];
            if group.is_empty() {
                continue;
            }

            match kind {
                NodeKind::Static => {
                    let label = path.bytes().next().unwrap_or(0);
                    let Some(xn) = self.static_edge(label) else {
                        continue;
                    };
                    if !path.starts_with(xn.prefix.as_str()) {
                        continue;
                    }
                    if let Some(found) = xn.accept(ctx, method, &path[xn.prefix.len()..]) {
                        return Some(found);
                    }
                }

                NodeKind::Regexp | NodeKind::Param => {
                    if path.is_empty() {
                        continue;
                    }
                    // candidates in registration order, `/`-tail last
                    for xn in group {
                        // the capture runs to the declared tail, else to
                        // the end of the path
                        let p = match path.bytes().position(|b| b == xn.tail) {
                            Some(p) => p,
                            None if xn.tail == b'/' => path.len(),
                            None => continue,
                        };
                        if kind == NodeKind::Regexp && p == 0 {
                            continue;
                        }
                        let capture = &path[..p];
                        if let Some(rex) = &xn.rex {
                            if !rex.is_match(capture) {
                                continue;
                            }
                        } else if capture.contains('/') {
                            // a plain param never crosses segments
                            continue;
                        }

                        let mark = ctx.value_mark();
                        ctx.push_value(capture);
                        if let Some(found) = xn.accept(ctx, method, &path[p..]) {
                            return Some(found);
                        }
                        ctx.truncate_values(mark);
                    }
                }

                NodeKind::CatchAll => {
                    // consumes the remainder verbatim; an empty remainder
                    // is a valid, empty capture
                    let xn = &group[0];
                    ctx.push_value(path);
                    if let Some(found) = xn.accept(ctx, method, "") {
                        return Some(found);
                    }
                    ctx.pop_value();
                }
            }
        }

        None
    }

    /// A candidate edge matched its own bytes; finish or descend. When the
    /// path is exhausted at a leaf the endpoint must cover the requested
    /// method, otherwise the miss is flagged and the search continues.
    fn accept<'n>(
        &'n self,
        ctx: &mut RouteContext,
        method: Method,
        rest: &str,
    ) -> Option<&'n Node<T>> {
        if rest.is_empty() && self.is_leaf() {
            if let Some(ep) = self.endpoint_for(method) {
                ctx.push_keys(&ep.param_keys);
                return Some(self);
            }
            ctx.flag_method_not_allowed(self.endpoints.keys());
        }
        self.search(ctx, method, rest)
    }
}
