//! Tree introspection.
//!
//! Probing and enumeration for diagnostics and documentation tooling.
//! Works on pattern *text*, not concrete paths: `find_pattern` answers
//! "was this exact route template registered?", and `routes` dumps every
//! endpoint in deterministic order.

use serde::Serialize;

use crate::method::Method;

use super::node::{Endpoint, Node, NodeKind};
use super::pattern::longest_prefix;

/// One registered route, as enumerated by [`Node::routes`].
#[derive(Debug, Clone, Serialize)]
pub struct RouteDescriptor {
    pub method: Method,
    pub pattern: String,
    pub param_names: Vec<String>,
}

impl<T> Node<T> {
    /// Whether the exact route template `pattern` is registered below this
    /// node. Similar-looking but syntactically different strings do not
    /// match: a registered `/pages/*` is not found by `/pages*`.
    pub fn find_pattern(&self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        for kind in NodeKind::GROUPS {
            for xn in &self.children[kind.index()] {
                let idx = match xn.kind {
                    NodeKind::Static => {
                        let common = longest_prefix(pattern, &xn.prefix);
                        if common < xn.prefix.len() {
                            continue;
                        }
                        common
                    }
                    // step over the {...} marker; the tail and any literal
                    // continuation live in this node's children
                    NodeKind::Param | NodeKind::Regexp => {
                        if !pattern.starts_with('{') {
                            continue;
                        }
                        match pattern.find('}') {
                            Some(i) => i + 1,
                            None => continue,
                        }
                    }
                    NodeKind::CatchAll => longest_prefix(pattern, "*"),
                };
                if idx == 0 {
                    continue;
                }
                let rest = &pattern[idx..];
                if rest.is_empty() {
                    return true;
                }
                if xn.find_pattern(rest) {
                    return true;
                }
            }
        }
        false
    }

    /// Every endpoint below this node: `(method, pattern, param names)` in
    /// deterministic order (children in priority/registration order,
    /// methods in token order).
    pub fn routes(&self) -> Vec<RouteDescriptor> {
        let mut out = Vec::new();
        let _: Result<(), std::convert::Infallible> =
            self.try_visit(&mut |method, ep: &Endpoint<T>| {
                out.push(RouteDescriptor {
                    method,
                    pattern: ep.pattern.clone(),
                    param_names: ep.param_keys.clone(),
                });
                Ok(())
            });
        out
    }

    /// Depth-first endpoint traversal with early exit.
    pub(crate) fn try_visit<E>(
        &self,
        f: &mut impl FnMut(Method, &Endpoint<T>) -> Result<(), E>,
    ) -> Result<(), E> {
        for (method, ep) in &self.endpoints {
            f(*method, ep)?;
        }
        for group in &self.children {
            for child in group {
                child.try_visit(f)?;
            }
        }
        Ok(())
    }
}
