//! Trie node structure.
//!
//! # Responsibilities
//! - One compressed edge of the routing trie, typed by capture behavior
//! - Own the child groups (static / regexp / param / wildcard)
//! - Hold the per-method endpoint table for routes terminating here
//!
//! # Design Decisions
//! - Tagged enum kind, not a type hierarchy; matching dispatches on the tag
//! - Kind discriminants are the match priority order and index `children`
//! - Static children stay sorted by label byte for binary-search lookup
//! - Regexp children keep registration order: order is part of the
//!   matching contract
//! - Strict ownership tree: no parent links, no shared edges

use std::collections::BTreeMap;

use regex::Regex;

use crate::method::Method;

/// Node kind by capture behavior. Discriminant order is match priority and
/// the index into [`Node::children`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    /// Literal bytes, matched verbatim.
    Static = 0,
    /// `{name:regex}` — constrained capture.
    Regexp = 1,
    /// `{name}` — capture up to tail delimiter.
    Param = 2,
    /// `*` / `*name` — capture the rest of the path.
    CatchAll = 3,
}

impl NodeKind {
    pub(crate) const GROUPS: [NodeKind; 4] = [
        NodeKind::Static,
        NodeKind::Regexp,
        NodeKind::Param,
        NodeKind::CatchAll,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A registered route terminating at a node, for one method.
#[derive(Debug, Clone)]
pub struct Endpoint<T> {
    pub handler: T,
    /// The original registration pattern.
    pub pattern: String,
    /// Capture names in pattern order; paired with values at match time.
    pub param_keys: Vec<String>,
}

/// Per-method endpoint table.
pub type Endpoints<T> = BTreeMap<Method, Endpoint<T>>;

/// One compressed edge of the routing trie. `T` is the opaque handler
/// payload; the tree never invokes it.
#[derive(Debug)]
pub struct Node<T> {
    pub(crate) kind: NodeKind,
    /// First byte of the edge; lookup key for static children.
    pub(crate) label: u8,
    /// Delimiter ending a capture (`/` unless the pattern declares a tail).
    pub(crate) tail: u8,
    /// Literal text (Static) or anchored regex source (Regexp).
    pub(crate) prefix: String,
    pub(crate) rex: Option<Regex>,
    pub(crate) endpoints: Endpoints<T>,
    /// Child groups indexed by [`NodeKind`].
    pub(crate) children: [Vec<Node<T>>; 4],
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    /// An empty root.
    pub fn new() -> Self {
        Node {
            kind: NodeKind::Static,
            label: 0,
            tail: 0,
            prefix: String::new(),
            rex: None,
            endpoints: Endpoints::new(),
            children: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    pub(crate) fn child(label: u8, tail: u8, prefix: &str) -> Self {
        Node {
            label,
            tail,
            prefix: prefix.to_string(),
            ..Node::new()
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The endpoint table for routes terminating at this node.
    pub fn endpoints(&self) -> &Endpoints<T> {
        &self.endpoints
    }

    /// A node with at least one endpoint terminates some route.
    pub fn is_leaf(&self) -> bool {
        !self.endpoints.is_empty()
    }

    /// The endpoint serving `method`: exact entry first, then `Any`.
    pub fn endpoint_for(&self, method: Method) -> Option<&Endpoint<T>> {
        self.endpoints
            .get(&method)
            .or_else(|| self.endpoints.get(&Method::Any))
    }

    /// Find an existing edge compatible with the segment being inserted.
    /// Regexp edges are distinct per (tail, regex source); param edges per
    /// tail; the wildcard edge is a singleton.
    pub(crate) fn edge_index(
        &self,
        kind: NodeKind,
        label: u8,
        tail: u8,
        rexpat: &str,
    ) -> Option<usize> {
        self.children[kind.index()].iter().position(|n| {
            n.label == label
                && n.tail == tail
                && (kind != NodeKind::Regexp || n.prefix == rexpat)
        })
    }

    /// Static child whose prefix starts with `label`, if any.
    pub(crate) fn static_edge(&self, label: u8) -> Option<&Node<T>> {
        let group = &self.children[NodeKind::Static.index()];
        group
            .binary_search_by(|n| n.label.cmp(&label))
            .ok()
            .map(|i| &group[i])
    }

    /// Attach `child` to its kind group, maintaining group order: static
    /// children sorted by label, capture groups in registration order with
    /// any `/`-tailed node kept last.
    pub(crate) fn append_child(&mut self, child: Node<T>) {
        let group = &mut self.children[child.kind.index()];
        let is_static = child.kind == NodeKind::Static;
        group.push(child);
        if is_static {
            group.sort_by_key(|n| n.label);
        } else {
            tail_sort(group);
        }
    }

    /// Write the endpoint for `(method, pattern)`. Last write wins; with
    /// `overwrite = false` an existing entry is kept instead.
    pub(crate) fn set_endpoint(
        &mut self,
        method: Method,
        handler: T,
        pattern: String,
        param_keys: Vec<String>,
        overwrite: bool,
    ) {
        if self.endpoints.contains_key(&method) {
            if !overwrite {
                return;
            }
            tracing::debug!(%method, pattern = %pattern, "replacing existing route endpoint");
        }
        self.endpoints.insert(
            method,
            Endpoint {
                handler,
                pattern,
                param_keys,
            },
        );
    }
}

/// Keep the `/`-tailed capture node last in its group so declared-tail
/// captures get first shot at the segment.
fn tail_sort<T>(group: &mut [Node<T>]) {
    let last = group.len() - 1;
    for i in (0..group.len()).rev() {
        if group[i].tail == super::pattern::TAIL_DELIM {
            group.swap(i, last);
            return;
        }
    }
}
