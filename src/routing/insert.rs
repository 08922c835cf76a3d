//! Route insertion.
//!
//! Builds or extends the trie from `(overwrite, method, pattern, handler)`.
//! Shared literal prefixes are split into intermediate nodes; capture
//! markers open their own child groups. The whole pattern is validated
//! before the first mutation, so a malformed pattern never leaves a
//! half-inserted route behind.

use regex::Regex;

use crate::method::Method;

use super::node::{Node, NodeKind};
use super::pattern::{self, PatternError};

/// Endpoint data carried down to whichever node terminates the pattern.
struct PendingEndpoint<T> {
    overwrite: bool,
    method: Method,
    handler: T,
    pattern: String,
    param_keys: Vec<String>,
}

impl<T> Node<T> {
    /// Register `handler` for `(method, pattern)`. Re-registration replaces
    /// the previous endpoint (last write wins) unless `overwrite` is false.
    pub fn insert_route(
        &mut self,
        overwrite: bool,
        method: Method,
        pattern: &str,
        handler: T,
    ) -> Result<(), PatternError> {
        let param_keys = pattern::param_keys(pattern)?;
        self.insert(
            pattern,
            PendingEndpoint {
                overwrite,
                method,
                handler,
                pattern: pattern.to_string(),
                param_keys,
            },
        )
    }

    fn insert(&mut self, search: &str, pending: PendingEndpoint<T>) -> Result<(), PatternError> {
        if search.is_empty() {
            self.apply(pending);
            return Ok(());
        }

        let label = search.as_bytes()[0];
        let seg = if label == b'{' || label == b'*' {
            Some(pattern::next_segment(search)?)
        } else {
            None
        };
        let (kind, tail, rexpat, seg_end) = match &seg {
            Some(s) => (s.kind, s.tail, s.rexpat.as_str(), s.end),
            None => (NodeKind::Static, 0, "", 0),
        };

        let idx = match self.edge_index(kind, label, tail, rexpat) {
            Some(idx) => idx,
            None => {
                // no compatible edge; attach the remainder as a new subtree
                let child = Node::child(label, tail, search);
                return self.add_child(child, search, pending);
            }
        };

        if kind != NodeKind::Static {
            // capture node already on the tree; step over the marker
            return self.children[kind.index()][idx].insert(&search[seg_end..], pending);
        }

        let common = pattern::longest_prefix(search, &self.children[0][idx].prefix);
        if common == self.children[0][idx].prefix.len() {
            return self.children[0][idx].insert(&search[common..], pending);
        }
        self.split_child(idx, common, search, pending)
    }

    /// An existing static edge shares only part of the new literal run:
    /// hoist a node holding the shared prefix and reattach both suffixes
    /// under it.
    fn split_child(
        &mut self,
        idx: usize,
        common: usize,
        search: &str,
        pending: PendingEndpoint<T>,
    ) -> Result<(), PatternError> {
        let split = Node::child(search.as_bytes()[0], 0, &search[..common]);
        let mut old = std::mem::replace(&mut self.children[0][idx], split);
        old.label = old.prefix.as_bytes()[common];
        old.prefix = old.prefix.split_off(common);
        let split = &mut self.children[0][idx];
        split.append_child(old);

        let rest = &search[common..];
        if rest.is_empty() {
            split.apply(pending);
            return Ok(());
        }
        let child = Node::child(rest.as_bytes()[0], 0, rest);
        split.add_child(child, rest, pending)
    }

    /// Attach `child` (prefix = the raw remaining pattern) under `self`,
    /// recursively splitting the remainder at capture boundaries. The
    /// endpoint lands on whichever node ends up terminal.
    fn add_child(
        &mut self,
        mut child: Node<T>,
        search: &str,
        pending: PendingEndpoint<T>,
    ) -> Result<(), PatternError> {
        let seg = pattern::next_segment(search)?;
        match seg.kind {
            NodeKind::Static => {
                // all-literal remainder terminates here
                child.apply(pending);
            }
            _ => {
                if seg.kind == NodeKind::Regexp {
                    let rex = Regex::new(&seg.rexpat).map_err(|source| {
                        PatternError::InvalidRegex {
                            rexpat: seg.rexpat.clone(),
                            source,
                        }
                    })?;
                    child.prefix = seg.rexpat.clone();
                    child.rex = Some(rex);
                }

                if seg.start == 0 {
                    // the capture leads this edge
                    child.kind = seg.kind;
                    child.tail = seg.tail;
                    let consumed = if seg.kind == NodeKind::CatchAll {
                        search.len()
                    } else {
                        seg.end
                    };
                    if consumed < search.len() {
                        // literal continuation after the capture; adjacent
                        // captures are impossible, so it starts static
                        let rest = &search[consumed..];
                        let next = Node::child(rest.as_bytes()[0], 0, rest);
                        child.add_child(next, rest, pending)?;
                    } else {
                        child.apply(pending);
                    }
                } else {
                    // literal lead-in, then the capture
                    child.kind = NodeKind::Static;
                    child.prefix = search[..seg.start].to_string();
                    child.rex = None;
                    let rest = &search[seg.start..];
                    let next = Node::child(rest.as_bytes()[0], seg.tail, "");
                    child.add_child(next, rest, pending)?;
                }
            }
        }
        self.append_child(child);
        Ok(())
    }

    fn apply(&mut self, pending: PendingEndpoint<T>) {
        self.set_endpoint(
            pending.method,
            pending.handler,
            pending.pattern,
            pending.param_keys,
            pending.overwrite,
        );
    }
}
