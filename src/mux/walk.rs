//! Route-table traversal.
//!
//! Visits every registered `(method, pattern, handler, middleware stack)`
//! exactly once, descending into mounted sub-routers. Mounted patterns are
//! joined onto the parent pattern with the mount wildcard collapsed, so a
//! sub-route `/users` mounted at `/admin` reports as `/admin/users`.

use crate::method::Method;

use super::handler::{Middleware, RouteTarget};
use super::router::Mux;

/// Walk `mux` depth-first. The visitor may stop the walk early by
/// returning an error, which is passed back to the caller.
pub fn walk<T, E, V>(mux: &Mux<T>, mut visitor: V) -> Result<(), E>
where
    V: FnMut(Method, &str, &T, &[Middleware<T>]) -> Result<(), E>,
{
    walk_mux(mux, "", &[], &mut visitor)
}

fn walk_mux<T, E, V>(
    mux: &Mux<T>,
    parent: &str,
    parent_middlewares: &[Middleware<T>],
    visitor: &mut V,
) -> Result<(), E>
where
    V: FnMut(Method, &str, &T, &[Middleware<T>]) -> Result<(), E>,
{
    let mut stack = parent_middlewares.to_vec();
    stack.extend(mux.middlewares().iter().cloned());

    mux.tree().try_visit(&mut |method, ep| match &ep.handler {
        RouteTarget::Handler(handler) => {
            let full = join_patterns(parent, &ep.pattern);
            visitor(method, &full, handler, &stack)
        }
        RouteTarget::Router(sub) => {
            if ep.pattern.ends_with("/*") {
                let prefix = format!("{parent}{}", ep.pattern);
                walk_mux(sub, &prefix, &stack, visitor)
            } else {
                // mount aliases at `p` and `p/`; the `p/*` entry carries
                // the recursion
                Ok(())
            }
        }
    })
}

fn join_patterns(parent: &str, pattern: &str) -> String {
    let full = format!("{parent}{pattern}");
    full.replace("/*/", "/")
}
