//! Mux tests: resolution, mounting, middleware, walking.

use route_trie::{walk, Method, Middleware, Mux, PatternError, Resolution, RouteContext};

fn found(res: Resolution<'_, &'static str>) -> &'static str {
    match res {
        Resolution::Found { handler } => *handler,
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn test_resolve_found() {
    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/articles/{id}", "show").unwrap();
    mux.post("/articles", "create").unwrap();

    let mut ctx = RouteContext::new();
    let handler = found(mux.resolve(&mut ctx, Method::Get, "/articles/42"));
    assert_eq!(handler, "show");
    assert_eq!(ctx.url_param("id"), Some("42"));
    assert_eq!(ctx.matched_pattern(), "/articles/{id}");
}

#[test]
fn test_resolve_method_not_allowed() {
    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/articles/{id}", "show").unwrap();
    mux.set_method_not_allowed("custom_405");

    let mut ctx = RouteContext::new();
    match mux.resolve(&mut ctx, Method::Delete, "/articles/42") {
        Resolution::MethodNotAllowed { allowed, handler } => {
            assert_eq!(allowed, [Method::Get]);
            assert_eq!(handler, Some(&"custom_405"));
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[test]
fn test_resolve_not_found() {
    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/articles", "list").unwrap();

    let mut ctx = RouteContext::new();
    match mux.resolve(&mut ctx, Method::Get, "/missing") {
        Resolution::NotFound { handler } => assert_eq!(handler, None),
        other => panic!("expected NotFound, got {other:?}"),
    }

    mux.set_not_found("custom_404");
    let mut ctx = RouteContext::new();
    match mux.resolve(&mut ctx, Method::Get, "/missing") {
        Resolution::NotFound { handler } => assert_eq!(handler, Some(&"custom_404")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_patterns_require_leading_slash() {
    let mut mux: Mux<&'static str> = Mux::new();
    assert!(matches!(
        mux.get("articles", "list"),
        Err(PatternError::MissingLeadingSlash { .. })
    ));
}

#[test]
fn test_mount_resolves_into_sub_router() {
    let mut sub: Mux<&'static str> = Mux::new();
    sub.get("/", "admin_home").unwrap();
    sub.get("/users", "admin_users").unwrap();
    sub.get("/users/{id}", "admin_user").unwrap();

    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/", "home").unwrap();
    mux.mount("/admin", sub).unwrap();

    let mut ctx = RouteContext::new();
    assert_eq!(found(mux.resolve(&mut ctx, Method::Get, "/admin")), "admin_home");

    let mut ctx = RouteContext::new();
    assert_eq!(
        found(mux.resolve(&mut ctx, Method::Get, "/admin/users")),
        "admin_users"
    );
    assert_eq!(ctx.route_patterns(), ["/admin/*", "/users"]);

    let mut ctx = RouteContext::new();
    assert_eq!(
        found(mux.resolve(&mut ctx, Method::Get, "/admin/users/7")),
        "admin_user"
    );
    // the mount's wildcard capture stays, followed by the sub-router's own
    assert_eq!(ctx.param_keys(), ["*", "id"]);
    assert_eq!(ctx.param_values(), ["users/7", "7"]);
    assert_eq!(ctx.matched_pattern(), "/users/{id}");

    let mut ctx = RouteContext::new();
    assert!(matches!(
        mux.resolve(&mut ctx, Method::Get, "/admin/missing"),
        Resolution::NotFound { .. }
    ));
}

#[test]
fn test_route_builds_and_mounts() {
    let mut mux: Mux<&'static str> = Mux::new();
    mux.route("/api", |api| {
        api.get("/status", "status").unwrap();
    })
    .unwrap();

    let mut ctx = RouteContext::new();
    assert_eq!(found(mux.resolve(&mut ctx, Method::Get, "/api/status")), "status");
}

#[test]
fn test_middleware_registry_and_wrap() {
    let mut mux: Mux<String> = Mux::new();
    mux.use_middleware(Middleware::new("outer", |h: String| format!("outer({h})")));
    mux.use_middleware(Middleware::new("inner", |h: String| format!("inner({h})")));

    assert_eq!(mux.wrap("handler".to_string()), "outer(inner(handler))");
    assert!(mux.get_middleware("outer").is_some());
    assert!(mux.get_middleware("inner").is_some());
    assert!(mux.get_middleware("missing").is_none());
}

#[test]
fn test_walk_visits_every_endpoint_once() {
    let mut sub: Mux<&'static str> = Mux::new();
    sub.get("/", "admin_home").unwrap();
    sub.get("/users", "admin_users").unwrap();
    sub.use_middleware(Middleware::new("auth", |h| h));

    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/", "home").unwrap();
    mux.get("/articles/{id}", "show").unwrap();
    mux.delete("/articles/{id}", "del").unwrap();
    mux.handle("/ping", "ping").unwrap();
    mux.use_middleware(Middleware::new("logger", |h| h));
    mux.mount("/admin", sub).unwrap();

    let mut entries: Vec<(Method, String, &'static str, Vec<String>)> = Vec::new();
    let walked: Result<(), std::convert::Infallible> = walk(&mux, |method, pattern, handler, mw| {
        let names = mw.iter().map(|m| m.name().to_string()).collect();
        entries.push((method, pattern.to_string(), *handler, names));
        Ok(())
    });
    assert!(walked.is_ok());

    let mut seen: Vec<(Method, &str)> = entries
        .iter()
        .map(|(m, p, _, _)| (*m, p.as_str()))
        .collect();
    seen.sort();
    assert_eq!(
        seen,
        [
            (Method::Delete, "/articles/{id}"),
            (Method::Get, "/"),
            (Method::Get, "/admin/"),
            (Method::Get, "/admin/users"),
            (Method::Get, "/articles/{id}"),
            (Method::Any, "/ping"),
        ]
    );

    let admin_users = entries
        .iter()
        .find(|(_, p, _, _)| p == "/admin/users")
        .unwrap();
    assert_eq!(admin_users.2, "admin_users");
    assert_eq!(admin_users.3, ["logger", "auth"]);

    let home = entries.iter().find(|(_, p, _, _)| p == "/").unwrap();
    assert_eq!(home.3, ["logger"]);
}

#[test]
fn test_has_pattern() {
    let mut mux: Mux<&'static str> = Mux::new();
    mux.get("/pages/*", "pages").unwrap();
    assert!(mux.has_pattern("/pages/*"));
    assert!(!mux.has_pattern("/pages*"));
}
