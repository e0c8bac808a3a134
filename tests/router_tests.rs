use std::sync::Arc;

use http::Method;
use trellis::{Context, Handler, RouteError, RouteMatch, Router};

fn noop() -> Handler {
    Arc::new(|_: &mut Context<'_>| {})
}

fn params(matched: &RouteMatch) -> Vec<(String, String)> {
    matched
        .path_params
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn static_route_matches_exactly() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/health", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/health").unwrap();
    assert_eq!(matched.route.as_ref(), "/health");
    assert!(matched.path_params.is_empty());
    assert!(router.find_route(&Method::GET, "/healthz").is_none());
}

#[test]
fn root_route_is_registrable() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/").unwrap();
    assert_eq!(matched.route.as_ref(), "/");
}

#[test]
fn param_route_captures_value() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/user/:id", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/user/42").unwrap();
    assert_eq!(matched.route.as_ref(), "/user/:id");
    assert_eq!(params(&matched), vec![("id".to_string(), "42".to_string())]);
}

#[test]
fn multiple_params_capture_in_template_order() {
    let mut router = Router::new();
    router
        .register(
            Method::GET,
            "/org/:org/repo/:repo",
            Some(noop()),
            Vec::new(),
        )
        .unwrap();

    let matched = router.find_route(&Method::GET, "/org/acme/repo/site").unwrap();
    assert_eq!(
        params(&matched),
        vec![
            ("org".to_string(), "acme".to_string()),
            ("repo".to_string(), "site".to_string()),
        ]
    );
}

#[test]
fn wildcard_captures_remainder() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/static/*", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/static/css/site/main.css").unwrap();
    assert_eq!(matched.route.as_ref(), "/static/*");
    assert_eq!(
        params(&matched),
        vec![("*".to_string(), "css/site/main.css".to_string())]
    );
}

#[test]
fn static_segment_beats_param() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/user/:id", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::GET, "/user/profile", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/user/profile").unwrap();
    assert_eq!(matched.route.as_ref(), "/user/profile");
    assert!(matched.path_params.is_empty());

    let matched = router.find_route(&Method::GET, "/user/99").unwrap();
    assert_eq!(matched.route.as_ref(), "/user/:id");
}

#[test]
fn param_segment_beats_wildcard() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/files/:name", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::GET, "/files/*", Some(noop()), Vec::new())
        .unwrap();

    let matched = router.find_route(&Method::GET, "/files/report").unwrap();
    assert_eq!(matched.route.as_ref(), "/files/:name");

    // Deeper paths fall through to the wildcard.
    let matched = router.find_route(&Method::GET, "/files/2024/report").unwrap();
    assert_eq!(matched.route.as_ref(), "/files/*");
    assert_eq!(
        params(&matched),
        vec![("*".to_string(), "2024/report".to_string())]
    );
}

#[test]
fn lookup_backtracks_from_static_dead_end() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/user/:id/posts", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::GET, "/user/profile", Some(noop()), Vec::new())
        .unwrap();

    // "profile" matches the static child first, but that branch has no
    // "posts" continuation; the search must back out and retry via :id.
    let matched = router.find_route(&Method::GET, "/user/profile/posts").unwrap();
    assert_eq!(matched.route.as_ref(), "/user/:id/posts");
    assert_eq!(
        params(&matched),
        vec![("id".to_string(), "profile".to_string())]
    );
}

#[test]
fn methods_are_isolated() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/items", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::POST, "/items", Some(noop()), Vec::new())
        .unwrap();

    assert!(router.find_route(&Method::GET, "/items").is_some());
    assert!(router.find_route(&Method::POST, "/items").is_some());
    assert!(router.find_route(&Method::DELETE, "/items").is_none());
}

#[test]
fn intermediate_node_without_handler_is_a_miss() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/api/v1/pets", Some(noop()), Vec::new())
        .unwrap();

    assert!(router.find_route(&Method::GET, "/api/v1").is_none());
    assert!(router.find_route(&Method::GET, "/api").is_none());
}

#[test]
fn middleware_only_registration_is_not_routable() {
    let mut router = Router::new();
    let tag: trellis::Middleware = Arc::new(|next| next);
    router
        .register(Method::GET, "/api", None, vec![tag])
        .unwrap();

    assert!(router.find_route(&Method::GET, "/api").is_none());
}

#[test]
fn lookup_ignores_duplicate_and_trailing_slashes() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/a/b", Some(noop()), Vec::new())
        .unwrap();

    assert!(router.find_route(&Method::GET, "/a/b/").is_some());
    assert!(router.find_route(&Method::GET, "//a//b").is_some());
}

#[test]
fn duplicate_handler_registration_is_rejected() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/dup", Some(noop()), Vec::new())
        .unwrap();
    let err = router
        .register(Method::GET, "/dup", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::HandlerConflict { .. }));
}

#[test]
fn conflicting_param_names_are_rejected() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/user/:id", Some(noop()), Vec::new())
        .unwrap();
    let err = router
        .register(Method::GET, "/user/:name/pets", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::ParamConflict { .. }));
}

#[test]
fn malformed_templates_are_rejected() {
    let mut router = Router::new();

    let err = router
        .register(Method::GET, "", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::EmptyPath));

    let err = router
        .register(Method::GET, "user/:id", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::MissingLeadingSlash(_)));

    let err = router
        .register(Method::GET, "/user/", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::TrailingSlash(_)));

    let err = router
        .register(Method::GET, "/a//b", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::EmptySegment(_)));

    let err = router
        .register(Method::GET, "/a/:", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::EmptyParamName(_)));

    let err = router
        .register(Method::GET, "/a/*/b", Some(noop()), Vec::new())
        .unwrap_err();
    assert!(matches!(err, RouteError::WildcardNotLast(_)));
}

#[test]
fn static_param_and_wildcard_may_share_a_parent() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/v/latest", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::GET, "/v/:tag", Some(noop()), Vec::new())
        .unwrap();
    router
        .register(Method::GET, "/v/*", Some(noop()), Vec::new())
        .unwrap();

    assert_eq!(
        router.find_route(&Method::GET, "/v/latest").unwrap().route.as_ref(),
        "/v/latest"
    );
    assert_eq!(
        router.find_route(&Method::GET, "/v/1.2").unwrap().route.as_ref(),
        "/v/:tag"
    );
    assert_eq!(
        router.find_route(&Method::GET, "/v/1/2").unwrap().route.as_ref(),
        "/v/*"
    );
}
