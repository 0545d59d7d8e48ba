//! Integration tests for the route table and resolver
//!
//! Covers registration validation, URL classification and the
//! build-then-match round trip over the built-in PWGuard table.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use pwguard_router::*;
use rstest::rstest;

fn pwguard_routing() -> Routing {
    RoutingConfig::default().build().unwrap()
}

fn params(pairs: &[(&str, &str)]) -> ParamMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_rejects_duplicate_name() {
    let result = RouteRegistry::register(vec![
        RouteDefinition::new("search", "/search").with_post_login().as_default(),
        RouteDefinition::new("search", "/find").with_post_login(),
    ]);
    assert_eq!(result.unwrap_err(), ConfigError::DuplicateName("search".to_string()));
}

#[test]
fn test_register_rejects_ambiguous_patterns() {
    let result = RouteRegistry::register(vec![
        RouteDefinition::new("search", "/search").with_post_login().as_default(),
        RouteDefinition::new("edit-entry", "/edit/:id").with_post_login(),
        RouteDefinition::new("edit-other", "/edit/:entryId").with_post_login(),
    ]);
    assert_eq!(
        result.unwrap_err(),
        ConfigError::AmbiguousPattern {
            name: "edit-other".to_string(),
            pattern: "/edit/:entryId".to_string(),
            other: "edit-entry".to_string(),
        }
    );
}

#[rstest]
#[case::none(vec![], 0)]
#[case::two(vec![true, true], 2)]
#[case::zero_of_two(vec![false, false], 0)]
fn test_register_requires_one_default(#[case] defaults: Vec<bool>, #[case] found: usize) {
    let definitions = defaults
        .iter()
        .enumerate()
        .map(|(idx, &is_default)| {
            let route = RouteDefinition::new(format!("r{}", idx), format!("/r{}", idx)).with_post_login();
            if is_default {
                route.as_default()
            } else {
                route
            }
        })
        .collect();
    assert_eq!(
        RouteRegistry::register(definitions).unwrap_err(),
        ConfigError::MissingOrMultipleDefaults { found }
    );
}

#[rstest]
#[case::no_slash("search", PatternError::MissingLeadingSlash)]
#[case::empty_segment("/edit//:id", PatternError::EmptySegment)]
#[case::bad_identifier("/edit/:1d", PatternError::InvalidPlaceholder("1d".to_string()))]
#[case::repeated("/copy/:id/:id", PatternError::DuplicatePlaceholder("id".to_string()))]
#[case::embedded("/at:time", PatternError::EmbeddedPlaceholder("at:time".to_string()))]
fn test_register_rejects_invalid_pattern(#[case] pattern: &str, #[case] expected: PatternError) {
    let result = RouteRegistry::register(vec![
        RouteDefinition::new("search", "/search").with_post_login().as_default(),
        RouteDefinition::new("broken", pattern).with_post_login(),
    ]);
    match result.unwrap_err() {
        ConfigError::InvalidPattern { name, source, .. } => {
            assert_eq!(name, "broken");
            assert_eq!(source, expected);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_admin_route_is_normalized_to_post_login() {
    let mut admin = RouteDefinition::new("admin-users", "/admin/users");
    admin.admin_only = true;
    let registry = RouteRegistry::register(vec![
        RouteDefinition::new("search", "/search").with_post_login().as_default(),
        admin,
    ])
    .unwrap();
    assert!(registry.by_name("admin-users").unwrap().post_login_required);
}

// ============================================================================
// Matching
// ============================================================================

#[rstest]
#[case("#/search", "search")]
#[case("https://pwguard.example/#/search?q=bank", "search")]
#[case("#!/profile", "profile")]
#[case("#/profile/", "profile")]
#[case("#/edit/17", "edit-entry")]
#[case("#/new-entry", "new-entry")]
#[case("#/new-entry/3", "new-entry")]
#[case("#/admin/users", "admin-users")]
fn test_match_url_classifies(#[case] url: &str, #[case] expected: &str) {
    let routing = pwguard_routing();
    assert_eq!(routing.resolver.route_for_url(url).unwrap().name, expected);
}

#[rstest]
#[case("#/edit")]
#[case("#/edit/1/2")]
#[case("#/nowhere")]
#[case("#/SEARCH")]
fn test_match_url_rejects(#[case] url: &str) {
    assert!(pwguard_routing().resolver.route_for_url(url).is_none());
}

#[test]
fn test_match_url_extracts_decoded_params() {
    let routing = pwguard_routing();
    let matched = routing.registry.match_url("#/edit/a%20b").unwrap();
    assert_eq!(matched.route.name, "edit-entry");
    assert_eq!(matched.params, params(&[("id", "a b")]));
}

#[test]
fn test_first_registered_route_wins() {
    let registry = RouteRegistry::register(vec![
        RouteDefinition::new("search", "/search").with_post_login().as_default(),
        RouteDefinition::new("users-me", "/users/me").with_post_login(),
        RouteDefinition::new("user", "/users/:id").with_post_login(),
    ])
    .unwrap();
    assert_eq!(registry.match_url("/users/me").unwrap().route.name, "users-me");
    assert_eq!(registry.match_url("/users/9").unwrap().route.name, "user");
}

#[test]
fn test_variadic_route() {
    let registry = Arc::new(
        RouteRegistry::register(vec![
            RouteDefinition::new("search", "/search").with_post_login().as_default(),
            RouteDefinition::new("docs", "/docs/:path*").with_post_login(),
        ])
        .unwrap(),
    );
    let matched = registry.match_url("#/docs/guide/install").unwrap();
    assert_eq!(matched.params, params(&[("path", "guide/install")]));
    assert!(registry.match_url("#/docs").is_none());

    let resolver = RouteResolver::new(registry);
    assert_eq!(
        resolver.path_for("docs", &params(&[("path", "guide/install")])).unwrap(),
        "/docs/guide/install"
    );
}

#[test]
fn test_case_insensitive_registry() {
    let registry = RouteRegistry::register_with_options(
        vec![
            RouteDefinition::new("search", "/search").with_post_login().as_default(),
            RouteDefinition::new("edit-entry", "/edit/:id").with_post_login(),
        ],
        true,
    )
    .unwrap();
    assert!(registry.is_case_insensitive());

    let matched = registry.match_url("#/EDIT/Ab").unwrap();
    assert_eq!(matched.route.name, "edit-entry");
    // Parameter values keep their case
    assert_eq!(matched.params, params(&[("id", "Ab")]));
}

// ============================================================================
// Resolver
// ============================================================================

#[rstest]
#[case("search", &[], "/search")]
#[case("edit-entry", &[("id", "5")], "/edit/5")]
#[case("new-entry", &[], "/new-entry")]
#[case("new-entry", &[("fromID", "12")], "/new-entry/12")]
#[case("edit-entry", &[("id", "a/b")], "/edit/a%2Fb")]
#[case("new-entry", &[("fromID", "")], "/new-entry")]
fn test_path_for(#[case] name: &str, #[case] pairs: &[(&str, &str)], #[case] expected: &str) {
    assert_eq!(pwguard_routing().resolver.path_for_params(name, pairs).unwrap(), expected);
}

#[test]
fn test_path_for_errors() {
    let routing = pwguard_routing();
    assert_eq!(
        routing.resolver.path_for("edit-entry", &ParamMap::new()),
        Err(RouteError::BadParams(ExpansionError::UnresolvedPlaceholder("id".to_string())))
    );
    assert_eq!(
        routing.resolver.path_for("serach", &ParamMap::new()),
        Err(RouteError::UnknownRoute("serach".to_string()))
    );
}

#[test]
fn test_path_for_empty_required_value() {
    let routing = pwguard_routing();
    assert_eq!(
        routing.resolver.path_for_params("edit-entry", &[("id", "")]),
        Err(RouteError::BadParams(ExpansionError::UnresolvedPlaceholder("id".to_string())))
    );
}

#[test]
fn test_href_for_profile() {
    let routing = pwguard_routing();
    assert_eq!(routing.resolver.href_for("profile", &ParamMap::new()).unwrap(), "#/profile");
}

#[test]
fn test_expand_ignores_extra_params() {
    assert_eq!(
        expand("/edit/:id", &params(&[("id", "5"), ("unused", "x")])).unwrap(),
        "/edit/5"
    );
}

/// Every route built from a complete parameter set matches back to itself
/// with the same parameters
#[test]
fn test_path_for_then_match_round_trip() {
    let routing = pwguard_routing();
    let samples = params(&[("id", "entry 7"), ("fromID", "3")]);

    for route in routing.registry.routes() {
        let path = routing.resolver.path_for(&route.name, &samples).unwrap();
        let matched = routing.registry.match_url(&path).unwrap();
        assert_eq!(matched.route.name, route.name, "path {path}");

        let pattern = routing.registry.pattern_for(&route.name).unwrap();
        let expected: ParamMap = pattern
            .placeholders()
            .map(|name| (name.to_string(), samples[name].clone()))
            .collect();
        assert_eq!(matched.params, expected, "path {path}");
    }
}
