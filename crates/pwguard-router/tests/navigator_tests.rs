//! End-to-end application-shell flows
//!
//! Drives a [`Navigator`] over the built-in PWGuard table with an in-memory
//! location and a scripted session provider.

use std::io::Write;

use pretty_assertions::assert_eq;
use pwguard_router::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn navigator(url: &str) -> Navigator<MemoryLocation> {
    init_tracing();
    RoutingConfig::default()
        .build()
        .unwrap()
        .navigator(MemoryLocation::new(url))
        .unwrap()
}

#[tokio::test]
async fn test_startup_restores_requested_route_with_params() {
    let mut nav = navigator("https://pwguard.example/#/edit/5");
    let provider = StaticSessionProvider::new(SessionState::user());

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert!(decision.is_allowed());
    assert_eq!(nav.session(), Some(&SessionState::user()));
    assert_eq!(nav.location().history(), ["/initializing", "/edit/5"]);
}

#[tokio::test]
async fn test_startup_anonymous_goes_to_login() {
    let mut nav = navigator("#/profile");
    let provider = StaticSessionProvider::default();

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert_eq!(decision, NavigationDecision::redirect("login"));
    assert_eq!(nav.location().current_url(), "/login");
}

#[tokio::test]
async fn test_startup_logged_in_on_login_goes_to_default() {
    let mut nav = navigator("#/login");
    let provider = StaticSessionProvider::new(SessionState::admin());

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert_eq!(decision, NavigationDecision::redirect("search"));
    assert_eq!(nav.location().current_url(), "/search");
}

#[tokio::test]
async fn test_startup_with_no_route_goes_to_login() {
    let mut nav = navigator("https://pwguard.example/");
    let provider = StaticSessionProvider::default();

    nav.refresh_session(&provider).await;

    assert_eq!(nav.location().current_url(), "/login");
}

#[tokio::test]
async fn test_reload_on_initializing_view_lands_on_default() {
    let mut nav = navigator("https://pwguard.example/#/initializing");
    let provider = StaticSessionProvider::new(SessionState::user());

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert_eq!(decision, NavigationDecision::redirect("search"));
    assert_eq!(nav.location().history(), ["/initializing", "/search"]);

    nav.on_route_change();
    assert_eq!(nav.current_route(), Some("search"));
}

#[tokio::test]
async fn test_reload_on_initializing_view_anonymous_lands_on_login() {
    let mut nav = navigator("#/initializing");
    let provider = StaticSessionProvider::default();

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert_eq!(decision, NavigationDecision::redirect("login"));
    assert_eq!(nav.location().current_url(), "/login");
}

#[tokio::test]
async fn test_failed_session_check_fails_closed() {
    let mut nav = navigator("#/admin/users");
    let provider = StaticSessionProvider::failing("connection refused");

    let decision = nav.refresh_session(&provider).await.unwrap();

    assert_eq!(nav.session(), Some(&SessionState::Anonymous));
    assert_eq!(decision, NavigationDecision::redirect("login"));
    assert_eq!(nav.location().current_url(), "/login");
}

#[tokio::test]
async fn test_query_string_survives_restore_on_search() {
    let mut nav = navigator("#/search?q=bank");
    let provider = StaticSessionProvider::new(SessionState::user());

    nav.refresh_session(&provider).await;

    assert_eq!(nav.location().current_url(), "/search?q=bank");
}

#[tokio::test]
async fn test_unauthorized_expires_session() {
    let mut nav = navigator("#/profile");
    let provider = StaticSessionProvider::new(SessionState::user());
    nav.refresh_session(&provider).await;

    assert_eq!(nav.on_unauthorized(), UnauthorizedOutcome::SessionExpired);
    assert_eq!(nav.session(), Some(&SessionState::Anonymous));
    assert_eq!(nav.location().current_url(), "/login");
    assert_eq!(nav.take_flash().as_deref(), Some(SESSION_TIMEOUT_MESSAGE));
    assert_eq!(nav.take_flash(), None);

    // The login page itself is fine for the now-anonymous session
    let decision = nav.on_route_change().unwrap();
    assert!(decision.is_allowed());
    assert_eq!(nav.current_route(), Some("login"));
}

#[tokio::test]
async fn test_recheck_remembers_current_route() {
    let mut nav = navigator("#/about");
    let provider = StaticSessionProvider::new(SessionState::user());
    nav.refresh_session(&provider).await;
    nav.on_route_change();
    assert_eq!(nav.current_route(), Some("about"));

    nav.location_mut().set_url("#/edit/9");
    nav.on_route_change();
    assert_eq!(nav.current_route(), Some("edit-entry"));

    nav.refresh_session(&provider).await;
    assert_eq!(nav.location().current_url(), "/edit/9");
}

#[test]
fn test_route_change_drops_query_string() {
    let mut nav = navigator("#/search");
    nav.set_session(SessionState::user());
    assert_eq!(nav.current_route(), Some("search"));

    nav.location_mut().set_url("#/profile?tab=keys");
    let decision = nav.on_route_change().unwrap();
    assert!(decision.is_allowed());
    assert_eq!(nav.location().current_url(), "/profile");
    assert_eq!(nav.current_route(), Some("profile"));

    // Arriving at search keeps its query
    nav.location_mut().set_url("#/search?q=mail");
    nav.on_route_change();
    assert_eq!(nav.location().current_url(), "#/search?q=mail");
}

#[test]
fn test_login_then_logout() {
    let mut nav = navigator("#/login");
    nav.set_session(SessionState::Anonymous);
    assert_eq!(nav.current_route(), Some("login"));

    let decision = nav.set_session(SessionState::user()).unwrap();
    assert_eq!(decision, NavigationDecision::redirect("search"));
    assert_eq!(nav.location().current_url(), "/search");

    nav.on_route_change();
    assert!(nav.route_is_active("search"));

    nav.set_session(SessionState::Anonymous);
    assert_eq!(nav.location().current_url(), "/login");
}

#[test]
fn test_admin_route_refused_to_user() {
    let mut nav = navigator("#/search");
    nav.set_session(SessionState::user());

    nav.location_mut().set_url("#/admin/users");
    let decision = nav.on_route_change().unwrap();
    assert_eq!(decision, NavigationDecision::redirect("search"));
    assert_eq!(nav.location().current_url(), "/search");
}

#[test]
fn test_routing_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
href_prefix = "#!"
initializing_route = "loading"

[[routes]]
name = "loading"
pattern = "/loading"
always_available = true

[[routes]]
name = "login"
pattern = "/login"
pre_login = true

[[routes]]
name = "vault"
pattern = "/vault/:folder?"
post_login = true
default = true
"##
    )
    .unwrap();

    let config = RoutingConfig::load(file.path()).unwrap();
    let routing = config.build().unwrap();
    assert_eq!(routing.resolver.href_for("vault", &ParamMap::new()).unwrap(), "#!/vault");

    let mut nav = routing.navigator(MemoryLocation::new("#!/vault/work")).unwrap();
    let ticket = nav.begin_session_check();
    assert_eq!(nav.location().current_url(), "/loading");

    nav.complete_session_check(ticket, Ok(SessionState::user()));
    assert_eq!(nav.location().current_url(), "/vault/work");
}

#[test]
fn test_load_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = RoutingConfig::load(dir.path().join("routes.toml")).unwrap();
    assert_eq!(config, RoutingConfig::default());
}

#[test]
fn test_session_response_drives_navigation() {
    let mut nav = navigator("#/admin/users");
    let ticket = nav.begin_session_check();

    let body = r#"{"loggedIn": true, "user": {"email": "ann@example.com", "firstName": "Ann", "admin": true}}"#;
    let session = SessionCheckResponse::from_json(body).map(SessionCheckResponse::into_session_state);
    let decision = nav.complete_session_check(ticket, session).unwrap();

    assert!(decision.is_allowed());
    assert_eq!(nav.location().current_url(), "/admin/users");
}
