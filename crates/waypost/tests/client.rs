//! End-to-end tests for the wired client: login, restart, guarded
//! navigation, the 401 forced-logout flow, regions, and file calls —
//! all over the scripted mock backend.

use std::sync::Arc;
use std::time::Duration;

use waypost::{Client, FileCredentialStore, GuardOutcome, RegionId, WaypostError};
use waypost_transport::mock::{MockBackend, RecordingNavigator, RecordingNotifier};
use waypost_transport::SESSION_EXPIRED_MESSAGE;

// =========================================================================
// Helpers
// =========================================================================

fn profile_json(user_type: u8) -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "alice",
        "userType": user_type,
    })
}

struct Harness {
    client: Client<Arc<MockBackend>>,
    backend: Arc<MockBackend>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn harness_at(dir: &std::path::Path, current_path: &str) -> Harness {
    init_tracing();
    let backend = Arc::new(MockBackend::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::at(current_path));

    let client = Client::<Arc<MockBackend>>::builder("http://api.test/api")
        .credential_store(FileCredentialStore::new(dir.join("session.json")))
        .notifier(Arc::clone(&notifier))
        .navigator(Arc::clone(&navigator))
        .build_with(Arc::clone(&backend));

    Harness {
        client,
        backend,
        notifier,
        navigator,
    }
}

// =========================================================================
// Login and restart
// =========================================================================

#[tokio::test]
async fn test_login_stores_token_and_hydrates_profile() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");
    h.backend
        .enqueue_success(serde_json::json!({ "token": "tok-login" }));
    h.backend.enqueue_success(profile_json(0));

    let profile = h.client.login("alice", "secret").await.unwrap();
    assert_eq!(profile.username, "alice");
    assert!(h.client.session().is_authenticated());
    assert!(!h.client.session().is_privileged());

    // Login request had no bearer; the profile fetch carried the fresh
    // token.
    let requests = h.backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].bearer, None);
    assert_eq!(requests[1].bearer.as_deref(), Some("tok-login"));
}

#[tokio::test]
async fn test_restart_restores_credential_but_not_profile() {
    let dir = tempfile::tempdir().unwrap();
    {
        let h = harness_at(dir.path(), "/");
        h.backend
            .enqueue_success(serde_json::json!({ "token": "tok-persist" }));
        h.backend.enqueue_success(profile_json(0));
        h.client.login("alice", "secret").await.unwrap();
    }

    // "Fresh process": a new client over the same credential file.
    let h = harness_at(dir.path(), "/");
    assert_eq!(
        h.client.session().credential().as_deref(),
        Some("tok-persist")
    );
    assert!(h.client.session().profile().is_none());
}

#[tokio::test]
async fn test_logout_removes_persisted_credential() {
    let dir = tempfile::tempdir().unwrap();
    {
        let h = harness_at(dir.path(), "/");
        h.backend
            .enqueue_success(serde_json::json!({ "token": "tok" }));
        h.backend.enqueue_success(profile_json(0));
        h.client.login("alice", "secret").await.unwrap();
        h.client.logout();
    }

    let h = harness_at(dir.path(), "/");
    assert!(!h.client.session().is_authenticated());
}

// =========================================================================
// Guarded navigation through the full stack
// =========================================================================

#[tokio::test]
async fn test_restored_session_hydrates_on_first_guarded_navigation() {
    let dir = tempfile::tempdir().unwrap();
    {
        let h = harness_at(dir.path(), "/");
        h.backend
            .enqueue_success(serde_json::json!({ "token": "tok" }));
        h.backend.enqueue_success(profile_json(1));
        h.client.login("admin", "secret").await.unwrap();
    }

    let h = harness_at(dir.path(), "/");
    h.backend.enqueue_success(profile_json(1));

    assert_eq!(h.client.navigate("/admin/stats").await, GuardOutcome::Allow);
    // Hydrated as a side effect; the next navigation needs no fetch.
    assert_eq!(h.client.navigate("/admin").await, GuardOutcome::Allow);
    assert_eq!(h.backend.requests().len(), 1);
}

#[tokio::test]
async fn test_regular_user_sent_home_from_admin_routes() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");
    h.backend
        .enqueue_success(serde_json::json!({ "token": "tok" }));
    h.backend.enqueue_success(profile_json(0));
    h.client.login("alice", "secret").await.unwrap();

    assert_eq!(
        h.client.navigate("/admin/stats").await,
        GuardOutcome::RedirectToHome
    );
    assert_eq!(h.client.navigate("/user/profile").await, GuardOutcome::Allow);
}

#[tokio::test]
async fn test_unauthenticated_navigation_redirects_with_return_target() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");

    assert_eq!(
        h.client.navigate("/user/requests").await,
        GuardOutcome::RedirectToLogin {
            redirect: "/user/requests".into()
        }
    );
    assert_eq!(h.client.navigate("/").await, GuardOutcome::Allow);
}

// =========================================================================
// The 401 flow, end to end
// =========================================================================

#[tokio::test]
async fn test_stale_token_navigation_logs_out_redirects_and_notifies() {
    let dir = tempfile::tempdir().unwrap();
    {
        let h = harness_at(dir.path(), "/");
        h.backend
            .enqueue_success(serde_json::json!({ "token": "stale" }));
        h.backend.enqueue_success(profile_json(0));
        h.client.login("alice", "secret").await.unwrap();
    }

    let h = harness_at(dir.path(), "/user/profile");
    // The restored token is rejected when the guard hydrates.
    h.backend.enqueue_response(401, b"");

    let outcome = h.client.navigate("/admin/stats").await;
    assert_eq!(
        outcome,
        GuardOutcome::RedirectToLogin {
            redirect: "/admin/stats".into()
        }
    );

    // Transport side effects: session cleared, client redirected to the
    // login view with the *current* location encoded, fixed message.
    assert!(!h.client.session().is_authenticated());
    assert_eq!(
        h.navigator.redirects(),
        vec!["/login?redirect=%2Fuser%2Fprofile".to_string()]
    );
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, SESSION_EXPIRED_MESSAGE);

    // And persistence is gone too: a restart starts signed out.
    let h2 = harness_at(dir.path(), "/");
    assert!(!h2.client.session().is_authenticated());
}

#[tokio::test]
async fn test_current_user_without_credential_is_a_session_error() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");

    let result = h.client.current_user().await;
    assert!(matches!(result, Err(WaypostError::Session(_))));
}

// =========================================================================
// Regions through the client
// =========================================================================

#[tokio::test]
async fn test_regions_load_and_index_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");
    h.backend.enqueue_success(serde_json::json!({
        "A": { "B": { "C": "id1" } }
    }));

    h.client.regions().ensure_loaded().await.unwrap();
    assert_eq!(h.client.regions().label_for(&RegionId::from("id1")), "A B C");
    assert_eq!(
        h.client.regions().ids_for_province("A"),
        vec![RegionId::from("id1")]
    );

    let requests = h.backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/requests/regions"));
}

// =========================================================================
// File calls
// =========================================================================

#[tokio::test]
async fn test_upload_encodes_name_and_uses_upload_budget() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");
    h.backend
        .enqueue_success(serde_json::json!({ "fileName": "report final.pdf" }));

    let uploaded = h
        .client
        .upload_file("report final.pdf", vec![1, 2, 3])
        .await
        .unwrap();
    assert_eq!(uploaded.file_name, "report final.pdf");

    let request = &h.backend.requests()[0];
    assert!(request.url.ends_with("/files/upload?filename=report%20final.pdf"));
    assert_eq!(request.timeout, Duration::from_secs(60));
}

#[tokio::test]
async fn test_download_returns_raw_bytes_under_download_budget() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness_at(dir.path(), "/");
    h.backend.enqueue_response(200, &[1, 2, 3, 4]);

    let bytes = h.client.download_file("a.bin").await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 4]);

    let request = &h.backend.requests()[0];
    assert!(request.url.ends_with("/files/download/a.bin"));
    assert_eq!(request.timeout, Duration::from_secs(600));
}

// =========================================================================
// Re-export surface
// =========================================================================

// Hosts store the default-built client in struct fields, so its full
// type must be nameable through the facade alone.
#[cfg(feature = "reqwest-client")]
#[test]
fn test_default_client_type_is_nameable_from_facade() {
    let client: Client<waypost::ReqwestBackend> =
        Client::<waypost::ReqwestBackend>::builder("http://api.test/api").build();
    drop(client);
}
