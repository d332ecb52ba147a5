// Integration tests for `ApiClient` using wiremock.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use simops_api::types::{ExportRequest, InstanceQuery, UsageGroupBy};
use simops_api::{ApiClient, AuthMethod, Error, Scope, Session, UserProfile};

// ── Helpers ─────────────────────────────────────────────────────────

fn jwt_session() -> Arc<Session> {
    let session = Arc::new(Session::new());
    session.store_jwt(
        SecretString::from("test-jwt".to_owned()),
        UserProfile {
            email: Some("ops@example.com".into()),
            display_name: Some("Ops User".into()),
            role: Some("admin".into()),
            tenant_name: Some("Acme Telecom".into()),
        },
    );
    session
}

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client = ApiClient::new(base.parse().unwrap(), jwt_session()).unwrap();
    (server, client)
}

fn instance_page() -> serde_json::Value {
    json!({
        "data": [
            {
                "iccid": "8944100000000000001",
                "bundle_name": "EU 5GB",
                "bundle_moniker": "eu-5gb",
                "sequence": 1,
                "sequence_max": 3,
                "data_used_mb": 1200.0,
                "data_allowance_mb": 5120.0,
                "start_time": "2025-05-01T00:00:00Z",
                "end_time": "2025-05-31T00:00:00Z",
                "status_name": "Active"
            }
        ],
        "pagination": { "page": 1, "total_pages": 1, "total": 1, "per_page": 50 }
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn bundle_instances_decodes_envelope_and_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bundle-instances"))
        .and(query_param("status", "Active"))
        .and(query_param("per_page", "50"))
        .and(header("Authorization", "Bearer test-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance_page()))
        .mount(&server)
        .await;

    let query = InstanceQuery {
        status: Some("Active".into()),
        per_page: Some(50),
        ..InstanceQuery::default()
    };
    let page = client.bundle_instances(&query, false).await.unwrap();

    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data.len(), 1);
    let inst = &page.data[0];
    assert_eq!(inst.iccid.as_deref(), Some("8944100000000000001"));
    assert_eq!(inst.sequence, Some(1));
    assert_eq!(inst.sequence_max, Some(3));
}

#[tokio::test]
async fn service_token_session_uses_client_id_header() {
    let server = MockServer::start().await;
    let session = Arc::new(Session::new());
    session.store_service_token("Acme", SecretString::from("svc-token".to_owned()));
    assert_eq!(session.auth_method(), AuthMethod::ServiceToken);

    let base = format!("{}/api/v1", server.uri());
    let client = ApiClient::new(base.parse().unwrap(), session).unwrap();

    // Exactly one auth header style: CF-Access-Client-Id, no bearer.
    Mock::given(method("GET"))
        .and(path("/api/v1/usage/summary"))
        .and(header("CF-Access-Client-Id", "svc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": { "total_bytes": 42.0 },
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client
        .usage_summary(UsageGroupBy::Daily, None, None)
        .await
        .unwrap();
    assert_eq!(summary.summary.total_bytes, Some(42.0));

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests[0].headers.get("authorization").is_none(),
        "bearer header must not be sent alongside the client-id header"
    );
}

#[tokio::test]
async fn scope_params_are_merged_into_data_requests() {
    let (server, client) = setup().await;
    client.set_scope(Scope {
        tenant_id: Some("t-42".into()),
        customer: Some("Globex".into()),
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/endpoints"))
        .and(query_param("tenant_id", "t-42"))
        .and(query_param("customer", "Globex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [], "pagination": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.endpoints(None, None, None).await.unwrap();
}

// ── Cache behavior ──────────────────────────────────────────────────

#[tokio::test]
async fn repeated_get_within_ttl_hits_network_once() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bundle-instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance_page()))
        .expect(1)
        .mount(&server)
        .await;

    let query = InstanceQuery::default();
    client.bundle_instances(&query, false).await.unwrap();
    client.bundle_instances(&query, false).await.unwrap();
    // `expect(1)` verifies on drop: second call was served from cache.
}

#[tokio::test]
async fn expired_cache_entry_triggers_refetch() {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client =
        ApiClient::with_cache_ttl(base.parse().unwrap(), jwt_session(), Duration::from_millis(50))
            .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/bundle-instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance_page()))
        .expect(2)
        .mount(&server)
        .await;

    let query = InstanceQuery::default();
    client.bundle_instances(&query, false).await.unwrap();
    client.bundle_instances(&query, false).await.unwrap(); // cache hit
    tokio::time::sleep(Duration::from_millis(80)).await;
    client.bundle_instances(&query, false).await.unwrap(); // expired -> refetch
}

#[tokio::test]
async fn skip_cache_bypasses_stored_entry() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/bundle-instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instance_page()))
        .expect(2)
        .mount(&server)
        .await;

    let query = InstanceQuery::default();
    client.bundle_instances(&query, false).await.unwrap();
    client.bundle_instances(&query, true).await.unwrap();
}

#[tokio::test]
async fn mutation_clears_cached_listings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [], "pagination": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })))
        .mount(&server)
        .await;

    client.admin_users(None, None).await.unwrap();
    client
        .create_admin_user(json!({ "email": "new@example.com" }))
        .await
        .unwrap();
    // Cache was cleared by the mutation -- this GET goes to the network.
    client.admin_users(None, None).await.unwrap();
}

#[tokio::test]
async fn scope_change_clears_cache() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [], "pagination": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    client.endpoints(None, None, None).await.unwrap();
    client.set_scope(Scope {
        tenant_id: None,
        customer: None,
    });
    // Unchanged scope keeps the cache warm.
    client.endpoints(None, None, None).await.unwrap();
    client.set_scope(Scope {
        tenant_id: Some("t-1".into()),
        customer: None,
    });
    // The scoped URL differs anyway, but the old entry is also gone.
    Mock::given(method("GET"))
        .and(path("/api/v1/endpoints"))
        .and(query_param("tenant_id", "t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [], "pagination": {}
        })))
        .mount(&server)
        .await;
    client.endpoints(None, None, None).await.unwrap();
}

// ── Error taxonomy ──────────────────────────────────────────────────

#[tokio::test]
async fn http_401_tears_down_session() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client.session().is_authenticated());
    let result = client.endpoints(None, None, None).await;

    assert!(matches!(result, Err(Error::Unauthenticated)));
    assert!(
        !client.session().is_authenticated(),
        "401 must clear the session as a side effect"
    );
}

#[tokio::test]
async fn http_403_tears_down_session_on_mutations_too() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.create_admin_user(json!({})).await;

    assert!(matches!(result, Err(Error::Unauthenticated)));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn missing_credential_fails_before_any_network_call() {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client = ApiClient::new(base.parse().unwrap(), Arc::new(Session::new())).unwrap();

    let result = client.endpoints(None, None, None).await;
    assert!(matches!(result, Err(Error::Unauthenticated)));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn http_429_surfaces_reset_hint() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("X-RateLimit-Reset", "1748788200"),
        )
        .mount(&server)
        .await;

    let result = client.endpoints(None, None, None).await;

    match result {
        Err(Error::RateLimited { retry_at }) => {
            assert_eq!(retry_at.map(|t| t.timestamp()), Some(1_748_788_200));
        }
        other => panic!("expected RateLimited, got: {other:?}"),
    }
    // 429 is not an auth failure -- the session survives.
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn error_body_message_is_preferred_over_generic() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "invalid date range" })),
        )
        .mount(&server)
        .await;

    let result = client.usage_summary(UsageGroupBy::Daily, None, None).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "invalid date range");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.endpoints(None, None, None).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "API error: 500");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    // A proxy error page served with 200: not JSON, and with a
    // multi-byte character straddling the preview cutoff at byte 200.
    let mut body = "a".repeat(199);
    body.push('é');
    body.push_str(&"a".repeat(40));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.endpoints(None, None, None).await;

    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Downloads ───────────────────────────────────────────────────────

#[tokio::test]
async fn export_returns_raw_csv_with_filename() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/export"))
        .and(header_exists("Authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"usage.csv\"")
                .set_body_raw("iccid,used_mb\n8944...,1200\n", "text/csv"),
        )
        .mount(&server)
        .await;

    let download = client
        .export(&ExportRequest {
            dataset: "usage".into(),
            format: "csv".into(),
            from: None,
            to: None,
        })
        .await
        .unwrap();

    assert_eq!(download.filename.as_deref(), Some("usage.csv"));
    assert_eq!(download.content_type.as_deref(), Some("text/csv"));
    assert!(download.bytes.starts_with(b"iccid,used_mb"));
}

// ── Auth flow ───────────────────────────────────────────────────────

#[tokio::test]
async fn otp_flow_establishes_session() {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let session = Arc::new(Session::new());
    let client = ApiClient::new(base.parse().unwrap(), Arc::clone(&session)).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "otp_token": "otp-abc",
            "message": "code sent"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-xyz",
            "user": {
                "email": "ops@example.com",
                "display_name": "Ops User",
                "role": "admin",
                "tenant_name": "Acme Telecom"
            }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("hunter2".to_owned());
    let login = client.login("ops@example.com", &password).await.unwrap();
    assert_eq!(login.otp_token, "otp-abc");
    assert!(!session.is_authenticated());

    client.verify_otp(&login.otp_token, "123456").await.unwrap();
    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(session.org(), "Acme Telecom");
}

#[tokio::test]
async fn failed_login_surfaces_server_detail() {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client = ApiClient::new(base.parse().unwrap(), Arc::new(Session::new())).unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "bad password" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("nope".to_owned());
    let result = client.login("ops@example.com", &password).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "bad password"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}
