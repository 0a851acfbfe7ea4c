use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use chrono::Duration;
use sea_orm::DatabaseConnection;

use rollcall_attendance::router::{build_router, cors_layer};
use rollcall_attendance::state::AppState;
use rollcall_auth_types::identity::{Admin, Caller, Identity, TokenSecret};
use rollcall_testing::auth::{MockAuth, TEST_JWT_SECRET};

async fn admin_only(caller: Caller<Admin>) -> String {
    caller.user_id.to_string()
}

async fn whoami(identity: Identity) -> String {
    identity.role.to_string()
}

fn guard_server() -> TestServer {
    let app = Router::new()
        .route("/admin", get(admin_only))
        .route("/me", get(whoami))
        .with_state(TokenSecret::new(TEST_JWT_SECRET));
    TestServer::new(app).unwrap()
}

/// Full router over a disconnected pool: anything that reaches the database fails,
/// so these requests only exercise routing and guards.
fn service_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: TokenSecret::new(TEST_JWT_SECRET),
        jwt_ttl_secs: 3600,
        otp_ttl: Duration::minutes(10),
    };
    TestServer::new(build_router(state, cors_layer(&[]))).unwrap()
}

#[tokio::test]
async fn should_admit_matching_role() {
    let server = guard_server();
    let admin = MockAuth::admin();
    let (name, value) = admin.header();

    let response = server.get("/admin").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), admin.user_id.to_string());
}

#[tokio::test]
async fn should_forbid_student_on_admin_route() {
    let server = guard_server();
    let (name, value) = MockAuth::student().header();

    let response = server.get("/admin").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_require_token() {
    let server = guard_server();

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn identity_should_accept_any_role() {
    let server = guard_server();
    let (name, value) = MockAuth::teacher().header();

    let response = server.get("/me").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "teacher");
}

#[tokio::test]
async fn service_routes_should_be_guarded_by_role() {
    let server = service_server();

    let (name, value) = MockAuth::student().header();
    let response = server
        .post("/api/admin/users")
        .add_header(name, value)
        .json(&serde_json::json!({ "name": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = MockAuth::admin().header();
    let response = server
        .post("/api/student/attendance/mark")
        .add_header(name, value)
        .json(&serde_json::json!({ "otp": "482913" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server.get("/api/teacher/attendance/report").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn service_should_answer_health_and_unknown_paths() {
    let server = service_server();

    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);

    let response = server.get("/api/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn service_should_echo_request_id() {
    let server = service_server();

    let response = server
        .get("/healthz")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("req-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "req-123");
}

#[tokio::test]
async fn login_without_password_should_be_a_validation_error() {
    let server = service_server();

    let response = server
        .post("/api/auth/login")
        .json(&serde_json::json!({ "email": "admin@school.test" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "MISSING_FIELD");
    assert_eq!(body["message"], "password is required");
}
