use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use rollcall_core::error::not_found;
use rollcall_core::health::healthz;
use rollcall_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    attendance::{get_history, mark_attendance},
    auth::login,
    health::readyz,
    otp::{generate_otp, grant_otp},
    report::{get_attendance_report, get_student_report, get_teacher_report},
    user::{create_user, delete_user, get_user, list_users, update_user},
};
use crate::state::AppState;

/// CORS for the admin dashboard. No origins configured means any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/login", post(login))
        // Admin: users
        .route("/admin/users", post(create_user).get(list_users))
        .route(
            "/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Admin: reports
        .route("/admin/reports/attendance", get(get_attendance_report))
        .route("/admin/reports/student/{id}", get(get_student_report))
        // Admin: OTP on behalf of a teacher
        .route("/admin/otp/grant", post(grant_otp))
        // Teacher
        .route("/teacher/otp/generate", post(generate_otp))
        .route("/teacher/attendance/report", get(get_teacher_report))
        // Student
        .route("/student/attendance/mark", post(mark_attendance))
        .route("/student/attendance/history", get(get_history))
}

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(cors),
        )
        .with_state(state)
}
