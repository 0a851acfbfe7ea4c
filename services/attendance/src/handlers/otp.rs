use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::{Admin, Caller, Teacher};

use crate::domain::types::OtpCode;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::otp::{GrantOtpUseCase, IssueOtpUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    pub otp: String,
    pub period: String,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<OtpCode> for OtpResponse {
    fn from(otp: OtpCode) -> Self {
        Self {
            otp: otp.code,
            period: otp.period,
            expires_at: otp.expires_at,
        }
    }
}

// ── POST /api/teacher/otp/generate ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateOtpRequest {
    pub period: Option<String>,
}

pub async fn generate_otp(
    teacher: Caller<Teacher>,
    State(state): State<AppState>,
    Json(body): Json<GenerateOtpRequest>,
) -> Result<(StatusCode, Json<OtpResponse>), AttendanceServiceError> {
    let usecase = IssueOtpUseCase {
        otps: state.otp_repo(),
        ttl: state.otp_ttl,
    };
    let otp = usecase.execute(teacher.user_id, body.period).await?;
    Ok((StatusCode::CREATED, Json(otp.into())))
}

// ── POST /api/admin/otp/grant ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantOtpRequest {
    pub teacher_id: Uuid,
    pub period: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantOtpResponse {
    pub message: String,
    pub teacher_id: String,
    pub teacher_name: String,
    #[serde(flatten)]
    pub otp: OtpResponse,
}

pub async fn grant_otp(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Json(body): Json<GrantOtpRequest>,
) -> Result<(StatusCode, Json<GrantOtpResponse>), AttendanceServiceError> {
    let usecase = GrantOtpUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
        ttl: state.otp_ttl,
    };
    let (otp, teacher) = usecase.execute(body.teacher_id, body.period).await?;
    Ok((
        StatusCode::CREATED,
        Json(GrantOtpResponse {
            message: format!("OTP granted on behalf of {}", teacher.name),
            teacher_id: teacher.id.to_string(),
            teacher_name: teacher.name,
            otp: otp.into(),
        }),
    ))
}
