use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rollcall_auth_types::identity::{Caller, Student};
use rollcall_domain::attendance::AttendanceStatus;

use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::attendance::MarkAttendanceUseCase;
use crate::usecase::report::{HistoryEntry, StudentHistoryUseCase};

// ── POST /api/student/attendance/mark ────────────────────────────────────────

#[derive(Deserialize)]
pub struct MarkAttendanceRequest {
    pub otp: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponse {
    pub message: &'static str,
    pub teacher_name: String,
    pub period: String,
    pub date: NaiveDate,
}

pub async fn mark_attendance(
    student: Caller<Student>,
    State(state): State<AppState>,
    Json(body): Json<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<MarkAttendanceResponse>), AttendanceServiceError> {
    let usecase = MarkAttendanceUseCase {
        users: state.user_repo(),
        otps: state.otp_repo(),
        attendance: state.attendance_repo(),
    };
    let output = usecase.execute(student.user_id, body.otp).await?;
    Ok((
        StatusCode::CREATED,
        Json(MarkAttendanceResponse {
            message: "Attendance marked successfully!",
            teacher_name: output.teacher_name,
            period: output.record.period,
            date: output.record.date,
        }),
    ))
}

// ── GET /api/student/attendance/history ──────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct HistoryQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub date: NaiveDate,
    pub period: String,
    pub status: AttendanceStatus,
    pub marked_by: String,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(e: HistoryEntry) -> Self {
        Self {
            date: e.date,
            period: e.period,
            status: e.status,
            marked_by: e.marked_by,
        }
    }
}

#[derive(Serialize)]
pub struct HistoryResponse {
    /// Echo of the requested day, `null` for the full history.
    pub date: Option<NaiveDate>,
    pub attendance: Vec<HistoryEntryResponse>,
}

pub async fn get_history(
    student: Caller<Student>,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AttendanceServiceError> {
    let usecase = StudentHistoryUseCase {
        users: state.user_repo(),
        attendance: state.attendance_repo(),
    };
    let entries = usecase.execute(student.user_id, query.date).await?;
    Ok(Json(HistoryResponse {
        date: query.date,
        attendance: entries.into_iter().map(HistoryEntryResponse::from).collect(),
    }))
}
