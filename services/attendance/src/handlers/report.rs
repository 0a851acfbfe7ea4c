use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::{Admin, Caller, Teacher};
use rollcall_domain::attendance::AttendanceStatus;

use crate::domain::types::{AttendanceFilter, NOT_AVAILABLE, StudentSummary};
use crate::error::AttendanceServiceError;
use crate::handlers::user::TeacherRef;
use crate::state::AppState;
use crate::usecase::report::{
    AttendanceReportEntry, AttendanceReportUseCase, StudentReportUseCase, TeacherReportEntry,
    TeacherReportUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

impl From<StudentSummary> for StudentRef {
    fn from(s: StudentSummary) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name,
            email: s.email,
            roll_number: s.roll_number,
        }
    }
}

/// Ledger entry with both parties inlined under `studentId` / `teacherId`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: StudentRef,
    pub teacher_id: TeacherRef,
    pub class_id: String,
    pub period: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<AttendanceReportEntry> for AttendanceEntryResponse {
    fn from(entry: AttendanceReportEntry) -> Self {
        let record = entry.record;
        Self {
            id: record.id.to_string(),
            student_id: entry.student.into(),
            teacher_id: entry.teacher.into(),
            class_id: record.class_id.unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
            period: record.period,
            date: record.date,
            status: record.status,
            timestamp: record.created_at,
        }
    }
}

// ── GET /api/admin/reports/attendance ────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReportQuery {
    pub class_id: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

pub async fn get_attendance_report(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Query(query): Query<AttendanceReportQuery>,
) -> Result<Json<Vec<AttendanceEntryResponse>>, AttendanceServiceError> {
    let usecase = AttendanceReportUseCase {
        users: state.user_repo(),
        attendance: state.attendance_repo(),
    };
    let entries = usecase
        .execute(AttendanceFilter {
            class_id: query.class_id.filter(|c| !c.is_empty()),
            teacher_id: query.teacher_id,
            student_id: query.student_id,
            period: query.period.filter(|p| !p.is_empty()),
            date: query.date,
        })
        .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(AttendanceEntryResponse::from)
            .collect(),
    ))
}

// ── GET /api/admin/reports/student/{id} ──────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct StudentReportQuery {
    pub date: Option<NaiveDate>,
}

pub async fn get_student_report(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(query): Query<StudentReportQuery>,
) -> Result<Json<Vec<AttendanceEntryResponse>>, AttendanceServiceError> {
    let usecase = StudentReportUseCase {
        users: state.user_repo(),
        attendance: state.attendance_repo(),
    };
    // The student's profile comes from GET /admin/users/{id}; this is just the rows.
    let report = usecase.execute(student_id, query.date).await?;
    Ok(Json(
        report
            .entries
            .into_iter()
            .map(AttendanceEntryResponse::from)
            .collect(),
    ))
}

// ── GET /api/teacher/attendance/report ───────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TeacherReportQuery {
    pub date: Option<NaiveDate>,
    pub period: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReportEntryResponse {
    pub student_id: String,
    pub name: String,
    pub roll_number: String,
    pub period: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl From<TeacherReportEntry> for TeacherReportEntryResponse {
    fn from(e: TeacherReportEntry) -> Self {
        Self {
            student_id: e.student_id.to_string(),
            name: e.name,
            roll_number: e.roll_number,
            period: e.period,
            date: e.date,
            status: e.status,
        }
    }
}

pub async fn get_teacher_report(
    teacher: Caller<Teacher>,
    State(state): State<AppState>,
    Query(query): Query<TeacherReportQuery>,
) -> Result<Json<Vec<TeacherReportEntryResponse>>, AttendanceServiceError> {
    let usecase = TeacherReportUseCase {
        users: state.user_repo(),
        attendance: state.attendance_repo(),
    };
    let entries = usecase
        .execute(teacher.user_id, query.date, query.period)
        .await?;
    Ok(Json(
        entries
            .into_iter()
            .map(TeacherReportEntryResponse::from)
            .collect(),
    ))
}
