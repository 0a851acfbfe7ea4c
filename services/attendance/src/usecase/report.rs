//! Read-only ledger views. References to deleted users render as placeholders.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use rollcall_domain::attendance::AttendanceStatus;
use rollcall_domain::user::UserRole;

use crate::domain::repository::{AttendanceRepository, UserRepository};
use crate::domain::types::{
    AttendanceFilter, AttendanceRecord, NOT_AVAILABLE, StudentSummary, TeacherSummary,
    UNKNOWN_STUDENT, UNKNOWN_TEACHER, User,
};
use crate::error::AttendanceServiceError;

/// Load every user referenced by `records` in one query.
async fn referenced_users<U: UserRepository>(
    users: &U,
    records: &[AttendanceRecord],
) -> Result<HashMap<Uuid, User>, AttendanceServiceError> {
    let mut ids: Vec<Uuid> = records
        .iter()
        .flat_map(|r| [r.student_id, r.teacher_id])
        .collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(users
        .find_many(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

/// Admin view of one ledger entry.
#[derive(Debug, Clone)]
pub struct AttendanceReportEntry {
    pub record: AttendanceRecord,
    pub student: StudentSummary,
    pub teacher: TeacherSummary,
}

fn admin_entries(
    records: Vec<AttendanceRecord>,
    people: &HashMap<Uuid, User>,
) -> Vec<AttendanceReportEntry> {
    records
        .into_iter()
        .map(|record| AttendanceReportEntry {
            student: people
                .get(&record.student_id)
                .map(StudentSummary::of)
                .unwrap_or_else(|| StudentSummary::missing(record.student_id)),
            teacher: people
                .get(&record.teacher_id)
                .map(TeacherSummary::of)
                .unwrap_or_else(|| TeacherSummary::missing(record.teacher_id)),
            record,
        })
        .collect()
}

// ── AttendanceReport (admin) ─────────────────────────────────────────────────

pub struct AttendanceReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub attendance: A,
}

impl<U, A> AttendanceReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        filter: AttendanceFilter,
    ) -> Result<Vec<AttendanceReportEntry>, AttendanceServiceError> {
        let records = self.attendance.list(&filter).await?;
        let people = referenced_users(&self.users, &records).await?;
        Ok(admin_entries(records, &people))
    }
}

// ── StudentReport (admin) ────────────────────────────────────────────────────

pub struct StudentReport {
    pub student: User,
    pub entries: Vec<AttendanceReportEntry>,
}

pub struct StudentReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub attendance: A,
}

impl<U, A> StudentReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        student_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<StudentReport, AttendanceServiceError> {
        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .filter(|u| u.role == UserRole::Student)
            .ok_or(AttendanceServiceError::StudentNotFound)?;
        let filter = AttendanceFilter {
            student_id: Some(student.id),
            date,
            ..Default::default()
        };
        let records = self.attendance.list(&filter).await?;
        let people = referenced_users(&self.users, &records).await?;
        Ok(StudentReport {
            entries: admin_entries(records, &people),
            student,
        })
    }
}

// ── TeacherReport ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherReportEntry {
    pub student_id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub period: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

pub struct TeacherReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub attendance: A,
}

impl<U, A> TeacherReportUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    /// Records the teacher's codes produced. `date` defaults to today (UTC).
    pub async fn execute(
        &self,
        teacher_id: Uuid,
        date: Option<NaiveDate>,
        period: Option<String>,
    ) -> Result<Vec<TeacherReportEntry>, AttendanceServiceError> {
        let filter = AttendanceFilter {
            teacher_id: Some(teacher_id),
            date: Some(date.unwrap_or_else(|| Utc::now().date_naive())),
            period: period.filter(|p| !p.trim().is_empty()),
            ..Default::default()
        };
        let records = self.attendance.list(&filter).await?;
        let people = referenced_users(&self.users, &records).await?;
        Ok(records
            .into_iter()
            .map(|r| {
                let student = people.get(&r.student_id);
                TeacherReportEntry {
                    student_id: r.student_id,
                    name: student
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| UNKNOWN_STUDENT.to_owned()),
                    roll_number: student
                        .and_then(|s| s.roll_number.clone())
                        .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
                    period: r.period,
                    date: r.date,
                    status: r.status,
                }
            })
            .collect())
    }
}

// ── StudentHistory ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub period: String,
    pub status: AttendanceStatus,
    pub marked_by: String,
}

pub struct StudentHistoryUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub attendance: A,
}

impl<U, A> StudentHistoryUseCase<U, A>
where
    U: UserRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        student_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<HistoryEntry>, AttendanceServiceError> {
        let filter = AttendanceFilter {
            student_id: Some(student_id),
            date,
            ..Default::default()
        };
        let records = self.attendance.list(&filter).await?;
        let people = referenced_users(&self.users, &records).await?;
        Ok(records
            .into_iter()
            .map(|r| HistoryEntry {
                marked_by: people
                    .get(&r.teacher_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| UNKNOWN_TEACHER.to_owned()),
                date: r.date,
                period: r.period,
                status: r.status,
            })
            .collect())
    }
}
