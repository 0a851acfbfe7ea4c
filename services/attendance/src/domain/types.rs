use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use rollcall_domain::attendance::AttendanceStatus;
use rollcall_domain::user::UserRole;

/// Account record. `password_hash` is an Argon2 PHC string and never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub roll_number: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub class_id: Option<String>,
    /// Students only: accept an OTP from any teacher.
    pub all_teachers: bool,
    /// Students only: teachers whose OTPs this student may redeem.
    pub assigned_teachers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether an OTP issued by `teacher_id` may be redeemed by this user.
    pub fn accepts_teacher(&self, teacher_id: Uuid) -> bool {
        self.all_teachers || self.assigned_teachers.contains(&teacher_id)
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }
}

/// Time-limited code a teacher hands out for one period.
#[derive(Debug, Clone)]
pub struct OtpCode {
    pub id: Uuid,
    pub code: String,
    pub teacher_id: Uuid,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// One ledger entry. Unique per (student, period, date).
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub class_id: Option<String>,
    pub period: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
}

/// Conjunctive ledger filter. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub class_id: Option<String>,
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.class_id
            .as_ref()
            .is_none_or(|c| record.class_id.as_ref() == Some(c))
            && self.teacher_id.is_none_or(|t| record.teacher_id == t)
            && self.student_id.is_none_or(|s| record.student_id == s)
            && self.period.as_ref().is_none_or(|p| &record.period == p)
            && self.date.is_none_or(|d| record.date == d)
    }
}

/// `{id, name, email}` view of a teacher, with placeholders once the account is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl TeacherSummary {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }

    pub fn missing(id: Uuid) -> Self {
        Self {
            id,
            name: UNKNOWN_TEACHER.to_owned(),
            email: NOT_AVAILABLE.to_owned(),
        }
    }
}

/// Student fields shown next to a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

impl StudentSummary {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            roll_number: user
                .roll_number
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_owned()),
        }
    }

    pub fn missing(id: Uuid) -> Self {
        Self {
            id,
            name: UNKNOWN_STUDENT.to_owned(),
            email: NOT_AVAILABLE.to_owned(),
            roll_number: NOT_AVAILABLE.to_owned(),
        }
    }
}

/// Lowest OTP value; codes are always six digits.
pub const OTP_MIN: u32 = 100_000;

/// Highest OTP value.
pub const OTP_MAX: u32 = 999_999;

/// OTP time-to-live in seconds when `OTP_TTL_SECS` is unset.
pub const DEFAULT_OTP_TTL_SECS: i64 = 600;

/// Longest accepted `OTP_TTL_SECS` (one day).
pub const MAX_OTP_TTL_SECS: i64 = 86_400;

pub const UNKNOWN_TEACHER: &str = "Unknown Teacher";
pub const UNKNOWN_STUDENT: &str = "Unknown Student";
pub const NOT_AVAILABLE: &str = "N/A";

/// Trim and lowercase an email so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
