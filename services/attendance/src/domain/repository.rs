#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use rollcall_domain::user::UserRole;

use crate::domain::types::{AttendanceFilter, AttendanceRecord, OtpCode, User};
use crate::error::AttendanceServiceError;

/// Repository for user accounts and their teacher assignments.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AttendanceServiceError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AttendanceServiceError>;

    async fn find_by_roll_number(
        &self,
        roll_number: &str,
    ) -> Result<Option<User>, AttendanceServiceError>;

    /// Users with the given ids. Unknown ids are skipped, order is unspecified.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AttendanceServiceError>;

    /// All users, optionally restricted to one role, oldest first.
    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, AttendanceServiceError>;

    /// Insert a user with its assignments. Unique-index hits surface as
    /// `EmailTaken` / `RollNumberTaken`.
    async fn create(&self, user: &User) -> Result<(), AttendanceServiceError>;

    /// Overwrite the mutable profile fields and replace the assignment set.
    async fn update(&self, user: &User) -> Result<(), AttendanceServiceError>;

    /// Delete a user. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AttendanceServiceError>;
}

/// Repository for issued OTP codes.
pub trait OtpRepository: Send + Sync {
    async fn create(&self, otp: &OtpCode) -> Result<(), AttendanceServiceError>;

    /// Newest code equal to `code` that is still live at `now`.
    async fn find_live(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpCode>, AttendanceServiceError>;

    /// Delete codes expired at `now`. Returns the number of rows removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError>;
}

/// Repository for the attendance ledger.
pub trait AttendanceRepository: Send + Sync {
    async fn find(
        &self,
        student_id: Uuid,
        period: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError>;

    /// Insert a record. A duplicate (student, period, date) surfaces as
    /// `AttendanceAlreadyMarked`.
    async fn create(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError>;

    /// Records matching `filter`, newest date first, then in creation order.
    async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError>;
}
