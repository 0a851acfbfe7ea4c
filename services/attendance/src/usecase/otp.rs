use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use rollcall_domain::user::UserRole;

use crate::domain::repository::{OtpRepository, UserRepository};
use crate::domain::types::{OTP_MAX, OTP_MIN, OtpCode, User};
use crate::error::AttendanceServiceError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

/// Build and persist a fresh code. Live codes are not checked for collisions;
/// redemption picks the newest match.
async fn issue<O: OtpRepository>(
    otps: &O,
    teacher_id: Uuid,
    period: String,
    ttl: Duration,
) -> Result<OtpCode, AttendanceServiceError> {
    let now = Utc::now();
    let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
        anyhow::anyhow!("otp ttl of {}s overflows the clock", ttl.num_seconds())
    })?;
    let otp = OtpCode {
        id: Uuid::now_v7(),
        code: generate_code(),
        teacher_id,
        period,
        created_at: now,
        expires_at,
    };
    otps.create(&otp).await?;
    tracing::info!(%teacher_id, period = %otp.period, expires_at = %otp.expires_at, "otp issued");
    Ok(otp)
}

fn require_period(period: Option<String>) -> Result<String, AttendanceServiceError> {
    period
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
        .ok_or(AttendanceServiceError::MissingField("period"))
}

// ── IssueOtp (teacher) ───────────────────────────────────────────────────────

pub struct IssueOtpUseCase<O: OtpRepository> {
    pub otps: O,
    pub ttl: Duration,
}

impl<O: OtpRepository> IssueOtpUseCase<O> {
    pub async fn execute(
        &self,
        teacher_id: Uuid,
        period: Option<String>,
    ) -> Result<OtpCode, AttendanceServiceError> {
        let period = require_period(period)?;
        issue(&self.otps, teacher_id, period, self.ttl).await
    }
}

// ── GrantOtp (admin on behalf of a teacher) ──────────────────────────────────

pub struct GrantOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub users: U,
    pub otps: O,
    pub ttl: Duration,
}

impl<U, O> GrantOtpUseCase<U, O>
where
    U: UserRepository,
    O: OtpRepository,
{
    pub async fn execute(
        &self,
        teacher_id: Uuid,
        period: Option<String>,
    ) -> Result<(OtpCode, User), AttendanceServiceError> {
        let period = require_period(period)?;
        let teacher = self
            .users
            .find_by_id(teacher_id)
            .await?
            .filter(|u| u.role == UserRole::Teacher)
            .ok_or(AttendanceServiceError::TeacherNotFound)?;
        let otp = issue(&self.otps, teacher.id, period, self.ttl).await?;
        Ok((otp, teacher))
    }
}

// ── PurgeExpiredOtps ─────────────────────────────────────────────────────────

pub struct PurgeExpiredOtpsUseCase<O: OtpRepository> {
    pub otps: O,
}

impl<O: OtpRepository> PurgeExpiredOtpsUseCase<O> {
    /// Housekeeping only: lookups already ignore expired rows.
    pub async fn execute(&self) -> Result<u64, AttendanceServiceError> {
        let removed = self.otps.purge_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::debug!(removed, "purged expired otps");
        }
        Ok(removed)
    }
}
