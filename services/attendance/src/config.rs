use anyhow::Context as _;

use rollcall_auth_types::token::DEFAULT_ACCESS_TOKEN_TTL_SECS;

use crate::domain::types::{DEFAULT_OTP_TTL_SECS, MAX_OTP_TTL_SECS};

/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 5001). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
    /// OTP lifetime (default 600, at most one day). Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: i64,
    /// Access-token lifetime (default 30 days). Env var: `JWT_TTL_SECS`.
    pub jwt_ttl_secs: u64,
    /// Period of the expired-OTP sweep; 0 disables it. Env var: `OTP_SWEEP_INTERVAL_SECS`.
    pub otp_sweep_interval_secs: u64,
    /// Allowed CORS origins, comma separated. Empty means any origin.
    /// Env var: `CORS_ALLOWED_ORIGINS`.
    pub cors_allowed_origins: Vec<String>,
}

impl AttendanceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            attendance_port: parse_or("ATTENDANCE_PORT", 5001)?,
            otp_ttl_secs: check_otp_ttl(parse_or("OTP_TTL_SECS", DEFAULT_OTP_TTL_SECS)?)?,
            jwt_ttl_secs: parse_or("JWT_TTL_SECS", DEFAULT_ACCESS_TOKEN_TTL_SECS)?,
            otp_sweep_interval_secs: parse_or("OTP_SWEEP_INTERVAL_SECS", 60)?,
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse().with_context(|| format!("invalid {key}: {v:?}")),
        Err(_) => Ok(default),
    }
}

fn check_otp_ttl(secs: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_OTP_TTL_SECS).contains(&secs) {
        anyhow::bail!("OTP_TTL_SECS must be between 1 and {MAX_OTP_TTL_SECS}, got {secs}");
    }
    Ok(secs)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
