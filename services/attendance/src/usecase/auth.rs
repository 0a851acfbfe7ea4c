use rollcall_auth_types::identity::TokenSecret;
use rollcall_auth_types::token::issue_access_token;

use crate::domain::password::verify_password;
use crate::domain::repository::UserRepository;
use crate::domain::types::{User, normalize_email};
use crate::error::AttendanceServiceError;

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    /// Token expiry, seconds since epoch.
    pub expires_at: u64,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub jwt_secret: TokenSecret,
    pub token_ttl_secs: u64,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AttendanceServiceError> {
        if input.email.trim().is_empty() {
            return Err(AttendanceServiceError::MissingField("email"));
        }
        if input.password.is_empty() {
            return Err(AttendanceServiceError::MissingField("password"));
        }

        // Unknown email and wrong password are indistinguishable to the caller.
        let user = self
            .repo
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AttendanceServiceError::InvalidCredentials)?;
        if !verify_password(&input.password, &user.password_hash) {
            return Err(AttendanceServiceError::InvalidCredentials);
        }

        let (access_token, expires_at) = issue_access_token(
            user.id,
            user.role,
            self.jwt_secret.as_str(),
            self.token_ttl_secs,
        )
        .map_err(|e| anyhow::Error::new(e).context("sign access token"))?;

        tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
        Ok(LoginOutput {
            user,
            access_token,
            expires_at,
        })
    }
}
