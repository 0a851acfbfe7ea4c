//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real access token with the test secret so requests pass the
//! same bearer-token validation the service runs in production.

use http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use rollcall_auth_types::token::issue_access_token;
use rollcall_domain::user::UserRole;

/// Secret shared by `MockAuth` and the state of routers under test.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    pub fn teacher() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Teacher)
    }

    pub fn student() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Student)
    }

    /// Raw JWT for this identity, valid for one hour.
    pub fn token(&self) -> String {
        issue_access_token(self.user_id, self.role, TEST_JWT_SECRET, 3600)
            .map(|(token, _)| token)
            .unwrap()
    }

    /// `Authorization: Bearer <jwt>` header pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap();
        (AUTHORIZATION, value)
    }
}
