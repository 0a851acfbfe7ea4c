//! Bearer-token identity extraction and typed role guards.
//!
//! Every protected handler receives the caller explicitly: either an [`Identity`]
//! (any authenticated user) or a [`Caller<R>`] whose role is checked against the
//! marker type `R`. There is no ambient session state.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use http::request::Parts;
use uuid::Uuid;

use rollcall_core::error::AppError;
use rollcall_domain::user::UserRole;

use crate::token::validate_access_token;

/// HMAC secret used to validate bearer tokens. Handlers reach it through
/// `FromRef<S>` on the service state.
#[derive(Clone)]
pub struct TokenSecret(Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Authenticated caller decoded from `Authorization: Bearer <jwt>`.
///
/// Returns 401 if the header is absent or the token does not validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Identity {
    /// 403 unless the caller holds exactly `role`. Roles are not hierarchical.
    pub fn require(self, role: UserRole) -> Result<Self, AppError> {
        if self.role == role {
            Ok(self)
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn authenticate(parts: &Parts, secret: &TokenSecret) -> Result<Identity, AppError> {
    let Authorization(bearer) = parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;
    let info = validate_access_token(bearer.token(), secret.as_str()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;
    Ok(Identity {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AppError;

    // axum-core 0.5 declares `fn -> impl Future + Send`. Validate synchronously and
    // hand back a future that owns its result so no borrow of `parts` is held.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &TokenSecret::from_ref(state));
        async move { result }
    }
}

/// Marker trait tying a guard type to the role it admits.
pub trait RequiredRole: Send + Sync + 'static {
    const ROLE: UserRole;
}

#[derive(Debug)]
pub enum Admin {}

#[derive(Debug)]
pub enum Teacher {}

#[derive(Debug)]
pub enum Student {}

impl RequiredRole for Admin {
    const ROLE: UserRole = UserRole::Admin;
}

impl RequiredRole for Teacher {
    const ROLE: UserRole = UserRole::Teacher;
}

impl RequiredRole for Student {
    const ROLE: UserRole = UserRole::Student;
}

/// Route guard: an authenticated caller whose role is `R::ROLE`.
///
/// 401 without a valid token, 403 with a valid token for another role.
#[derive(Debug)]
pub struct Caller<R> {
    pub user_id: Uuid,
    _role: PhantomData<fn() -> R>,
}

impl<R: RequiredRole> Caller<R> {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            _role: PhantomData,
        }
    }

    pub fn role(&self) -> UserRole {
        R::ROLE
    }
}

impl<S, R> FromRequestParts<S> for Caller<R>
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
    R: RequiredRole,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &TokenSecret::from_ref(state))
            .and_then(|identity| identity.require(R::ROLE))
            .map(|identity| Caller::new(identity.user_id));
        async move { result }
    }
}
