use anyhow::Context as _;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

use crate::error::AppError;

/// Handler for `GET /healthz`: liveness only, never touches the database.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness body shared by services: 200 once the database answers a ping.
/// Wire it up with a per-service `GET /readyz` handler that passes its connection.
pub async fn database_ready(db: &DatabaseConnection) -> Result<StatusCode, AppError> {
    db.ping().await.context("readiness database ping")?;
    Ok(StatusCode::OK)
}
