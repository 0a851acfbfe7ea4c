use std::time::Duration as StdDuration;

use anyhow::Context as _;
use chrono::Duration;
use sea_orm::Database;
use tracing::info;

use rollcall_attendance::config::AttendanceConfig;
use rollcall_attendance::router::{build_router, cors_layer};
use rollcall_attendance::state::AppState;
use rollcall_attendance::usecase::otp::PurgeExpiredOtpsUseCase;
use rollcall_auth_types::identity::TokenSecret;
use rollcall_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AttendanceConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState {
        db,
        jwt_secret: TokenSecret::new(config.jwt_secret),
        jwt_ttl_secs: config.jwt_ttl_secs,
        otp_ttl: Duration::seconds(config.otp_ttl_secs),
    };

    // Expired codes are already invisible to lookups; this only keeps the table small.
    if config.otp_sweep_interval_secs > 0 {
        let sweep_state = state.clone();
        let period = StdDuration::from_secs(config.otp_sweep_interval_secs);
        tokio::spawn(async move {
            let usecase = PurgeExpiredOtpsUseCase {
                otps: sweep_state.otp_repo(),
            };
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = usecase.execute().await {
                    tracing::warn!(error = %e, "otp sweep failed");
                }
            }
        });
    }

    let router = build_router(state, cors_layer(&config.cors_allowed_origins));
    let addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("attendance service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
