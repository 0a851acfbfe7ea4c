pub mod attendance;
pub mod auth;
pub mod health;
pub mod otp;
pub mod report;
pub mod user;
