pub mod attendance;
pub mod auth;
pub mod otp;
pub mod report;
pub mod user;
