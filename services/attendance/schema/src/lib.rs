//! sea-orm entities for the attendance service.

pub mod attendance_records;
pub mod otp_codes;
pub mod student_teachers;
pub mod users;
