use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Attendance service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("teacher not found")]
    TeacherNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired OTP")]
    InvalidOtp,
    #[error("this OTP is not from your assigned teacher")]
    NotAssignedTeacher,
    #[error("attendance already marked for this period today")]
    AttendanceAlreadyMarked,
    #[error("user with this email already exists")]
    EmailTaken,
    #[error("user with this roll number already exists")]
    RollNumberTaken,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid role")]
    InvalidRole,
    #[error("missing data")]
    MissingData,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AttendanceServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::TeacherNotFound => "TEACHER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOtp => "INVALID_OTP",
            Self::NotAssignedTeacher => "NOT_ASSIGNED_TEACHER",
            Self::AttendanceAlreadyMarked => "ATTENDANCE_ALREADY_MARKED",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::RollNumberTaken => "ROLL_NUMBER_TAKEN",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidRole => "INVALID_ROLE",
            Self::MissingData => "MISSING_DATA",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AttendanceServiceError {
    fn into_response(self) -> Response {
        // The dashboard reads every client error as 400, duplicate attendance included.
        let status = match &self {
            Self::UserNotFound | Self::StudentNotFound | Self::TeacherNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotAssignedTeacher => StatusCode::FORBIDDEN,
            Self::InvalidOtp
            | Self::AttendanceAlreadyMarked
            | Self::EmailTaken
            | Self::RollNumberTaken
            | Self::MissingField(_)
            | Self::InvalidRole
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format_args!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
