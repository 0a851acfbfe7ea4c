use chrono::Utc;
use uuid::Uuid;

use rollcall_domain::attendance::AttendanceStatus;

use crate::domain::repository::{AttendanceRepository, OtpRepository, UserRepository};
use crate::domain::types::{AttendanceRecord, UNKNOWN_TEACHER};
use crate::error::AttendanceServiceError;

pub struct MarkAttendanceOutput {
    pub teacher_name: String,
    pub record: AttendanceRecord,
}

pub struct MarkAttendanceUseCase<U, O, A>
where
    U: UserRepository,
    O: OtpRepository,
    A: AttendanceRepository,
{
    pub users: U,
    pub otps: O,
    pub attendance: A,
}

impl<U, O, A> MarkAttendanceUseCase<U, O, A>
where
    U: UserRepository,
    O: OtpRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        student_id: Uuid,
        code: Option<String>,
    ) -> Result<MarkAttendanceOutput, AttendanceServiceError> {
        let code = code
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or(AttendanceServiceError::MissingField("otp"))?;

        // 1. The caller must still exist
        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)?;

        // 2. Live code → 400 otherwise, expired and unknown look the same
        let now = Utc::now();
        let otp = self
            .otps
            .find_live(&code, now)
            .await?
            .ok_or(AttendanceServiceError::InvalidOtp)?;

        // 3. Issuer name is display-only; a deleted teacher keeps its id on the code
        let teacher_name = self
            .users
            .find_by_id(otp.teacher_id)
            .await?
            .map(|t| t.name)
            .unwrap_or_else(|| UNKNOWN_TEACHER.to_owned());

        // 4. Assignment check
        if !student.accepts_teacher(otp.teacher_id) {
            return Err(AttendanceServiceError::NotAssignedTeacher);
        }

        // 5. 6. One mark per student, period and UTC day
        let today = now.date_naive();
        if self
            .attendance
            .find(student.id, &otp.period, today)
            .await?
            .is_some()
        {
            return Err(AttendanceServiceError::AttendanceAlreadyMarked);
        }

        // 7. Racing submissions that pass step 6 are stopped by the unique index
        let record = AttendanceRecord {
            id: Uuid::now_v7(),
            student_id: student.id,
            teacher_id: otp.teacher_id,
            class_id: student.class_id.clone(),
            period: otp.period,
            date: today,
            status: AttendanceStatus::Present,
            created_at: now,
        };
        self.attendance.create(&record).await?;

        tracing::info!(
            student_id = %record.student_id,
            teacher_id = %record.teacher_id,
            period = %record.period,
            date = %record.date,
            "attendance marked"
        );
        Ok(MarkAttendanceOutput {
            teacher_name,
            record,
        })
    }
}
