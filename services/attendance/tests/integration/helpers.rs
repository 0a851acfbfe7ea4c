use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use rollcall_attendance::domain::repository::{
    AttendanceRepository, OtpRepository, UserRepository,
};
use rollcall_attendance::domain::types::{AttendanceFilter, AttendanceRecord, OtpCode, User};
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_domain::attendance::AttendanceStatus;
use rollcall_domain::user::UserRole;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// In-memory directory. Clones share storage, so one instance can back several usecases.
#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AttendanceServiceError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AttendanceServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_roll_number(
        &self,
        roll_number: &str,
    ) -> Result<Option<User>, AttendanceServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.roll_number.as_deref() == Some(roll_number))
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AttendanceServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, AttendanceServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), AttendanceServiceError> {
        let mut users = self.users.lock().unwrap();
        // Same guarantees as the unique indexes on `users`.
        if users.iter().any(|u| u.email == user.email) {
            return Err(AttendanceServiceError::EmailTaken);
        }
        if user.roll_number.is_some()
            && users.iter().any(|u| u.roll_number == user.roll_number)
        {
            return Err(AttendanceServiceError::RollNumberTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AttendanceServiceError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AttendanceServiceError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AttendanceServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

// ── MockOtpRepo ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOtpRepo {
    pub codes: Arc<Mutex<Vec<OtpCode>>>,
}

impl MockOtpRepo {
    pub fn new(codes: Vec<OtpCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the stored codes for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OtpCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OtpRepository for MockOtpRepo {
    async fn create(&self, otp: &OtpCode) -> Result<(), AttendanceServiceError> {
        self.codes.lock().unwrap().push(otp.clone());
        Ok(())
    }

    async fn find_live(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpCode>, AttendanceServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.code == code && c.is_live(now))
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.is_live(now));
        Ok((before - codes.len()) as u64)
    }
}

// ── MockAttendanceRepo ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAttendanceRepo {
    pub records: Arc<Mutex<Vec<AttendanceRecord>>>,
    /// When set, `find` never sees existing rows, like a request that lost a race
    /// between its duplicate check and its insert.
    pub blind_find: bool,
}

impl MockAttendanceRepo {
    pub fn new(records: Vec<AttendanceRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            blind_find: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn blind(self) -> Self {
        Self {
            blind_find: true,
            ..self
        }
    }

    pub fn records_handle(&self) -> Arc<Mutex<Vec<AttendanceRecord>>> {
        Arc::clone(&self.records)
    }
}

impl AttendanceRepository for MockAttendanceRepo {
    async fn find(
        &self,
        student_id: Uuid,
        period: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        if self.blind_find {
            return Ok(None);
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.student_id == student_id && r.period == period && r.date == date)
            .cloned())
    }

    async fn create(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError> {
        let mut records = self.records.lock().unwrap();
        // Mirrors idx_attendance_records_student_period_date.
        if records.iter().any(|r| {
            r.student_id == record.student_id && r.period == record.period && r.date == record.date
        }) {
            return Err(AttendanceServiceError::AttendanceAlreadyMarked);
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let mut matched: Vec<AttendanceRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(matched)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const PERIOD: &str = "10:00 AM - 11:00 AM";

fn base_user(name: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        roll_number: None,
        email: format!("{}@school.test", name.to_lowercase()),
        password_hash: String::new(),
        role,
        class_id: None,
        all_teachers: false,
        assigned_teachers: vec![],
        created_at: now,
        updated_at: now,
    }
}

pub fn test_admin() -> User {
    base_user("Principal", UserRole::Admin)
}

pub fn test_teacher(name: &str) -> User {
    base_user(name, UserRole::Teacher)
}

pub fn test_student(name: &str, roll_number: &str, assigned: &[Uuid]) -> User {
    User {
        roll_number: Some(roll_number.to_owned()),
        class_id: Some("10-A".to_owned()),
        assigned_teachers: assigned.to_vec(),
        ..base_user(name, UserRole::Student)
    }
}

pub fn live_otp(code: &str, teacher_id: Uuid) -> OtpCode {
    let now = Utc::now();
    OtpCode {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        teacher_id,
        period: PERIOD.to_owned(),
        created_at: now,
        expires_at: now + Duration::minutes(10),
    }
}

pub fn expired_otp(code: &str, teacher_id: Uuid) -> OtpCode {
    let issued = Utc::now() - Duration::minutes(11);
    OtpCode {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        teacher_id,
        period: PERIOD.to_owned(),
        created_at: issued,
        expires_at: issued + Duration::minutes(10),
    }
}

pub fn record(
    student_id: Uuid,
    teacher_id: Uuid,
    period: &str,
    date: NaiveDate,
    created_at: DateTime<Utc>,
) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::now_v7(),
        student_id,
        teacher_id,
        class_id: Some("10-A".to_owned()),
        period: period.to_owned(),
        date,
        status: AttendanceStatus::Present,
        created_at,
    }
}
