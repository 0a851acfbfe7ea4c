use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use rollcall_attendance_schema::{attendance_records, otp_codes, student_teachers, users};
use rollcall_core::sea_ext::{is_unique_violation, violates_index};
use rollcall_domain::attendance::AttendanceStatus;
use rollcall_domain::user::UserRole;

use crate::domain::repository::{AttendanceRepository, OtpRepository, UserRepository};
use crate::domain::types::{AttendanceFilter, AttendanceRecord, OtpCode, User};
use crate::error::AttendanceServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

/// Map unique-index hits on `users` to their domain error.
fn user_write_error(err: DbErr, context: &'static str) -> AttendanceServiceError {
    if violates_index(&err, "idx_users_email") {
        AttendanceServiceError::EmailTaken
    } else if violates_index(&err, "idx_users_roll_number") {
        AttendanceServiceError::RollNumberTaken
    } else {
        anyhow::Error::new(err).context(context).into()
    }
}

impl DbUserRepository {
    /// Attach assignment sets to loaded rows.
    async fn hydrate(&self, models: Vec<users::Model>) -> Result<Vec<User>, AttendanceServiceError> {
        let student_ids: Vec<Uuid> = models
            .iter()
            .filter(|m| m.role == i16::from(UserRole::Student.as_u8()))
            .map(|m| m.id)
            .collect();

        let mut assignments: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if !student_ids.is_empty() {
            let rows = student_teachers::Entity::find()
                .filter(student_teachers::Column::StudentId.is_in(student_ids))
                .all(&self.db)
                .await
                .context("load teacher assignments")?;
            for row in rows {
                assignments
                    .entry(row.student_id)
                    .or_default()
                    .push(row.teacher_id);
            }
        }

        models
            .into_iter()
            .map(|m| {
                let assigned = assignments.remove(&m.id).unwrap_or_default();
                user_from_model(m, assigned)
            })
            .collect()
    }

    async fn find_one(
        &self,
        condition: sea_orm::Condition,
        context: &'static str,
    ) -> Result<Option<User>, AttendanceServiceError> {
        let model = users::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .context(context)?;
        match model {
            Some(m) => Ok(self.hydrate(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }
}

async fn replace_assignments<C: ConnectionTrait>(
    conn: &C,
    student_id: Uuid,
    teacher_ids: &[Uuid],
) -> Result<(), AttendanceServiceError> {
    student_teachers::Entity::delete_many()
        .filter(student_teachers::Column::StudentId.eq(student_id))
        .exec(conn)
        .await
        .context("clear teacher assignments")?;
    if teacher_ids.is_empty() {
        return Ok(());
    }
    let rows = teacher_ids.iter().map(|teacher_id| student_teachers::ActiveModel {
        student_id: Set(student_id),
        teacher_id: Set(*teacher_id),
    });
    student_teachers::Entity::insert_many(rows)
        .exec(conn)
        .await
        .context("insert teacher assignments")?;
    Ok(())
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AttendanceServiceError> {
        self.find_one(
            sea_orm::Condition::all().add(users::Column::Id.eq(id)),
            "find user by id",
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AttendanceServiceError> {
        self.find_one(
            sea_orm::Condition::all().add(users::Column::Email.eq(email)),
            "find user by email",
        )
        .await
    }

    async fn find_by_roll_number(
        &self,
        roll_number: &str,
    ) -> Result<Option<User>, AttendanceServiceError> {
        self.find_one(
            sea_orm::Condition::all().add(users::Column::RollNumber.eq(roll_number)),
            "find user by roll number",
        )
        .await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, AttendanceServiceError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        self.hydrate(models).await
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>, AttendanceServiceError> {
        let mut query = users::Entity::find().order_by_asc(users::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(i16::from(role.as_u8())));
        }
        let models = query.all(&self.db).await.context("list users")?;
        self.hydrate(models).await
    }

    async fn create(&self, user: &User) -> Result<(), AttendanceServiceError> {
        let txn = self.db.begin().await.context("begin create user")?;
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            roll_number: Set(user.roll_number.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role.as_u8())),
            class_id: Set(user.class_id.clone()),
            all_teachers: Set(user.all_teachers),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&txn)
        .await
        .map_err(|e| user_write_error(e, "create user"))?;
        replace_assignments(&txn, user.id, &user.assigned_teachers).await?;
        txn.commit().await.context("commit create user")?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AttendanceServiceError> {
        let txn = self.db.begin().await.context("begin update user")?;
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            class_id: Set(user.class_id.clone()),
            all_teachers: Set(user.all_teachers),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => AttendanceServiceError::UserNotFound,
            e => user_write_error(e, "update user"),
        })?;
        if user.is_student() {
            replace_assignments(&txn, user.id, &user.assigned_teachers).await?;
        }
        txn.commit().await.context("commit update user")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AttendanceServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(
    model: users::Model,
    assigned_teachers: Vec<Uuid>,
) -> Result<User, AttendanceServiceError> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("user {} has unknown role {}", model.id, model.role))?;
    Ok(User {
        id: model.id,
        name: model.name,
        roll_number: model.roll_number,
        email: model.email,
        password_hash: model.password_hash,
        role,
        class_id: model.class_id,
        all_teachers: model.all_teachers,
        assigned_teachers,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn create(&self, otp: &OtpCode) -> Result<(), AttendanceServiceError> {
        otp_codes::ActiveModel {
            id: Set(otp.id),
            code: Set(otp.code.clone()),
            teacher_id: Set(otp.teacher_id),
            period: Set(otp.period.clone()),
            created_at: Set(otp.created_at),
            expires_at: Set(otp.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create otp")?;
        Ok(())
    }

    async fn find_live(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpCode>, AttendanceServiceError> {
        let model = otp_codes::Entity::find()
            .filter(otp_codes::Column::Code.eq(code))
            .filter(otp_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(otp_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find live otp")?;
        Ok(model.map(|m| OtpCode {
            id: m.id,
            code: m.code,
            teacher_id: m.teacher_id,
            period: m.period,
            created_at: m.created_at,
            expires_at: m.expires_at,
        }))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError> {
        let result = otp_codes::Entity::delete_many()
            .filter(otp_codes::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired otps")?;
        Ok(result.rows_affected)
    }
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find(
        &self,
        student_id: Uuid,
        period: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let model = attendance_records::Entity::find()
            .filter(attendance_records::Column::StudentId.eq(student_id))
            .filter(attendance_records::Column::Period.eq(period))
            .filter(attendance_records::Column::Date.eq(date))
            .one(&self.db)
            .await
            .context("find attendance record")?;
        model.map(record_from_model).transpose()
    }

    async fn create(&self, record: &AttendanceRecord) -> Result<(), AttendanceServiceError> {
        attendance_records::ActiveModel {
            id: Set(record.id),
            student_id: Set(record.student_id),
            teacher_id: Set(record.teacher_id),
            class_id: Set(record.class_id.clone()),
            period: Set(record.period.clone()),
            date: Set(record.date),
            status: Set(record.status.as_str().to_owned()),
            created_at: Set(record.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AttendanceServiceError::AttendanceAlreadyMarked
            } else {
                anyhow::Error::new(e).context("create attendance record").into()
            }
        })?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let mut query = attendance_records::Entity::find();
        if let Some(ref class_id) = filter.class_id {
            query = query.filter(attendance_records::Column::ClassId.eq(class_id.as_str()));
        }
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(attendance_records::Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(attendance_records::Column::StudentId.eq(student_id));
        }
        if let Some(ref period) = filter.period {
            query = query.filter(attendance_records::Column::Period.eq(period.as_str()));
        }
        if let Some(date) = filter.date {
            query = query.filter(attendance_records::Column::Date.eq(date));
        }
        let models = query
            .order_by_desc(attendance_records::Column::Date)
            .order_by_asc(attendance_records::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list attendance records")?;
        models.into_iter().map(record_from_model).collect()
    }
}

fn record_from_model(
    model: attendance_records::Model,
) -> Result<AttendanceRecord, AttendanceServiceError> {
    let status = model
        .status
        .parse::<AttendanceStatus>()
        .with_context(|| format!("attendance record {}", model.id))?;
    Ok(AttendanceRecord {
        id: model.id,
        student_id: model.student_id,
        teacher_id: model.teacher_id,
        class_id: model.class_id,
        period: model.period,
        date: model.date,
        status,
        created_at: model.created_at,
    })
}
