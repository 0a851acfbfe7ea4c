use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use rollcall_domain::user::UserRole;

use crate::domain::password::hash_password;
use crate::domain::repository::UserRepository;
use crate::domain::types::{TeacherSummary, User, normalize_email};
use crate::error::AttendanceServiceError;

/// A user together with the accounts behind `assigned_teachers`.
#[derive(Debug, Clone)]
pub struct UserWithTeachers {
    pub user: User,
    pub teachers: Vec<TeacherSummary>,
}

/// Keep only ids that belong to existing teachers, preserving first-seen order.
async fn resolve_teachers<R: UserRepository>(
    repo: &R,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, AttendanceServiceError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let found = repo.find_many(ids).await?;
    let mut resolved: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        let is_teacher = found
            .iter()
            .any(|u| u.id == *id && u.role == UserRole::Teacher);
        if is_teacher && !resolved.contains(id) {
            resolved.push(*id);
        }
    }
    Ok(resolved)
}

/// Attach `{id, name, email}` summaries for every assigned teacher. Teachers
/// deleted since assignment are dropped from the view.
async fn populate<R: UserRepository>(
    repo: &R,
    users: Vec<User>,
) -> Result<Vec<UserWithTeachers>, AttendanceServiceError> {
    let mut ids: Vec<Uuid> = users
        .iter()
        .flat_map(|u| u.assigned_teachers.iter().copied())
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let teachers: HashMap<Uuid, User> = if ids.is_empty() {
        HashMap::new()
    } else {
        repo.find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };

    Ok(users
        .into_iter()
        .map(|user| {
            let summaries = user
                .assigned_teachers
                .iter()
                .filter_map(|id| teachers.get(id).map(TeacherSummary::of))
                .collect();
            UserWithTeachers {
                user,
                teachers: summaries,
            }
        })
        .collect())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AttendanceServiceError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(AttendanceServiceError::MissingField(field))
}

// ── CreateUser ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CreateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub roll_number: Option<String>,
    pub class_id: Option<String>,
    pub all_teachers: bool,
    pub assigned_teachers: Vec<Uuid>,
    pub assigned_teacher_email: Option<String>,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(
        &self,
        input: CreateUserInput,
    ) -> Result<UserWithTeachers, AttendanceServiceError> {
        let name = required(input.name, "name")?;
        let email = normalize_email(&required(input.email, "email")?);
        let password = input
            .password
            .filter(|p| !p.is_empty())
            .ok_or(AttendanceServiceError::MissingField("password"))?;
        let role = input
            .role
            .ok_or(AttendanceServiceError::MissingField("role"))?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AttendanceServiceError::EmailTaken);
        }

        let is_student = role == UserRole::Student;
        let roll_number = if is_student {
            let roll_number = required(input.roll_number, "rollNumber")?;
            if self.repo.find_by_roll_number(&roll_number).await?.is_some() {
                return Err(AttendanceServiceError::RollNumberTaken);
            }
            Some(roll_number)
        } else {
            None
        };

        let all_teachers = is_student && input.all_teachers;
        let assigned_teachers = if is_student && !all_teachers {
            let mut candidates = input.assigned_teachers;
            if let Some(teacher_email) = input.assigned_teacher_email.as_deref() {
                let teacher_email = normalize_email(teacher_email);
                if let Some(teacher) = self.repo.find_by_email(&teacher_email).await? {
                    candidates.push(teacher.id);
                }
            }
            resolve_teachers(&self.repo, &candidates).await?
        } else {
            vec![]
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            roll_number,
            email,
            password_hash: hash_password(&password)?,
            role,
            class_id: input.class_id.filter(|c| !c.trim().is_empty()),
            all_teachers,
            assigned_teachers,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created");

        let mut populated = populate(&self.repo, vec![user]).await?;
        populated
            .pop()
            .ok_or_else(|| anyhow::anyhow!("created user vanished while populating").into())
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        role: Option<UserRole>,
    ) -> Result<Vec<UserWithTeachers>, AttendanceServiceError> {
        let users = self.repo.list(role).await?;
        populate(&self.repo, users).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<UserWithTeachers, AttendanceServiceError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AttendanceServiceError::UserNotFound)?;
        let mut populated = populate(&self.repo, vec![user]).await?;
        populated.pop().ok_or(AttendanceServiceError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Mutable fields. Role, password and roll number are fixed after creation;
/// `class_id`, `all_teachers` and `assigned_teachers` only apply to students.
#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub class_id: Option<String>,
    pub all_teachers: Option<bool>,
    pub assigned_teachers: Option<Vec<Uuid>>,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.class_id.is_none()
            && self.all_teachers.is_none()
            && self.assigned_teachers.is_none()
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<UserWithTeachers, AttendanceServiceError> {
        if input.is_empty() {
            return Err(AttendanceServiceError::MissingData);
        }
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AttendanceServiceError::UserNotFound)?;

        if let Some(name) = input.name {
            user.name = required(Some(name), "name")?;
        }
        if let Some(email) = input.email {
            let email = normalize_email(&email);
            if email.is_empty() {
                return Err(AttendanceServiceError::MissingField("email"));
            }
            if let Some(owner) = self.repo.find_by_email(&email).await? {
                if owner.id != user.id {
                    return Err(AttendanceServiceError::EmailTaken);
                }
            }
            user.email = email;
        }

        if user.is_student() {
            if let Some(class_id) = input.class_id {
                user.class_id = Some(class_id).filter(|c| !c.trim().is_empty());
            }
            if let Some(all_teachers) = input.all_teachers {
                user.all_teachers = all_teachers;
            }
            if let Some(ids) = input.assigned_teachers {
                user.assigned_teachers = resolve_teachers(&self.repo, &ids).await?;
            }
            if user.all_teachers {
                user.assigned_teachers.clear();
            }
        }

        user.updated_at = Utc::now();
        self.repo.update(&user).await?;

        let mut populated = populate(&self.repo, vec![user]).await?;
        populated.pop().ok_or(AttendanceServiceError::UserNotFound)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    /// Attendance rows and OTPs referencing the user are left in place.
    pub async fn execute(&self, id: Uuid) -> Result<(), AttendanceServiceError> {
        if !self.repo.delete(id).await? {
            return Err(AttendanceServiceError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
