use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rollcall_auth_types::identity::{Admin, Caller};
use rollcall_domain::user::UserRole;

use crate::domain::types::TeacherSummary;
use crate::error::AttendanceServiceError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase,
    UpdateUserInput, UpdateUserUseCase, UserWithTeachers,
};

fn parse_role(role: Option<&str>) -> Result<Option<UserRole>, AttendanceServiceError> {
    role.map(str::parse::<UserRole>)
        .transpose()
        .map_err(|_| AttendanceServiceError::InvalidRole)
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TeacherRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<TeacherSummary> for TeacherRef {
    fn from(t: TeacherSummary) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name,
            email: t.email,
        }
    }
}

/// Account as shown to admins. The password hash is never serialized.
///
/// Ids go out as `_id`, which is what the admin dashboard keys rows and links on.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub roll_number: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub class_id: Option<String>,
    pub all_teachers: bool,
    pub assigned_teachers: Vec<TeacherRef>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "rollcall_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserWithTeachers> for UserResponse {
    fn from(UserWithTeachers { user, teachers }: UserWithTeachers) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            roll_number: user.roll_number,
            email: user.email,
            role: user.role,
            class_id: user.class_id,
            all_teachers: user.all_teachers,
            assigned_teachers: teachers.into_iter().map(TeacherRef::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /api/admin/users ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub class_id: Option<String>,
    #[serde(default)]
    pub all_teachers: bool,
    #[serde(default)]
    pub assigned_teachers: Vec<Uuid>,
    pub assigned_teacher_email: Option<String>,
}

pub async fn create_user(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AttendanceServiceError> {
    let role = parse_role(body.role.as_deref())?;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let created = usecase
        .execute(CreateUserInput {
            name: body.name,
            email: body.email,
            password: body.password,
            role,
            roll_number: body.roll_number,
            class_id: body.class_id,
            all_teachers: body.all_teachers,
            assigned_teachers: body.assigned_teachers,
            assigned_teacher_email: body.assigned_teacher_email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

pub async fn list_users(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AttendanceServiceError> {
    let role = parse_role(query.role.as_deref())?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(role).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── GET /api/admin/users/{id} ────────────────────────────────────────────────

pub async fn get_user(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AttendanceServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PUT /api/admin/users/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub class_id: Option<String>,
    pub all_teachers: Option<bool>,
    pub assigned_teachers: Option<Vec<Uuid>>,
}

pub async fn update_user(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AttendanceServiceError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let updated = usecase
        .execute(
            id,
            UpdateUserInput {
                name: body.name,
                email: body.email,
                class_id: body.class_id,
                all_teachers: body.all_teachers,
                assigned_teachers: body.assigned_teachers,
            },
        )
        .await?;
    Ok(Json(updated.into()))
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    _admin: Caller<Admin>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AttendanceServiceError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
