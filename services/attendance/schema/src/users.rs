use sea_orm::entity::prelude::*;

/// Account of any role. `role` stores the `UserRole` wire value.
/// `roll_number` is unique where present (students only); NULLs do not collide.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub roll_number: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: i16,
    pub class_id: Option<String>,
    pub all_teachers: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_teachers::Entity")]
    StudentTeachers,
}

impl Related<super::student_teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentTeachers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
