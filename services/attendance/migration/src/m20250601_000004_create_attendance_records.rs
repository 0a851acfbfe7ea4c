use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::StudentId).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(AttendanceRecords::ClassId).string())
                    .col(ColumnDef::new(AttendanceRecords::Period).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Date).date().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::Status)
                            .string()
                            .not_null()
                            .default("Present"),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Source of truth for "one mark per student, period and day".
        manager
            .create_index(
                Index::create()
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::StudentId)
                    .col(AttendanceRecords::Period)
                    .col(AttendanceRecords::Date)
                    .unique()
                    .name("idx_attendance_records_student_period_date")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::TeacherId)
                    .col(AttendanceRecords::Date)
                    .name("idx_attendance_records_teacher_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AttendanceRecords {
    Table,
    Id,
    StudentId,
    TeacherId,
    ClassId,
    Period,
    Date,
    Status,
    CreatedAt,
}
