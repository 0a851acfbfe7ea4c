use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentTeachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StudentTeachers::StudentId).uuid().not_null())
                    .col(ColumnDef::new(StudentTeachers::TeacherId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(StudentTeachers::StudentId)
                            .col(StudentTeachers::TeacherId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentTeachers::Table, StudentTeachers::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentTeachers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudentTeachers {
    Table,
    StudentId,
    TeacherId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
