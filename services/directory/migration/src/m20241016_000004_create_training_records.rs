use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrainingRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrainingRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::CourseName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::CourseType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(TrainingRecords::StartDate).date().not_null())
                    .col(ColumnDef::new(TrainingRecords::EndDate).date().null())
                    .col(
                        ColumnDef::new(TrainingRecords::Status)
                            .string_len(20)
                            .not_null()
                            .default("in_progress"),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::CertificationName)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::CertificationExpiry)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TrainingRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrainingRecords::Table, TrainingRecords::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(TrainingRecords::Table)
                    .col(TrainingRecords::EmployeeId)
                    .name("idx_training_records_employee_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrainingRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TrainingRecords {
    Table,
    Id,
    EmployeeId,
    CourseName,
    CourseType,
    StartDate,
    EndDate,
    Status,
    CertificationName,
    CertificationExpiry,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
}
