//! Migration to create classification_rules table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClassificationRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassificationRules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassificationRules::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ClassificationRules::Description).text().null())
                    .col(
                        ColumnDef::new(ClassificationRules::Classification)
                            .string_len(10)
                            .not_null(),
                    )
                    // JSON array of keyword strings
                    .col(ColumnDef::new(ClassificationRules::Keywords).text().not_null())
                    .col(
                        ColumnDef::new(ClassificationRules::MinAmountCentavos)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassificationRules::MaxAmountCentavos)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassificationRules::Department)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassificationRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ClassificationRules::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(ClassificationRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_classification_rules_created_by")
                            .from(ClassificationRules::Table, ClassificationRules::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_classification_rules_active")
                    .table(ClassificationRules::Table)
                    .col(ClassificationRules::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClassificationRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ClassificationRules {
    Table,
    Id,
    Name,
    Description,
    Classification,
    Keywords,
    MinAmountCentavos,
    MaxAmountCentavos,
    Department,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
