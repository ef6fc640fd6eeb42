//! Migration to create disbursements table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Disbursements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Disbursements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Disbursements::Payee).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Disbursements::AmountCentavos)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disbursements::DisbursementDate).date().not_null())
                    .col(
                        ColumnDef::new(Disbursements::FundSource)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::Classification)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disbursements::Description).text().not_null())
                    .col(
                        ColumnDef::new(Disbursements::ReferenceNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::Department)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disbursements::EncodedBy).string().not_null())
                    .col(
                        ColumnDef::new(Disbursements::EncodedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Disbursements::UpdatedBy).string().null())
                    .col(
                        ColumnDef::new(Disbursements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Disbursements::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_disbursements_encoded_by")
                            .from(Disbursements::Table, Disbursements::EncodedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_disbursements_date")
                    .table(Disbursements::Table)
                    .col(Disbursements::DisbursementDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_disbursements_classification")
                    .table(Disbursements::Table)
                    .col(Disbursements::Classification)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_disbursements_department")
                    .table(Disbursements::Table)
                    .col(Disbursements::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_disbursements_archived")
                    .table(Disbursements::Table)
                    .col(Disbursements::IsArchived)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Disbursements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Disbursements {
    Table,
    Id,
    Payee,
    AmountCentavos,
    DisbursementDate,
    FundSource,
    Classification,
    Description,
    ReferenceNumber,
    Department,
    EncodedBy,
    EncodedAt,
    UpdatedBy,
    UpdatedAt,
    IsArchived,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
