//! SeaORM implementation of DisbursementRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::domain::disbursement::{
    Classification, Disbursement, DisbursementFilter, DisbursementRepository, DisbursementUpdate,
    NewDisbursement,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::disbursement;

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

fn classification_to_domain(c: disbursement::Classification) -> Classification {
    match c {
        disbursement::Classification::PS => Classification::PS,
        disbursement::Classification::MOOE => Classification::MOOE,
        disbursement::Classification::CO => Classification::CO,
        disbursement::Classification::TR => Classification::TR,
    }
}

fn classification_to_entity(c: Classification) -> disbursement::Classification {
    match c {
        Classification::PS => disbursement::Classification::PS,
        Classification::MOOE => disbursement::Classification::MOOE,
        Classification::CO => disbursement::Classification::CO,
        Classification::TR => disbursement::Classification::TR,
    }
}

fn entity_to_domain(d: disbursement::Model) -> Disbursement {
    Disbursement {
        id: d.id,
        payee: d.payee,
        amount_centavos: d.amount_centavos,
        disbursement_date: d.disbursement_date,
        fund_source: d.fund_source,
        classification: classification_to_domain(d.classification),
        description: d.description,
        reference_number: d.reference_number,
        department: d.department,
        encoded_by: d.encoded_by,
        encoded_at: d.encoded_at,
        updated_by: d.updated_by,
        updated_at: d.updated_at,
        is_archived: d.is_archived,
    }
}

/// Translate the filter into a SQL condition. Absent fields match all;
/// archived records are excluded unless the filter asks for them.
fn filter_condition(filter: &DisbursementFilter) -> Condition {
    let mut condition = Condition::all();

    match filter.include_archived {
        Some(true) => {
            condition = condition.add(disbursement::Column::IsArchived.eq(true));
        }
        Some(false) | None => {
            condition = condition.add(disbursement::Column::IsArchived.eq(false));
        }
    }

    if let Some(from) = filter.date_from {
        condition = condition.add(disbursement::Column::DisbursementDate.gte(from));
    }
    if let Some(to) = filter.date_to {
        condition = condition.add(disbursement::Column::DisbursementDate.lte(to));
    }
    if let Some(department) = &filter.department {
        condition = condition.add(disbursement::Column::Department.eq(department));
    }
    if let Some(classification) = filter.classification {
        condition = condition
            .add(disbursement::Column::Classification.eq(classification_to_entity(classification)));
    }
    if let Some(fund_source) = &filter.fund_source {
        condition = condition.add(disbursement::Column::FundSource.eq(fund_source));
    }
    if let Some(payee) = &filter.payee {
        condition = condition.add(disbursement::Column::Payee.contains(payee));
    }
    if let Some(min) = filter.min_amount_centavos {
        condition = condition.add(disbursement::Column::AmountCentavos.gte(min));
    }
    if let Some(max) = filter.max_amount_centavos {
        condition = condition.add(disbursement::Column::AmountCentavos.lte(max));
    }
    if let Some(encoded_by) = &filter.encoded_by {
        condition = condition.add(disbursement::Column::EncodedBy.eq(encoded_by));
    }

    condition
}

// ── SeaOrmDisbursementRepository ────────────────────────────────

pub struct SeaOrmDisbursementRepository {
    db: DatabaseConnection,
}

impl SeaOrmDisbursementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DisbursementRepository for SeaOrmDisbursementRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Disbursement>> {
        let model = disbursement::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_reference_number(
        &self,
        reference_number: &str,
    ) -> DomainResult<Option<Disbursement>> {
        let model = disbursement::Entity::find()
            .filter(disbursement::Column::ReferenceNumber.eq(reference_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_filtered(&self, filter: &DisbursementFilter) -> DomainResult<Vec<Disbursement>> {
        let models = disbursement::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(disbursement::Column::DisbursementDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn create(&self, record: NewDisbursement, encoded_by: &str) -> DomainResult<Disbursement> {
        let model = disbursement::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            payee: Set(record.payee),
            amount_centavos: Set(record.amount_centavos),
            disbursement_date: Set(record.disbursement_date),
            fund_source: Set(record.fund_source),
            classification: Set(classification_to_entity(record.classification)),
            description: Set(record.description),
            reference_number: Set(record.reference_number),
            department: Set(record.department),
            encoded_by: Set(encoded_by.to_string()),
            encoded_at: Set(Utc::now()),
            updated_by: Set(None),
            updated_at: Set(None),
            is_archived: Set(false),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!(
            disbursement_id = result.id.as_str(),
            reference_number = result.reference_number.as_str(),
            "Disbursement created"
        );
        Ok(entity_to_domain(result))
    }

    async fn update(
        &self,
        id: &str,
        update: DisbursementUpdate,
        updated_by: &str,
    ) -> DomainResult<Disbursement> {
        let existing = disbursement::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Disbursement",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut model: disbursement::ActiveModel = existing.into();
        if let Some(payee) = update.payee {
            model.payee = Set(payee);
        }
        if let Some(amount) = update.amount_centavos {
            model.amount_centavos = Set(amount);
        }
        if let Some(date) = update.disbursement_date {
            model.disbursement_date = Set(date);
        }
        if let Some(fund_source) = update.fund_source {
            model.fund_source = Set(fund_source);
        }
        if let Some(classification) = update.classification {
            model.classification = Set(classification_to_entity(classification));
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(reference_number) = update.reference_number {
            model.reference_number = Set(reference_number);
        }
        if let Some(department) = update.department {
            model.department = Set(department);
        }
        model.updated_by = Set(Some(updated_by.to_string()));
        model.updated_at = Set(Some(Utc::now()));

        let result = model.update(&self.db).await.map_err(db_err)?;
        Ok(entity_to_domain(result))
    }

    async fn set_archived(&self, id: &str, archived: bool, updated_by: &str) -> DomainResult<()> {
        let existing = disbursement::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Disbursement",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut model: disbursement::ActiveModel = existing.into();
        model.is_archived = Set(archived);
        model.updated_by = Set(Some(updated_by.to_string()));
        model.updated_at = Set(Some(Utc::now()));
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = disbursement::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Disbursement",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
