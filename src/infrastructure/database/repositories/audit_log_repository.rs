//! SeaORM implementation of AuditLogRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::audit::{
    AuditAction, AuditEntry, AuditFilter, AuditLogRepository, NewAuditEntry,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::audit_log;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Validation(format!("Database error: {}", e))
}

fn entity_to_domain(e: audit_log::Model) -> Option<AuditEntry> {
    // Rows with an unknown action string are skipped rather than
    // failing the listing.
    let action = AuditAction::parse(&e.action)?;
    Some(AuditEntry {
        id: e.id,
        user_id: e.user_id,
        action,
        entity_type: e.entity_type,
        entity_id: e.entity_id,
        detail: e.detail,
        recorded_at: e.recorded_at,
    })
}

fn filter_condition(filter: &AuditFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(user_id) = &filter.user_id {
        condition = condition.add(audit_log::Column::UserId.eq(user_id));
    }
    if let Some(action) = filter.action {
        condition = condition.add(audit_log::Column::Action.eq(action.as_str()));
    }
    if let Some(entity_type) = &filter.entity_type {
        condition = condition.add(audit_log::Column::EntityType.eq(entity_type));
    }
    if let Some(from) = filter.from {
        condition = condition.add(audit_log::Column::RecordedAt.gte(from));
    }
    if let Some(to) = filter.to {
        condition = condition.add(audit_log::Column::RecordedAt.lte(to));
    }

    condition
}

// ── SeaOrmAuditLogRepository ────────────────────────────────────

pub struct SeaOrmAuditLogRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for SeaOrmAuditLogRepository {
    async fn append(&self, entry: NewAuditEntry) -> DomainResult<()> {
        let model = audit_log::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_string()),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            detail: Set(entry.detail),
            recorded_at: Set(Utc::now()),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_filtered(&self, filter: &AuditFilter) -> DomainResult<Vec<AuditEntry>> {
        let models = audit_log::Entity::find()
            .filter(filter_condition(filter))
            .order_by_desc(audit_log::Column::RecordedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().filter_map(entity_to_domain).collect())
    }
}
