//! SeaORM implementation of ClassificationRuleRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::domain::classification::{
    ClassificationRule, ClassificationRuleRepository, NewClassificationRule,
};
use crate::domain::disbursement::Classification;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{classification_rule, disbursement};

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

fn entity_to_domain(r: classification_rule::Model) -> ClassificationRule {
    // Keywords are stored as a JSON array; unreadable data degrades to
    // an empty keyword list rather than failing the whole query.
    let keywords: Vec<String> = serde_json::from_str(&r.keywords).unwrap_or_default();
    ClassificationRule {
        id: r.id,
        name: r.name,
        description: r.description,
        classification: classification_to_domain(r.classification),
        keywords,
        min_amount_centavos: r.min_amount_centavos,
        max_amount_centavos: r.max_amount_centavos,
        department: r.department,
        is_active: r.is_active,
        created_by: r.created_by,
        created_at: r.created_at,
    }
}

fn keywords_to_json(keywords: &[String]) -> DomainResult<String> {
    serde_json::to_string(keywords)
        .map_err(|e| DomainError::Validation(format!("Invalid keywords: {}", e)))
}

// ── SeaOrmClassificationRuleRepository ──────────────────────────

pub struct SeaOrmClassificationRuleRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassificationRuleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassificationRuleRepository for SeaOrmClassificationRuleRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ClassificationRule>> {
        let model = classification_rule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<ClassificationRule>> {
        let models = classification_rule::Entity::find()
            .order_by_asc(classification_rule::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<ClassificationRule>> {
        let models = classification_rule::Entity::find()
            .filter(classification_rule::Column::IsActive.eq(true))
            .order_by_asc(classification_rule::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn create(
        &self,
        rule: NewClassificationRule,
        created_by: &str,
    ) -> DomainResult<ClassificationRule> {
        let model = classification_rule::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(rule.name),
            description: Set(rule.description),
            classification: Set(classification_to_entity(rule.classification)),
            keywords: Set(keywords_to_json(&rule.keywords)?),
            min_amount_centavos: Set(rule.min_amount_centavos),
            max_amount_centavos: Set(rule.max_amount_centavos),
            department: Set(rule.department),
            is_active: Set(rule.is_active),
            created_by: Set(created_by.to_string()),
            created_at: Set(Utc::now()),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!(rule_id = result.id.as_str(), "Classification rule created");
        Ok(entity_to_domain(result))
    }

    async fn update(&self, rule: ClassificationRule) -> DomainResult<()> {
        let existing = classification_rule::Entity::find_by_id(&rule.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "ClassificationRule",
                field: "id",
                value: rule.id.clone(),
            });
        };

        let model = classification_rule::ActiveModel {
            id: Set(rule.id),
            name: Set(rule.name),
            description: Set(rule.description),
            classification: Set(classification_to_entity(rule.classification)),
            keywords: Set(keywords_to_json(&rule.keywords)?),
            min_amount_centavos: Set(rule.min_amount_centavos),
            max_amount_centavos: Set(rule.max_amount_centavos),
            department: Set(rule.department),
            is_active: Set(rule.is_active),
            created_by: Set(existing.created_by),
            created_at: Set(existing.created_at),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = classification_rule::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "ClassificationRule",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
