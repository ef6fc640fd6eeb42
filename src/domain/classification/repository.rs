//! Classification rule repository interface

use async_trait::async_trait;

use super::model::{ClassificationRule, NewClassificationRule};
use crate::domain::DomainResult;

#[async_trait]
pub trait ClassificationRuleRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ClassificationRule>>;
    async fn find_all(&self) -> DomainResult<Vec<ClassificationRule>>;
    async fn find_active(&self) -> DomainResult<Vec<ClassificationRule>>;
    async fn create(
        &self,
        rule: NewClassificationRule,
        created_by: &str,
    ) -> DomainResult<ClassificationRule>;
    async fn update(&self, rule: ClassificationRule) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
