//! Disbursement repository interface

use async_trait::async_trait;

use super::model::{Disbursement, DisbursementFilter, DisbursementUpdate, NewDisbursement};
use crate::domain::DomainResult;

#[async_trait]
pub trait DisbursementRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Disbursement>>;
    async fn find_by_reference_number(
        &self,
        reference_number: &str,
    ) -> DomainResult<Option<Disbursement>>;
    /// Filtered listing, newest disbursement date first.
    async fn find_filtered(&self, filter: &DisbursementFilter) -> DomainResult<Vec<Disbursement>>;
    async fn create(&self, record: NewDisbursement, encoded_by: &str) -> DomainResult<Disbursement>;
    async fn update(
        &self,
        id: &str,
        update: DisbursementUpdate,
        updated_by: &str,
    ) -> DomainResult<Disbursement>;
    async fn set_archived(&self, id: &str, archived: bool, updated_by: &str) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
