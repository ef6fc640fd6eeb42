//! User repository interface

use async_trait::async_trait;

use super::model::{NewUser, User, UserUpdate};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn count(&self) -> DomainResult<u64>;
    async fn create(&self, user: NewUser) -> DomainResult<User>;
    async fn update(&self, id: &str, update: UserUpdate) -> DomainResult<User>;
    async fn update_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
