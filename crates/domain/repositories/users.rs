use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UpdateUserProfileEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn register(&self, insert_user_entity: InsertUserEntity) -> Result<UserEntity>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: UpdateUserProfileEntity,
    ) -> Result<UserEntity>;
    async fn set_stripe_customer_id(&self, id: Uuid, customer_id: &str) -> Result<()>;
    async fn list_available_providers(&self) -> Result<Vec<UserEntity>>;
}
