use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::messages::{InsertMessageEntity, MessageEntity};

#[automock]
#[async_trait]
pub trait MessageRepository {
    async fn insert(&self, insert_message_entity: InsertMessageEntity) -> Result<MessageEntity>;
    async fn list_by_mission(&self, mission_id: Uuid) -> Result<Vec<MessageEntity>>;
    /// Bulk-marks every unread message addressed to `receiver_id` in the
    /// mission; returns how many rows flipped.
    async fn mark_read(&self, mission_id: Uuid, receiver_id: Uuid) -> Result<usize>;
}
