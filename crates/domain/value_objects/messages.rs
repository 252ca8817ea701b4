use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{messages::MessageEntity, users::UserEntity};

/// Minimal sender profile attached to every broadcast message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenderSummaryModel {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl SenderSummaryModel {
    pub fn from_entity(entity: &UserEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name.clone(),
            last_name: entity.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageModel {
    pub id: Uuid,
    pub content: String,
    pub mission_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: Option<SenderSummaryModel>,
}

impl MessageModel {
    pub fn from_entity(entity: MessageEntity, sender: Option<SenderSummaryModel>) -> Self {
        Self {
            id: entity.id,
            content: entity.content,
            mission_id: entity.mission_id,
            sender_id: entity.sender_id,
            receiver_id: entity.receiver_id,
            is_read: entity.is_read,
            created_at: entity.created_at,
            sender,
        }
    }
}
