use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::messages;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = messages)]
pub struct MessageEntity {
    pub id: Uuid,
    pub content: String,
    pub mission_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct InsertMessageEntity {
    pub id: Uuid,
    pub content: String,
    pub mission_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
