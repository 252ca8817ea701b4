use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::messages::{InsertMessageEntity, MessageEntity},
        repositories::messages::MessageRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::messages},
};

pub struct MessagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MessagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessageRepository for MessagePostgres {
    async fn insert(&self, insert_message_entity: InsertMessageEntity) -> Result<MessageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let message = insert_into(messages::table)
            .values(&insert_message_entity)
            .returning(MessageEntity::as_returning())
            .get_result::<MessageEntity>(&mut conn)?;

        Ok(message)
    }

    async fn list_by_mission(&self, mission_id: Uuid) -> Result<Vec<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = messages::table
            .filter(messages::mission_id.eq(mission_id))
            .order(messages::created_at.asc())
            .select(MessageEntity::as_select())
            .load::<MessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn mark_read(&self, mission_id: Uuid, receiver_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(messages::table)
            .filter(messages::mission_id.eq(mission_id))
            .filter(messages::receiver_id.eq(receiver_id))
            .filter(messages::is_read.eq(false))
            .set(messages::is_read.eq(true))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
