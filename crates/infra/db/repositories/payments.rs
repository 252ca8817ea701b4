use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::enums::payment_statuses::PaymentStatus,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create(&self, insert_payment_entity: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = insert_into(payments::table)
            .values(&insert_payment_entity)
            .returning(PaymentEntity::as_returning())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(payment)
    }

    async fn find_active_by_mission(&self, mission_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .filter(payments::mission_id.eq(mission_id))
            .filter(payments::status.ne(PaymentStatus::Failed.as_str()))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn update_status_by_intent(
        &self,
        payment_intent: &str,
        status: PaymentStatus,
        charge_id: Option<String>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = match charge_id {
            Some(charge_id) => update(payments::table)
                .filter(payments::stripe_payment_intent.eq(payment_intent))
                .set((
                    payments::status.eq(status.as_str()),
                    payments::stripe_charge_id.eq(Some(charge_id)),
                    payments::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)?,
            None => update(payments::table)
                .filter(payments::stripe_payment_intent.eq(payment_intent))
                .set((
                    payments::status.eq(status.as_str()),
                    payments::updated_at.eq(Utc::now()),
                ))
                .execute(&mut conn)?,
        };

        Ok(rows)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }
}
