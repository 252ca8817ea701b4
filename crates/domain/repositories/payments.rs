use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    value_objects::enums::payment_statuses::PaymentStatus,
};

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn create(&self, insert_payment_entity: InsertPaymentEntity) -> Result<PaymentEntity>;
    async fn find_active_by_mission(&self, mission_id: Uuid) -> Result<Option<PaymentEntity>>;
    /// Keyed by the external payment-intent reference so duplicate
    /// confirmations and webhook retries land on the same row. Returns the
    /// number of rows touched; zero means no matching payment exists.
    async fn update_status_by_intent(
        &self,
        payment_intent: &str,
        status: PaymentStatus,
        charge_id: Option<String>,
    ) -> Result<usize>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<PaymentEntity>>;
}
