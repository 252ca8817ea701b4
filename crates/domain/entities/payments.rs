use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub amount: f64,
    pub commission: f64,
    pub provider_amount: f64,
    pub currency: String,
    pub status: String,
    pub stripe_payment_intent: String,
    pub stripe_charge_id: Option<String>,
    pub mission_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub id: Uuid,
    pub amount: f64,
    pub commission: f64,
    pub provider_amount: f64,
    pub currency: String,
    pub status: String,
    pub stripe_payment_intent: String,
    pub mission_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
