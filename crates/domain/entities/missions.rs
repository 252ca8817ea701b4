use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::infra::db::postgres::schema::missions;

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = missions)]
pub struct MissionEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_urgent: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub estimated_price: f64,
    pub commission: f64,
    pub status: String,
    pub client_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = missions)]
pub struct InsertMissionEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_urgent: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub estimated_price: f64,
    pub commission: f64,
    pub status: String,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
