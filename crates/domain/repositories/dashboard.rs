use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{missions::MissionEntity, payments::PaymentEntity, users::UserEntity},
    value_objects::{
        dashboard::DashboardStatsModel,
        enums::{
            mission_statuses::MissionStatus, payment_statuses::PaymentStatus, user_roles::Role,
        },
    },
};

#[automock]
#[async_trait]
pub trait DashboardRepository {
    async fn dashboard_stats(&self) -> Result<DashboardStatsModel>;
    async fn list_users(
        &self,
        role: Option<Role>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<UserEntity>, i64)>;
    async fn list_missions(
        &self,
        status: Option<MissionStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<MissionEntity>, i64)>;
    async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PaymentEntity>, i64)>;
}
