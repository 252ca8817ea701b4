use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::sum, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{
        entities::{missions::MissionEntity, payments::PaymentEntity, users::UserEntity},
        repositories::dashboard::DashboardRepository,
        value_objects::{
            dashboard::{
                DashboardStatsModel, MissionCountsModel, RevenueModel, UserCountsModel,
            },
            enums::{
                mission_statuses::MissionStatus, payment_statuses::PaymentStatus,
                user_roles::Role,
            },
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{missions, payments, users},
    },
};

pub struct DashboardPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DashboardPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DashboardRepository for DashboardPostgres {
    async fn dashboard_stats(&self) -> Result<DashboardStatsModel> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total_users = users::table.count().get_result::<i64>(&mut conn)?;
        let total_clients = users::table
            .filter(users::role.eq(Role::Client.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;
        let total_providers = users::table
            .filter(users::role.eq(Role::Provider.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let total_missions = missions::table.count().get_result::<i64>(&mut conn)?;
        let pending_missions = missions::table
            .filter(missions::status.eq(MissionStatus::Pending.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;
        let completed_missions = missions::table
            .filter(missions::status.eq(MissionStatus::Completed.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let total_commission = payments::table
            .filter(payments::status.eq(PaymentStatus::Completed.as_str()))
            .select(sum(payments::commission))
            .get_result::<Option<f64>>(&mut conn)?
            .unwrap_or(0.0);

        Ok(DashboardStatsModel {
            users: UserCountsModel {
                total: total_users,
                clients: total_clients,
                providers: total_providers,
            },
            missions: MissionCountsModel {
                total: total_missions,
                pending: pending_missions,
                completed: completed_missions,
            },
            revenue: RevenueModel { total_commission },
        })
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<UserEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = users::table.into_boxed();
        let mut count_query = users::table.into_boxed();
        if let Some(role) = role {
            query = query.filter(users::role.eq(role.as_str()));
            count_query = count_query.filter(users::role.eq(role.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;
        let results = query
            .order(users::created_at.desc())
            .offset((page - 1) * limit)
            .limit(limit)
            .select(UserEntity::as_select())
            .load::<UserEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn list_missions(
        &self,
        status: Option<MissionStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<MissionEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = missions::table.into_boxed();
        let mut count_query = missions::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(missions::status.eq(status.as_str()));
            count_query = count_query.filter(missions::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;
        let results = query
            .order(missions::created_at.desc())
            .offset((page - 1) * limit)
            .limit(limit)
            .select(MissionEntity::as_select())
            .load::<MissionEntity>(&mut conn)?;

        Ok((results, total))
    }

    async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PaymentEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table.into_boxed();
        let mut count_query = payments::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(payments::status.eq(status.as_str()));
            count_query = count_query.filter(payments::status.eq(status.as_str()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;
        let results = query
            .order(payments::created_at.desc())
            .offset((page - 1) * limit)
            .limit(limit)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok((results, total))
    }
}
