use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::missions::{InsertMissionEntity, MissionEntity},
        repositories::missions::MissionRepository,
        value_objects::{
            enums::mission_statuses::MissionStatus,
            missions::{MissionFilter, ParticipantSide},
        },
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{missions, users},
    },
};

pub struct MissionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MissionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MissionRepository for MissionPostgres {
    async fn create(&self, insert_mission_entity: InsertMissionEntity) -> Result<MissionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mission = insert_into(missions::table)
            .values(&insert_mission_entity)
            .returning(MissionEntity::as_returning())
            .get_result::<MissionEntity>(&mut conn)?;

        Ok(mission)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mission = missions::table
            .find(id)
            .select(MissionEntity::as_select())
            .first::<MissionEntity>(&mut conn)
            .optional()?;

        Ok(mission)
    }

    async fn list(&self, filter: MissionFilter) -> Result<Vec<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = missions::table.into_boxed();

        if let Some(status) = filter.status {
            query = query.filter(missions::status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(missions::category.eq(category));
        }
        if let Some(is_urgent) = filter.is_urgent {
            query = query.filter(missions::is_urgent.eq(is_urgent));
        }

        let results = query
            .order(missions::created_at.desc())
            .select(MissionEntity::as_select())
            .load::<MissionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_participant(
        &self,
        user_id: Uuid,
        side: Option<ParticipantSide>,
    ) -> Result<Vec<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = missions::table.into_boxed();

        query = match side {
            Some(ParticipantSide::Client) => query.filter(missions::client_id.eq(user_id)),
            Some(ParticipantSide::Provider) => {
                query.filter(missions::provider_id.eq(Some(user_id)))
            }
            None => query.filter(
                missions::client_id
                    .eq(user_id)
                    .or(missions::provider_id.eq(Some(user_id))),
            ),
        };

        let results = query
            .order(missions::created_at.desc())
            .select(MissionEntity::as_select())
            .load::<MissionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn accept_if_pending(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Compare-and-set on status: of N concurrent accepts exactly one
        // observes PENDING and wins the row.
        let mission = update(missions::table)
            .filter(missions::id.eq(mission_id))
            .filter(missions::status.eq(MissionStatus::Pending.as_str()))
            .set((
                missions::provider_id.eq(Some(provider_id)),
                missions::status.eq(MissionStatus::Accepted.as_str()),
                missions::accepted_at.eq(Some(Utc::now())),
                missions::updated_at.eq(Utc::now()),
            ))
            .returning(MissionEntity::as_returning())
            .get_result::<MissionEntity>(&mut conn)
            .optional()?;

        Ok(mission)
    }

    async fn start_if_accepted(&self, mission_id: Uuid) -> Result<Option<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mission = update(missions::table)
            .filter(missions::id.eq(mission_id))
            .filter(missions::status.eq(MissionStatus::Accepted.as_str()))
            .set((
                missions::status.eq(MissionStatus::InProgress.as_str()),
                missions::started_at.eq(Some(Utc::now())),
                missions::updated_at.eq(Utc::now()),
            ))
            .returning(MissionEntity::as_returning())
            .get_result::<MissionEntity>(&mut conn)
            .optional()?;

        Ok(mission)
    }

    async fn complete_if_in_progress(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The status flip and the job-counter increment commit together; a
        // retried completion loses the CAS and never reaches the increment.
        let mission = conn.transaction::<Option<MissionEntity>, diesel::result::Error, _>(
            |conn| {
                let updated = update(missions::table)
                    .filter(missions::id.eq(mission_id))
                    .filter(missions::status.eq(MissionStatus::InProgress.as_str()))
                    .set((
                        missions::status.eq(MissionStatus::Completed.as_str()),
                        missions::completed_at.eq(Some(Utc::now())),
                        missions::updated_at.eq(Utc::now()),
                    ))
                    .returning(MissionEntity::as_returning())
                    .get_result::<MissionEntity>(conn)
                    .optional()?;

                if updated.is_some() {
                    update(users::table)
                        .filter(users::id.eq(provider_id))
                        .set((
                            users::total_jobs.eq(users::total_jobs + 1),
                            users::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)?;
                }

                Ok(updated)
            },
        )?;

        Ok(mission)
    }

    async fn cancel_if_active(&self, mission_id: Uuid) -> Result<Option<MissionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let active = [
            MissionStatus::Pending.as_str(),
            MissionStatus::Accepted.as_str(),
            MissionStatus::InProgress.as_str(),
        ];

        let mission = update(missions::table)
            .filter(missions::id.eq(mission_id))
            .filter(missions::status.eq_any(active))
            .set((
                missions::status.eq(MissionStatus::Cancelled.as_str()),
                missions::updated_at.eq(Utc::now()),
            ))
            .returning(MissionEntity::as_returning())
            .get_result::<MissionEntity>(&mut conn)
            .optional()?;

        Ok(mission)
    }
}
