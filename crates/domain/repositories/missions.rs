use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::missions::{InsertMissionEntity, MissionEntity},
    value_objects::missions::{MissionFilter, ParticipantSide},
};

/// Every state transition is a single conditional update against the store:
/// the `*_if_*` methods return `None` when the mission was not in the
/// expected state, which is how concurrent writers lose the race.
#[automock]
#[async_trait]
pub trait MissionRepository {
    async fn create(&self, insert_mission_entity: InsertMissionEntity) -> Result<MissionEntity>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MissionEntity>>;
    async fn list(&self, filter: MissionFilter) -> Result<Vec<MissionEntity>>;
    async fn list_by_participant(
        &self,
        user_id: Uuid,
        side: Option<ParticipantSide>,
    ) -> Result<Vec<MissionEntity>>;
    async fn accept_if_pending(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<MissionEntity>>;
    async fn start_if_accepted(&self, mission_id: Uuid) -> Result<Option<MissionEntity>>;
    /// Completion also increments the provider's job counter; both writes
    /// commit or roll back together.
    async fn complete_if_in_progress(
        &self,
        mission_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Option<MissionEntity>>;
    async fn cancel_if_active(&self, mission_id: Uuid) -> Result<Option<MissionEntity>>;
}
