use std::sync::Arc;

use chrono::Utc;
use crates::{
    domain::{
        entities::{messages::InsertMessageEntity, missions::MissionEntity},
        repositories::{
            messages::MessageRepository, missions::MissionRepository, users::UserRepository,
        },
        value_objects::messages::{MessageModel, SenderSummaryModel},
    },
    realtime::room_registry::{ChatEvent, RoomRegistry},
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Mission not found")]
    MissionNotFound,
    #[error("Not authorized")]
    NotParticipant,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ChatError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ChatError::MissionNotFound => StatusCode::NOT_FOUND,
            ChatError::NotParticipant => StatusCode::FORBIDDEN,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ChatError>;

pub struct ChatUseCase<Msg, M, U>
where
    Msg: MessageRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    message_repo: Arc<Msg>,
    mission_repo: Arc<M>,
    user_repo: Arc<U>,
    rooms: Arc<RoomRegistry>,
}

impl<Msg, M, U> ChatUseCase<Msg, M, U>
where
    Msg: MessageRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(
        message_repo: Arc<Msg>,
        mission_repo: Arc<M>,
        user_repo: Arc<U>,
        rooms: Arc<RoomRegistry>,
    ) -> Self {
        Self {
            message_repo,
            mission_repo,
            user_repo,
            rooms,
        }
    }

    async fn ensure_participant(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
    ) -> UseCaseResult<MissionEntity> {
        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await
            .map_err(ChatError::Internal)?
            .ok_or(ChatError::MissionNotFound)?;

        if mission.client_id != user_id && mission.provider_id != Some(user_id) {
            warn!(%mission_id, %user_id, "chat: room access by non-participant");
            return Err(ChatError::NotParticipant);
        }

        Ok(mission)
    }

    /// Subscribes a connection to the mission's room. Joining twice is
    /// harmless; the adapter keeps one forwarder per room per connection.
    pub async fn join(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
    ) -> UseCaseResult<broadcast::Receiver<ChatEvent>> {
        self.ensure_participant(mission_id, user_id).await?;

        info!(%mission_id, %user_id, "chat: joined mission room");
        Ok(self.rooms.join(mission_id).await)
    }

    /// Persists the message, then fans it out to the room. Nothing is
    /// broadcast when the store rejects the write.
    pub async fn send(
        &self,
        mission_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
    ) -> UseCaseResult<MessageModel> {
        self.ensure_participant(mission_id, sender_id).await?;

        let entity = self
            .message_repo
            .insert(InsertMessageEntity {
                id: Uuid::new_v4(),
                content,
                mission_id,
                sender_id,
                receiver_id,
                is_read: false,
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%mission_id, %sender_id, db_error = ?err, "chat: failed to persist message");
                ChatError::Internal(err)
            })?;

        // Sender profile is decoration; a lookup failure does not block the
        // broadcast of a message that is already durable.
        let sender = match self.user_repo.find_by_id(sender_id).await {
            Ok(Some(user)) => Some(SenderSummaryModel::from_entity(&user)),
            Ok(None) => None,
            Err(err) => {
                warn!(%sender_id, db_error = ?err, "chat: failed to load sender profile");
                None
            }
        };

        let message = MessageModel::from_entity(entity, sender);

        let delivered = self
            .rooms
            .publish(
                mission_id,
                ChatEvent::NewMessage {
                    message: message.clone(),
                },
            )
            .await;

        info!(
            %mission_id,
            message_id = %message.id,
            delivered,
            "chat: message persisted and broadcast"
        );

        Ok(message)
    }

    /// Flips every unread message addressed to the user, then tells the room.
    pub async fn mark_read(&self, mission_id: Uuid, user_id: Uuid) -> UseCaseResult<usize> {
        self.ensure_participant(mission_id, user_id).await?;

        let rows = self
            .message_repo
            .mark_read(mission_id, user_id)
            .await
            .map_err(|err| {
                error!(%mission_id, %user_id, db_error = ?err, "chat: failed to mark messages read");
                ChatError::Internal(err)
            })?;

        self.rooms
            .publish(
                mission_id,
                ChatEvent::MessagesRead {
                    mission_id,
                    user_id,
                },
            )
            .await;

        info!(%mission_id, %user_id, rows, "chat: messages marked read");
        Ok(rows)
    }

    /// Durable history for reconnecting clients; the relay itself never
    /// replays missed events.
    pub async fn history(
        &self,
        mission_id: Uuid,
        user_id: Uuid,
    ) -> UseCaseResult<Vec<MessageModel>> {
        self.ensure_participant(mission_id, user_id).await?;

        let messages = self
            .message_repo
            .list_by_mission(mission_id)
            .await
            .map_err(|err| {
                error!(%mission_id, db_error = ?err, "chat: failed to load message history");
                ChatError::Internal(err)
            })?;

        Ok(messages
            .into_iter()
            .map(|entity| MessageModel::from_entity(entity, None))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use crates::domain::{
        entities::{messages::MessageEntity, users::UserEntity},
        repositories::{
            messages::MockMessageRepository, missions::MockMissionRepository,
            users::MockUserRepository,
        },
        value_objects::enums::mission_statuses::MissionStatus,
    };

    fn mission(client_id: Uuid, provider_id: Uuid) -> MissionEntity {
        MissionEntity {
            id: Uuid::new_v4(),
            title: "Assemble wardrobe".to_string(),
            description: "Two-door wardrobe".to_string(),
            category: "handyman".to_string(),
            is_urgent: false,
            latitude: 48.85,
            longitude: 2.35,
            address: "Paris".to_string(),
            estimated_price: 100.0,
            commission: 15.0,
            status: MissionStatus::Accepted.to_string(),
            client_id,
            provider_id: Some(provider_id),
            created_at: Utc::now(),
            accepted_at: Some(Utc::now()),
            started_at: None,
            completed_at: None,
            updated_at: Utc::now(),
        }
    }

    fn sender_user(id: Uuid) -> UserEntity {
        UserEntity {
            id,
            email: "client@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone_number: None,
            role: "CLIENT".to_string(),
            profile_image: None,
            latitude: None,
            longitude: None,
            address: None,
            rating: 0.0,
            total_jobs: 0,
            is_available: false,
            stripe_customer_id: None,
            fcm_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn usecase(
        message_repo: MockMessageRepository,
        mission_repo: MockMissionRepository,
        user_repo: MockUserRepository,
        rooms: Arc<RoomRegistry>,
    ) -> ChatUseCase<MockMessageRepository, MockMissionRepository, MockUserRepository> {
        ChatUseCase::new(
            Arc::new(message_repo),
            Arc::new(mission_repo),
            Arc::new(user_repo),
            rooms,
        )
    }

    #[tokio::test]
    async fn send_persists_then_broadcasts_with_sender_profile() {
        let client_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let mission = mission(client_id, provider_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let mut message_repo = MockMessageRepository::new();
        message_repo.expect_insert().returning(|entity| {
            Ok(MessageEntity {
                id: entity.id,
                content: entity.content,
                mission_id: entity.mission_id,
                sender_id: entity.sender_id,
                receiver_id: entity.receiver_id,
                is_read: entity.is_read,
                created_at: entity.created_at,
            })
        });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sender_user(id))));

        let rooms = Arc::new(RoomRegistry::new());
        let mut member = rooms.join(mission_id).await;

        let usecase = usecase(message_repo, mission_repo, user_repo, rooms);

        let message = usecase
            .send(mission_id, client_id, provider_id, "on my way".to_string())
            .await
            .expect("send should pass");
        assert!(!message.is_read);

        let event = member.recv().await.expect("room member receives the event");
        match event {
            ChatEvent::NewMessage { message } => {
                assert_eq!(message.content, "on my way");
                assert_eq!(
                    message.sender.expect("sender profile attached").first_name,
                    "Ada"
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn nothing_is_broadcast_when_the_store_is_down() {
        let client_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let mission = mission(client_id, provider_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_insert()
            .returning(|_| Err(anyhow!("connection refused")));

        let rooms = Arc::new(RoomRegistry::new());
        let mut member = rooms.join(mission_id).await;

        let usecase = usecase(
            message_repo,
            mission_repo,
            MockUserRepository::new(),
            rooms,
        );

        let result = usecase
            .send(mission_id, client_id, provider_id, "hello?".to_string())
            .await;
        assert!(matches!(result, Err(ChatError::Internal(_))));
        assert!(matches!(
            member.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn outsiders_cannot_send_into_a_room() {
        let mission = mission(Uuid::new_v4(), Uuid::new_v4());
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        // No insert expectation: the message must never reach the store.
        let usecase = usecase(
            MockMessageRepository::new(),
            mission_repo,
            MockUserRepository::new(),
            Arc::new(RoomRegistry::new()),
        );

        let result = usecase
            .send(mission_id, Uuid::new_v4(), Uuid::new_v4(), "hi".to_string())
            .await;
        assert!(matches!(result, Err(ChatError::NotParticipant)));
    }

    #[tokio::test]
    async fn mark_read_flips_rows_and_notifies_the_room() {
        let client_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let mission = mission(client_id, provider_id);
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let mut message_repo = MockMessageRepository::new();
        message_repo.expect_mark_read().returning(|_, _| Ok(3));

        let rooms = Arc::new(RoomRegistry::new());
        let mut member = rooms.join(mission_id).await;

        let usecase = usecase(
            message_repo,
            mission_repo,
            MockUserRepository::new(),
            rooms,
        );

        let rows = usecase
            .mark_read(mission_id, provider_id)
            .await
            .expect("mark_read should pass");
        assert_eq!(rows, 3);

        match member.recv().await.expect("read receipt broadcast") {
            ChatEvent::MessagesRead { user_id, .. } => assert_eq!(user_id, provider_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn history_is_participant_only() {
        let mission = mission(Uuid::new_v4(), Uuid::new_v4());
        let mission_id = mission.id;

        let mut mission_repo = MockMissionRepository::new();
        mission_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(mission.clone())));

        let usecase = usecase(
            MockMessageRepository::new(),
            mission_repo,
            MockUserRepository::new(),
            Arc::new(RoomRegistry::new()),
        );

        let result = usecase.history(mission_id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(ChatError::NotParticipant)));
    }
}
