use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;
use uuid::Uuid;

use crate::domain::value_objects::messages::MessageModel;

/// Fan-out capacity per room; a subscriber lagging this far behind simply
/// loses events and must re-fetch history over HTTP.
const ROOM_CAPACITY: usize = 256;

/// Events broadcast to every member of a mission's room.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    NewMessage {
        message: MessageModel,
    },
    MessagesRead {
        mission_id: Uuid,
        user_id: Uuid,
    },
}

/// In-process room membership, keyed by mission id. Membership is ephemeral:
/// the registry starts empty on every boot and clients rejoin on reconnect.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<Uuid, broadcast::Sender<ChatEvent>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes the caller to a mission's room, creating it on first join.
    pub async fn join(&self, mission_id: Uuid) -> broadcast::Receiver<ChatEvent> {
        let mut rooms = self.rooms.lock().await;
        let sender = rooms
            .entry(mission_id)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0);
        sender.subscribe()
    }

    /// Broadcasts to every current member of the room; returns how many
    /// members the event reached. A room with no members left is dropped.
    pub async fn publish(&self, mission_id: Uuid, event: ChatEvent) -> usize {
        let mut rooms = self.rooms.lock().await;
        let delivered = match rooms.get(&mission_id) {
            Some(sender) => sender.send(event).ok(),
            None => return 0,
        };

        match delivered {
            Some(delivered) => delivered,
            None => {
                debug!(%mission_id, "room has no members left, dropping it");
                rooms.remove(&mission_id);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(mission_id: Uuid) -> MessageModel {
        MessageModel {
            id: Uuid::new_v4(),
            content: "on my way".to_string(),
            mission_id,
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            is_read: false,
            created_at: chrono::Utc::now(),
            sender: None,
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_member_of_the_room() {
        let registry = RoomRegistry::new();
        let mission_id = Uuid::new_v4();

        let mut first = registry.join(mission_id).await;
        let mut second = registry.join(mission_id).await;

        let delivered = registry
            .publish(
                mission_id,
                ChatEvent::NewMessage {
                    message: message(mission_id),
                },
            )
            .await;

        assert_eq!(delivered, 2);
        assert!(matches!(
            first.recv().await,
            Ok(ChatEvent::NewMessage { .. })
        ));
        assert!(matches!(
            second.recv().await,
            Ok(ChatEvent::NewMessage { .. })
        ));
    }

    #[tokio::test]
    async fn publish_without_a_room_is_a_noop() {
        let registry = RoomRegistry::new();
        let delivered = registry
            .publish(
                Uuid::new_v4(),
                ChatEvent::MessagesRead {
                    mission_id: Uuid::new_v4(),
                    user_id: Uuid::new_v4(),
                },
            )
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn rooms_are_isolated_from_each_other() {
        let registry = RoomRegistry::new();
        let mission_a = Uuid::new_v4();
        let mission_b = Uuid::new_v4();

        let mut member_a = registry.join(mission_a).await;
        let _member_b = registry.join(mission_b).await;

        registry
            .publish(
                mission_b,
                ChatEvent::NewMessage {
                    message: message(mission_b),
                },
            )
            .await;

        assert!(matches!(
            member_a.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn abandoned_rooms_are_pruned_on_publish() {
        let registry = RoomRegistry::new();
        let mission_id = Uuid::new_v4();

        drop(registry.join(mission_id).await);

        let delivered = registry
            .publish(
                mission_id,
                ChatEvent::NewMessage {
                    message: message(mission_id),
                },
            )
            .await;
        assert_eq!(delivered, 0);
        assert!(registry.rooms.lock().await.is_empty());
    }
}
