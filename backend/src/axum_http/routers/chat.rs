use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::repositories::{
        messages::MessageRepository, missions::MissionRepository, users::UserRepository,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            messages::MessagePostgres, missions::MissionPostgres, users::UserPostgres,
        },
    },
    realtime::room_registry::RoomRegistry,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser, axum_http::error_responses::usecase_error_response,
    usecases::chat::ChatUseCase,
};

/// Events a connected client may emit over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinMission {
        mission_id: Uuid,
    },
    SendMessage {
        mission_id: Uuid,
        receiver_id: Uuid,
        content: String,
    },
    MarkRead {
        mission_id: Uuid,
    },
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let message_repository = MessagePostgres::new(Arc::clone(&db_pool));
    let mission_repository = MissionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let rooms = Arc::new(RoomRegistry::new());

    let chat_usecase = ChatUseCase::new(
        Arc::new(message_repository),
        Arc::new(mission_repository),
        Arc::new(user_repository),
        rooms,
    );

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/:mission_id/messages", get(history))
        .with_state(Arc::new(chat_usecase))
}

pub async fn history<Msg, M, U>(
    State(chat_usecase): State<Arc<ChatUseCase<Msg, M, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(mission_id): Path<Uuid>,
) -> impl IntoResponse
where
    Msg: MessageRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match chat_usecase.history(mission_id, user_id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => usecase_error_response(err.status_code(), err),
    }
}

pub async fn ws_handler<Msg, M, U>(
    State(chat_usecase): State<Arc<ChatUseCase<Msg, M, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse
where
    Msg: MessageRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "chat: websocket connection upgraded");
    ws.on_upgrade(move |socket| handle_socket(socket, chat_usecase, user_id))
}

fn send_error(out_tx: &mpsc::UnboundedSender<String>, error: &str) {
    let payload = json!({ "event": "message_error", "error": error }).to_string();
    let _ = out_tx.send(payload);
}

async fn handle_socket<Msg, M, U>(
    socket: WebSocket,
    chat_usecase: Arc<ChatUseCase<Msg, M, U>>,
    user_id: Uuid,
) where
    Msg: MessageRepository + Send + Sync + 'static,
    M: MissionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Single writer: room forwarders and error replies both funnel through
    // this channel so the sink is never shared.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let write_task = tokio::spawn(async move {
        while let Some(payload) = out_rx.recv().await {
            if ws_sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    let mut room_forwarders: HashMap<Uuid, JoinHandle<()>> = HashMap::new();

    while let Some(Ok(message)) = ws_receiver.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let event = match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => event,
            Err(err) => {
                debug!(%user_id, error = %err, "chat: unparseable client event");
                send_error(&out_tx, "invalid event payload");
                continue;
            }
        };

        match event {
            ClientEvent::JoinMission { mission_id } => {
                // Re-joining a room this connection already forwards is a no-op.
                if room_forwarders.contains_key(&mission_id) {
                    continue;
                }

                match chat_usecase.join(mission_id, user_id).await {
                    Ok(mut room_receiver) => {
                        let out_tx = out_tx.clone();
                        let forwarder = tokio::spawn(async move {
                            loop {
                                match room_receiver.recv().await {
                                    Ok(event) => {
                                        let Ok(payload) = serde_json::to_string(&event) else {
                                            continue;
                                        };
                                        if out_tx.send(payload).is_err() {
                                            break;
                                        }
                                    }
                                    Err(
                                        tokio::sync::broadcast::error::RecvError::Lagged(skipped),
                                    ) => {
                                        // Dropped events are only recoverable
                                        // through the history endpoint.
                                        debug!(%mission_id, skipped, "chat: room receiver lagged");
                                    }
                                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                                        break;
                                    }
                                }
                            }
                        });
                        room_forwarders.insert(mission_id, forwarder);
                    }
                    Err(err) => {
                        warn!(%user_id, %mission_id, error = %err, "chat: join rejected");
                        send_error(&out_tx, &err.to_string());
                    }
                }
            }
            ClientEvent::SendMessage {
                mission_id,
                receiver_id,
                content,
            } => {
                if let Err(err) = chat_usecase
                    .send(mission_id, user_id, receiver_id, content)
                    .await
                {
                    warn!(%user_id, %mission_id, error = %err, "chat: send failed");
                    // Only the sending connection hears about the failure.
                    send_error(&out_tx, "Failed to send message");
                }
            }
            ClientEvent::MarkRead { mission_id } => {
                if let Err(err) = chat_usecase.mark_read(mission_id, user_id).await {
                    warn!(%user_id, %mission_id, error = %err, "chat: mark_read failed");
                }
            }
        }
    }

    for (_, forwarder) in room_forwarders {
        forwarder.abort();
    }
    write_task.abort();

    info!(%user_id, "chat: websocket connection closed");
}
