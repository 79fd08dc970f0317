pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::protocol::{ClientMessage, RoomView, ServerMessage};
use crate::state::AppState;
use crate::types::GameState;
use handlers::Session;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Room code for a resuming client
    pub room: Option<String>,
    /// Their previous player id
    pub player: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!(
        "WebSocket connection request: room={:?}, player={:?}",
        params.room,
        params.player
    );
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

async fn send(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
            true
        }
    }
}

/// Handle an individual WebSocket connection: one session, one optional
/// room subscription, presence signaled on close
async fn handle_socket(socket: WebSocket, params: WsQuery, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = Session::default();
    let mut notify_rx = None;

    // Reconnect shortcut via query params, same path as an explicit JoinRoom
    if let (Some(room), Some(player)) = (params.room, params.player) {
        let msg = ClientMessage::JoinRoom {
            room_code: room,
            name: None,
            avatar: None,
            player_id: Some(player),
        };
        if let Some(reply) = handlers::handle_message(msg, &mut session, &state).await {
            if !send(&mut sender, &reply).await {
                return;
            }
        }
        if let Some(room_id) = &session.room_id {
            notify_rx = state.subscribe(room_id).await;
        }
    }

    loop {
        tokio::select! {
            // Room change notifications, projected for this viewer
            notification = async {
                match &mut notify_rx {
                    Some(rx) => Some(rx.recv().await),
                    None => {
                        // Not subscribed anywhere: wait for client traffic
                        std::future::pending::<Option<Result<GameState, RecvError>>>().await
                    }
                }
            } => {
                match notification {
                    Some(Ok(game)) => {
                        let Some(player_id) = session.player_id.clone() else { continue };
                        if game.players.contains_key(&player_id) {
                            let view = RoomView::for_player(&game, &player_id, Utc::now());
                            if !send(&mut sender, &ServerMessage::RoomState { room: view }).await {
                                break;
                            }
                        } else {
                            // Kicked (or otherwise removed): tell them and detach
                            let banned_until = game.banned_players.get(&player_id).copied();
                            let _ = send(&mut sender, &ServerMessage::Kicked { banned_until }).await;
                            session = Session::default();
                            notify_rx = None;
                        }
                    }
                    Some(Err(RecvError::Lagged(skipped))) => {
                        // Slow consumer: resync from the latest snapshot
                        tracing::debug!("Client lagged {} notifications, resyncing", skipped);
                        if let (Some(room_id), Some(player_id)) =
                            (&session.room_id, &session.player_id)
                        {
                            if let Some(game) = state.get_room_state(room_id).await {
                                let view = RoomView::for_player(&game, player_id, Utc::now());
                                if !send(&mut sender, &ServerMessage::RoomState { room: view }).await {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Err(RecvError::Closed)) | None => {
                        // Room destroyed from under us
                        let _ = send(&mut sender, &ServerMessage::Left).await;
                        session = Session::default();
                        notify_rx = None;
                    }
                }
            }

            // Client commands
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        let msg: ClientMessage = match serde_json::from_str(&text) {
                            Ok(msg) => msg,
                            Err(e) => {
                                let err = ServerMessage::Error {
                                    code: "BAD_MESSAGE".to_string(),
                                    msg: format!("Unparseable message: {e}"),
                                };
                                if !send(&mut sender, &err).await {
                                    break;
                                }
                                continue;
                            }
                        };

                        let room_before = session.room_id.clone();
                        let reply = handlers::handle_message(msg, &mut session, &state).await;

                        // Joining or leaving a room moves the subscription
                        if session.room_id != room_before {
                            notify_rx = match &session.room_id {
                                Some(room_id) => state.subscribe(room_id).await,
                                None => None,
                            };
                        }

                        if let Some(reply) = reply {
                            if !send(&mut sender, &reply).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ping/pong/binary: nothing to do
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // Presence signal: the storage layer's on-disconnect hook
    if let (Some(room_id), Some(player_id)) = (&session.room_id, &session.player_id) {
        state.disconnect_player(room_id, player_id).await;
    }
}
