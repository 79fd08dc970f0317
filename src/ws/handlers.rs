//! WebSocket message dispatch
//!
//! Every command is validated against the latest shared state inside the
//! room transaction. Rejections go back to the sender only; accepted
//! commands reach everyone through the room's change notifications, and the
//! sender additionally gets its own fresh projection as a direct reply.

use crate::protocol::{ClientMessage, RoomView, ServerMessage};
use crate::state::AppState;
use crate::types::*;
use chrono::Utc;
use std::sync::Arc;

/// Per-connection identity: which room and seat this socket speaks for
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub room_id: Option<RoomId>,
    pub player_id: Option<PlayerId>,
}

/// Macro to resolve the connection's room/player and return early if the
/// client has not joined anywhere yet
macro_rules! require_session {
    ($session:expr) => {
        match (&$session.room_id, &$session.player_id) {
            (Some(room), Some(player)) => (room.clone(), player.clone()),
            _ => {
                return Some(ServerMessage::Error {
                    code: "NOT_IN_ROOM".to_string(),
                    msg: "Join a room first".to_string(),
                })
            }
        }
    };
}

/// Handle a client message and return the direct reply, if any
pub async fn handle_message(
    msg: ClientMessage,
    session: &mut Session,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::CreateRoom {
            name,
            avatar,
            room_name,
            visibility,
        } => {
            if session.room_id.is_some() {
                return Some(ServerMessage::Error {
                    code: "ALREADY_IN_ROOM".to_string(),
                    msg: "Leave your current room first".to_string(),
                });
            }
            match state.create_room(name, avatar, room_name, visibility).await {
                Ok((room, player_id)) => {
                    session.room_id = Some(room.room_code.clone());
                    session.player_id = Some(player_id.clone());
                    Some(ServerMessage::Welcome {
                        protocol: "1.0".to_string(),
                        player_id: player_id.clone(),
                        room: RoomView::for_player(&room, &player_id, Utc::now()),
                    })
                }
                Err(rejection) => Some(ServerMessage::rejection(&rejection)),
            }
        }

        ClientMessage::JoinRoom {
            room_code,
            name,
            avatar,
            player_id,
        } => {
            if session.room_id.is_some() {
                return Some(ServerMessage::Error {
                    code: "ALREADY_IN_ROOM".to_string(),
                    msg: "Leave your current room first".to_string(),
                });
            }
            match state.join_room(&room_code, name, avatar, player_id).await {
                Ok((room, player_id)) => {
                    session.room_id = Some(room.room_code.clone());
                    session.player_id = Some(player_id.clone());
                    Some(ServerMessage::Welcome {
                        protocol: "1.0".to_string(),
                        player_id: player_id.clone(),
                        room: RoomView::for_player(&room, &player_id, Utc::now()),
                    })
                }
                Err(rejection) => Some(ServerMessage::rejection(&rejection)),
            }
        }

        ClientMessage::LeaveRoom => {
            let (room, player) = require_session!(session);
            state.leave_room(&room, &player).await;
            session.room_id = None;
            session.player_id = None;
            Some(ServerMessage::Left)
        }

        ClientMessage::SetProfile { name, avatar } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                let p = s.players.get_mut(&player).ok_or(Rejection::UnknownPlayer)?;
                if let Some(name) = name {
                    let name = name.trim().to_string();
                    if !name.is_empty() {
                        p.name = name;
                    }
                }
                if let Some(avatar) = avatar {
                    p.avatar = Some(avatar);
                }
                Ok(())
            })
            .await
        }

        ClientMessage::StartGame => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.start_game(&player, Utc::now())
            })
            .await
        }

        ClientMessage::GiveClue { word, count } => {
            let (room, player) = require_session!(session);
            let filter = state.profanity.clone();
            apply(state, &room, player.clone(), move |s| {
                s.give_clue(&player, &word, count, &filter, Utc::now())
            })
            .await
        }

        ClientMessage::VoteCard { index } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.toggle_vote(&player, index)
            })
            .await
        }

        ClientMessage::ConfirmReveal { index } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.confirm_reveal(&player, index, Utc::now()).map(|_| ())
            })
            .await
        }

        ClientMessage::EndTurn => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.end_turn(&player, Utc::now())
            })
            .await
        }

        ClientMessage::PauseGame => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.pause_game(&player, Utc::now())
            })
            .await
        }

        ClientMessage::ResumeGame => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.resume_game(&player, Utc::now())
            })
            .await
        }

        ClientMessage::SetLobbyRole {
            team,
            role,
            target_player_id,
        } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.set_lobby_role(&player, target_player_id.as_deref(), team, role)
            })
            .await
        }

        ClientMessage::RandomizeTeams => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.randomize_teams(&player, &mut rand::rng())
            })
            .await
        }

        ClientMessage::KickPlayer { player_id } => {
            let (room, player) = require_session!(session);
            let ban = state.config.ban_duration;
            apply(state, &room, player.clone(), move |s| {
                s.kick_player(&player, &player_id, ban, Utc::now()).map(|_| ())
            })
            .await
        }

        ClientMessage::Rematch => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.rematch(&player, &mut rand::rng(), Utc::now())
            })
            .await
        }

        ClientMessage::SetRoomLocked { locked } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.set_locked(&player, locked)
            })
            .await
        }

        ClientMessage::SetWordPacks {
            packs,
            custom_words,
        } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.set_word_packs(&player, packs, custom_words, &mut rand::rng())
            })
            .await
        }

        ClientMessage::SetTimerPreset { preset } => {
            let (room, player) = require_session!(session);
            apply(state, &room, player.clone(), move |s| {
                s.set_timer_preset(&player, preset)
            })
            .await
        }
    }
}

/// Run one command through the room transaction and reply with either the
/// sender's fresh projection or the typed rejection
async fn apply(
    state: &Arc<AppState>,
    room_id: &str,
    player_id: String,
    f: impl FnOnce(&mut GameState) -> Result<(), Rejection>,
) -> Option<ServerMessage> {
    match state.update_room(room_id, f).await {
        Ok(()) => {
            let snapshot = state.get_room_state(room_id).await?;
            Some(ServerMessage::RoomState {
                room: RoomView::for_player(&snapshot, &player_id, Utc::now()),
            })
        }
        Err(rejection) => {
            tracing::debug!(
                "Rejected command in {} from {}: {}",
                room_id,
                player_id,
                rejection
            );
            Some(ServerMessage::rejection(&rejection))
        }
    }
}
