//! Room lifecycle against the shared rooms map: creation with join codes,
//! join/reconnect, presence transitions, leaving and abandonment cleanup.

use super::{AppState, Room};
use crate::types::*;
use chrono::Utc;
use rand::Rng;

/// Safe character set for join codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 5;

fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Fall back to a generated friendly name for blank profiles
fn display_name(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| petname::petname(2, "-").unwrap_or_else(|| "player".to_string()))
}

impl AppState {
    /// Create a room with a fresh board and the caller as owner. Fails if
    /// the default word pool cannot fill a board.
    pub async fn create_room(
        &self,
        name: String,
        avatar: Option<String>,
        room_name: Option<String>,
        visibility: Option<Visibility>,
    ) -> Result<(GameState, PlayerId), Rejection> {
        let now = Utc::now();
        let mut rooms = self.rooms.write().await;

        // Collision check against live rooms (extremely rare with ~29^5 codes)
        let code = loop {
            let code = generate_room_code();
            if !rooms.contains_key(&code) {
                break code;
            }
        };

        let owner = Player::new(display_name(Some(name)), avatar, now);
        let owner_id = owner.id.clone();
        let room_name = room_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{}'s room", owner.name));

        let state = GameState::new_room(
            code.clone(),
            room_name,
            visibility.unwrap_or_default(),
            self.config.max_players,
            owner,
            vec!["standard".to_string()],
            Vec::new(),
            &mut rand::rng(),
            now,
        )?;

        tracing::info!("Room {} created by {}", code, owner_id);
        let snapshot = state.clone();
        rooms.insert(code, Room::new(state));
        Ok((snapshot, owner_id))
    }

    /// Join a room, or reclaim an existing seat on reconnect. Locked rooms
    /// accept reconnecting players but reject new joins; bans block new
    /// joins until they lapse.
    pub async fn join_room(
        &self,
        room_code: &str,
        name: Option<String>,
        avatar: Option<String>,
        rejoin: Option<PlayerId>,
    ) -> Result<(GameState, PlayerId), Rejection> {
        let now = Utc::now();
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_code).ok_or(Rejection::UnknownRoom)?;
        let mut next = room.state.clone();

        let known = rejoin
            .as_ref()
            .filter(|id| next.players.contains_key(*id))
            .cloned();
        let player_id = match known {
            Some(id) => {
                if let Some(player) = next.players.get_mut(&id) {
                    player.connected = true;
                    player.last_seen = now;
                }
                tracing::debug!("Player {} reconnected to {}", id, room_code);
                id
            }
            None => {
                if let Some(id) = rejoin.as_ref() {
                    next.check_ban(id, now)?;
                }
                if next.locked {
                    return Err(Rejection::RoomLocked);
                }
                if next.players.len() >= next.max_players {
                    return Err(Rejection::RoomFull);
                }
                let player = Player::new(display_name(name), avatar, now);
                let id = player.id.clone();
                next.players.insert(id.clone(), player);
                tracing::info!("Player {} joined {}", id, room_code);
                id
            }
        };

        // A returning clue giver may satisfy a pending resume precondition,
        // but resume itself stays an explicit command
        next.version = room.state.version + 1;
        room.state = next;
        let _ = room.notify.send(room.state.clone());
        Ok((room.state.clone(), player_id))
    }

    /// Presence signal from the transport: the socket dropped. May pause
    /// the game if the active team lost a required seat.
    pub async fn disconnect_player(&self, room_id: &str, player_id: &str) {
        let now = Utc::now();
        let result = self
            .update_room(room_id, |state| {
                if let Some(player) = state.players.get_mut(player_id) {
                    player.connected = false;
                    player.last_seen = now;
                }
                state.apply_presence_change(now);
                Ok(())
            })
            .await;

        match result {
            Ok(()) => tracing::debug!("Player {} disconnected from {}", player_id, room_id),
            Err(e) => tracing::debug!("Disconnect for dead room {}: {}", room_id, e),
        }
    }

    /// Explicitly leave the room. Ownership hands off to the lowest-sorted
    /// remaining id; the room dies with its last player. Returns true if
    /// the room was destroyed.
    pub async fn leave_room(&self, room_id: &str, player_id: &str) -> bool {
        let now = Utc::now();
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            return false;
        };

        let mut next = room.state.clone();
        if next.players.remove(player_id).is_none() {
            return false;
        }
        next.clear_votes_by(player_id);

        if next.players.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room {} closed (last player left)", room_id);
            return true;
        }

        if next.owner_id == player_id {
            if let Some(new_owner) = next.players.keys().min().cloned() {
                tracing::info!("Room {} ownership moved to {}", room_id, new_owner);
                next.owner_id = new_owner;
            }
        }
        next.apply_presence_change(now);

        next.version = room.state.version + 1;
        room.state = next;
        let _ = room.notify.send(room.state.clone());
        false
    }

    /// Drop rooms whose entire roster has been gone longer than the
    /// abandonment timeout. Returns how many were reaped.
    pub async fn reap_abandoned_rooms(&self) -> usize {
        let now = Utc::now();
        let cutoff = self.config.abandon_timeout;
        let mut rooms = self.rooms.write().await;
        let before = rooms.len();
        rooms.retain(|code, room| {
            let abandoned = room
                .state
                .players
                .values()
                .all(|p| !p.connected && now - p.last_seen > cutoff);
            if abandoned {
                tracing::info!("Reaping abandoned room {}", code);
            }
            !abandoned
        });
        before - rooms.len()
    }
}
