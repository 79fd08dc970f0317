pub mod export;
mod room;

use crate::config::ServerConfig;
use crate::moderation::ProfanityFilter;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// One live room: the replicated session plus its change-notification
/// channel. The channel is runtime-only and never serialized.
pub struct Room {
    pub state: GameState,
    pub notify: broadcast::Sender<GameState>,
}

impl Room {
    pub fn new(state: GameState) -> Self {
        let (notify, _rx) = broadcast::channel(64);
        Self { state, notify }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomId, Room>>>,
    pub config: ServerConfig,
    pub profanity: ProfanityFilter,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default(), ProfanityFilter::default())
    }

    pub fn with_config(config: ServerConfig, profanity: ProfanityFilter) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            config,
            profanity,
        }
    }

    /// Snapshot of one room's session
    pub async fn get_room_state(&self, room_id: &str) -> Option<GameState> {
        self.rooms.read().await.get(room_id).map(|r| r.state.clone())
    }

    /// Subscribe to a room's change notifications
    pub async fn subscribe(&self, room_id: &str) -> Option<broadcast::Receiver<GameState>> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .map(|r| r.notify.subscribe())
    }

    /// The atomic validate-then-write transaction every command goes
    /// through. The mutation runs against a copy of the latest state; a
    /// rejection leaves the shared state untouched, an accepted command
    /// bumps the version and notifies all subscribers.
    pub async fn update_room<T>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut GameState) -> Result<T, Rejection>,
    ) -> Result<T, Rejection> {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(room_id).ok_or(Rejection::UnknownRoom)?;

        let mut next = room.state.clone();
        let result = f(&mut next)?;
        next.version = room.state.version + 1;
        room.state = next;
        // No subscribers is fine (everyone may be mid-reconnect)
        let _ = room.notify.send(room.state.clone());
        Ok(result)
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.read().await.keys().cloned().collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_room_seats_the_owner() {
        let state = AppState::new();
        let (room, owner_id) = state
            .create_room("alice".to_string(), None, None, None)
            .await
            .unwrap();

        assert_eq!(room.players.len(), 1);
        assert_eq!(room.owner_id, owner_id);
        assert_eq!(room.board.len(), 25);
        assert!(!room.game_started);
        assert!(state.get_room_state(&room.room_code).await.is_some());
    }

    #[tokio::test]
    async fn test_update_room_bumps_version_and_notifies() {
        let state = AppState::new();
        let (room, owner_id) = state
            .create_room("alice".to_string(), None, None, None)
            .await
            .unwrap();
        let mut rx = state.subscribe(&room.room_code).await.unwrap();

        let before = room.version;
        state
            .update_room(&room.room_code, |s| s.set_locked(&owner_id, true))
            .await
            .unwrap();

        let seen = rx.recv().await.unwrap();
        assert_eq!(seen.version, before + 1);
        assert!(seen.locked);
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_state_untouched() {
        let state = AppState::new();
        let (room, _owner_id) = state
            .create_room("alice".to_string(), None, None, None)
            .await
            .unwrap();

        let result = state
            .update_room(&room.room_code, |s| {
                // Mutate, then fail: the dirty copy must be discarded
                s.locked = true;
                Err::<(), _>(Rejection::NotOwner)
            })
            .await;
        assert_eq!(result, Err(Rejection::NotOwner));

        let after = state.get_room_state(&room.room_code).await.unwrap();
        assert!(!after.locked);
        assert_eq!(after.version, room.version);
    }

    #[tokio::test]
    async fn test_update_unknown_room_is_rejected() {
        let state = AppState::new();
        let result = state
            .update_room("NOPE", |s| {
                s.locked = true;
                Ok(())
            })
            .await;
        assert_eq!(result, Err(Rejection::UnknownRoom));
    }

    #[tokio::test]
    async fn test_disconnect_marks_presence_and_last_seen() {
        let state = AppState::new();
        let (room, owner_id) = state
            .create_room("alice".to_string(), None, None, None)
            .await
            .unwrap();

        state.disconnect_player(&room.room_code, &owner_id).await;
        let after = state.get_room_state(&room.room_code).await.unwrap();
        let owner = &after.players[&owner_id];
        assert!(!owner.connected);
        assert!(owner.last_seen <= Utc::now());
    }
}
