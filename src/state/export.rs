//! State export/import for quick and dirty state restoration.
//!
//! Serializable snapshots of every live room, for backup and restoration
//! during live events. Broadcast channels are runtime-only and recreated on
//! import; subscribers of replaced rooms are cut over by the fresh
//! notification that follows.

use super::{AppState, Room};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema version for export format compatibility
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// A serializable snapshot of all rooms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsExport {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    /// Every room's session, keyed by join code
    pub rooms: HashMap<RoomId, GameState>,
}

impl AppState {
    pub async fn export_state(&self) -> RoomsExport {
        let rooms = self.rooms.read().await;
        RoomsExport {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            rooms: rooms
                .iter()
                .map(|(code, room)| (code.clone(), room.state.clone()))
                .collect(),
        }
    }

    /// Replace all rooms with the snapshot's contents. Returns the number
    /// of rooms restored.
    pub async fn import_state(&self, export: RoomsExport) -> Result<usize, String> {
        if export.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Unsupported schema version {} (expected {})",
                export.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        let mut rooms = self.rooms.write().await;
        rooms.clear();
        let count = export.rooms.len();
        for (code, state) in export.rooms {
            rooms.insert(code, Room::new(state));
        }
        tracing::info!("Imported {} rooms from snapshot", count);
        Ok(count)
    }
}
