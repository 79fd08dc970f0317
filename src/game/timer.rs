//! Phase timers and single-owner timeout triggering.
//!
//! Remaining time is always recomputed from `turn_start_time`, never
//! ticked. Because every connected client observes the same expiry, the
//! timeout action belongs to exactly one elected trigger owner; the
//! [`TimeoutLedger`] guarantees at most one fire per `turn_start_time`.

use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

impl TimerPreset {
    pub fn clue_secs(self) -> u32 {
        match self {
            TimerPreset::Fast => 45,
            TimerPreset::Normal => 75,
            TimerPreset::Relaxed => 120,
        }
    }

    pub fn guess_secs(self) -> u32 {
        match self {
            TimerPreset::Fast => 60,
            TimerPreset::Normal => 105,
            TimerPreset::Relaxed => 180,
        }
    }

    /// Extra clue time for a team's first clue of the game
    pub fn first_clue_bonus_secs(self) -> u32 {
        match self {
            TimerPreset::Fast => 15,
            TimerPreset::Normal => 30,
            TimerPreset::Relaxed => 45,
        }
    }
}

impl GameState {
    /// Budget for the current phase. After a resume the frozen remainder
    /// from the pause replaces the preset lookup until the phase changes.
    pub fn phase_duration_secs(&self) -> Option<u32> {
        if !self.game_started || self.game_over {
            return None;
        }
        if let Some(frozen) = self.paused_remaining_secs {
            return Some(frozen);
        }
        Some(match self.phase() {
            GamePhase::Guess => self.timer_preset.guess_secs(),
            _ => {
                let base = self.timer_preset.clue_secs();
                if self.team_has_given_clue(self.current_team) {
                    base
                } else {
                    base + self.timer_preset.first_clue_bonus_secs()
                }
            }
        })
    }

    /// Seconds left in the current phase, floored at 0. Frozen while
    /// paused.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u32> {
        if self.paused {
            return self.paused_remaining_secs;
        }
        let duration = self.phase_duration_secs()?;
        let start = self.turn_start_time?;
        let elapsed = (now - start).num_seconds().max(0) as u32;
        Some(duration.saturating_sub(elapsed))
    }

    /// When the current phase times out, for client countdown rendering
    pub fn phase_ends_at(&self) -> Option<DateTime<Utc>> {
        if self.paused {
            return None;
        }
        let duration = self.phase_duration_secs()?;
        let start = self.turn_start_time?;
        Some(start + chrono::Duration::seconds(duration as i64))
    }

    /// The one client allowed to fire the timeout: the room owner while
    /// connected, otherwise the lowest-sorted connected player id
    pub fn timeout_owner(&self) -> Option<&PlayerId> {
        if let Some(owner) = self.players.get(&self.owner_id) {
            if owner.connected {
                return Some(&owner.id);
            }
        }
        self.players
            .values()
            .filter(|p| p.connected)
            .map(|p| &p.id)
            .min()
    }
}

/// Tracks which `turn_start_time` values have already fired, per room.
/// Kept by the trigger owner locally; never part of the shared state.
#[derive(Debug, Default)]
pub struct TimeoutLedger {
    fired: HashMap<RoomId, DateTime<Utc>>,
}

impl TimeoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per (room, turn_start_time)
    pub fn should_fire(&mut self, room: &str, turn_start: DateTime<Utc>) -> bool {
        if self.fired.get(room) == Some(&turn_start) {
            return false;
        }
        self.fired.insert(room.to_string(), turn_start);
        true
    }

    /// Drop entries for rooms that no longer exist
    pub fn retain_rooms(&mut self, live: &[RoomId]) {
        self.fired.retain(|room, _| live.contains(room));
    }
}
