//! Disconnect-driven pause and resume.
//!
//! Presence changes never reject; an under-staffed active team is a
//! first-class transition into `Paused`, during which seats unlock so a
//! replacement can take over. Resume is always explicit.

use crate::types::*;
use chrono::{DateTime, Utc};

impl GameState {
    /// Why the active team cannot play right now, if anything
    pub fn pause_reason_for_active_team(&self) -> Option<PauseReason> {
        let team = self.current_team;
        let members: Vec<&Player> = self
            .players
            .values()
            .filter(|p| p.team == Some(team))
            .collect();

        if members.iter().all(|p| !p.connected) {
            return Some(PauseReason::TeamDisconnected);
        }
        match self.clue_giver(team) {
            Some(giver) if giver.connected => {}
            _ => return Some(PauseReason::ClueGiverDisconnected),
        }
        if self.connected_guessers(team) == 0 {
            return Some(PauseReason::NoGuessers);
        }
        None
    }

    /// Re-examine staffing after a presence change and pause mid-game if
    /// the active team lost its clue giver, its guessers, or everyone.
    /// The countdown freezes at its current value.
    pub fn apply_presence_change(&mut self, now: DateTime<Utc>) {
        if !self.game_started || self.game_over || self.paused {
            return;
        }
        if let Some(reason) = self.pause_reason_for_active_team() {
            self.paused_remaining_secs = self.remaining_secs(now);
            self.paused = true;
            self.pause_reason = Some(reason);
            self.paused_for_team = Some(self.current_team);
        }
    }

    /// Owner-initiated pause
    pub fn pause_game(&mut self, actor: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if !self.game_started {
            return Err(Rejection::GameNotStarted);
        }
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        if self.paused {
            return Err(Rejection::GamePaused);
        }

        self.paused_remaining_secs = self.remaining_secs(now);
        self.paused = true;
        self.pause_reason = Some(PauseReason::OwnerPaused);
        self.paused_for_team = Some(self.current_team);
        Ok(())
    }

    /// Resume once the paused team is staffed again. The frozen remainder
    /// becomes the new phase budget, counted from `now`.
    pub fn resume_game(&mut self, actor: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        if !self.paused {
            return Err(Rejection::GameNotPaused);
        }
        self.player(actor)?;
        if self.pause_reason == Some(PauseReason::OwnerPaused) && !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }

        let team = self.paused_for_team.unwrap_or(self.current_team);
        let giver_connected = self
            .clue_giver(team)
            .map(|p| p.connected)
            .unwrap_or(false);
        if !giver_connected || self.connected_guessers(team) == 0 {
            return Err(Rejection::CannotResume);
        }

        self.paused = false;
        self.pause_reason = None;
        self.paused_for_team = None;
        self.turn_start_time = Some(now);
        // paused_remaining_secs stays set: it is the budget for the rest of
        // this phase and clears on the next phase change
        Ok(())
    }
}
