//! Vote-threshold resolution.
//!
//! Guessers vote per card; a card becomes confirmable once its vote set
//! reaches the threshold. Confirmation itself is a separate action handled
//! by the turn engine, so extra voters beyond the threshold are never
//! overridden by a single trigger-happy teammate.

use crate::types::*;

/// Votes needed to reveal a card: 1 for solo/empty teams, otherwise half
/// the guessers rounded up, capped at 3.
pub fn required_votes(guesser_count: usize) -> usize {
    if guesser_count <= 1 {
        1
    } else {
        guesser_count.div_ceil(2).min(3)
    }
}

impl GameState {
    /// Threshold for the active team right now
    pub fn required_votes(&self) -> usize {
        required_votes(self.connected_guessers(self.current_team))
    }

    pub fn votes_for(&self, index: usize) -> usize {
        self.votes.get(&index).map(|s| s.len()).unwrap_or(0)
    }

    pub fn has_voted(&self, index: usize, player_id: &str) -> bool {
        self.votes
            .get(&index)
            .map(|s| s.contains(player_id))
            .unwrap_or(false)
    }

    pub fn is_confirmable(&self, index: usize) -> bool {
        self.votes_for(index) >= self.required_votes()
    }

    /// Toggle a guesser's vote on a card. Idempotent per (card, voter):
    /// voting twice returns the state to where it was.
    pub fn toggle_vote(&mut self, player_id: &str, index: usize) -> Result<(), Rejection> {
        self.ensure_guessing(player_id)?;
        let card = self.board.get(index).ok_or(Rejection::CardOutOfRange)?;
        if card.revealed {
            return Err(Rejection::CardAlreadyRevealed);
        }

        let voters = self.votes.entry(index).or_default();
        if !voters.insert(player_id.to_string()) {
            voters.remove(player_id);
            if voters.is_empty() {
                self.votes.remove(&index);
            }
        }
        Ok(())
    }

    /// Drop one player's votes from every card (on kick/leave)
    pub fn clear_votes_by(&mut self, player_id: &str) {
        for voters in self.votes.values_mut() {
            voters.remove(player_id);
        }
        self.votes.retain(|_, voters| !voters.is_empty());
    }

    /// Common guard: the game is live, a clue is out, and `player_id` is a
    /// guesser on the active team
    pub(crate) fn ensure_guessing(&self, player_id: &str) -> Result<(), Rejection> {
        if !self.game_started {
            return Err(Rejection::GameNotStarted);
        }
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        if self.paused {
            return Err(Rejection::GamePaused);
        }
        if self.current_clue.is_none() {
            return Err(Rejection::NoClueGiven);
        }
        let player = self.player(player_id)?;
        if player.team != Some(self.current_team) || player.role != Some(PlayerRole::Guesser) {
            return Err(Rejection::NotGuesser);
        }
        Ok(())
    }
}
