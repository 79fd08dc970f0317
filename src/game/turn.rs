//! The per-turn state machine: clue phase, guess phase, reveal resolution,
//! turn end, win/loss detection and rematch.

use crate::game::{board, clue};
use crate::moderation::ProfanityFilter;
use crate::types::*;
use chrono::{DateTime, Utc};
use rand::Rng;

/// What a confirmed reveal did to the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Own card, guesses left: the team keeps revealing
    Continue,
    /// Neutral/opponent card or guesses exhausted: the other team is up
    TurnEnded,
    /// Trap hit or a team completed its set
    GameWon(Team),
}

impl GameState {
    fn ensure_running(&self) -> Result<(), Rejection> {
        if !self.game_started {
            return Err(Rejection::GameNotStarted);
        }
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        if self.paused {
            return Err(Rejection::GamePaused);
        }
        Ok(())
    }

    /// Lobby -> Clue. Owner-only; teams must be ready.
    pub fn start_game(&mut self, actor: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if self.game_started {
            return Err(Rejection::GameAlreadyStarted);
        }
        self.teams_are_ready()?;

        self.game_started = true;
        self.current_team = self.starting_team;
        self.current_clue = None;
        self.remaining_guesses = None;
        self.votes.clear();
        self.turn_start_time = Some(now);
        Ok(())
    }

    /// Clue -> Guess. Active team's clue giver submits (word, count);
    /// the team always gets one bonus guess beyond the stated count.
    pub fn give_clue(
        &mut self,
        actor: &str,
        word: &str,
        count: u32,
        filter: &ProfanityFilter,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        self.ensure_running()?;
        if self.current_clue.is_some() {
            return Err(Rejection::ClueAlreadyGiven);
        }
        let player = self.player(actor)?;
        if player.role != Some(PlayerRole::ClueGiver) {
            return Err(Rejection::NotClueGiver);
        }
        if player.team != Some(self.current_team) {
            return Err(Rejection::NotYourTurn);
        }
        if count < 1 {
            return Err(Rejection::InvalidClueCount);
        }
        let word = clue::validate_clue(word, &self.board, filter)?;

        self.current_clue = Some(Clue { word, count });
        self.remaining_guesses = Some(count + 1);
        match self.current_team {
            Team::Red => self.red_has_given_clue = true,
            Team::Blue => self.blue_has_given_clue = true,
        }
        self.turn_start_time = Some(now);
        self.paused_remaining_secs = None;
        Ok(())
    }

    /// Resolve a confirmed reveal. The confirming guesser must have voted
    /// and the card's vote set must have reached the threshold.
    pub fn confirm_reveal(
        &mut self,
        actor: &str,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<RevealOutcome, Rejection> {
        self.ensure_guessing(actor)?;
        let card = self.board.get(index).ok_or(Rejection::CardOutOfRange)?;
        if card.revealed {
            // Stale confirm after the card already flipped: no-op rejection
            return Err(Rejection::CardAlreadyRevealed);
        }
        if !self.has_voted(index, actor) {
            return Err(Rejection::HaveNotVoted);
        }
        if !self.is_confirmable(index) {
            return Err(Rejection::BelowVoteThreshold);
        }

        let card_team = card.team;
        self.board[index].revealed = true;
        self.board[index].revealed_by = Some(actor.to_string());
        // Only the confirmed card's votes clear here; the rest survive the
        // ongoing guess phase
        self.votes.remove(&index);

        let active = self.current_team;
        let outcome = match card_team {
            CardTeam::Trap => {
                let winner = active.other();
                self.finish_game(winner);
                RevealOutcome::GameWon(winner)
            }
            team if team == CardTeam::from(active) => {
                if self.hidden_cards(active) == 0 {
                    self.finish_game(active);
                    RevealOutcome::GameWon(active)
                } else {
                    if let Some(g) = self.remaining_guesses.as_mut() {
                        *g = g.saturating_sub(1);
                    }
                    if self.remaining_guesses == Some(0) {
                        self.pass_turn(now);
                        RevealOutcome::TurnEnded
                    } else {
                        RevealOutcome::Continue
                    }
                }
            }
            CardTeam::Neutral => {
                self.pass_turn(now);
                RevealOutcome::TurnEnded
            }
            _ => {
                // Opponent card: their set may have just been completed for them
                let opponent = active.other();
                if self.hidden_cards(opponent) == 0 {
                    self.finish_game(opponent);
                    RevealOutcome::GameWon(opponent)
                } else {
                    self.pass_turn(now);
                    RevealOutcome::TurnEnded
                }
            }
        };
        Ok(outcome)
    }

    /// Voluntary end of turn by an active-team guesser during Guess
    pub fn end_turn(&mut self, actor: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        self.ensure_guessing(actor)?;
        self.pass_turn(now);
        Ok(())
    }

    /// The elected timeout trigger fires the same transition as a manual
    /// end turn, from either Clue or Guess
    pub fn timeout_end_turn(&mut self, now: DateTime<Utc>) -> Result<(), Rejection> {
        self.ensure_running()?;
        self.pass_turn(now);
        Ok(())
    }

    pub(crate) fn pass_turn(&mut self, now: DateTime<Utc>) {
        self.current_team = self.current_team.other();
        self.current_clue = None;
        self.remaining_guesses = None;
        self.votes.clear();
        self.turn_start_time = Some(now);
        self.paused_remaining_secs = None;
    }

    fn finish_game(&mut self, winner: Team) {
        self.game_over = true;
        self.winner = Some(winner);
        self.current_clue = None;
        self.remaining_guesses = None;
        self.votes.clear();
        self.turn_start_time = None;
        self.paused_remaining_secs = None;
        self.paused = false;
        self.pause_reason = None;
        self.paused_for_team = None;
    }

    /// GameOver -> Clue with a fresh board. Owner-only. Roles and roster
    /// survive; the starting team alternates; history clears.
    pub fn rematch(
        &mut self,
        actor: &str,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if !self.game_over {
            return Err(Rejection::GameNotOver);
        }

        let starting_team = self.starting_team.other();
        // Board generation can fail (pool shrunk below 25); reject without
        // touching the finished game
        let new_board =
            board::generate_board(&self.word_packs, &self.custom_words, starting_team, rng)?;

        self.board = new_board;
        self.starting_team = starting_team;
        self.current_team = starting_team;
        self.current_clue = None;
        self.remaining_guesses = None;
        self.votes.clear();
        self.red_has_given_clue = false;
        self.blue_has_given_clue = false;
        self.game_over = false;
        self.winner = None;
        self.game_started = true;
        self.paused = false;
        self.pause_reason = None;
        self.paused_for_team = None;
        self.paused_remaining_secs = None;
        self.turn_start_time = Some(now);
        Ok(())
    }
}
