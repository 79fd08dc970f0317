//! Team formation and seat management: readiness checks, role assignment,
//! randomized teams, kick/ban bookkeeping.

use crate::types::*;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

pub const MIN_PLAYERS: usize = 4;

impl GameState {
    /// Ready to start: >=4 seated players, an even split, and exactly one
    /// clue giver per team
    pub fn teams_are_ready(&self) -> Result<(), Rejection> {
        let seated: Vec<&Player> = self.players.values().filter(|p| p.team.is_some()).collect();
        if seated.len() < MIN_PLAYERS {
            return Err(Rejection::TeamsNotReady(format!(
                "need at least {MIN_PLAYERS} players on teams"
            )));
        }

        let red = seated.iter().filter(|p| p.team == Some(Team::Red)).count();
        let blue = seated.len() - red;
        if red != blue {
            return Err(Rejection::TeamsNotReady(format!(
                "teams are uneven ({red}v{blue})"
            )));
        }

        for team in [Team::Red, Team::Blue] {
            let givers = seated
                .iter()
                .filter(|p| p.team == Some(team) && p.role == Some(PlayerRole::ClueGiver))
                .count();
            if givers != 1 {
                return Err(Rejection::TeamsNotReady(
                    "each team needs exactly one clue giver".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Seat a player (self-service, or any player by the owner) on a team
    /// and role; `team = None` clears both and makes them a spectator.
    /// Locked during active unpaused play so mid-game swaps only happen
    /// through the pause flow.
    pub fn set_lobby_role(
        &mut self,
        actor: &str,
        target: Option<&str>,
        team: Option<Team>,
        role: PlayerRole,
    ) -> Result<(), Rejection> {
        if !self.reassignment_allowed() {
            return Err(Rejection::ReassignmentLocked);
        }
        let target_id = match target {
            Some(id) if id != actor => {
                if !self.is_owner(actor) {
                    return Err(Rejection::NotOwner);
                }
                id.to_string()
            }
            _ => actor.to_string(),
        };
        self.player(&target_id)?;

        if let (Some(team), PlayerRole::ClueGiver) = (team, role) {
            if let Some(holder) = self.clue_giver(team) {
                if holder.id != target_id {
                    return Err(Rejection::ClueGiverSeatTaken);
                }
            }
        }

        let player = self
            .players
            .get_mut(&target_id)
            .ok_or(Rejection::UnknownPlayer)?;
        match team {
            Some(team) => {
                player.team = Some(team);
                player.role = Some(role);
            }
            None => {
                player.team = None;
                player.role = None;
            }
        }
        Ok(())
    }

    /// Owner-only: evenly split the whole roster into two teams with one
    /// clue giver each
    pub fn randomize_teams(&mut self, actor: &str, rng: &mut impl Rng) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if !self.reassignment_allowed() {
            return Err(Rejection::ReassignmentLocked);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(Rejection::TeamsNotReady(format!(
                "need at least {MIN_PLAYERS} players to randomize"
            )));
        }

        let mut ids: Vec<PlayerId> = self.players.keys().cloned().collect();
        ids.sort();
        ids.shuffle(rng);

        let half = ids.len() / 2;
        for (i, id) in ids.iter().enumerate() {
            let (team, first_of_team) = if i < half {
                (Team::Red, i == 0)
            } else {
                (Team::Blue, i == half)
            };
            if let Some(player) = self.players.get_mut(id) {
                player.team = Some(team);
                player.role = Some(if first_of_team {
                    PlayerRole::ClueGiver
                } else {
                    PlayerRole::Guesser
                });
            }
        }
        Ok(())
    }

    /// Owner-only: remove a player and ban them for `ban_duration`. Their
    /// votes are dropped so stale sets cannot satisfy a threshold.
    pub fn kick_player(
        &mut self,
        actor: &str,
        target: &str,
        ban_duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Player, Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if actor == target {
            return Err(Rejection::UnknownPlayer);
        }
        let player = self
            .players
            .remove(target)
            .ok_or(Rejection::UnknownPlayer)?;

        self.banned_players
            .insert(target.to_string(), now + ban_duration);
        self.clear_votes_by(target);
        // Kicking an active-team seat can leave it unstaffed mid-game
        self.apply_presence_change(now);
        Ok(player)
    }

    /// Owner-only: a locked room rejects new joins, reconnects still work
    pub fn set_locked(&mut self, actor: &str, locked: bool) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        self.locked = locked;
        Ok(())
    }

    /// Owner-only; takes effect from the next phase start
    pub fn set_timer_preset(&mut self, actor: &str, preset: TimerPreset) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if !self.reassignment_allowed() {
            return Err(Rejection::ReassignmentLocked);
        }
        self.timer_preset = preset;
        Ok(())
    }

    /// Owner-only, outside active play. In the lobby the board regenerates
    /// immediately; after game over the new selection applies at rematch.
    /// A pool that cannot fill a board rejects without touching anything.
    pub fn set_word_packs(
        &mut self,
        actor: &str,
        packs: Vec<WordPackId>,
        custom_words: Vec<String>,
        rng: &mut impl Rng,
    ) -> Result<(), Rejection> {
        if !self.is_owner(actor) {
            return Err(Rejection::NotOwner);
        }
        if self.game_started && !self.game_over {
            return Err(Rejection::ReassignmentLocked);
        }

        let custom_words = crate::game::board::normalize_custom_words(&custom_words)?;
        if !self.game_started {
            self.board = crate::game::board::generate_board(
                &packs,
                &custom_words,
                self.starting_team,
                rng,
            )?;
        } else {
            // Game over: validate now so the owner hears about a bad pool
            // before anyone hits rematch
            crate::game::board::generate_board(&packs, &custom_words, self.starting_team, rng)?;
        }
        self.word_packs = packs;
        self.custom_words = custom_words;
        Ok(())
    }

    /// A ban only blocks joins while its expiry is in the future; expired
    /// entries are pruned on sight
    pub fn check_ban(&mut self, player_id: &str, now: DateTime<Utc>) -> Result<(), Rejection> {
        match self.banned_players.get(player_id) {
            Some(&until) if until > now => Err(Rejection::Banned { until }),
            Some(_) => {
                self.banned_players.remove(player_id);
                Ok(())
            }
            None => Ok(()),
        }
    }
}
