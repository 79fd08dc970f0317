use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Commands any client may propose against the shared session. Validation
/// happens against latest state inside the room transaction; the sender
/// gets either the accepted new state (via broadcast) or a typed rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom {
        name: String,
        avatar: Option<String>,
        room_name: Option<String>,
        visibility: Option<Visibility>,
    },
    JoinRoom {
        room_code: RoomId,
        name: Option<String>,
        avatar: Option<String>,
        /// Set on reconnect to reclaim an existing seat
        player_id: Option<PlayerId>,
    },
    LeaveRoom,
    SetProfile {
        name: Option<String>,
        avatar: Option<String>,
    },
    StartGame,
    GiveClue {
        word: String,
        count: u32,
    },
    VoteCard {
        index: usize,
    },
    ConfirmReveal {
        index: usize,
    },
    EndTurn,
    PauseGame,
    ResumeGame,
    SetLobbyRole {
        team: Option<Team>,
        role: PlayerRole,
        target_player_id: Option<PlayerId>,
    },
    RandomizeTeams,
    KickPlayer {
        player_id: PlayerId,
    },
    Rematch,
    SetRoomLocked {
        locked: bool,
    },
    SetWordPacks {
        packs: Vec<WordPackId>,
        custom_words: Vec<String>,
    },
    SetTimerPreset {
        preset: TimerPreset,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message after a successful create/join/reconnect
    Welcome {
        protocol: String,
        player_id: PlayerId,
        room: RoomView,
    },
    /// Broadcast on every accepted mutation, projected per viewer
    RoomState {
        room: RoomView,
    },
    /// The viewer was removed from the room
    Kicked {
        banned_until: Option<DateTime<Utc>>,
    },
    Left,
    Error {
        code: String,
        msg: String,
    },
}

impl ServerMessage {
    pub fn rejection(rejection: &Rejection) -> Self {
        ServerMessage::Error {
            code: rejection.code().to_string(),
            msg: rejection.to_string(),
        }
    }
}

/// A card as one viewer is allowed to see it: the hidden team assignment is
/// only serialized for clue givers, revealed cards, or a finished game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardView {
    pub word: String,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_by: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<CardTeam>,
}

/// Capabilities of the local player, derived purely from GameState plus
/// their id, so the UI never re-implements game rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedView {
    pub is_my_turn: bool,
    pub can_give_clue: bool,
    pub can_vote: bool,
    pub required_votes: usize,
    pub is_timeout_owner: bool,
    /// Which team's side of the screen glows, if any
    pub glow: Option<Team>,
}

/// The full read model for one client. Everything a UI needs to render the
/// session, with hidden information already stripped for this viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomView {
    pub version: u64,
    pub room_code: RoomId,
    pub room_name: String,
    pub visibility: Visibility,
    pub max_players: usize,
    pub locked: bool,
    pub owner_id: PlayerId,
    pub players: HashMap<PlayerId, Player>,
    pub board: Vec<CardView>,
    pub votes: HashMap<usize, BTreeSet<PlayerId>>,
    pub word_packs: Vec<WordPackId>,
    pub custom_words: Vec<String>,
    pub phase: GamePhase,
    pub starting_team: Team,
    pub current_team: Team,
    pub current_clue: Option<Clue>,
    pub remaining_guesses: Option<u32>,
    pub timer_preset: TimerPreset,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<Team>,
    pub paused: bool,
    pub pause_reason: Option<PauseReason>,
    pub paused_for_team: Option<Team>,
    pub server_now: DateTime<Utc>,
    pub phase_ends_at: Option<DateTime<Utc>>,
    pub remaining_secs: Option<u32>,
    pub derived: DerivedView,
}

impl RoomView {
    /// Project the shared state for one viewer. `viewer` may be unknown to
    /// the roster (spectating before a seat, or just kicked); they get the
    /// spectator projection.
    pub fn for_player(state: &GameState, viewer: &str, now: DateTime<Utc>) -> Self {
        let player = state.players.get(viewer);
        let is_clue_giver = player.map(|p| p.role == Some(PlayerRole::ClueGiver)).unwrap_or(false);
        let see_teams = is_clue_giver || state.game_over;

        let board = state
            .board
            .iter()
            .map(|card| CardView {
                word: card.word.clone(),
                revealed: card.revealed,
                revealed_by: card.revealed_by.clone(),
                team: if see_teams || card.revealed {
                    Some(card.team)
                } else {
                    None
                },
            })
            .collect();

        let playing = state.game_started && !state.game_over && !state.paused;
        let on_active_team = player.map(|p| p.team == Some(state.current_team)).unwrap_or(false);
        let derived = DerivedView {
            is_my_turn: playing && on_active_team,
            can_give_clue: playing
                && state.current_clue.is_none()
                && on_active_team
                && is_clue_giver,
            can_vote: state.ensure_guessing(viewer).is_ok(),
            required_votes: state.required_votes(),
            is_timeout_owner: state.timeout_owner().map(String::as_str) == Some(viewer),
            glow: playing.then_some(state.current_team),
        };

        Self {
            version: state.version,
            room_code: state.room_code.clone(),
            room_name: state.room_name.clone(),
            visibility: state.visibility,
            max_players: state.max_players,
            locked: state.locked,
            owner_id: state.owner_id.clone(),
            players: state.players.clone(),
            board,
            votes: state.votes.clone(),
            word_packs: state.word_packs.clone(),
            custom_words: state.custom_words.clone(),
            phase: state.phase(),
            starting_team: state.starting_team,
            current_team: state.current_team,
            current_clue: state.current_clue.clone(),
            remaining_guesses: state.remaining_guesses,
            timer_preset: state.timer_preset,
            game_started: state.game_started,
            game_over: state.game_over,
            winner: state.winner,
            paused: state.paused,
            pause_reason: state.pause_reason,
            paused_for_team: state.paused_for_team,
            server_now: now,
            phase_ends_at: state.phase_ends_at(),
            remaining_secs: state.remaining_secs(now),
            derived,
        }
    }
}
