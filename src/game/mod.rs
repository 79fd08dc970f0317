//! The game-session core: pure `(state, command) -> Result` mutations over
//! the [`GameState`](crate::types::GameState) aggregate. Nothing in here
//! touches the transport or the rooms map; `crate::state` applies these
//! functions inside its write transaction.

pub mod board;
pub mod clue;
pub mod pause;
pub mod roster;
pub mod timer;
pub mod turn;
pub mod vote;

use crate::types::*;
use chrono::{DateTime, Utc};
use rand::Rng;

impl GameState {
    /// Create the session for a new room. The board is generated up front;
    /// a too-small word pool fails room creation, never pads.
    #[allow(clippy::too_many_arguments)]
    pub fn new_room(
        room_code: RoomId,
        room_name: String,
        visibility: Visibility,
        max_players: usize,
        owner: Player,
        word_packs: Vec<WordPackId>,
        custom_words: Vec<String>,
        rng: &mut impl Rng,
        now: DateTime<Utc>,
    ) -> Result<Self, Rejection> {
        let starting_team = if rng.random_bool(0.5) {
            Team::Red
        } else {
            Team::Blue
        };
        let custom_words = board::normalize_custom_words(&custom_words)?;
        let board = board::generate_board(&word_packs, &custom_words, starting_team, rng)?;

        let mut players = std::collections::HashMap::new();
        let owner_id = owner.id.clone();
        players.insert(owner_id.clone(), owner);

        Ok(Self {
            version: 1,
            room_code,
            room_name,
            visibility,
            max_players,
            locked: false,
            owner_id,
            players,
            banned_players: std::collections::HashMap::new(),
            board,
            word_packs,
            custom_words,
            starting_team,
            current_team: starting_team,
            current_clue: None,
            remaining_guesses: None,
            votes: std::collections::HashMap::new(),
            turn_start_time: None,
            timer_preset: TimerPreset::default(),
            paused_remaining_secs: None,
            red_has_given_clue: false,
            blue_has_given_clue: false,
            game_started: false,
            game_over: false,
            winner: None,
            paused: false,
            pause_reason: None,
            paused_for_team: None,
            created_at: now,
        })
    }
}
