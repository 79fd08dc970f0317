use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type RoomId = String;
pub type WordPackId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

/// Hidden assignment of a board card. `Trap` ends the game for the
/// revealing team; there is exactly one per board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardTeam {
    Red,
    Blue,
    Neutral,
    Trap,
}

impl From<Team> for CardTeam {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => CardTeam::Red,
            Team::Blue => CardTeam::Blue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub word: String,
    pub team: CardTeam,
    pub revealed: bool,
    pub revealed_by: Option<PlayerId>,
}

impl Card {
    pub fn new(word: String, team: CardTeam) -> Self {
        Self {
            word,
            team,
            revealed: false,
            revealed_by: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlayerRole {
    ClueGiver,
    Guesser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub team: Option<Team>,
    pub role: Option<PlayerRole>,
    pub connected: bool,
    pub last_seen: DateTime<Utc>,
}

impl Player {
    pub fn new(name: String, avatar: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name,
            avatar,
            team: None,
            role: None,
            connected: true,
            last_seen: now,
        }
    }

    /// Spectators have no team assigned
    pub fn is_spectator(&self) -> bool {
        self.team.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clue {
    pub word: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerPreset {
    Fast,
    #[default]
    Normal,
    Relaxed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PauseReason {
    ClueGiverDisconnected,
    NoGuessers,
    TeamDisconnected,
    OwnerPaused,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

/// Derived from GameState scalars, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    Clue,
    Guess,
    Paused,
    GameOver,
}

/// The aggregate root, one per room. Its serde form is the persistence and
/// wire contract other clients/tools must round-trip exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    /// Bumped on every accepted mutation
    pub version: u64,
    pub room_code: RoomId,
    pub room_name: String,
    pub visibility: Visibility,
    pub max_players: usize,
    pub locked: bool,
    pub owner_id: PlayerId,
    pub players: HashMap<PlayerId, Player>,
    /// player id -> ban expiry
    #[serde(default)]
    pub banned_players: HashMap<PlayerId, DateTime<Utc>>,
    pub board: Vec<Card>,
    pub word_packs: Vec<WordPackId>,
    #[serde(default)]
    pub custom_words: Vec<String>,
    pub starting_team: Team,
    pub current_team: Team,
    pub current_clue: Option<Clue>,
    pub remaining_guesses: Option<u32>,
    /// card index -> ids of guessers currently voting for it
    #[serde(default)]
    pub votes: HashMap<usize, BTreeSet<PlayerId>>,
    pub turn_start_time: Option<DateTime<Utc>>,
    pub timer_preset: TimerPreset,
    /// Frozen countdown, set on pause; becomes the phase budget after resume
    #[serde(default)]
    pub paused_remaining_secs: Option<u32>,
    pub red_has_given_clue: bool,
    pub blue_has_given_clue: bool,
    pub game_started: bool,
    pub game_over: bool,
    pub winner: Option<Team>,
    pub paused: bool,
    pub pause_reason: Option<PauseReason>,
    pub paused_for_team: Option<Team>,
    pub created_at: DateTime<Utc>,
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        if !self.game_started {
            GamePhase::Lobby
        } else if self.game_over {
            GamePhase::GameOver
        } else if self.paused {
            GamePhase::Paused
        } else if self.current_clue.is_some() {
            GamePhase::Guess
        } else {
            GamePhase::Clue
        }
    }

    pub fn player(&self, id: &str) -> Result<&Player, Rejection> {
        self.players.get(id).ok_or(Rejection::UnknownPlayer)
    }

    pub fn is_owner(&self, id: &str) -> bool {
        self.owner_id == id
    }

    /// Connected guessers of a team (the vote-threshold denominator)
    pub fn connected_guessers(&self, team: Team) -> usize {
        self.players
            .values()
            .filter(|p| p.connected && p.team == Some(team) && p.role == Some(PlayerRole::Guesser))
            .count()
    }

    pub fn clue_giver(&self, team: Team) -> Option<&Player> {
        self.players
            .values()
            .find(|p| p.team == Some(team) && p.role == Some(PlayerRole::ClueGiver))
    }

    pub fn team_has_given_clue(&self, team: Team) -> bool {
        match team {
            Team::Red => self.red_has_given_clue,
            Team::Blue => self.blue_has_given_clue,
        }
    }

    /// Unrevealed cards still owed to a team
    pub fn hidden_cards(&self, team: Team) -> usize {
        let card_team = CardTeam::from(team);
        self.board
            .iter()
            .filter(|c| c.team == card_team && !c.revealed)
            .count()
    }

    /// Seat changes are locked during active, unpaused gameplay
    pub fn reassignment_allowed(&self) -> bool {
        !self.game_started || self.game_over || self.paused
    }
}

/// Typed reason a clue is illegal, reported to the submitting client
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ClueRejection {
    #[error("Clue is empty")]
    Empty,
    #[error("Clue must be a single word")]
    NotOneWord,
    #[error("Clue exceeds the maximum length")]
    TooLong,
    #[error("Clue matches the board word {0}")]
    MatchesBoardWord(String),
    #[error("Clue is a singular/plural variant of the board word {0}")]
    PluralOfBoardWord(String),
    #[error("Clue is a derivation of the board word {0}")]
    DerivedFromBoardWord(String),
    #[error("Clue failed the profanity check")]
    Profane,
}

/// Every way a command can be rejected. State is unchanged on rejection and
/// the reason goes to the invoking client only.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Rejection {
    #[error("Room not found")]
    UnknownRoom,
    #[error("Player not found")]
    UnknownPlayer,
    #[error("Room is locked")]
    RoomLocked,
    #[error("Room is full")]
    RoomFull,
    #[error("You are banned from this room until {until}")]
    Banned { until: DateTime<Utc> },
    #[error("Only the room owner can do that")]
    NotOwner,
    #[error("The game has already started")]
    GameAlreadyStarted,
    #[error("The game has not started yet")]
    GameNotStarted,
    #[error("The game is over")]
    GameOver,
    #[error("The game is not over yet")]
    GameNotOver,
    #[error("The game is paused")]
    GamePaused,
    #[error("The game is not paused")]
    GameNotPaused,
    #[error("It is not your team's turn")]
    NotYourTurn,
    #[error("Only the active clue giver can give a clue")]
    NotClueGiver,
    #[error("Only a guesser on the active team can do that")]
    NotGuesser,
    #[error("A clue has already been given this turn")]
    ClueAlreadyGiven,
    #[error("No clue has been given yet")]
    NoClueGiven,
    #[error("Clue count must be at least 1")]
    InvalidClueCount,
    #[error(transparent)]
    Clue(#[from] ClueRejection),
    #[error("Card index out of range")]
    CardOutOfRange,
    #[error("That card is already revealed")]
    CardAlreadyRevealed,
    #[error("Not enough votes to reveal that card")]
    BelowVoteThreshold,
    #[error("You must vote for a card before confirming it")]
    HaveNotVoted,
    #[error("Superseded by a newer state")]
    Superseded,
    #[error("Teams are not ready: {0}")]
    TeamsNotReady(String),
    #[error("That team already has a clue giver")]
    ClueGiverSeatTaken,
    #[error("Teams and roles are locked during play")]
    ReassignmentLocked,
    #[error("The paused team needs a connected clue giver and guesser first")]
    CannotResume,
    #[error("Word pool has only {have} words, need {need}")]
    WordPoolTooSmall { have: usize, need: usize },
    #[error("Unknown word pack {0}")]
    UnknownWordPack(WordPackId),
    #[error("At most {max} custom words are allowed")]
    TooManyCustomWords { max: usize },
}

impl Rejection {
    /// Stable wire code carried in error messages
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::UnknownRoom => "UNKNOWN_ROOM",
            Rejection::UnknownPlayer => "UNKNOWN_PLAYER",
            Rejection::RoomLocked => "ROOM_LOCKED",
            Rejection::RoomFull => "ROOM_FULL",
            Rejection::Banned { .. } => "BANNED",
            Rejection::NotOwner => "NOT_OWNER",
            Rejection::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Rejection::GameNotStarted => "GAME_NOT_STARTED",
            Rejection::GameOver => "GAME_OVER",
            Rejection::GameNotOver => "GAME_NOT_OVER",
            Rejection::GamePaused => "GAME_PAUSED",
            Rejection::GameNotPaused => "GAME_NOT_PAUSED",
            Rejection::NotYourTurn => "NOT_YOUR_TURN",
            Rejection::NotClueGiver => "NOT_CLUE_GIVER",
            Rejection::NotGuesser => "NOT_GUESSER",
            Rejection::ClueAlreadyGiven => "CLUE_ALREADY_GIVEN",
            Rejection::NoClueGiven => "NO_CLUE_GIVEN",
            Rejection::InvalidClueCount => "INVALID_CLUE_COUNT",
            Rejection::Clue(ClueRejection::Empty) => "CLUE_EMPTY",
            Rejection::Clue(ClueRejection::NotOneWord) => "CLUE_NOT_ONE_WORD",
            Rejection::Clue(ClueRejection::TooLong) => "CLUE_TOO_LONG",
            Rejection::Clue(ClueRejection::MatchesBoardWord(_)) => "CLUE_MATCHES_BOARD_WORD",
            Rejection::Clue(ClueRejection::PluralOfBoardWord(_)) => "CLUE_PLURAL_OF_BOARD_WORD",
            Rejection::Clue(ClueRejection::DerivedFromBoardWord(_)) => {
                "CLUE_DERIVED_FROM_BOARD_WORD"
            }
            Rejection::Clue(ClueRejection::Profane) => "CLUE_PROFANE",
            Rejection::CardOutOfRange => "CARD_OUT_OF_RANGE",
            Rejection::CardAlreadyRevealed => "CARD_ALREADY_REVEALED",
            Rejection::BelowVoteThreshold => "BELOW_VOTE_THRESHOLD",
            Rejection::HaveNotVoted => "HAVE_NOT_VOTED",
            Rejection::Superseded => "SUPERSEDED",
            Rejection::TeamsNotReady(_) => "TEAMS_NOT_READY",
            Rejection::ClueGiverSeatTaken => "CLUE_GIVER_SEAT_TAKEN",
            Rejection::ReassignmentLocked => "REASSIGNMENT_LOCKED",
            Rejection::CannotResume => "CANNOT_RESUME",
            Rejection::WordPoolTooSmall { .. } => "WORD_POOL_TOO_SMALL",
            Rejection::UnknownWordPack(_) => "UNKNOWN_WORD_PACK",
            Rejection::TooManyCustomWords { .. } => "TOO_MANY_CUSTOM_WORDS",
        }
    }
}
