//! Board generation: 25 unique words from the combined packs, team labels
//! shuffled over a fixed multiset.

use crate::types::*;
use crate::words;
use rand::seq::SliceRandom;
use rand::Rng;

pub const BOARD_SIZE: usize = 25;
pub const STARTING_TEAM_CARDS: usize = 9;
pub const OTHER_TEAM_CARDS: usize = 8;
pub const NEUTRAL_CARDS: usize = 7;
pub const MAX_CUSTOM_WORDS: usize = 10;

/// Uppercase, dedupe and bound the room owner's custom words
pub fn normalize_custom_words(raw: &[String]) -> Result<Vec<String>, Rejection> {
    let mut seen = std::collections::HashSet::new();
    let mut words = Vec::new();
    for w in raw {
        let w = w.trim().to_uppercase();
        if w.is_empty() || w.contains(char::is_whitespace) {
            continue;
        }
        if seen.insert(w.clone()) {
            words.push(w);
        }
    }
    if words.len() > MAX_CUSTOM_WORDS {
        return Err(Rejection::TooManyCustomWords {
            max: MAX_CUSTOM_WORDS,
        });
    }
    Ok(words)
}

/// Combined pool of the selected packs plus custom words, deduplicated
/// case-insensitively. Unknown pack ids are rejected.
fn build_pool(packs: &[WordPackId], custom_words: &[String]) -> Result<Vec<String>, Rejection> {
    let mut seen = std::collections::HashSet::new();
    let mut pool = Vec::new();

    for id in packs {
        let words = words::pack_words(id).ok_or_else(|| Rejection::UnknownWordPack(id.clone()))?;
        for w in words {
            if seen.insert(w.to_string()) {
                pool.push(w.to_string());
            }
        }
    }
    for w in custom_words {
        if seen.insert(w.clone()) {
            pool.push(w.clone());
        }
    }
    Ok(pool)
}

/// Build a fresh 25-card board. Fails if the pool cannot fill it; the
/// caller surfaces that at room creation / rematch, it never blocks silently.
pub fn generate_board(
    packs: &[WordPackId],
    custom_words: &[String],
    starting_team: Team,
    rng: &mut impl Rng,
) -> Result<Vec<Card>, Rejection> {
    let mut pool = build_pool(packs, custom_words)?;
    if pool.len() < BOARD_SIZE {
        return Err(Rejection::WordPoolTooSmall {
            have: pool.len(),
            need: BOARD_SIZE,
        });
    }

    pool.shuffle(rng);

    // Teams are shuffled independently of the words
    let mut teams = Vec::with_capacity(BOARD_SIZE);
    teams.resize(STARTING_TEAM_CARDS, CardTeam::from(starting_team));
    teams.resize(
        STARTING_TEAM_CARDS + OTHER_TEAM_CARDS,
        CardTeam::from(starting_team.other()),
    );
    teams.resize(BOARD_SIZE - 1, CardTeam::Neutral);
    teams.push(CardTeam::Trap);
    teams.shuffle(rng);

    Ok(pool
        .drain(..BOARD_SIZE)
        .zip(teams)
        .map(|(word, team)| Card::new(word, team))
        .collect())
}
