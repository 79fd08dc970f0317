//! Clue legality rules.
//!
//! A clue is checked case-insensitively against every board word, revealed
//! or not. Rejections are typed for UI display; the clue is never silently
//! rewritten into something legal.

use crate::moderation::ProfanityFilter;
use crate::types::*;

pub const MAX_CLUE_LEN: usize = 20;

/// Validate a candidate clue against the board. Returns the normalized
/// (trimmed, uppercased) clue on success.
pub fn validate_clue(
    raw: &str,
    board: &[Card],
    filter: &ProfanityFilter,
) -> Result<String, ClueRejection> {
    let clue = raw.trim().to_uppercase();

    if clue.is_empty() {
        return Err(ClueRejection::Empty);
    }
    if clue.contains(char::is_whitespace) {
        return Err(ClueRejection::NotOneWord);
    }
    if clue.chars().count() > MAX_CLUE_LEN {
        return Err(ClueRejection::TooLong);
    }

    for card in board {
        let word = card.word.as_str();
        if clue == word {
            return Err(ClueRejection::MatchesBoardWord(word.to_string()));
        }
        // Checked before the derivation rule so +-S/ES variants report the
        // more specific reason
        if is_plural_variant(&clue, word) {
            return Err(ClueRejection::PluralOfBoardWord(word.to_string()));
        }
        // Blocks FARM for FARMER; WAR inside DWARF stays legal because a
        // mid-word substring is neither prefix nor suffix
        if clue.starts_with(word)
            || clue.ends_with(word)
            || word.starts_with(clue.as_str())
            || word.ends_with(clue.as_str())
        {
            return Err(ClueRejection::DerivedFromBoardWord(word.to_string()));
        }
    }

    if filter.is_profane(&clue) {
        return Err(ClueRejection::Profane);
    }

    Ok(clue)
}

/// a == b + "S" or b + "ES", in either direction
fn is_plural_variant(a: &str, b: &str) -> bool {
    fn plural_of(longer: &str, shorter: &str) -> bool {
        longer
            .strip_suffix('S')
            .map(|stem| stem == shorter || stem.strip_suffix('E') == Some(shorter))
            .unwrap_or(false)
    }
    plural_of(a, b) || plural_of(b, a)
}
