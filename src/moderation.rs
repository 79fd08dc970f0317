//! Profanity check for submitted clues.
//!
//! The real moderation surface (avatar review, chat filtering) lives outside
//! this service; clue validation only needs a yes/no answer for a single
//! normalized token, so this is an exact-match blocklist with env overrides.

use std::collections::HashSet;

/// Tokens that are never acceptable as clues
const DEFAULT_BLOCKLIST: &[&str] = &[
    "ARSE", "BASTARD", "BITCH", "COCK", "CRAP", "CUNT", "DICK", "FUCK", "PISS", "PRICK", "SHIT",
    "SLUT", "TWAT", "WANK", "WHORE",
];

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::with_words(DEFAULT_BLOCKLIST)
    }
}

impl ProfanityFilter {
    pub fn with_words(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_uppercase()).collect(),
        }
    }

    /// Load the filter from environment variables.
    /// PROFANITY_EXTRA_WORDS: comma-separated additions to the default list.
    /// PROFANITY_DISABLED=1 turns the check off entirely.
    pub fn from_env() -> Self {
        let disabled = std::env::var("PROFANITY_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);
        if disabled {
            tracing::warn!("Profanity check DISABLED - clues are not filtered");
            return Self {
                words: HashSet::new(),
            };
        }

        let mut filter = Self::default();
        if let Ok(extra) = std::env::var("PROFANITY_EXTRA_WORDS") {
            for word in extra.split(',') {
                let word = word.trim().to_uppercase();
                if !word.is_empty() {
                    filter.words.insert(word);
                }
            }
        }
        filter
    }

    /// Exact match against the blocklist; `candidate` is already a single
    /// normalized uppercase token when called from clue validation
    pub fn is_profane(&self, candidate: &str) -> bool {
        self.words.contains(&candidate.trim().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_catches_known_words() {
        let filter = ProfanityFilter::default();
        assert!(filter.is_profane("shit"));
        assert!(filter.is_profane("SHIT"));
    }

    #[test]
    fn exact_match_only() {
        // GRASS contains ARSE-adjacent letters but is a fine clue
        let filter = ProfanityFilter::default();
        assert!(!filter.is_profane("GRASS"));
        assert!(!filter.is_profane("CLASS"));
    }

    #[test]
    fn extra_words_extend_the_list() {
        let filter = ProfanityFilter::with_words(&["heck"]);
        assert!(filter.is_profane("HECK"));
        assert!(!filter.is_profane("OCEAN"));
    }
}
