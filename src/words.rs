//! Built-in word packs for board generation.
//!
//! Pack words are uppercase single tokens. Every pack carries comfortably
//! more than the 25 words one board needs, so a single pack is always
//! sufficient on its own.

use crate::types::WordPackId;

pub const STANDARD: &[&str] = &[
    "ANCHOR", "APPLE", "ARM", "BANK", "BARK", "BATTERY", "BEACH", "BELT", "BERLIN", "BOARD",
    "BOTTLE", "BRIDGE", "BUTTON", "CANVAS", "CAPITAL", "CASTLE", "CHAIN", "CHARGE", "CHEST",
    "CIRCLE", "CLOUD", "CODE", "COMPASS", "COURT", "CROWN", "CYCLE", "DIAMOND", "DWARF", "ENGINE",
    "FAIR", "FARMER", "FENCE", "FILE", "FOREST", "GLASS", "GLOVE", "HARBOR", "HOTEL", "IRON",
    "JACKET", "KEY", "KNIGHT", "LADDER", "LASER", "LIGHT", "MARBLE", "MATCH", "MERCURY", "MINE",
    "NEEDLE", "NIGHT", "OCEAN", "OPERA", "ORANGE", "PALM", "PAPER", "PILOT", "PIPE", "PLATE",
    "POINT", "RING", "RIVER", "ROCKET", "ROOT", "SCALE", "SCREEN", "SHADOW", "SPRING", "STAR",
    "STATION", "STREAM", "TABLE", "TEMPLE", "THEATER", "TOWER", "TRACK", "TRAIN", "WATCH", "WAVE",
];

pub const ANIMALS: &[&str] = &[
    "BADGER", "BEAVER", "CAMEL", "CONDOR", "CRANE", "DOLPHIN", "EAGLE", "FALCON", "FERRET",
    "GAZELLE", "HERON", "HORNET", "JAGUAR", "LEMUR", "LIZARD", "LLAMA", "MANTIS", "MOOSE",
    "OCTOPUS", "OTTER", "PANTHER", "PELICAN", "PYTHON", "RAVEN", "SALMON", "SPIDER", "TIGER",
    "TOUCAN", "TURTLE", "VIPER", "WALRUS", "WEASEL", "ZEBRA",
];

pub const SCIENCE: &[&str] = &[
    "ATOM", "CARBON", "CELL", "COMET", "CRATER", "CRYSTAL", "CURRENT", "ECLIPSE", "ENZYME",
    "FOSSIL", "GALAXY", "GRAVITY", "HELIUM", "ISOTOPE", "LENS", "MAGNET", "METEOR", "NEBULA",
    "NEURON", "NUCLEUS", "ORBIT", "OXYGEN", "PHOTON", "PLASMA", "PRISM", "PROTON", "QUARK",
    "RADAR", "SPECTRUM", "VECTOR", "VOLT", "ZENITH",
];

pub const MYTHOLOGY: &[&str] = &[
    "ATLAS", "CENTAUR", "CERBERUS", "CHIMERA", "CYCLOPS", "DRAGON", "DRUID", "GIANT", "GOLEM",
    "GORGON", "GRIFFIN", "HYDRA", "KRAKEN", "MEDUSA", "MERMAID", "MINOTAUR", "NYMPH", "ORACLE",
    "PEGASUS", "PHANTOM", "PHOENIX", "SIREN", "SPHINX", "TITAN", "TRITON", "UNICORN", "VALKYRIE",
    "WIZARD", "WRAITH", "WYVERN",
];

/// Resolve a pack id to its word pool
pub fn pack_words(id: &str) -> Option<&'static [&'static str]> {
    match id {
        "standard" => Some(STANDARD),
        "animals" => Some(ANIMALS),
        "science" => Some(SCIENCE),
        "mythology" => Some(MYTHOLOGY),
        _ => None,
    }
}

/// All pack ids offered to room owners
pub fn available_packs() -> Vec<WordPackId> {
    vec![
        "standard".to_string(),
        "animals".to_string(),
        "science".to_string(),
        "mythology".to_string(),
    ]
}
