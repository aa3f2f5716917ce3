//! Core value types: players, words, configuration.
//!
//! Everything here is validated at construction. The match engine only
//! ever sees well-formed identifiers and normalized words.

pub mod player;
pub mod word;
pub mod config;

pub use player::PlayerId;
pub use word::Word;
pub use config::MatchConfig;
