//! Player identification.
//!
//! ## PlayerId
//!
//! Validated player identifier: non-empty, ASCII alphanumeric only.
//! Construction is the only place the format is checked, so every
//! `PlayerId` held by a match is known to be well-formed.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Player identifier chosen by the player at registration.
///
/// ```
/// use word_match::core::PlayerId;
///
/// let bob = PlayerId::parse("BobSmith").unwrap();
/// assert_eq!(bob.as_str(), "BobSmith");
///
/// assert!(PlayerId::parse("").is_err());
/// assert!(PlayerId::parse("Bob.Smith").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    /// Validate and wrap a raw identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, MatchError> {
        let raw = raw.into();
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(MatchError::InvalidPlayerId(raw));
        }
        Ok(Self(raw))
    }

    /// Get the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = MatchError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_accepts_alphanumeric() {
        for raw in ["a", "Bob", "JackJohn", "player42", "7"] {
            let id = PlayerId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
            assert_eq!(format!("{}", id), raw);
        }
    }

    #[test]
    fn test_player_id_rejects_malformed() {
        for raw in ["", "Bob Smithson", "Bob.Smith", "bob-1", "émile"] {
            assert_eq!(
                PlayerId::parse(raw),
                Err(MatchError::InvalidPlayerId(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_player_id_serde_validates() {
        let id: PlayerId = serde_json::from_str("\"LucyLove\"").unwrap();
        assert_eq!(id.as_str(), "LucyLove");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"LucyLove\"");

        assert!(serde_json::from_str::<PlayerId>("\"Lucy Love\"").is_err());
    }
}
