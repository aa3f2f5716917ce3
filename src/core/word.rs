//! Guess words.
//!
//! A `Word` is a single run of letters, lowercased once at construction.
//! Matching compares `Word`s directly, so it is case-insensitive by
//! construction rather than by convention at each comparison.

use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// A validated, case-normalized guess.
///
/// ```
/// use word_match::core::Word;
///
/// let cat = Word::parse("Cat").unwrap();
/// assert_eq!(cat.as_str(), "cat");
/// assert_eq!(cat, Word::parse("CAT").unwrap());
///
/// assert!(Word::parse("").is_err());
/// assert!(Word::parse("two words").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Validate and normalize raw guess text.
    ///
    /// Surrounding whitespace is not trimmed; `" cat"` is rejected.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, MatchError> {
        let raw = raw.as_ref();
        // Lowercasing can introduce combining marks ("İ" -> "i\u{307}").
        let lower = raw.to_lowercase();
        if lower.is_empty() || !lower.chars().all(char::is_alphabetic) {
            return Err(MatchError::InvalidGuess(raw.to_string()));
        }
        Ok(Self(lower))
    }

    /// Get the normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// True iff the word has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for Word {
    type Error = MatchError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_lowercases() {
        assert_eq!(Word::parse("Cat").unwrap().as_str(), "cat");
        assert_eq!(Word::parse("DOG").unwrap().as_str(), "dog");
        assert_eq!(Word::parse("Über").unwrap().as_str(), "über");
    }

    #[test]
    fn test_word_rejects_non_letters() {
        for raw in ["", "cat dog", "c4t", "cat!", " cat", "under_score"] {
            assert_eq!(
                Word::parse(raw),
                Err(MatchError::InvalidGuess(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_word_rejects_lowercase_expansion() {
        assert_eq!(
            Word::parse("İstanbul"),
            Err(MatchError::InvalidGuess("İstanbul".to_string()))
        );
    }

    #[test]
    fn test_word_serde_non_ascii() {
        let word = Word::parse("Ölçü").unwrap();
        let json = serde_json::to_string(&word).unwrap();
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
        assert_eq!(back.as_str(), "ölçü");
    }

    #[test]
    fn test_word_len() {
        let w = Word::parse("Hello").unwrap();
        assert_eq!(w.len(), 5);
        assert!(!w.is_empty());
    }
}
