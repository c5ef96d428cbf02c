//! Validated request inputs.
//!
//! The engine only accepts these types, so malformed names, hashes, ids and
//! positions are rejected before any storage access.

use derive_more::{Display, Error};
use ladder_board::Position;
use tracing::instrument;

use crate::db::MatchId;

/// Maximum player name length, in characters.
pub const MAX_NAME_LENGTH: usize = 16;

/// Exact credential hash length, in hex digits.
pub const CREDENTIAL_HASH_LENGTH: usize = 8;

/// A request field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Reports the same failure under a different field name.
    pub fn on_field(self, field: &'static str) -> Self {
        Self { field, ..self }
    }

    /// Error for a field absent from the request.
    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "missing")
    }
}

/// Player name of 1 to 16 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates a name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the name is empty or too long.
    #[instrument]
    pub fn new(raw: impl Into<String> + std::fmt::Debug) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let len = raw.chars().count();
        if len == 0 {
            return Err(ValidationError::new("name", "must not be empty"));
        }
        if len > MAX_NAME_LENGTH {
            return Err(ValidationError::new("name", "name too long"));
        }
        Ok(Self(raw))
    }

    /// The name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Precomputed credential digest: exactly 8 lowercase hex digits.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Validates a hash. Uppercase digits are rejected; callers normalize first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the length or alphabet is wrong.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let well_formed = raw.len() == CREDENTIAL_HASH_LENGTH
            && raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(ValidationError::new("pw_hash", "invalid pw hash"));
        }
        Ok(Self(raw))
    }

    /// The digest as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// Parses a positive match id.
///
/// # Errors
///
/// Returns [`ValidationError`] unless `raw` is an integer of at least 1.
#[instrument]
pub fn parse_match_id(raw: &str) -> Result<MatchId, ValidationError> {
    match raw.trim().parse::<MatchId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::new("match_id", "must be a positive integer")),
    }
}

/// Parses a board position in `[0, 8]`.
///
/// # Errors
///
/// Returns [`ValidationError`] for anything else.
#[instrument]
pub fn parse_position(raw: &str) -> Result<Position, ValidationError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(Position::from_index)
        .ok_or_else(|| ValidationError::new("position", "must be an integer from 0 to 8"))
}

/// Parses a leaderboard size.
///
/// # Errors
///
/// Returns [`ValidationError`] unless `raw` is a non-negative integer.
#[instrument]
pub fn parse_max_entries(raw: &str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::new("max_entries", "must be a non-negative integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        assert!(PlayerName::new("a").is_ok());
        assert!(PlayerName::new("a".repeat(16)).is_ok());
        assert_eq!(
            PlayerName::new("a".repeat(17)),
            Err(ValidationError::new("name", "name too long"))
        );
        assert!(PlayerName::new("").is_err());
    }

    #[test]
    fn test_name_counts_characters() {
        assert!(PlayerName::new("ü".repeat(16)).is_ok());
    }

    #[test]
    fn test_credential_hash_shape() {
        assert!(CredentialHash::new("0123abcd").is_ok());
        assert!(CredentialHash::new("0123ABCD").is_err());
        assert!(CredentialHash::new("0123abc").is_err());
        assert!(CredentialHash::new("0123abcg").is_err());
        assert!(CredentialHash::new("0123abcde").is_err());
    }

    #[test]
    fn test_credential_hash_debug_is_redacted() {
        let hash = CredentialHash::new("0123abcd").expect("valid");
        assert!(!format!("{:?}", hash).contains("0123abcd"));
    }

    #[test]
    fn test_match_id_must_be_positive() {
        assert_eq!(parse_match_id("1"), Ok(1));
        assert!(parse_match_id("0").is_err());
        assert!(parse_match_id("-3").is_err());
        assert!(parse_match_id("one").is_err());
    }

    #[test]
    fn test_position_range() {
        assert_eq!(parse_position("0"), Ok(Position::TopLeft));
        assert_eq!(parse_position("8"), Ok(Position::BottomRight));
        assert!(parse_position("9").is_err());
        assert!(parse_position("-1").is_err());
    }

    #[test]
    fn test_field_relabel() {
        let err = PlayerName::new("").unwrap_err().on_field("player_2_name");
        assert_eq!(err.field, "player_2_name");
    }
}
