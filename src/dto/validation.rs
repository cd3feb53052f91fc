//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// Validates a single player name: non-empty once trimmed and at most
/// [`MAX_PLAYER_NAME_LEN`] characters.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_empty");
        err.message = Some("Player name must not be empty".into());
        return Err(err);
    }

    if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_LEN} characters").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a roster supplied at group or game creation: at least two
/// entries, each individually valid.
pub fn validate_player_names(names: &[String]) -> Result<(), ValidationError> {
    if names.len() < 2 {
        let mut err = ValidationError::new("player_names_count");
        err.message = Some("At least two players are required".into());
        return Err(err);
    }

    for name in names {
        validate_player_name(name)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Alice").is_ok());
        assert!(validate_player_name("  Bob  ").is_ok());
        assert!(validate_player_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_player_name_invalid() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_player_names_requires_two() {
        assert!(validate_player_names(&["Alice".into()]).is_err());
        assert!(validate_player_names(&["Alice".into(), "Bob".into()]).is_ok());
        assert!(validate_player_names(&["Alice".into(), "".into()]).is_err());
    }
}
