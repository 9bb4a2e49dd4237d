//! Validation helpers for DTOs.

use validator::ValidationError;

/// Length of a room code on the wire.
pub const ROOM_CODE_LENGTH: usize = 6;
/// Longest display name a player may join under.
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Validates that a player name has something left after trimming and fits a
/// seat label.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Alice")   // Ok
/// validate_player_name("  Bob ")  // Ok - trimmed before checking
/// validate_player_name("   ")     // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }

    if trimmed.chars().count() > MAX_PLAYER_NAME_LENGTH {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be at most {MAX_PLAYER_NAME_LENGTH} characters").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that a room code is exactly 6 alphanumeric characters, in either
/// case.
///
/// # Examples
///
/// ```ignore
/// validate_room_code("AB12CD") // Ok
/// validate_room_code("ab12cd") // Ok - normalized to uppercase on lookup
/// validate_room_code("AB12C")  // Err - too short
/// ```
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    let trimmed = code.trim();
    if trimmed.len() != ROOM_CODE_LENGTH {
        let mut err = ValidationError::new("room_code_length");
        err.message = Some(
            format!(
                "Room code must be exactly {ROOM_CODE_LENGTH} characters (got {})",
                trimmed.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("room_code_format");
        err.message = Some("Room code must contain only letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Lookup form of a room code: trimmed and uppercased, matching how codes are
/// generated.
pub fn normalize_room_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Display form of a player name: trimmed of surrounding whitespace.
pub fn normalize_player_name(name: &str) -> String {
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Alice").is_ok());
        assert!(validate_player_name("  Bob  ").is_ok());
        assert!(validate_player_name(&"x".repeat(32)).is_ok());
    }

    #[test]
    fn test_validate_player_name_invalid() {
        assert!(validate_player_name("").is_err()); // empty
        assert!(validate_player_name("   ").is_err()); // blank after trim
        assert!(validate_player_name(&"x".repeat(33)).is_err()); // too long
    }

    #[test]
    fn test_validate_room_code_valid() {
        assert!(validate_room_code("AB12CD").is_ok());
        assert!(validate_room_code("ab12cd").is_ok());
        assert!(validate_room_code(" AB12CD ").is_ok()); // trimmed
    }

    #[test]
    fn test_validate_room_code_invalid() {
        assert!(validate_room_code("AB12C").is_err()); // too short
        assert!(validate_room_code("AB12CDE").is_err()); // too long
        assert!(validate_room_code("AB 2CD").is_err()); // inner space
        assert!(validate_room_code("AB12C!").is_err()); // punctuation
    }

    #[test]
    fn test_normalize_room_code() {
        assert_eq!(normalize_room_code("  ab12cd "), "AB12CD");
        assert_eq!(normalize_room_code("AB12CD"), "AB12CD");
    }

    #[test]
    fn test_normalize_player_name() {
        assert_eq!(normalize_player_name("  Alice "), "Alice");
    }
}
