use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading "+", then digits with optional spaces or hyphens (6-20 chars)
    /// - Valid: "+62 812-3456-7890", "081234567890", "021 555 123"
    /// - Invalid: "phone", "12", "+62_812", "--123456"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{5,19}$").unwrap();
}

/// Passwords must contain at least one letter and one digit.
/// Length is checked separately with `#[validate(length(...))]`.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_letter && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some("Password must contain at least one letter and one digit".into());
        Err(error)
    }
}

/// Rejects values made only of whitespace, which would otherwise pass `length(min = 1)`
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        Err(error)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("+62 812-3456-7890"));
        assert!(PHONE_REGEX.is_match("081234567890"));
        assert!(PHONE_REGEX.is_match("021 555 123"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match("12")); // too short
        assert!(!PHONE_REGEX.is_match("+62_812345")); // underscore
        assert!(!PHONE_REGEX.is_match("--123456")); // must start with digit
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("agent2024").is_ok());
        assert!(validate_password_strength("onlyletters").is_err());
        assert!(validate_password_strength("12345678").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Sari").is_ok());
        assert!(validate_not_blank(" Dinas PU ").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }
}
