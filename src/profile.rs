//! Player identity collected before a session starts
//!
//! Field-level form handling is the host shell's concern; this module is
//! the last line of defense that keeps an unvalidated profile from ever
//! being attached to a session. The name is additionally screened for
//! inappropriate content since it ends up on a public leaderboard.

use garde::Validate;
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};

/// Validates that a name uses only letters and spaces and is not profane
fn validate_name(value: &str, _context: &()) -> garde::Result {
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == ' ')
    {
        return Err(garde::Error::new("name can only contain letters and spaces"));
    }
    if value.is_inappropriate() {
        return Err(garde::Error::new("name is inappropriate"));
    }
    Ok(())
}

/// Validates that a mobile number is exactly ten ASCII digits
fn validate_mobile(value: &str, _context: &()) -> garde::Result {
    if value.len() == crate::constants::profile::MOBILE_DIGITS
        && value.chars().all(|c| c.is_ascii_digit())
    {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "mobile number must be exactly {} digits",
            crate::constants::profile::MOBILE_DIGITS
        )))
    }
}

/// Identity supplied by the player before the quiz begins
///
/// Collected once, immutable for the session's lifetime. A session
/// configured to require a profile refuses to start without one that
/// passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PlayerProfile {
    /// Display name, letters and spaces only
    #[garde(
        length(
            min = crate::constants::profile::MIN_NAME_LENGTH,
            max = crate::constants::profile::MAX_NAME_LENGTH
        ),
        custom(validate_name)
    )]
    pub name: String,
    /// Contact email address
    #[garde(email, length(max = crate::constants::profile::MAX_EMAIL_LENGTH))]
    pub email: String,
    /// Mobile number, digits only
    #[garde(custom(validate_mobile))]
    pub mobile: String,
    /// College or affiliation
    #[garde(length(
        min = crate::constants::profile::MIN_COLLEGE_LENGTH,
        max = crate::constants::profile::MAX_COLLEGE_LENGTH
    ))]
    pub college: String,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn valid_profile() -> PlayerProfile {
        PlayerProfile {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            mobile: "9876543210".to_string(),
            college: "Analytical Engine Institute".to_string(),
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(valid_profile().validate().is_ok());
    }

    #[test]
    fn test_name_too_short() {
        let mut profile = valid_profile();
        profile.name = "A".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_name_with_digits_rejected() {
        let mut profile = valid_profile();
        profile.name = "Ada 1337".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut profile = valid_profile();
        profile.email = "not-an-email".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_mobile_must_be_ten_digits() {
        let mut profile = valid_profile();
        profile.mobile = "12345".to_string();
        assert!(profile.validate().is_err());

        profile.mobile = "12345abcde".to_string();
        assert!(profile.validate().is_err());

        profile.mobile = "1234567890".to_string();
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_college_too_short() {
        let mut profile = valid_profile();
        profile.college = "Io".to_string();
        assert!(profile.validate().is_err());
    }
}
