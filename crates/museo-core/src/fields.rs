//! # Field Rules
//!
//! Validation of the shared title/description fields, profile fields, and
//! the restoration invariant. Every write path in the API goes through these
//! functions, so the limits and the invariant hold no matter which route
//! performed the write.

use crate::error::ValidationError;
use crate::position::FloorPosition;

/// Maximum title length for expositions and exhibits.
pub const MAX_TITLE_LEN: usize = 256;
/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 150;
/// Maximum first/last name length.
pub const MAX_NAME_LEN: usize = 150;
/// Maximum email address length.
pub const MAX_EMAIL_LEN: usize = 254;

/// The open flag an exposition is actually stored with.
///
/// An exposition under restoration is never open, regardless of what was
/// submitted: `{on_restoration: true, open: true}` stores `open = false`.
pub fn effective_open(on_restoration: bool, requested_open: bool) -> bool {
    !on_restoration && requested_open
}

/// Validate an exposition or exhibit title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { len });
    }
    Ok(())
}

/// Validate an exposition or exhibit description.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(())
}

/// Validate a username: non-empty, bounded, letters/digits/`@.+-_` only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    let len = username.chars().count();
    if len > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong { len });
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        return Err(ValidationError::InvalidUsernameChar(bad));
    }
    Ok(())
}

/// Validate an email address: bounded, with a local part and a domain.
///
/// Deliberately shallow — the mail system is the real validator. This only
/// rejects inputs that cannot possibly be addresses.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let len = email.chars().count();
    if len > MAX_EMAIL_LEN {
        return Err(ValidationError::EmailTooLong { len });
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail(email.to_string())),
    }
}

/// Validate a first or last name. Empty is allowed; only the length is bounded.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { field, len });
    }
    Ok(())
}

/// Parse a submitted wire-level position, rejecting undefined values.
///
/// Unlike floor listing (where an undefined level is not-found), a write
/// carrying an undefined position is a validation failure: the form was
/// filled in wrong, not pointed at a missing page.
pub fn parse_position(level: i16) -> Result<FloorPosition, ValidationError> {
    FloorPosition::from_level(level).ok_or(ValidationError::UndefinedPosition(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn restoration_forces_closed() {
        assert!(!effective_open(true, true));
        assert!(!effective_open(true, false));
        assert!(effective_open(false, true));
        assert!(!effective_open(false, false));
    }

    #[test]
    fn titles_are_bounded_and_non_empty() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
        assert!(validate_title("Amber Room").is_ok());
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(
            validate_title(&long),
            Err(ValidationError::TitleTooLong {
                len: MAX_TITLE_LEN + 1
            })
        );
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN)).is_ok());
    }

    #[test]
    fn usernames_reject_forbidden_characters() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice.b+c@d-e_f").is_ok());
        assert_eq!(
            validate_username("alice bob"),
            Err(ValidationError::InvalidUsernameChar(' '))
        );
        assert_eq!(
            validate_username("alice!"),
            Err(ValidationError::InvalidUsernameChar('!'))
        );
        assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
    }

    #[test]
    fn emails_need_local_part_and_dotted_domain() {
        assert!(validate_email("curator@museum.example").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@museum.example").is_err());
        assert!(validate_email("curator@localhost").is_err());
    }

    #[test]
    fn names_may_be_empty_but_not_unbounded() {
        assert!(validate_name("first_name", "").is_ok());
        assert!(validate_name("first_name", "Ada").is_ok());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_name("last_name", &long),
            Err(ValidationError::NameTooLong {
                field: "last_name",
                len: MAX_NAME_LEN + 1
            })
        );
    }

    #[test]
    fn submitted_positions_are_validated_not_404d() {
        assert_eq!(parse_position(2), Ok(FloorPosition::Floor2));
        assert_eq!(
            parse_position(7),
            Err(ValidationError::UndefinedPosition(7))
        );
    }

    proptest! {
        /// The stored open flag never contradicts the restoration flag.
        #[test]
        fn invariant_holds_for_all_inputs(on_restoration: bool, open: bool) {
            let stored = effective_open(on_restoration, open);
            prop_assert!(!(on_restoration && stored));
        }
    }
}
