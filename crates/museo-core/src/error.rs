//! # Error Hierarchy
//!
//! Structured validation errors for the catalog, built with `thiserror`.
//! Each variant carries the invalid input or the limit that was exceeded so
//! callers can report actionable messages without string-matching.

use thiserror::Error;

use crate::fields::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_TITLE_LEN, MAX_USERNAME_LEN};

/// Validation errors for catalog and profile fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace-only.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Title exceeds the storage limit.
    #[error("title must not exceed {MAX_TITLE_LEN} characters (got {len})")]
    TitleTooLong {
        /// Length of the rejected title.
        len: usize,
    },

    /// Description is empty or whitespace-only.
    #[error("description must not be empty")]
    EmptyDescription,

    /// Username is empty or whitespace-only.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Username exceeds the storage limit.
    #[error("username must not exceed {MAX_USERNAME_LEN} characters (got {len})")]
    UsernameTooLong {
        /// Length of the rejected username.
        len: usize,
    },

    /// Username contains a character outside the permitted set.
    #[error("username may contain only letters, digits and @ . + - _ (got {0:?})")]
    InvalidUsernameChar(char),

    /// Email does not look like an address.
    #[error("email address is not valid: {0:?}")]
    InvalidEmail(String),

    /// Email exceeds the storage limit.
    #[error("email must not exceed {MAX_EMAIL_LEN} characters (got {len})")]
    EmailTooLong {
        /// Length of the rejected email.
        len: usize,
    },

    /// A first or last name exceeds the storage limit.
    #[error("{field} must not exceed {MAX_NAME_LEN} characters (got {len})")]
    NameTooLong {
        /// Which name field was rejected.
        field: &'static str,
        /// Length of the rejected name.
        len: usize,
    },

    /// An exposition position outside the defined set was submitted.
    #[error("position {0} is not defined (expected -1..=4)")]
    UndefinedPosition(i16),
}
