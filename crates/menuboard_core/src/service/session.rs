//! Session Gate: manager login, logout and passphrase changes.
//!
//! This is a UI access gate, not a security boundary. The passphrase is kept
//! in plain text and compared exactly; there is no hashing, lockout or rate
//! limiting.
//!
//! # Invariants
//! - A failed login leaves the session unchanged.
//! - A successful passphrase change always ends the manager session.

use crate::model::state::{AppState, Session};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shortest passphrase accepted by `change_password`, in characters.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Session gate errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Passphrase did not match. Deliberately carries no detail.
    InvalidCredentials,
    /// New passphrase is shorter than `min_len` characters.
    PolicyViolation { min_len: usize },
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::PolicyViolation { min_len } => {
                write!(f, "new password must be at least {min_len} characters")
            }
        }
    }
}

impl Error for AuthError {}

/// Starts a manager session when `passphrase` matches the stored one.
pub fn login(state: &mut AppState, passphrase: &str) -> Result<Session, AuthError> {
    if passphrase != state.settings.password {
        return Err(AuthError::InvalidCredentials);
    }
    state.session = Session::Manager;
    Ok(state.session)
}

/// Ends any session.
pub fn logout(state: &mut AppState) {
    state.session = Session::Anonymous;
}

/// Replaces the passphrase and forces re-authentication.
pub fn change_password(state: &mut AppState, old: &str, new: &str) -> Result<(), AuthError> {
    if old != state.settings.password {
        return Err(AuthError::InvalidCredentials);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PolicyViolation {
            min_len: MIN_PASSWORD_LEN,
        });
    }

    state.settings.password = new.to_string();
    logout(state);
    Ok(())
}
