//! Caller identity.
//!
//! Every catalog and ledger operation is scoped to the user resolved here, and
//! fails with [`Error::NotAuthenticated`] before touching storage when nobody is
//! signed in.

use crate::errors::{Error, Result};

/// Identity of whoever is invoking an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// Session for a signed-in user.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// Session with no resolvable user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Returns the current user id, or `NotAuthenticated`.
    ///
    /// Blank ids count as missing.
    pub fn require_user(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(Error::NotAuthenticated)
    }
}
