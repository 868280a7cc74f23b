//! Login session held by the presentation layer.
//!
//! A [`Session`] only comes out of [`crate::core::auth::authenticate`]. The
//! domain layer never stores it; operations that need to know who is calling
//! take it as an argument.

use crate::entities::Role;
use crate::errors::{Error, Result};

/// The authenticated user and what they may do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Role,
}

impl Session {
    pub(crate) const fn new(username: String, role: Role) -> Self {
        Self { username, role }
    }

    /// Login name of the user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role granted at login.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether the user is a building administrator.
    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }

    /// Fails with [`Error::Forbidden`] unless the user is an administrator.
    pub fn require_administrator(&self) -> Result<()> {
        if self.is_administrator() {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }

    /// Ends the session.
    pub fn logout(self) {
        tracing::info!("User '{}' logged out", self.username);
    }
}
