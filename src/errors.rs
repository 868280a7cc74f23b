use thiserror::Error;

/// Every failure the domain layer can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Persistence failure (connectivity, lock, constraint violation)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Malformed user input, detected before anything is written
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending input field
        field: &'static str,
        /// Human readable reason
        message: String,
    },

    /// Monetary amount outside the accepted range
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: i64,
    },

    /// Unit numbers identify residents and may appear only once
    #[error("Unit number {unit_number} is already registered")]
    DuplicateUnit {
        /// The unit number that already exists
        unit_number: i32,
    },

    /// Usernames are unique
    #[error("Username '{username}' is already taken")]
    DuplicateUsername {
        /// The username that already exists
        username: String,
    },

    /// Unknown user and wrong password both end up here
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The session does not carry the administrator role
    #[error("This operation requires an administrator")]
    Forbidden,

    /// Removing this account would leave no administrator behind
    #[error("Cannot remove the last administrator account")]
    LastAdministrator,

    /// Argon2 could not hash a password
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An environment variable was missing or not valid Unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A count did not fit the target integer type
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

impl Error {
    /// Text suitable for showing to the person at the keyboard.
    ///
    /// Input problems are reported as-is so they can be corrected. Everything
    /// coming from the store or the filesystem collapses to a generic failure;
    /// the detailed error is meant for the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { .. }
            | Self::InvalidAmount { .. }
            | Self::NotFound { .. }
            | Self::DuplicateUnit { .. }
            | Self::DuplicateUsername { .. }
            | Self::InvalidCredentials
            | Self::Forbidden
            | Self::LastAdministrator => self.to_string(),
            _ => "The operation could not be completed.".to_string(),
        }
    }

    /// Shorthand for building a [`Error::Validation`].
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
