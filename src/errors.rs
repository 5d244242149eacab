//! Unified error types for infrastructure failures.
//!
//! Business-rule rejections are not errors; each core operation carries its
//! own `RejectionReason` enum in its response struct. The variants here cover
//! everything that can go wrong below the business rules: the database, the
//! environment, configuration files and password hashing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Social accounting has not been seeded")]
    MissingSocialAccounting,
}

impl From<bcrypt::BcryptError> for Error {
    fn from(value: bcrypt::BcryptError) -> Self {
        Error::PasswordHash(value.to_string())
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
