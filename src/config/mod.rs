/// Database connection, schema creation and seeding
pub mod database;

/// Application settings from config.toml and environment variables
pub mod settings;
