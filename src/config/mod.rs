/// Database configuration and connection management
pub mod database;

/// Goal seed configuration loading from config.toml
pub mod goals;
