//! Error types for the boundaries around the simulation
//!
//! The simulation itself is infallible. These cover storage, settings input
//! and the audio host.

use thiserror::Error;

/// Key-value storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The host has no storage (private browsing, missing window, ...)
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("storage data malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected settings input
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Audio host failures; always swallowed by the game loop
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio unavailable: {0}")]
    Unavailable(String),

    #[error("playback failed: {0}")]
    Playback(String),
}
