//! Error types for the newsdesk application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur while managing, rendering and generating articles.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the newsdesk application.
#[derive(Error, Debug)]
pub enum NewsError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failures talking to the generation endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Article was not found when performing an operation.
    #[error("Article not found: {id}")]
    ArticleNotFound { id: String },

    /// A required article field was empty at save time.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// The key-value backend could not serve a read or write.
    #[error("Storage backend error: {message}")]
    Backend { message: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Draft generation failed (empty title, upstream rejection, empty answer).
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// No API key configured for the generation endpoint.
    #[error("No API key configured; set gemini_api_key or the GEMINI_API_KEY environment variable")]
    MissingApiKey,

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    EditorError { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
