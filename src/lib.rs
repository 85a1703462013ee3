//! Crypto news article management library
//!
//! This library provides a persisted article collection, a renderer for the
//! small markdown subset articles are written in, and AI-assisted draft
//! generation.

mod article;
mod backend;
mod cli;
mod config;
mod errors;
mod generator;
mod helper;
mod markdown;
mod seed;
mod storage;
mod types;

// Re-export key components
pub use article::*;
pub use backend::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use generator::*;
pub use helper::*;
pub use markdown::*;
pub use seed::*;
pub use storage::*;
pub use types::*;
