//! Shared types for the newsdesk application.
//!
//! This module holds the crate-wide `Result` alias and the CLI subcommands.
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::NewsError;

/// A specialized Result type for newsdesk operations.
pub type Result<T> = std::result::Result<T, NewsError>;

/// Where the body of a new or edited article comes from
#[derive(Args, Debug, Clone, Default)]
pub struct ContentSource {
    /// Article content in markdown
    #[clap(short, long, conflicts_with_all = ["file", "edit", "generate"])]
    pub content: Option<String>,

    /// Path to a file containing the article content
    #[clap(short, long, conflicts_with_all = ["edit", "generate"])]
    pub file: Option<PathBuf>,

    /// Open the content in an editor before saving
    #[clap(short, long)]
    pub edit: bool,

    /// Generate the content from the title; combine with --edit to review it first
    #[clap(short, long)]
    pub generate: bool,
}

/// Options for the `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArticlesOptions {
    /// Limit the number of articles shown (0 means no limit)
    #[clap(short = 'n', long, default_value_t = 0)]
    pub limit: usize,

    /// Format output as JSON
    #[clap(short, long)]
    pub json: bool,

    /// Only show article IDs and titles
    #[clap(short, long)]
    pub brief: bool,
}

/// Available subcommands for the newsdesk application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new article
    Create {
        /// Title of the article
        #[clap(short = 'T', long)]
        title: String,

        /// Author of the article (defaults to the configured author)
        #[clap(short, long)]
        author: Option<String>,

        /// Cover image URL
        #[clap(short, long)]
        image: Option<String>,

        #[clap(flatten)]
        source: ContentSource,
    },

    /// Edit an existing article
    Edit {
        /// ID of the article to edit
        id: String,

        /// New title
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New author
        #[clap(short, long)]
        author: Option<String>,

        /// New cover image URL (empty string clears it)
        #[clap(short, long)]
        image: Option<String>,

        #[clap(flatten)]
        source: ContentSource,
    },

    /// View an article by ID
    View {
        /// ID of the article to view
        id: String,

        /// Output the rendered body as HTML
        #[clap(long)]
        html: bool,

        /// Output the raw article as JSON
        #[clap(short, long, conflicts_with = "html")]
        json: bool,
    },

    /// List articles, newest first
    List(ListArticlesOptions),

    /// Search articles by title or content
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Delete an article by ID
    Delete {
        /// ID of the article to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Generate a draft article body for a title and print it
    Generate {
        /// Headline to write about
        title: String,
    },

    /// Render a markdown file (or stdin) the way article bodies are shown
    Render {
        /// File to render; reads stdin when omitted
        file: Option<PathBuf>,

        /// Output HTML instead of terminal text
        #[clap(long)]
        html: bool,
    },

    /// Configuration management
    Config {
        /// Show current configuration
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a configuration setting (key=value)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset configuration to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
