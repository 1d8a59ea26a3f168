//! CLI interface for postfind.
//!
//! Provides command-line argument parsing using clap.

use clap::{Parser, Subcommand};

pub use crate::search::DEFAULT_SEARCH_LIMIT;

/// Command-line interface for postfind.
#[derive(Parser)]
#[command(name = "postfind")]
#[command(author, version, about = "Instant search over blog posts", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search posts by title, description and body.
    Search {
        /// The search query string. Every word must prefix-match a word in the post.
        query: String,

        /// Maximum number of results to return.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// List all posts in the corpus.
    List,

    /// Print a post by its id.
    Get {
        /// Post id (e.g., "hello-world").
        id: String,
    },

    /// Print the excerpt of a post around a query.
    Excerpt {
        /// Post id.
        id: String,

        /// Text to locate in the post.
        query: String,

        /// Excerpt length when the query is empty or not found.
        #[arg(short, long)]
        max_length: Option<usize>,
    },

    /// Search as you type, reading queries and `:up`/`:down`/`:enter`/`:esc` from stdin.
    Interactive,

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}
