//! postfind - instant search over a blog post corpus.
//!
//! Builds an in-memory token index over a small, fixed set of posts, answers
//! prefix queries with ranked results, and cuts excerpts around matches.
//!
//! # Modules
//!
//! - [`search`] - Tokenizer, index builder and query engine
//! - [`excerpt`] - Excerpts and highlight splitting
//! - [`corpus`] - Post and manifest types, ingestion checks, document suppliers
//! - [`storage`] - Storage backend trait and implementations
//! - [`session`] - Interactive session state and query debouncing
//! - [`commands`] - High-level operations (search, list, get, excerpt)
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod excerpt;
pub mod search;
pub mod session;
pub mod storage;

#[cfg(feature = "mcp")]
pub mod mcp;
