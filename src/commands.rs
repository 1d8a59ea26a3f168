//! Command implementations shared by CLI and MCP server.

use serde::Serialize;
use tokio::io::BufReader;

use crate::config::Config;
use crate::corpus::{Document, ManifestSupplier};
use crate::excerpt::extract_excerpt;
use crate::search::{QueryEngine, SearchHit};
use crate::session::interactive;

/// Maximum length for user-provided queries, in characters.
const MAX_INPUT_LENGTH: usize = 200;

/// A ranked search hit with an excerpt of the post around the query.
#[derive(Debug, Clone, Serialize)]
pub struct PostMatch {
    #[serde(flatten)]
    pub hit: SearchHit,
    pub excerpt: String,
}

fn validate_query(query: &str) -> anyhow::Result<()> {
    let len = query.chars().count();
    if len > MAX_INPUT_LENGTH {
        anyhow::bail!("Query too long: {len} chars (max {MAX_INPUT_LENGTH})");
    }
    Ok(())
}

/// Load the configured corpus and build a search engine over it.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded or fails validation.
pub fn open_engine(config: &Config) -> anyhow::Result<QueryEngine> {
    let root = config.corpus.root();
    let supplier = ManifestSupplier::new(root.clone());

    QueryEngine::from_supplier(&supplier)
        .map_err(|e| anyhow::anyhow!("Load corpus {}: {e}", root.display()))
}

/// Search the configured corpus.
///
/// # Arguments
///
/// * `query` - The search query string
/// * `limit` - Maximum number of results to return
///
/// # Returns
///
/// Ranked matches, each with an excerpt of the post body (or description).
///
/// # Errors
///
/// Returns an error if config loading fails, the query is too long, or the
/// corpus cannot be loaded. A query that matches nothing is not an error.
pub fn search(query: &str, limit: usize) -> anyhow::Result<Vec<PostMatch>> {
    validate_query(query)?;

    let config = Config::load()?;
    let engine = open_engine(&config)?;
    let snapshot = engine.snapshot();

    let matches = snapshot
        .search(query, limit)
        .into_iter()
        .map(|result| PostMatch {
            hit: SearchHit::from(result.document),
            excerpt: extract_excerpt(
                result.document.content(),
                query,
                config.excerpt.max_length,
            ),
        })
        .collect();

    Ok(matches)
}

/// List every post in corpus order.
///
/// # Errors
///
/// Returns an error if config loading fails or the corpus cannot be loaded.
pub fn list() -> anyhow::Result<Vec<SearchHit>> {
    let config = Config::load()?;
    let engine = open_engine(&config)?;

    Ok(engine
        .snapshot()
        .corpus()
        .documents()
        .iter()
        .map(SearchHit::from)
        .collect())
}

/// Get a post by id.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded or no post has this id.
pub fn get(id: &str) -> anyhow::Result<Document> {
    let config = Config::load()?;
    let engine = open_engine(&config)?;

    engine
        .snapshot()
        .corpus()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Post not found: {id}"))
}

/// Excerpt of a single post around `query`.
///
/// Uses the configured length when `max_length` is `None`.
///
/// # Errors
///
/// Returns an error if the query is too long, the corpus cannot be loaded,
/// or no post has this id.
pub fn excerpt(id: &str, query: &str, max_length: Option<usize>) -> anyhow::Result<String> {
    validate_query(query)?;

    let config = Config::load()?;
    let post = get(id)?;
    let max_length = max_length.unwrap_or(config.excerpt.max_length);

    Ok(extract_excerpt(post.content(), query, max_length))
}

/// Run an interactive session on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the corpus cannot be loaded or terminal I/O fails.
pub async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let engine = open_engine(&config)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    interactive::run(&engine, &config, stdin, &mut stdout).await
}
