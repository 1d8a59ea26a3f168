//! MCP server implementation for postfind.
//!
//! Exposes post search as MCP tools for AI editors.

use std::borrow::Cow;
use std::fmt::Write;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;

use crate::cli::DEFAULT_SEARCH_LIMIT;
use crate::commands;

/// Parameters for `search_posts` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "The search query; every word must prefix-match the post")]
    pub query: String,
    #[schemars(description = "Maximum number of results (default: 10)")]
    pub limit: Option<usize>,
}

/// Parameters for `list_posts` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListParams {}

/// Parameters for `get_post` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetParams {
    #[schemars(description = "Post id (e.g., 'hello-world')")]
    pub id: String,
}

/// Parameters for `excerpt_post` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExcerptParams {
    #[schemars(description = "Post id")]
    pub id: String,
    #[schemars(description = "Text to locate in the post")]
    pub query: String,
    #[schemars(description = "Excerpt length when the query is not found (default: 150)")]
    pub max_length: Option<usize>,
}

fn internal_error(context: &str, e: &anyhow::Error) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(format!("{context}: {e}")),
        data: None,
    }
}

/// MCP server exposing postfind tools.
#[derive(Clone)]
pub struct PostfindServer {
    tool_router: ToolRouter<Self>,
}

impl Default for PostfindServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PostfindServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Search blog posts by title, description and body")]
    async fn search_posts(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        match commands::search(&params.query, limit) {
            Ok(matches) => {
                if matches.is_empty() {
                    return Ok(CallToolResult::success(vec![Content::text(format!(
                        "No matches found for '{}'",
                        params.query
                    ))]));
                }

                let mut output = String::new();
                for m in &matches {
                    let _ = write!(
                        output,
                        "## {}\n**Id:** {}\n**Date:** {}\n{}\n\n",
                        m.hit.title, m.hit.id, m.hit.date, m.excerpt
                    );
                }
                let _ = write!(output, "*{} result(s) found*", matches.len());

                Ok(CallToolResult::success(vec![Content::text(output)]))
            }
            Err(e) => Err(internal_error("Search failed", &e)),
        }
    }

    #[tool(description = "List all blog posts")]
    async fn list_posts(
        &self,
        Parameters(_params): Parameters<ListParams>,
    ) -> Result<CallToolResult, McpError> {
        match commands::list() {
            Ok(posts) => {
                if posts.is_empty() {
                    return Ok(CallToolResult::success(vec![Content::text(
                        "No posts found.".to_string(),
                    )]));
                }

                let mut output = String::new();
                for post in &posts {
                    let _ = write!(
                        output,
                        "- **{}** ({}): {}\n  `{}`\n",
                        post.title, post.date, post.description, post.id
                    );
                }

                Ok(CallToolResult::success(vec![Content::text(output)]))
            }
            Err(e) => Err(internal_error("List failed", &e)),
        }
    }

    #[tool(description = "Get the full text of a blog post by its id")]
    async fn get_post(
        &self,
        Parameters(params): Parameters<GetParams>,
    ) -> Result<CallToolResult, McpError> {
        match commands::get(&params.id) {
            Ok(post) => {
                let output = format!("# {}\n\n{}\n\n{}", post.title, post.date, post.content());
                Ok(CallToolResult::success(vec![Content::text(output)]))
            }
            Err(e) => Err(internal_error("Failed to get post", &e)),
        }
    }

    #[tool(description = "Get a short excerpt of a blog post around a query")]
    async fn excerpt_post(
        &self,
        Parameters(params): Parameters<ExcerptParams>,
    ) -> Result<CallToolResult, McpError> {
        match commands::excerpt(&params.id, &params.query, params.max_length) {
            Ok(excerpt) => Ok(CallToolResult::success(vec![Content::text(excerpt)])),
            Err(e) => Err(internal_error("Failed to excerpt post", &e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for PostfindServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "postfind provides instant search over a blog. \
                Use search_posts to find posts, list_posts to browse, \
                get_post to read a post, and excerpt_post for a snippet around a phrase."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve() -> anyhow::Result<()> {
    let server = PostfindServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
