use clap::Parser;
use postfind::cli::{Cli, Commands};
use postfind::commands;
use postfind::excerpt::render_highlighted;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { query, limit }) => {
            let matches = commands::search(&query, limit)?;

            if matches.is_empty() {
                println!("No matches found for '{query}'");
                return Ok(());
            }

            for m in &matches {
                println!(
                    "## {}\n**Id:** {}\n**Date:** {}\n{}\n",
                    render_highlighted(&m.hit.title, &query, "**", "**"),
                    m.hit.id,
                    m.hit.date,
                    render_highlighted(&m.excerpt, &query, "**", "**"),
                );
            }
            println!("*{} result(s) found*", matches.len());
            Ok(())
        }
        Some(Commands::List) => {
            let posts = commands::list()?;

            if posts.is_empty() {
                println!("No posts found.");
                return Ok(());
            }

            for post in &posts {
                println!("- {} {}\n  `{}`", post.date, post.title, post.id);
            }
            Ok(())
        }
        Some(Commands::Get { id }) => {
            let post = commands::get(&id)?;
            println!("# {}\n\n{}\n", post.title, post.date);
            println!("{}", post.content());
            Ok(())
        }
        Some(Commands::Excerpt {
            id,
            query,
            max_length,
        }) => {
            println!("{}", commands::excerpt(&id, &query, max_length)?);
            Ok(())
        }
        Some(Commands::Interactive) => {
            tokio::runtime::Runtime::new()?.block_on(commands::interactive())
        }
        #[cfg(feature = "mcp")]
        Some(Commands::Serve) => tokio::runtime::Runtime::new()?.block_on(postfind::mcp::serve()),
        None => {
            Cli::parse_from(["postfind", "--help"]);
            Ok(())
        }
    }
}
