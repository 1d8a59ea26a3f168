//! Line-driven interactive search over stdin.
//!
//! Plain lines replace the query; they are debounced before reaching the
//! search engine. Lines starting with `:` are keys: `:up`, `:down`,
//! `:enter`, `:esc`, `:open`, and `:quit` to leave.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::config::Config;
use crate::excerpt::render_highlighted;
use crate::search::QueryEngine;
use crate::session::{Action, Debouncer, Key, SearchSession, post_route};

enum Input {
    Key(Key),
    Quit,
    Query(String),
}

fn parse_line(line: &str) -> Option<Input> {
    match line.trim() {
        ":up" => Some(Input::Key(Key::Up)),
        ":down" => Some(Input::Key(Key::Down)),
        ":enter" => Some(Input::Key(Key::Enter)),
        ":esc" => Some(Input::Key(Key::Escape)),
        ":open" => Some(Input::Key(Key::Open)),
        ":quit" | ":q" => Some(Input::Quit),
        cmd if cmd.starts_with(':') => None,
        _ => Some(Input::Query(line.to_string())),
    }
}

/// Run a session until `:quit` or end of input.
///
/// At end of input a query still waiting on the debounce delay is allowed to
/// fire before returning.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R, W>(
    engine: &QueryEngine,
    config: &Config,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = SearchSession::new();
    session.open();

    let (mut debouncer, mut queries) = Debouncer::<String>::new(config.session.debounce());
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debouncer.flush().await;
                    while let Ok(query) = queries.try_recv() {
                        on_fired(engine, &mut session, &query, config, output).await?;
                    }
                    break;
                };

                match parse_line(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Key(key)) => {
                        if key == Key::Escape {
                            debouncer.cancel();
                        }
                        let action = session.handle_key(key);
                        respond(&session, action, output).await?;
                    }
                    Some(Input::Query(query)) => {
                        session.open();
                        session.set_query(query.clone());
                        if query.trim().is_empty() {
                            debouncer.cancel();
                            session.set_results(Vec::new());
                        } else {
                            debouncer.schedule(query);
                        }
                    }
                    None => {
                        output
                            .write_all(format!("unknown command: {}\n", line.trim()).as_bytes())
                            .await?;
                    }
                }
            }
            Some(query) = queries.recv() => {
                on_fired(engine, &mut session, &query, config, output).await?;
            }
        }
    }

    output.flush().await?;
    Ok(())
}

async fn on_fired<W: AsyncWrite + Unpin>(
    engine: &QueryEngine,
    session: &mut SearchSession,
    query: &str,
    config: &Config,
    output: &mut W,
) -> anyhow::Result<()> {
    // A close or a newer query since scheduling makes this one stale.
    if !session.is_open() || session.query() != query {
        return Ok(());
    }

    let hits = engine.search(query, config.search.limit);
    debug!(query = %query, results = hits.len(), "interactive search");
    session.set_results(hits);
    output.write_all(render(session).as_bytes()).await?;
    Ok(())
}

async fn respond<W: AsyncWrite + Unpin>(
    session: &SearchSession,
    action: Action,
    output: &mut W,
) -> anyhow::Result<()> {
    let text = match action {
        Action::None => return Ok(()),
        Action::Redraw => render(session),
        Action::Close => "closed\n".to_string(),
        Action::Navigate(id) => format!("open {}\n", post_route(&id)),
    };
    output.write_all(text.as_bytes()).await?;
    Ok(())
}

fn render(session: &SearchSession) -> String {
    let query = session.query();
    let mut out = String::new();

    if query.is_empty() {
        out.push_str("Start typing to search posts...\n");
        return out;
    }

    if session.results().is_empty() {
        let _ = writeln!(out, "No posts found for \"{query}\"");
        return out;
    }

    let _ = writeln!(out, "{} result(s) for '{query}'", session.results().len());
    for (i, hit) in session.results().iter().enumerate() {
        let marker = if i == session.selected_index() { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {}. {} ({}, {})\n     {}",
            i + 1,
            render_highlighted(&hit.title, query, "**", "**"),
            hit.id,
            hit.date,
            render_highlighted(&hit.description, query, "**", "**"),
        );
    }
    out
}
