//! Interactive search session state.
//!
//! Holds what the search surface shows: whether it is open, the current
//! query, the ranked results and the highlighted row. The search core stays
//! stateless; everything temporal lives here and in [`Debouncer`].

pub mod debounce;
pub mod interactive;

pub use debounce::Debouncer;

use crate::search::SearchHit;

/// Keys the search surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Global shortcut that opens the surface.
    Open,
    Escape,
    Up,
    Down,
    Enter,
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Re-render the result list.
    Redraw,
    /// The surface was closed and cleared.
    Close,
    /// Navigate to the post with this id; the surface is already closed.
    Navigate(String),
}

/// Route a post id is served at.
#[must_use]
pub fn post_route(id: &str) -> String {
    format!("/blog/{id}/")
}

#[derive(Debug, Default)]
pub struct SearchSession {
    open: bool,
    query: String,
    results: Vec<SearchHit>,
    selected: usize,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected(&self) -> Option<&SearchHit> {
        self.results.get(self.selected)
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Record the text typed so far. Results are updated separately once the
    /// debounced query has run.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Install a fresh result list and highlight its first row.
    pub fn set_results(&mut self, results: Vec<SearchHit>) {
        self.results = results;
        self.selected = 0;
    }

    /// Close the surface and clear query, results and selection.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.results.clear();
        self.selected = 0;
    }

    pub fn move_down(&mut self) {
        let last = self.results.len().saturating_sub(1);
        self.selected = (self.selected + 1).min(last);
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn handle_key(&mut self, key: Key) -> Action {
        match key {
            Key::Open => {
                self.open();
                Action::Redraw
            }
            Key::Escape => {
                self.close();
                Action::Close
            }
            _ if !self.open => Action::None,
            Key::Down => {
                self.move_down();
                Action::Redraw
            }
            Key::Up => {
                self.move_up();
                Action::Redraw
            }
            Key::Enter => match self.selected() {
                Some(hit) => {
                    let id = hit.id.clone();
                    self.close();
                    Action::Navigate(id)
                }
                None => Action::None,
            },
        }
    }
}
