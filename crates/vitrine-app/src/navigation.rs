//! Navigation interface.
//!
//! The variant selector round-trips option selections through the
//! location's path and query string; this trait is the seam to
//! whatever owns the real location bar. [`MemoryNavigation`] backs
//! tests and server-rendered previews.

use vitrine_commerce::catalog::{ProductOption, SelectedOption};
use vitrine_commerce::selection::parse_selected_options;

/// A location: path plus query string (no scheme or host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path component, e.g. `/products/snowboard`.
    pub path: String,
    /// Query string without the leading `?`, possibly empty.
    pub query: String,
}

impl Location {
    /// Split a navigable target like `/products/x?Size=L` into parts.
    pub fn parse(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: query.to_string(),
            },
            None => Self {
                path: target.to_string(),
                query: String::new(),
            },
        }
    }

    /// The selected-options map encoded in this location's query,
    /// restricted to recognized option names.
    pub fn selected_options(&self, definitions: &[ProductOption]) -> Vec<SelectedOption> {
        parse_selected_options(&self.query, definitions)
    }
}

/// Read/write access to the current location.
pub trait Navigation {
    /// The current location.
    fn location(&self) -> Location;

    /// Navigate to a path-plus-query target.
    fn navigate(&mut self, target: &str);
}

/// In-memory navigation with history, for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryNavigation {
    history: Vec<Location>,
}

impl MemoryNavigation {
    /// Start at `/`.
    pub fn new() -> Self {
        Self {
            history: vec![Location::parse("/")],
        }
    }

    /// Start at an arbitrary location.
    pub fn starting_at(target: &str) -> Self {
        Self {
            history: vec![Location::parse(target)],
        }
    }

    /// Visited locations, oldest first.
    pub fn history(&self) -> &[Location] {
        &self.history
    }
}

impl Navigation for MemoryNavigation {
    fn location(&self) -> Location {
        self.history
            .last()
            .cloned()
            .unwrap_or_else(|| Location::parse("/"))
    }

    fn navigate(&mut self, target: &str) {
        self.history.push(Location::parse(target));
    }
}
