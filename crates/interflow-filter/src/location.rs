//! The URL side of filter synchronization.

/// Current route and query string of a browsing context.
pub trait Location {
    /// Route path, used as the cache key.
    fn route(&self) -> &str;

    /// Query string without the leading `?`.
    fn query(&self) -> &str;

    /// Rewrite the query string of the current history entry in place.
    ///
    /// Must not add a history entry: filtering never pollutes back navigation.
    fn replace_query(&mut self, query: &str);
}

/// In-memory navigation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocation {
    entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub route: String,
    pub query: String,
}

impl MemoryLocation {
    /// Start a history at `route` with the given query (`?` optional).
    pub fn new(route: impl Into<String>, query: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                route: route.into(),
                query: strip_question_mark(query),
            }],
        }
    }

    /// Parse `/route?query`.
    pub fn from_url(url: &str) -> Self {
        let (route, query) = url.split_once('?').unwrap_or((url, ""));
        Self::new(route, query)
    }

    /// Push a new history entry.
    pub fn navigate(&mut self, route: impl Into<String>, query: &str) {
        self.entries.push(HistoryEntry {
            route: route.into(),
            query: strip_question_mark(query),
        });
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// `/route` or `/route?query`.
    pub fn url(&self) -> String {
        let query = self.query();
        if query.is_empty() {
            self.route().to_string()
        } else {
            format!("{}?{}", self.route(), query)
        }
    }

    fn current(&self) -> &HistoryEntry {
        // `new` seeds one entry and nothing ever removes one.
        &self.entries[self.entries.len() - 1]
    }
}

impl Location for MemoryLocation {
    fn route(&self) -> &str {
        &self.current().route
    }

    fn query(&self) -> &str {
        &self.current().query
    }

    fn replace_query(&mut self, query: &str) {
        if let Some(entry) = self.entries.last_mut() {
            entry.query = strip_question_mark(query);
        }
    }
}

fn strip_question_mark(query: &str) -> String {
    query.trim().trim_start_matches('?').to_string()
}
