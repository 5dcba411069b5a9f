//! Filter state store: the synchronization boundary between a screen's
//! [`FilterState`] and its URL and persisted cache.
//!
//! # Initialization
//!
//! Exactly one source wins when a store is opened:
//!
//! 1. the URL, as soon as it carries **any** declared key; the cache entry is
//!    then overwritten with the URL's deviations;
//! 2. otherwise the cache entry of the route;
//! 3. otherwise the declared defaults.
//!
//! A cache entry that cannot be read or parsed counts as absent.
//!
//! # Transitions
//!
//! Every [`update`](FilterStore::update), [`update_many`](FilterStore::update_many)
//! and [`reset`](FilterStore::reset) recomputes the full state, then rewrites
//! the query string in place and the cache entry with the non-default keys
//! only (removing the entry when nothing deviates). Writes are
//! fire-and-forget: a failing cache is logged, never surfaced.

use std::collections::BTreeMap;

use crate::cache::FilterCache;
use crate::location::Location;
use crate::query::{encode_query, parse_query};
use crate::state::{FilterDefaults, FilterState};

/// Which source provided the initial filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSource {
    Url,
    Cache,
    Defaults,
}

impl InitSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitSource::Url => "url",
            InitSource::Cache => "cache",
            InitSource::Defaults => "defaults",
        }
    }
}

pub struct FilterStore<L: Location, C: FilterCache> {
    state: FilterState,
    location: L,
    cache: C,
    source: InitSource,
}

impl<L: Location, C: FilterCache> FilterStore<L, C> {
    /// Open the store for the current route of `location`.
    pub fn open(defaults: FilterDefaults, location: L, cache: C) -> Self {
        let route = location.route().to_string();
        let from_url: Vec<(String, String)> = parse_query(location.query())
            .into_iter()
            .filter(|(key, _)| defaults.is_declared(key))
            .collect();

        let (state, source) = if !from_url.is_empty() {
            let state = FilterState::with_values(
                defaults,
                from_url.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
            (state, InitSource::Url)
        } else {
            match read_cache_entry(&cache, &route) {
                Some(entry) => {
                    let state = FilterState::with_values(
                        defaults,
                        entry.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                    );
                    (state, InitSource::Cache)
                }
                None => (FilterState::new(defaults), InitSource::Defaults),
            }
        };

        let mut store = Self {
            state,
            location,
            cache,
            source,
        };
        if source == InitSource::Url {
            // The URL is authoritative: overwrite whatever the cache held.
            store.write_cache();
        }
        tracing::debug!(
            route = %route,
            source = ?store.source,
            deviations = store.state.deviations().len(),
            "opened filter store"
        );
        store
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        self.state.values()
    }

    pub fn get(&self, key: &str) -> &str {
        self.state.get(key)
    }

    pub fn source(&self) -> InitSource {
        self.source
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn into_parts(self) -> (FilterState, L, C) {
        (self.state, self.location, self.cache)
    }

    /// Set one filter value.
    pub fn update(&mut self, key: &str, value: &str) {
        self.update_many([(key, value)]);
    }

    /// Set several filter values in one transition.
    pub fn update_many<'a, I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.state = self.state.apply(changes);
        self.sync();
    }

    /// Restore the defaults, clear the query string and drop the cache entry.
    pub fn reset(&mut self) {
        self.state = self.state.cleared();
        self.location.replace_query("");
        let route = self.location.route().to_string();
        if let Err(error) = self.cache.remove(&route) {
            tracing::warn!(%route, %error, "failed to clear filter cache entry");
        }
    }

    fn sync(&mut self) {
        let deviations = self.state.deviations();
        let query = encode_query(deviations.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        self.location.replace_query(&query);
        self.write_cache();
    }

    fn write_cache(&mut self) {
        let route = self.location.route().to_string();
        let deviations = self.state.deviations();
        let result = if deviations.is_empty() {
            self.cache.remove(&route)
        } else {
            match serde_json::to_string(&deviations) {
                Ok(entry) => self.cache.write(&route, &entry),
                Err(source) => Err(crate::FilterError::Serialization { source }),
            }
        };
        if let Err(error) = result {
            tracing::warn!(%route, %error, "failed to persist filters");
        }
    }
}

/// Parsed cache entry of `route`, or `None` when absent or unusable.
fn read_cache_entry<C: FilterCache>(cache: &C, route: &str) -> Option<BTreeMap<String, String>> {
    let raw = match cache.read(route) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!(%route, %error, "failed to read filter cache, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entry) => Some(entry),
        Err(error) => {
            tracing::warn!(%route, %error, "corrupt filter cache entry, using defaults");
            None
        }
    }
}
