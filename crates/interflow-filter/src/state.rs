//! Pure filter values of a screen.
//!
//! [`FilterState`] is a plain value: every transition returns a new state and
//! nothing here touches the URL or the cache. Synchronization lives in
//! [`FilterStore`](crate::FilterStore).

use std::collections::BTreeMap;

/// Sentinel default of choice filters ("all").
pub const ALL: &str = "tous";

/// Declared filter keys with their default values, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDefaults {
    entries: Vec<(String, String)>,
}

impl FilterDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a key. Re-declaring a key replaces its default.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, default: impl Into<String>) -> Self {
        let key = key.into();
        let default = default.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = default,
            None => self.entries.push((key, default)),
        }
        self
    }

    pub fn default_of(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_declared(&self, key: &str) -> bool {
        self.default_of(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Current value of every declared filter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    defaults: FilterDefaults,
    values: BTreeMap<String, String>,
}

impl FilterState {
    /// All keys at their default.
    pub fn new(defaults: FilterDefaults) -> Self {
        let values = defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { defaults, values }
    }

    /// Defaults overridden by `values`; undeclared keys are dropped.
    pub fn with_values<'a, I>(defaults: FilterDefaults, values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        FilterState::new(defaults).apply(values)
    }

    pub fn defaults(&self) -> &FilterDefaults {
        &self.defaults
    }

    /// Value of a declared key; empty for undeclared keys.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// New state with `changes` applied. Undeclared keys are ignored.
    #[must_use]
    pub fn apply<'a, I>(&self, changes: I) -> FilterState
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut next = self.clone();
        for (key, value) in changes {
            match next.values.get_mut(key) {
                Some(slot) => *slot = value.to_string(),
                None => tracing::warn!(%key, "ignoring undeclared filter key"),
            }
        }
        next
    }

    /// New state with every key back at its default.
    #[must_use]
    pub fn cleared(&self) -> FilterState {
        FilterState::new(self.defaults.clone())
    }

    /// Keys whose value differs from the default. This is the only part of
    /// the state that is ever written to the URL or the cache.
    pub fn deviations(&self) -> BTreeMap<String, String> {
        self.defaults
            .iter()
            .filter_map(|(key, default)| {
                let value = self.get(key);
                (value != default).then(|| (key.to_string(), value.to_string()))
            })
            .collect()
    }

    pub fn is_default(&self) -> bool {
        self.deviations().is_empty()
    }
}
