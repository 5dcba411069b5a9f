//! Filter store synchronization with the URL and the persisted cache.

use interflow_filter::{
    ALL, FileCache, FilterCache, FilterDefaults, FilterStore, InitSource, Location, MemoryCache,
    MemoryLocation,
};

const ROUTE: &str = "/besoins";

fn defaults() -> FilterDefaults {
    FilterDefaults::new()
        .with("etat", ALL)
        .with("matiere", "")
        .with("lot", "")
        .with("q", "")
}

fn cache_with(entry: &str) -> MemoryCache {
    let mut cache = MemoryCache::new();
    cache.write(ROUTE, entry).unwrap();
    cache
}

#[test]
fn url_wins_over_cache_and_overwrites_it() {
    let store = FilterStore::open(
        defaults(),
        MemoryLocation::from_url("/besoins?etat=couvert"),
        cache_with(r#"{"etat":"partiel","lot":"L1"}"#),
    );
    assert_eq!(store.source(), InitSource::Url);
    assert_eq!(store.get("etat"), "couvert");
    // Only the URL's values survive; the cached lot is gone.
    assert_eq!(store.get("lot"), "");
    assert_eq!(store.cache().get(ROUTE), Some(r#"{"etat":"couvert"}"#));
}

#[test]
fn url_with_only_defaults_clears_cache() {
    let store = FilterStore::open(
        defaults(),
        MemoryLocation::from_url("/besoins?etat=tous"),
        cache_with(r#"{"etat":"partiel"}"#),
    );
    assert_eq!(store.source(), InitSource::Url);
    assert_eq!(store.get("etat"), ALL);
    assert!(store.cache().get(ROUTE).is_none());
}

#[test]
fn cache_restores_when_url_is_silent() {
    let store = FilterStore::open(
        defaults(),
        MemoryLocation::new(ROUTE, ""),
        cache_with(r#"{"matiere":"H2SO4"}"#),
    );
    assert_eq!(store.source(), InitSource::Cache);
    assert_eq!(store.get("matiere"), "H2SO4");
    assert_eq!(store.get("etat"), ALL);
}

#[test]
fn update_writes_only_deviations_and_replaces_history() {
    let mut store = FilterStore::open(defaults(), MemoryLocation::new(ROUTE, ""), MemoryCache::new());
    store.update("etat", "non_couvert");
    store.update_many([("q", "acide sulfurique"), ("lot", "")]);

    assert_eq!(store.location().query(), "etat=non_couvert&q=acide%20sulfurique");
    assert_eq!(store.location().history_len(), 1);
    assert_eq!(
        store.cache().get(ROUTE),
        Some(r#"{"etat":"non_couvert","q":"acide sulfurique"}"#)
    );
}

#[test]
fn setting_default_removes_key_everywhere() {
    let mut store = FilterStore::open(defaults(), MemoryLocation::new(ROUTE, ""), MemoryCache::new());
    store.update("etat", "partiel");
    assert!(store.cache().get(ROUTE).is_some());

    store.update("etat", ALL);
    assert_eq!(store.location().query(), "");
    assert!(store.cache().get(ROUTE).is_none());

    // Reload without URL parameters: defaults, not the previous value.
    let (_, _, cache) = store.into_parts();
    let reloaded = FilterStore::open(defaults(), MemoryLocation::new(ROUTE, ""), cache);
    assert_eq!(reloaded.source(), InitSource::Defaults);
    assert_eq!(reloaded.get("etat"), ALL);
}

#[test]
fn reset_clears_url_and_cache() {
    let mut store = FilterStore::open(
        defaults(),
        MemoryLocation::from_url("/besoins?etat=couvert&q=x"),
        MemoryCache::new(),
    );
    assert!(store.cache().get(ROUTE).is_some());
    store.reset();
    assert!(store.state().is_default());
    assert_eq!(store.location().url(), ROUTE);
    assert!(store.cache().is_empty());
}

#[test]
fn file_cache_persists_across_stores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filters.json");

    let mut store = FilterStore::open(
        defaults(),
        MemoryLocation::new(ROUTE, ""),
        FileCache::new(&path),
    );
    store.update("matiere", "M63244");
    drop(store);

    let reopened = FilterStore::open(
        defaults(),
        MemoryLocation::new(ROUTE, ""),
        FileCache::new(&path),
    );
    assert_eq!(reopened.source(), InitSource::Cache);
    assert_eq!(reopened.get("matiere"), "M63244");
}

#[test]
fn unreadable_cache_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the cache file should be makes every read fail.
    let path = dir.path().join("filters.json");
    std::fs::create_dir_all(&path).unwrap();

    let mut store = FilterStore::open(
        defaults(),
        MemoryLocation::new(ROUTE, ""),
        FileCache::new(&path),
    );
    assert_eq!(store.source(), InitSource::Defaults);
    // Failing writes are absorbed.
    store.update("etat", "couvert");
    assert_eq!(store.get("etat"), "couvert");
    assert_eq!(store.location().query(), "etat=couvert");
}
