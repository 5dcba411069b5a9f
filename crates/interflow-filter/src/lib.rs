//! Filter state for list screens.
//!
//! - [`state`]: pure filter values and their declared defaults.
//! - [`query`]: query string encoding.
//! - [`location`]: the URL side ([`Location`], [`MemoryLocation`]).
//! - [`cache`]: the per-route persisted cache ([`MemoryCache`], [`FileCache`]).
//! - [`store`]: [`FilterStore`], which keeps the three consistent.

pub mod cache;
pub mod error;
pub mod location;
pub mod query;
pub mod state;
pub mod store;

pub use cache::{FileCache, FilterCache, MemoryCache, default_cache_path};
pub use error::{FilterError, Result};
pub use location::{HistoryEntry, Location, MemoryLocation};
pub use query::{encode_query, parse_query};
pub use state::{ALL, FilterDefaults, FilterState};
pub use store::{FilterStore, InitSource};
