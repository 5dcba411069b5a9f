//! Sorting for list screens.
//!
//! - [`compare`]: the type-aware comparator every sort goes through.
//! - [`column`]: sortable column declarations with optional tie-break.
//! - [`state`]: the tri-state (ascending, descending, unsorted) sort state.
//! - [`engine`]: the stable multi-key sort itself.

pub mod column;
pub mod compare;
pub mod engine;
pub mod state;

pub use column::{ColumnDecl, ColumnSpec, TieBreak, columns_from_decls};
pub use compare::{FieldValue, NullPlacement, SortKey, SortType, compare, natural_cmp};
pub use engine::{SortFields, SortOptions, sort, sort_with_options, sorted_indices};
pub use state::{SortDirection, SortState};
