//! The inventory grid pipeline
//!
//! Pure, synchronous functions; nothing here performs I/O.

pub mod expansion;
pub mod filter;
pub mod grouping;
pub mod pagination;
pub mod size;
pub mod sort;
pub mod state;
pub mod totals;

pub use expansion::ExpansionState;
pub use filter::{apply, FilterField, FilterState};
pub use grouping::{group, GroupField, GroupKey, GroupKeyFields, GroupSummary, ProductGroup};
pub use pagination::{page_window, paginate, Page, PageLink, PageSize, DEFAULT_PAGE_SIZE};
pub use size::{compare_sizes, normalize_size, size_rank, CANONICAL_SIZES};
pub use sort::{sort, sort_in_place, SortDirection, SortKey, SortState, Sortable};
pub use state::{DisplayMode, GridRow, GridState, GridView};
pub use totals::{group_totals, totals, Totals};
