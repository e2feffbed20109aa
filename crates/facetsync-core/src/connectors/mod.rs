//! Connector implementations, one per widget kind.
//!
//! - **HitsPerPage** (`hits_per_page`): choose how many hits a page holds
//! - **Menu** (`menu`): single-select refinement on one facet attribute
//! - **Pagination** (`pagination`): one-indexed page selection

pub mod hits_per_page;
pub mod menu;
pub mod pagination;

#[cfg(test)]
mod proptests;

pub use hits_per_page::{HitsPerPage, HitsPerPageItem, HitsPerPageOption, HitsPerPageProps};
pub use menu::{Menu, MenuItem, MenuProps};
pub use pagination::{Pagination, PaginationProps};

use crate::state::{parse_integer, KeyPath, SearchState};
use tracing::warn;

/// Decode a numeric refinement stored at `path`.
///
/// Returns `None` when the key is absent or holds something that is not an
/// integer; the caller then falls back to its default.
pub(crate) fn decode_integer(state: &SearchState, path: &KeyPath) -> Option<i64> {
    let value = state.get(path)?;
    let parsed = parse_integer(value);
    if parsed.is_none() {
        warn!(path = %path, value = %value, "Ignoring non-numeric refinement in search state");
    }
    parsed
}
