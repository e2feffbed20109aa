//! Pagination connector.
//!
//! The page lives under the `page` key as a one-indexed number. The search
//! request is zero-indexed, so `search_parameters` always sends
//! `current_refinement - 1`.

use super::decode_integer;
use crate::connector::{Connector, Metadata, NumericRefinement};
use crate::context::Context;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::results::{FacetSearchResults, SearchResults};
use crate::state::{KeyPath, SearchState};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ID: &str = "page";

/// Page used when neither the state nor the widget provides one.
pub const FIRST_PAGE: i64 = 1;

/// Props provided to a pagination component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationProps {
    pub nb_pages: u32,
    pub current_refinement: i64,
    pub can_refine: bool,
}

/// Pagination widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    default_refinement: Option<i64>,
}

impl Pagination {
    /// Create a pagination connector starting on the first page
    pub fn new() -> Self {
        Self::default()
    }

    /// Page shown when the state holds none
    pub fn with_default_refinement(mut self, page: i64) -> Self {
        self.default_refinement = Some(page);
        self
    }

    fn path(&self, ctx: &Context) -> KeyPath {
        KeyPath::resolve(ctx, None, ID)
    }
}

impl Connector for Pagination {
    type Refinement = NumericRefinement;
    type Current = i64;
    type Props = PaginationProps;

    fn id(&self) -> &str {
        ID
    }

    fn current_refinement(&self, state: &SearchState, ctx: &Context) -> i64 {
        decode_integer(state, &self.path(ctx))
            .or(self.default_refinement)
            .unwrap_or(FIRST_PAGE)
    }

    fn provided_props(
        &self,
        state: &SearchState,
        results: &SearchResults,
        _facet_search: Option<&FacetSearchResults>,
        ctx: &Context,
    ) -> Option<PaginationProps> {
        let index = results.index(ctx.resolve_index())?;
        let nb_pages = index.nb_pages();

        Some(PaginationProps {
            nb_pages,
            current_refinement: self.current_refinement(state, ctx),
            can_refine: nb_pages > 1,
        })
    }

    fn refine(&self, state: &SearchState, next: NumericRefinement, ctx: &Context) -> SearchState {
        let path = self.path(ctx);
        debug!(path = %path, page = ?next, "Refining page");
        state.with_value(&path, next.into())
    }

    fn clean_up(&self, state: &SearchState, ctx: &Context) -> SearchState {
        state.without(&self.path(ctx))
    }

    fn search_parameters<P: QueryParameters>(
        &self,
        params: P,
        state: &SearchState,
        ctx: &Context,
    ) -> Result<P> {
        Ok(params.set_page(self.current_refinement(state, ctx).saturating_sub(1)))
    }

    fn metadata(&self, _state: &SearchState, _ctx: &Context) -> Metadata {
        Metadata::id_only(ID)
    }
}
