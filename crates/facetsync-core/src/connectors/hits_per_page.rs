//! Hits-per-page connector.
//!
//! Lets the user pick one of a fixed list of page sizes. The choice lives
//! under the `hitsPerPage` key.

use super::decode_integer;
use crate::connector::{Connector, HookPresence, Metadata, NumericRefinement, TransformItems};
use crate::context::Context;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::results::{FacetSearchResults, SearchResults};
use crate::state::{KeyPath, SearchState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

const ID: &str = "hitsPerPage";

/// One configured page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitsPerPageItem {
    pub value: i64,

    /// Display label; components show the value when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl HitsPerPageItem {
    pub fn new(value: i64) -> Self {
        HitsPerPageItem { value, label: None }
    }

    pub fn labeled(value: i64, label: impl Into<String>) -> Self {
        HitsPerPageItem {
            value,
            label: Some(label.into()),
        }
    }
}

/// A page size as displayed, with its selection flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitsPerPageOption {
    pub value: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub is_refined: bool,
}

/// Props provided to a hits-per-page component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitsPerPageProps {
    pub items: Vec<HitsPerPageOption>,
    pub current_refinement: i64,
}

/// Hits-per-page widget configuration.
#[derive(Clone)]
pub struct HitsPerPage {
    default_refinement: i64,
    items: Vec<HitsPerPageItem>,
    transform_items: Option<TransformItems<HitsPerPageOption>>,
}

impl fmt::Debug for HitsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitsPerPage")
            .field("default_refinement", &self.default_refinement)
            .field("items", &self.items)
            .field("transform_items", &HookPresence(self.transform_items.is_some()))
            .finish()
    }
}

impl HitsPerPage {
    /// Create a connector offering `items`, selecting `default_refinement`
    /// until the user picks another size.
    pub fn new(default_refinement: i64, items: Vec<HitsPerPageItem>) -> Self {
        HitsPerPage {
            default_refinement,
            items,
            transform_items: None,
        }
    }

    /// Post-process the display items before they are provided
    pub fn with_transform_items<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<HitsPerPageOption>) -> Vec<HitsPerPageOption> + Send + Sync + 'static,
    {
        self.transform_items = Some(Arc::new(transform));
        self
    }

    fn path(&self, ctx: &Context) -> KeyPath {
        KeyPath::resolve(ctx, None, ID)
    }
}

impl Connector for HitsPerPage {
    type Refinement = NumericRefinement;
    type Current = i64;
    type Props = HitsPerPageProps;

    fn id(&self) -> &str {
        ID
    }

    fn current_refinement(&self, state: &SearchState, ctx: &Context) -> i64 {
        decode_integer(state, &self.path(ctx)).unwrap_or(self.default_refinement)
    }

    fn provided_props(
        &self,
        state: &SearchState,
        _results: &SearchResults,
        _facet_search: Option<&FacetSearchResults>,
        ctx: &Context,
    ) -> Option<HitsPerPageProps> {
        let current_refinement = self.current_refinement(state, ctx);
        let items: Vec<HitsPerPageOption> = self
            .items
            .iter()
            .map(|item| HitsPerPageOption {
                value: item.value,
                label: item.label.clone(),
                is_refined: item.value == current_refinement,
            })
            .collect();

        let items = match &self.transform_items {
            Some(transform) => transform(items),
            None => items,
        };

        Some(HitsPerPageProps {
            items,
            current_refinement,
        })
    }

    fn refine(&self, state: &SearchState, next: NumericRefinement, ctx: &Context) -> SearchState {
        let path = self.path(ctx);
        debug!(path = %path, hits_per_page = ?next, "Refining hits per page");
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
        Ok(params.set_hits_per_page(self.current_refinement(state, ctx)))
    }

    fn metadata(&self, _state: &SearchState, _ctx: &Context) -> Metadata {
        Metadata::id_only(ID)
    }
}
