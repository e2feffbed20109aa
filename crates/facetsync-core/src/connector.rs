//! The connector lifecycle contract.
//!
//! A connector adapts one widget's concern between the search state, the
//! engine and a presentational component. The hosting runner calls it at
//! fixed points:
//!
//! | lifecycle point | operation                |
//! |-----------------|--------------------------|
//! | render          | `provided_props`         |
//! | user action     | `refine`                 |
//! | before a search | `search_parameters`      |
//! | unmount         | `clean_up`               |
//! | summary render  | `metadata`               |
//! | facet search    | `search_for_facet_values`|
//!
//! Connector values hold the widget configuration (its props). The rendering
//! [`Context`] is passed to every call; nothing is bound implicitly.

use crate::context::Context;
use crate::error::Result;
use crate::params::QueryParameters;
use crate::results::{FacetSearchRequest, FacetSearchResults, SearchResults};
use crate::state::SearchState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Post-processing hook applied to a widget's display items.
pub type TransformItems<T> = Arc<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>;

/// Removal function carried by a metadata item.
pub type ClearRefinement = Arc<dyn Fn(&SearchState) -> SearchState + Send + Sync>;

/// Lifecycle operations shared by every widget kind.
pub trait Connector {
    /// Value the user refines with
    type Refinement;

    /// Decoded current refinement
    type Current;

    /// Props handed to the presentational component
    type Props;

    /// Stable id of this widget in the search state
    fn id(&self) -> &str;

    /// Decode the current refinement from the search state.
    fn current_refinement(&self, state: &SearchState, ctx: &Context) -> Self::Current;

    /// Project state and results into display props.
    ///
    /// `None` means the widget has nothing to render yet.
    fn provided_props(
        &self,
        state: &SearchState,
        results: &SearchResults,
        facet_search: Option<&FacetSearchResults>,
        ctx: &Context,
    ) -> Option<Self::Props>;

    /// Encode a refinement into a new search state.
    fn refine(&self, state: &SearchState, next: Self::Refinement, ctx: &Context) -> SearchState;

    /// Remove this widget's refinement from the search state.
    fn clean_up(&self, state: &SearchState, ctx: &Context) -> SearchState;

    /// Derive the next search request from the current refinement.
    fn search_parameters<P: QueryParameters>(
        &self,
        params: P,
        state: &SearchState,
        ctx: &Context,
    ) -> Result<P>;

    /// Describe active refinements for a summary widget.
    fn metadata(&self, state: &SearchState, ctx: &Context) -> Metadata;

    /// Build a search request inside this widget's facet values.
    fn search_for_facet_values(&self, _query: &str) -> Option<FacetSearchRequest> {
        None
    }
}

/// Refinement value of a numeric widget (page, hits per page).
///
/// Numbers are the normal case. Text is stored as-is: the state may be fed
/// from URL parameters and encode does not validate what it is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericRefinement {
    Number(i64),
    Text(String),
}

impl From<i64> for NumericRefinement {
    fn from(n: i64) -> Self {
        NumericRefinement::Number(n)
    }
}

impl From<&str> for NumericRefinement {
    fn from(s: &str) -> Self {
        NumericRefinement::Text(s.to_string())
    }
}

impl From<String> for NumericRefinement {
    fn from(s: String) -> Self {
        NumericRefinement::Text(s)
    }
}

impl From<NumericRefinement> for Value {
    fn from(refinement: NumericRefinement) -> Self {
        match refinement {
            NumericRefinement::Number(n) => Value::from(n),
            NumericRefinement::Text(s) => Value::String(s),
        }
    }
}

/// Active-refinement summary of one widget.
///
/// Singleton widgets (pagination, hits per page) only register their id and
/// carry no items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MetadataItem>>,
}

impl Metadata {
    /// Metadata that only registers an id
    pub fn id_only(id: impl Into<String>) -> Self {
        Metadata {
            id: id.into(),
            items: None,
        }
    }

    /// Metadata with a list of items
    pub fn with_items(id: impl Into<String>, items: Vec<MetadataItem>) -> Self {
        Metadata {
            id: id.into(),
            items: Some(items),
        }
    }

    /// Items, or an empty slice when the widget registers none
    pub fn items(&self) -> &[MetadataItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}

/// One active refinement, with the function that removes it.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataItem {
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,

    pub current_refinement: String,

    #[serde(skip)]
    value: ClearRefinement,
}

impl MetadataItem {
    /// Create an item whose `clear` delegates to the given function
    pub fn new(
        label: impl Into<String>,
        current_refinement: impl Into<String>,
        value: ClearRefinement,
    ) -> Self {
        MetadataItem {
            label: label.into(),
            attribute_name: None,
            current_refinement: current_refinement.into(),
            value,
        }
    }

    /// Set the attribute this refinement applies to
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute_name = Some(attribute.into());
        self
    }

    /// Return `state` with this refinement removed
    pub fn clear(&self, state: &SearchState) -> SearchState {
        (self.value)(state)
    }
}

impl fmt::Debug for MetadataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataItem")
            .field("label", &self.label)
            .field("attribute_name", &self.attribute_name)
            .field("current_refinement", &self.current_refinement)
            .finish()
    }
}

/// Debug adapter for optional hooks, which have no Debug of their own.
pub(crate) struct HookPresence(pub bool);

impl fmt::Debug for HookPresence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "Some(<fn>)" } else { "None" })
    }
}
