//! The query-parameter builder contract.
//!
//! Connectors never build a search request from scratch. They receive the
//! request built so far and return a derived one, each call consuming the
//! previous value. [`QueryParameters`] is the contract they rely on;
//! [`SearchParameters`] is a plain implementation used by the runner and in
//! tests, and a host can implement the trait over its own engine client.

use crate::error::{FacetSyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Bulk update applied through [`QueryParameters::set_query_parameters`].
///
/// Only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_values_per_facet: Option<u32>,
}

impl ParameterUpdate {
    /// An update that only sets `maxValuesPerFacet`
    pub fn max_values_per_facet(max: u32) -> Self {
        ParameterUpdate {
            max_values_per_facet: Some(max),
            ..Default::default()
        }
    }
}

/// Chainable derivations of the next search request.
///
/// Pages are zero-indexed on this side of the boundary.
pub trait QueryParameters: Sized {
    /// Current `maxValuesPerFacet`, if one has been set
    fn max_values_per_facet(&self) -> Option<u32>;

    /// Apply a bulk parameter update
    fn set_query_parameters(self, update: ParameterUpdate) -> Self;

    /// Set the zero-indexed page to fetch
    fn set_page(self, page: i64) -> Self;

    /// Set how many hits a page holds
    fn set_hits_per_page(self, hits_per_page: i64) -> Self;

    /// Declare an attribute as a disjunctive (OR-combined) facet
    fn add_disjunctive_facet(self, attribute: &str) -> Self;

    /// Refine a declared disjunctive facet on a value.
    ///
    /// The facet must have been declared with
    /// [`add_disjunctive_facet`](QueryParameters::add_disjunctive_facet)
    /// first.
    fn add_disjunctive_facet_refinement(self, attribute: &str, value: &str) -> Result<Self>;
}

/// Reference implementation of [`QueryParameters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParameters {
    /// Zero-indexed page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Hits per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits_per_page: Option<i64>,

    /// Maximum number of values returned per facet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_values_per_facet: Option<u32>,

    /// Attributes declared as disjunctive facets, in declaration order
    pub disjunctive_facets: Vec<String>,

    /// Refined values per disjunctive facet
    pub disjunctive_facets_refinements: BTreeMap<String, Vec<String>>,
}

impl SearchParameters {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the attribute has been declared as a disjunctive facet
    pub fn is_disjunctive_facet(&self, attribute: &str) -> bool {
        self.disjunctive_facets.iter().any(|f| f == attribute)
    }

    /// Refinements applied to a disjunctive facet
    pub fn disjunctive_refinements(&self, attribute: &str) -> &[String] {
        self.disjunctive_facets_refinements
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl QueryParameters for SearchParameters {
    fn max_values_per_facet(&self) -> Option<u32> {
        self.max_values_per_facet
    }

    fn set_query_parameters(mut self, update: ParameterUpdate) -> Self {
        if let Some(page) = update.page {
            self.page = Some(page);
        }
        if let Some(hits_per_page) = update.hits_per_page {
            self.hits_per_page = Some(hits_per_page);
        }
        if let Some(max) = update.max_values_per_facet {
            self.max_values_per_facet = Some(max);
        }
        self
    }

    fn set_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    fn set_hits_per_page(mut self, hits_per_page: i64) -> Self {
        self.hits_per_page = Some(hits_per_page);
        self
    }

    fn add_disjunctive_facet(mut self, attribute: &str) -> Self {
        if !self.is_disjunctive_facet(attribute) {
            self.disjunctive_facets.push(attribute.to_string());
        }
        self
    }

    fn add_disjunctive_facet_refinement(mut self, attribute: &str, value: &str) -> Result<Self> {
        if !self.is_disjunctive_facet(attribute) {
            return Err(FacetSyncError::UndeclaredFacet {
                attribute: attribute.to_string(),
            });
        }

        let refinements = self
            .disjunctive_facets_refinements
            .entry(attribute.to_string())
            .or_default();
        if !refinements.iter().any(|v| v == value) {
            trace!(attribute, value, "Adding disjunctive refinement");
            refinements.push(value.to_string());
        }
        Ok(self)
    }
}
