//! Search results as seen by widgets.
//!
//! Results are owned by the search-execution layer; widgets only read them.
//! [`IndexResults`] is the per-index contract (facet lookup, sorted facet
//! values, page count). [`IndexSnapshot`] is a JSON-deserializable
//! implementation used by the runner and in tests.
//!
//! Missing results are normal: the engine may not have answered yet, or a
//! facet may not be configured on the backend. Lookups return `None` and
//! widgets degrade accordingly.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A facet as returned by the engine: value -> count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    /// Attribute name
    pub name: String,

    /// Hit count per facet value
    #[serde(default)]
    pub data: BTreeMap<String, u64>,

    /// Values currently refined on this facet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refined: Vec<String>,
}

impl Facet {
    /// Create a facet with no values
    pub fn new(name: impl Into<String>) -> Self {
        Facet {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a value with its count
    pub fn with_value(mut self, value: impl Into<String>, count: u64) -> Self {
        self.data.insert(value.into(), count);
        self
    }

    /// Mark a value as refined
    pub fn with_refined(mut self, value: impl Into<String>) -> Self {
        self.refined.push(value.into());
        self
    }
}

/// One facet value with its count and refinement status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetValue {
    pub name: String,
    pub count: u64,
    pub is_refined: bool,
}

/// Sort criterion for facet values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetSort {
    /// Refined values first
    IsRefinedDesc,
    /// Highest count first
    CountDesc,
    /// Alphabetical by value
    NameAsc,
}

impl FacetSort {
    /// Compare two facet values on this criterion alone
    pub fn compare(&self, a: &FacetValue, b: &FacetValue) -> Ordering {
        match self {
            FacetSort::IsRefinedDesc => b.is_refined.cmp(&a.is_refined),
            FacetSort::CountDesc => b.count.cmp(&a.count),
            FacetSort::NameAsc => a.name.cmp(&b.name),
        }
    }
}

/// Sort facet values by a list of criteria, earlier criteria first.
pub fn sort_facet_values(values: &mut [FacetValue], sort_by: &[FacetSort]) {
    values.sort_by(|a, b| {
        sort_by
            .iter()
            .map(|criterion| criterion.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Results of one index, as read by widgets.
pub trait IndexResults: Send + Sync + fmt::Debug {
    /// Total number of result pages
    fn nb_pages(&self) -> u32;

    /// The facet with this attribute name, if the engine returned it
    fn facet_by_name(&self, name: &str) -> Option<&Facet>;

    /// Values of a facet, sorted by the given criteria.
    ///
    /// Returns an empty list for unknown facets.
    fn facet_values(&self, name: &str, sort_by: &[FacetSort]) -> Vec<FacetValue>;
}

/// Deserializable results of one index.
///
/// ```json
/// {"nbPages": 12, "facets": [{"name": "brand", "data": {"Apple": 40}}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexSnapshot {
    pub nb_pages: u32,
    pub facets: Vec<Facet>,
}

impl IndexSnapshot {
    /// Create a snapshot with the given page count
    pub fn new(nb_pages: u32) -> Self {
        IndexSnapshot {
            nb_pages,
            facets: Vec::new(),
        }
    }

    /// Add a facet
    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }
}

impl IndexResults for IndexSnapshot {
    fn nb_pages(&self) -> u32 {
        self.nb_pages
    }

    fn facet_by_name(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    fn facet_values(&self, name: &str, sort_by: &[FacetSort]) -> Vec<FacetValue> {
        let Some(facet) = self.facet_by_name(name) else {
            return Vec::new();
        };

        let mut values: Vec<FacetValue> = facet
            .data
            .iter()
            .map(|(value, count)| FacetValue {
                name: value.clone(),
                count: *count,
                is_refined: facet.refined.iter().any(|r| r == value),
            })
            .collect();
        sort_facet_values(&mut values, sort_by);
        values
    }
}

/// Results of every index in the current search, keyed by index name.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    results: HashMap<String, Arc<dyn IndexResults>>,
}

impl SearchResults {
    /// No results available yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add the results of an index
    pub fn with_index(mut self, index: impl Into<String>, results: impl IndexResults + 'static) -> Self {
        self.results.insert(index.into(), Arc::new(results));
        self
    }

    /// Build from deserialized snapshots
    pub fn from_snapshots(snapshots: HashMap<String, IndexSnapshot>) -> Self {
        let results = snapshots
            .into_iter()
            .map(|(index, snapshot)| (index, Arc::new(snapshot) as Arc<dyn IndexResults>))
            .collect();
        SearchResults { results }
    }

    /// Results of one index, if the engine has answered for it
    pub fn index(&self, index: &str) -> Option<&dyn IndexResults> {
        self.results.get(index).map(|r| &**r)
    }

    /// True if no index has results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Wire shape: `{"results": {"<index>": <IndexSnapshot>}}`, where
/// `results` may be missing entirely.
#[derive(Debug, Default, Deserialize)]
struct RawSearchResults {
    #[serde(default)]
    results: Option<HashMap<String, IndexSnapshot>>,
}

impl<'de> Deserialize<'de> for SearchResults {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawSearchResults::deserialize(deserializer)?;
        Ok(SearchResults::from_snapshots(raw.results.unwrap_or_default()))
    }
}

/// One hit of a search inside facet values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetHit {
    pub value: String,
    /// Value with the matched query highlighted
    pub highlighted: String,
    pub count: u64,
    #[serde(default)]
    pub is_refined: bool,
}

/// Results of searching inside facet values, keyed by attribute.
///
/// ```json
/// {"query": "app", "brand": [{"value": "Apple", "highlighted": "<em>App</em>le", "count": 40}]}
/// ```
///
/// Hits sit next to `query` at the top level, so an attribute literally
/// named `query` cannot carry facet-search hits in this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSearchResults {
    /// The query typed into the facet search box
    #[serde(default)]
    pub query: String,

    #[serde(flatten)]
    pub hits: HashMap<String, Vec<FacetHit>>,
}

impl FacetSearchResults {
    /// Create empty results for a query
    pub fn new(query: impl Into<String>) -> Self {
        FacetSearchResults {
            query: query.into(),
            hits: HashMap::new(),
        }
    }

    /// Add the hits of an attribute
    pub fn with_hits(mut self, attribute: impl Into<String>, hits: Vec<FacetHit>) -> Self {
        self.hits.insert(attribute.into(), hits);
        self
    }

    /// Hits for an attribute, if that attribute was searched
    pub fn hits(&self, attribute: &str) -> Option<&[FacetHit]> {
        self.hits.get(attribute).map(Vec::as_slice)
    }
}

/// Request for a search inside one facet's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSearchRequest {
    pub facet_name: String,
    pub query: String,
}
