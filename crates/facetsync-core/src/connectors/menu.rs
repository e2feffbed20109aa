//! Menu connector: single-select refinement on one facet attribute.
//!
//! Menu refinements are grouped under the `menu` namespace, keyed by
//! attribute, so independent menus never collide:
//!
//! ```json
//! {"menu": {"brand": "Apple", "category": ""}}
//! ```
//!
//! An empty string means "explicitly cleared" and decodes to no refinement.
//! Every item's `value` is the refinement to apply when it is clicked:
//! selecting the already-selected value produces the empty string, so the
//! same click toggles it off.

use crate::connector::{
    ClearRefinement, Connector, HookPresence, Metadata, MetadataItem, TransformItems,
};
use crate::context::Context;
use crate::error::Result;
use crate::params::{ParameterUpdate, QueryParameters};
use crate::results::{FacetSearchRequest, FacetSearchResults, FacetSort, SearchResults};
use crate::state::{KeyPath, SearchState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Namespace holding every menu refinement.
pub const NAMESPACE: &str = "menu";

/// Default number of items shown.
pub const DEFAULT_LIMIT_MIN: u32 = 10;

/// Default number of items shown once "show more" is expanded.
pub const DEFAULT_LIMIT_MAX: u32 = 20;

const SORT_BY: [FacetSort; 2] = [FacetSort::CountDesc, FacetSort::NameAsc];

/// Order used by search-box menus, refined values first.
const SEARCH_BOX_SORT_BY: [FacetSort; 3] =
    [FacetSort::IsRefinedDesc, FacetSort::CountDesc, FacetSort::NameAsc];

/// One facet value as displayed by a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,

    /// Refinement to apply when this item is selected (empty = clear)
    pub value: String,

    pub count: u64,

    pub is_refined: bool,

    /// Highlighted label, only for items from a facet-value search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
}

/// Props provided to a menu component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProps {
    pub items: Vec<MenuItem>,
    pub current_refinement: Option<String>,
    pub is_from_search: bool,
    pub with_search_box: bool,
    pub can_refine: bool,
}

/// Menu widget configuration.
#[derive(Clone)]
pub struct Menu {
    attribute_name: String,
    show_more: bool,
    limit_min: u32,
    limit_max: u32,
    default_refinement: Option<String>,
    with_search_box: bool,
    transform_items: Option<TransformItems<MenuItem>>,
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("attribute_name", &self.attribute_name)
            .field("show_more", &self.show_more)
            .field("limit_min", &self.limit_min)
            .field("limit_max", &self.limit_max)
            .field("default_refinement", &self.default_refinement)
            .field("with_search_box", &self.with_search_box)
            .field("transform_items", &HookPresence(self.transform_items.is_some()))
            .finish()
    }
}

impl Menu {
    /// Create a menu on the given facet attribute
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Menu {
            attribute_name: attribute_name.into(),
            show_more: false,
            limit_min: DEFAULT_LIMIT_MIN,
            limit_max: DEFAULT_LIMIT_MAX,
            default_refinement: None,
            with_search_box: false,
            transform_items: None,
        }
    }

    /// Show `limit_max` items instead of `limit_min`
    pub fn with_show_more(mut self, show_more: bool) -> Self {
        self.show_more = show_more;
        self
    }

    /// Set the collapsed and expanded item limits
    pub fn with_limits(mut self, limit_min: u32, limit_max: u32) -> Self {
        self.limit_min = limit_min;
        self.limit_max = limit_max;
        self
    }

    /// Value selected when the state holds no refinement.
    ///
    /// An empty default means no default.
    pub fn with_default_refinement(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.default_refinement = (!value.is_empty()).then_some(value);
        self
    }

    /// Enable searching inside facet values
    pub fn with_search_box(mut self, enabled: bool) -> Self {
        self.with_search_box = enabled;
        self
    }

    /// Post-process the display items before truncation
    pub fn with_transform_items<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<MenuItem>) -> Vec<MenuItem> + Send + Sync + 'static,
    {
        self.transform_items = Some(Arc::new(transform));
        self
    }

    /// Number of items currently shown
    pub fn limit(&self) -> u32 {
        if self.show_more {
            self.limit_max
        } else {
            self.limit_min
        }
    }

    fn path(&self, ctx: &Context) -> KeyPath {
        KeyPath::resolve(ctx, Some(NAMESPACE), self.attribute_name.as_str())
    }

    fn sort_by(&self) -> &'static [FacetSort] {
        if self.with_search_box {
            &SEARCH_BOX_SORT_BY
        } else {
            &SORT_BY
        }
    }

    /// Refinement applied when the item `name` is selected.
    fn toggle_value(&self, name: &str, current: Option<&str>) -> String {
        if current == Some(name) {
            String::new()
        } else {
            name.to_string()
        }
    }

    fn items_from_results(
        &self,
        results: &SearchResults,
        facet_search: Option<&FacetSearchResults>,
        current: Option<&str>,
        ctx: &Context,
    ) -> Vec<MenuItem> {
        if let Some(hits) = facet_search.and_then(|r| r.hits(&self.attribute_name)) {
            return hits
                .iter()
                .map(|hit| MenuItem {
                    label: hit.value.clone(),
                    value: self.toggle_value(&hit.value, current),
                    count: hit.count,
                    is_refined: hit.is_refined,
                    highlighted: Some(hit.highlighted.clone()),
                })
                .collect();
        }

        results
            .index(ctx.resolve_index())
            .map(|index| index.facet_values(&self.attribute_name, self.sort_by()))
            .unwrap_or_default()
            .into_iter()
            .map(|v| MenuItem {
                value: self.toggle_value(&v.name, current),
                label: v.name,
                count: v.count,
                is_refined: v.is_refined,
                highlighted: None,
            })
            .collect()
    }
}

impl Connector for Menu {
    type Refinement = Option<String>;
    type Current = Option<String>;
    type Props = MenuProps;

    fn id(&self) -> &str {
        &self.attribute_name
    }

    fn current_refinement(&self, state: &SearchState, ctx: &Context) -> Option<String> {
        match state.get(&self.path(ctx)) {
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) => None,
            Some(other) => Some(other.to_string()),
            None => self.default_refinement.clone(),
        }
    }

    fn provided_props(
        &self,
        state: &SearchState,
        results: &SearchResults,
        facet_search: Option<&FacetSearchResults>,
        ctx: &Context,
    ) -> Option<MenuProps> {
        let current_refinement = self.current_refinement(state, ctx);

        let has_facet = results
            .index(ctx.resolve_index())
            .and_then(|index| index.facet_by_name(&self.attribute_name))
            .is_some();

        // Search hits without the facet itself are ignored.
        if !has_facet {
            return Some(MenuProps {
                items: Vec::new(),
                current_refinement,
                is_from_search: false,
                with_search_box: self.with_search_box,
                can_refine: false,
            });
        }

        let is_from_search = facet_search
            .map_or(false, |r| r.hits(&self.attribute_name).is_some() && !r.query.is_empty());

        let facet_search = facet_search.filter(|_| is_from_search);
        let items =
            self.items_from_results(results, facet_search, current_refinement.as_deref(), ctx);

        let mut items = match &self.transform_items {
            Some(transform) => transform(items),
            None => items,
        };
        let can_refine = !items.is_empty();
        items.truncate(self.limit() as usize);

        Some(MenuProps {
            items,
            current_refinement,
            is_from_search,
            with_search_box: self.with_search_box,
            can_refine,
        })
    }

    fn refine(&self, state: &SearchState, next: Option<String>, ctx: &Context) -> SearchState {
        let path = self.path(ctx);
        let stored = next.filter(|value| !value.is_empty()).unwrap_or_default();
        debug!(path = %path, value = %stored, "Refining menu");
        state.with_value(&path, Value::String(stored))
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
        let max_values = params.max_values_per_facet().unwrap_or(0).max(self.limit());
        let params = params
            .set_query_parameters(ParameterUpdate::max_values_per_facet(max_values))
            .add_disjunctive_facet(&self.attribute_name);

        match self.current_refinement(state, ctx) {
            Some(refinement) => {
                params.add_disjunctive_facet_refinement(&self.attribute_name, &refinement)
            }
            None => Ok(params),
        }
    }

    fn metadata(&self, state: &SearchState, ctx: &Context) -> Metadata {
        let Some(current) = self.current_refinement(state, ctx) else {
            return Metadata::with_items(self.attribute_name.clone(), Vec::new());
        };

        let menu = self.clone();
        let scope = ctx.clone();
        let clear: ClearRefinement = Arc::new(move |next: &SearchState| menu.refine(next, None, &scope));

        let item = MetadataItem::new(
            format!("{}: {}", self.attribute_name, current),
            current,
            clear,
        )
        .with_attribute(self.attribute_name.clone());

        Metadata::with_items(self.attribute_name.clone(), vec![item])
    }

    fn search_for_facet_values(&self, query: &str) -> Option<FacetSearchRequest> {
        Some(FacetSearchRequest {
            facet_name: self.attribute_name.clone(),
            query: query.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FacetSyncError;
    use crate::params::SearchParameters;
    use crate::results::{Facet, FacetHit, IndexSnapshot};
    use serde_json::json;

    fn state(value: Value) -> SearchState {
        SearchState::from_json(value).unwrap()
    }

    fn results() -> SearchResults {
        let facet = Facet::new("brand")
            .with_value("Samsung", 10)
            .with_value("Apple", 10)
            .with_value("Sony", 30)
            .with_value("LG", 5)
            .with_refined("LG");
        SearchResults::empty().with_index("index", IndexSnapshot::new(2).with_facet(facet))
    }

    fn labels(props: &MenuProps) -> Vec<&str> {
        props.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_current_refinement() {
        let ctx = Context::single("index");
        let menu = Menu::new("brand");

        assert_eq!(menu.current_refinement(&state(json!({})), &ctx), None);
        assert_eq!(
            menu.current_refinement(&state(json!({"menu": {"brand": "Apple"}})), &ctx),
            Some("Apple".to_string())
        );
        assert_eq!(
            menu.current_refinement(&state(json!({"menu": {"brand": ""}})), &ctx),
            None
        );

        let menu = menu.with_default_refinement("Sony");
        assert_eq!(
            menu.current_refinement(&state(json!({})), &ctx),
            Some("Sony".to_string())
        );
        // An explicit clear wins over the default
        assert_eq!(
            menu.current_refinement(&state(json!({"menu": {"brand": ""}})), &ctx),
            None
        );
    }

    #[test]
    fn test_items_sorted_by_count_then_name() {
        let ctx = Context::single("index");
        let props = Menu::new("brand")
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();

        assert_eq!(labels(&props), ["Sony", "Apple", "Samsung", "LG"]);
        assert!(props.can_refine);
        assert!(!props.is_from_search);
        assert_eq!(props.items[0].value, "Sony");
    }

    #[test]
    fn test_selected_item_toggles_off() {
        let ctx = Context::single("index");
        let menu = Menu::new("brand");
        let selected = state(json!({"menu": {"brand": "Apple"}}));

        let props = menu.provided_props(&selected, &results(), None, &ctx).unwrap();
        let apple = props.items.iter().find(|i| i.label == "Apple").unwrap();
        assert_eq!(apple.value, "");

        let next = menu.refine(&selected, Some(apple.value.clone()), &ctx);
        assert_eq!(next, state(json!({"menu": {"brand": ""}})));
        assert_eq!(menu.current_refinement(&next, &ctx), None);
    }

    #[test]
    fn test_refine_none_stores_empty_string() {
        let ctx = Context::single("index");
        let next = Menu::new("brand").refine(&state(json!({"page": 2})), None, &ctx);
        assert_eq!(next, state(json!({"page": 2, "menu": {"brand": ""}})));
    }

    #[test]
    fn test_refine_keeps_other_menus() {
        let ctx = Context::single("index");
        let next = Menu::new("brand").refine(
            &state(json!({"menu": {"category": "TV"}})),
            Some("Sony".to_string()),
            &ctx,
        );
        assert_eq!(next, state(json!({"menu": {"category": "TV", "brand": "Sony"}})));
    }

    #[test]
    fn test_limits() {
        let ctx = Context::single("index");
        let props = Menu::new("brand")
            .with_limits(2, 3)
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();
        assert_eq!(labels(&props), ["Sony", "Apple"]);

        let props = Menu::new("brand")
            .with_limits(2, 3)
            .with_show_more(true)
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();
        assert_eq!(labels(&props), ["Sony", "Apple", "Samsung"]);
    }

    #[test]
    fn test_search_box_puts_refined_first() {
        let ctx = Context::single("index");
        let props = Menu::new("brand")
            .with_search_box(true)
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();

        assert_eq!(labels(&props), ["LG", "Sony", "Apple", "Samsung"]);
        assert!(props.with_search_box);
    }

    #[test]
    fn test_items_from_facet_search() {
        let ctx = Context::single("index");
        let facet_search = FacetSearchResults::new("sa").with_hits(
            "brand",
            vec![FacetHit {
                value: "Samsung".to_string(),
                highlighted: "<em>Sa</em>msung".to_string(),
                count: 10,
                is_refined: false,
            }],
        );

        let props = Menu::new("brand")
            .with_search_box(true)
            .provided_props(
                &state(json!({"menu": {"brand": "Samsung"}})),
                &results(),
                Some(&facet_search),
                &ctx,
            )
            .unwrap();

        assert!(props.is_from_search);
        assert_eq!(props.items.len(), 1);
        assert_eq!(props.items[0].value, "");
        assert_eq!(props.items[0].highlighted.as_deref(), Some("<em>Sa</em>msung"));
    }

    #[test]
    fn test_empty_facet_search_query_uses_results() {
        let ctx = Context::single("index");
        let facet_search = FacetSearchResults::new("").with_hits("brand", Vec::new());

        let props = Menu::new("brand")
            .provided_props(&state(json!({})), &results(), Some(&facet_search), &ctx)
            .unwrap();

        assert!(!props.is_from_search);
        assert_eq!(props.items.len(), 4);
    }

    #[test]
    fn test_missing_facet_degrades() {
        let ctx = Context::single("index");
        let menu = Menu::new("color").with_default_refinement("red");

        let props = menu
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();
        assert_eq!(
            props,
            MenuProps {
                items: Vec::new(),
                current_refinement: Some("red".to_string()),
                is_from_search: false,
                with_search_box: false,
                can_refine: false,
            }
        );

        let props = menu
            .provided_props(&state(json!({})), &SearchResults::empty(), None, &ctx)
            .unwrap();
        assert!(!props.can_refine);
    }

    #[test]
    fn test_missing_facet_ignores_facet_search() {
        let ctx = Context::single("index");
        let colors = SearchResults::empty().with_index(
            "index",
            IndexSnapshot::new(1).with_facet(Facet::new("color").with_value("red", 3)),
        );
        let facet_search = FacetSearchResults::new("sa").with_hits(
            "brand",
            vec![FacetHit {
                value: "Samsung".to_string(),
                highlighted: "<em>Sa</em>msung".to_string(),
                count: 10,
                is_refined: false,
            }],
        );

        let props = Menu::new("brand")
            .with_search_box(true)
            .provided_props(&state(json!({})), &colors, Some(&facet_search), &ctx)
            .unwrap();

        assert!(props.items.is_empty());
        assert!(!props.is_from_search);
        assert!(!props.can_refine);
        assert!(props.with_search_box);
    }

    #[test]
    fn test_transform_items_drives_can_refine() {
        let ctx = Context::single("index");
        let props = Menu::new("brand")
            .with_transform_items(|_| Vec::new())
            .provided_props(&state(json!({})), &results(), None, &ctx)
            .unwrap();
        assert!(props.items.is_empty());
        assert!(!props.can_refine);
    }

    #[test]
    fn test_search_parameters() {
        let ctx = Context::single("index");
        let menu = Menu::new("brand");

        let params = menu
            .search_parameters(SearchParameters::new(), &state(json!({})), &ctx)
            .unwrap();
        assert_eq!(params.max_values_per_facet, Some(10));
        assert!(params.is_disjunctive_facet("brand"));
        assert!(params.disjunctive_refinements("brand").is_empty());

        let params = menu
            .search_parameters(
                SearchParameters::new(),
                &state(json!({"menu": {"brand": "Apple"}})),
                &ctx,
            )
            .unwrap();
        assert_eq!(params.disjunctive_refinements("brand"), ["Apple".to_string()]);
    }

    #[test]
    fn test_search_parameters_keeps_larger_max_values() {
        let ctx = Context::single("index");
        let base = SearchParameters::new()
            .set_query_parameters(ParameterUpdate::max_values_per_facet(100));

        let params = Menu::new("brand")
            .with_show_more(true)
            .search_parameters(base, &state(json!({})), &ctx)
            .unwrap();
        assert_eq!(params.max_values_per_facet, Some(100));
    }

    /// A builder that rejects refinements on undeclared facets surfaces the
    /// error instead of dropping the refinement.
    #[test]
    fn test_search_parameters_propagates_builder_error() {
        #[derive(Debug)]
        struct Strict;

        impl QueryParameters for Strict {
            fn max_values_per_facet(&self) -> Option<u32> {
                None
            }
            fn set_query_parameters(self, _update: ParameterUpdate) -> Self {
                self
            }
            fn set_page(self, _page: i64) -> Self {
                self
            }
            fn set_hits_per_page(self, _hits_per_page: i64) -> Self {
                self
            }
            fn add_disjunctive_facet(self, _attribute: &str) -> Self {
                self
            }
            fn add_disjunctive_facet_refinement(self, attribute: &str, _value: &str) -> Result<Self> {
                Err(FacetSyncError::UndeclaredFacet {
                    attribute: attribute.to_string(),
                })
            }
        }

        let ctx = Context::single("index");
        let menu = Menu::new("brand");
        assert!(menu.search_parameters(Strict, &state(json!({})), &ctx).is_ok());
        assert!(menu
            .search_parameters(Strict, &state(json!({"menu": {"brand": "Apple"}})), &ctx)
            .is_err());
    }

    #[test]
    fn test_metadata() {
        let ctx = Context::single("index");
        let menu = Menu::new("brand");

        let metadata = menu.metadata(&state(json!({})), &ctx);
        assert_eq!(metadata.id, "brand");
        assert_eq!(metadata.items.as_ref().map(Vec::len), Some(0));

        let selected = state(json!({"menu": {"brand": "Apple"}, "page": 3}));
        let metadata = menu.metadata(&selected, &ctx);
        let item = &metadata.items()[0];
        assert_eq!(item.label, "brand: Apple");
        assert_eq!(item.current_refinement, "Apple");
        assert_eq!(item.attribute_name.as_deref(), Some("brand"));

        let cleared = item.clear(&selected);
        assert_eq!(cleared, state(json!({"menu": {"brand": ""}, "page": 3})));
        assert_eq!(menu.current_refinement(&cleared, &ctx), None);
    }

    #[test]
    fn test_clean_up() {
        let ctx = Context::single("index");
        let menu = Menu::new("brand");

        let next = menu.clean_up(&state(json!({"menu": {"brand": "Apple"}, "page": 1})), &ctx);
        assert_eq!(next, state(json!({"page": 1})));

        let next = menu.clean_up(
            &state(json!({"menu": {"brand": "Apple", "category": "TV"}})),
            &ctx,
        );
        assert_eq!(next, state(json!({"menu": {"category": "TV"}})));
    }

    #[test]
    fn test_multi_index() {
        let ctx = Context::multi("second");
        let menu = Menu::new("brand");
        let input = state(json!({
            "indices": {"first": {"menu": {"brand": "Apple"}}},
        }));

        let next = menu.refine(&input, Some("Sony".to_string()), &ctx);
        assert_eq!(
            next,
            state(json!({
                "indices": {
                    "first": {"menu": {"brand": "Apple"}},
                    "second": {"menu": {"brand": "Sony"}},
                },
            }))
        );
        assert_eq!(menu.current_refinement(&next, &ctx), Some("Sony".to_string()));

        let cleaned = menu.clean_up(&next, &ctx);
        assert_eq!(
            cleaned,
            state(json!({
                "indices": {
                    "first": {"menu": {"brand": "Apple"}},
                    "second": {},
                },
            }))
        );
    }

    #[test]
    fn test_search_for_facet_values() {
        let request = Menu::new("brand").search_for_facet_values("app");
        assert_eq!(
            request,
            Some(FacetSearchRequest {
                facet_name: "brand".to_string(),
                query: "app".to_string(),
            })
        );
    }
}
