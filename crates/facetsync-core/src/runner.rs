//! Generic connector runner.
//!
//! Hosts that drive widgets from configuration (rather than constructing
//! connectors in code) describe each widget as JSON tagged by kind:
//!
//! ```json
//! {"widget": "menu", "attributeName": "brand", "showMore": true}
//! {"widget": "pagination"}
//! {"widget": "hitsPerPage", "defaultRefinement": 10, "items": [{"value": 10}]}
//! ```
//!
//! [`WidgetConfig`] parses that description and [`Widget`] dispatches every
//! lifecycle operation to the matching connector, taking refinements as JSON
//! values.

use crate::config::Config;
use crate::connector::{Connector, Metadata, NumericRefinement};
use crate::connectors::{
    HitsPerPage, HitsPerPageItem, HitsPerPageProps, Menu, MenuProps, Pagination, PaginationProps,
};
use crate::context::Context;
use crate::error::{FacetSyncError, Result};
use crate::params::QueryParameters;
use crate::results::{FacetSearchRequest, FacetSearchResults, SearchResults};
use crate::state::{json_type_name, SearchState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Widget description as found in host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum WidgetConfig {
    HitsPerPage(HitsPerPageOptions),
    Menu(MenuOptions),
    Pagination(PaginationOptions),
}

/// Options of a hits-per-page widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitsPerPageOptions {
    pub default_refinement: i64,
    pub items: Vec<HitsPerPageItem>,
}

/// Options of a menu widget. Unset options fall back to [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuOptions {
    pub attribute_name: String,
    pub show_more: Option<bool>,
    pub limit_min: Option<u32>,
    pub limit_max: Option<u32>,
    pub default_refinement: Option<String>,
    pub with_search_box: Option<bool>,

    /// Deprecated spelling of `withSearchBox`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_for_facet_values: Option<bool>,
}

/// Options of a pagination widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    pub default_refinement: Option<i64>,
}

impl WidgetConfig {
    /// Parse a widget description
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Build the connector, filling unset options from `config`.
    pub fn build(&self, config: &Config) -> Result<Widget> {
        match self {
            WidgetConfig::HitsPerPage(options) => {
                if options.items.is_empty() {
                    return Err(FacetSyncError::InvalidWidget {
                        widget: "hitsPerPage".to_string(),
                        reason: "items must not be empty".to_string(),
                    });
                }
                Ok(Widget::HitsPerPage(HitsPerPage::new(
                    options.default_refinement,
                    options.items.clone(),
                )))
            }
            WidgetConfig::Menu(options) => {
                if options.attribute_name.is_empty() {
                    return Err(FacetSyncError::InvalidWidget {
                        widget: "menu".to_string(),
                        reason: "attributeName is required".to_string(),
                    });
                }

                if options.search_for_facet_values.is_some() {
                    warn!(
                        attribute = %options.attribute_name,
                        "`searchForFacetValues` has been renamed to `withSearchBox`"
                    );
                }

                let defaults = &config.menu;
                let with_search_box = options
                    .with_search_box
                    .or(options.search_for_facet_values)
                    .unwrap_or(defaults.with_search_box);

                let mut menu = Menu::new(options.attribute_name.clone())
                    .with_show_more(options.show_more.unwrap_or(defaults.show_more))
                    .with_limits(
                        options.limit_min.unwrap_or(defaults.limit_min),
                        options.limit_max.unwrap_or(defaults.limit_max),
                    )
                    .with_search_box(with_search_box);
                if let Some(default_refinement) = &options.default_refinement {
                    menu = menu.with_default_refinement(default_refinement.clone());
                }
                Ok(Widget::Menu(menu))
            }
            WidgetConfig::Pagination(options) => {
                let mut pagination = Pagination::new();
                if let Some(page) = options.default_refinement.or(config.pagination.default_page) {
                    pagination = pagination.with_default_refinement(page);
                }
                Ok(Widget::Pagination(pagination))
            }
        }
    }
}

/// A connector of any kind.
#[derive(Debug, Clone)]
pub enum Widget {
    HitsPerPage(HitsPerPage),
    Menu(Menu),
    Pagination(Pagination),
}

/// Props of any widget kind, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProvidedProps {
    HitsPerPage(HitsPerPageProps),
    Menu(MenuProps),
    Pagination(PaginationProps),
}

impl Widget {
    /// Stable id of the widget in the search state
    pub fn id(&self) -> &str {
        match self {
            Widget::HitsPerPage(c) => c.id(),
            Widget::Menu(c) => c.id(),
            Widget::Pagination(c) => c.id(),
        }
    }

    /// Widget kind as used in configuration
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::HitsPerPage(_) => "hitsPerPage",
            Widget::Menu(_) => "menu",
            Widget::Pagination(_) => "pagination",
        }
    }

    /// Props for the component; `None` means "do not render"
    pub fn provided_props(
        &self,
        state: &SearchState,
        results: &SearchResults,
        facet_search: Option<&FacetSearchResults>,
        ctx: &Context,
    ) -> Option<ProvidedProps> {
        match self {
            Widget::HitsPerPage(c) => c
                .provided_props(state, results, facet_search, ctx)
                .map(ProvidedProps::HitsPerPage),
            Widget::Menu(c) => c
                .provided_props(state, results, facet_search, ctx)
                .map(ProvidedProps::Menu),
            Widget::Pagination(c) => c
                .provided_props(state, results, facet_search, ctx)
                .map(ProvidedProps::Pagination),
        }
    }

    /// Apply a JSON refinement value.
    ///
    /// Numeric widgets take numbers or strings (stored unparsed); menus take
    /// strings, scalars (stored as text) or `null` to clear.
    pub fn refine(&self, state: &SearchState, next: &Value, ctx: &Context) -> Result<SearchState> {
        match self {
            Widget::HitsPerPage(c) => Ok(c.refine(state, numeric_refinement(self.kind(), next)?, ctx)),
            Widget::Menu(c) => Ok(c.refine(state, menu_refinement(next)?, ctx)),
            Widget::Pagination(c) => Ok(c.refine(state, numeric_refinement(self.kind(), next)?, ctx)),
        }
    }

    /// Remove the widget's refinement
    pub fn clean_up(&self, state: &SearchState, ctx: &Context) -> SearchState {
        match self {
            Widget::HitsPerPage(c) => c.clean_up(state, ctx),
            Widget::Menu(c) => c.clean_up(state, ctx),
            Widget::Pagination(c) => c.clean_up(state, ctx),
        }
    }

    /// Derive the next search request
    pub fn search_parameters<P: QueryParameters>(
        &self,
        params: P,
        state: &SearchState,
        ctx: &Context,
    ) -> Result<P> {
        match self {
            Widget::HitsPerPage(c) => c.search_parameters(params, state, ctx),
            Widget::Menu(c) => c.search_parameters(params, state, ctx),
            Widget::Pagination(c) => c.search_parameters(params, state, ctx),
        }
    }

    /// Active-refinement summary
    pub fn metadata(&self, state: &SearchState, ctx: &Context) -> Metadata {
        match self {
            Widget::HitsPerPage(c) => c.metadata(state, ctx),
            Widget::Menu(c) => c.metadata(state, ctx),
            Widget::Pagination(c) => c.metadata(state, ctx),
        }
    }

    /// Facet-value search request, for widgets that support one
    pub fn search_for_facet_values(&self, query: &str) -> Option<FacetSearchRequest> {
        match self {
            Widget::HitsPerPage(c) => c.search_for_facet_values(query),
            Widget::Menu(c) => c.search_for_facet_values(query),
            Widget::Pagination(c) => c.search_for_facet_values(query),
        }
    }
}

fn numeric_refinement(widget: &str, value: &Value) -> Result<NumericRefinement> {
    match value {
        Value::Number(n) => n.as_i64().map(NumericRefinement::Number).ok_or_else(|| {
            FacetSyncError::invalid_refinement(widget, format!("{} is not an integer", n))
        }),
        Value::String(s) => Ok(NumericRefinement::Text(s.clone())),
        other => Err(FacetSyncError::invalid_refinement(
            widget,
            format!("expected a number or string, found {}", json_type_name(other)),
        )),
    }
}

fn menu_refinement(value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(FacetSyncError::invalid_refinement(
            "menu",
            format!("expected a facet value, found {}", json_type_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: Value) -> Widget {
        WidgetConfig::from_json(value)
            .unwrap()
            .build(&Config::default())
            .unwrap()
    }

    #[test]
    fn test_parse_widget_configs() {
        let config = WidgetConfig::from_json(json!({"widget": "pagination"})).unwrap();
        assert_eq!(config, WidgetConfig::Pagination(PaginationOptions::default()));

        let config = WidgetConfig::from_json(json!({
            "widget": "menu",
            "attributeName": "brand",
            "showMore": true,
        }))
        .unwrap();
        match config {
            WidgetConfig::Menu(options) => {
                assert_eq!(options.attribute_name, "brand");
                assert_eq!(options.show_more, Some(true));
            }
            other => panic!("unexpected widget config: {:?}", other),
        }

        assert!(WidgetConfig::from_json(json!({"widget": "slider"})).is_err());
    }

    #[test]
    fn test_build_validates() {
        let err = WidgetConfig::from_json(json!({"widget": "menu"}))
            .unwrap()
            .build(&Config::default())
            .unwrap_err();
        assert!(matches!(err, FacetSyncError::InvalidWidget { .. }));

        let err = WidgetConfig::from_json(json!({
            "widget": "hitsPerPage",
            "defaultRefinement": 10,
            "items": [],
        }))
        .unwrap()
        .build(&Config::default())
        .unwrap_err();
        assert!(matches!(err, FacetSyncError::InvalidWidget { .. }));
    }

    #[test]
    fn test_menu_defaults_from_config() {
        let mut config = Config::default();
        config.menu.limit_min = 2;
        config.menu.with_search_box = true;

        let widget = WidgetConfig::from_json(json!({"widget": "menu", "attributeName": "brand"}))
            .unwrap()
            .build(&config)
            .unwrap();
        match widget {
            Widget::Menu(menu) => assert_eq!(menu.limit(), 2),
            other => panic!("unexpected widget: {:?}", other),
        }
    }

    #[test]
    fn test_deprecated_search_for_facet_values() {
        let widget = build(json!({
            "widget": "menu",
            "attributeName": "brand",
            "searchForFacetValues": true,
        }));
        let props = widget
            .provided_props(&SearchState::new(), &SearchResults::empty(), None, &Context::single("index"))
            .unwrap();
        match props {
            ProvidedProps::Menu(props) => assert!(props.with_search_box),
            other => panic!("unexpected props: {:?}", other),
        }
    }

    #[test]
    fn test_pagination_default_from_config() {
        let mut config = Config::default();
        config.pagination.default_page = Some(4);

        let widget = WidgetConfig::from_json(json!({"widget": "pagination"}))
            .unwrap()
            .build(&config)
            .unwrap();
        let params = widget
            .search_parameters(crate::SearchParameters::new(), &SearchState::new(), &Context::single("index"))
            .unwrap();
        assert_eq!(params.page, Some(3));
    }

    #[test]
    fn test_refine_json_values() {
        let ctx = Context::single("index");
        let pagination = build(json!({"widget": "pagination"}));

        let next = pagination.refine(&SearchState::new(), &json!("yep"), &ctx).unwrap();
        assert_eq!(next.get_key("page"), Some(&json!("yep")));

        let next = pagination.refine(&SearchState::new(), &json!(3), &ctx).unwrap();
        assert_eq!(next.get_key("page"), Some(&json!(3)));

        assert!(pagination.refine(&SearchState::new(), &json!(1.5), &ctx).is_err());
        assert!(pagination.refine(&SearchState::new(), &json!(null), &ctx).is_err());

        let menu = build(json!({"widget": "menu", "attributeName": "brand"}));
        let next = menu.refine(&SearchState::new(), &json!(null), &ctx).unwrap();
        assert_eq!(next.get_key("menu"), Some(&json!({"brand": ""})));
        assert!(menu.refine(&SearchState::new(), &json!(["a"]), &ctx).is_err());
    }

    #[test]
    fn test_ids_and_kinds() {
        let menu = build(json!({"widget": "menu", "attributeName": "brand"}));
        assert_eq!(menu.id(), "brand");
        assert_eq!(menu.kind(), "menu");
        assert!(menu.search_for_facet_values("a").is_some());

        let hpp = build(json!({
            "widget": "hitsPerPage",
            "defaultRefinement": 10,
            "items": [{"value": 10}, {"value": 20, "label": "twenty"}],
        }));
        assert_eq!(hpp.id(), "hitsPerPage");
        assert!(hpp.search_for_facet_values("a").is_none());
    }

    #[test]
    fn test_props_serialize_untagged() {
        let widget = build(json!({"widget": "pagination"}));
        let results: SearchResults =
            serde_json::from_value(json!({"results": {"index": {"nbPages": 666}}})).unwrap();
        let props = widget.provided_props(&SearchState::new(), &results, None, &Context::single("index"));

        assert_eq!(
            serde_json::to_value(props).unwrap(),
            json!({"nbPages": 666, "currentRefinement": 1, "canRefine": true})
        );
    }
}
