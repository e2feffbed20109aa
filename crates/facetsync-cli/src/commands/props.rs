//! Props command - show what the component would render.

use crate::app::{read_json, App};
use crate::Inputs;
use facetsync_core::{Config, FacetSearchResults, SearchResults};
use std::path::PathBuf;
use tracing::info;

/// Run the props command.
pub fn run(
    config: Config,
    inputs: &Inputs,
    results: Option<PathBuf>,
    facet_search: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;

    let results: SearchResults = match &results {
        Some(path) => read_json(path)?,
        None => SearchResults::empty(),
    };
    let facet_search: Option<FacetSearchResults> = match &facet_search {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let props = app
        .widget
        .provided_props(&app.state, &results, facet_search.as_ref(), &app.context);

    if props.is_none() {
        info!(id = app.widget.id(), "Widget does not render without results");
    }

    app.print_json(&props)
}
