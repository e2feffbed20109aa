//! Search-facet command - show the facet-value search request for a query.

use crate::app::App;
use crate::Inputs;
use anyhow::bail;
use facetsync_core::Config;

/// Run the search-facet command.
pub fn run(config: Config, inputs: &Inputs, query: &str) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;

    match app.widget.search_for_facet_values(query) {
        Some(request) => app.print_json(&request),
        None => bail!("{} widgets do not search facet values", app.widget.kind()),
    }
}
