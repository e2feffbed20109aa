//! Params command - show the search parameters the widget contributes.

use crate::app::{read_json, App};
use crate::Inputs;
use facetsync_core::{Config, SearchParameters};
use std::path::PathBuf;

/// Run the params command.
pub fn run(config: Config, inputs: &Inputs, base: Option<PathBuf>) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;

    let base: SearchParameters = match &base {
        Some(path) => read_json(path)?,
        None => SearchParameters::new(),
    };

    let params = app.widget.search_parameters(base, &app.state, &app.context)?;
    app.print_json(&params)
}
