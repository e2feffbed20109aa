//! Refine command - apply a refinement to the search state.

use crate::app::App;
use crate::Inputs;
use facetsync_core::Config;
use serde_json::Value;

/// Run the refine command.
///
/// The value is parsed as JSON when possible, so `3` is a number and `null`
/// clears a menu; anything else is taken as text.
pub fn run(config: Config, inputs: &Inputs, value: &str) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;

    let next = serde_json::from_str::<Value>(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));
    let state = app.widget.refine(&app.state, &next, &app.context)?;

    app.print_json(&state)
}
