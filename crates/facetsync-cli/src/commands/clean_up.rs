//! Clean-up command - remove the widget's refinement.

use crate::app::App;
use crate::Inputs;
use facetsync_core::Config;

/// Run the clean-up command.
pub fn run(config: Config, inputs: &Inputs) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;
    let state = app.widget.clean_up(&app.state, &app.context);
    app.print_json(&state)
}
