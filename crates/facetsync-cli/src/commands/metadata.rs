//! Metadata command - show the active refinements of the widget.

use crate::app::App;
use crate::Inputs;
use anyhow::anyhow;
use facetsync_core::Config;

/// Run the metadata command.
///
/// With `clear`, prints the search state after removing that item instead.
pub fn run(config: Config, inputs: &Inputs, clear: Option<usize>) -> anyhow::Result<()> {
    let app = App::new(config, inputs)?;
    let metadata = app.widget.metadata(&app.state, &app.context);

    match clear {
        Some(n) => {
            let item = metadata.items().get(n).ok_or_else(|| {
                anyhow!(
                    "Widget {} has {} active refinement(s), no item {}",
                    metadata.id,
                    metadata.items().len(),
                    n
                )
            })?;
            app.print_json(&item.clear(&app.state))
        }
        None => app.print_json(&metadata),
    }
}
