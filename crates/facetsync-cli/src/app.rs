//! Application state management.

use crate::Inputs;
use anyhow::{bail, Context as _};
use facetsync_core::{Config, Context, SearchState, Widget, WidgetConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// The connector under inspection
    pub widget: Widget,

    /// Where the widget is mounted
    pub context: Context,

    /// The search state it reads from
    pub state: SearchState,
}

impl App {
    /// Create a new application instance from the command inputs.
    pub fn new(config: Config, inputs: &Inputs) -> anyhow::Result<Self> {
        let widget_config: WidgetConfig = read_json(&inputs.widget)?;
        let widget = widget_config.build(&config)?;
        let context = resolve_context(inputs)?;

        let state = match &inputs.state {
            Some(path) => SearchState::from_json(read_json(path)?)
                .with_context(|| format!("Invalid search state in {}", path.display()))?,
            None => SearchState::new(),
        };

        info!(
            widget = widget.kind(),
            id = widget.id(),
            context = %context,
            "Application initialized"
        );

        Ok(App {
            config,
            widget,
            context,
            state,
        })
    }

    /// Print a value as JSON on stdout.
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let output = if self.config.output.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", output);
        Ok(())
    }
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    debug!(path = %path.display(), "Reading JSON input");
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn resolve_context(inputs: &Inputs) -> anyhow::Result<Context> {
    if let Some(path) = &inputs.context {
        return Context::from_json(read_json(path)?)
            .with_context(|| format!("Invalid context in {}", path.display()));
    }

    match &inputs.index {
        Some(index) if inputs.multi => Ok(Context::multi(index.clone())),
        Some(index) => Ok(Context::single(index.clone())),
        None => bail!("Either --context or --index is required"),
    }
}
