//! # Facetsync Core Library
//!
//! This crate provides the search-state synchronization core for faceted
//! search interfaces. It translates an application-wide, serializable search
//! state into query parameters for a search engine, and maps engine results
//! back into display-ready props for presentational widgets.
//!
//! Everything here is a pure state transformation: no rendering, no network
//! I/O. Every operation takes the rendering [`Context`] explicitly and returns
//! new values instead of mutating its inputs.
//!
//! ## Architecture
//!
//! - **Context** (`context`): Single-index vs multi-index resolution
//! - **State** (`state`): The search state and explicit key paths into it
//! - **Params** (`params`): The query-parameter builder contract
//! - **Results** (`results`): The search-results contract consumed by widgets
//! - **Connector** (`connector`): The lifecycle trait every widget implements
//! - **Connectors** (`connectors`): Hits-per-page, menu and pagination
//! - **Runner** (`runner`): Tagged dispatch over widget kinds with JSON I/O
//! - **Config** (`config`): Configuration management
//!
//! ## Example
//!
//! ```rust,ignore
//! use facetsync_core::{Connector, Context, Pagination, SearchParameters, SearchState};
//!
//! let ctx = Context::single("products");
//! let pagination = Pagination::new();
//!
//! let state = pagination.refine(&SearchState::new(), 3.into(), &ctx);
//! let params = pagination.search_parameters(SearchParameters::new(), &state, &ctx)?;
//! assert_eq!(params.page, Some(2));
//! ```

pub mod config;
pub mod connector;
pub mod connectors;
pub mod context;
pub mod error;
pub mod params;
pub mod results;
pub mod runner;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use connector::{Connector, Metadata, MetadataItem, NumericRefinement, TransformItems};
pub use connectors::{HitsPerPage, Menu, Pagination};
pub use context::Context;
pub use error::{FacetSyncError, Result};
pub use params::{ParameterUpdate, QueryParameters, SearchParameters};
pub use results::{FacetSearchRequest, FacetSearchResults, IndexResults, SearchResults};
pub use runner::{ProvidedProps, Widget, WidgetConfig};
pub use state::{KeyPath, SearchState};
