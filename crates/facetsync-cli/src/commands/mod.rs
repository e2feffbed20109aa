//! Subcommand implementations.

pub mod clean_up;
pub mod metadata;
pub mod params;
pub mod props;
pub mod refine;
pub mod search_facet;
