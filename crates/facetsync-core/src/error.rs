//! Error types for Facetsync core operations.
//!
//! Connector operations themselves almost never fail: missing results degrade
//! to "cannot refine" props instead of errors. The errors here cover the
//! boundaries, where a host hands the core something it cannot work with.

use thiserror::Error;

/// Result type alias using FacetSyncError
pub type Result<T> = std::result::Result<T, FacetSyncError>;

/// Core error types for Facetsync operations.
#[derive(Error, Debug)]
pub enum FacetSyncError {
    // === Host Contract Errors ===
    /// Neither a multi-index scope nor a main index was supplied
    #[error("no index resolvable from context: {reason}")]
    MissingContext { reason: String },

    /// A refinement was added for a facet that was never declared disjunctive
    #[error("facet {attribute} is not declared as a disjunctive facet")]
    UndeclaredFacet { attribute: String },

    // === Widget Errors ===
    /// A widget configuration could not be turned into a connector
    #[error("invalid {widget} widget: {reason}")]
    InvalidWidget { widget: String, reason: String },

    /// A refinement value has a type the widget cannot store
    #[error("invalid refinement for {widget}: {reason}")]
    InvalidRefinement { widget: String, reason: String },

    /// The search state is not a JSON object
    #[error("search state must be a JSON object, found {found}")]
    InvalidState { found: String },

    // === Configuration Errors ===
    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    // === I/O Errors ===
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FacetSyncError {
    /// Returns true if this error means the host wired the core up wrongly
    /// rather than the data being unusable.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FacetSyncError::MissingContext { .. } | FacetSyncError::UndeclaredFacet { .. }
        )
    }

    /// Create an invalid refinement error
    pub fn invalid_refinement(widget: impl Into<String>, reason: impl Into<String>) -> Self {
        FacetSyncError::InvalidRefinement {
            widget: widget.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FacetSyncError {
    fn from(err: serde_json::Error) -> Self {
        FacetSyncError::Serialization(err.to_string())
    }
}
