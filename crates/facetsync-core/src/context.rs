//! Rendering context resolution.
//!
//! Every widget renders inside a hosting tree that says which index it talks
//! to. A plain tree has one main index; a multi-index scope targets a specific
//! index and isolates its refinements under `indices.<index>` in the search
//! state.
//!
//! The host supplies the context as JSON shaped either
//! `{"multiIndexContext": {"targettedIndex": ..}}` or
//! `{"ais": {"mainTargettedIndex": ..}}`. A context with neither is a host
//! integration bug and is rejected when the [`Context`] is built, so every
//! connector operation can rely on an index being resolvable.

use crate::error::{FacetSyncError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The index scope a widget renders in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawContext", into = "RawContext")]
pub enum Context {
    /// Inside a multi-index scope targeting a specific index
    MultiIndex { targetted_index: String },

    /// Directly under the root search, using its main index
    SingleIndex { main_targetted_index: String },
}

impl Context {
    /// Create a single-index context for the given main index
    pub fn single(index: impl Into<String>) -> Self {
        Context::SingleIndex {
            main_targetted_index: index.into(),
        }
    }

    /// Create a multi-index context targeting the given index
    pub fn multi(index: impl Into<String>) -> Self {
        Context::MultiIndex {
            targetted_index: index.into(),
        }
    }

    /// Build a context from the host's JSON representation.
    ///
    /// Fails with [`FacetSyncError::MissingContext`] when neither scope is
    /// present.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let raw: RawContext = serde_json::from_value(value)?;
        Context::try_from(raw)
    }

    /// True iff the widget renders inside a multi-index scope
    pub fn is_multi_index(&self) -> bool {
        matches!(self, Context::MultiIndex { .. })
    }

    /// The index this widget reads results from and refines
    pub fn resolve_index(&self) -> &str {
        match self {
            Context::MultiIndex { targetted_index } => targetted_index,
            Context::SingleIndex {
                main_targetted_index,
            } => main_targetted_index,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::MultiIndex { targetted_index } => write!(f, "multi:{}", targetted_index),
            Context::SingleIndex {
                main_targetted_index,
            } => write!(f, "single:{}", main_targetted_index),
        }
    }
}

/// Wire shape of the context as the hosting tree provides it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multi_index_context: Option<MultiIndexScope>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    ais: Option<RootScope>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiIndexScope {
    targetted_index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RootScope {
    main_targetted_index: String,
}

impl TryFrom<RawContext> for Context {
    type Error = FacetSyncError;

    fn try_from(raw: RawContext) -> Result<Self> {
        // A multi-index scope shadows the root index when both are present.
        match (raw.multi_index_context, raw.ais) {
            (Some(scope), _) => Ok(Context::multi(scope.targetted_index)),
            (None, Some(root)) => Ok(Context::single(root.main_targetted_index)),
            (None, None) => Err(FacetSyncError::MissingContext {
                reason: "context has neither multiIndexContext nor ais".to_string(),
            }),
        }
    }
}

impl From<Context> for RawContext {
    fn from(ctx: Context) -> Self {
        match ctx {
            Context::MultiIndex { targetted_index } => RawContext {
                multi_index_context: Some(MultiIndexScope { targetted_index }),
                ais: None,
            },
            Context::SingleIndex {
                main_targetted_index,
            } => RawContext {
                multi_index_context: None,
                ais: Some(RootScope {
                    main_targetted_index,
                }),
            },
        }
    }
}
