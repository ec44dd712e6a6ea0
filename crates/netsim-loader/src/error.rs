//! The error boundary of `netsim-loader`: malformed or semantically invalid model files. Every
//! variant here is fatal to loading (§7) — nothing here is a soft `Unrouted` outcome, that's a
//! `netsim-core` concern once a [`netsim_core::Network`] actually exists.

use std::path::PathBuf;

/// Raised by [`crate::tsv::load_model_file`] / [`crate::json::load_network_json`] when a model
/// file is malformed or semantically invalid.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read model file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized section header {0:?}")]
    UnknownSection(String),

    #[error("{section} table is missing required column {column:?}")]
    MissingColumn {
        section: &'static str,
        column: &'static str,
    },

    #[error("{section} table row {row} has {got} column(s), expected {expected}")]
    ColumnCountMismatch {
        section: &'static str,
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("{section} table row {row}: malformed value {value:?} for column {column:?}")]
    BadValue {
        section: &'static str,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(
        "every circuit_id must appear exactly twice in INTERFACES_TABLE; violations: {}",
        .0.iter().map(|(id, count)| format!("{id:?}={count}")).collect::<Vec<_>>().join(", ")
    )]
    BadCircuitArity(Vec<(String, usize)>),

    #[error("{kind} {name:?} references unknown node {node:?}")]
    UnknownNode {
        kind: &'static str,
        name: String,
        node: String,
    },

    #[error("network construction failed: {0}")]
    Construction(#[from] netsim_core::ModelConstructionError),

    #[error("malformed JSON model document")]
    Json(#[from] serde_json::Error),
}
