#![warn(unreachable_pub, missing_debug_implementations)]
//! The external collaborators the core engine (`netsim-core`) explicitly keeps out of scope: a
//! tab-separated model-file reader (§6) and a JSON (de)serialization path for the same
//! declarative inputs, for programmatic and test use.
//!
//! Neither module performs simulation; both only build a [`netsim_core::Network`] from
//! declarative input and hand it back for the caller to `simulate()`.

pub mod error;
pub mod json;
pub mod tsv;

pub use error::LoadError;
pub use json::{load_network_json, NetworkDocument};
pub use tsv::{load_model_file, parse_model_str, ModelDocument};
