#![warn(unreachable_pub, missing_debug_implementations)]
//! A single dependency surface for consumers of the network simulation engine: re-exports
//! `netsim-core` (the simulation engine) and `netsim-loader` (the model-file and JSON
//! collaborators) under one crate, the way `parsimon`'s facade re-exports its `core`, `utils`,
//! and `worker` crates.

pub mod core {
    pub use netsim_core::*;
}

pub mod loader {
    pub use netsim_loader::*;
}
