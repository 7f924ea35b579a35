//! Workspace crate for `geotile-core` and `geotile-cli`.
//!
//! Re-exports the core so the demos can `use geotile_rs::prelude::*`.
pub use geotile_core::*;
