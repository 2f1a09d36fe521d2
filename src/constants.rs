// ABOUTME: Application constants re-exported from pantry-core
// ABOUTME: Keeps `crate::constants::*` paths stable for the server crate

pub use pantry_core::constants::*;
