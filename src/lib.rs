//! Terminal catalog viewer for the first 151 entries of the PokeAPI.
//!
//! The binary wires these modules into a tui-dispatch runtime; they are
//! exposed here so integration tests can drive the store and the renderer.

pub mod action;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod effect;
pub mod evolution;
pub mod halfblock;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod ui;
pub mod view;
