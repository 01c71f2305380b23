//! Pokedex TUI - a PokeAPI catalogue browser
//!
//! This library exposes the application's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod format;
pub mod params;
pub mod reducer;
pub mod state;
pub mod view;
pub mod weakness;
