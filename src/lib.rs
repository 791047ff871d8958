//! Poke Gallery - a terminal Pokédex gallery over the public PokeAPI.
//!
//! This library exposes modules for use in integration tests.

pub mod app;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod ui;
pub mod utils;
