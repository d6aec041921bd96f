//! Decorative grid bands: a small set of cells fade in, sweep stripes across
//! themselves and fade out, over a faint static grid.
//!
//! The engine is platform free. It draws through [`surface::Surface`] and is
//! advanced by explicit [`simulation::Engine::tick`] calls.

pub mod color;
pub mod config;
pub mod debounce;
pub mod simulation;
pub mod surface;

pub use config::{Config, Environment, Theme};
pub use simulation::{BandSlot, Engine};
