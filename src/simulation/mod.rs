mod band;
mod cell;
mod engine;

pub use band::{grid_count, Band, BandSlot};
pub use cell::{opacity, stripe_offset, stripe_spans, ActiveCell, Orientation};
pub use engine::Engine;
