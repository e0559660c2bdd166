pub mod action;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod grid;
pub mod item;
pub mod physics;
pub mod seed;
pub mod space;
pub mod table;

pub use action::CollageAction;
pub use catalog::{default_photos, photo_src, resolve_photos, DEFAULT_PHOTOS};
pub use config::{EngineConfig, ScaleBreakpoint};
pub use engine::{CollageEngine, ResizeOutcome};
pub use error::ConfigError;
pub use gesture::{GestureTracker, GestureUpdate, TapTracker};
pub use grid::{initial_position, scatter_cell, scatter_grid, ScatterCell, ScatterGrid};
pub use item::{ItemView, PhotoItem};
pub use seed::seeded_random;
pub use space::{Bounds, ItemSize, LayoutSpace};
pub use table::{SharedPositionTable, SharedSlot};
