//! Dune Artillery - destructible beach terrain for an arcade artillery duel
//!
//! Core modules:
//! - `terrain`: Procedural height profiles and the destructible terrain map
//! - `landscape`: Beach level facade (terrain + palm trees + explosions)
//! - `settings`: Data-driven terrain settings

pub mod landscape;
pub mod settings;
pub mod terrain;

pub use landscape::{ExplosionOutcome, Landscape, PalmTree};
pub use settings::{SettingsError, TerrainPreset, TerrainSettings};
pub use terrain::{
    CraterConfig, CraterRecord, GeneratorConfig, GroundProfile, TerrainGenerator, TerrainMap,
    WallSide,
};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions in pixels
    pub const PLAYFIELD_WIDTH: i32 = 1280;
    pub const PLAYFIELD_HEIGHT: i32 = 720;

    /// Resting ground level above the bottom edge
    pub const BASE_GROUND_OFFSET: i32 = 100;
    /// Highest the generated ground may rise (distance from bottom edge)
    pub const MAX_GROUND_RISE: i32 = 220;
    /// Lowest the generated ground may sink (distance from bottom edge)
    pub const MIN_GROUND_CLEARANCE: i32 = 40;

    /// Smoothing passes applied by `TerrainGenerator::generate`
    pub const SMOOTHING_ITERATIONS: u32 = 3;

    /// Craters merge when center distance < factor * (r1 + r2)
    pub const CRATER_OVERLAP_FACTOR: f32 = 0.8;
    /// A merged crater never exceeds the larger input radius by more than this
    pub const CRATER_GROWTH_LIMIT: i32 = 20;
    /// Hard cap on tracked crater records
    pub const MAX_CRATERS: usize = 50;
    /// Half-width of the windowed ground-height query (columns)
    pub const GROUND_QUERY_WINDOW: i32 = 3;

    /// Supported terrain complexity range
    pub const MIN_COMPLEXITY: f32 = 0.5;
    pub const MAX_COMPLEXITY: f32 = 2.0;
}
