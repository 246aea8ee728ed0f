//! Destructible terrain module
//!
//! Pure, single-threaded terrain logic:
//! - `generator`: seeded synthesis of the initial height profile
//! - `map`: pixel grid, derived height profile, collision queries, craters
//! - `crater`: crater records and the merge pass
//!
//! No rendering, audio or platform dependencies live here.

pub mod crater;
pub mod generator;
pub mod map;

pub use crater::{CraterConfig, CraterRecord, enforce_cap, merge_craters};
pub use generator::{
    Feature, GeneratorConfig, PlacedFeature, TerrainGenerator, Wave, place_features,
    smooth_terrain,
};
pub use map::{GroundProfile, TerrainMap, WallSide};
