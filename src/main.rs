//! Dune Artillery entry point
//!
//! Builds a beach level from `terrain_settings.json` (or defaults), fires a
//! short scripted volley and logs how the terrain responds.

use dune_artillery::consts::*;
use dune_artillery::{Landscape, TerrainSettings};

const SETTINGS_FILE: &str = "terrain_settings.json";

/// Scripted impacts: (x, depth below local ground, radius)
const VOLLEY: [(i32, i32, i32); 5] = [
    (400, 10, 50),
    (430, 15, 40),
    (500, -40, 30),
    (900, 5, 35),
    (920, 20, 45),
];

fn main() {
    env_logger::init();
    log::info!("Dune Artillery (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => TerrainSettings::load_or_default(path),
        None => TerrainSettings::load_or_default(SETTINGS_FILE),
    };

    let mut level = Landscape::new(&settings, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    log::info!(
        "Average ground level {} (seed {})",
        level.ground_level(),
        level.seed()
    );

    for (x, depth, radius) in VOLLEY {
        let y = level.map().accurate_ground_height(x, 0) + depth;
        let outcome = level.explode(x, y, radius);
        log::info!(
            "Impact at ({}, {}) r={}: crater={}, tree={}, ground now {}",
            x,
            y,
            radius,
            outcome.crater_created,
            outcome.tree_destroyed,
            level.ground_height(x)
        );
    }

    for crater in level.map().craters() {
        println!(
            "crater center=({}, {}) radius={}",
            crater.center_x, crater.center_y, crater.radius
        );
    }
    let standing = level.trees().iter().filter(|t| !t.destroyed).count();
    println!("{} of {} palm trees standing", standing, level.trees().len());
}
