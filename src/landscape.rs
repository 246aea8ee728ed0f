//! Beach level
//!
//! Ties the generator, the destructible map and the palm trees together.
//! The explosion handler calls `explode`; renderers read through the
//! accessors and never mutate terrain.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::TerrainSettings;
use crate::terrain::{
    Feature, GeneratorConfig, PlacedFeature, TerrainGenerator, TerrainMap, place_features,
};

/// Default palm tree layout (x, height)
pub const DEFAULT_PALM_TREES: [Feature; 4] = [
    Feature { x: 200, height: 80 },
    Feature { x: 500, height: 90 },
    Feature { x: 800, height: 75 },
    Feature { x: 1000, height: 85 },
];

/// A palm tree standing on the beach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalmTree {
    pub placement: PlacedFeature,
    pub destroyed: bool,
}

/// What an explosion did to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplosionOutcome {
    pub crater_created: bool,
    pub tree_destroyed: bool,
}

/// Complete beach level terrain
#[derive(Debug, Clone)]
pub struct Landscape {
    map: TerrainMap,
    trees: Vec<PalmTree>,
    /// Average ground row of the initial profile
    ground_level: i32,
    destructible: bool,
    seed: u64,
}

impl Landscape {
    /// Build a level from settings
    pub fn new(settings: &TerrainSettings, width: i32, height: i32) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let columns = width.max(1) as usize;
        let complexity = settings.effective_complexity();
        // The stock band is laid out for the default playfield; refit it to this one
        let generator_config = if settings.generator == GeneratorConfig::default() {
            GeneratorConfig::for_playfield(height.max(1))
        } else {
            settings.generator.clone()
        };
        let mut generator = TerrainGenerator::with_config(generator_config, seed);

        let profile = if settings.varied_terrain {
            generator.generate_varied(columns, complexity)
        } else {
            generator.flat(columns)
        };
        let ground_level = average(&profile);

        let trees = place_features(&profile, &DEFAULT_PALM_TREES)
            .into_iter()
            .map(|placement| PalmTree {
                placement,
                destroyed: false,
            })
            .collect();

        let map = TerrainMap::with_config(width, height, profile, settings.craters);

        log::info!(
            "Landscape {}x{} built (seed={}, complexity={}, varied={}, destructible={})",
            width,
            height,
            seed,
            complexity,
            settings.varied_terrain,
            settings.destructible_terrain
        );

        Self {
            map,
            trees,
            ground_level,
            destructible: settings.destructible_terrain,
            seed,
        }
    }

    pub fn map(&self) -> &TerrainMap {
        &self.map
    }

    pub fn trees(&self) -> &[PalmTree] {
        &self.trees
    }

    pub fn ground_level(&self) -> i32 {
        self.ground_level
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_destructible(&self) -> bool {
        self.destructible
    }

    /// Windowed ground height (see `TerrainMap::ground_height`)
    #[inline]
    pub fn ground_height(&self, x: i32) -> i32 {
        self.map.ground_height(x)
    }

    /// Terrain side of an explosion: crater, merge, then tree damage
    pub fn explode(&mut self, x: i32, y: i32, radius: i32) -> ExplosionOutcome {
        let crater_created = self.destructible && self.map.create_crater(x, y, radius);
        if crater_created {
            self.map.merge_overlapping_craters();
        }

        ExplosionOutcome {
            crater_created,
            tree_destroyed: self.destroy_tree_at(x, y, radius),
        }
    }

    /// Knock down the first standing tree within `radius` of the blast
    pub fn destroy_tree_at(&mut self, x: i32, y: i32, radius: i32) -> bool {
        let blast = Vec2::new(x as f32, y as f32);
        let ground_level = self.ground_level as f32;

        let hit = self.trees.iter_mut().filter(|t| !t.destroyed).find(|t| {
            let trunk_mid = Vec2::new(
                t.placement.x as f32,
                ground_level - t.placement.height as f32 / 2.0,
            );
            trunk_mid.distance(blast) <= radius as f32
        });

        match hit {
            Some(tree) => {
                tree.destroyed = true;
                log::debug!("Palm tree at x={} destroyed", tree.placement.x);
                true
            }
            None => false,
        }
    }
}

fn average(profile: &[i32]) -> i32 {
    if profile.is_empty() {
        return 0;
    }
    (profile.iter().map(|&h| h as i64).sum::<i64>() / profile.len() as i64) as i32
}
