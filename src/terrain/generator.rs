//! Procedural beach terrain
//!
//! Height profiles are built from layered sine waves, per-column jitter,
//! an asymmetry term that steepens one flank of each hill, and sparse dunes.
//! All randomness comes from a seeded PCG stream, so a seed fully determines
//! the output.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One periodic terrain layer. Both values are scaled by complexity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// Radians per column
    pub frequency: f32,
    /// Peak offset in pixels
    pub amplitude: f32,
}

impl Wave {
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

/// Generator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Resting ground row
    pub base_level: i32,
    /// Highest allowed ground row (smallest y)
    pub min_level: i32,
    /// Lowest allowed ground row (largest y)
    pub max_level: i32,
    /// Hills, dunes, small dunes and ripples
    pub waves: Vec<Wave>,
    /// Frequency of the asymmetry term
    pub asymmetry_frequency: f32,
    /// Peak downward offset of the asymmetry term across the primary and secondary layers
    pub asymmetry_gain: f32,
    /// Total span of per-column jitter
    pub jitter: f32,
    /// Columns between dune injection attempts
    pub dune_interval: usize,
    /// Chance of a dune at each attempt
    pub dune_chance: f64,
    /// Smoothing passes applied by `generate`
    pub smoothing_iterations: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::for_playfield(PLAYFIELD_HEIGHT)
    }
}

impl GeneratorConfig {
    /// Ground band laid out relative to the bottom of a playfield
    pub fn for_playfield(height: i32) -> Self {
        let max_level = (height - MIN_GROUND_CLEARANCE).max(0);
        Self {
            base_level: (height - BASE_GROUND_OFFSET).max(0),
            min_level: (height - MAX_GROUND_RISE).clamp(0, max_level),
            max_level,
            waves: vec![
                Wave::new(0.002, 80.0),
                Wave::new(0.006, 35.0),
                Wave::new(0.015, 15.0),
                Wave::new(0.05, 5.0),
            ],
            asymmetry_frequency: 0.004,
            // 20 on the primary layer plus half that on the secondary
            asymmetry_gain: 30.0,
            jitter: 12.0,
            dune_interval: 200,
            dune_chance: 0.3,
            smoothing_iterations: SMOOTHING_ITERATIONS,
        }
    }

    #[inline]
    fn clamp_level(&self, y: f32) -> i32 {
        y.clamp(self.min_level as f32, self.max_level as f32) as i32
    }
}

/// Seeded terrain synthesizer
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: GeneratorConfig,
    rng: Pcg32,
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_config(GeneratorConfig::default(), seed)
    }

    pub fn with_config(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a smoothed height profile of `width` columns.
    ///
    /// Every value lies within the configured ground band.
    pub fn generate(&mut self, width: usize, complexity: f32) -> Vec<i32> {
        let dunes = self.dune_overlay(width, complexity);
        let config = &self.config;
        let jitter = config.jitter * complexity;
        let asymmetry_frequency = config.asymmetry_frequency * complexity;
        let asymmetry_gain = config.asymmetry_gain * complexity;

        let mut profile = Vec::with_capacity(width);
        for (x, dune) in dunes.into_iter().enumerate() {
            let fx = x as f32;

            let layered: f32 = config
                .waves
                .iter()
                .map(|w| (fx * w.frequency * complexity).sin() * w.amplitude * complexity)
                .sum();

            // Positive half only: drags one flank down so hills lean
            let asymmetry = (fx * asymmetry_frequency).sin().max(0.0) * asymmetry_gain;

            let noise = (self.rng.random::<f32>() - 0.5) * jitter;

            let y = config.base_level as f32 + layered + asymmetry + noise + dune;
            profile.push(config.clamp_level(y));
        }

        smooth_terrain(&profile, self.config.smoothing_iterations)
    }

    /// Sparse dune offsets (negative = raised) for each column
    fn dune_overlay(&mut self, width: usize, complexity: f32) -> Vec<f32> {
        let mut overlay = vec![0.0f32; width];
        let interval = self.config.dune_interval.max(1);

        for x in (0..width).step_by(interval) {
            if !self.rng.random_bool(self.config.dune_chance.clamp(0.0, 1.0)) {
                continue;
            }
            let center = (x + self.rng.random_range(50..=150)) as i64;
            let half_width = self.rng.random_range(80..=120i64) / 2;
            let lift = self.rng.random_range(40..=70) as f32 * complexity;

            for dx in -half_width..half_width {
                let col = center + dx;
                if col < 0 || col >= width as i64 {
                    continue;
                }
                let falloff = 1.0 - dx.abs() as f32 / half_width as f32;
                if falloff > 0.0 {
                    overlay[col as usize] -= falloff * lift;
                }
            }
        }

        overlay
    }

    /// Raise several large asymmetric dunes on top of an existing profile.
    ///
    /// Each dune has a steep side with a sharp falloff and a gentle side with a
    /// long tail. The result is clamped back into the ground band.
    pub fn add_sand_dunes(&mut self, profile: &[i32], complexity: f32) -> Vec<i32> {
        let mut enhanced = profile.to_vec();
        let width = enhanced.len();
        if width == 0 {
            return enhanced;
        }

        let count = (3.0 + complexity * 2.0).max(0.0) as usize;
        for _ in 0..count {
            let center = if width > 200 {
                self.rng.random_range(100..width - 100)
            } else {
                self.rng.random_range(0..width)
            };
            let half_width = self.rng.random_range(80..=150usize);
            let lift = self.rng.random_range(30..=60) as f32 * complexity;
            let steep_side: i64 = if self.rng.random_bool(0.5) { 1 } else { -1 };

            let start = center.saturating_sub(half_width);
            let end = (center + half_width).min(width);
            for x in start..end {
                let offset = x as i64 - center as i64;
                let t = offset.unsigned_abs() as f32 / half_width as f32;
                let influence = if offset * steep_side > 0 {
                    1.0 - t.powf(1.5)
                } else {
                    1.0 - t.powf(0.7)
                };
                if influence > 0.0 {
                    enhanced[x] = (enhanced[x] as f32 - influence * lift) as i32;
                }
            }
        }

        for y in &mut enhanced {
            *y = (*y).clamp(self.config.min_level, self.config.max_level);
        }
        enhanced
    }

    /// Full beach profile: base synthesis, major dunes, then a light smoothing pass
    pub fn generate_varied(&mut self, width: usize, complexity: f32) -> Vec<i32> {
        let base = self.generate(width, complexity);
        let dunes = self.add_sand_dunes(&base, complexity);
        smooth_terrain(&dunes, 1)
    }

    /// Flat profile at the base ground level
    pub fn flat(&self, width: usize) -> Vec<i32> {
        vec![self.config.base_level; width]
    }
}

/// Weighted 3-point moving average (0.25, 0.5, 0.25).
///
/// End columns are left untouched.
pub fn smooth_terrain(profile: &[i32], iterations: u32) -> Vec<i32> {
    let mut smoothed = profile.to_vec();
    if smoothed.len() < 3 {
        return smoothed;
    }

    for _ in 0..iterations {
        let prev = smoothed.clone();
        for (i, window) in prev.windows(3).enumerate() {
            let avg = window[0] as f32 * 0.25 + window[1] as f32 * 0.5 + window[2] as f32 * 0.25;
            smoothed[i + 1] = avg as i32;
        }
    }

    smoothed
}

/// An environmental prop anchored to the ground (palm tree, rock, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub x: i32,
    /// Visual height in pixels
    pub height: i32,
}

/// A feature resolved against a height profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFeature {
    pub x: i32,
    pub height: i32,
    /// Ground row the feature stands on
    pub ground_y: i32,
}

/// Anchor features to the profile, shrinking those on slopes.
///
/// Features outside the profile are dropped.
pub fn place_features(profile: &[i32], features: &[Feature]) -> Vec<PlacedFeature> {
    features
        .iter()
        .filter_map(|feature| {
            let x = usize::try_from(feature.x).ok()?;
            let ground_y = *profile.get(x)?;

            let slope = if x > 0 && x + 1 < profile.len() {
                (profile[x + 1] - profile[x - 1]).abs()
            } else {
                0
            };
            let scale = (1.0 - slope as f32 * 0.002).max(0.8);

            Some(PlacedFeature {
                x: feature.x,
                height: (feature.height as f32 * scale) as i32,
                ground_y,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_length_and_band() {
        let mut generator = TerrainGenerator::new(7);
        let profile = generator.generate(PLAYFIELD_WIDTH as usize, 1.0);
        let config = generator.config();

        assert_eq!(profile.len(), PLAYFIELD_WIDTH as usize);
        assert!(
            profile
                .iter()
                .all(|&y| y >= config.min_level && y <= config.max_level)
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = TerrainGenerator::new(42).generate(500, 1.0);
        let b = TerrainGenerator::new(42).generate(500, 1.0);
        assert_eq!(a, b);

        let c = TerrainGenerator::new(43).generate(500, 1.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_has_variation() {
        let profile = TerrainGenerator::new(3).generate(PLAYFIELD_WIDTH as usize, 1.0);
        let min = *profile.iter().min().unwrap();
        let max = *profile.iter().max().unwrap();
        assert!(max - min > 20, "terrain too flat: {}..{}", min, max);
    }

    #[test]
    fn test_complexity_scales_relief() {
        let relief = |complexity: f32| {
            let profile = TerrainGenerator::new(11).generate(PLAYFIELD_WIDTH as usize, complexity);
            let mean = profile.iter().map(|&y| y as f32).sum::<f32>() / profile.len() as f32;
            profile.iter().map(|&y| (y as f32 - mean).abs()).sum::<f32>() / profile.len() as f32
        };
        assert!(relief(1.5) > relief(0.5));
    }

    /// Flat base with only the terms under test switched on
    fn bare_config() -> GeneratorConfig {
        GeneratorConfig {
            waves: Vec::new(),
            asymmetry_gain: 0.0,
            jitter: 0.0,
            dune_chance: 0.0,
            smoothing_iterations: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_dune_injection_raises_ground() {
        let base = bare_config().base_level;
        let without = TerrainGenerator::with_config(bare_config(), 21).generate(1280, 1.0);
        let with = TerrainGenerator::with_config(
            GeneratorConfig {
                dune_chance: 1.0,
                ..bare_config()
            },
            21,
        )
        .generate(1280, 1.0);

        assert!(without.iter().all(|&y| y == base));
        assert!(with.iter().zip(&without).all(|(d, f)| d <= f));

        // First injection happens at column 0 and is centered 50-150 columns in,
        // lifting at least 40px at its peak
        let peak = *with[..260].iter().min().unwrap();
        assert!(peak <= base - 35, "peak {} not raised from {}", peak, base);
        assert!(with.iter().all(|&y| y >= bare_config().min_level));
    }

    #[test]
    fn test_asymmetry_moves_positive_half_period_only() {
        let base = bare_config().base_level;
        let without = TerrainGenerator::with_config(bare_config(), 4).generate(1280, 1.0);
        let with = TerrainGenerator::with_config(
            GeneratorConfig {
                asymmetry_gain: 30.0,
                ..bare_config()
            },
            4,
        )
        .generate(1280, 1.0);

        assert!(without.iter().all(|&y| y == base));
        // sin(x * 0.004) > 0 for 0 < x < ~785: that half-period sinks, the other is untouched
        assert_eq!(with[0], base);
        assert!(with[1..785].iter().all(|&y| y >= base));
        assert!(with[100..700].iter().all(|&y| y > base));
        assert!(with[786..].iter().all(|&y| y == base));

        let deepest = *with.iter().max().unwrap();
        assert!((base + 29..=base + 30).contains(&deepest), "deepest {}", deepest);
    }

    #[test]
    fn test_smoothing_reduces_spikes() {
        let jagged: Vec<i32> = (0..50).map(|i| if i % 2 == 0 { 500 } else { 540 }).collect();
        let smoothed = smooth_terrain(&jagged, 3);

        let roughness = |p: &[i32]| p.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<i32>();
        assert!(roughness(&smoothed) < roughness(&jagged));
        assert_eq!(smoothed[0], jagged[0]);
        assert_eq!(smoothed[49], jagged[49]);
    }

    #[test]
    fn test_smoothing_short_profiles_untouched() {
        assert_eq!(smooth_terrain(&[3, 9], 5), vec![3, 9]);
        assert_eq!(smooth_terrain(&[], 5), Vec::<i32>::new());
    }

    #[test]
    fn test_sand_dunes_raise_terrain() {
        let mut generator = TerrainGenerator::new(5);
        let flat = generator.flat(PLAYFIELD_WIDTH as usize);
        let dunes = generator.add_sand_dunes(&flat, 1.0);

        assert_eq!(dunes.len(), flat.len());
        assert!(dunes.iter().zip(&flat).all(|(d, f)| d <= f));
        assert!(dunes.iter().any(|&y| y < generator.config().base_level - 20));
        assert!(dunes.iter().all(|&y| y >= generator.config().min_level));
    }

    #[test]
    fn test_varied_terrain_deterministic_and_in_band() {
        let a = TerrainGenerator::new(9).generate_varied(PLAYFIELD_WIDTH as usize, 1.0);
        let b = TerrainGenerator::new(9).generate_varied(PLAYFIELD_WIDTH as usize, 1.0);
        assert_eq!(a, b);

        let config = GeneratorConfig::default();
        assert!(a.iter().all(|&y| y >= config.min_level && y <= config.max_level));
    }

    #[test]
    fn test_narrow_width_supported() {
        let mut generator = TerrainGenerator::new(1);
        assert_eq!(generator.generate(1, 1.0).len(), 1);
        assert_eq!(generator.generate_varied(50, 2.0).len(), 50);
    }

    #[test]
    fn test_place_features_on_slopes() {
        let mut profile = vec![600; 20];
        profile[11] = 500; // 100px rise across the neighbors of x=10

        let features = [
            Feature { x: 5, height: 80 },
            Feature { x: 10, height: 100 },
            Feature { x: 0, height: 90 },
            Feature { x: 25, height: 85 },
            Feature { x: -1, height: 85 },
        ];
        let placed = place_features(&profile, &features);

        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0], PlacedFeature { x: 5, height: 80, ground_y: 600 });
        assert_eq!(placed[1].height, 80);
        assert_eq!(placed[2], PlacedFeature { x: 0, height: 90, ground_y: 600 });
    }

    proptest! {
        #[test]
        fn prop_generate_bounds(seed in any::<u64>(), width in 1usize..2000, complexity in 0.5f32..2.0) {
            let mut generator = TerrainGenerator::new(seed);
            let profile = generator.generate(width, complexity);
            let config = generator.config();

            prop_assert_eq!(profile.len(), width);
            for &y in &profile {
                prop_assert!(y >= config.min_level && y <= config.max_level);
            }
        }

        #[test]
        fn prop_smoothing_stays_within_input_range(
            profile in prop::collection::vec(500..680i32, 3..200),
            iterations in 0u32..6,
        ) {
            let lo = *profile.iter().min().unwrap();
            let hi = *profile.iter().max().unwrap();
            let smoothed = smooth_terrain(&profile, iterations);
            prop_assert_eq!(smoothed.len(), profile.len());
            for &y in &smoothed {
                prop_assert!(y >= lo && y <= hi);
            }
        }
    }
}
