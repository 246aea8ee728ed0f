//! Pixel-resolution destructible terrain
//!
//! The grid is stored column-major (`index = x * height + y`) because every
//! hot query walks a single column top to bottom. The height profile is
//! derived from the grid and refreshed after each crater.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::crater::{CraterConfig, CraterRecord, enforce_cap, merge_craters};

/// Initial ground description accepted by `TerrainMap::new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroundProfile {
    /// Flat ground at the given row
    Uniform(i32),
    /// One ground row per column
    Columns(Vec<i32>),
}

impl From<i32> for GroundProfile {
    fn from(level: i32) -> Self {
        GroundProfile::Uniform(level)
    }
}

impl From<Vec<i32>> for GroundProfile {
    fn from(columns: Vec<i32>) -> Self {
        GroundProfile::Columns(columns)
    }
}

impl From<&[i32]> for GroundProfile {
    fn from(columns: &[i32]) -> Self {
        GroundProfile::Columns(columns.to_vec())
    }
}

impl GroundProfile {
    /// Expand to exactly `width` ground rows.
    ///
    /// Short profiles are padded with their average level.
    fn to_columns(&self, width: usize, height: i32) -> Vec<i32> {
        match self {
            GroundProfile::Uniform(level) => vec![*level; width],
            GroundProfile::Columns(columns) => {
                let fill = if columns.is_empty() {
                    height
                } else {
                    (columns.iter().map(|&h| h as i64).sum::<i64>() / columns.len() as i64) as i32
                };
                (0..width)
                    .map(|x| columns.get(x).copied().unwrap_or(fill))
                    .collect()
            }
        }
    }
}

/// Which side of a rectangle touches terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

/// Authoritative destructible terrain
#[derive(Debug, Clone)]
pub struct TerrainMap {
    width: i32,
    height: i32,
    /// Column-major solidity grid (true = solid)
    solid: Vec<bool>,
    /// Topmost solid row per column (`height` when the column is empty)
    height_profile: Vec<i32>,
    /// Explosion records for merge bookkeeping
    craters: Vec<CraterRecord>,
    config: CraterConfig,
    /// Reference point for crater creation times
    epoch: Instant,
}

impl TerrainMap {
    /// Build a map with the default crater tuning
    pub fn new(width: i32, height: i32, profile: impl Into<GroundProfile>) -> Self {
        Self::with_config(width, height, profile, CraterConfig::default())
    }

    /// Build a map, marking every row at or below each column's ground solid
    pub fn with_config(
        width: i32,
        height: i32,
        profile: impl Into<GroundProfile>,
        config: CraterConfig,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let columns = profile.into().to_columns(width as usize, height);

        let mut solid = vec![false; width as usize * height as usize];
        for (x, &ground) in columns.iter().enumerate() {
            let top = ground.clamp(0, height) as usize;
            let start = x * height as usize;
            solid[start + top..start + height as usize].fill(true);
        }

        let mut map = Self {
            width,
            height,
            solid,
            height_profile: vec![height; width as usize],
            craters: Vec::new(),
            config,
            epoch: Instant::now(),
        };
        map.refresh_columns(0, width - 1);
        map
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn config(&self) -> &CraterConfig {
        &self.config
    }

    /// Topmost solid row per column
    pub fn height_profile(&self) -> &[i32] {
        &self.height_profile
    }

    /// Tracked crater records (read-only, for renderers)
    pub fn craters(&self) -> &[CraterRecord] {
        &self.craters
    }

    #[inline]
    fn column(&self, x: i32) -> &[bool] {
        let start = x as usize * self.height as usize;
        &self.solid[start..start + self.height as usize]
    }

    #[inline]
    fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(0, self.width - 1)
    }

    /// Check if terrain exists at a pixel. Out of bounds is empty.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.solid[x as usize * self.height as usize + y as usize]
    }

    /// Shallowest ground row in a small window around `x`.
    ///
    /// Entities span several columns, so a single carved column must not let
    /// them fall through the surface.
    pub fn ground_height(&self, x: i32) -> i32 {
        let x = self.clamp_x(x);
        let window = self.config.ground_window.max(0);
        let lo = x.saturating_sub(window).max(0);
        let hi = x.saturating_add(window).min(self.width - 1);

        self.height_profile[lo as usize..=hi as usize]
            .iter()
            .copied()
            .min()
            .unwrap_or(self.height)
    }

    /// First solid row at or below `y_start` in column `x`, or `height` if none
    pub fn accurate_ground_height(&self, x: i32, y_start: i32) -> i32 {
        let x = self.clamp_x(x);
        let start = y_start.clamp(0, self.height) as usize;

        self.column(x)[start..]
            .iter()
            .position(|&s| s)
            .map_or(self.height, |offset| (start + offset) as i32)
    }

    /// Check a rectangle's side edges against terrain.
    ///
    /// Checks the column just outside each edge on every second row of the
    /// rectangle's vertical span. Left wins when both sides touch on the same row.
    pub fn wall_collision(&self, x: i32, y: i32, w: i32, h: i32) -> Option<WallSide> {
        let left = x.saturating_sub(1);
        let right = x.saturating_add(w);

        (y..y.saturating_add(h)).step_by(2).find_map(|row| {
            if self.is_solid(left, row) {
                Some(WallSide::Left)
            } else if self.is_solid(right, row) {
                Some(WallSide::Right)
            } else {
                None
            }
        })
    }

    /// Carve a circular crater and record it.
    ///
    /// The record list is capped here as well as in the merge pass; dropping
    /// old records never restores ground. Returns false (and records nothing)
    /// for a non-positive radius.
    pub fn create_crater(&mut self, center_x: i32, center_y: i32, radius: i32) -> bool {
        if radius <= 0 {
            return false;
        }

        self.craters.push(CraterRecord::new(
            center_x,
            center_y,
            radius,
            self.epoch.elapsed(),
        ));
        enforce_cap(&mut self.craters, self.config.max_craters);

        let x0 = center_x.saturating_sub(radius).max(0);
        let x1 = center_x.saturating_add(radius).min(self.width - 1);
        let y0 = center_y.saturating_sub(radius).max(0);
        let y1 = center_y.saturating_add(radius).min(self.height - 1);

        if x0 > x1 || y0 > y1 {
            log::debug!(
                "Crater at ({}, {}) r={} lies outside the terrain",
                center_x,
                center_y,
                radius
            );
            return true;
        }

        let r2 = radius as i64 * radius as i64;
        let height = self.height as usize;
        for x in x0..=x1 {
            let dx = x as i64 - center_x as i64;
            let column = &mut self.solid[x as usize * height..(x as usize + 1) * height];
            for y in y0..=y1 {
                let dy = y as i64 - center_y as i64;
                if dx * dx + dy * dy <= r2 {
                    column[y as usize] = false;
                }
            }
        }

        self.refresh_columns(x0, x1);
        log::debug!(
            "Crater at ({}, {}) r={} carved columns {}..={}",
            center_x,
            center_y,
            radius,
            x0,
            x1
        );
        true
    }

    /// Coalesce overlapping crater records. Never touches the grid.
    pub fn merge_overlapping_craters(&mut self) {
        let before = self.craters.len();
        let removed = merge_craters(&mut self.craters, &self.config);
        if removed > 0 {
            log::debug!("Merged craters: {} -> {}", before, self.craters.len());
        }
    }

    /// Recompute the height profile for columns `x0..=x1`
    fn refresh_columns(&mut self, x0: i32, x1: i32) {
        for x in x0..=x1 {
            let top = self
                .column(x)
                .iter()
                .position(|&s| s)
                .map_or(self.height, |y| y as i32);
            self.height_profile[x as usize] = top;
        }
    }

    /// Average ground row across all columns
    pub fn average_ground_level(&self) -> i32 {
        let total: i64 = self.height_profile.iter().map(|&h| h as i64).sum();
        (total / self.height_profile.len() as i64) as i32
    }
}
