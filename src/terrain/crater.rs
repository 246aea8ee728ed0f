//! Crater bookkeeping
//!
//! The pixel grid is authoritative for collision. Crater records only track
//! where explosions happened so overlapping blasts can be coalesced into a
//! single, larger depression record for renderers.

use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning for crater merging and ground queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterConfig {
    /// Craters merge when center distance < overlap_factor * (r1 + r2)
    pub overlap_factor: f32,
    /// Merged radius is capped at max(r1, r2) + growth_limit
    pub growth_limit: i32,
    /// Maximum number of crater records kept at any time
    pub max_craters: usize,
    /// Half-width (columns) of the windowed `ground_height` query
    pub ground_window: i32,
}

impl Default for CraterConfig {
    fn default() -> Self {
        Self {
            overlap_factor: CRATER_OVERLAP_FACTOR,
            growth_limit: CRATER_GROWTH_LIMIT,
            max_craters: MAX_CRATERS,
            ground_window: GROUND_QUERY_WINDOW,
        }
    }
}

/// A single explosion (or merged group of explosions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraterRecord {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
    /// Time since the owning map was built
    pub created_at: Duration,
}

impl CraterRecord {
    pub fn new(center_x: i32, center_y: i32, radius: i32, created_at: Duration) -> Self {
        Self {
            center_x,
            center_y,
            radius,
            created_at,
        }
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(self.center_x, self.center_y)
    }

    /// Distance between two crater centers
    #[inline]
    pub fn distance_to(&self, other: &CraterRecord) -> f32 {
        self.center().as_vec2().distance(other.center().as_vec2())
    }

    /// Check whether two craters overlap enough to be merged
    pub fn overlaps(&self, other: &CraterRecord, overlap_factor: f32) -> bool {
        self.distance_to(other) < merge_threshold(self.radius, other.radius, overlap_factor)
    }

    /// Combine two overlapping craters into one record.
    ///
    /// The center is the radius²-weighted centroid so the larger crater
    /// dominates. The radius covers both circles but never grows more than
    /// `growth_limit` past the larger input.
    pub fn merged_with(&self, other: &CraterRecord, growth_limit: i32) -> CraterRecord {
        let r1 = self.radius as f32;
        let r2 = other.radius as f32;
        let w1 = r1 * r1;
        let w2 = r2 * r2;
        let total = w1 + w2;

        let center = if total > 0.0 {
            (self.center().as_vec2() * w1 + other.center().as_vec2() * w2) / total
        } else {
            (self.center().as_vec2() + other.center().as_vec2()) / 2.0
        };

        let distance = self.distance_to(other);
        let max_extent = (distance + r1).max(distance + r2).max(r1 + r2 * 0.5);
        let radius = (max_extent as i32).min(self.radius.max(other.radius) + growth_limit);

        CraterRecord {
            center_x: center.x as i32,
            center_y: center.y as i32,
            radius,
            created_at: self.created_at.max(other.created_at),
        }
    }
}

/// Run one merge sweep over records sorted oldest first.
///
/// Returns the accumulator and how many records were folded into it.
fn merge_sweep(records: &[CraterRecord], config: &CraterConfig) -> (Vec<CraterRecord>, usize) {
    let mut merged: Vec<CraterRecord> = Vec::with_capacity(records.len());
    let mut folds = 0;

    for current in records {
        let target = merged
            .iter()
            .position(|existing| current.overlaps(existing, config.overlap_factor));

        match target {
            Some(j) => {
                merged[j] = current.merged_with(&merged[j], config.growth_limit);
                folds += 1;
            }
            None => merged.push(*current),
        }
    }

    (merged, folds)
}

/// Coalesce overlapping crater records in place.
///
/// Sweeps repeat until one makes no change, so no two surviving records
/// overlap and a second call is a no-op. The result is ordered by creation
/// time and truncated to the newest `max_craters` entries.
///
/// Returns the number of records removed.
pub fn merge_craters(records: &mut Vec<CraterRecord>, config: &CraterConfig) -> usize {
    let before = records.len();

    if records.len() >= 2 {
        loop {
            records.sort_by_key(|c| c.created_at);
            let (merged, folds) = merge_sweep(records, config);
            *records = merged;
            if folds == 0 {
                break;
            }
        }
    }

    enforce_cap(records, config.max_craters);

    before - records.len()
}

/// Drop the oldest records beyond `max_craters`.
///
/// Records are ordered oldest first, so the front is dropped.
/// Returns the number of records dropped.
pub fn enforce_cap(records: &mut Vec<CraterRecord>, max_craters: usize) -> usize {
    if records.len() <= max_craters {
        return 0;
    }
    let excess = records.len() - max_craters;
    records.drain(..excess);
    log::info!("Crater list capped at {} (dropped {} oldest)", max_craters, excess);
    excess
}

/// Distance at which two craters of the given radii start merging
#[inline]
pub fn merge_threshold(r1: i32, r2: i32, overlap_factor: f32) -> f32 {
    (r1 + r2) as f32 * overlap_factor
}
