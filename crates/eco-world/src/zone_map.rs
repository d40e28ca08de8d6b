//! 2D grid of biome zones.

use crate::zone::Zone;
use eco_core::{Error, Position, Result, Rgb, ZoneKind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Smoothing window relative to the cell: one back, four forward on each axis.
const SMOOTHING_OFFSETS: std::ops::RangeInclusive<i64> = -1..=4;

/// A bounded (non-wrapping) grid of zones
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneMap {
    pub width: usize,
    pub height: usize,
    cells: Vec<ZoneKind>,
}

impl ZoneMap {
    /// Build a map from explicit row-major cells
    pub fn from_cells(width: usize, height: usize, cells: Vec<ZoneKind>) -> Result<Self> {
        if width == 0 || height == 0 || cells.len() != width * height {
            return Err(Error::InvalidConfig(format!(
                "zone map {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Every cell set to the same zone
    pub fn uniform(width: usize, height: usize, kind: ZoneKind) -> Result<Self> {
        Self::from_cells(width, height, vec![kind; width * height])
    }

    /// Random per-cell assignment followed by `passes` rounds of majority smoothing
    pub fn generate(
        width: usize,
        height: usize,
        passes: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self> {
        let kinds = ZoneKind::all();
        let cells = (0..width * height)
            .map(|_| kinds[rng.gen_range(0..kinds.len())])
            .collect();
        let mut map = Self::from_cells(width, height, cells)?;

        for _ in 0..passes {
            map = map.smooth();
        }

        Ok(map)
    }

    /// One majority-vote pass. Reads only `self` and writes a fresh grid.
    pub fn smooth(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());

        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                cells.push(self.majority_around(x, y));
            }
        }

        Self {
            width: self.width,
            height: self.height,
            cells,
        }
    }

    /// Most frequent zone in the window; ties go to the zone seen first
    fn majority_around(&self, x: i64, y: i64) -> ZoneKind {
        // Insertion-ordered tally, at most one slot per zone kind
        let mut counts: Vec<(ZoneKind, u32)> = Vec::with_capacity(4);

        for dy in SMOOTHING_OFFSETS {
            for dx in SMOOTHING_OFFSETS {
                let Some(kind) = self.kind_at(x + dx, y + dy) else {
                    continue;
                };
                match counts.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((kind, 1)),
                }
            }
        }

        let mut best = counts[0];
        for &entry in &counts[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        best.0
    }

    fn kind_at(&self, x: i64, y: i64) -> Option<ZoneKind> {
        self.index(x, y).map(|i| self.cells[i])
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Bounds-checked cell lookup
    pub fn get_zone(&self, x: i64, y: i64) -> Result<&'static Zone> {
        self.kind_at(x, y)
            .map(Zone::of)
            .ok_or(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Fresh (sunlight, humidity) reading for a cell; re-rolled on every call
    pub fn get_sunlight_and_humidity(
        &self,
        x: i64,
        y: i64,
        rng: &mut ChaCha8Rng,
    ) -> Result<(f32, f32)> {
        let zone = self.get_zone(x, y)?;
        let sunlight = zone.sample_temperature(rng);
        let humidity = zone.sample_humidity(rng);
        Ok((sunlight, humidity))
    }

    /// Cell containing a world-space point, clamped into the grid
    pub fn cell_at_point(&self, pos: Position, world_width: f32, world_height: f32) -> (i64, i64) {
        let cell_w = world_width / self.width as f32;
        let cell_h = world_height / self.height as f32;
        let cx = (pos.x / cell_w).floor() as i64;
        let cy = (pos.y / cell_h).floor() as i64;
        (
            cx.clamp(0, self.width as i64 - 1),
            cy.clamp(0, self.height as i64 - 1),
        )
    }

    /// Zone under a world-space point
    pub fn zone_at_point(
        &self,
        pos: Position,
        world_width: f32,
        world_height: f32,
    ) -> Result<&'static Zone> {
        let (cx, cy) = self.cell_at_point(pos, world_width, world_height);
        self.get_zone(cx, cy)
    }

    /// Row-major background colors
    pub fn colors(&self) -> Vec<Rgb> {
        self.cells.iter().map(|k| Zone::of(*k).color).collect()
    }

    /// Iterator over all cells with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), ZoneKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, kind)| ((i % self.width, i / self.width), *kind))
    }

    pub fn count(&self, kind: ZoneKind) -> usize {
        self.cells.iter().filter(|k| **k == kind).count()
    }
}
