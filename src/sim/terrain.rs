//! Destructible grid terrain
//!
//! A fixed-size grid of `Sky`/`Ground` cells stored row-major in one buffer.
//! Explosions carve circular craters into it; nothing ever adds ground back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField1D;
use crate::error::SimError;
use crate::settings::Settings;

/// State of a single terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Sky,
    Ground,
}

/// The destructible terrain grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Terrain {
    /// All-sky terrain
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        Self::filled(width, height, CellState::Sky)
    }

    /// Terrain with every cell set to `state`
    pub fn filled(width: usize, height: usize, state: CellState) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(SimError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![state; len],
        })
    }

    /// Heightmap terrain: column `x` is ground from `noise(x) * height` down.
    ///
    /// The noise field must have exactly `width` samples.
    pub fn from_noise(
        width: usize,
        height: usize,
        noise: &mut NoiseField1D,
    ) -> Result<Self, SimError> {
        let mut terrain = Self::new(width, height)?;
        if noise.len() != width {
            return Err(SimError::LengthMismatch {
                expected: width,
                actual: noise.len(),
            });
        }
        for (x, &v) in noise.values().iter().enumerate() {
            let surface = ((v * height as f32).floor().max(0.0) as usize).min(height);
            for y in surface..height {
                terrain.cells[y * width + x] = CellState::Ground;
            }
        }
        Ok(terrain)
    }

    /// Generate rolling hills from the settings' noise parameters and seed
    pub fn generate(settings: &Settings) -> Result<Self, SimError> {
        let mut noise = NoiseField1D::with_params(
            settings.terrain_width,
            settings.noise_octaves,
            settings.noise_base_drop,
            settings.seed,
        )?;
        // Pin the wraparound sample so both map edges start mid-height
        noise.set_seed(0, 0.5)?;
        let terrain = Self::from_noise(settings.terrain_width, settings.terrain_height, &mut noise)?;
        log::info!(
            "Generated {}x{} terrain ({} ground cells, seed {})",
            terrain.width,
            terrain.height,
            terrain.ground_count(),
            settings.seed
        );
        Ok(terrain)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only row-major view of all cells
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, SimError> {
        if !self.contains(x, y) {
            return Err(SimError::OutOfBounds {
                x: x.into(),
                y: y.into(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Cell state at `(x, y)`; outside the grid is an error
    pub fn cell_at(&self, x: i32, y: i32) -> Result<CellState, SimError> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, state: CellState) -> Result<(), SimError> {
        let i = self.index(x, y)?;
        self.cells[i] = state;
        Ok(())
    }

    /// Cell under a world-space point, or `None` outside the grid
    pub fn probe(&self, p: Vec2) -> Option<CellState> {
        if !p.is_finite() {
            return None;
        }
        let (x, y) = (p.x.floor() as i32, p.y.floor() as i32);
        self.contains(x, y)
            .then(|| self.cells[y as usize * self.width + x as usize])
    }

    /// True once a disk at `pos` has fallen below the grid or drifted past a
    /// side edge, where nothing can ever stop it. Open sky above the grid
    /// doesn't count.
    pub fn has_left(&self, pos: Vec2, radius: f32) -> bool {
        !pos.is_finite()
            || pos.y - radius >= self.height as f32
            || pos.x + radius < 0.0
            || pos.x - radius >= self.width as f32
    }

    /// First ground row in column `x`, scanning from the top
    pub fn surface_height(&self, x: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        (0..self.height).find(|&y| self.cells[y * self.width + x] == CellState::Ground)
    }

    pub fn ground_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == CellState::Ground).count()
    }

    /// Clear the clipped horizontal span `[x0, x1]` on row `y`
    fn clear_span(&mut self, x0: i64, x1: i64, y: i64) -> usize {
        if y < 0 || y as usize >= self.height {
            return 0;
        }
        let lo = x0.max(0);
        let hi = x1.min(self.width as i64 - 1);
        let mut cleared = 0;
        for x in lo..=hi {
            let cell = &mut self.cells[y as usize * self.width + x as usize];
            if *cell == CellState::Ground {
                *cell = CellState::Sky;
                cleared += 1;
            }
        }
        cleared
    }

    /// Carve a crater, turning every cell of the rasterized disk to `Sky`.
    ///
    /// The disk is built from midpoint-circle scan lines, so it's
    /// octant-symmetric rather than an exact Euclidean disk. Center and
    /// radius are rounded to whole cells; any positive radius carves at
    /// least one cell. Cells off the grid are clipped. Returns the number
    /// of cells that changed from `Ground` to `Sky`.
    pub fn carve_circle(&mut self, center: Vec2, radius: f32) -> usize {
        if !(radius > 0.0) || !center.is_finite() {
            return 0;
        }
        // A disk wider than the grid diagonal clears the same cells
        let diagonal = (self.width as f32).hypot(self.height as f32).ceil() as i64 + 1;
        let r = (radius.round() as i64).clamp(1, diagonal);
        let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);
        if cx.saturating_add(r) < 0
            || cx.saturating_sub(r) >= self.width as i64
            || cy.saturating_add(r) < 0
            || cy.saturating_sub(r) >= self.height as i64
        {
            return 0;
        }

        let mut x = 0;
        let mut y = r;
        let mut p = 3 - 2 * r;
        let mut cleared = 0;
        while y >= x {
            cleared += self.clear_span(cx - x, cx + x, cy - y);
            cleared += self.clear_span(cx - y, cx + y, cy - x);
            cleared += self.clear_span(cx - x, cx + x, cy + y);
            cleared += self.clear_span(cx - y, cx + y, cy + x);
            if p < 0 {
                p += 4 * x + 6;
            } else {
                p += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }
        cleared
    }
}
