//! Fractal value noise
//!
//! A seed array of samples in [0, 1] is blended over several octaves, each
//! octave halving the grid pitch. Octave weights fall off by `base_drop` and
//! the result is normalized by the summed weights, so with a positive
//! `base_drop` every output lies between the smallest and largest seed sample.
//!
//! Values are cached and only resynthesized after the seed, octave count or
//! base drop changes.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{NOISE_BASE_DROP, NOISE_BASE_DROP_2D, NOISE_OCTAVES};
use crate::error::SimError;
use crate::random_unit;

/// Shape of a noise field: how samples are addressed and blended
pub trait Layout {
    /// Total number of samples
    fn len(&self) -> usize;

    /// Fill `out` with fractal noise built from `seed`
    fn synthesize(&self, seed: &[f32], octaves: u32, base_drop: f32, out: &mut [f32]);
}

/// One-dimensional layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    size: usize,
}

/// Two-dimensional layout, row-major (`y * width + x`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

/// Grid spacing for an octave; 0 once the octave is finer than one sample
#[inline]
fn pitch(extent: usize, octave: u32) -> usize {
    extent.checked_shr(octave).unwrap_or(0)
}

/// Lower and upper sample index around `x` plus the blend between them
#[inline]
fn bracket(x: usize, pitch: usize, extent: usize) -> (usize, usize, f32) {
    let lo = x - x % pitch;
    let hi = (lo + pitch) % extent;
    (lo, hi, (x - lo) as f32 / pitch as f32)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Weighted average of per-octave values.
///
/// `octave_value` returns `None` once the pitch collapses, which ends the sum
/// early. If the weights cancel out (negative `base_drop`), the coarsest
/// octave is returned on its own.
fn fractal(octaves: u32, base_drop: f32, mut octave_value: impl FnMut(u32) -> Option<f32>) -> f32 {
    let mut scale = 1.0;
    let mut scale_sum = 0.0;
    let mut total = 0.0;
    let mut coarsest = None;

    for octave in 0..octaves {
        let Some(value) = octave_value(octave) else {
            break;
        };
        coarsest.get_or_insert(value);
        total += value * scale;
        scale_sum += scale;
        scale /= base_drop;
    }

    if scale_sum.abs() > f32::EPSILON {
        total / scale_sum
    } else {
        coarsest.unwrap_or(0.0)
    }
}

impl Layout for Line {
    fn len(&self) -> usize {
        self.size
    }

    fn synthesize(&self, seed: &[f32], octaves: u32, base_drop: f32, out: &mut [f32]) {
        let size = self.size;
        for (x, value) in out.iter_mut().enumerate() {
            *value = fractal(octaves, base_drop, |octave| {
                let pitch = pitch(size, octave);
                if pitch == 0 {
                    return None;
                }
                let (lo, hi, blend) = bracket(x, pitch, size);
                Some(lerp(seed[lo], seed[hi], blend))
            });
        }
    }
}

impl Layout for Grid {
    fn len(&self) -> usize {
        self.width * self.height
    }

    fn synthesize(&self, seed: &[f32], octaves: u32, base_drop: f32, out: &mut [f32]) {
        let (width, height) = (self.width, self.height);
        for y in 0..height {
            for x in 0..width {
                out[y * width + x] = fractal(octaves, base_drop, |octave| {
                    let pitch_x = pitch(width, octave);
                    let pitch_y = pitch(height, octave);
                    if pitch_x == 0 || pitch_y == 0 {
                        return None;
                    }
                    let (x0, x1, blend_x) = bracket(x, pitch_x, width);
                    let (y0, y1, blend_y) = bracket(y, pitch_y, height);

                    let top = lerp(seed[y0 * width + x0], seed[y0 * width + x1], blend_x);
                    let bottom = lerp(seed[y1 * width + x0], seed[y1 * width + x1], blend_x);
                    Some(lerp(top, bottom, blend_y))
                });
            }
        }
    }
}

/// Lazily synthesized fractal noise over a layout
#[derive(Debug, Clone)]
pub struct NoiseField<L: Layout> {
    layout: L,
    seed: Vec<f32>,
    values: Vec<f32>,
    /// Seed array has been filled (randomly or otherwise)
    seeded: bool,
    /// Cached values are stale
    tainted: bool,
    octaves: u32,
    base_drop: f32,
    rng: Pcg32,
}

pub type NoiseField1D = NoiseField<Line>;
pub type NoiseField2D = NoiseField<Grid>;

impl<L: Layout> NoiseField<L> {
    fn with_layout(layout: L, octaves: u32, base_drop: f32, rng_seed: u64) -> Self {
        let len = layout.len();
        Self {
            layout,
            seed: vec![0.0; len],
            values: vec![0.0; len],
            seeded: false,
            tainted: true,
            octaves,
            base_drop,
            rng: Pcg32::seed_from_u64(rng_seed),
        }
    }

    /// Number of samples in the field
    pub fn len(&self) -> usize {
        self.seed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seed.is_empty()
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn base_drop(&self) -> f32 {
        self.base_drop
    }

    pub fn seed(&self) -> &[f32] {
        &self.seed
    }

    /// Fill every seed sample uniformly in [0, 1]
    pub fn randomize_seed(&mut self) {
        for sample in &mut self.seed {
            *sample = random_unit(&mut self.rng);
        }
        self.seeded = true;
        self.tainted = true;
    }

    /// Override one seed sample (flat index).
    ///
    /// The rest of the seed is randomized first if it never was.
    pub fn set_seed(&mut self, index: usize, value: f32) -> Result<(), SimError> {
        let len = self.len();
        if index >= len {
            return Err(SimError::IndexOutOfRange { index, len });
        }
        if !self.seeded {
            self.randomize_seed();
        }
        self.seed[index] = value;
        self.tainted = true;
        Ok(())
    }

    pub fn set_octaves(&mut self, octaves: u32) {
        self.octaves = octaves;
        self.tainted = true;
    }

    pub fn set_base_drop(&mut self, base_drop: f32) {
        self.base_drop = base_drop;
        self.tainted = true;
    }

    /// Whether the next read will resynthesize
    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    fn refresh(&mut self) {
        if !self.seeded {
            self.randomize_seed();
        }
        if self.tainted {
            self.layout
                .synthesize(&self.seed, self.octaves, self.base_drop, &mut self.values);
            self.tainted = false;
        }
    }

    /// Noise value at a flat index
    pub fn sample(&mut self, index: usize) -> Result<f32, SimError> {
        let len = self.len();
        if index >= len {
            return Err(SimError::IndexOutOfRange { index, len });
        }
        self.refresh();
        Ok(self.values[index])
    }

    /// All noise values in layout order
    pub fn values(&mut self) -> &[f32] {
        self.refresh();
        &self.values
    }

    fn resize(&mut self, layout: L) {
        let len = layout.len();
        self.layout = layout;
        self.seed = vec![0.0; len];
        self.values = vec![0.0; len];
        self.seeded = false;
        self.tainted = true;
    }
}

impl NoiseField1D {
    /// 1D field with the default octave count and base drop
    pub fn new(size: usize, rng_seed: u64) -> Result<Self, SimError> {
        Self::with_params(size, NOISE_OCTAVES, NOISE_BASE_DROP, rng_seed)
    }

    pub fn with_params(
        size: usize,
        octaves: u32,
        base_drop: f32,
        rng_seed: u64,
    ) -> Result<Self, SimError> {
        if size == 0 {
            return Err(SimError::InvalidDimensions {
                width: size,
                height: 1,
            });
        }
        Ok(Self::with_layout(Line { size }, octaves, base_drop, rng_seed))
    }

    pub fn get(&mut self, x: usize) -> Result<f32, SimError> {
        self.sample(x)
    }

    /// Reallocate for a new size; the seed will be re-randomized
    pub fn set_size(&mut self, size: usize) -> Result<(), SimError> {
        if size == 0 {
            return Err(SimError::InvalidDimensions {
                width: size,
                height: 1,
            });
        }
        self.resize(Line { size });
        Ok(())
    }
}

impl NoiseField2D {
    /// 2D field with the default octave count and base drop
    pub fn new(width: usize, height: usize, rng_seed: u64) -> Result<Self, SimError> {
        Self::with_params(width, height, NOISE_OCTAVES, NOISE_BASE_DROP_2D, rng_seed)
    }

    pub fn with_params(
        width: usize,
        height: usize,
        octaves: u32,
        base_drop: f32,
        rng_seed: u64,
    ) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        Ok(Self::with_layout(
            Grid { width, height },
            octaves,
            base_drop,
            rng_seed,
        ))
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn get(&mut self, x: usize, y: usize) -> Result<f32, SimError> {
        if x >= self.layout.width || y >= self.layout.height {
            return Err(SimError::IndexOutOfRange {
                index: y.saturating_mul(self.layout.width).saturating_add(x),
                len: self.len(),
            });
        }
        self.sample(y * self.layout.width + x)
    }

    pub fn set_seed_at(&mut self, x: usize, y: usize, value: f32) -> Result<(), SimError> {
        if x >= self.layout.width || y >= self.layout.height {
            return Err(SimError::IndexOutOfRange {
                index: y.saturating_mul(self.layout.width).saturating_add(x),
                len: self.len(),
            });
        }
        self.set_seed(y * self.layout.width + x, value)
    }

    /// Reallocate for new dimensions; the seed will be re-randomized
    pub fn set_size(&mut self, width: usize, height: usize) -> Result<(), SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        self.resize(Grid { width, height });
        Ok(())
    }
}
