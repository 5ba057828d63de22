use crate::error::{Result, TerrainError};

// Flat row-major grid of elevations, `width * height` long.
// access as `map.data[y * map.width + x]` or `map.get(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap2D {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Heightmap2D {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    // Wrap an existing row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        if data.len() != width * height {
            return Err(TerrainError::LengthMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    // Build a map by evaluating `f(x, y)` for every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    // (min, max) over every cell
    pub fn range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    // Mean height of the columns in `x0..x1`, over all rows
    pub fn column_band_mean(&self, x0: usize, x1: usize) -> f64 {
        let x1 = x1.min(self.width);
        if x0 >= x1 {
            return 0.0;
        }
        let mut sum = 0.0f64;
        for y in 0..self.height {
            for x in x0..x1 {
                sum += self.get(x, y) as f64;
            }
        }
        sum / ((x1 - x0) * self.height) as f64
    }
}

// Remap `values` from their observed [min, max] onto [0, 1].
// A flat or non-finite range collapses everything to 0.
// Returns false when that fallback was taken.
pub fn normalize_unit(values: &mut [f64]) -> bool {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for &v in values.iter() {
        min = min.min(v);
        max = max.max(v);
    }

    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        values.iter_mut().for_each(|v| *v = 0.0);
        return false;
    }

    for v in values.iter_mut() {
        *v = (*v - min) / range;
    }
    true
}
