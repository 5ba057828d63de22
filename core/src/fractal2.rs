use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::NoiseGenerator;
use crate::error::{Result, TerrainError};
use crate::perlin3::{MIN_SCALE, Perlin3D};
use crate::utils::{Heightmap2D, normalize_unit};

// Octave offsets are drawn from [-OFFSET_RANGE, OFFSET_RANGE)
const OFFSET_RANGE: i32 = 100_000;

// Parameters for fractal heightmap synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub scale: f64, // world units per noise cell; <= 0 is clamped
    pub octaves: usize,
    pub persistence: f64, // amplitude decay per octave
    pub lacunarity: f64,  // frequency growth per octave
    pub offset: [f64; 2],
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed: 0,
            scale: 20.0,
            octaves: 6,
            persistence: 0.3,
            lacunarity: 3.0,
            offset: [0.0, 0.0],
        }
    }
}

impl NoiseParams {
    // Params for a vertex grid of `map_size` quads per side: (map_size+1)^2 samples
    pub fn vertex_grid(map_size: usize) -> Self {
        Self {
            width: map_size + 1,
            height: map_size + 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.scale.is_finite() {
            return Err(TerrainError::config("scale", "must be finite"));
        }
        if !(self.persistence.is_finite() && self.lacunarity.is_finite()) {
            return Err(TerrainError::config(
                "persistence/lacunarity",
                "must be finite",
            ));
        }
        Ok(())
    }

    // Scale actually used for sampling
    pub fn effective_scale(&self) -> f64 {
        if self.scale <= 0.0 {
            MIN_SCALE
        } else {
            self.scale
        }
    }
}

// Multi-octave heightmap synthesizer.
// Every octave samples the noise at its own seeded offset, and the
// accumulated field is remapped onto [0, 1] by its realized extrema.
pub struct Fractal2D {
    params: NoiseParams,
    octave_offsets: Vec<(f64, f64)>,
}

impl Fractal2D {
    pub fn new(params: NoiseParams) -> Self {
        let octave_offsets = octave_offsets(&params);
        Self {
            params,
            octave_offsets,
        }
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn octave_offsets(&self) -> &[(f64, f64)] {
        &self.octave_offsets
    }

    // Generate with the reference Perlin3D primitive
    pub fn generate(&self) -> Heightmap2D {
        self.generate_with(&Perlin3D::new())
    }

    // Generate a width×height map with values in [0, 1] from any noise source
    pub fn generate_with(&self, noise: &impl NoiseGenerator) -> Heightmap2D {
        let p = &self.params;
        if p.scale <= 0.0 {
            warn!("noise scale {} <= 0, clamping to {}", p.scale, MIN_SCALE);
        }
        let scale = p.effective_scale();
        // centre so that zooming pivots around the middle of the map
        let half_w = p.width as f64 / 2.0;
        let half_h = p.height as f64 / 2.0;

        let mut raw = vec![0.0f64; p.width * p.height];
        for y in 0..p.height {
            for x in 0..p.width {
                let mut amplitude = 1.0;
                let mut frequency = 1.0;
                let mut total = 0.0;

                for &(ox, oy) in &self.octave_offsets {
                    let sx = (x as f64 - half_w) / scale * frequency + ox;
                    let sy = (y as f64 - half_h) / scale * frequency + oy;
                    // stored heights use the [0, 1] convention
                    let v = (noise.get2(sx, sy) + 1.0) / 2.0;
                    total += v * amplitude;

                    amplitude *= p.persistence;
                    frequency *= p.lacunarity;
                }
                raw[y * p.width + x] = total;
            }
        }

        if !normalize_unit(&mut raw) {
            warn!(
                "flat noise field ({} octaves), heightmap set to zero",
                p.octaves
            );
        }
        debug!(
            "generated {}x{} heightmap, seed {}, {} octaves",
            p.width, p.height, p.seed, p.octaves
        );

        Heightmap2D {
            width: p.width,
            height: p.height,
            data: raw.into_iter().map(|v| v as f32).collect(),
        }
    }
}

// One offset per octave from a generator seeded with `params.seed`
fn octave_offsets(params: &NoiseParams) -> Vec<(f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    (0..params.octaves)
        .map(|_| {
            let ox = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f64 + params.offset[0];
            let oy = rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE) as f64 + params.offset[1];
            (ox, oy)
        })
        .collect()
}

// Validate `params` and synthesize a heightmap in [0, 1]
pub fn generate_heightmap(params: &NoiseParams) -> Result<Heightmap2D> {
    params.validate()?;
    Ok(Fractal2D::new(params.clone()).generate())
}

#[cfg(test)]
mod tests {
    use super::{Fractal2D, NoiseParams, generate_heightmap};
    use crate::NoiseGenerator;

    fn small(seed: u64) -> NoiseParams {
        NoiseParams {
            width: 48,
            height: 32,
            seed,
            scale: 12.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
        }
    }

    #[test]
    fn fractal2_dimensions() {
        let m = generate_heightmap(&small(1)).unwrap();
        assert_eq!(m.width, 48);
        assert_eq!(m.height, 32);
        assert_eq!(m.data.len(), 48 * 32);
    }

    #[test]
    fn fractal2_determinism() {
        let a = generate_heightmap(&small(42)).unwrap();
        let b = generate_heightmap(&small(42)).unwrap();
        assert_eq!(a, b);
        let c = generate_heightmap(&small(43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn fractal2_normalized_range() {
        for seed in [0, 7, 2025] {
            let m = generate_heightmap(&small(seed)).unwrap();
            assert!(m.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
            assert!(m.data.iter().any(|&v| v == 0.0), "no cell at 0");
            assert!(m.data.iter().any(|&v| v == 1.0), "no cell at 1");
        }
    }

    #[test]
    fn zero_octaves_is_all_zero() {
        let params = NoiseParams {
            octaves: 0,
            ..small(3)
        };
        let m = generate_heightmap(&params).unwrap();
        assert!(m.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn non_positive_scale_is_clamped() {
        for scale in [0.0, -5.0] {
            let params = NoiseParams {
                scale,
                ..small(9)
            };
            let m = generate_heightmap(&params).unwrap();
            assert!(m.data.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn zero_dimensions_rejected() {
        let params = NoiseParams {
            width: 0,
            ..small(1)
        };
        assert!(generate_heightmap(&params).is_err());
    }

    #[test]
    fn offsets_follow_seed_and_caller_offset() {
        let a = Fractal2D::new(small(5));
        let b = Fractal2D::new(NoiseParams {
            offset: [10.0, -2.5],
            ..small(5)
        });
        assert_eq!(a.octave_offsets().len(), 4);
        for (&(ax, ay), &(bx, by)) in a.octave_offsets().iter().zip(b.octave_offsets()) {
            assert_eq!(bx - ax, 10.0);
            assert_eq!(by - ay, -2.5);
            assert!((-100_000.0..100_000.0).contains(&ax));
        }
    }

    #[test]
    fn vertex_grid_has_extra_row_and_column() {
        let params = NoiseParams {
            seed: 4,
            ..NoiseParams::vertex_grid(16)
        };
        let m = generate_heightmap(&params).unwrap();
        assert_eq!((m.width, m.height), (17, 17));
    }

    // A noise source whose value depends only on x
    struct XRamp;

    impl NoiseGenerator for XRamp {
        fn get3(&self, x: f64, _y: f64, _z: f64) -> f64 {
            (x / 1000.0).clamp(-1.0, 1.0)
        }
    }

    #[test]
    fn generate_with_custom_source() {
        let params = NoiseParams {
            width: 8,
            height: 4,
            seed: 0,
            scale: 1.0,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: [0.0, 0.0],
        };
        let mut f = Fractal2D::new(params);
        // pin the offset so the source stays inside its linear region
        f.octave_offsets = vec![(0.0, 0.0)];
        let m = f.generate_with(&XRamp);
        for y in 0..4 {
            assert_eq!(m.get(0, y), 0.0);
            assert_eq!(m.get(7, y), 1.0);
            for x in 1..8 {
                assert!(m.get(x, y) > m.get(x - 1, y));
            }
        }
    }
}
