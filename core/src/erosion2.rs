use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::brush2::ErosionBrush;
use crate::config::{DirectionUpdate, ErosionConfig, ErosionPolicy, MIN_POINT_FACTOR};
use crate::error::{Result, TerrainError};
use crate::utils::Heightmap2D;

// Why a droplet stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Lifetime, // ran all `lifetime` steps
    Stalled,  // direction collapsed to zero length
    LeftMap,  // next position would leave the sampling region
}

// Outcome of a single droplet trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropletReport {
    pub start: (usize, usize),
    pub steps: usize,
    pub termination: Termination,
    pub eroded: f32,      // total removed from the ground
    pub deposited: f32,   // total added back
    pub final_speed: f32, // speed when the droplet stopped
}

// Bilinear height and slope at a continuous position
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeightAndGradient {
    height: f32,
    gradient_x: f32,
    gradient_y: f32,
}

// Transient per-trajectory state
struct Droplet {
    pos_x: f32,
    pos_y: f32,
    dir_x: f32,
    dir_y: f32,
    speed: f32,
    water: f32,
    sediment: f32,
}

// Droplet-based hydraulic erosion over a square heightmap.
// Droplets run one after another on the same buffer; each sees the
// changes left by the ones before it.
pub struct HydraulicErosion2D {
    config: ErosionConfig,
    seed: u64,
    rng: ChaCha8Rng,
    brush: Option<ErosionBrush>, // cached until grid size or radius changes
}

impl HydraulicErosion2D {
    // config - simulation parameters (see `ErosionConfig::validate`)
    // seed - starts the droplet stream; the same seed replays the same droplets
    pub fn new(config: ErosionConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            brush: None,
        }
    }

    // Start from a fresh random seed, readable afterwards through `seed()`
    pub fn from_entropy(config: ErosionConfig) -> Self {
        Self::new(config, rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // Swap the parameters; the brush is rebuilt lazily if the radius changed
    pub fn set_config(&mut self, config: ErosionConfig) {
        self.config = config;
    }

    // Restart the droplet stream
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn brush(&self) -> Option<&ErosionBrush> {
        self.brush.as_ref()
    }

    // Run `iterations` droplets over a grid_size×grid_size row-major buffer.
    // Reusing the simulator continues the same random stream.
    pub fn erode(&mut self, heights: &mut [f32], grid_size: usize, iterations: usize) {
        self.prepare(heights, grid_size);

        let mut eroded = 0.0f64;
        let mut deposited = 0.0f64;
        for _ in 0..iterations {
            let report = self.run_droplet(heights, grid_size);
            eroded += report.eroded as f64;
            deposited += report.deposited as f64;
        }
        debug!(
            "eroded {}x{} map with {} droplets: removed {:.4}, deposited {:.4}",
            grid_size, grid_size, iterations, eroded, deposited
        );
    }

    // `erode` for a `Heightmap2D`; the map must be square and at least 2x2
    pub fn erode_map(&mut self, map: &mut Heightmap2D, iterations: usize) -> Result<()> {
        if !map.is_square() {
            return Err(TerrainError::NotSquare {
                width: map.width,
                height: map.height,
            });
        }
        if map.width < 2 {
            return Err(TerrainError::InvalidDimensions {
                width: map.width,
                height: map.height,
            });
        }
        let size = map.width;
        self.erode(&mut map.data, size, iterations);
        Ok(())
    }

    // Simulate exactly one droplet. The map is fully consistent afterwards,
    // so callers can stop or checkpoint between calls.
    pub fn simulate_droplet(&mut self, heights: &mut [f32], grid_size: usize) -> DropletReport {
        self.prepare(heights, grid_size);
        self.run_droplet(heights, grid_size)
    }

    fn prepare(&mut self, heights: &[f32], grid_size: usize) {
        assert!(grid_size >= 2, "grid size {} is below 2", grid_size);
        assert!(
            heights.len() >= grid_size * grid_size,
            "height buffer holds {} cells, {}x{} needs {}",
            heights.len(),
            grid_size,
            grid_size,
            grid_size * grid_size
        );

        if let Some(radius) = self.config.brush_radius() {
            let stale = self
                .brush
                .as_ref()
                .is_none_or(|b| !b.matches(grid_size, radius));
            if stale {
                debug!("building erosion brush: grid {}, radius {}", grid_size, radius);
                self.brush = Some(ErosionBrush::new(grid_size, radius));
            }
        }
    }

    fn run_droplet(&mut self, heights: &mut [f32], grid_size: usize) -> DropletReport {
        let cfg = &self.config;
        // last coordinate whose 2x2 sampling cell is still inside the grid
        let limit = (grid_size - 2) as f32;

        let start = (
            self.rng.gen_range(0..grid_size - 1),
            self.rng.gen_range(0..grid_size - 1),
        );
        let mut drop = Droplet {
            pos_x: start.0 as f32,
            pos_y: start.1 as f32,
            dir_x: 0.0,
            dir_y: 0.0,
            speed: cfg.initial_speed,
            water: cfg.initial_water,
            sediment: 0.0,
        };
        let mut report = DropletReport {
            start,
            steps: 0,
            termination: Termination::Lifetime,
            eroded: 0.0,
            deposited: 0.0,
            final_speed: drop.speed,
        };

        for step in 0..cfg.lifetime {
            let node_x = drop.pos_x as usize;
            let node_y = drop.pos_y as usize;
            let index = node_y * grid_size + node_x;
            // offset inside the cell: (0,0) at node, (1,1) at the diagonal node
            let cell_x = drop.pos_x - node_x as f32;
            let cell_y = drop.pos_y - node_y as f32;

            let here = height_and_gradient(heights, grid_size, drop.pos_x, drop.pos_y);

            match cfg.direction {
                DirectionUpdate::Inertia => {
                    drop.dir_x = drop.dir_x * cfg.inertia - here.gradient_x * (1.0 - cfg.inertia);
                    drop.dir_y = drop.dir_y * cfg.inertia - here.gradient_y * (1.0 - cfg.inertia);
                }
                DirectionUpdate::Accumulate => {
                    drop.dir_x -= here.gradient_x;
                    drop.dir_y -= here.gradient_y;
                }
            }

            let len = (drop.dir_x * drop.dir_x + drop.dir_y * drop.dir_y).sqrt();
            if len == 0.0 || !len.is_finite() {
                report.steps = step;
                report.termination = Termination::Stalled;
                break;
            }
            drop.dir_x /= len;
            drop.dir_y /= len;

            // one cell per step regardless of speed
            drop.pos_x += drop.dir_x;
            drop.pos_y += drop.dir_y;

            // the next sample reads pos+1 in both axes; never let it leave the buffer
            if drop.pos_x < 0.0 || drop.pos_x > limit || drop.pos_y < 0.0 || drop.pos_y > limit {
                report.steps = step;
                report.termination = Termination::LeftMap;
                break;
            }

            let new_height = height_and_gradient(heights, grid_size, drop.pos_x, drop.pos_y).height;
            let delta_height = new_height - here.height;

            let capacity = (-delta_height * drop.speed * drop.water * cfg.capacity_factor)
                .max(cfg.min_capacity);

            if drop.sediment > capacity || delta_height > 0.0 {
                // uphill: fill the step exactly, never overfill
                let amount = if delta_height > 0.0 {
                    delta_height.min(drop.sediment)
                } else {
                    (drop.sediment - capacity) * cfg.deposition_rate
                };
                drop.sediment -= amount;
                deposit_bilinear(heights, grid_size, index, cell_x, cell_y, amount);
                report.deposited += amount;
            } else {
                // never dig deeper than the terrain actually dropped
                let amount = ((capacity - drop.sediment) * cfg.erosion_rate).min(-delta_height);
                let removed = match cfg.policy {
                    ErosionPolicy::Point { max_factor } => {
                        let factor = self
                            .rng
                            .gen_range(MIN_POINT_FACTOR..=max_factor.max(MIN_POINT_FACTOR));
                        take_clamped(&mut heights[index], amount * factor)
                    }
                    ErosionPolicy::Brush { .. } => self
                        .brush
                        .as_ref()
                        .expect("prepare builds the brush for the brush policy")
                        .at(index)
                        .map(|(i, w)| {
                            take_clamped(&mut heights[i], amount * cfg.brush_multiplier * w)
                        })
                        .sum::<f32>(),
                };
                drop.sediment += removed;
                report.eroded += removed;
            }

            drop.speed = next_speed(drop.speed, delta_height, cfg);
            drop.water *= 1.0 - cfg.evaporation_rate;
            report.steps = step + 1;
        }
        report.final_speed = drop.speed;

        trace!(
            "droplet from {:?}: {} steps, {:?}",
            report.start, report.steps, report.termination
        );
        report
    }
}

// Gravity speeds the droplet up downhill and slows it uphill, then friction
// takes a fixed fraction every step
#[inline]
fn next_speed(speed: f32, delta_height: f32, cfg: &ErosionConfig) -> f32 {
    (speed * speed - delta_height * cfg.gravity).max(0.0).sqrt() * (1.0 - cfg.friction)
}

// Remove up to `amount` from a node without taking it below zero
#[inline]
fn take_clamped(node: &mut f32, amount: f32) -> f32 {
    let delta = amount.min(node.max(0.0));
    *node -= delta;
    delta
}

// Spread `amount` over the 4 corners of the cell at `index`
fn deposit_bilinear(
    heights: &mut [f32],
    grid_size: usize,
    index: usize,
    cell_x: f32,
    cell_y: f32,
    amount: f32,
) {
    heights[index] += amount * (1.0 - cell_x) * (1.0 - cell_y);
    heights[index + 1] += amount * cell_x * (1.0 - cell_y);
    heights[index + grid_size] += amount * (1.0 - cell_x) * cell_y;
    heights[index + grid_size + 1] += amount * cell_x * cell_y;
}

fn height_and_gradient(
    heights: &[f32],
    grid_size: usize,
    pos_x: f32,
    pos_y: f32,
) -> HeightAndGradient {
    let coord_x = pos_x as usize;
    let coord_y = pos_y as usize;
    let x = pos_x - coord_x as f32;
    let y = pos_y - coord_y as f32;

    let i = coord_y * grid_size + coord_x;
    let h00 = heights[i];
    let h10 = heights[i + 1];
    let h01 = heights[i + grid_size];
    let h11 = heights[i + grid_size + 1];

    HeightAndGradient {
        height: h00 * (1.0 - x) * (1.0 - y) + h10 * x * (1.0 - y) + h01 * (1.0 - x) * y + h11 * x * y,
        gradient_x: (h10 - h00) * (1.0 - y) + (h11 - h01) * y,
        gradient_y: (h01 - h00) * (1.0 - x) + (h11 - h10) * x,
    }
}
