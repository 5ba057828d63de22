// core holds the noise synthesis and droplet erosion algorithms
pub mod brush2;
pub mod config;
pub mod erosion2;
pub mod error;
pub mod fractal2;
pub mod perlin3;
pub mod utils;

pub use brush2::ErosionBrush;
pub use config::{DirectionUpdate, ErosionConfig, ErosionPolicy};
pub use erosion2::{DropletReport, HydraulicErosion2D, Termination};
pub use error::{Result, TerrainError};
pub use fractal2::{Fractal2D, NoiseParams, generate_heightmap};
pub use perlin3::Perlin3D;
pub use utils::Heightmap2D;

// noise generator that can sample 3D points.
// 2D callers sample the z = 0 plane through `get2(...)`.
pub trait NoiseGenerator {
    // Sample 3D noise at (x, y, z), in [-1, 1].
    fn get3(&self, x: f64, y: f64, z: f64) -> f64;

    // Sample 2D noise at (x, y).
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.get3(x, y, 0.0)
    }
}
