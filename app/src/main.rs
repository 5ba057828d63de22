//! Terrain CLI - synthesize a fractal heightmap and erode it with water droplets.

mod output;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::info;
use terrain_core::{ErosionPolicy, HydraulicErosion2D, generate_heightmap};

use crate::settings::TerrainConfig;

/// Procedural heightmap generator with droplet-based hydraulic erosion.
#[derive(Parser, Debug)]
#[command(name = "terrain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with a full or partial configuration; flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Quads per side; the heightmap has (size + 1)^2 samples.
    #[arg(long)]
    size: Option<usize>,

    /// Seed for the octave offsets.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Noise scale (<= 0 is clamped to a small epsilon).
    #[arg(long)]
    scale: Option<f64>,

    #[arg(long)]
    octaves: Option<usize>,

    /// Amplitude decay per octave.
    #[arg(long)]
    persistence: Option<f64>,

    /// Frequency growth per octave.
    #[arg(long)]
    lacunarity: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<f64>,

    /// Number of droplets to simulate (0 skips erosion).
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Seed for droplet spawning; random if omitted.
    #[arg(long)]
    erosion_seed: Option<u64>,

    /// Spread erosion over a disc of this radius.
    #[arg(long, conflicts_with = "point_factor")]
    brush_radius: Option<usize>,

    /// Erode single nodes, scaled by a random factor up to this value.
    #[arg(long)]
    point_factor: Option<f32>,

    #[arg(long)]
    inertia: Option<f32>,

    /// Fraction of droplet speed lost per step.
    #[arg(long)]
    friction: Option<f32>,

    /// Maximum steps per droplet.
    #[arg(long)]
    lifetime: Option<usize>,

    /// 16-bit grayscale PNG output.
    #[arg(short, long, default_value = "terrain.png")]
    output: PathBuf,

    /// Optional raw little-endian f32 dump of the heights.
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

impl Cli {
    fn resolve(&self) -> Result<TerrainConfig, Box<dyn std::error::Error>> {
        let mut cfg = match &self.config {
            Some(path) => TerrainConfig::load(path)?,
            None => TerrainConfig::default(),
        };

        if let Some(size) = self.size {
            cfg.noise.width = size + 1;
            cfg.noise.height = size + 1;
        }
        if let Some(v) = self.seed {
            cfg.noise.seed = v;
        }
        if let Some(v) = self.scale {
            cfg.noise.scale = v;
        }
        if let Some(v) = self.octaves {
            cfg.noise.octaves = v;
        }
        if let Some(v) = self.persistence {
            cfg.noise.persistence = v;
        }
        if let Some(v) = self.lacunarity {
            cfg.noise.lacunarity = v;
        }
        if let Some(v) = self.offset_x {
            cfg.noise.offset[0] = v;
        }
        if let Some(v) = self.offset_y {
            cfg.noise.offset[1] = v;
        }
        if let Some(v) = self.iterations {
            cfg.iterations = v;
        }
        if self.erosion_seed.is_some() {
            cfg.erosion_seed = self.erosion_seed;
        }
        if let Some(radius) = self.brush_radius {
            cfg.erosion.policy = ErosionPolicy::Brush { radius };
        }
        if let Some(max_factor) = self.point_factor {
            cfg.erosion.policy = ErosionPolicy::Point { max_factor };
        }
        if let Some(v) = self.inertia {
            cfg.erosion.inertia = v;
        }
        if let Some(v) = self.friction {
            cfg.erosion.friction = v;
        }
        if let Some(v) = self.lifetime {
            cfg.erosion.lifetime = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = cli.resolve()?;
    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let start = Instant::now();
    let mut map = generate_heightmap(&cfg.noise)?;
    info!(
        "Generated {}x{} heightmap in {:.2} ms (seed {})",
        map.width,
        map.height,
        start.elapsed().as_secs_f32() * 1000.0,
        cfg.noise.seed
    );

    if cfg.iterations > 0 {
        let mut erosion = match cfg.erosion_seed {
            Some(seed) => HydraulicErosion2D::new(cfg.erosion.clone(), seed),
            None => HydraulicErosion2D::from_entropy(cfg.erosion.clone()),
        };
        let start = Instant::now();
        erosion.erode_map(&mut map, cfg.iterations)?;
        info!(
            "Eroded with {} droplets in {:.2} ms (erosion seed {})",
            cfg.iterations,
            start.elapsed().as_secs_f32() * 1000.0,
            erosion.seed()
        );
    }

    output::save_png(&map, &cli.output)?;
    info!("Saved {}", cli.output.display());
    if let Some(path) = &cli.raw {
        output::save_raw(&map, path)?;
        info!("Saved {}", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
