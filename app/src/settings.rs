use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use terrain_core::{ErosionConfig, NoiseParams};

// Everything one run needs: synthesis params, erosion params, droplet count.
// Missing fields in a config file fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub noise: NoiseParams,
    pub erosion: ErosionConfig,
    pub iterations: usize,
    // None draws a fresh seed; the one used is logged so a run can be replayed
    pub erosion_seed: Option<u64>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise: NoiseParams::vertex_grid(255),
            erosion: ErosionConfig::default(),
            iterations: 150_000,
            erosion_seed: None,
        }
    }
}

impl TerrainConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> terrain_core::Result<()> {
        self.noise.validate()?;
        self.erosion.validate()?;
        if self.noise.width != self.noise.height {
            return Err(terrain_core::TerrainError::NotSquare {
                width: self.noise.width,
                height: self.noise.height,
            });
        }
        Ok(())
    }
}
