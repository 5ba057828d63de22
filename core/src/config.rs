use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

// smallest random factor drawn by the point policy
pub const MIN_POINT_FACTOR: f32 = 0.01;

// How an erode amount is applied to the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErosionPolicy {
    // scale by a random factor in [0.01, max_factor], remove it all from the originating node
    Point { max_factor: f32 },
    // spread over a precomputed disc of `radius` cells with linear falloff
    Brush { radius: usize },
}

impl Default for ErosionPolicy {
    fn default() -> Self {
        Self::Brush { radius: 3 }
    }
}

// How the flow direction reacts to the local gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionUpdate {
    // dir = dir * inertia - gradient * (1 - inertia)
    #[default]
    Inertia,
    // dir -= gradient, inertia ignored
    Accumulate,
}

// Parameters for droplet erosion. Missing fields in a config file take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    pub policy: ErosionPolicy,
    pub direction: DirectionUpdate,
    pub inertia: f32,         // 0 follows the gradient exactly, 1 keeps the previous heading
    pub erosion_rate: f32,    // fraction of free capacity picked up per step
    pub deposition_rate: f32, // fraction of surplus sediment dropped per step
    pub lifetime: usize,      // maximum steps per droplet
    pub initial_speed: f32,
    pub initial_water: f32,
    pub capacity_factor: f32,  // how much sediment a droplet can carry
    pub min_capacity: f32,     // keeps capacity away from zero on flat ground
    pub evaporation_rate: f32, // fraction of water lost per step
    pub gravity: f32,
    pub friction: f32,         // fraction of speed lost per step
    pub brush_multiplier: f32, // fixed multiplier applied to brush erosion
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            policy: ErosionPolicy::default(),
            direction: DirectionUpdate::default(),
            inertia: 0.05,
            erosion_rate: 0.3,
            deposition_rate: 0.3,
            lifetime: 30,
            initial_speed: 1.0,
            initial_water: 1.0,
            capacity_factor: 4.0,
            min_capacity: 0.01,
            evaporation_rate: 0.01,
            gravity: 4.0,
            friction: 0.05,
            brush_multiplier: 1.0,
        }
    }
}

impl ErosionConfig {
    pub fn point(max_factor: f32) -> Self {
        Self {
            policy: ErosionPolicy::Point { max_factor },
            ..Self::default()
        }
    }

    pub fn brush(radius: usize) -> Self {
        Self {
            policy: ErosionPolicy::Brush { radius },
            ..Self::default()
        }
    }

    // None for the point policy
    pub fn brush_radius(&self) -> Option<usize> {
        match self.policy {
            ErosionPolicy::Brush { radius } => Some(radius),
            ErosionPolicy::Point { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        unit("inertia", self.inertia)?;
        unit("erosion_rate", self.erosion_rate)?;
        unit("deposition_rate", self.deposition_rate)?;
        unit("evaporation_rate", self.evaporation_rate)?;
        unit("friction", self.friction)?;
        non_negative("initial_speed", self.initial_speed)?;
        non_negative("initial_water", self.initial_water)?;
        non_negative("capacity_factor", self.capacity_factor)?;
        non_negative("min_capacity", self.min_capacity)?;
        non_negative("gravity", self.gravity)?;
        non_negative("brush_multiplier", self.brush_multiplier)?;

        if self.lifetime == 0 {
            return Err(TerrainError::config("lifetime", "must be at least 1"));
        }
        match self.policy {
            ErosionPolicy::Brush { radius: 0 } => {
                Err(TerrainError::config("policy.radius", "must be at least 1"))
            }
            ErosionPolicy::Point { max_factor }
                if !(max_factor.is_finite() && max_factor >= MIN_POINT_FACTOR) =>
            {
                Err(TerrainError::config(
                    "policy.max_factor",
                    format!("must be at least {MIN_POINT_FACTOR}, got {max_factor}"),
                ))
            }
            _ => Ok(()),
        }
    }
}

fn unit(field: &'static str, v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(TerrainError::config(field, format!("must be in [0, 1], got {v}")))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(TerrainError::config(field, format!("must be >= 0, got {v}")))
    }
}
