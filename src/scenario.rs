//! Demo scenarios loaded from YAML

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::{
    components::{Spin, Transform, Velocity},
    config::EcsConfig,
    ecs::World,
    systems::{MovementSystem, RotateSystem},
};

fn default_delta_seconds() -> f32 {
    1.0 / 60.0
}

fn default_extent() -> f32 {
    50.0
}

fn default_max_speed() -> f32 {
    5.0
}

fn default_max_spin() -> f32 {
    1.0
}

/// Describes what to spawn into a demo world. Counts only; no entity state
/// is read from or written to disk.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_delta_seconds")]
    pub delta_seconds: f32,
    /// Transform + Velocity
    #[serde(default)]
    pub movers: usize,
    /// Transform + Spin
    #[serde(default)]
    pub spinners: usize,
    /// Transform + Velocity + Spin
    #[serde(default)]
    pub drifters: usize,
    /// Transform only
    #[serde(default)]
    pub static_props: usize,
    /// Half-width of the cube initial positions are drawn from.
    #[serde(default = "default_extent")]
    pub extent: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    #[serde(default = "default_max_spin")]
    pub max_spin: f32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn entity_count(&self) -> usize {
        self.movers + self.spinners + self.drifters + self.static_props
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(120)
    }

    /// Ranges fed to the RNG must be finite or sampling panics.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("delta_seconds", self.delta_seconds),
            ("extent", self.extent),
            ("max_speed", self.max_speed),
            ("max_spin", self.max_spin),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                bail!(
                    "scenario '{}': `{}` must be finite, got {}",
                    self.name,
                    field,
                    value
                );
            }
        }
        Ok(())
    }

    /// Registers the demo components and systems, then spawns every
    /// requested entity. The same seed always yields the same world.
    pub fn build_world(&self, config: EcsConfig) -> Result<World> {
        self.validate()?;
        let mut world = World::new(config)?;
        world.register_component::<Transform>()?;
        world.register_component::<Velocity>()?;
        world.register_component::<Spin>()?;
        MovementSystem::install(&mut world)?;
        RotateSystem::install(&mut world)?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let groups = [
            (self.movers, true, false),
            (self.spinners, false, true),
            (self.drifters, true, true),
            (self.static_props, false, false),
        ];
        for (count, moves, spins) in groups {
            for _ in 0..count {
                let entity = world.create_entity().with_context(|| {
                    format!(
                        "scenario '{}' needs {} entities but the world holds {}",
                        self.name,
                        self.entity_count(),
                        world.config().max_entities
                    )
                })?;
                let position = random_vec3(&mut rng, self.extent);
                world.add_component(entity, Transform::from_position(position))?;
                if moves {
                    let linear = random_vec3(&mut rng, self.max_speed);
                    world.add_component(entity, Velocity::new(linear))?;
                }
                if spins {
                    let rate = random_vec3(&mut rng, self.max_spin);
                    world.add_component(entity, Spin::new(rate))?;
                }
            }
        }

        info!(
            "scenario '{}' spawned {} entities",
            self.name,
            world.living_entity_count()
        );
        Ok(world)
    }
}

fn random_vec3(rng: &mut impl Rng, half_extent: f32) -> Vec3 {
    if half_extent <= 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
        rng.gen_range(-half_extent..half_extent),
    )
}
