use std::f32::consts::TAU;

use crate::{
    components::{Spin, Transform},
    ecs::{EcsResult, EntityId, Signature, System, SystemContext, World},
};

const PITCH_LIMIT: f32 = 1.5;

/// Applies `Spin` to `Transform::rotation`. Pitch is clamped so the
/// entity never flips over and yaw wraps into `[0, 2π)`.
#[derive(Debug, Default)]
pub struct RotateSystem;

impl RotateSystem {
    pub fn new() -> Self {
        Self
    }

    /// Registers the system and requires {Transform, Spin}.
    pub fn install(world: &mut World) -> EcsResult<()> {
        let signature = Signature::new()
            .with(world.component_type::<Transform>()?)
            .with(world.component_type::<Spin>()?);
        world.register_system(Self::new())?;
        world.set_system_signature::<Self>(signature)
    }
}

impl System for RotateSystem {
    fn name(&self) -> &str {
        "rotate"
    }

    fn update(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        entities: &[EntityId],
    ) -> EcsResult<()> {
        for &entity in entities {
            let delta = world.get_component::<Spin>(entity)?.rate * ctx.delta_seconds;
            let transform = world.get_component_mut::<Transform>(entity)?;
            transform.rotation += delta;
            transform.rotation.x = transform.rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            let yaw = transform.rotation.y.rem_euclid(TAU);
            // tiny negative inputs round up to exactly TAU in f32
            transform.rotation.y = if yaw >= TAU { 0.0 } else { yaw };
        }
        Ok(())
    }
}
