use crate::{
    components::{Transform, Velocity},
    ecs::{EcsResult, EntityId, Signature, System, SystemContext, World},
};

/// Integrates `Velocity` into `Transform::position`.
#[derive(Debug, Default)]
pub struct MovementSystem {
    distance_travelled: f32,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the system and requires {Transform, Velocity}. Both
    /// component types must already be registered.
    pub fn install(world: &mut World) -> EcsResult<()> {
        let signature = Signature::new()
            .with(world.component_type::<Transform>()?)
            .with(world.component_type::<Velocity>()?);
        world.register_system(Self::new())?;
        world.set_system_signature::<Self>(signature)
    }

    /// Sum of every displacement applied so far.
    pub fn distance_travelled(&self) -> f32 {
        self.distance_travelled
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn update(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        entities: &[EntityId],
    ) -> EcsResult<()> {
        for &entity in entities {
            let step = world.get_component::<Velocity>(entity)?.linear * ctx.delta_seconds;
            world.get_component_mut::<Transform>(entity)?.position += step;
            self.distance_travelled += step.length();
        }
        Ok(())
    }
}
