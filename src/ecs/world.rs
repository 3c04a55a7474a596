//! World - central ECS container

use std::collections::BTreeSet;
use std::time::Instant;

use log::{debug, trace, warn};

use super::component::Component;
use super::component_manager::ComponentManager;
use super::entity::EntityManager;
use super::error::EcsResult;
use super::system::{System, SystemContext, SystemManager, SystemRunReport};
use super::{ComponentTypeId, EntityId, Signature};
use crate::config::{ConfigError, EcsConfig};

/// Facade over the entity, component and system managers.
///
/// Every mutation fans out in a fixed order: component data first, then
/// the entity's signature, then system membership. All three stay
/// consistent after each call returns.
pub struct World {
    config: EcsConfig,
    components: ComponentManager,
    entities: EntityManager,
    systems: SystemManager,
}

impl World {
    pub fn new(config: EcsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "creating world: {} entities, {} component types",
            config.max_entities, config.max_components
        );
        Ok(Self {
            components: ComponentManager::new(config.max_entities, config.max_components),
            entities: EntityManager::new(config.max_entities),
            systems: SystemManager::new(),
            config,
        })
    }

    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    /// Create a new entity with an empty signature
    pub fn create_entity(&mut self) -> EcsResult<EntityId> {
        let entity = self.entities.create().inspect_err(|err| warn!("{err}"))?;
        // systems requiring nothing match every living entity
        self.systems
            .entity_signature_changed(entity, Signature::EMPTY);
        trace!("created entity {entity}");
        Ok(entity)
    }

    /// Destroy an entity and purge it from every storage and system
    pub fn destroy_entity(&mut self, entity: EntityId) -> EcsResult<()> {
        self.entities.destroy(entity)?;
        self.components.entity_destroyed(entity);
        self.systems.entity_destroyed(entity);
        trace!("destroyed entity {entity}");
        Ok(())
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn living_entity_count(&self) -> usize {
        self.entities.living_count()
    }

    pub fn signature(&self, entity: EntityId) -> EcsResult<Signature> {
        self.entities.signature(entity)
    }

    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        self.components.register::<T>()
    }

    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.components.component_type::<T>()
    }

    /// Add a component to an entity
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> EcsResult<()> {
        self.entities.check_alive(entity)?;
        let type_id = self.components.component_type::<T>()?;
        self.components.add(entity, component)?;

        let mut signature = self.entities.signature(entity)?;
        signature.set(type_id);
        self.entities.set_signature(entity, signature)?;

        self.systems.entity_signature_changed(entity, signature);
        Ok(())
    }

    /// Remove a component from an entity, handing back its value
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> EcsResult<T> {
        self.entities.check_alive(entity)?;
        let type_id = self.components.component_type::<T>()?;
        let removed = self.components.remove::<T>(entity)?;

        let mut signature = self.entities.signature(entity)?;
        signature.reset(type_id);
        self.entities.set_signature(entity, signature)?;

        self.systems.entity_signature_changed(entity, signature);
        Ok(removed)
    }

    pub fn get_component<T: Component>(&self, entity: EntityId) -> EcsResult<&T> {
        self.entities.check_alive(entity)?;
        self.components.get::<T>(entity)
    }

    /// The reference points into dense storage; it cannot outlive the
    /// borrow, so no later insert or removal can move it.
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        self.entities.check_alive(entity)?;
        self.components.get_mut::<T>(entity)
    }

    pub fn has_component<T: Component>(&self, entity: EntityId) -> EcsResult<bool> {
        self.entities.check_alive(entity)?;
        self.components.has::<T>(entity)
    }

    pub fn component_count<T: Component>(&self) -> EcsResult<usize> {
        Ok(self.components.array::<T>()?.len())
    }

    /// Every `(entity, component)` pair of type `T`, in storage order.
    pub fn components<T: Component>(
        &self,
    ) -> EcsResult<impl Iterator<Item = (EntityId, &T)> + '_> {
        Ok(self.components.array::<T>()?.iter())
    }

    pub fn components_mut<T: Component>(
        &mut self,
    ) -> EcsResult<impl Iterator<Item = (EntityId, &mut T)> + '_> {
        Ok(self.components.array_mut::<T>()?.iter_mut())
    }

    /// New systems require the empty signature until one is set, so they
    /// start out matching every living entity.
    pub fn register_system<S: System>(&mut self, system: S) -> EcsResult<&mut S> {
        self.systems.register(system)?;
        self.rebuild_system::<S>()?;
        self.systems.get_mut::<S>()
    }

    /// Record the signature `S` requires and recompute its matching set
    /// over every living entity.
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        self.systems.set_signature::<S>(signature)?;
        self.rebuild_system::<S>()
    }

    fn rebuild_system<S: System>(&mut self) -> EcsResult<()> {
        let entities = &self.entities;
        let living = entities.living().filter_map(|entity| {
            entities
                .signature(entity)
                .ok()
                .map(|signature| (entity, signature))
        });
        self.systems.rebuild::<S>(living)
    }

    pub fn system_signature<S: System>(&self) -> EcsResult<Signature> {
        self.systems.signature::<S>()
    }

    pub fn system<S: System>(&self) -> EcsResult<&S> {
        self.systems.get::<S>()
    }

    pub fn system_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.systems.get_mut::<S>()
    }

    /// Live set of entities matching `S`, ascending by id.
    pub fn system_entities<S: System>(&self) -> EcsResult<&BTreeSet<EntityId>> {
        self.systems.entities::<S>()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Run every registered system once, in registration order.
    pub fn run_systems(&mut self, ctx: &SystemContext) -> EcsResult<Vec<SystemRunReport>> {
        let mut reports = Vec::with_capacity(self.systems.len());
        for slot in 0..self.systems.len() {
            let Some((mut system, entities)) = self.systems.detach(slot) else {
                continue;
            };

            let start = Instant::now();
            let result = system.update(ctx, self, &entities);
            let elapsed = start.elapsed();
            trace!(
                "system `{}` ran over {} entities in {:?}",
                system.name(),
                entities.len(),
                elapsed
            );

            let name = system.name().to_string();
            self.systems.attach(slot, system);
            result?;

            reports.push(SystemRunReport {
                name,
                matched: entities.len(),
                duration_ms: elapsed.as_secs_f64() * 1_000.0,
            });
        }
        Ok(reports)
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            components: ComponentManager::new(
                EcsConfig::DEFAULT_MAX_ENTITIES,
                EcsConfig::DEFAULT_MAX_COMPONENTS,
            ),
            entities: EntityManager::new(EcsConfig::DEFAULT_MAX_ENTITIES),
            systems: SystemManager::new(),
            config: EcsConfig::default(),
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("living_entities", &self.entities.living_count())
            .field("component_types", &self.components.registered_count())
            .field("systems", &self.systems.len())
            .finish()
    }
}
