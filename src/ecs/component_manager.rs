//! Registry of component types and their storages

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use log::{debug, trace};

use super::component::{Component, ComponentArray, ComponentStorage};
use super::error::{EcsError, EcsResult};
use super::{ComponentTypeId, EntityId};

struct Registration {
    id: ComponentTypeId,
    storage: Box<dyn ComponentStorage>,
}

/// Assigns component type ids in registration order and owns one
/// [`ComponentArray`] per registered type.
pub struct ComponentManager {
    registrations: HashMap<TypeId, Registration>,
    entity_capacity: usize,
    type_capacity: usize,
    next_id: usize,
}

impl ComponentManager {
    pub fn new(entity_capacity: usize, type_capacity: usize) -> Self {
        Self {
            registrations: HashMap::new(),
            entity_capacity,
            type_capacity,
            next_id: 0,
        }
    }

    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let type_id = TypeId::of::<T>();
        if self.registrations.contains_key(&type_id) {
            return Err(EcsError::DuplicateComponentType(type_name::<T>()));
        }
        if self.next_id >= self.type_capacity {
            return Err(EcsError::ComponentTypeLimitExceeded {
                capacity: self.type_capacity,
            });
        }

        let id = self.next_id as ComponentTypeId;
        self.next_id += 1;
        self.registrations.insert(
            type_id,
            Registration {
                id,
                storage: Box::new(ComponentArray::<T>::new(self.entity_capacity)),
            },
        );
        debug!("registered component `{}` as type {}", type_name::<T>(), id);
        Ok(id)
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    pub fn component_type<T: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.registration::<T>().map(|registration| registration.id)
    }

    pub fn registered_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn add<T: Component>(&mut self, entity: EntityId, component: T) -> EcsResult<()> {
        self.array_mut::<T>()?.insert(entity, component)
    }

    pub fn remove<T: Component>(&mut self, entity: EntityId) -> EcsResult<T> {
        self.array_mut::<T>()?.remove(entity)
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> EcsResult<&T> {
        self.array::<T>()?.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        self.array_mut::<T>()?.get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> EcsResult<bool> {
        Ok(self.array::<T>()?.contains(entity))
    }

    /// Purges `entity` from every registered storage, whatever it held.
    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for registration in self.registrations.values_mut() {
            let storage = &mut registration.storage;
            if storage.has(entity) {
                trace!("dropping `{}` from entity {entity}", storage.component_name());
            }
            storage.entity_destroyed(entity);
        }
    }

    pub fn array<T: Component>(&self) -> EcsResult<&ComponentArray<T>> {
        self.registration::<T>()?
            .storage
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
            .ok_or(EcsError::UnregisteredComponentType(type_name::<T>()))
    }

    pub fn array_mut<T: Component>(&mut self) -> EcsResult<&mut ComponentArray<T>> {
        self.registrations
            .get_mut(&TypeId::of::<T>())
            .and_then(|registration| {
                registration
                    .storage
                    .as_any_mut()
                    .downcast_mut::<ComponentArray<T>>()
            })
            .ok_or(EcsError::UnregisteredComponentType(type_name::<T>()))
    }

    fn registration<T: Component>(&self) -> EcsResult<&Registration> {
        self.registrations
            .get(&TypeId::of::<T>())
            .ok_or(EcsError::UnregisteredComponentType(type_name::<T>()))
    }
}
