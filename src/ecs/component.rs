//! Dense per-type component storage

use std::any::{type_name, Any};

use super::error::{EcsError, EcsResult};
use super::EntityId;

/// Trait for components
pub trait Component: Send + Sync + 'static {}

/// Type-erased view of a [`ComponentArray`]. The component manager keeps
/// one of these per registered type and fans entity destruction out
/// through it without knowing the concrete `T`.
pub trait ComponentStorage: Send + Sync {
    /// Drops the entity's component if it has one; no-op otherwise.
    fn entity_destroyed(&mut self, entity: EntityId);
    fn has(&self, entity: EntityId) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Contiguous storage of `T` with no gaps below `len()`.
///
/// `entity_to_index` is sparse (one slot per possible entity id) and
/// `index_to_entity` runs parallel to `dense`; the two are inverses over
/// `[0, len)`. Removal moves the last value into the vacated slot, so
/// storage order is not insertion order.
pub struct ComponentArray<T: Component> {
    dense: Vec<T>,
    index_to_entity: Vec<EntityId>,
    entity_to_index: Vec<Option<usize>>,
}

impl<T: Component> ComponentArray<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            index_to_entity: Vec::with_capacity(capacity),
            entity_to_index: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.entity_to_index.len()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn insert(&mut self, entity: EntityId, component: T) -> EcsResult<()> {
        let slot = self
            .entity_to_index
            .get_mut(entity.index())
            .ok_or(EcsError::InvalidEntityId(entity))?;
        if slot.is_some() {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: type_name::<T>(),
            });
        }

        *slot = Some(self.dense.len());
        self.index_to_entity.push(entity);
        self.dense.push(component);
        Ok(())
    }

    /// Swap-pop removal. The entity that held the last slot moves into the
    /// freed one with its value untouched.
    pub fn remove(&mut self, entity: EntityId) -> EcsResult<T> {
        let removed = self
            .entity_to_index
            .get_mut(entity.index())
            .and_then(Option::take)
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })?;

        let last = self.dense.len() - 1;
        let moved = self.index_to_entity[last];
        self.index_to_entity.swap_remove(removed);
        if removed != last {
            self.entity_to_index[moved.index()] = Some(removed);
        }
        Ok(self.dense.swap_remove(removed))
    }

    pub fn get(&self, entity: EntityId) -> EcsResult<&T> {
        let index = self.index_of(entity)?;
        Ok(&self.dense[index])
    }

    pub fn get_mut(&mut self, entity: EntityId) -> EcsResult<&mut T> {
        let index = self.index_of(entity)?;
        Ok(&mut self.dense[index])
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        matches!(self.entity_to_index.get(entity.index()), Some(Some(_)))
    }

    /// Dense slot currently holding `entity`'s value.
    pub fn index_of(&self, entity: EntityId) -> EcsResult<usize> {
        self.entity_to_index
            .get(entity.index())
            .copied()
            .flatten()
            .ok_or(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            })
    }

    pub fn entity_at(&self, index: usize) -> Option<EntityId> {
        self.index_to_entity.get(index).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.dense
    }

    /// Storage order, not insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.index_to_entity.iter().copied().zip(self.dense.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.index_to_entity
            .iter()
            .copied()
            .zip(self.dense.iter_mut())
    }
}

impl<T: Component> ComponentStorage for ComponentArray<T> {
    fn entity_destroyed(&mut self, entity: EntityId) {
        if self.contains(entity) {
            // cannot fail: presence was just checked
            let _ = self.remove(entity);
        }
    }

    fn has(&self, entity: EntityId) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        ComponentArray::len(self)
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
