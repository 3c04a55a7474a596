//! Entity management

use std::collections::VecDeque;
use std::fmt;

use super::error::{EcsError, EcsResult};
use super::Signature;

/// Entity ID - a plain recycled index in `[0, max_entities)`.
///
/// There is no generation tag: once an id is recycled it names the new
/// entity, and older copies of the handle cannot tell the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the id pool and one signature per id.
pub struct EntityManager {
    available: VecDeque<EntityId>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    living_count: usize,
}

impl EntityManager {
    /// Every id in `[0, capacity)` starts out in the FIFO pool.
    pub fn new(capacity: usize) -> Self {
        Self {
            available: (0..capacity as u32).map(EntityId::new).collect(),
            signatures: vec![Signature::EMPTY; capacity],
            alive: vec![false; capacity],
            living_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }

    pub fn create(&mut self) -> EcsResult<EntityId> {
        let entity = self
            .available
            .pop_front()
            .ok_or(EcsError::EntityLimitExceeded {
                capacity: self.capacity(),
            })?;
        debug_assert!(self.signatures[entity.index()].is_empty());
        self.alive[entity.index()] = true;
        self.living_count += 1;
        Ok(entity)
    }

    /// Clears the signature before the id goes back in the pool so the
    /// next owner starts empty.
    pub fn destroy(&mut self, entity: EntityId) -> EcsResult<()> {
        self.check_alive(entity)?;
        let index = entity.index();
        self.signatures[index].clear();
        self.alive[index] = false;
        self.available.push_back(entity);
        self.living_count -= 1;
        Ok(())
    }

    pub fn set_signature(&mut self, entity: EntityId, signature: Signature) -> EcsResult<()> {
        self.check_alive(entity)?;
        self.signatures[entity.index()] = signature;
        Ok(())
    }

    pub fn signature(&self, entity: EntityId) -> EcsResult<Signature> {
        self.check_alive(entity)?;
        Ok(self.signatures[entity.index()])
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    pub fn check_alive(&self, entity: EntityId) -> EcsResult<()> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::InvalidEntityId(entity))
        }
    }

    pub fn living_count(&self) -> usize {
        self.living_count
    }

    /// Living ids in ascending order. O(capacity).
    pub fn living(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(index, _)| EntityId::new(index as u32))
    }
}
