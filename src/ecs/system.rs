//! Systems and signature-driven membership tracking

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::Serialize;

use super::error::{EcsError, EcsResult};
use super::{EntityId, Signature, World};

/// Per-run information handed to every system. Replaces any ambient
/// global application state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemContext {
    pub tick: u64,
    pub delta_seconds: f32,
}

/// A unit of behaviour over every entity whose signature satisfies the
/// one registered for this system type.
pub trait System: 'static {
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    /// `entities` is the matching set as it stood when this run began,
    /// ascending by id. Mutations made through `world` keep every
    /// matching set current, including this system's own.
    fn update(
        &mut self,
        _ctx: &SystemContext,
        _world: &mut World,
        _entities: &[EntityId],
    ) -> EcsResult<()> {
        Ok(())
    }
}

pub(crate) trait SystemObject: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> SystemObject for S {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemRunReport {
    pub name: String,
    pub matched: usize,
    pub duration_ms: f64,
}

struct SystemEntry {
    type_name: &'static str,
    signature: Signature,
    entities: BTreeSet<EntityId>,
    // None while the system is running
    system: Option<Box<dyn SystemObject>>,
}

/// Owns registered systems, the signature each requires, and the live set
/// of entities matching it.
#[derive(Default)]
pub struct SystemManager {
    entries: Vec<SystemEntry>,
    by_type: HashMap<TypeId, usize>,
}

impl SystemManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: System>(&mut self, system: S) -> EcsResult<&mut S> {
        let type_id = TypeId::of::<S>();
        if self.by_type.contains_key(&type_id) {
            return Err(EcsError::DuplicateSystemType(type_name::<S>()));
        }

        let slot = self.entries.len();
        self.entries.push(SystemEntry {
            type_name: type_name::<S>(),
            signature: Signature::EMPTY,
            entities: BTreeSet::new(),
            system: Some(Box::new(system)),
        });
        self.by_type.insert(type_id, slot);
        debug!("registered system `{}`", type_name::<S>());

        self.get_mut::<S>()
    }

    pub fn is_registered<S: System>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<S>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_signature<S: System>(&mut self, signature: Signature) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        entry.signature = signature;
        debug!("system `{}` requires {}", entry.type_name, signature);
        Ok(())
    }

    pub fn signature<S: System>(&self) -> EcsResult<Signature> {
        Ok(self.entry::<S>()?.signature)
    }

    pub fn entities<S: System>(&self) -> EcsResult<&BTreeSet<EntityId>> {
        Ok(&self.entry::<S>()?.entities)
    }

    /// Recomputes the matching set of `S` from scratch.
    pub fn rebuild<S: System>(
        &mut self,
        living: impl IntoIterator<Item = (EntityId, Signature)>,
    ) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        let required = entry.signature;
        entry.entities = living
            .into_iter()
            .filter(|(_, signature)| signature.contains(required))
            .map(|(entity, _)| entity)
            .collect();
        Ok(())
    }

    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    /// O(#systems): each set gains or loses `entity` depending on whether
    /// the new signature covers the system's requirement.
    pub fn entity_signature_changed(&mut self, entity: EntityId, signature: Signature) {
        for entry in &mut self.entries {
            if signature.contains(entry.signature) {
                entry.entities.insert(entity);
            } else {
                entry.entities.remove(&entity);
            }
        }
    }

    /// A system is detached from the registry while its update runs, so
    /// this fails for the running system itself.
    pub fn get<S: System>(&self) -> EcsResult<&S> {
        self.entry::<S>()?
            .system
            .as_ref()
            .and_then(|system| system.as_any().downcast_ref::<S>())
            .ok_or(EcsError::UnregisteredSystemType(type_name::<S>()))
    }

    pub fn get_mut<S: System>(&mut self) -> EcsResult<&mut S> {
        self.entry_mut::<S>()?
            .system
            .as_mut()
            .and_then(|system| system.as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::UnregisteredSystemType(type_name::<S>()))
    }

    /// Takes the system in `slot` out for a run, together with a snapshot
    /// of its matching set.
    pub(crate) fn detach(
        &mut self,
        slot: usize,
    ) -> Option<(Box<dyn SystemObject>, Vec<EntityId>)> {
        let entry = self.entries.get_mut(slot)?;
        let system = entry.system.take()?;
        Some((system, entry.entities.iter().copied().collect()))
    }

    pub(crate) fn attach(&mut self, slot: usize, system: Box<dyn SystemObject>) {
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.system = Some(system);
        }
    }

    fn entry<S: System>(&self) -> EcsResult<&SystemEntry> {
        self.by_type
            .get(&TypeId::of::<S>())
            .map(|slot| &self.entries[*slot])
            .ok_or(EcsError::UnregisteredSystemType(type_name::<S>()))
    }

    fn entry_mut<S: System>(&mut self) -> EcsResult<&mut SystemEntry> {
        match self.by_type.get(&TypeId::of::<S>()) {
            Some(slot) => Ok(&mut self.entries[*slot]),
            None => Err(EcsError::UnregisteredSystemType(type_name::<S>())),
        }
    }
}
