//! Entity Component System (ECS) implementation
//!
//! Sparse/dense component storage with O(1) add and remove, plus
//! bitset signatures that keep each system's set of matching entities
//! current after every mutation.

pub mod component;
pub mod component_manager;
pub mod entity;
pub mod error;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, ComponentArray, ComponentStorage};
pub use component_manager::ComponentManager;
pub use entity::{EntityId, EntityManager};
pub use error::{EcsError, EcsResult};
pub use signature::{ComponentTypeId, Signature};
pub use system::{System, SystemContext, SystemManager, SystemRunReport};
pub use world::World;
