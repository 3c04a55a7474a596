pub mod components;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod scenario;
pub mod systems;

pub use config::EcsConfig;
pub use ecs::{EcsError, EntityId, Signature, System, SystemContext, World};
pub use engine::{Engine, EngineSettings, TickSummary};
