//! Error type shared by every ECS operation

use thiserror::Error;

use super::EntityId;

/// Misuse of the ECS API. All of these are checked in every build profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity limit exceeded: all {capacity} entity ids are in use")]
    EntityLimitExceeded { capacity: usize },

    #[error("entity {0} is out of range or not alive")]
    InvalidEntityId(EntityId),

    #[error("component type `{0}` is already registered")]
    DuplicateComponentType(&'static str),

    #[error("component type `{0}` was used before being registered")]
    UnregisteredComponentType(&'static str),

    #[error("component type limit exceeded: signatures hold {capacity} types")]
    ComponentTypeLimitExceeded { capacity: usize },

    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("system type `{0}` is already registered")]
    DuplicateSystemType(&'static str),

    #[error("system type `{0}` was used before being registered")]
    UnregisteredSystemType(&'static str),
}

pub type EcsResult<T> = Result<T, EcsError>;
