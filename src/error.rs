use core::fmt;

use crate::components::ActorType;

/// Misconfiguration of the level or catalog. Never transient, never retried.
#[derive(Debug)]
pub enum GameError {
    UnknownTake { set: String, take: String },
    MissingCollisionPrimitive { id: String },
    InvalidCategory(ActorType),
    InvalidCatalog(String),
    Catalog(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTake { set, take } => {
                write!(f, "animation set '{set}' has no take named '{take}'")
            }
            Self::MissingCollisionPrimitive { id } => {
                write!(f, "sprite '{id}' has no collision primitive attached")
            }
            Self::InvalidCategory(actor_type) => {
                write!(f, "actor category '{actor_type}' is not registered")
            }
            Self::InvalidCatalog(reason) => write!(f, "invalid sprite catalog: {reason}"),
            Self::Catalog(err) => write!(f, "failed to parse sprite catalog: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(err)
    }
}
