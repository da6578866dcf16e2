use af_core::{ActorId, AfError, Name};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Core(#[from] AfError),

    #[error("actor {0} is not a controller")]
    NotAController(ActorId),

    #[error("actor {0} is not a pawn")]
    NotAPawn(ActorId),

    #[error("world already has a game state ({0})")]
    GameStateExists(ActorId),

    #[error("class {0} is not a blackboard component class")]
    NotAStoreClass(Name),

    #[error("class {class} does not derive from {base}")]
    WrongActorClass { class: Name, base: Name },
}

pub type WorldResult<T> = Result<T, WorldError>;
