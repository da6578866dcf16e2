//! Fluent builder for a [`World`].
//!
//! # Usage
//!
//! ```rust
//! use af_world::{ActorKind, WorldBuilder};
//!
//! let mut world = WorldBuilder::new("Arena")
//!     .with_game_state("GameState")
//!     .build()
//!     .unwrap();
//!
//! let pawn = world.spawn_actor(ActorKind::Pawn, "Grunt_0").unwrap();
//! assert!(world.game_state().is_some());
//! assert_eq!(world.actors().ids().count(), 2);
//! # let _ = pawn;
//! ```

use af_blackboard::TypeRegistry;
use af_core::Name;

use crate::actors::ActorKind;
use crate::error::WorldResult;
use crate::world::World;

pub struct WorldBuilder {
    name:       Name,
    registry:   Option<TypeRegistry>,
    game_state: Option<Name>,
}

impl WorldBuilder {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name:       name.into(),
            registry:   None,
            game_state: None,
        }
    }

    /// Use `registry` instead of one holding only the built-in classes.
    /// Classes and enums the schemas refer to must be registered here.
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Spawn a game-state actor named `name` as part of `build`.
    pub fn with_game_state(mut self, name: impl Into<Name>) -> Self {
        self.game_state = Some(name.into());
        self
    }

    pub fn build(self) -> WorldResult<World> {
        let mut world = World::new(self.name, self.registry.unwrap_or_default());
        if let Some(name) = self.game_state {
            world.spawn_actor(ActorKind::GameState, name)?;
        }
        Ok(world)
    }
}
