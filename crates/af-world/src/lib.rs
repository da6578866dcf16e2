//! `af-world` — the host side of the aiflow workspace: actors, the stores
//! attached to them, and how flow logic finds (or creates) the right store.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`actors`]     | `Actors` (SoA actor state), `ActorKind`                      |
//! | [`world`]      | `World`, `HostedStore`, `ActorRemovalListener`, `ListenerId` |
//! | [`builder`]    | `WorldBuilder`                                               |
//! | [`inject`]     | `InjectComponentsManager`                                    |
//! | [`resolver`]   | `SearchRule`, `InjectRule`, `StoreQuery`, resolution functions |
//! | [`error`]      | `WorldError`, `WorldResult<T>`                               |
//!
//! # Threading
//!
//! A world is driven from one thread.  Removal listeners are shared through
//! `Rc<RefCell<_>>`, so `World` is neither `Send` nor `Sync`.

pub mod actors;
pub mod builder;
pub mod error;
pub mod inject;
pub mod resolver;
pub mod world;

#[cfg(test)]
mod tests;

pub use actors::{ActorKind, Actors};
pub use builder::WorldBuilder;
pub use error::{WorldError, WorldResult};
pub use inject::InjectComponentsManager;
pub use resolver::{
    InjectRule, SearchRule, StoreQuery, find_or_add_store_on_actor, find_or_add_stores_on_actors, try_find_store,
    try_find_store_on_actor,
};
pub use world::{ActorRemovalListener, HostedStore, ListenerId, World};
