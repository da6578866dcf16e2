//! `af-core` — foundational types for the `aiflow` workspace.
//!
//! This crate is a dependency of every other `af-*` crate.  It has no `af-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `ActorId`, `StoreId`, `SchemaId`, `ClassId`, `ObjectId`, `KeyId` |
//! | [`name`]        | `Name` (identifier with a distinguished "none")           |
//! | [`math`]        | `Vector`, `Rotator`, nearly-equal tolerances              |
//! | [`rng`]         | `FlowRng` (node-private), `AmbientRng` (host global)      |
//! | [`config`]      | `FlowConfig`                                              |
//! | [`error`]       | `AfError`                                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all plain-data types.    |

pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod name;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FlowConfig;
pub use error::AfError;
pub use ids::{ActorId, ClassId, KeyId, ObjectId, SchemaId, StoreId};
pub use math::{KINDA_SMALL_NUMBER, Rotator, SMALL_NUMBER, Vector, nearly_equal};
pub use name::Name;
pub use rng::{AmbientRng, FlowRng, combine_seeds};
