//! `af-blackboard` — the typed key-value store that flow nodes read and write.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`reflect`]    | `TypeRegistry`, `ClassDef`, `EnumDef`, `ObjectDef`, built-in classes |
//! | [`key_type`]   | `KeyTypeTag`, `KeyType`, `ArithmeticOp`                      |
//! | [`value`]      | `Value` (one live value per key), `BlackboardCompare`        |
//! | [`schema`]     | `BlackboardSchema`, `SchemaBuilder`, `KeyDef`                |
//! | [`store`]      | `Blackboard` — live values for one schema                    |
//! | [`error`]      | `BlackboardError`, `BlackboardResult<T>`                     |
//!
//! # Soft failures
//!
//! Reads and writes through [`Blackboard`] never panic on bad input.  An
//! unknown key or a key whose declared type does not match the accessor is
//! logged at error level; getters then return the type's default and setters
//! return `false`.  `Result` is reserved for building schemas.

pub mod error;
pub mod key_type;
pub mod reflect;
pub mod schema;
pub mod store;
pub mod value;


pub use error::{BlackboardError, BlackboardResult};
pub use key_type::{ArithmeticOp, KeyType, KeyTypeTag};
pub use reflect::{ClassDef, EnumDef, ObjectDef, TypeRegistry, builtin};
pub use schema::{BlackboardSchema, KeyDef, SchemaBuilder};
pub use store::Blackboard;
pub use value::{BlackboardCompare, Value};
