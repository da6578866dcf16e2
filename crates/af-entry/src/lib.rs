//! `af-entry` — configured values bound to blackboard keys.
//!
//! An [`EntryValue`] pairs an [`EntryKey`] with a [`Literal`] of the key's
//! kind.  It can write itself into a [`Blackboard`](af_blackboard::Blackboard),
//! compare itself against a key's live value, expose numeric operands for
//! ordering, and convert to and from the flow graph's data pins.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`key`]      | `EntryKey` — key name plus allowed types                       |
//! | [`literal`]  | `Literal`, `EnumLiteral`, `ClassLiteral`, `ObjectLiteral`, `ObjectSlot` |
//! | [`kinds`]    | static per-kind table (`KindInfo`, `kind_info`)                 |
//! | [`value`]    | `EntryValue`, `KeyVisibility`                                  |
//! | [`pin`]      | `PinValue`, `PinProperty`, `PinSource`, `PinMap`, `PinError`   |
//!
//! # Kind dispatch
//!
//! The set of kinds is closed, so dispatch is a `match` over [`Literal`].
//! Choosing the literal for a key type goes through a static table indexed
//! by [`KeyTypeTag`](af_blackboard::KeyTypeTag); nothing is discovered at
//! runtime.

pub mod key;
pub mod kinds;
pub mod literal;
pub mod pin;
pub mod value;


pub use key::EntryKey;
pub use kinds::{KindInfo, kind_info};
pub use literal::{ClassLiteral, EnumLiteral, Literal, ObjectLiteral, ObjectSlot, ObjectTypeSelector};
pub use pin::{PinDirection, PinError, PinMap, PinProperty, PinResult, PinSource, PinValue, pin_property_from_store};
pub use value::{EntryValue, KeyVisibility};
