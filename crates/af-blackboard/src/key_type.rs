//! Declared key types and the generic arithmetic test.

use std::fmt;
use std::sync::Arc;

use af_core::{ClassId, Name};

use crate::reflect::{EnumDef, TypeRegistry};
use crate::value::Value;

// ── KeyTypeTag ────────────────────────────────────────────────────────────────

/// The ten primitive kinds a blackboard key can hold.
///
/// Discriminants are dense so a tag can index a fixed-size table.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum KeyTypeTag {
    Bool = 0,
    Int,
    Float,
    Name,
    String,
    Vector,
    Rotator,
    Enum,
    Class,
    Object,
}

impl KeyTypeTag {
    pub const COUNT: usize = 10;

    pub const ALL: [KeyTypeTag; Self::COUNT] = [
        KeyTypeTag::Bool,
        KeyTypeTag::Int,
        KeyTypeTag::Float,
        KeyTypeTag::Name,
        KeyTypeTag::String,
        KeyTypeTag::Vector,
        KeyTypeTag::Rotator,
        KeyTypeTag::Enum,
        KeyTypeTag::Class,
        KeyTypeTag::Object,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Only numeric-like kinds can be ordered.
    #[inline]
    pub fn supports_arithmetic(self) -> bool {
        matches!(self, KeyTypeTag::Int | KeyTypeTag::Float | KeyTypeTag::Enum)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyTypeTag::Bool => "Bool",
            KeyTypeTag::Int => "Int",
            KeyTypeTag::Float => "Float",
            KeyTypeTag::Name => "Name",
            KeyTypeTag::String => "String",
            KeyTypeTag::Vector => "Vector",
            KeyTypeTag::Rotator => "Rotator",
            KeyTypeTag::Enum => "Enum",
            KeyTypeTag::Class => "Class",
            KeyTypeTag::Object => "Object",
        }
    }
}

impl fmt::Display for KeyTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ArithmeticOp ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithmeticOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ArithmeticOp {
    #[inline]
    pub fn apply<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            ArithmeticOp::Equal => lhs == rhs,
            ArithmeticOp::NotEqual => lhs != rhs,
            ArithmeticOp::Less => lhs < rhs,
            ArithmeticOp::LessOrEqual => lhs <= rhs,
            ArithmeticOp::Greater => lhs > rhs,
            ArithmeticOp::GreaterOrEqual => lhs >= rhs,
        }
    }
}

// ── KeyType ───────────────────────────────────────────────────────────────────

/// A key's declared type, including the sub-configuration of enum, class, and
/// object keys.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyType {
    Bool,
    Int,
    Float,
    Name,
    String,
    Vector,
    Rotator,
    Enum {
        enum_def:  Option<Arc<EnumDef>>,
        /// Name the enum was configured by, kept even if it failed to resolve.
        enum_name: Name,
    },
    Class {
        base_class: ClassId,
    },
    Object {
        base_class: ClassId,
    },
}

impl KeyType {
    /// An enum key bound to `def`.
    pub fn enum_of(def: &Arc<EnumDef>) -> Self {
        KeyType::Enum { enum_def: Some(Arc::clone(def)), enum_name: def.name.clone() }
    }

    pub fn tag(&self) -> KeyTypeTag {
        match self {
            KeyType::Bool => KeyTypeTag::Bool,
            KeyType::Int => KeyTypeTag::Int,
            KeyType::Float => KeyTypeTag::Float,
            KeyType::Name => KeyTypeTag::Name,
            KeyType::String => KeyTypeTag::String,
            KeyType::Vector => KeyTypeTag::Vector,
            KeyType::Rotator => KeyTypeTag::Rotator,
            KeyType::Enum { .. } => KeyTypeTag::Enum,
            KeyType::Class { .. } => KeyTypeTag::Class,
            KeyType::Object { .. } => KeyTypeTag::Object,
        }
    }

    #[inline]
    pub fn supports_arithmetic(&self) -> bool {
        self.tag().supports_arithmetic()
    }

    /// The enum definition of an enum key, if it has one.
    pub fn enum_def(&self) -> Option<&Arc<EnumDef>> {
        match self {
            KeyType::Enum { enum_def, .. } => enum_def.as_ref(),
            _ => None,
        }
    }

    /// `true` if a key of this type may be chosen where `filter` is the
    /// allowed type.  Enum keys must share the filter's enum; class and
    /// object keys must derive from the filter's base class.
    pub fn is_allowed_by_filter(&self, filter: &KeyType, registry: &TypeRegistry) -> bool {
        match (self, filter) {
            (KeyType::Enum { enum_def: mine, .. }, KeyType::Enum { enum_def: theirs, .. }) => {
                match (mine, theirs) {
                    (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.name == b.name,
                    (None, None) => true,
                    _ => false,
                }
            }
            (KeyType::Class { base_class: mine }, KeyType::Class { base_class: theirs })
            | (KeyType::Object { base_class: mine }, KeyType::Object { base_class: theirs }) => {
                registry.is_child_of(*mine, *theirs)
            }
            _ => self.tag() == filter.tag(),
        }
    }

    /// Apply `op` to the raw value of a key of this type against numeric
    /// operands.  Non-numeric kinds always yield `false`.
    pub fn test_arithmetic(&self, raw: &Value, op: ArithmeticOp, other_int: i32, other_float: f32) -> bool {
        match (self.tag(), raw) {
            (KeyTypeTag::Int, Value::Int(v)) => op.apply(*v, other_int),
            (KeyTypeTag::Float, Value::Float(v)) => op.apply(*v, other_float),
            (KeyTypeTag::Enum, Value::Enum(v)) => op.apply(i32::from(*v), other_int),
            _ => false,
        }
    }

    /// Human readable description, e.g. `Object (Pawn)`.
    pub fn describe(&self, registry: &TypeRegistry) -> String {
        match self {
            KeyType::Enum { enum_name, .. } => format!("Enum ({enum_name})"),
            KeyType::Class { base_class } => format!("Class ({})", registry.class_name(*base_class)),
            KeyType::Object { base_class } => format!("Object ({})", registry.class_name(*base_class)),
            other => other.tag().to_string(),
        }
    }
}
