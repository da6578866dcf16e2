//! Live values held by a [`Blackboard`](crate::Blackboard).

use af_core::{ClassId, KINDA_SMALL_NUMBER, Name, ObjectId, Rotator, SMALL_NUMBER, Vector, nearly_equal};

use crate::key_type::KeyTypeTag;

/// Result of comparing two blackboard values.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlackboardCompare {
    Equal,
    NotEqual,
}

impl BlackboardCompare {
    #[inline]
    pub fn from_bool(equal: bool) -> Self {
        if equal { BlackboardCompare::Equal } else { BlackboardCompare::NotEqual }
    }
}

/// One key's live value.  Enums are stored as their underlying `u8`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    Name(Name),
    String(String),
    Vector(Vector),
    Rotator(Rotator),
    Enum(u8),
    Class(Option<ClassId>),
    Object(Option<ObjectId>),
}

impl Value {
    pub fn tag(&self) -> KeyTypeTag {
        match self {
            Value::Bool(_) => KeyTypeTag::Bool,
            Value::Int(_) => KeyTypeTag::Int,
            Value::Float(_) => KeyTypeTag::Float,
            Value::Name(_) => KeyTypeTag::Name,
            Value::String(_) => KeyTypeTag::String,
            Value::Vector(_) => KeyTypeTag::Vector,
            Value::Rotator(_) => KeyTypeTag::Rotator,
            Value::Enum(_) => KeyTypeTag::Enum,
            Value::Class(_) => KeyTypeTag::Class,
            Value::Object(_) => KeyTypeTag::Object,
        }
    }

    /// The value a freshly created store holds for a key of `tag`.
    pub fn default_for(tag: KeyTypeTag) -> Self {
        match tag {
            KeyTypeTag::Bool => Value::Bool(false),
            KeyTypeTag::Int => Value::Int(0),
            KeyTypeTag::Float => Value::Float(0.0),
            KeyTypeTag::Name => Value::Name(Name::NONE),
            KeyTypeTag::String => Value::String(String::new()),
            KeyTypeTag::Vector => Value::Vector(Vector::ZERO),
            KeyTypeTag::Rotator => Value::Rotator(Rotator::ZERO),
            KeyTypeTag::Enum => Value::Enum(0),
            KeyTypeTag::Class => Value::Class(None),
            KeyTypeTag::Object => Value::Object(None),
        }
    }

    /// Compare two values of the same kind.  Floats, vectors, and rotators use
    /// approximate equality; classes and objects compare by identity.  Values
    /// of different kinds are never equal.
    pub fn compare(&self, other: &Value) -> BlackboardCompare {
        let equal = match (self, other) {
            (Value::Float(a), Value::Float(b)) => nearly_equal(*a, *b, SMALL_NUMBER),
            (Value::Vector(a), Value::Vector(b)) => a.equals(*b, KINDA_SMALL_NUMBER),
            (Value::Rotator(a), Value::Rotator(b)) => a.equals(*b, KINDA_SMALL_NUMBER),
            (a, b) if a.tag() == b.tag() => a == b,
            _ => false,
        };
        BlackboardCompare::from_bool(equal)
    }
}
