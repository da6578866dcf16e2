//! Data pins — the flow graph's node-to-node value passing.
//!
//! An entry value can be exported as a pin property (the default of an input
//! pin, or the value of an output pin) and can import the resolved value of
//! an input pin.  The flow graph itself is external: it is reached through
//! the [`PinSource`] trait, and [`PinMap`] is a plain in-memory source.

use std::sync::Arc;

use af_blackboard::{Blackboard, EnumDef, KeyType, KeyTypeTag, Value};
use af_core::{ClassId, Name, ObjectId, Rotator, Vector};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::error;

// ── Values ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinDirection {
    Input,
    Output,
}

/// A value carried by a data pin.
#[derive(Clone, Debug, PartialEq)]
pub enum PinValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Name(Name),
    String(String),
    Vector(Vector),
    Rotator(Rotator),
    Enum {
        value:    Name,
        enum_def: Option<Arc<EnumDef>>,
    },
    Class(Option<ClassId>),
    Object(Option<ObjectId>),
    /// Several objects on one pin, e.g. a list of actors.
    Objects(Vec<Option<ObjectId>>),
}

impl PinValue {
    /// The key kind this value can feed.  `Objects` feeds object keys.
    pub fn tag(&self) -> KeyTypeTag {
        match self {
            PinValue::Bool(_) => KeyTypeTag::Bool,
            PinValue::Int(_) => KeyTypeTag::Int,
            PinValue::Float(_) => KeyTypeTag::Float,
            PinValue::Name(_) => KeyTypeTag::Name,
            PinValue::String(_) => KeyTypeTag::String,
            PinValue::Vector(_) => KeyTypeTag::Vector,
            PinValue::Rotator(_) => KeyTypeTag::Rotator,
            PinValue::Enum { .. } => KeyTypeTag::Enum,
            PinValue::Class(_) => KeyTypeTag::Class,
            PinValue::Object(_) | PinValue::Objects(_) => KeyTypeTag::Object,
        }
    }

    /// Convert a store's live value for a key of `key_type`.
    pub fn from_store_value(value: &Value, key_type: &KeyType) -> Self {
        match value {
            Value::Bool(v) => PinValue::Bool(*v),
            Value::Int(v) => PinValue::Int(*v),
            Value::Float(v) => PinValue::Float(*v),
            Value::Name(v) => PinValue::Name(v.clone()),
            Value::String(v) => PinValue::String(v.clone()),
            Value::Vector(v) => PinValue::Vector(*v),
            Value::Rotator(v) => PinValue::Rotator(*v),
            Value::Enum(raw) => {
                let enum_def = key_type.enum_def().cloned();
                let value = enum_def
                    .as_ref()
                    .and_then(|d| d.name_by_value(i64::from(*raw)).cloned())
                    .unwrap_or_default();
                PinValue::Enum { value, enum_def }
            }
            Value::Class(v) => PinValue::Class(*v),
            Value::Object(v) => PinValue::Object(*v),
        }
    }
}

/// A pin as offered to the graph: direction, value, and (for class and
/// object pins) the base class it accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct PinProperty {
    pub direction:    PinDirection,
    pub value:        PinValue,
    pub class_filter: Option<ClassId>,
}

// ── Resolution ────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PinError {
    #[error("unknown pin {0}")]
    UnknownPin(Name),

    #[error("pin {pin} carries {actual}, expected {expected}")]
    MismatchedType {
        pin:      Name,
        expected: KeyTypeTag,
        actual:   KeyTypeTag,
    },
}

pub type PinResult<T> = Result<T, PinError>;

/// Resolves input pins to values at execution time.
pub trait PinSource {
    fn resolve_pin(&self, pin: &Name) -> PinResult<PinValue>;

    /// Resolve a pin carrying one or several objects.
    fn resolve_objects(&self, pin: &Name) -> PinResult<Vec<Option<ObjectId>>> {
        match self.resolve_pin(pin)? {
            PinValue::Object(o) => Ok(vec![o]),
            PinValue::Objects(list) => Ok(list),
            other => Err(PinError::MismatchedType {
                pin:      pin.clone(),
                expected: KeyTypeTag::Object,
                actual:   other.tag(),
            }),
        }
    }
}

/// Source with no connected pins.
impl PinSource for () {
    fn resolve_pin(&self, pin: &Name) -> PinResult<PinValue> {
        Err(PinError::UnknownPin(pin.clone()))
    }
}

/// In-memory pin values keyed by pin name.
#[derive(Clone, Debug, Default)]
pub struct PinMap {
    pins: FxHashMap<Name, PinValue>,
}

impl PinMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pin: impl Into<Name>, value: PinValue) -> Self {
        self.insert(pin, value);
        self
    }

    pub fn insert(&mut self, pin: impl Into<Name>, value: PinValue) {
        self.pins.insert(pin.into(), value);
    }

    pub fn remove(&mut self, pin: &Name) -> Option<PinValue> {
        self.pins.remove(pin)
    }
}

impl PinSource for PinMap {
    fn resolve_pin(&self, pin: &Name) -> PinResult<PinValue> {
        self.pins.get(pin).cloned().ok_or_else(|| PinError::UnknownPin(pin.clone()))
    }
}

/// Output pin property for `key_name` read straight from a store.
///
/// Returns `None` (logged) when the store is missing, the key is unknown, or
/// its declared type differs from `key_type`.
pub fn pin_property_from_store(key_name: &Name, key_type: &KeyType, store: Option<&Blackboard>) -> Option<PinProperty> {
    let Some(store) = store else {
        error!(key = %key_name, "cannot read a pin value without a blackboard");
        return None;
    };
    let Some(key) = store.key_id(key_name) else {
        error!(key = %key_name, schema = %store.schema().name(), "unknown blackboard key for pin");
        return None;
    };
    let declared = store.key_type(key)?;
    if declared.tag() != key_type.tag() {
        error!(
            key = %key_name,
            expected = %key_type.tag(),
            declared = %declared.tag(),
            "blackboard key type does not match the pin's key type"
        );
        return None;
    }
    let value = store.value(key)?;
    let class_filter = match declared {
        KeyType::Class { base_class } | KeyType::Object { base_class } => Some(*base_class),
        _ => None,
    };
    Some(PinProperty {
        direction: PinDirection::Output,
        value: PinValue::from_store_value(value, declared),
        class_filter,
    })
}
