//! `EntryValue` — a literal bound to a blackboard key.
//!
//! # Invariant
//!
//! The literal's kind always matches the kind of the key it was last
//! configured for.  [`EntryValue::try_reconfigure_from_key_type`] restores
//! the invariant after the key's type changes: it swaps in a default literal
//! for a different kind, rebinds enum literals to the new enum (repairing a
//! name the new enum does not know), and drops class/object values that fall
//! outside a new base class.
//!
//! # Soft failures
//!
//! Writes and compares against a missing or mistyped store log at error
//! level and report failure (`false` / `NotEqual`).  Nothing here panics.

use af_blackboard::{Blackboard, BlackboardCompare, BlackboardSchema, KeyType, KeyTypeTag, TypeRegistry, Value};
use af_core::{ClassId, KINDA_SMALL_NUMBER, Name, ObjectId, Rotator, SMALL_NUMBER, Vector, nearly_equal};
use tracing::error;

use crate::key::EntryKey;
use crate::kinds::kind_info;
use crate::literal::{ClassLiteral, EnumLiteral, Literal, ObjectLiteral};
use crate::pin::{PinDirection, PinError, PinProperty, PinResult, PinSource, PinValue};

/// Whether the key half of an entry is shown to the author.  A compare
/// node's right-hand literal only uses the value half.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyVisibility {
    #[default]
    Visible,
    NotVisible,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntryValue {
    pub key:            EntryKey,
    pub key_visibility: KeyVisibility,
    literal:            Literal,
}

impl EntryValue {
    // ── Construction ──────────────────────────────────────────────────────

    /// An entry for a key of `key_type`, holding that kind's default literal.
    pub fn for_key_type(key_name: impl Into<Name>, key_type: &KeyType) -> Self {
        Self {
            key:            EntryKey::with_type(key_name, key_type.clone()),
            key_visibility: KeyVisibility::Visible,
            literal:        (kind_info(key_type.tag()).default_literal)(key_type),
        }
    }

    fn with_literal(key_name: impl Into<Name>, key_type: KeyType, literal: Literal) -> Self {
        Self {
            key:            EntryKey::with_type(key_name, key_type),
            key_visibility: KeyVisibility::Visible,
            literal,
        }
    }

    pub fn bool(key_name: impl Into<Name>, value: bool) -> Self {
        Self::with_literal(key_name, KeyType::Bool, Literal::Bool(value))
    }

    pub fn int(key_name: impl Into<Name>, value: i32) -> Self {
        Self::with_literal(key_name, KeyType::Int, Literal::Int(value))
    }

    pub fn float(key_name: impl Into<Name>, value: f32) -> Self {
        Self::with_literal(key_name, KeyType::Float, Literal::Float(value))
    }

    pub fn name(key_name: impl Into<Name>, value: impl Into<Name>) -> Self {
        Self::with_literal(key_name, KeyType::Name, Literal::Name(value.into()))
    }

    pub fn string(key_name: impl Into<Name>, value: impl Into<String>) -> Self {
        Self::with_literal(key_name, KeyType::String, Literal::String(value.into()))
    }

    pub fn vector(key_name: impl Into<Name>, value: Vector) -> Self {
        Self::with_literal(key_name, KeyType::Vector, Literal::Vector(value))
    }

    pub fn rotator(key_name: impl Into<Name>, value: Rotator) -> Self {
        Self::with_literal(key_name, KeyType::Rotator, Literal::Rotator(value))
    }

    /// An enum entry for `key_type` (an enum key) set to `value`, repaired
    /// if the enum does not know it.
    pub fn enumeration(key_name: impl Into<Name>, key_type: &KeyType, value: impl Into<Name>) -> Self {
        let mut entry = Self::for_key_type(key_name, key_type);
        if let Literal::Enum(e) = &mut entry.literal {
            e.value = value.into();
            e.ensure_compatible();
        }
        entry
    }

    /// A class entry restricted to `base_class`.
    pub fn class(key_name: impl Into<Name>, base_class: ClassId, class: Option<ClassId>, registry: &TypeRegistry) -> Self {
        let mut literal = ClassLiteral::new(base_class);
        literal.set(class, registry);
        Self::with_literal(key_name, KeyType::Class { base_class }, Literal::Class(literal))
    }

    /// An object entry restricted to `base_class`.
    pub fn object(key_name: impl Into<Name>, base_class: ClassId, object: Option<ObjectId>, registry: &TypeRegistry) -> Self {
        let mut literal = ObjectLiteral::new(base_class);
        literal.set(object, registry);
        Self::with_literal(key_name, KeyType::Object { base_class }, Literal::Object(literal))
    }

    /// Hide the key half (for use as a bare literal).
    pub fn without_key(mut self) -> Self {
        self.key_visibility = KeyVisibility::NotVisible;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn key_name(&self) -> &Name {
        &self.key.key_name
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// The exact key kind this entry handles.
    pub fn supported_key_type(&self) -> KeyTypeTag {
        self.literal.tag()
    }

    pub fn supports_arithmetic(&self) -> bool {
        kind_info(self.supported_key_type()).supports_arithmetic
    }

    /// Replace the literal with one of the same kind.  Class and object
    /// values go through the base-class check.
    pub fn set_literal(&mut self, literal: Literal, registry: &TypeRegistry) -> bool {
        if literal.tag() != self.literal.tag() {
            error!(
                key = %self.key.key_name,
                expected = %self.literal.tag(),
                actual = %literal.tag(),
                "literal kind does not match entry"
            );
            return false;
        }
        match (&mut self.literal, literal) {
            (Literal::Class(mine), Literal::Class(new)) => mine.set(new.class(), registry),
            (Literal::Object(mine), Literal::Object(new)) => mine.set(new.object(), registry),
            (Literal::Enum(mine), Literal::Enum(new)) => {
                mine.value = new.value;
                mine.ensure_compatible();
                true
            }
            (slot, new) => {
                *slot = new;
                true
            }
        }
    }

    // ── Store access ──────────────────────────────────────────────────────

    /// The store value this entry writes, if it can be computed.
    fn to_store_value(&self) -> Option<Value> {
        Some(match &self.literal {
            Literal::Bool(v) => Value::Bool(*v),
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Name(v) => Value::Name(v.clone()),
            Literal::String(v) => Value::String(v.clone()),
            Literal::Vector(v) => Value::Vector(*v),
            Literal::Rotator(v) => Value::Rotator(*v),
            Literal::Enum(e) => Value::Enum(e.resolve_u8()?),
            Literal::Class(c) => Value::Class(c.class()),
            Literal::Object(o) => Value::Object(o.object()),
        })
    }

    /// Write the literal into `store` at this entry's key.
    pub fn write(&self, store: Option<&mut Blackboard>) -> bool {
        let Some(store) = store else {
            error!(key = %self.key.key_name, "cannot set a blackboard value without a blackboard");
            return false;
        };
        let Some(value) = self.to_store_value() else {
            error!(key = %self.key.key_name, literal = ?self.literal, "enum value does not resolve to a stored value");
            return false;
        };
        store.set_value_by_name(&self.key.key_name, value)
    }

    /// Compare the literal against the live value of `other_key` in `store`.
    pub fn compare(&self, store: Option<&Blackboard>, other_key: &Name) -> BlackboardCompare {
        let Some(store) = store else {
            error!(key = %other_key, "cannot compare without a blackboard");
            return BlackboardCompare::NotEqual;
        };
        let Some(other) = store.value_by_name(other_key) else {
            error!(key = %other_key, schema = %store.schema().name(), "unknown blackboard key");
            return BlackboardCompare::NotEqual;
        };
        if other.tag() != self.supported_key_type() {
            error!(
                key = %other_key,
                expected = %self.supported_key_type(),
                actual = %other.tag(),
                "blackboard key type mismatch on compare"
            );
            return BlackboardCompare::NotEqual;
        }
        let equal = match (&self.literal, other) {
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Int(a), Value::Int(b)) => a == b,
            (Literal::Float(a), Value::Float(b)) => nearly_equal(*a, *b, SMALL_NUMBER),
            (Literal::Name(a), Value::Name(b)) => a == b,
            (Literal::String(a), Value::String(b)) => a == b,
            (Literal::Vector(a), Value::Vector(b)) => a.equals(*b, KINDA_SMALL_NUMBER),
            (Literal::Rotator(a), Value::Rotator(b)) => a.equals(*b, KINDA_SMALL_NUMBER),
            (Literal::Enum(e), Value::Enum(b)) => e.enum_def.is_some() && e.resolve_u8() == Some(*b),
            (Literal::Class(c), Value::Class(b)) => c.class() == *b,
            (Literal::Object(o), Value::Object(b)) => o.object() == *b,
            _ => false,
        };
        BlackboardCompare::from_bool(equal)
    }

    /// Integer and float operands for an ordering comparison, or `None` for
    /// kinds that cannot be ordered (and enums without an enum type).
    pub fn try_arithmetic_values(&self) -> Option<(i32, f32)> {
        match &self.literal {
            Literal::Int(v) => Some((*v, *v as f32)),
            Literal::Float(v) => Some((v.floor() as i32, *v)),
            Literal::Enum(e) => e.resolve().map(|v| (v as i32, v as f32)),
            _ => None,
        }
    }

    // ── Reconfiguration ───────────────────────────────────────────────────

    /// Make this entry match `key_type`.  Returns `true` if anything changed.
    pub fn try_reconfigure_from_key_type(&mut self, key_type: &KeyType, registry: &TypeRegistry) -> bool {
        let mut changed = false;

        if self.key.allowed_types.len() != 1 || self.key.allowed_types[0] != *key_type {
            self.key.allowed_types = vec![key_type.clone()];
            changed = true;
        }

        if self.literal.tag() != key_type.tag() {
            self.literal = (kind_info(key_type.tag()).default_literal)(key_type);
            return true;
        }

        changed |= match (&mut self.literal, key_type) {
            (Literal::Enum(e), KeyType::Enum { enum_def, enum_name }) => e.rebind(enum_def.clone(), enum_name.clone()),
            (Literal::Class(c), KeyType::Class { base_class }) => {
                let rebased = c.base_class != *base_class;
                c.base_class = *base_class;
                c.ensure_compatible(registry) || rebased
            }
            (Literal::Object(o), KeyType::Object { base_class }) => {
                let rebased = o.base_class != *base_class;
                o.base_class = *base_class;
                o.ensure_compatible(registry) || rebased
            }
            _ => false,
        };
        changed
    }

    /// Re-read this entry's enum type from the key of the same name in
    /// `schema`.  Non-enum entries and unknown keys are left alone.
    pub fn update_enum_type_from_schema(&mut self, schema: &BlackboardSchema, registry: &TypeRegistry) -> bool {
        if self.supported_key_type() != KeyTypeTag::Enum {
            return false;
        }
        match self.key.resolve(schema) {
            Some((_, key_type @ KeyType::Enum { .. })) => {
                let key_type = key_type.clone();
                self.try_reconfigure_from_key_type(&key_type, registry)
            }
            _ => false,
        }
    }

    // ── Data pins ─────────────────────────────────────────────────────────

    fn to_pin_value(&self) -> PinValue {
        match &self.literal {
            Literal::Bool(v) => PinValue::Bool(*v),
            Literal::Int(v) => PinValue::Int(*v),
            Literal::Float(v) => PinValue::Float(*v),
            Literal::Name(v) => PinValue::Name(v.clone()),
            Literal::String(v) => PinValue::String(v.clone()),
            Literal::Vector(v) => PinValue::Vector(*v),
            Literal::Rotator(v) => PinValue::Rotator(*v),
            Literal::Enum(e) => PinValue::Enum { value: e.value.clone(), enum_def: e.enum_def.clone() },
            Literal::Class(c) => PinValue::Class(c.class()),
            Literal::Object(o) => PinValue::Object(o.object()),
        }
    }

    /// Export as an input pin (the literal is the pin's default) or as an
    /// output pin (the literal is the pin's value).
    pub fn try_provide_pin_property(&self, direction: PinDirection) -> Option<PinProperty> {
        let class_filter = match &self.literal {
            Literal::Class(c) => Some(c.base_class),
            Literal::Object(o) => Some(o.base_class),
            _ => None,
        };
        Some(PinProperty { direction, value: self.to_pin_value(), class_filter })
    }

    /// Overwrite the literal from the resolved input pin `pin`.  Nothing
    /// changes unless the pin resolves and carries this entry's kind.
    pub fn try_set_from_input_pin(&mut self, pin: &Name, source: &dyn PinSource, registry: &TypeRegistry) -> PinResult<()> {
        let value = source.resolve_pin(pin)?;
        let expected = self.supported_key_type();
        let mismatch = |actual| PinError::MismatchedType { pin: pin.clone(), expected, actual };
        if value.tag() != expected {
            return Err(mismatch(value.tag()));
        }
        let applied = match (&mut self.literal, value) {
            (Literal::Bool(slot), PinValue::Bool(v)) => {
                *slot = v;
                true
            }
            (Literal::Int(slot), PinValue::Int(v)) => {
                *slot = v;
                true
            }
            (Literal::Float(slot), PinValue::Float(v)) => {
                *slot = v;
                true
            }
            (Literal::Name(slot), PinValue::Name(v)) => {
                *slot = v;
                true
            }
            (Literal::String(slot), PinValue::String(v)) => {
                *slot = v;
                true
            }
            (Literal::Vector(slot), PinValue::Vector(v)) => {
                *slot = v;
                true
            }
            (Literal::Rotator(slot), PinValue::Rotator(v)) => {
                *slot = v;
                true
            }
            (Literal::Enum(e), PinValue::Enum { value, .. }) => {
                e.value = value;
                e.ensure_compatible();
                true
            }
            (Literal::Class(c), PinValue::Class(v)) => c.set(v, registry),
            (Literal::Object(o), PinValue::Object(v)) => o.set(v, registry),
            (Literal::Object(o), PinValue::Objects(list)) => o.set(list.into_iter().flatten().next(), registry),
            _ => false,
        };
        if applied {
            Ok(())
        } else {
            Err(mismatch(expected))
        }
    }

    // ── Display ───────────────────────────────────────────────────────────

    /// The literal as an author would read it.
    pub fn editor_value_string(&self, registry: &TypeRegistry) -> String {
        match &self.literal {
            Literal::Bool(v) => v.to_string(),
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => v.to_string(),
            Literal::Name(v) => v.to_string(),
            Literal::String(v) => v.clone(),
            Literal::Vector(v) => v.to_string(),
            Literal::Rotator(v) => v.to_string(),
            Literal::Enum(e) => e.value.to_string(),
            Literal::Class(c) => c.class().map(|id| registry.class_name(id)).unwrap_or_default().to_string(),
            Literal::Object(o) => o.object().map(|id| registry.object_name(id)).unwrap_or_default().to_string(),
        }
    }

    /// One line summary, e.g. `Set Ammo to "30"`.
    pub fn node_config_text(&self, registry: &TypeRegistry) -> String {
        format!("Set {} to \"{}\"", self.key.key_name, self.editor_value_string(registry))
    }
}

/// Enum literal access for callers that edit an enum entry in place.
impl EntryValue {
    pub fn enum_literal(&self) -> Option<&EnumLiteral> {
        match &self.literal {
            Literal::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn object_literal(&self) -> Option<&ObjectLiteral> {
        match &self.literal {
            Literal::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn class_literal(&self) -> Option<&ClassLiteral> {
        match &self.literal {
            Literal::Class(c) => Some(c),
            _ => None,
        }
    }
}
