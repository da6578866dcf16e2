//! The literal held by an entry value, one case per key kind.

use std::sync::Arc;

use af_blackboard::{EnumDef, KeyTypeTag, TypeRegistry, builtin};
use af_core::{ClassId, Name, ObjectId, Rotator, Vector};
use tracing::error;

// ── Enum ──────────────────────────────────────────────────────────────────────

/// An enum value held by name.  The integer is looked up in `enum_def`
/// whenever the value is written, compared, or used as an operand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumLiteral {
    pub value:     Name,
    pub enum_def:  Option<Arc<EnumDef>>,
    pub enum_name: Name,
}

impl EnumLiteral {
    /// Underlying value of `value`, if the enum knows it.
    pub fn resolve(&self) -> Option<i64> {
        self.enum_def.as_ref().and_then(|def| def.value_by_name(&self.value))
    }

    /// Underlying value as stored by a blackboard.
    pub fn resolve_u8(&self) -> Option<u8> {
        self.resolve().and_then(|v| u8::try_from(v).ok())
    }

    /// Repair `value` so it names an entry of the current enum.  With no
    /// enum the value is cleared.  Returns `true` if `value` changed.
    pub fn ensure_compatible(&mut self) -> bool {
        let repaired = match &self.enum_def {
            None => Name::NONE,
            Some(def) if def.is_valid_name(&self.value) => return false,
            Some(def) => def.fallback_name().cloned().unwrap_or_default(),
        };
        let changed = repaired != self.value;
        self.value = repaired;
        changed
    }

    /// Rebind to another enum and repair the value.  Returns `true` if
    /// anything changed.
    pub fn rebind(&mut self, enum_def: Option<Arc<EnumDef>>, enum_name: Name) -> bool {
        let enum_name = match (&enum_def, enum_name.is_none()) {
            (Some(def), true) => def.name.clone(),
            _ => enum_name,
        };
        let same_def = match (&self.enum_def, &enum_def) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (None, None) => true,
            _ => false,
        };
        let mut changed = !same_def || self.enum_name != enum_name;
        self.enum_def = enum_def;
        self.enum_name = enum_name;
        changed |= self.ensure_compatible();
        changed
    }
}

// ── Class ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ClassLiteral {
    pub base_class: ClassId,
    class:          Option<ClassId>,
}

impl Default for ClassLiteral {
    fn default() -> Self {
        Self { base_class: builtin::OBJECT, class: None }
    }
}

impl ClassLiteral {
    pub fn new(base_class: ClassId) -> Self {
        Self { base_class, class: None }
    }

    pub fn class(&self) -> Option<ClassId> {
        self.class
    }

    /// Set the held class.  A class outside `base_class` is rejected.
    pub fn set(&mut self, class: Option<ClassId>, registry: &TypeRegistry) -> bool {
        if let Some(c) = class {
            if !registry.is_child_of(c, self.base_class) {
                error!(
                    class = %registry.class_name(c),
                    base = %registry.class_name(self.base_class),
                    "class is not a subclass of the entry's base class"
                );
                return false;
            }
        }
        self.class = class;
        true
    }

    /// Clear the held class if it no longer derives from `base_class`.
    pub fn ensure_compatible(&mut self, registry: &TypeRegistry) -> bool {
        match self.class {
            Some(c) if !registry.is_child_of(c, self.base_class) => {
                self.class = None;
                true
            }
            _ => false,
        }
    }
}

// ── Object ────────────────────────────────────────────────────────────────────

/// Where an object value lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectSlot {
    /// A sub-object owned by the entry (its class is edit-inline-new).
    OwnedInstance(ObjectId),
    /// A reference to an external asset.
    AssetReference(ObjectId),
}

impl ObjectSlot {
    pub fn object(self) -> ObjectId {
        match self {
            ObjectSlot::OwnedInstance(id) | ObjectSlot::AssetReference(id) => id,
        }
    }
}

/// What kind of object a base class calls for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectTypeSelector {
    Unknown,
    Instanced,
    Asset,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectLiteral {
    pub base_class: ClassId,
    slot:           Option<ObjectSlot>,
}

impl Default for ObjectLiteral {
    fn default() -> Self {
        Self { base_class: builtin::OBJECT, slot: None }
    }
}

impl ObjectLiteral {
    pub fn new(base_class: ClassId) -> Self {
        Self { base_class, slot: None }
    }

    pub fn slot(&self) -> Option<ObjectSlot> {
        self.slot
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.slot.map(ObjectSlot::object)
    }

    /// Instanced when the base class is edit-inline-new, asset otherwise.
    pub fn type_selector(&self, registry: &TypeRegistry) -> ObjectTypeSelector {
        match registry.class(self.base_class) {
            None => ObjectTypeSelector::Unknown,
            Some(c) if c.edit_inline_new => ObjectTypeSelector::Instanced,
            Some(_) => ObjectTypeSelector::Asset,
        }
    }

    /// Set the held object.  The slot is chosen from the object's own class;
    /// an object that is not a `base_class` is rejected.
    pub fn set(&mut self, object: Option<ObjectId>, registry: &TypeRegistry) -> bool {
        let Some(id) = object else {
            self.slot = None;
            return true;
        };
        if !registry.is_a(id, self.base_class) {
            error!(
                object = %registry.object_name(id),
                base = %registry.class_name(self.base_class),
                "object is not an instance of the entry's base class"
            );
            return false;
        }
        let owned = registry.class_of(id).is_some_and(|c| registry.is_edit_inline_new(c));
        self.slot = Some(if owned { ObjectSlot::OwnedInstance(id) } else { ObjectSlot::AssetReference(id) });
        true
    }

    /// Clear the held object if it is no longer a `base_class`.
    pub fn ensure_compatible(&mut self, registry: &TypeRegistry) -> bool {
        match self.slot {
            Some(slot) if !registry.is_a(slot.object(), self.base_class) => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }
}

// ── Literal ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Float(f32),
    Name(Name),
    String(String),
    Vector(Vector),
    Rotator(Rotator),
    Enum(EnumLiteral),
    Class(ClassLiteral),
    Object(ObjectLiteral),
}

impl Literal {
    pub fn tag(&self) -> KeyTypeTag {
        match self {
            Literal::Bool(_) => KeyTypeTag::Bool,
            Literal::Int(_) => KeyTypeTag::Int,
            Literal::Float(_) => KeyTypeTag::Float,
            Literal::Name(_) => KeyTypeTag::Name,
            Literal::String(_) => KeyTypeTag::String,
            Literal::Vector(_) => KeyTypeTag::Vector,
            Literal::Rotator(_) => KeyTypeTag::Rotator,
            Literal::Enum(_) => KeyTypeTag::Enum,
            Literal::Class(_) => KeyTypeTag::Class,
            Literal::Object(_) => KeyTypeTag::Object,
        }
    }
}
