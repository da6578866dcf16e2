//! Static per-kind table.
//!
//! One row per [`KeyTypeTag`], in tag order, so `KINDS[tag.index()]` is the
//! row for `tag`.  The table answers "which literal handles this key type"
//! without scanning anything at runtime.

use af_blackboard::{KeyType, KeyTypeTag};
use af_core::{Name, Rotator, Vector};

use crate::literal::{ClassLiteral, EnumLiteral, Literal, ObjectLiteral};

pub struct KindInfo {
    pub tag: KeyTypeTag,
    /// Whether entries of this kind can be ordered (`<`, `<=`, `>`, `>=`).
    pub supports_arithmetic: bool,
    /// Literal a fresh entry holds for a key of this kind.
    pub default_literal: fn(&KeyType) -> Literal,
}

static KINDS: [KindInfo; KeyTypeTag::COUNT] = [
    KindInfo { tag: KeyTypeTag::Bool,    supports_arithmetic: false, default_literal: default_bool },
    KindInfo { tag: KeyTypeTag::Int,     supports_arithmetic: true,  default_literal: default_int },
    KindInfo { tag: KeyTypeTag::Float,   supports_arithmetic: true,  default_literal: default_float },
    KindInfo { tag: KeyTypeTag::Name,    supports_arithmetic: false, default_literal: default_name },
    KindInfo { tag: KeyTypeTag::String,  supports_arithmetic: false, default_literal: default_string },
    KindInfo { tag: KeyTypeTag::Vector,  supports_arithmetic: false, default_literal: default_vector },
    KindInfo { tag: KeyTypeTag::Rotator, supports_arithmetic: false, default_literal: default_rotator },
    KindInfo { tag: KeyTypeTag::Enum,    supports_arithmetic: true,  default_literal: default_enum },
    KindInfo { tag: KeyTypeTag::Class,   supports_arithmetic: false, default_literal: default_class },
    KindInfo { tag: KeyTypeTag::Object,  supports_arithmetic: false, default_literal: default_object },
];

/// Row for `tag`.
#[inline]
pub fn kind_info(tag: KeyTypeTag) -> &'static KindInfo {
    &KINDS[tag.index()]
}

fn default_bool(_: &KeyType) -> Literal {
    Literal::Bool(false)
}

fn default_int(_: &KeyType) -> Literal {
    Literal::Int(0)
}

fn default_float(_: &KeyType) -> Literal {
    Literal::Float(0.0)
}

fn default_name(_: &KeyType) -> Literal {
    Literal::Name(Name::NONE)
}

fn default_string(_: &KeyType) -> Literal {
    Literal::String(String::new())
}

fn default_vector(_: &KeyType) -> Literal {
    Literal::Vector(Vector::ZERO)
}

fn default_rotator(_: &KeyType) -> Literal {
    Literal::Rotator(Rotator::ZERO)
}

fn default_enum(key_type: &KeyType) -> Literal {
    let mut literal = EnumLiteral::default();
    if let KeyType::Enum { enum_def, enum_name } = key_type {
        literal.rebind(enum_def.clone(), enum_name.clone());
        // Start from the first entry rather than the repair fallback.
        if let Some((first, _)) = enum_def.as_ref().and_then(|d| d.entries().first()) {
            literal.value = first.clone();
        }
    }
    Literal::Enum(literal)
}

fn default_class(key_type: &KeyType) -> Literal {
    match key_type {
        KeyType::Class { base_class } => Literal::Class(ClassLiteral::new(*base_class)),
        _ => Literal::Class(ClassLiteral::default()),
    }
}

fn default_object(key_type: &KeyType) -> Literal {
    match key_type {
        KeyType::Object { base_class } => Literal::Object(ObjectLiteral::new(*base_class)),
        _ => Literal::Object(ObjectLiteral::default()),
    }
}
