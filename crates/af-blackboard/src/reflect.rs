//! A minimal class / enum / object registry.
//!
//! The blackboard needs three reflective questions answered: "is this class a
//! subclass of that one", "is this object an instance of that class", and
//! "what integer does this enum name map to".  [`TypeRegistry`] answers them
//! without any engine behind it.
//!
//! Classes form a single-inheritance tree rooted at [`builtin::OBJECT`].  A
//! class is always registered after its parent, so parent ids are strictly
//! smaller than child ids and walking up the chain always terminates.

use std::sync::Arc;

use af_core::{ClassId, Name, ObjectId};
use rustc_hash::FxHashMap;

/// Classes every registry starts with.
pub mod builtin {
    use af_core::ClassId;

    pub const OBJECT:               ClassId = ClassId(0);
    pub const ACTOR:                ClassId = ClassId(1);
    pub const PAWN:                 ClassId = ClassId(2);
    pub const CONTROLLER:           ClassId = ClassId(3);
    pub const GAME_STATE:           ClassId = ClassId(4);
    pub const BLACKBOARD_COMPONENT: ClassId = ClassId(5);
}

// ── Definitions ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    pub name:   Name,
    pub parent: Option<ClassId>,
    /// Instances of this class are owned inline by whoever references them,
    /// rather than referenced as a standalone asset.
    pub edit_inline_new: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDef {
    pub name:    Name,
    pub class:   ClassId,
    pub package: Name,
}

/// An enumeration: ordered `(name, value)` entries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDef {
    pub name: Name,
    entries:  Vec<(Name, i64)>,
}

impl EnumDef {
    pub fn new<N: Into<Name>>(name: impl Into<Name>, entries: impl IntoIterator<Item = (N, i64)>) -> Self {
        Self {
            name:    name.into(),
            entries: entries.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    pub fn entries(&self) -> &[(Name, i64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn value_by_name(&self, name: &Name) -> Option<i64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn name_by_value(&self, value: i64) -> Option<&Name> {
        self.entries.iter().find(|(_, v)| *v == value).map(|(n, _)| n)
    }

    pub fn is_valid_name(&self, name: &Name) -> bool {
        !name.is_none() && self.value_by_name(name).is_some()
    }

    /// The name a stale value is repaired to: the entry whose value is `-1`
    /// if there is one, otherwise the last entry.  `None` for an empty enum.
    pub fn fallback_name(&self) -> Option<&Name> {
        self.name_by_value(-1).or_else(|| self.entries.last().map(|(n, _)| n))
    }
}

// ── TypeRegistry ──────────────────────────────────────────────────────────────

pub struct TypeRegistry {
    classes:       Vec<ClassDef>,
    class_by_name: FxHashMap<Name, ClassId>,
    objects:       Vec<ObjectDef>,
    enums:         FxHashMap<Name, Arc<EnumDef>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry holding only the [`builtin`] classes.
    pub fn new() -> Self {
        let mut registry = Self {
            classes:       Vec::new(),
            class_by_name: FxHashMap::default(),
            objects:       Vec::new(),
            enums:         FxHashMap::default(),
        };
        registry.push_class("Object", None, false);
        registry.push_class("Actor", Some(builtin::OBJECT), false);
        registry.push_class("Pawn", Some(builtin::ACTOR), false);
        registry.push_class("Controller", Some(builtin::ACTOR), false);
        registry.push_class("GameState", Some(builtin::ACTOR), false);
        registry.push_class("BlackboardComponent", Some(builtin::OBJECT), false);
        registry
    }

    fn push_class(&mut self, name: &str, parent: Option<ClassId>, edit_inline_new: bool) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        let name = Name::from(name);
        self.class_by_name.insert(name.clone(), id);
        self.classes.push(ClassDef { name, parent, edit_inline_new });
        id
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Register a class under `parent`.  An unknown parent falls back to
    /// [`builtin::OBJECT`].
    pub fn add_class(&mut self, name: &str, parent: ClassId, edit_inline_new: bool) -> ClassId {
        let parent = if self.class(parent).is_some() {
            parent
        } else {
            tracing::warn!(class = name, %parent, "unknown parent class, using Object");
            builtin::OBJECT
        };
        self.push_class(name, Some(parent), edit_inline_new)
    }

    /// Register an object of `class` in `package`.
    pub fn add_object(&mut self, name: impl Into<Name>, class: ClassId, package: impl Into<Name>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(ObjectDef { name: name.into(), class, package: package.into() });
        id
    }

    /// Register an enum, replacing any previous enum with the same name.
    pub fn add_enum(&mut self, def: EnumDef) -> Arc<EnumDef> {
        let def = Arc::new(def);
        self.enums.insert(def.name.clone(), Arc::clone(&def));
        def
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    pub fn find_class(&self, name: &Name) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectDef> {
        self.objects.get(id.index())
    }

    pub fn find_enum(&self, name: &Name) -> Option<Arc<EnumDef>> {
        self.enums.get(name).cloned()
    }

    pub fn class_of(&self, object: ObjectId) -> Option<ClassId> {
        self.object(object).map(|o| o.class)
    }

    /// Display name of a class, `None` for unknown ids.
    pub fn class_name(&self, id: ClassId) -> Name {
        self.class(id).map(|c| c.name.clone()).unwrap_or_default()
    }

    pub fn object_name(&self, id: ObjectId) -> Name {
        self.object(id).map(|o| o.name.clone()).unwrap_or_default()
    }

    /// `true` if `class == base` or `base` is an ancestor of `class`.
    pub fn is_child_of(&self, class: ClassId, base: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            current = self.class(id).and_then(|c| c.parent);
        }
        false
    }

    /// `true` if `object`'s class is `base` or a subclass of it.
    pub fn is_a(&self, object: ObjectId, base: ClassId) -> bool {
        self.class_of(object).is_some_and(|c| self.is_child_of(c, base))
    }

    /// `true` if instances of `class` are owned inline by their referencer.
    pub fn is_edit_inline_new(&self, class: ClassId) -> bool {
        self.class(class).is_some_and(|c| c.edit_inline_new)
    }
}
