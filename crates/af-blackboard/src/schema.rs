//! Blackboard schemas: the design-time declaration of keys and their types.
//!
//! A schema may extend a parent.  Key ids are assigned over the flattened
//! chain with the root's keys first, so a child never renumbers the keys it
//! inherits:
//!
//! ```text
//! BB_Base   : SelfActor(0)  Target(1)
//! BB_Enemy  : [SelfActor(0) Target(1)]  Alert(2)  Mood(3)
//! ```
//!
//! Schemas are immutable once built and shared behind `Arc`.

use std::sync::Arc;

use af_core::{KeyId, Name, SchemaId};

use crate::error::{BlackboardError, BlackboardResult};
use crate::key_type::KeyType;

#[derive(Clone, Debug, PartialEq)]
pub struct KeyDef {
    pub name:     Name,
    pub key_type: KeyType,
}

#[derive(Debug)]
pub struct BlackboardSchema {
    id:      SchemaId,
    name:    Name,
    package: Name,
    parent:  Option<Arc<BlackboardSchema>>,
    keys:    Vec<KeyDef>,
}

impl BlackboardSchema {
    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Package the schema was loaded from.  Two schema objects with the same
    /// package are the same asset (e.g. before and after a reload).
    pub fn package(&self) -> &Name {
        &self.package
    }

    pub fn parent(&self) -> Option<&Arc<BlackboardSchema>> {
        self.parent.as_ref()
    }

    /// Keys declared on this schema only.
    pub fn own_keys(&self) -> &[KeyDef] {
        &self.keys
    }

    /// Id of this schema's first own key.
    pub fn first_key_id(&self) -> usize {
        self.parent.as_ref().map_or(0, |p| p.num_keys())
    }

    /// Number of keys including inherited ones.
    pub fn num_keys(&self) -> usize {
        self.first_key_id() + self.keys.len()
    }

    /// Own keys are searched before the parent chain.
    pub fn key_id(&self, name: &Name) -> Option<KeyId> {
        if name.is_none() {
            return None;
        }
        if let Some(i) = self.keys.iter().position(|k| &k.name == name) {
            return KeyId::try_from(self.first_key_id() + i).ok();
        }
        self.parent.as_ref().and_then(|p| p.key_id(name))
    }

    pub fn key(&self, id: KeyId) -> Option<&KeyDef> {
        let first = self.first_key_id();
        if id.index() < first {
            self.parent.as_ref().and_then(|p| p.key(id))
        } else {
            self.keys.get(id.index() - first)
        }
    }

    pub fn key_type(&self, id: KeyId) -> Option<&KeyType> {
        self.key(id).map(|k| &k.key_type)
    }

    pub fn key_name(&self, id: KeyId) -> Option<&Name> {
        self.key(id).map(|k| &k.name)
    }

    pub fn key_by_name(&self, name: &Name) -> Option<&KeyDef> {
        self.key_id(name).and_then(|id| self.key(id))
    }

    /// Every key, inherited ones first, with its id.
    pub fn keys(&self) -> impl Iterator<Item = (KeyId, &KeyDef)> + '_ {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(schema) = current {
            chain.push(schema);
            current = schema.parent.as_deref();
        }
        chain
            .into_iter()
            .rev()
            .flat_map(|s| s.keys.iter())
            .enumerate()
            .map(|(i, k)| (KeyId(i as u16), k))
    }

    /// Asset identity: same package when both have one, same id otherwise.
    pub fn is_same_asset(&self, other: &BlackboardSchema) -> bool {
        if !self.package.is_none() && !other.package.is_none() {
            self.package == other.package
        } else {
            self.id == other.id
        }
    }

    /// `true` if `self` is `base` or extends it.
    pub fn is_child_of(&self, base: &BlackboardSchema) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if schema.is_same_asset(base) {
                return true;
            }
            current = schema.parent.as_deref();
        }
        false
    }
}

// ── SchemaBuilder ─────────────────────────────────────────────────────────────

/// Fluent construction of a [`BlackboardSchema`].
///
/// ```rust
/// use af_blackboard::{KeyType, SchemaBuilder};
/// use af_core::SchemaId;
///
/// let schema = SchemaBuilder::new(SchemaId(0), "BB_Guard")
///     .key("Alert", KeyType::Bool)
///     .key("Ammo", KeyType::Int)
///     .build()
///     .unwrap();
/// assert_eq!(schema.num_keys(), 2);
/// ```
pub struct SchemaBuilder {
    id:      SchemaId,
    name:    Name,
    package: Name,
    parent:  Option<Arc<BlackboardSchema>>,
    keys:    Vec<KeyDef>,
}

impl SchemaBuilder {
    /// The package defaults to `/Game/<name>`.
    pub fn new(id: SchemaId, name: impl Into<Name>) -> Self {
        let name = name.into();
        let package = Name::new(format!("/Game/{name}"));
        Self { id, name, package, parent: None, keys: Vec::new() }
    }

    pub fn package(mut self, package: impl Into<Name>) -> Self {
        self.package = package.into();
        self
    }

    pub fn parent(mut self, parent: &Arc<BlackboardSchema>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    pub fn key(mut self, name: impl Into<Name>, key_type: KeyType) -> Self {
        self.keys.push(KeyDef { name: name.into(), key_type });
        self
    }

    /// Validate key names and freeze the schema.
    ///
    /// A key may not repeat a name already declared on this schema or any
    /// parent.
    pub fn build(self) -> BlackboardResult<Arc<BlackboardSchema>> {
        let inherited = self.parent.as_ref().map_or(0, |p| p.num_keys());
        if inherited + self.keys.len() >= KeyId::INVALID.index() {
            return Err(BlackboardError::TooManyKeys(self.name));
        }
        for (i, key) in self.keys.iter().enumerate() {
            if key.name.is_none() {
                return Err(BlackboardError::EmptyKeyName(self.name));
            }
            let repeated = self.keys[..i].iter().any(|k| k.name == key.name)
                || self.parent.as_ref().is_some_and(|p| p.key_id(&key.name).is_some());
            if repeated {
                return Err(BlackboardError::DuplicateKey { schema: self.name, key: key.name.clone() });
            }
        }
        Ok(Arc::new(BlackboardSchema {
            id:      self.id,
            name:    self.name,
            package: self.package,
            parent:  self.parent,
            keys:    self.keys,
        }))
    }
}
