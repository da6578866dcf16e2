//! `EntryKey` — a reference to a schema key by name.

use af_blackboard::{BlackboardSchema, KeyType, TypeRegistry};
use af_core::{KeyId, Name};

/// Names a key and lists the key types it may be bound to.
///
/// An empty `allowed_types` accepts any key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryKey {
    pub key_name:      Name,
    pub allowed_types: Vec<KeyType>,
}

impl EntryKey {
    pub fn new(key_name: impl Into<Name>) -> Self {
        Self { key_name: key_name.into(), allowed_types: Vec::new() }
    }

    pub fn with_type(key_name: impl Into<Name>, key_type: KeyType) -> Self {
        Self { key_name: key_name.into(), allowed_types: vec![key_type] }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.key_name.is_none()
    }

    /// `true` if a key of `key_type` passes at least one allowed-type filter.
    pub fn is_allowed(&self, key_type: &KeyType, registry: &TypeRegistry) -> bool {
        self.allowed_types.is_empty()
            || self.allowed_types.iter().any(|filter| key_type.is_allowed_by_filter(filter, registry))
    }

    /// The key's id and declared type in `schema`, if it exists there.
    pub fn resolve<'s>(&self, schema: &'s BlackboardSchema) -> Option<(KeyId, &'s KeyType)> {
        let id = schema.key_id(&self.key_name)?;
        schema.key_type(id).map(|t| (id, t))
    }
}
