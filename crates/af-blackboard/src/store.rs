//! `Blackboard` — live values for every key of one schema.

use std::sync::Arc;

use af_core::{ClassId, KeyId, Name, ObjectId, Rotator, Vector};
use tracing::error;

use crate::key_type::{ArithmeticOp, KeyType, KeyTypeTag};
use crate::schema::BlackboardSchema;
use crate::value::{BlackboardCompare, Value};

/// A runtime store bound to exactly one schema.
///
/// `values[key.index()]` is the live value of each key of the flattened
/// schema.  The value's kind always matches the key's declared tag: setters
/// reject values of any other kind.
#[derive(Clone, Debug)]
pub struct Blackboard {
    schema: Arc<BlackboardSchema>,
    values: Vec<Value>,
}

/// Generate a typed getter/setter pair for one value kind.
macro_rules! typed_access {
    ($get:ident, $set:ident, $tag:ident, $ty:ty, $default:expr) => {
        /// Logs and returns the default for an unknown or mistyped key.
        pub fn $get(&self, key_name: &Name) -> $ty {
            match self.typed_value(key_name, KeyTypeTag::$tag) {
                Some(Value::$tag(v)) => v.clone(),
                _ => $default,
            }
        }

        /// Logs and returns `false` for an unknown or mistyped key.
        pub fn $set(&mut self, key_name: &Name, value: $ty) -> bool {
            self.set_value_by_name(key_name, Value::$tag(value))
        }
    };
}

impl Blackboard {
    /// A store holding the default value for every key of `schema`.
    pub fn new(schema: Arc<BlackboardSchema>) -> Self {
        let values = schema.keys().map(|(_, k)| Value::default_for(k.key_type.tag())).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<BlackboardSchema> {
        &self.schema
    }

    pub fn key_id(&self, key_name: &Name) -> Option<KeyId> {
        self.schema.key_id(key_name)
    }

    pub fn key_type(&self, key: KeyId) -> Option<&KeyType> {
        self.schema.key_type(key)
    }

    pub fn is_valid_key(&self, key: KeyId) -> bool {
        key.index() < self.values.len()
    }

    /// Raw read of a key's live value.
    pub fn value(&self, key: KeyId) -> Option<&Value> {
        self.values.get(key.index())
    }

    pub fn value_by_name(&self, key_name: &Name) -> Option<&Value> {
        self.key_id(key_name).and_then(|k| self.value(k))
    }

    /// Write a key's value.  The value's kind must match the key's declared tag.
    pub fn set_value(&mut self, key: KeyId, value: Value) -> bool {
        let Some(key_type) = self.schema.key_type(key) else {
            error!(schema = %self.schema.name(), %key, "set_value on an invalid key id");
            return false;
        };
        if key_type.tag() != value.tag() {
            error!(
                schema = %self.schema.name(),
                key = %self.schema.key_name(key).cloned().unwrap_or_default(),
                expected = %key_type.tag(),
                actual = %value.tag(),
                "blackboard key type mismatch on write"
            );
            return false;
        }
        self.values[key.index()] = value;
        true
    }

    pub fn set_value_by_name(&mut self, key_name: &Name, value: Value) -> bool {
        match self.key_id(key_name) {
            Some(key) => self.set_value(key, value),
            None => {
                error!(schema = %self.schema.name(), key = %key_name, "unknown blackboard key");
                false
            }
        }
    }

    /// Reset a key to its default value.
    pub fn clear_value(&mut self, key: KeyId) {
        if let Some(tag) = self.schema.key_type(key).map(KeyType::tag) {
            self.values[key.index()] = Value::default_for(tag);
        }
    }

    /// Value of `key_name` if it exists and is declared as `expected`.
    fn typed_value(&self, key_name: &Name, expected: KeyTypeTag) -> Option<&Value> {
        let Some(key) = self.key_id(key_name) else {
            error!(schema = %self.schema.name(), key = %key_name, "unknown blackboard key");
            return None;
        };
        let declared = self.schema.key_type(key).map(KeyType::tag);
        if declared != Some(expected) {
            error!(
                schema = %self.schema.name(),
                key = %key_name,
                %expected,
                declared = ?declared,
                "blackboard key type mismatch on read"
            );
            return None;
        }
        self.value(key)
    }

    // ── Typed access ──────────────────────────────────────────────────────

    typed_access!(value_as_bool, set_value_as_bool, Bool, bool, false);
    typed_access!(value_as_int, set_value_as_int, Int, i32, 0);
    typed_access!(value_as_float, set_value_as_float, Float, f32, 0.0);
    typed_access!(value_as_name, set_value_as_name, Name, Name, Name::NONE);
    typed_access!(value_as_string, set_value_as_string, String, String, String::new());
    typed_access!(value_as_vector, set_value_as_vector, Vector, Vector, Vector::ZERO);
    typed_access!(value_as_rotator, set_value_as_rotator, Rotator, Rotator, Rotator::ZERO);
    typed_access!(value_as_enum, set_value_as_enum, Enum, u8, 0);
    typed_access!(value_as_class, set_value_as_class, Class, Option<ClassId>, None);
    typed_access!(value_as_object, set_value_as_object, Object, Option<ObjectId>, None);

    // ── Comparison ────────────────────────────────────────────────────────

    /// Compare the live values of two keys that are both declared as `tag`.
    /// A key of any other type compares `NotEqual` and is logged.
    pub fn compare_key_values(&self, tag: KeyTypeTag, a: KeyId, b: KeyId) -> BlackboardCompare {
        let tag_of = |k: KeyId| self.schema.key_type(k).map(KeyType::tag);
        if tag_of(a) != Some(tag) || tag_of(b) != Some(tag) {
            error!(schema = %self.schema.name(), %a, %b, %tag, "compare on keys of a different type");
            return BlackboardCompare::NotEqual;
        }
        match (self.value(a), self.value(b)) {
            (Some(va), Some(vb)) => va.compare(vb),
            _ => BlackboardCompare::NotEqual,
        }
    }

    /// The key type's arithmetic test applied to `key`'s live value.
    pub fn test_arithmetic(&self, key: KeyId, op: ArithmeticOp, other_int: i32, other_float: f32) -> bool {
        match (self.schema.key_type(key), self.value(key)) {
            (Some(key_type), Some(raw)) => key_type.test_arithmetic(raw, op, other_int, other_float),
            _ => false,
        }
    }
}
