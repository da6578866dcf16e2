//! `CompareBlackboardValue` — a predicate comparing a key against another
//! key or against a literal.
//!
//! The left key's declared type picks the comparison family.  Equality
//! (`==`, `!=`) works for every kind; ordering (`<`, `<=`, `>`, `>=`) only
//! for int, float, and enum keys.  Every failure (no store, unknown key,
//! mismatched kinds, ordering on a non-numeric kind) is logged and evaluates
//! to `false` whatever the operator.

use std::fmt;
use std::sync::Arc;

use af_blackboard::{ArithmeticOp, Blackboard, BlackboardCompare, BlackboardSchema, KeyType, TypeRegistry, Value};
use af_core::{KeyId, Name, StoreId};
use af_entry::{EntryKey, EntryValue, KeyVisibility};
use af_world::{SearchRule, try_find_store};
use tracing::error;

use crate::context::FlowContext;
use crate::node::{FlowNodeAddOn, FlowPredicate};

// ── Operator ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareOperator {
    #[default]
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOperator {
    #[inline]
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOperator::Equal | CompareOperator::NotEqual)
    }

    #[inline]
    pub fn is_arithmetic(self) -> bool {
        !self.is_equality()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOperator::Equal => "==",
            CompareOperator::NotEqual => "!=",
            CompareOperator::Less => "<",
            CompareOperator::LessOrEqual => "<=",
            CompareOperator::Greater => ">",
            CompareOperator::GreaterOrEqual => ">=",
        }
    }
}

impl From<CompareOperator> for ArithmeticOp {
    fn from(op: CompareOperator) -> Self {
        match op {
            CompareOperator::Equal => ArithmeticOp::Equal,
            CompareOperator::NotEqual => ArithmeticOp::NotEqual,
            CompareOperator::Less => ArithmeticOp::Less,
            CompareOperator::LessOrEqual => ArithmeticOp::LessOrEqual,
            CompareOperator::Greater => ArithmeticOp::Greater,
            CompareOperator::GreaterOrEqual => ArithmeticOp::GreaterOrEqual,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Predicate ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CompareBlackboardValue {
    pub key_left:             EntryKey,
    pub key_right:            EntryKey,
    /// Right-hand literal, used when `use_explicit_value` is set.
    pub explicit_right:       Option<EntryValue>,
    pub use_explicit_value:   bool,
    pub operator:             CompareOperator,
    /// Compare on the store for this schema instead of the asset's store.
    pub specific_schema:      Option<Arc<BlackboardSchema>>,
    pub specific_search_rule: SearchRule,
}

impl Default for CompareBlackboardValue {
    fn default() -> Self {
        Self {
            key_left:             EntryKey::default(),
            key_right:            EntryKey::default(),
            explicit_right:       None,
            use_explicit_value:   false,
            operator:             CompareOperator::Equal,
            specific_schema:      None,
            specific_search_rule: SearchRule::ActorAndControllerAndGameState,
        }
    }
}

impl CompareBlackboardValue {
    /// `left <op> right`, both keys.
    pub fn keys(left: impl Into<Name>, operator: CompareOperator, right: impl Into<Name>) -> Self {
        Self {
            key_left: EntryKey::new(left),
            key_right: EntryKey::new(right),
            operator,
            ..Self::default()
        }
    }

    /// `left <op> literal`.
    pub fn literal(left: impl Into<Name>, operator: CompareOperator, literal: EntryValue) -> Self {
        Self {
            key_left: EntryKey::new(left),
            explicit_right: Some(literal.without_key()),
            use_explicit_value: true,
            operator,
            ..Self::default()
        }
    }

    pub fn with_specific_schema(mut self, schema: Arc<BlackboardSchema>, rule: SearchRule) -> Self {
        self.specific_schema = Some(schema);
        self.specific_search_rule = rule;
        self
    }

    /// The store this predicate reads: the specific schema's store found
    /// from the owner, or the asset's store.
    pub fn resolve_store(&self, ctx: &FlowContext<'_>) -> Option<StoreId> {
        match &self.specific_schema {
            Some(schema) => {
                let owner = ctx.owner()?;
                try_find_store(&*ctx.world, owner, Some(schema.as_ref()), self.specific_search_rule)
            }
            None => ctx.asset_store(),
        }
    }

    /// Evaluate against `store`.
    pub fn evaluate_on_store(&self, store: &Blackboard) -> bool {
        let schema = store.schema();
        let Some((left_id, left_type)) = self.key_info(schema, &self.key_left) else {
            error!(
                key = %self.key_left.key_name,
                schema = %schema.name(),
                "cannot evaluate a blackboard comparison without a valid left key"
            );
            return false;
        };

        match self.explicit_right.as_ref().filter(|_| self.use_explicit_value) {
            Some(literal) => self.compare_with_literal(store, left_id, left_type, literal),
            None => {
                let Some((right_id, right_type)) = self.key_info(schema, &self.key_right) else {
                    error!(
                        key = %self.key_right.key_name,
                        schema = %schema.name(),
                        "cannot evaluate a blackboard comparison without a valid right key"
                    );
                    return false;
                };
                if left_type.tag() != right_type.tag() {
                    error!(
                        left = %self.key_left.key_name,
                        left_type = %left_type.tag(),
                        right = %self.key_right.key_name,
                        right_type = %right_type.tag(),
                        "cannot compare blackboard keys of mismatched types"
                    );
                    return false;
                }
                self.compare_keys(store, left_id, left_type, right_id)
            }
        }
    }

    fn key_info<'s>(&self, schema: &'s BlackboardSchema, key: &EntryKey) -> Option<(KeyId, &'s KeyType)> {
        if key.is_none() {
            return None;
        }
        key.resolve(schema)
    }

    fn compare_with_literal(&self, store: &Blackboard, left_id: KeyId, left_type: &KeyType, literal: &EntryValue) -> bool {
        if literal.supported_key_type() != left_type.tag() {
            error!(
                key = %self.key_left.key_name,
                key_type = %left_type.tag(),
                literal_type = %literal.supported_key_type(),
                "cannot compare a blackboard key against a literal of another type"
            );
            return false;
        }

        if self.operator.is_equality() {
            let is_match = literal.compare(Some(store), &self.key_left.key_name) == BlackboardCompare::Equal;
            return is_match == (self.operator == CompareOperator::Equal);
        }

        let Some((right_int, right_float)) = literal.try_arithmetic_values() else {
            error!(literal_type = %literal.supported_key_type(), "literal does not support arithmetic comparison");
            return false;
        };
        store.test_arithmetic(left_id, self.operator.into(), right_int, right_float)
    }

    fn compare_keys(&self, store: &Blackboard, left_id: KeyId, left_type: &KeyType, right_id: KeyId) -> bool {
        if self.operator.is_equality() {
            let is_match = store.compare_key_values(left_type.tag(), left_id, right_id) == BlackboardCompare::Equal;
            return is_match == (self.operator == CompareOperator::Equal);
        }

        if !left_type.supports_arithmetic() {
            error!(
                key = %self.key_left.key_name,
                key_type = %left_type.tag(),
                "blackboard key type does not support arithmetic comparison"
            );
            return false;
        }
        let Some((right_int, right_float)) = store.value(right_id).and_then(arithmetic_operands) else {
            return false;
        };
        store.test_arithmetic(left_id, self.operator.into(), right_int, right_float)
    }

    // ── Editing ───────────────────────────────────────────────────────────

    /// Bring the operator and the right-hand side in line with the left
    /// key's type in `schema`.  Returns `true` if anything changed.
    ///
    /// * an ordering operator on a key that does not support arithmetic is
    ///   reset to `==`;
    /// * the right key is restricted to the left key's type (its name is
    ///   cleared when the restriction changes);
    /// * the literal is created or reconfigured for the left key's type.
    ///
    /// With no left key both right-hand sides are cleared.
    pub fn refresh_for_schema(&mut self, schema: &BlackboardSchema, registry: &TypeRegistry) -> bool {
        let left_type = self.key_info(schema, &self.key_left).map(|(_, t)| t.clone());
        let mut changed = false;

        if let Some(left_type) = &left_type {
            if self.operator.is_arithmetic() && !left_type.supports_arithmetic() {
                self.operator = CompareOperator::Equal;
                changed = true;
            }
        }

        match left_type.as_ref().filter(|_| !self.use_explicit_value) {
            Some(left_type) => {
                let stale = self
                    .key_right
                    .allowed_types
                    .first()
                    .is_none_or(|filter| !left_type.is_allowed_by_filter(filter, registry));
                if stale {
                    self.key_right = EntryKey::with_type(Name::NONE, left_type.clone());
                    changed = true;
                }
            }
            None => {
                if !self.key_right.allowed_types.is_empty() {
                    self.key_right = EntryKey::default();
                    changed = true;
                }
            }
        }

        match left_type.as_ref().filter(|_| self.use_explicit_value) {
            Some(left_type) => {
                let stale = self
                    .explicit_right
                    .as_ref()
                    .is_none_or(|e| e.supported_key_type() != left_type.tag());
                if stale {
                    self.explicit_right = Some(EntryValue::for_key_type(Name::NONE, left_type).without_key());
                    changed = true;
                }
                if let Some(literal) = &mut self.explicit_right {
                    literal.key_visibility = KeyVisibility::NotVisible;
                    changed |= literal.try_reconfigure_from_key_type(left_type, registry);
                }
            }
            None => {
                changed |= self.explicit_right.take().is_some();
            }
        }
        changed
    }

    /// Adaptive title, e.g. `Health < "25"` or `Target == LastTarget`.
    pub fn title(&self, registry: &TypeRegistry) -> String {
        if self.key_left.is_none() {
            return "Compare Blackboard Value".to_owned();
        }
        let rhs = if self.use_explicit_value {
            let value = self
                .explicit_right
                .as_ref()
                .map(|e| e.editor_value_string(registry))
                .unwrap_or_else(|| "<unknown>".to_owned());
            format!("\"{value}\"")
        } else {
            self.key_right.key_name.to_string()
        };
        format!("{} {} {}", self.key_left.key_name, self.operator, rhs)
    }
}

/// Numeric operands of a live value: `(int, float)`.
fn arithmetic_operands(value: &Value) -> Option<(i32, f32)> {
    match value {
        Value::Int(v) => Some((*v, *v as f32)),
        Value::Float(v) => Some((v.floor() as i32, *v)),
        Value::Enum(v) => Some((i32::from(*v), f32::from(*v))),
        _ => None,
    }
}

impl FlowPredicate for CompareBlackboardValue {
    fn evaluate_predicate(&self, ctx: &FlowContext<'_>) -> bool {
        let Some(store) = self.resolve_store(ctx).and_then(|s| ctx.world.store(s)) else {
            error!(asset = %ctx.asset.name(), "cannot evaluate a blackboard comparison without a blackboard");
            return false;
        };
        self.evaluate_on_store(store)
    }
}

impl FlowNodeAddOn for CompareBlackboardValue {
    fn node_config_text(&self, registry: &TypeRegistry) -> String {
        self.title(registry)
    }
}
