//! `GetBlackboardValues` — expose store values as output data pins.
//!
//! The store is found on the actor of the `SpecificActor` pin, or on the
//! flow owner when that pin is not connected.  This node never injects.

use std::sync::Arc;

use af_blackboard::BlackboardSchema;
use af_core::{ActorId, Name, StoreId};
use af_entry::{PinMap, PinProperty, pin_property_from_store};
use af_world::{SearchRule, try_find_store};
use tracing::error;

use crate::context::FlowContext;
use crate::node::FlowNode;
use crate::signal::Signal;

pub const SPECIFIC_ACTOR_PIN: &str = "SpecificActor";

#[derive(Clone, Debug, Default)]
pub struct GetBlackboardValues {
    /// Keys offered as output pins, named after the key.
    pub keys:            Vec<Name>,
    /// Any store when unset.
    pub specific_schema: Option<Arc<BlackboardSchema>>,
    pub search_rule:     SearchRule,
}

impl GetBlackboardValues {
    pub fn new(keys: impl IntoIterator<Item = impl Into<Name>>) -> Self {
        Self { keys: keys.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    fn resolve_actor(&self, ctx: &FlowContext<'_>) -> Option<ActorId> {
        match ctx.resolve_actor(&Name::from(SPECIFIC_ACTOR_PIN)) {
            Ok(Some(actor)) => Some(actor),
            Ok(None) => {
                error!("specific actor could not be resolved to an actor");
                None
            }
            Err(_) => ctx.owner(),
        }
    }

    pub fn resolve_store(&self, ctx: &FlowContext<'_>) -> Option<StoreId> {
        let actor = self.resolve_actor(ctx)?;
        try_find_store(&*ctx.world, actor, self.specific_schema.as_deref(), self.search_rule)
    }

    /// Output property for `pin`, read from the resolved store.
    pub fn supply_pin(&self, ctx: &FlowContext<'_>, pin: &Name) -> Option<PinProperty> {
        if *pin == SPECIFIC_ACTOR_PIN || !self.keys.contains(pin) {
            return None;
        }
        let store = self.resolve_store(ctx).and_then(|s| ctx.world.store(s))?;
        let Some(key_type) = store.key_id(pin).and_then(|k| store.key_type(k)) else {
            error!(key = %pin, schema = %store.schema().name(), "blackboard has no key for this pin");
            return None;
        };
        let property = pin_property_from_store(pin, key_type, Some(store));
        if property.is_none() {
            error!(key = %pin, schema = %store.schema().name(), "could not get a value for this pin");
        }
        property
    }

    /// Every output pin's current value.
    pub fn outputs(&self, ctx: &FlowContext<'_>) -> PinMap {
        let mut pins = PinMap::new();
        for key in &self.keys {
            if let Some(property) = self.supply_pin(ctx, key) {
                pins.insert(key.clone(), property.value);
            }
        }
        pins
    }
}

impl FlowNode for GetBlackboardValues {
    fn input_pins(&self) -> Vec<Name> {
        Vec::new()
    }

    fn output_pins(&self) -> Vec<Name> {
        self.keys.clone()
    }

    /// Pure data node: values are pulled through [`supply_pin`](Self::supply_pin).
    fn execute_input(&mut self, _ctx: &mut FlowContext<'_>, _pin: &Name) -> Vec<Signal> {
        Vec::new()
    }
}
