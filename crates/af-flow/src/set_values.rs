//! `SetBlackboardValues` — write configured entries to the stores of one or
//! more actors.
//!
//! Targets come from the `SpecificActors` object pin when it resolves to at
//! least one actor, plus the actor held by `blackboard_actor_key` on the
//! asset's store when that key is set.  Only when neither source applies is
//! the flow owner the target.  Each target's store is found (or injected, per
//! `inject_rule`) and receives the every-actor entries and then one per-actor
//! option.

use std::sync::Arc;

use af_blackboard::{BlackboardSchema, TypeRegistry};
use af_core::{ActorId, Name, StoreId};
use af_entry::{EntryValue, PinDirection, PinError, PinProperty};
use af_world::{InjectRule, SearchRule, StoreQuery, find_or_add_stores_on_actors};
use tracing::{error, warn};

use crate::allocator::AssignmentMethod;
use crate::context::FlowContext;
use crate::helper::{ActorBlackboardHelper, BlackboardOption, append_blackboard_options};
use crate::injection::NodeInjection;
use crate::node::FlowNode;
use crate::signal::{OUTPUT_PIN, Signal};

pub const SPECIFIC_ACTORS_PIN: &str = "SpecificActors";

#[derive(Default)]
pub struct SetBlackboardValues {
    /// Applied to every target.  Each entry also reads its key's input pin.
    pub entries_for_every_actor: BlackboardOption,
    /// One option per target, chosen by `assignment_method`.
    pub per_actor_options:       Vec<BlackboardOption>,
    pub assignment_method:       AssignmentMethod,
    /// Object key on the asset's store that names a target actor.
    pub blackboard_actor_key:    Name,
    /// Store schema; the asset's schema when unset.
    pub specific_schema:         Option<Arc<BlackboardSchema>>,
    pub search_rule:             SearchRule,
    pub inject_rule:             InjectRule,
    helper:                      ActorBlackboardHelper,
    injection:                   NodeInjection,
}

impl SetBlackboardValues {
    pub fn new(entries_for_every_actor: Vec<EntryValue>) -> Self {
        Self { entries_for_every_actor: BlackboardOption::new(entries_for_every_actor), ..Self::default() }
    }

    pub fn with_per_actor_options(mut self, options: Vec<BlackboardOption>, method: AssignmentMethod) -> Self {
        self.per_actor_options = options;
        self.assignment_method = method;
        self
    }

    pub fn with_actor_key(mut self, key: impl Into<Name>) -> Self {
        self.blackboard_actor_key = key.into();
        self
    }

    pub fn with_rules(mut self, search_rule: SearchRule, inject_rule: InjectRule) -> Self {
        self.search_rule = search_rule;
        self.inject_rule = inject_rule;
        self
    }

    pub fn injection(&self) -> &NodeInjection {
        &self.injection
    }

    /// Input pin property for the every-actor entry bound to `pin`.
    pub fn pin_property(&self, pin: &Name) -> Option<PinProperty> {
        self.entries_for_every_actor
            .entries
            .iter()
            .find(|e| e.key_name() == pin)
            .and_then(|e| e.try_provide_pin_property(PinDirection::Input))
    }

    /// Input pins generated from the every-actor entries.
    pub fn auto_input_pins(&self) -> Vec<(Name, PinProperty)> {
        self.entries_for_every_actor
            .entries
            .iter()
            .filter(|e| !e.key_name().is_none())
            .filter_map(|e| Some((e.key_name().clone(), e.try_provide_pin_property(PinDirection::Input)?)))
            .collect()
    }

    fn refresh_entries_from_pins(&mut self, ctx: &FlowContext<'_>) {
        for entry in &mut self.entries_for_every_actor.entries {
            let pin = entry.key_name().clone();
            if pin.is_none() {
                continue;
            }
            match entry.try_set_from_input_pin(&pin, ctx.pins, ctx.world.registry()) {
                Ok(()) | Err(PinError::UnknownPin(_)) => {}
                Err(err) => warn!(%err, "could not read blackboard entry from its input pin"),
            }
        }
    }

    fn target_actors(&self, ctx: &FlowContext<'_>) -> Vec<ActorId> {
        let mut actors = ctx.resolve_actors(&Name::from(SPECIFIC_ACTORS_PIN)).unwrap_or_default();
        let from_pin = !actors.is_empty();
        let from_key = self.add_keyed_actor(ctx, &mut actors);
        if from_pin || from_key { actors } else { ctx.owner().into_iter().collect() }
    }

    /// Push the actor held by `blackboard_actor_key`.  Returns `true` whenever
    /// the key was read, even if it held no live actor.
    fn add_keyed_actor(&self, ctx: &FlowContext<'_>, actors: &mut Vec<ActorId>) -> bool {
        if self.blackboard_actor_key.is_none() {
            return false;
        }
        let Some(bb) = ctx.asset_store().and_then(|s| ctx.world.store(s)) else {
            return false;
        };
        let actor = bb
            .value_as_object(&self.blackboard_actor_key)
            .and_then(|o| ctx.world.actor_for_object(o))
            .filter(|a| ctx.world.is_alive(*a));
        match actor {
            Some(actor) => actors.push(actor),
            None => warn!(key = %self.blackboard_actor_key, "actor key holds no live actor"),
        }
        true
    }

    fn stores_to_apply_to(&mut self, ctx: &mut FlowContext<'_>) -> Vec<StoreId> {
        let schema = self.specific_schema.clone().or_else(|| ctx.asset.schema().cloned());
        let query = StoreQuery::new(schema)
            .component_class(ctx.asset.component_class())
            .search(self.search_rule)
            .inject(self.inject_rule);
        let actors: Vec<Option<ActorId>> = self.target_actors(ctx).into_iter().map(Some).collect();
        find_or_add_stores_on_actors(ctx.world, &actors, &query, self.injection.manager_mut())
    }
}

impl FlowNode for SetBlackboardValues {
    fn execute_input(&mut self, ctx: &mut FlowContext<'_>, _pin: &Name) -> Vec<Signal> {
        self.refresh_entries_from_pins(ctx);

        if self.inject_rule.needs_inject_manager() {
            self.injection.ensure(ctx.world);
        }

        let stores = self.stores_to_apply_to(ctx);
        if stores.is_empty() {
            error!(asset = %ctx.asset.name(), "cannot set blackboard values without a blackboard");
        }
        for store in stores {
            let Some(bb) = ctx.world.store_mut(store) else {
                continue;
            };
            self.helper.apply_options_to_store(
                bb,
                self.assignment_method,
                &self.entries_for_every_actor,
                &self.per_actor_options,
                ctx.ambient,
            );
        }

        vec![Signal::trigger(OUTPUT_PIN, true)]
    }

    fn deinitialize_instance(&mut self, ctx: &mut FlowContext<'_>) {
        self.injection.shutdown(ctx.world);
    }

    fn node_config_text(&self, registry: &TypeRegistry) -> String {
        let mut lines = Vec::new();
        if !self.blackboard_actor_key.is_none() {
            lines.push(format!("Actor Key: {}", self.blackboard_actor_key));
        }
        lines.extend(self.entries_for_every_actor.entries.iter().map(|e| e.node_config_text(registry)));
        append_blackboard_options(&mut lines, &self.per_actor_options, registry);
        lines.join("\n")
    }
}
