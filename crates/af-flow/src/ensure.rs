//! `EnsureActorHasBlackboard` — find or inject a store on an actor.

use std::sync::Arc;

use af_blackboard::BlackboardSchema;
use af_core::{ClassId, Name};
use af_world::{InjectRule, SearchRule, StoreQuery, find_or_add_store_on_actor};
use tracing::error;

use crate::context::FlowContext;
use crate::get_values::SPECIFIC_ACTOR_PIN;
use crate::injection::NodeInjection;
use crate::node::FlowNode;
use crate::signal::Signal;

pub struct EnsureActorHasBlackboard {
    /// The asset's schema when unset.
    pub specific_schema:          Option<Arc<BlackboardSchema>>,
    /// The asset's component class when unset.
    pub specific_component_class: Option<ClassId>,
    pub search_rule:              SearchRule,
    pub inject_rule:              InjectRule,
    injection:                    NodeInjection,
}

impl EnsureActorHasBlackboard {
    pub const SUCCESS: &'static str = "Success";
    pub const FAILED: &'static str = "Failed";

    pub fn new(search_rule: SearchRule, inject_rule: InjectRule) -> Self {
        Self {
            specific_schema: None,
            specific_component_class: None,
            search_rule,
            inject_rule,
            injection: NodeInjection::default(),
        }
    }

    pub fn injection(&self) -> &NodeInjection {
        &self.injection
    }
}

/// Searches the actor only and injects onto it when nothing is found.
impl Default for EnsureActorHasBlackboard {
    fn default() -> Self {
        Self::new(SearchRule::ActorOnly, InjectRule::InjectOntoActorIfMissing)
    }
}

impl FlowNode for EnsureActorHasBlackboard {
    fn output_pins(&self) -> Vec<Name> {
        vec![Name::from(Self::SUCCESS), Name::from(Self::FAILED)]
    }

    fn execute_input(&mut self, ctx: &mut FlowContext<'_>, _pin: &Name) -> Vec<Signal> {
        let actor = match ctx.resolve_actor(&Name::from(SPECIFIC_ACTOR_PIN)) {
            Ok(Some(actor)) => Some(actor),
            _ => ctx.owner(),
        };
        let Some(actor) = actor else {
            error!(asset = %ctx.asset.name(), "cannot ensure a blackboard on a null actor");
            return Vec::new();
        };

        if self.inject_rule.needs_inject_manager() {
            self.injection.ensure(ctx.world);
        }

        let schema = self.specific_schema.clone().or_else(|| ctx.asset.schema().cloned());
        let class = self.specific_component_class.unwrap_or(ctx.asset.component_class());
        let query = StoreQuery::new(schema)
            .component_class(class)
            .search(self.search_rule)
            .inject(self.inject_rule);

        let output = match find_or_add_store_on_actor(ctx.world, actor, &query, self.injection.manager_mut()) {
            Some(_) => Self::SUCCESS,
            None => Self::FAILED,
        };
        vec![Signal::trigger(output, false)]
    }

    fn deinitialize_instance(&mut self, ctx: &mut FlowContext<'_>) {
        self.injection.shutdown(ctx.world);
    }
}
