//! Add-ons that configure blackboards on behalf of their parent node.

use std::sync::Arc;

use af_blackboard::{BlackboardSchema, TypeRegistry};
use af_core::{ActorId, ClassId, Name};
use af_entry::EntryValue;
use af_world::{InjectRule, SearchRule, StoreQuery, find_or_add_store_on_actor};
use tracing::{debug, error, warn};

use crate::allocator::AssignmentMethod;
use crate::context::FlowContext;
use crate::helper::{ActorBlackboardHelper, BlackboardOption, append_blackboard_options};
use crate::injection::NodeInjection;
use crate::node::FlowNodeAddOn;

// ── ConfigureSpawnedActorBlackboard ───────────────────────────────────────────

/// Configures the store of every actor its parent spawns: the every-actor
/// entries, then one per-actor option.
#[derive(Default)]
pub struct ConfigureSpawnedActorBlackboard {
    /// Schema of the spawned actors' store; the asset's schema when unset.
    pub expected_schema:         Option<Arc<BlackboardSchema>>,
    pub search_rule:             SearchRule,
    pub inject_rule:             InjectRule,
    pub entries_for_every_actor: BlackboardOption,
    pub per_actor_options:       Vec<BlackboardOption>,
    pub assignment_method:       AssignmentMethod,
    helper:                      ActorBlackboardHelper,
    injection:                   NodeInjection,
}

impl ConfigureSpawnedActorBlackboard {
    pub fn new(entries_for_every_actor: Vec<EntryValue>, per_actor_options: Vec<BlackboardOption>) -> Self {
        Self {
            entries_for_every_actor: BlackboardOption::new(entries_for_every_actor),
            per_actor_options,
            ..Self::default()
        }
    }

    pub fn injection(&self) -> &NodeInjection {
        &self.injection
    }
}

impl FlowNodeAddOn for ConfigureSpawnedActorBlackboard {
    fn deinitialize_instance(&mut self, ctx: &mut FlowContext<'_>) {
        self.injection.shutdown(ctx.world);
    }

    fn finished_spawning_actor(&mut self, ctx: &mut FlowContext<'_>, actor: ActorId) {
        if !ctx.world.is_alive(actor) {
            warn!(%actor, "spawned actor is gone before its blackboard could be configured");
            return;
        }
        if self.inject_rule.needs_inject_manager() {
            self.injection.ensure(ctx.world);
        }

        let schema = self.expected_schema.clone().or_else(|| ctx.asset.schema().cloned());
        let query = StoreQuery::new(schema)
            .component_class(ctx.asset.component_class())
            .search(self.search_rule)
            .inject(self.inject_rule);
        let Some(store) = find_or_add_store_on_actor(ctx.world, actor, &query, self.injection.manager_mut()) else {
            return;
        };
        let Some(bb) = ctx.world.store_mut(store) else {
            return;
        };
        self.helper.apply_options_to_store(
            bb,
            self.assignment_method,
            &self.entries_for_every_actor,
            &self.per_actor_options,
            ctx.ambient,
        );
    }

    fn node_config_text(&self, registry: &TypeRegistry) -> String {
        let mut lines: Vec<String> =
            self.entries_for_every_actor.entries.iter().map(|e| e.node_config_text(registry)).collect();
        append_blackboard_options(&mut lines, &self.per_actor_options, registry);
        lines.join("\n")
    }
}

// ── SetBlackboardValuesAddOn ──────────────────────────────────────────────────

/// Writes its entries to the asset's store every time the parent executes.
#[derive(Clone, Debug, Default)]
pub struct SetBlackboardValuesAddOn {
    pub entries: Vec<EntryValue>,
}

impl SetBlackboardValuesAddOn {
    pub fn new(entries: Vec<EntryValue>) -> Self {
        Self { entries }
    }
}

impl FlowNodeAddOn for SetBlackboardValuesAddOn {
    fn on_parent_execute(&mut self, ctx: &mut FlowContext<'_>, _pin: &Name) {
        let Some(bb) = ctx.asset_store().and_then(|s| ctx.world.store_mut(s)) else {
            error!(asset = %ctx.asset.name(), "cannot set blackboard values without a blackboard");
            return;
        };
        for entry in &self.entries {
            entry.write(Some(&mut *bb));
        }
    }

    fn node_config_text(&self, registry: &TypeRegistry) -> String {
        self.entries.iter().map(|e| e.node_config_text(registry)).collect::<Vec<_>>().join("\n")
    }
}

// ── InjectComponents ──────────────────────────────────────────────────────────

/// A store [`InjectComponents`] attaches to each spawned actor.
#[derive(Clone, Debug)]
pub struct ComponentTemplate {
    /// Component class, a subclass of `BlackboardComponent`.
    pub class:  ClassId,
    /// The asset's schema when unset.
    pub schema: Option<Arc<BlackboardSchema>>,
}

impl ComponentTemplate {
    pub fn new(class: ClassId) -> Self {
        Self { class, schema: None }
    }

    pub fn with_schema(mut self, schema: Arc<BlackboardSchema>) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Injects one store per template onto every actor its parent spawns.
///
/// Injected stores are named after their component class.  They are
/// detached when their actor is destroyed or the add-on is deinitialized.
#[derive(Default)]
pub struct InjectComponents {
    pub templates: Vec<ComponentTemplate>,
    injection:     NodeInjection,
}

impl InjectComponents {
    pub fn new(templates: Vec<ComponentTemplate>) -> Self {
        Self { templates, injection: NodeInjection::default() }
    }

    pub fn injection(&self) -> &NodeInjection {
        &self.injection
    }
}

impl FlowNodeAddOn for InjectComponents {
    fn deinitialize_instance(&mut self, ctx: &mut FlowContext<'_>) {
        self.injection.shutdown(ctx.world);
    }

    fn finished_spawning_actor(&mut self, ctx: &mut FlowContext<'_>, actor: ActorId) {
        // Failed spawns are reported too.
        if !ctx.world.is_alive(actor) || self.templates.is_empty() {
            return;
        }
        self.injection.ensure(ctx.world);
        let Some(manager) = self.injection.manager_mut() else {
            return;
        };

        let mut injected = 0usize;
        for template in &self.templates {
            let name = ctx.world.registry().class_name(template.class);
            let Some(schema) = template.schema.clone().or_else(|| ctx.asset.schema().cloned()) else {
                warn!(class = %name, "no schema for injected component");
                continue;
            };
            if manager.inject_store(ctx.world, actor, template.class, name, schema).is_some() {
                injected += 1;
            }
        }
        debug!(actor = %ctx.world.actor_name(actor), injected, "injected components on spawned actor");
    }

    fn node_config_text(&self, registry: &TypeRegistry) -> String {
        self.templates.iter().map(|t| registry.class_name(t.class).to_string()).collect::<Vec<_>>().join("\n")
    }
}
