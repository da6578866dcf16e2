//! Actor/blackboard resolution: find the store an actor's logic should use,
//! optionally creating it.
//!
//! # Search order
//!
//! Hosts are searched actor first, then the actor's controller (only when the
//! actor is a pawn), then the world's game state.  A [`SearchRule`] selects
//! which of the three are eligible.  The first store whose schema is the
//! same asset as the desired schema wins.
//!
//! # Injection
//!
//! When nothing is found, an [`InjectRule`] may create the store on the
//! actor or on its controller.  Injection needs a schema, a component class
//! deriving from `BlackboardComponent`, and an [`InjectComponentsManager`]
//! to track the new store.

use std::sync::Arc;

use af_blackboard::{BlackboardSchema, builtin};
use af_core::{ActorId, ClassId, StoreId};
use tracing::{error, trace, warn};

use crate::inject::InjectComponentsManager;
use crate::world::World;

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Which hosts a search may look at.  The discriminant is a bitset of
/// actor (1), controller (2), and game state (4).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SearchRule {
    #[default]
    ActorOnly                      = 1,
    ControllerOnly                 = 2,
    ActorAndController             = 3,
    GameStateOnly                  = 4,
    ActorAndGameState              = 5,
    ControllerAndGameState         = 6,
    ActorAndControllerAndGameState = 7,
}

impl SearchRule {
    const ACTOR: u8 = 1;
    const CONTROLLER: u8 = 2;
    const GAME_STATE: u8 = 4;

    #[inline]
    pub fn can_search_actor(self) -> bool {
        self as u8 & Self::ACTOR != 0
    }

    #[inline]
    pub fn can_search_controller(self) -> bool {
        self as u8 & Self::CONTROLLER != 0
    }

    #[inline]
    pub fn can_search_game_state(self) -> bool {
        self as u8 & Self::GAME_STATE != 0
    }
}

/// Whether, and where, a missing store is created.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InjectRule {
    InjectOntoActorIfMissing,
    InjectOntoControllerIfMissing,
    #[default]
    DoNotInjectIfMissing,
}

impl InjectRule {
    /// `true` for the rules that create stores, which need a manager.
    #[inline]
    pub fn needs_inject_manager(self) -> bool {
        self < InjectRule::DoNotInjectIfMissing
    }
}

// ── Query ─────────────────────────────────────────────────────────────────────

/// What to look for and what to do when it is missing.
#[derive(Clone, Debug, Default)]
pub struct StoreQuery {
    /// `None` accepts any store.
    pub schema:          Option<Arc<BlackboardSchema>>,
    /// Component class for injected stores.
    pub component_class: Option<ClassId>,
    pub search_rule:     SearchRule,
    pub inject_rule:     InjectRule,
}

impl StoreQuery {
    pub fn new(schema: Option<Arc<BlackboardSchema>>) -> Self {
        Self { schema, ..Self::default() }
    }

    pub fn component_class(mut self, class: ClassId) -> Self {
        self.component_class = Some(class);
        self
    }

    pub fn search(mut self, rule: SearchRule) -> Self {
        self.search_rule = rule;
        self
    }

    pub fn inject(mut self, rule: InjectRule) -> Self {
        self.inject_rule = rule;
        self
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// The store on `actor` bound to `schema` (by asset identity).
///
/// With no schema the first store is returned; when the actor carries more
/// than one, the choice is arbitrary and an error is logged.
pub fn try_find_store_on_actor(world: &World, actor: ActorId, schema: Option<&BlackboardSchema>) -> Option<StoreId> {
    let stores = world.stores_on(actor);
    match schema {
        Some(schema) => stores
            .iter()
            .copied()
            .find(|s| world.store(*s).is_some_and(|bb| bb.schema().is_same_asset(schema))),
        None => {
            if stores.len() > 1 {
                error!(
                    actor = %world.actor_name(actor),
                    count = stores.len(),
                    "actor has several blackboards and no schema was given to choose between them; using the first"
                );
            }
            stores.first().copied()
        }
    }
}

/// Probe the hosts `rule` allows, in order, without creating anything.
pub fn try_find_store(world: &World, actor: ActorId, schema: Option<&BlackboardSchema>, rule: SearchRule) -> Option<StoreId> {
    if rule.can_search_actor() {
        if let Some(store) = try_find_store_on_actor(world, actor, schema) {
            return Some(store);
        }
    }
    if rule.can_search_controller() && world.is_pawn(actor) {
        if let Some(store) = world.controller_of(actor).and_then(|c| try_find_store_on_actor(world, c, schema)) {
            return Some(store);
        }
    }
    if rule.can_search_game_state() {
        if let Some(store) = world.game_state().and_then(|g| try_find_store_on_actor(world, g, schema)) {
            return Some(store);
        }
    }
    None
}

/// Probe the hosts `query.search_rule` allows, in order, then inject if
/// `query.inject_rule` allows it.
///
/// `manager` is required only for injection.  Returns `None` (logged where
/// it indicates a configuration error) when no store is found or created.
pub fn find_or_add_store_on_actor(
    world: &mut World,
    actor: ActorId,
    query: &StoreQuery,
    manager: Option<&mut InjectComponentsManager>,
) -> Option<StoreId> {
    if !world.is_alive(actor) {
        error!(%actor, "cannot resolve a blackboard for an actor that does not exist");
        return None;
    }

    if let Some(store) = try_find_store(world, actor, query.schema.as_deref(), query.search_rule) {
        return Some(store);
    }
    if !query.inject_rule.needs_inject_manager() {
        trace!(actor = %world.actor_name(actor), "no blackboard found and injection is off");
        return None;
    }
    let controller = if world.is_pawn(actor) { world.controller_of(actor) } else { None };
    inject(world, actor, controller, query, manager)
}

fn inject(
    world: &mut World,
    actor: ActorId,
    controller: Option<ActorId>,
    query: &StoreQuery,
    manager: Option<&mut InjectComponentsManager>,
) -> Option<StoreId> {
    let actor_name = world.actor_name(actor);
    let Some(schema) = query.schema.clone() else {
        error!(actor = %actor_name, "cannot inject a blackboard without a schema");
        return None;
    };
    let Some(class) = query.component_class else {
        error!(actor = %actor_name, schema = %schema.name(), "cannot inject a blackboard without a component class");
        return None;
    };
    if !world.registry().is_child_of(class, builtin::BLACKBOARD_COMPONENT) {
        error!(
            actor = %actor_name,
            class = %world.registry().class_name(class),
            "component class is not a blackboard component"
        );
        return None;
    }
    let Some(manager) = manager else {
        error!(actor = %actor_name, schema = %schema.name(), "cannot inject a blackboard without an inject manager");
        return None;
    };

    let target = match query.inject_rule {
        InjectRule::InjectOntoActorIfMissing => actor,
        InjectRule::InjectOntoControllerIfMissing => match controller {
            Some(c) => c,
            None => {
                warn!(actor = %actor_name, "actor has no controller to inject a blackboard onto");
                return None;
            }
        },
        InjectRule::DoNotInjectIfMissing => return None,
    };
    let name = world.registry().class_name(class);
    manager.inject_store(world, target, class, name, schema)
}

/// [`find_or_add_store_on_actor`] over a list of actors.  `None` entries
/// and actors that do not exist are skipped with an error; the result holds
/// only the stores found or created.
pub fn find_or_add_stores_on_actors(
    world: &mut World,
    actors: &[Option<ActorId>],
    query: &StoreQuery,
    mut manager: Option<&mut InjectComponentsManager>,
) -> Vec<StoreId> {
    let mut stores = Vec::with_capacity(actors.len());
    for (index, actor) in actors.iter().enumerate() {
        let Some(actor) = actor.filter(|a| world.is_alive(*a)) else {
            error!(index, "skipping a missing actor while resolving blackboards");
            continue;
        };
        if let Some(store) = find_or_add_store_on_actor(world, actor, query, manager.as_deref_mut()) {
            stores.push(store);
        }
    }
    stores
}
