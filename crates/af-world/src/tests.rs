//! Unit tests for af-world.

use std::sync::Arc;

use af_blackboard::{BlackboardSchema, KeyType, SchemaBuilder, TypeRegistry, builtin};
use af_core::{ClassId, SchemaId};

use crate::{World, WorldBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Fixture {
    world:    World,
    schema_a: Arc<BlackboardSchema>,
    schema_b: Arc<BlackboardSchema>,
    bb_class: ClassId,
}

fn fixture() -> Fixture {
    let mut registry = TypeRegistry::new();
    let bb_class = registry.add_class("AIBlackboardComponent", builtin::BLACKBOARD_COMPONENT, false);
    let schema_a = SchemaBuilder::new(SchemaId(0), "BB_Patrol").key("Waypoint", KeyType::Int).build().unwrap();
    let schema_b = SchemaBuilder::new(SchemaId(1), "BB_Combat").key("Ammo", KeyType::Int).build().unwrap();
    let world = WorldBuilder::new("Arena").registry(registry).with_game_state("GameState").build().unwrap();
    Fixture { world, schema_a, schema_b, bb_class }
}

// ── World ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world {
    use af_blackboard::builtin;

    use crate::{ActorKind, WorldBuilder, WorldError};

    #[test]
    fn spawn_and_possess() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let ctrl = f.world.spawn_actor(ActorKind::Controller, "GruntAI").unwrap();
        f.world.possess(ctrl, pawn).unwrap();
        assert_eq!(f.world.controller_of(pawn), Some(ctrl));
        assert_eq!(f.world.pawn_of(ctrl), Some(pawn));

        let obj = f.world.actor_object(pawn).unwrap();
        assert_eq!(f.world.actor_for_object(obj), Some(pawn));
        assert!(f.world.registry().is_a(obj, builtin::ACTOR));
    }

    #[test]
    fn possess_rejects_wrong_kinds() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        let b = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        assert!(matches!(f.world.possess(a, b), Err(WorldError::NotAController(_))));
    }

    #[test]
    fn single_game_state() {
        let mut f = super::fixture();
        assert!(matches!(
            f.world.spawn_actor(ActorKind::GameState, "Another"),
            Err(WorldError::GameStateExists(_))
        ));
    }

    #[test]
    fn kinds_map_to_builtin_classes() {
        assert_eq!(ActorKind::Pawn.base_class(), builtin::PAWN);
        assert_eq!(ActorKind::GameState.base_class(), builtin::GAME_STATE);
    }

    #[test]
    fn class_must_match_kind() {
        let mut f = super::fixture();
        assert!(f.world.spawn_actor_of_class(ActorKind::Pawn, "Oops", builtin::CONTROLLER).is_err());
    }

    #[test]
    fn store_must_use_blackboard_class() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        assert!(f.world.add_store(a, builtin::ACTOR, "Comp", f.schema_a.clone()).is_err());
        assert!(f.world.add_store(a, f.bb_class, "Comp", f.schema_a.clone()).is_ok());
    }

    #[test]
    fn destroy_removes_stores_and_links() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let ctrl = f.world.spawn_actor(ActorKind::Controller, "GruntAI").unwrap();
        f.world.possess(ctrl, pawn).unwrap();
        let store = f.world.add_store(pawn, f.bb_class, "Comp", f.schema_a.clone()).unwrap();

        assert!(f.world.destroy_actor(pawn));
        assert!(f.world.store(store).is_none());
        assert_eq!(f.world.pawn_of(ctrl), None);
        assert!(f.world.stores_on(pawn).is_empty());
        assert!(!f.world.destroy_actor(pawn));
    }

    #[test]
    fn destroyed_actor_leaves_the_live_set() {
        let mut world = WorldBuilder::new("Arena").with_game_state("GameState").build().unwrap();
        let a = world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let object = world.actor_object(a).unwrap();
        assert_eq!(world.actor_for_object(object), Some(a));
        assert_eq!(world.actors().ids().count(), 2);

        world.destroy_actor(a);
        assert_eq!(world.actor_for_object(object), None);
        assert_eq!(world.actors().ids().collect::<Vec<_>>(), vec![world.game_state().unwrap()]);
    }
}

// ── Inject manager ────────────────────────────────────────────────────────────

#[cfg(test)]
mod inject {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{ActorKind, InjectComponentsManager};

    #[test]
    fn destroy_runs_callbacks_before_removal() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();

        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(&mut f.world);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.on_before_removed(move |actor| sink.borrow_mut().push(actor));

        let store = manager.inject_store(&mut f.world, pawn, f.bb_class, "Injected", f.schema_a.clone()).unwrap();
        assert_eq!(manager.injected_on(pawn), vec![store]);

        f.world.destroy_actor(pawn);
        assert_eq!(*seen.borrow(), vec![pawn]);
        assert!(f.world.store(store).is_none());
        assert_eq!(manager.injected_count(), 0);

        manager.shutdown_runtime(&mut f.world);
        assert_eq!(f.world.listener_count(), 0);
    }

    #[test]
    fn shutdown_removes_injected_stores() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(&mut f.world);
        manager.initialize_runtime(&mut f.world);
        assert_eq!(f.world.listener_count(), 1);

        let store = manager.inject_store(&mut f.world, a, f.bb_class, "Injected", f.schema_a.clone()).unwrap();
        manager.shutdown_runtime(&mut f.world);
        assert!(!manager.is_subscribed());
        assert!(f.world.store(store).is_none());
        assert!(f.world.is_alive(a));
    }

    #[test]
    fn untracked_actor_callbacks_do_not_run() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(&mut f.world);
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        manager.on_before_removed(move |_| *sink.borrow_mut() += 1);
        f.world.destroy_actor(a);
        assert_eq!(*hits.borrow(), 0);
        manager.shutdown_runtime(&mut f.world);
    }
}

// ── Resolver ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resolver {
    use crate::{
        ActorKind, InjectComponentsManager, InjectRule, SearchRule, StoreQuery, find_or_add_store_on_actor,
        find_or_add_stores_on_actors, try_find_store_on_actor,
    };

    #[test]
    fn rule_classification() {
        use SearchRule::*;
        let actor: Vec<_> = [ActorOnly, ActorAndController, ActorAndGameState, ActorAndControllerAndGameState].into();
        for rule in [ActorOnly, ControllerOnly, ActorAndController, GameStateOnly, ActorAndGameState, ControllerAndGameState, ActorAndControllerAndGameState] {
            assert_eq!(rule.can_search_actor(), actor.contains(&rule), "{rule:?}");
        }
        assert!(ControllerAndGameState.can_search_controller());
        assert!(!ActorAndGameState.can_search_controller());
        assert!(GameStateOnly.can_search_game_state());
        assert!(!ActorAndController.can_search_game_state());

        assert!(InjectRule::InjectOntoActorIfMissing.needs_inject_manager());
        assert!(InjectRule::InjectOntoControllerIfMissing.needs_inject_manager());
        assert!(!InjectRule::DoNotInjectIfMissing.needs_inject_manager());
    }

    #[test]
    fn picks_store_by_schema() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let sa = f.world.add_store(a, f.bb_class, "A", f.schema_a.clone()).unwrap();
        let sb = f.world.add_store(a, f.bb_class, "B", f.schema_b.clone()).unwrap();

        let query = StoreQuery::new(Some(f.schema_b.clone())).search(SearchRule::ActorOnly);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, a, &query, None), Some(sb));
        assert_eq!(try_find_store_on_actor(&f.world, a, Some(f.schema_a.as_ref())), Some(sa));
        // Ambiguous without a schema: first attached.
        assert_eq!(try_find_store_on_actor(&f.world, a, None), Some(sa));
    }

    #[test]
    fn same_asset_matches_reloaded_schema() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        let sa = f.world.add_store(a, f.bb_class, "A", f.schema_a.clone()).unwrap();
        let reloaded = af_blackboard::SchemaBuilder::new(af_core::SchemaId(40), "BB_Patrol")
            .key("Waypoint", af_blackboard::KeyType::Int)
            .build()
            .unwrap();
        assert_eq!(try_find_store_on_actor(&f.world, a, Some(reloaded.as_ref())), Some(sa));
    }

    #[test]
    fn falls_through_to_game_state() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let ctrl = f.world.spawn_actor(ActorKind::Controller, "GruntAI").unwrap();
        f.world.possess(ctrl, pawn).unwrap();
        let gs = f.world.game_state().unwrap();
        let global = f.world.add_store(gs, f.bb_class, "Global", f.schema_a.clone()).unwrap();

        let query = StoreQuery::new(Some(f.schema_a.clone())).search(SearchRule::ActorAndControllerAndGameState);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, pawn, &query, None), Some(global));

        let actor_only = StoreQuery::new(Some(f.schema_a.clone())).search(SearchRule::ActorOnly);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, pawn, &actor_only, None), None);
    }

    #[test]
    fn controller_store_found_for_pawn() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let ctrl = f.world.spawn_actor(ActorKind::Controller, "GruntAI").unwrap();
        f.world.possess(ctrl, pawn).unwrap();
        let on_ctrl = f.world.add_store(ctrl, f.bb_class, "Brain", f.schema_a.clone()).unwrap();

        let query = StoreQuery::new(Some(f.schema_a.clone())).search(SearchRule::ActorAndController);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, pawn, &query, None), Some(on_ctrl));
    }

    #[test]
    fn injects_onto_controller() {
        let mut f = super::fixture();
        let pawn = f.world.spawn_actor(ActorKind::Pawn, "Grunt").unwrap();
        let ctrl = f.world.spawn_actor(ActorKind::Controller, "GruntAI").unwrap();
        f.world.possess(ctrl, pawn).unwrap();

        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(&mut f.world);
        let query = StoreQuery::new(Some(f.schema_b.clone()))
            .component_class(f.bb_class)
            .search(SearchRule::ActorAndController)
            .inject(InjectRule::InjectOntoControllerIfMissing);

        let store = find_or_add_store_on_actor(&mut f.world, pawn, &query, Some(&mut manager)).unwrap();
        assert_eq!(f.world.store_owner(store), Some(ctrl));
        // Second call finds the injected store instead of creating another.
        assert_eq!(find_or_add_store_on_actor(&mut f.world, pawn, &query, Some(&mut manager)), Some(store));
        assert_eq!(manager.injected_count(), 1);
        manager.shutdown_runtime(&mut f.world);
    }

    #[test]
    fn injection_preconditions() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "Crate").unwrap();
        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(&mut f.world);

        let no_class = StoreQuery::new(Some(f.schema_a.clone())).inject(InjectRule::InjectOntoActorIfMissing);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, a, &no_class, Some(&mut manager)), None);

        let no_schema = StoreQuery::new(None).component_class(f.bb_class).inject(InjectRule::InjectOntoActorIfMissing);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, a, &no_schema, Some(&mut manager)), None);

        let full = StoreQuery::new(Some(f.schema_a.clone()))
            .component_class(f.bb_class)
            .inject(InjectRule::InjectOntoActorIfMissing);
        assert_eq!(find_or_add_store_on_actor(&mut f.world, a, &full, None), None);
        assert!(find_or_add_store_on_actor(&mut f.world, a, &full, Some(&mut manager)).is_some());
        manager.shutdown_runtime(&mut f.world);
    }

    #[test]
    fn batch_skips_missing_actors() {
        let mut f = super::fixture();
        let a = f.world.spawn_actor(ActorKind::Plain, "A").unwrap();
        let b = f.world.spawn_actor(ActorKind::Plain, "B").unwrap();
        let dead = f.world.spawn_actor(ActorKind::Plain, "Dead").unwrap();
        f.world.destroy_actor(dead);
        let sa = f.world.add_store(a, f.bb_class, "A", f.schema_a.clone()).unwrap();
        let sb = f.world.add_store(b, f.bb_class, "B", f.schema_a.clone()).unwrap();

        let query = StoreQuery::new(Some(f.schema_a.clone()));
        let stores = find_or_add_stores_on_actors(&mut f.world, &[Some(a), None, Some(dead), Some(b)], &query, None);
        assert_eq!(stores, vec![sa, sb]);
    }
}
