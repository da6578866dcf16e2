//! `World` — the host that owns actors, their stores, and the type registry.
//!
//! # Removal notification
//!
//! Code that must react to an actor going away (the inject manager) registers
//! an [`ActorRemovalListener`].  [`World::destroy_actor`] calls every
//! listener with `&mut World` *before* the actor's stores are detached, so a
//! listener can still read them.  The listener list is snapshotted first, so
//! a listener may subscribe or unsubscribe from inside the callback.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use af_blackboard::{Blackboard, BlackboardSchema, TypeRegistry, builtin};
use af_core::{ActorId, AfError, ClassId, Name, ObjectId, StoreId};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::actors::{ActorKind, Actors};
use crate::error::{WorldError, WorldResult};

// ── Listeners ─────────────────────────────────────────────────────────────────

/// Observer of actor destruction.
pub trait ActorRemovalListener {
    fn on_before_actor_removed(&mut self, world: &mut World, actor: ActorId);
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub u32);

// ── Stores ────────────────────────────────────────────────────────────────────

/// A store attached to a host actor.
#[derive(Debug)]
pub struct HostedStore {
    pub owner:      ActorId,
    /// Component class, a subclass of `BlackboardComponent`.
    pub class:      ClassId,
    pub name:       Name,
    pub blackboard: Blackboard,
}

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    name:       Name,
    registry:   TypeRegistry,
    actors:     Actors,

    /// Slot per store ever attached; `None` once removed.
    stores:     Vec<Option<HostedStore>>,
    game_state: Option<ActorId>,
    by_object:  FxHashMap<ObjectId, ActorId>,

    listeners:     Vec<(ListenerId, Rc<RefCell<dyn ActorRemovalListener>>)>,
    next_listener: u32,
}

impl World {
    pub(crate) fn new(name: Name, registry: TypeRegistry) -> Self {
        Self {
            name,
            registry,
            actors: Actors::default(),
            stores: Vec::new(),
            game_state: None,
            by_object: FxHashMap::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn actors(&self) -> &Actors {
        &self.actors
    }

    // ── Actors ────────────────────────────────────────────────────────────

    /// Spawn an actor of `kind` with the kind's built-in class.
    pub fn spawn_actor(&mut self, kind: ActorKind, name: impl Into<Name>) -> WorldResult<ActorId> {
        self.spawn_actor_of_class(kind, name, kind.base_class())
    }

    /// Spawn an actor of `kind` whose class is `class` (which must derive
    /// from the kind's built-in class).
    pub fn spawn_actor_of_class(&mut self, kind: ActorKind, name: impl Into<Name>, class: ClassId) -> WorldResult<ActorId> {
        let base = kind.base_class();
        if !self.registry.is_child_of(class, base) {
            return Err(WorldError::WrongActorClass {
                class: self.registry.class_name(class),
                base:  self.registry.class_name(base),
            });
        }
        if kind == ActorKind::GameState {
            if let Some(existing) = self.game_state {
                return Err(WorldError::GameStateExists(existing));
            }
        }

        let name = name.into();
        let object = self.registry.add_object(name.clone(), class, format!("/Game/Maps/{}", self.name));
        let actor = self.actors.push(kind, name, class, object);
        self.by_object.insert(object, actor);
        if kind == ActorKind::GameState {
            self.game_state = Some(actor);
        }
        debug!(%actor, name = %self.actors.name[actor.index()], ?kind, "spawned actor");
        Ok(actor)
    }

    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.actors.is_alive(actor)
    }

    pub fn kind(&self, actor: ActorId) -> Option<ActorKind> {
        self.is_alive(actor).then(|| self.actors.kind[actor.index()])
    }

    /// `true` if `actor` is a live pawn.
    pub fn is_pawn(&self, actor: ActorId) -> bool {
        self.kind(actor) == Some(ActorKind::Pawn)
    }

    pub fn is_controller(&self, actor: ActorId) -> bool {
        self.kind(actor) == Some(ActorKind::Controller)
    }

    /// Display name, `None` for unknown ids.
    pub fn actor_name(&self, actor: ActorId) -> Name {
        self.actors.name.get(actor.index()).cloned().unwrap_or_default()
    }

    pub fn actor_class(&self, actor: ActorId) -> Option<ClassId> {
        self.is_alive(actor).then(|| self.actors.class[actor.index()])
    }

    /// Registry handle of a live actor.
    pub fn actor_object(&self, actor: ActorId) -> Option<ObjectId> {
        self.is_alive(actor).then(|| self.actors.object[actor.index()])
    }

    /// The live actor known to the registry as `object`.
    pub fn actor_for_object(&self, object: ObjectId) -> Option<ActorId> {
        self.by_object.get(&object).copied().filter(|a| self.is_alive(*a))
    }

    pub fn game_state(&self) -> Option<ActorId> {
        self.game_state.filter(|a| self.is_alive(*a))
    }

    /// Let `controller` possess `pawn`, releasing any previous pairing on
    /// either side.
    pub fn possess(&mut self, controller: ActorId, pawn: ActorId) -> WorldResult<()> {
        if !self.is_controller(controller) {
            return Err(self.not_alive_or(controller, WorldError::NotAController(controller)));
        }
        if !self.is_pawn(pawn) {
            return Err(self.not_alive_or(pawn, WorldError::NotAPawn(pawn)));
        }
        self.unpossess(controller);
        if let Some(previous) = self.actors.controller[pawn.index()] {
            self.unpossess(previous);
        }
        self.actors.pawn[controller.index()] = Some(pawn);
        self.actors.controller[pawn.index()] = Some(controller);
        Ok(())
    }

    /// Release whatever `controller` possesses.
    pub fn unpossess(&mut self, controller: ActorId) {
        let Some(pawn) = self.actors.pawn.get_mut(controller.index()).and_then(Option::take) else {
            return;
        };
        self.actors.controller[pawn.index()] = None;
    }

    /// Controller possessing `pawn`.
    pub fn controller_of(&self, pawn: ActorId) -> Option<ActorId> {
        if !self.is_alive(pawn) {
            return None;
        }
        self.actors.controller[pawn.index()].filter(|c| self.is_alive(*c))
    }

    /// Pawn possessed by `controller`.
    pub fn pawn_of(&self, controller: ActorId) -> Option<ActorId> {
        if !self.is_alive(controller) {
            return None;
        }
        self.actors.pawn[controller.index()].filter(|p| self.is_alive(*p))
    }

    /// Destroy `actor`: notify removal listeners, then detach its remaining
    /// stores and break possession links.
    ///
    /// Returns `false` if the actor was not alive.
    pub fn destroy_actor(&mut self, actor: ActorId) -> bool {
        if !self.is_alive(actor) {
            return false;
        }

        let listeners: Vec<_> = self.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener.borrow_mut().on_before_actor_removed(self, actor);
        }
        if !self.is_alive(actor) {
            return true;
        }

        for store in std::mem::take(&mut self.actors.stores[actor.index()]) {
            self.stores[store.index()] = None;
        }
        match self.actors.kind[actor.index()] {
            ActorKind::Controller => self.unpossess(actor),
            ActorKind::Pawn => {
                if let Some(controller) = self.actors.controller[actor.index()] {
                    self.unpossess(controller);
                }
            }
            ActorKind::GameState => self.game_state = None,
            ActorKind::Plain => {}
        }
        self.by_object.remove(&self.actors.object[actor.index()]);
        self.actors.alive[actor.index()] = false;
        debug!(%actor, name = %self.actors.name[actor.index()], "destroyed actor");
        true
    }

    fn not_alive_or(&self, actor: ActorId, otherwise: WorldError) -> WorldError {
        if self.is_alive(actor) { otherwise } else { AfError::ActorNotFound(actor).into() }
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    pub fn subscribe_removal(&mut self, listener: Rc<RefCell<dyn ActorRemovalListener>>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe_removal(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ── Stores ────────────────────────────────────────────────────────────

    /// Attach a new store for `schema` to `owner`.
    pub fn add_store(&mut self, owner: ActorId, class: ClassId, name: impl Into<Name>, schema: Arc<BlackboardSchema>) -> WorldResult<StoreId> {
        if !self.is_alive(owner) {
            return Err(AfError::ActorNotFound(owner).into());
        }
        if !self.registry.is_child_of(class, builtin::BLACKBOARD_COMPONENT) {
            return Err(WorldError::NotAStoreClass(self.registry.class_name(class)));
        }
        let id = StoreId(self.stores.len() as u32);
        let name = name.into();
        debug!(store = %id, owner = %self.actor_name(owner), %name, schema = %schema.name(), "attached store");
        self.stores.push(Some(HostedStore { owner, class, name, blackboard: Blackboard::new(schema) }));
        self.actors.stores[owner.index()].push(id);
        Ok(id)
    }

    /// Detach and drop `store`.  Returns `false` if it was already gone.
    pub fn remove_store(&mut self, store: StoreId) -> bool {
        let Some(hosted) = self.stores.get_mut(store.index()).and_then(Option::take) else {
            warn!(%store, "remove_store on a store that is not attached");
            return false;
        };
        self.actors.stores[hosted.owner.index()].retain(|s| *s != store);
        debug!(%store, owner = %self.actor_name(hosted.owner), name = %hosted.name, "removed store");
        true
    }

    /// Stores attached to `actor`, in attachment order.  Empty for dead ids.
    pub fn stores_on(&self, actor: ActorId) -> &[StoreId] {
        if self.is_alive(actor) { self.actors.stores[actor.index()].as_slice() } else { &[] }
    }

    pub fn hosted(&self, store: StoreId) -> Option<&HostedStore> {
        self.stores.get(store.index()).and_then(Option::as_ref)
    }

    pub fn store(&self, store: StoreId) -> Option<&Blackboard> {
        self.hosted(store).map(|h| &h.blackboard)
    }

    pub fn store_mut(&mut self, store: StoreId) -> Option<&mut Blackboard> {
        self.stores.get_mut(store.index()).and_then(Option::as_mut).map(|h| &mut h.blackboard)
    }

    pub fn store_owner(&self, store: StoreId) -> Option<ActorId> {
        self.hosted(store).map(|h| h.owner)
    }

    /// The store named `name` on `actor`.
    pub fn find_store_by_name(&self, actor: ActorId, name: &Name) -> Option<StoreId> {
        self.stores_on(actor).iter().copied().find(|s| self.hosted(*s).is_some_and(|h| h.name == *name))
    }
}
