//! `InjectComponentsManager` — lifetime tracking for stores created on demand.
//!
//! A store injected onto an actor belongs to that actor, but the manager that
//! injected it stays responsible for it:
//!
//! * when a monitored actor is destroyed, the manager's before-removed
//!   callbacks run first, then the injected stores are detached;
//! * on [`shutdown_runtime`](InjectComponentsManager::shutdown_runtime) the
//!   manager unsubscribes from the world and detaches every store it
//!   injected that is still attached.
//!
//! The owner of a manager must call `shutdown_runtime` before dropping it.
//! A manager dropped while still subscribed leaves a listener behind in the
//! world and logs a warning.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use af_blackboard::BlackboardSchema;
use af_core::{ActorId, ClassId, Name, StoreId};
use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

use crate::world::{ActorRemovalListener, ListenerId, World};

type BeforeRemoved = Box<dyn FnMut(ActorId)>;

#[derive(Default)]
struct InjectState {
    injected:       FxHashMap<ActorId, Vec<StoreId>>,
    before_removed: Vec<BeforeRemoved>,
}

impl ActorRemovalListener for InjectState {
    fn on_before_actor_removed(&mut self, world: &mut World, actor: ActorId) {
        let Some(stores) = self.injected.remove(&actor) else {
            return;
        };
        for callback in &mut self.before_removed {
            callback(actor);
        }
        for store in stores {
            world.remove_store(store);
        }
        debug!(actor = %world.actor_name(actor), "removed injected stores of destroyed actor");
    }
}

#[derive(Default)]
pub struct InjectComponentsManager {
    state:    Rc<RefCell<InjectState>>,
    listener: Option<ListenerId>,
}

impl InjectComponentsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing actor removal in `world`.  Idempotent.
    pub fn initialize_runtime(&mut self, world: &mut World) {
        if self.listener.is_some() {
            return;
        }
        let listener: Rc<RefCell<dyn ActorRemovalListener>> = self.state.clone();
        self.listener = Some(world.subscribe_removal(listener));
    }

    /// Stop observing and detach every injected store still attached.
    pub fn shutdown_runtime(&mut self, world: &mut World) {
        if let Some(id) = self.listener.take() {
            world.unsubscribe_removal(id);
        }
        let injected = std::mem::take(&mut self.state.borrow_mut().injected);
        for store in injected.into_values().flatten() {
            if world.hosted(store).is_some() {
                world.remove_store(store);
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }

    /// Register `callback` to run before the injected stores of a destroyed
    /// actor are detached.
    pub fn on_before_removed(&mut self, callback: impl FnMut(ActorId) + 'static) {
        self.state.borrow_mut().before_removed.push(Box::new(callback));
    }

    /// Create a store named `name` for `schema` of component class `class` on
    /// `actor` and track it.  Logs and returns `None` if the world refuses
    /// the store.
    pub fn inject_store(
        &mut self,
        world: &mut World,
        actor: ActorId,
        class: ClassId,
        name: impl Into<Name>,
        schema: Arc<BlackboardSchema>,
    ) -> Option<StoreId> {
        if self.listener.is_none() {
            warn!(actor = %world.actor_name(actor), "injecting a store with a manager that is not initialized");
        }
        match world.add_store(actor, class, name, schema) {
            Ok(store) => {
                self.state.borrow_mut().injected.entry(actor).or_default().push(store);
                Some(store)
            }
            Err(err) => {
                error!(actor = %world.actor_name(actor), %err, "could not inject a blackboard store");
                None
            }
        }
    }

    /// Stores this manager injected onto `actor`.
    pub fn injected_on(&self, actor: ActorId) -> Vec<StoreId> {
        self.state.borrow().injected.get(&actor).cloned().unwrap_or_default()
    }

    pub fn injected_count(&self) -> usize {
        self.state.borrow().injected.values().map(Vec::len).sum()
    }
}

impl Drop for InjectComponentsManager {
    fn drop(&mut self) {
        if self.listener.is_some() {
            warn!("inject manager dropped while still subscribed to actor removal; call shutdown_runtime first");
        }
    }
}
