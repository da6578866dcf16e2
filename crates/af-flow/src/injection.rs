//! Inject-manager ownership for nodes and add-ons that may create stores.

use std::cell::RefCell;
use std::rc::Rc;

use af_core::ActorId;
use af_world::{InjectComponentsManager, World};
use tracing::debug;

/// An [`InjectComponentsManager`] created on first need, plus the actors it
/// stopped monitoring because they were destroyed.
///
/// The owner must call [`shutdown`](Self::shutdown) from its
/// `deinitialize_instance`.
#[derive(Default)]
pub struct NodeInjection {
    manager:  Option<InjectComponentsManager>,
    released: Rc<RefCell<Vec<ActorId>>>,
}

impl NodeInjection {
    /// Create and subscribe the manager if there is none yet.
    pub fn ensure(&mut self, world: &mut World) {
        if self.manager.is_some() {
            return;
        }
        let mut manager = InjectComponentsManager::new();
        manager.initialize_runtime(world);
        let released = Rc::clone(&self.released);
        manager.on_before_removed(move |actor| {
            debug!(%actor, "stopped monitoring actor");
            released.borrow_mut().push(actor);
        });
        self.manager = Some(manager);
    }

    pub fn manager(&self) -> Option<&InjectComponentsManager> {
        self.manager.as_ref()
    }

    pub fn manager_mut(&mut self) -> Option<&mut InjectComponentsManager> {
        self.manager.as_mut()
    }

    /// Tear the manager down, detaching every store it injected, and forget
    /// the released actors.
    pub fn shutdown(&mut self, world: &mut World) {
        if let Some(mut manager) = self.manager.take() {
            manager.shutdown_runtime(world);
        }
        self.released.borrow_mut().clear();
    }

    /// Actors destroyed while their injected stores were monitored, since the
    /// last shutdown.
    pub fn released_actors(&self) -> Vec<ActorId> {
        self.released.borrow().clone()
    }
}
