//! `Actors` — Structure-of-Arrays storage for every actor in a world.
//!
//! Every `Vec` has exactly `count` elements and `ActorId` is the index into
//! all of them.  Slots are never reused: a destroyed actor keeps its id with
//! `alive[i] == false`, so stale ids stay detectably stale.

use af_blackboard::builtin;
use af_core::{ActorId, ClassId, Name, ObjectId, StoreId};

/// Role an actor plays for store resolution.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Plain,
    /// Can be possessed by a controller.
    Pawn,
    Controller,
    /// The world's single global host.
    GameState,
}

impl ActorKind {
    /// Built-in class every actor of this kind derives from.
    pub fn base_class(self) -> ClassId {
        match self {
            ActorKind::Plain => builtin::ACTOR,
            ActorKind::Pawn => builtin::PAWN,
            ActorKind::Controller => builtin::CONTROLLER,
            ActorKind::GameState => builtin::GAME_STATE,
        }
    }
}

#[derive(Debug, Default)]
pub struct Actors {
    /// Number of actors ever spawned.  Equals the length of every `Vec`.
    pub count: usize,

    pub kind:   Vec<ActorKind>,
    pub name:   Vec<Name>,
    pub class:  Vec<ClassId>,
    /// Handle under which the actor is known to the type registry, so object
    /// keys and object pins can refer to it.
    pub object: Vec<ObjectId>,
    pub alive:  Vec<bool>,

    // ── Possession ────────────────────────────────────────────────────────
    /// For a pawn: the controller possessing it.
    pub controller: Vec<Option<ActorId>>,
    /// For a controller: the pawn it possesses.
    pub pawn:       Vec<Option<ActorId>>,

    // ── Attached stores ───────────────────────────────────────────────────
    /// Stores in attachment order.
    pub stores: Vec<Vec<StoreId>>,
}

impl Actors {
    pub(crate) fn push(&mut self, kind: ActorKind, name: Name, class: ClassId, object: ObjectId) -> ActorId {
        let id = ActorId(self.count as u32);
        self.kind.push(kind);
        self.name.push(name);
        self.class.push(class);
        self.object.push(object);
        self.alive.push(true);
        self.controller.push(None);
        self.pawn.push(None);
        self.stores.push(Vec::new());
        self.count += 1;
        id
    }

    /// `true` if `actor` was spawned here and not destroyed.
    #[inline]
    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.alive.get(actor.index()).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Live actors in ascending id order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        (0..self.count as u32).map(ActorId).filter(|a| self.alive[a.index()])
    }
}
