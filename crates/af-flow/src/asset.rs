//! `AiFlowAsset` — a flow graph bound to a blackboard schema and an owner.
//!
//! On [`initialize`](AiFlowAsset::initialize) the asset finds the store for
//! its schema on the owner, or creates one named `<prefix><schema>` and
//! tracks it with its own [`InjectComponentsManager`].  The `SelfActor` key
//! is then pointed at the owner, or at the owner's possessed pawn when the
//! owner is a controller.

use std::sync::Arc;

use af_blackboard::{BlackboardSchema, TypeRegistry, builtin};
use af_core::{ActorId, ClassId, FlowConfig, Name, StoreId, combine_seeds};
use af_world::{InjectComponentsManager, World, try_find_store_on_actor};
use tracing::{debug, error};

use crate::error::{FlowError, FlowResult};

/// Key that receives the acting actor when the asset initializes.
pub const SELF_ACTOR_KEY: &str = "SelfActor";

pub struct AiFlowAsset {
    name:            Name,
    config:          FlowConfig,
    schema:          Option<Arc<BlackboardSchema>>,
    component_class: ClassId,
    owner:           Option<ActorId>,
    store:           Option<StoreId>,
    manager:         Option<InjectComponentsManager>,
}

impl AiFlowAsset {
    pub fn new(name: impl Into<Name>, config: FlowConfig) -> Self {
        Self {
            name:            name.into(),
            config,
            schema:          None,
            component_class: builtin::BLACKBOARD_COMPONENT,
            owner:           None,
            store:           None,
            manager:         None,
        }
    }

    pub fn with_schema(mut self, schema: Arc<BlackboardSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Component class used for a store the asset creates.
    pub fn with_component_class(mut self, class: ClassId) -> Self {
        self.component_class = class;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn schema(&self) -> Option<&Arc<BlackboardSchema>> {
        self.schema.as_ref()
    }

    pub fn component_class(&self) -> ClassId {
        self.component_class
    }

    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    /// The store the asset is bound to, once initialized.
    pub fn store(&self) -> Option<StoreId> {
        self.store
    }

    /// `true` while the asset tracks a store it created.
    pub fn owns_injected_store(&self) -> bool {
        self.manager.as_ref().is_some_and(|m| m.injected_count() > 0)
    }

    /// Seed for a node: the asset seed hash-combined with `node_seed`.
    #[inline]
    pub fn random_seed(&self, node_seed: u32) -> u32 {
        combine_seeds(self.config.seed, node_seed)
    }

    /// Check the asset can create its store.
    pub fn validate(&self, registry: &TypeRegistry) -> FlowResult<()> {
        if !registry.is_child_of(self.component_class, builtin::BLACKBOARD_COMPONENT) {
            return Err(FlowError::Config(format!(
                "{}: component class {} is not a blackboard component",
                self.name,
                registry.class_name(self.component_class)
            )));
        }
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Bind the asset to `owner` and find or create its store there.
    ///
    /// Returns `None` when the asset has no schema or the store could not be
    /// created.
    pub fn initialize(&mut self, world: &mut World, owner: ActorId) -> Option<StoreId> {
        if !world.is_alive(owner) {
            error!(asset = %self.name, %owner, "cannot initialize a flow asset for an actor that does not exist");
            return None;
        }
        self.owner = Some(owner);

        let Some(schema) = self.schema.clone() else {
            debug!(asset = %self.name, "flow asset has no blackboard schema");
            return None;
        };

        let store = match try_find_store_on_actor(world, owner, Some(schema.as_ref())) {
            Some(store) => Some(store),
            None => {
                let name = self.config.store_name(schema.name());
                let manager = self.manager.get_or_insert_with(InjectComponentsManager::new);
                manager.initialize_runtime(world);
                manager.inject_store(world, owner, self.component_class, name, schema)
            }
        };
        self.store = store;

        if let Some(store) = store {
            set_self_actor(world, owner, store);
        }
        store
    }

    /// Release the store binding and any store the asset created.
    pub fn deinitialize(&mut self, world: &mut World) {
        if let Some(mut manager) = self.manager.take() {
            manager.shutdown_runtime(world);
        }
        self.store = None;
        self.owner = None;
    }
}

/// The actor `SelfActor` should name: the possessed pawn of a controller,
/// otherwise `owner` itself.
pub fn acting_actor(world: &World, owner: ActorId) -> ActorId {
    if world.is_controller(owner) {
        if let Some(pawn) = world.pawn_of(owner) {
            return pawn;
        }
    }
    owner
}

fn set_self_actor(world: &mut World, owner: ActorId, store: StoreId) {
    let object = world.actor_object(acting_actor(world, owner));
    let key = Name::from(SELF_ACTOR_KEY);
    let Some(bb) = world.store_mut(store) else {
        return;
    };
    if bb.key_id(&key).is_some() {
        bb.set_value_as_object(&key, object);
    }
}
