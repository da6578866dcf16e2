//! State handed to every node and add-on callback.

use af_blackboard::{KeyTypeTag, TypeRegistry};
use af_core::{ActorId, AmbientRng, Name, ObjectId, StoreId};
use af_entry::{PinError, PinSource, PinValue};
use af_world::World;
use tracing::error;

use crate::asset::AiFlowAsset;
use crate::error::FlowResult;

/// Everything a node may touch while it runs.
///
/// Built by the host for the duration of one callback.  Nodes never own the
/// world or the asset; they reach them through this context.
pub struct FlowContext<'a> {
    /// The host world: actors and their stores.
    pub world: &'a mut World,

    /// The flow asset the node belongs to.
    pub asset: &'a AiFlowAsset,

    /// The host-global generator.
    pub ambient: &'a mut AmbientRng,

    /// Resolves the node's connected input data pins.
    pub pins: &'a dyn PinSource,
}

impl<'a> FlowContext<'a> {
    #[inline]
    pub fn new(
        world:   &'a mut World,
        asset:   &'a AiFlowAsset,
        ambient: &'a mut AmbientRng,
        pins:    &'a dyn PinSource,
    ) -> Self {
        Self { world, asset, ambient, pins }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        self.world.registry()
    }

    /// The actor that owns the flow, if it is still alive.
    pub fn owner(&self) -> Option<ActorId> {
        self.asset.owner().filter(|a| self.world.is_alive(*a))
    }

    /// The asset's own store.
    #[inline]
    pub fn asset_store(&self) -> Option<StoreId> {
        self.asset.store()
    }

    /// Resolve an actor from an object pin.
    ///
    /// `Ok(None)` means the pin resolved but did not name a live actor.
    pub fn resolve_actor(&self, pin: &Name) -> FlowResult<Option<ActorId>> {
        match self.pins.resolve_pin(pin)? {
            PinValue::Object(object) => Ok(self.live_actor(object)),
            other => Err(PinError::MismatchedType {
                pin:      pin.clone(),
                expected: KeyTypeTag::Object,
                actual:   other.tag(),
            }
            .into()),
        }
    }

    /// Resolve the actors named by an object (or object list) pin.  Entries
    /// that do not name a live actor are logged and dropped.
    pub fn resolve_actors(&self, pin: &Name) -> FlowResult<Vec<ActorId>> {
        let objects = self.pins.resolve_objects(pin)?;
        let mut actors = Vec::with_capacity(objects.len());
        for object in objects {
            match self.live_actor(object) {
                Some(actor) => actors.push(actor),
                None => error!(%pin, "pin supplied a null actor"),
            }
        }
        Ok(actors)
    }

    fn live_actor(&self, object: Option<ObjectId>) -> Option<ActorId> {
        object
            .and_then(|o| self.world.actor_for_object(o))
            .filter(|a| self.world.is_alive(*a))
    }
}
