//! The node, add-on, and predicate traits — the extension points of a flow.

use af_blackboard::TypeRegistry;
use af_core::{ActorId, Name};

use crate::context::FlowContext;
use crate::signal::{INPUT_PIN, OUTPUT_PIN, Signal};

/// A node in a flow graph.
///
/// The graph calls the hooks in lifecycle order:
///
/// 1. [`initialize_instance`][Self::initialize_instance] once, when the flow
///    asset is instanced for an owner;
/// 2. [`on_activate`][Self::on_activate] when the node first receives input;
/// 3. [`execute_input`][Self::execute_input] for every input;
/// 4. [`cleanup`][Self::cleanup] whenever a returned [`Signal`] finishes the
///    node (see [`execute`]);
/// 5. [`deinitialize_instance`][Self::deinitialize_instance] once, before the
///    asset instance goes away.
///
/// Only `execute_input` is required.
pub trait FlowNode {
    fn input_pins(&self) -> Vec<Name> {
        vec![Name::from(INPUT_PIN)]
    }

    fn output_pins(&self) -> Vec<Name> {
        vec![Name::from(OUTPUT_PIN)]
    }

    fn initialize_instance(&mut self, _ctx: &mut FlowContext<'_>) {}

    fn on_activate(&mut self, _ctx: &mut FlowContext<'_>) {}

    /// Handle input on `pin`.  An empty `Vec` fires nothing and leaves the
    /// node active.
    fn execute_input(&mut self, ctx: &mut FlowContext<'_>, pin: &Name) -> Vec<Signal>;

    /// Reset per-run state after the node finished.
    fn cleanup(&mut self) {}

    fn deinitialize_instance(&mut self, _ctx: &mut FlowContext<'_>) {}

    /// One-line-per-setting summary shown on the node.
    fn node_config_text(&self, _registry: &TypeRegistry) -> String {
        String::new()
    }
}

/// Run `node` on `pin` and clean it up if any returned signal finishes it.
pub fn execute(node: &mut dyn FlowNode, ctx: &mut FlowContext<'_>, pin: &Name) -> Vec<Signal> {
    let signals = node.execute_input(ctx, pin);
    if signals.iter().any(Signal::finishes) {
        node.cleanup();
    }
    signals
}

/// Behavior attached to a node rather than wired into the graph.
///
/// All hooks default to no-ops.
pub trait FlowNodeAddOn {
    fn initialize_instance(&mut self, _ctx: &mut FlowContext<'_>) {}

    fn deinitialize_instance(&mut self, _ctx: &mut FlowContext<'_>) {}

    /// The parent node is executing input `pin`.
    fn on_parent_execute(&mut self, _ctx: &mut FlowContext<'_>, _pin: &Name) {}

    /// The parent node finished spawning `actor`.
    fn finished_spawning_actor(&mut self, _ctx: &mut FlowContext<'_>, _actor: ActorId) {}

    fn node_config_text(&self, _registry: &TypeRegistry) -> String {
        String::new()
    }
}

/// An add-on that gates its parent with a boolean test.
pub trait FlowPredicate {
    fn evaluate_predicate(&self, ctx: &FlowContext<'_>) -> bool;
}
