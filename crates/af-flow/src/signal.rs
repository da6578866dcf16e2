//! Signals — what a node asks the graph to do after handling an input.

use af_core::Name;

/// Name of the default execution input.
pub const INPUT_PIN: &str = "In";

/// Name of the default execution output.
pub const OUTPUT_PIN: &str = "Out";

/// Produced by [`FlowNode::execute_input`][crate::FlowNode::execute_input]
/// and consumed by whatever drives the graph.
///
/// A node may return several signals; they are handled in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Fire the output pin `pin`.
    ///
    /// With `finish` set the node is done after this output and its state is
    /// cleaned up.
    Trigger {
        pin:    Name,
        finish: bool,
    },

    /// Finish without firing an output.
    Finish,
}

impl Signal {
    #[inline]
    pub fn trigger(pin: impl Into<Name>, finish: bool) -> Self {
        Signal::Trigger { pin: pin.into(), finish }
    }

    /// `true` if the node is done once this signal is handled.
    #[inline]
    pub fn finishes(&self) -> bool {
        match self {
            Signal::Trigger { finish, .. } => *finish,
            Signal::Finish => true,
        }
    }

    /// The output pin this signal fires, if any.
    pub fn output(&self) -> Option<&Name> {
        match self {
            Signal::Trigger { pin, .. } => Some(pin),
            Signal::Finish => None,
        }
    }
}
