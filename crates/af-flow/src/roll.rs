//! Roll nodes: route execution to one of several outputs at random.

use af_blackboard::TypeRegistry;
use af_core::{FlowRng, Name};
use tracing::trace;

use crate::context::FlowContext;
use crate::node::FlowNode;
use crate::signal::{INPUT_PIN, Signal};

// ── Weighted ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedOption {
    pub output_name: Name,
    pub weight:      i32,
}

impl WeightedOption {
    pub fn new(output_name: impl Into<Name>, weight: i32) -> Self {
        Self { output_name: output_name.into(), weight }
    }

    /// Unnamed options and negative weights count as zero.
    #[inline]
    fn effective_weight(&self) -> i64 {
        if self.output_name.is_none() { 0 } else { i64::from(self.weight.max(0)) }
    }
}

/// Picks one output per input, proportionally to the option weights.
///
/// The node's stream is seeded on activation from the asset seed combined
/// with `node_seed`, so a flow replayed with the same asset seed picks the
/// same outputs.
pub struct RollWeighted {
    pub options:   Vec<WeightedOption>,
    pub node_seed: u32,
    rng:           FlowRng,
}

impl RollWeighted {
    pub fn new(options: Vec<WeightedOption>, node_seed: u32) -> Self {
        Self { options, node_seed, rng: FlowRng::default() }
    }

    /// Sum of the effective weights, widened so `i32::MAX` weights cannot
    /// overflow it.
    pub fn total_weight(&self) -> i64 {
        self.options.iter().map(WeightedOption::effective_weight).sum()
    }

    /// Index of the option chosen by the next draw, or `None` when no option
    /// carries weight.
    pub fn choose(&mut self) -> Option<usize> {
        let total = self.total_weight();
        if total <= 0 {
            return None;
        }
        let chosen = self.rng.rand_helper_wide(total);
        let mut cumulative = 0i64;
        self.options.iter().position(|option| {
            cumulative += option.effective_weight();
            chosen < cumulative
        })
    }
}

impl FlowNode for RollWeighted {
    fn output_pins(&self) -> Vec<Name> {
        self.options
            .iter()
            .filter(|o| !o.output_name.is_none())
            .map(|o| o.output_name.clone())
            .collect()
    }

    fn on_activate(&mut self, ctx: &mut FlowContext<'_>) {
        self.rng.initialize(ctx.asset.random_seed(self.node_seed));
    }

    fn execute_input(&mut self, _ctx: &mut FlowContext<'_>, _pin: &Name) -> Vec<Signal> {
        match self.choose() {
            Some(index) => vec![Signal::trigger(self.options[index].output_name.clone(), true)],
            None => {
                trace!("weighted roll has no weighted options");
                vec![]
            }
        }
    }
}

// ── Guaranteed ────────────────────────────────────────────────────────────────

/// Fails with rising odds until it succeeds, at the latest on attempt
/// `max_attempts`.
///
/// Attempt `k` (1-based) of a run that has not yet succeeded wins with
/// probability `1 / (max_attempts - k + 1)`.  After a success every further
/// attempt fails.  The run resets when it finishes: on success with
/// `reset_on_success`, on reaching `max_attempts`, or on the `Reset` input.
/// Draws come from the ambient generator.
#[derive(Clone, Debug)]
pub struct RollGuaranteed {
    max_attempts:         u32,
    pub reset_on_success: bool,
    attempts:             u32,
    succeeded:            bool,
}

impl RollGuaranteed {
    pub const RESET_PIN: &'static str = "Reset";
    pub const GUARANTEED_OUT: &'static str = "Guaranteed Out";
    pub const FAILURE_OUT: &'static str = "Failure Out";

    /// `max_attempts` below 2 is raised to 2.
    pub fn new(max_attempts: u32, reset_on_success: bool) -> Self {
        Self {
            max_attempts: max_attempts.max(2),
            reset_on_success,
            attempts: 0,
            succeeded: false,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn has_succeeded(&self) -> bool {
        self.succeeded
    }

    /// Probability that the next attempt reaches the guaranteed output.
    pub fn next_success_chance(&self) -> f32 {
        if self.succeeded || self.attempts >= self.max_attempts {
            return 0.0;
        }
        1.0 / (self.max_attempts - self.attempts) as f32
    }

    fn roll(&mut self, ctx: &mut FlowContext<'_>) -> Signal {
        self.attempts += 1;
        let reset_on_max = self.attempts >= self.max_attempts;

        if self.succeeded {
            return Signal::trigger(Self::FAILURE_OUT, reset_on_max);
        }

        let remaining = self.max_attempts.saturating_sub(self.attempts);
        let draw = ctx.ambient.rand_range(0, i32::try_from(remaining).unwrap_or(i32::MAX));
        if draw == 0 {
            self.succeeded = true;
            Signal::trigger(Self::GUARANTEED_OUT, self.reset_on_success || reset_on_max)
        } else {
            Signal::trigger(Self::FAILURE_OUT, false)
        }
    }
}

impl Default for RollGuaranteed {
    fn default() -> Self {
        Self::new(2, false)
    }
}

impl FlowNode for RollGuaranteed {
    fn input_pins(&self) -> Vec<Name> {
        vec![Name::from(INPUT_PIN), Name::from(Self::RESET_PIN)]
    }

    fn output_pins(&self) -> Vec<Name> {
        vec![Name::from(Self::GUARANTEED_OUT), Name::from(Self::FAILURE_OUT)]
    }

    fn execute_input(&mut self, ctx: &mut FlowContext<'_>, pin: &Name) -> Vec<Signal> {
        if *pin == INPUT_PIN {
            vec![self.roll(ctx)]
        } else if *pin == Self::RESET_PIN {
            vec![Signal::Finish]
        } else {
            vec![]
        }
    }

    fn cleanup(&mut self) {
        self.attempts = 0;
        self.succeeded = false;
    }

    fn node_config_text(&self, _registry: &TypeRegistry) -> String {
        if self.reset_on_success { "Reset On Success".to_owned() } else { String::new() }
    }
}
