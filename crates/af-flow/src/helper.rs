//! Applying configured entries and per-actor options to a store.

use af_blackboard::{Blackboard, TypeRegistry};
use af_core::AmbientRng;
use af_entry::EntryValue;

use crate::allocator::{AssignmentMethod, OptionAllocator};

/// One set of entries applied together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlackboardOption {
    pub entries: Vec<EntryValue>,
}

impl BlackboardOption {
    pub fn new(entries: Vec<EntryValue>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry to `store`.
    pub fn apply(&self, store: &mut Blackboard) {
        for entry in &self.entries {
            entry.write(Some(&mut *store));
        }
    }
}

/// Applies the every-actor entries and then one per-actor option chosen by
/// an [`OptionAllocator`].
#[derive(Clone, Debug, Default)]
pub struct ActorBlackboardHelper {
    allocator: OptionAllocator,
}

impl ActorBlackboardHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the per-actor option index applied, if any.
    pub fn apply_options_to_store(
        &mut self,
        store:       &mut Blackboard,
        method:      AssignmentMethod,
        every_actor: &BlackboardOption,
        per_actor:   &[BlackboardOption],
        ambient:     &mut AmbientRng,
    ) -> Option<usize> {
        if !every_actor.is_empty() {
            every_actor.apply(store);
        }
        if per_actor.is_empty() {
            return None;
        }
        let index = self.allocator.next(method, per_actor.len(), ambient)?;
        per_actor[index].apply(store);
        Some(index)
    }

    pub fn allocator(&self) -> &OptionAllocator {
        &self.allocator
    }
}

/// Append a `Config Option #i:` block per option, one indented line per entry.
pub fn append_blackboard_options(out: &mut Vec<String>, options: &[BlackboardOption], registry: &TypeRegistry) {
    for (index, option) in options.iter().enumerate() {
        out.push(format!("Config Option #{index}:"));
        out.extend(option.entries.iter().map(|e| format!("  {}", e.node_config_text(registry))));
    }
}
