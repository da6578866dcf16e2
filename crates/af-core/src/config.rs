//! Run-level configuration for a flow asset and its host.

use crate::{AmbientRng, Name};

/// Knobs shared by the flow asset, its nodes, and the host's ambient
/// generator.
///
/// All fields have defaults, so a config file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FlowConfig {
    /// Seed of the flow asset.  Node seeds are hash-combined with it.
    pub seed: u32,

    /// Seed for the host-global generator.  `None` seeds from OS entropy,
    /// which makes option reshuffles and guaranteed rolls non-reproducible.
    pub ambient_seed: Option<u64>,

    /// Prefix for the name of a store the flow asset creates on its owner.
    pub store_name_prefix: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            seed:              0,
            ambient_seed:      None,
            store_name_prefix: "Comp_".to_owned(),
        }
    }
}

impl FlowConfig {
    /// Build the host-global generator this config describes.
    pub fn ambient_rng(&self) -> AmbientRng {
        AmbientRng::from_seed_option(self.ambient_seed)
    }

    /// Name for a store created for `schema_name`, e.g. `Comp_BB_Enemy`.
    pub fn store_name(&self, schema_name: &Name) -> Name {
        Name::new(format!("{}{}", self.store_name_prefix, schema_name))
    }
}
