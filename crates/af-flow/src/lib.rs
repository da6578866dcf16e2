//! `af-flow` — the flow layer: nodes and add-ons that read, write, and branch
//! on blackboards, and the AI flow asset that binds a graph to its owner.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                                          |
//! |----------------|-----------------------------------------------------------------------------------|
//! | [`signal`]     | `Signal`, default pin names                                                       |
//! | [`context`]    | `FlowContext<'a>` — world, asset, ambient generator, data pins                    |
//! | [`node`]       | `FlowNode`, `FlowNodeAddOn`, `FlowPredicate`, `execute`                           |
//! | [`asset`]      | `AiFlowAsset`                                                                     |
//! | [`allocator`]  | `OptionAllocator`, `AssignmentMethod`                                             |
//! | [`helper`]     | `ActorBlackboardHelper`, `BlackboardOption`                                       |
//! | [`injection`]  | `NodeInjection` — inject manager owned by a node                                  |
//! | [`predicate`]  | `CompareBlackboardValue`, `CompareOperator`                                       |
//! | [`roll`]       | `RollWeighted`, `RollGuaranteed`                                                  |
//! | [`set_values`] | `SetBlackboardValues`                                                             |
//! | [`get_values`] | `GetBlackboardValues`                                                             |
//! | [`ensure`]     | `EnsureActorHasBlackboard`                                                        |
//! | [`addons`]     | `ConfigureSpawnedActorBlackboard`, `SetBlackboardValuesAddOn`, `InjectComponents` |
//! | [`error`]      | `FlowError`, `FlowResult<T>`                                                      |
//!
//! # Driving a node
//!
//! The host builds a [`FlowContext`] for each callback and routes the
//! returned [`Signal`]s.  Use [`node::execute`] rather than calling
//! `execute_input` directly so finished nodes are cleaned up.
//!
//! Nodes that may inject stores own their inject manager and must receive
//! `deinitialize_instance` before they are dropped.

pub mod addons;
pub mod allocator;
pub mod asset;
pub mod context;
pub mod ensure;
pub mod error;
pub mod get_values;
pub mod helper;
pub mod injection;
pub mod node;
pub mod predicate;
pub mod roll;
pub mod set_values;
pub mod signal;


pub use addons::{ComponentTemplate, ConfigureSpawnedActorBlackboard, InjectComponents, SetBlackboardValuesAddOn};
pub use allocator::{AssignmentMethod, OptionAllocator};
pub use asset::{AiFlowAsset, SELF_ACTOR_KEY, acting_actor};
pub use context::FlowContext;
pub use ensure::EnsureActorHasBlackboard;
pub use error::{FlowError, FlowResult};
pub use get_values::{GetBlackboardValues, SPECIFIC_ACTOR_PIN};
pub use helper::{ActorBlackboardHelper, BlackboardOption, append_blackboard_options};
pub use injection::NodeInjection;
pub use node::{FlowNode, FlowNodeAddOn, FlowPredicate, execute};
pub use predicate::{CompareBlackboardValue, CompareOperator};
pub use roll::{RollGuaranteed, RollWeighted, WeightedOption};
pub use set_values::{SPECIFIC_ACTORS_PIN, SetBlackboardValues};
pub use signal::{INPUT_PIN, OUTPUT_PIN, Signal};
