//! vizij-state-graph-core: declarative animation state-machine graphs (engine-agnostic)
//!
//! Authors declare parameters, a layer → state machine → state hierarchy,
//! blend trees and transitions through a fluent builder. `build()` propagates
//! tags, resolves symbolic transition sources to concrete states, validates the
//! whole graph and emits an [`AnimatorGraph`] IR for an engine backend.
//!
//! ```
//! use vizij_state_graph_core::*;
//!
//! let mut animator = AnimatorBuilder::new();
//! let speed = animator.float_param("Speed", 1.0)?;
//! let jump = animator.trigger_param("JumpTrigger")?;
//!
//! let graph = animator
//!     .with_layer(
//!         layer("Base")
//!             .default_state("Idle")
//!             .children([state("Idle", "idle"), state("Run", "run"), state("Jump", "jump")]),
//!     )
//!     .with_transition(
//!         transition()
//!             .source_multiple(["Idle", "Run"])
//!             .destination("Jump")
//!             .condition(trigger_condition(&jump)?),
//!     )
//!     .with_transition(
//!         transition()
//!             .source("Idle")
//!             .destination("Run")
//!             .condition(float_condition(&speed, 5.0, FloatMode::Greater)?),
//!     )
//!     .with_transition(transition().source("Jump").destination("Idle").exit_time(0.9))
//!     .build()?;
//!
//! assert_eq!(graph.transitions.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod animator;
pub mod blend;
pub mod condition;
pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
mod index;
pub mod motion;
pub mod parameters;
pub mod tags;
pub mod transition;
mod validate;

pub use animator::{AnimatorBuilder, AnimatorGraph};
pub use blend::{clip_1d, clip_2d, clip_direct, BlendChild, BlendKind, BlendMotion, BlendTree};
pub use condition::{
    bool_condition, condition, float_condition, int_condition, trigger_condition, Comparator,
    Condition, ConditionMode, ConditionRecord, FloatMode, IntMode, Operand,
};
pub use config::Config;
pub use error::{Diagnostics, GraphError};
pub use graph::{
    blend_state, empty_state, layer, state, state_machine, BlendingMode, Layer, Node, State,
    StateMachine, StateMotion,
};
pub use ids::{ParameterHandle, ScopePath, StateId, PATH_SEPARATOR};
pub use motion::{AvatarMaskRef, MotionRef};
pub use parameters::{Parameter, ParameterKind, ParameterRegistry, ParameterValue};
pub use tags::propagate_tags;
pub use transition::{transition, ResolvedTransition, SourceSpec, Transition, TransitionTarget};
