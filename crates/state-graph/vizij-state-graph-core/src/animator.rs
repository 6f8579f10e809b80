//! Animator builder and the emitted graph IR.
//!
//! `AnimatorBuilder::build` runs the whole pipeline:
//! tags → index → transition resolution → validation → IR.
//! It returns either a complete [`AnimatorGraph`] or every diagnostic found.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Diagnostics, GraphError};
use crate::graph::{Layer, State, StateMachine};
use crate::ids::{ParameterHandle, ScopePath, StateId};
use crate::index::GraphIndex;
use crate::parameters::{Parameter, ParameterKind, ParameterRegistry, ParameterValue};
use crate::tags::propagate_tags;
use crate::transition::{ResolvedTransition, Resolver, Transition, TransitionTarget};
use crate::validate::Validator;

/// Collects parameters, layers and transitions for one graph.
#[derive(Debug, Clone, Default)]
pub struct AnimatorBuilder {
    cfg: Config,
    parameters: ParameterRegistry,
    layers: Vec<Layer>,
    transitions: Vec<Transition>,
}

impl AnimatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn parameters(&self) -> &ParameterRegistry {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParameterRegistry {
        &mut self.parameters
    }

    pub fn declare(
        &mut self,
        name: impl Into<String>,
        kind: ParameterKind,
        default: Option<ParameterValue>,
    ) -> Result<ParameterHandle, GraphError> {
        self.parameters.declare(name, kind, default)
    }

    pub fn float_param(
        &mut self,
        name: impl Into<String>,
        default: f32,
    ) -> Result<ParameterHandle, GraphError> {
        self.parameters.float(name, default)
    }

    pub fn bool_param(
        &mut self,
        name: impl Into<String>,
        default: bool,
    ) -> Result<ParameterHandle, GraphError> {
        self.parameters.bool(name, default)
    }

    pub fn int_param(
        &mut self,
        name: impl Into<String>,
        default: i32,
    ) -> Result<ParameterHandle, GraphError> {
        self.parameters.int(name, default)
    }

    pub fn trigger_param(
        &mut self,
        name: impl Into<String>,
    ) -> Result<ParameterHandle, GraphError> {
        self.parameters.trigger(name)
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.add_layer(layer);
        self
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.add_transition(transition);
        self
    }

    pub fn with_transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Validate and lower the declared graph into its IR.
    pub fn build(self) -> Result<AnimatorGraph, Diagnostics> {
        let AnimatorBuilder {
            cfg,
            parameters,
            mut layers,
            transitions,
        } = self;

        propagate_tags(&mut layers);
        debug!("propagated tags across {} layer(s)", layers.len());

        let index = GraphIndex::build(&layers);
        let mut diags = Diagnostics::new();
        let resolved = Resolver::new(&index, &cfg).resolve_all(&transitions, &mut diags);

        Validator {
            index: &index,
            registry: &parameters,
            cfg: &cfg,
        }
        .run(&mut layers, &transitions, &mut diags);

        if !diags.is_empty() {
            debug!("graph rejected with {} diagnostic(s)", diags.len());
            return Err(diags);
        }

        // Engines always evaluate the first layer at full weight.
        if let Some(first) = layers.first_mut() {
            first.weight = 1.0;
        }

        debug!(
            "emitted graph: {} layer(s), {} state(s), {} parameter(s), {} transition(s)",
            layers.len(),
            index.states.len(),
            parameters.len(),
            resolved.len()
        );
        Ok(AnimatorGraph {
            layers,
            parameters: parameters.into_table(),
            transitions: resolved,
        })
    }
}

/// Validated, fully resolved graph handed to an engine backend.
///
/// Names are unique per scope, every transition references existing states,
/// tags are propagated and blend trees are structurally valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorGraph {
    pub layers: Vec<Layer>,
    pub parameters: Vec<Parameter>,
    pub transitions: Vec<ResolvedTransition>,
}

impl AnimatorGraph {
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Every leaf state of every layer, in layer then declaration order.
    pub fn states(&self) -> Vec<(StateId, &State)> {
        self.layers.iter().flat_map(|l| l.states()).collect()
    }

    pub fn state(&self, id: &StateId) -> Option<&State> {
        let machine = self.machine(&id.scope)?;
        machine.state(&id.name)
    }

    /// Layer root or nested state machine at `path`.
    pub fn machine(&self, path: &ScopePath) -> Option<&StateMachine> {
        let mut segments = path.segments();
        let mut machine = &self.layer(segments.next()?)?.root;
        for seg in segments {
            machine = machine.machine(seg)?;
        }
        Some(machine)
    }

    /// Flattened `(source, destination)` pairs, one per source state.
    pub fn transition_pairs(&self) -> Vec<(StateId, TransitionTarget)> {
        self.transitions
            .iter()
            .flat_map(|t| t.source_states.iter().map(|s| (s.clone(), t.destination.clone())))
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::trigger_condition;
    use crate::graph::{layer, state};
    use crate::transition::transition;

    #[test]
    fn build_emits_complete_graph() {
        let mut b = AnimatorBuilder::new();
        b.float_param("Speed", 1.0).unwrap();
        let jump = b.trigger_param("JumpTrigger").unwrap();
        let graph = b
            .with_layer(
                layer("Base")
                    .default_state("Idle")
                    .weight(0.3)
                    .children([state("Idle", "idle"), state("Jump", "jump")]),
            )
            .with_transition(
                transition()
                    .source("Idle")
                    .destination("Jump")
                    .condition(trigger_condition(&jump).unwrap()),
            )
            .build()
            .expect("graph should validate");

        assert_eq!(graph.layers[0].weight, 1.0);
        assert_eq!(graph.parameters.len(), 2);
        assert_eq!(graph.parameter("Speed").unwrap().default, Some(ParameterValue::Float(1.0)));
        let idle = StateId::parse("Base/Idle").unwrap();
        assert!(graph.state(&idle).is_some());
        assert_eq!(graph.transition_pairs().len(), 1);
    }

    #[test]
    fn failed_build_reports_resolution_then_validation() {
        let b = AnimatorBuilder::new()
            .with_layer(layer("Base").default_state("Missing").child(state("Idle", "idle")))
            .with_transition(transition().source("Nope").destination("Idle"));
        let diags = b.build().unwrap_err();
        assert_eq!(diags.len(), 2);
        assert!(matches!(diags.errors()[0], GraphError::UnknownStateName { .. }));
        assert!(matches!(diags.errors()[1], GraphError::UnknownDefaultState { .. }));
    }

    #[test]
    fn ir_round_trips_through_json() {
        let graph = AnimatorBuilder::new()
            .with_layer(layer("Base").tag("BASE").child(state("Idle", "idle")))
            .build()
            .unwrap();
        let json = graph.to_json_pretty().unwrap();
        assert!(json.contains("\"Base/Idle\""));
        let back = AnimatorGraph::from_json(&json).unwrap();
        assert_eq!(back, graph);
    }
}
