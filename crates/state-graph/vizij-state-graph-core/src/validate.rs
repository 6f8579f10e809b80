//! Whole-graph validation.
//!
//! Runs after transitions are resolved and reports, in order:
//! 1. invalid or duplicate names in any scope
//! 2. default states that do not resolve to a descendant
//! 3. conditions whose parameter is unknown or of another kind
//! 4. structurally invalid blend trees
//!
//! Every problem is collected; nothing stops at the first failure. Default-state
//! resolution writes `resolved_default` into the tree as a side effect.

use hashbrown::HashSet;

use crate::blend::validate_tree;
use crate::config::Config;
use crate::error::{Diagnostics, GraphError};
use crate::graph::{Layer, Node, StateMachine, StateMotion};
use crate::ids::{ScopePath, PATH_SEPARATOR};
use crate::index::GraphIndex;
use crate::parameters::ParameterRegistry;
use crate::transition::Transition;

pub(crate) struct Validator<'a> {
    pub index: &'a GraphIndex,
    pub registry: &'a ParameterRegistry,
    pub cfg: &'a Config,
}

impl Validator<'_> {
    pub fn run(&self, layers: &mut [Layer], transitions: &[Transition], out: &mut Diagnostics) {
        check_names(layers, out);

        let mut cursor = 0;
        for layer in layers.iter_mut() {
            self.resolve_defaults(&mut layer.root, &mut cursor, out);
        }

        for (i, t) in transitions.iter().enumerate() {
            self.check_conditions(i, t, out);
        }

        for layer in layers.iter() {
            self.check_blend_trees(&layer.root, &layer.scope(), out);
        }
    }

    /// `cursor` walks `index.scopes` in the same pre-order the index was built in.
    fn resolve_defaults(
        &self,
        machine: &mut StateMachine,
        cursor: &mut usize,
        out: &mut Diagnostics,
    ) {
        let slot = *cursor;
        *cursor += 1;
        let scope = &self.index.scopes[slot];

        machine.resolved_default = match &machine.default_state {
            Some(name) => match self.index.lookup_within(slot, name).as_slice() {
                [one] => Some(self.index.states[*one].id.clone()),
                [] => {
                    out.push(GraphError::UnknownDefaultState {
                        path: scope.path.to_string(),
                        name: name.clone(),
                    });
                    None
                }
                many => {
                    out.push(GraphError::AmbiguousName {
                        path: scope.path.to_string(),
                        name: name.clone(),
                        candidates: many
                            .iter()
                            .map(|&s| self.index.states[s].id.to_string())
                            .collect(),
                    });
                    None
                }
            },
            None if self.cfg.implicit_default_state => scope
                .states
                .clone()
                .next()
                .map(|s| self.index.states[s].id.clone()),
            None => None,
        };

        for child in &mut machine.children {
            if let Node::StateMachine(m) = child {
                self.resolve_defaults(m, cursor, out);
            }
        }
    }

    fn check_conditions(&self, i: usize, t: &Transition, out: &mut Diagnostics) {
        for (c, condition) in t.conditions.iter().enumerate() {
            let name = condition.parameter();
            match self.registry.by_name(name) {
                None => out.push(GraphError::UnknownParameter {
                    path: format!("transitions[{i}].conditions[{c}]"),
                    parameter: name.to_string(),
                }),
                Some(p) if p.kind != condition.kind() => {
                    out.push(GraphError::ConditionKindMismatch {
                        parameter: name.to_string(),
                        kind: p.kind,
                        reason: format!(
                            "transitions[{i}].conditions[{c}] was built for a {:?} parameter",
                            condition.kind()
                        ),
                    })
                }
                Some(_) => {}
            }
        }
    }

    fn check_blend_trees(&self, machine: &StateMachine, scope: &ScopePath, out: &mut Diagnostics) {
        for child in &machine.children {
            match child {
                Node::State(s) => {
                    if let StateMotion::Blend(tree) = &s.motion {
                        let path = format!("{scope}{PATH_SEPARATOR}{}", s.name);
                        validate_tree(tree, &path, self.registry, out);
                    }
                }
                Node::StateMachine(m) => {
                    self.check_blend_trees(m, &scope.child(m.name.clone()), out)
                }
            }
        }
    }
}

fn check_names(layers: &[Layer], out: &mut Diagnostics) {
    let mut seen = HashSet::new();
    for layer in layers {
        check_name(layer.name(), "layers", out);
        if !seen.insert(layer.name()) {
            out.push(GraphError::DuplicateName {
                path: "layers".to_string(),
                name: layer.name().to_string(),
            });
        }
    }
    for layer in layers {
        check_scope_names(&layer.root, &layer.scope(), out);
    }
}

fn check_scope_names(machine: &StateMachine, scope: &ScopePath, out: &mut Diagnostics) {
    let path = scope.to_string();
    let mut seen = HashSet::new();
    for child in &machine.children {
        let name = child.name();
        check_name(name, &path, out);
        if !seen.insert(name) {
            out.push(GraphError::DuplicateName {
                path: path.clone(),
                name: name.to_string(),
            });
        }
    }
    for child in &machine.children {
        if let Node::StateMachine(m) = child {
            check_scope_names(m, &scope.child(m.name.clone()), out);
        }
    }
}

fn check_name(name: &str, path: &str, out: &mut Diagnostics) {
    if name.trim().is_empty() || name.contains(PATH_SEPARATOR) {
        out.push(GraphError::InvalidName {
            path: path.to_string(),
            name: name.to_string(),
        });
    }
}
