//! Transition declarations and their resolution to concrete states.
//!
//! A declared [`Transition`] names its sources symbolically through one or more
//! [`SourceSpec`]s. Resolution expands every spec against the frozen hierarchy
//! and unions the results:
//! - `Single(name)`: exactly one state
//! - `Multiple(names)`: each name as `Single`
//! - `Recursive(scope)`: every leaf state below a layer or state machine
//!
//! Resolved source sets are deduplicated and listed in declaration order of the
//! hierarchy, independent of how many specs matched a state. Transitions keep
//! their declaration order.

use std::collections::BTreeSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::config::Config;
use crate::error::{Diagnostics, GraphError};
use crate::ids::{ScopePath, StateId};
use crate::index::{Entry, GraphIndex};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SourceSpec {
    Single(String),
    Multiple(Vec<String>),
    Recursive(String),
}

/// A transition as declared by the author.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub sources: Vec<SourceSpec>,
    pub destination: Option<String>,
    /// Restrict name lookups to this layer.
    pub layer: Option<String>,
    pub exit_time: Option<f32>,
    pub transition_duration: Option<f32>,
    pub use_default_exit_time: bool,
    pub fixed_duration: bool,
    pub offset: f32,
    pub can_transition_to_self: bool,
    pub conditions: Vec<Condition>,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            destination: None,
            layer: None,
            exit_time: None,
            transition_duration: None,
            use_default_exit_time: false,
            fixed_duration: true,
            offset: 0.0,
            can_transition_to_self: false,
            conditions: Vec::new(),
        }
    }
}

pub fn transition() -> Transition {
    Transition::default()
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(mut self, spec: SourceSpec) -> Self {
        self.sources.push(spec);
        self
    }

    pub fn source(self, name: impl Into<String>) -> Self {
        self.spec(SourceSpec::Single(name.into()))
    }

    pub fn source_multiple<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec(SourceSpec::Multiple(names.into_iter().map(Into::into).collect()))
    }

    pub fn source_recursive(self, scope: impl Into<String>) -> Self {
        self.spec(SourceSpec::Recursive(scope.into()))
    }

    pub fn destination(mut self, name: impl Into<String>) -> Self {
        self.destination = Some(name.into());
        self
    }

    pub fn in_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn exit_time(mut self, t: f32) -> Self {
        self.exit_time = Some(t);
        self
    }

    pub fn transition_duration(mut self, seconds: f32) -> Self {
        self.transition_duration = Some(seconds);
        self
    }

    /// Leave on the engine's default exit time (see [`Config::default_exit_time`]).
    pub fn default_exit_time(mut self) -> Self {
        self.use_default_exit_time = true;
        self
    }

    pub fn fixed_duration(mut self, fixed: bool) -> Self {
        self.fixed_duration = fixed;
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn can_transition_to_self(mut self, allowed: bool) -> Self {
        self.can_transition_to_self = allowed;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }
}

/// Where a resolved transition leads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TransitionTarget {
    State(StateId),
    /// Entered through the machine's default state.
    StateMachine(ScopePath),
}

impl TransitionTarget {
    pub fn layer(&self) -> Option<&str> {
        match self {
            TransitionTarget::State(id) => id.layer(),
            TransitionTarget::StateMachine(path) => path.layer(),
        }
    }

    pub fn as_state(&self) -> Option<&StateId> {
        match self {
            TransitionTarget::State(id) => Some(id),
            TransitionTarget::StateMachine(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTransition {
    /// Never empty; declaration order of the hierarchy.
    pub source_states: Vec<StateId>,
    pub destination: TransitionTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration: Option<f32>,
    pub use_default_exit_time: bool,
    pub fixed_duration: bool,
    pub offset: f32,
    pub can_transition_to_self: bool,
    pub conditions: Vec<Condition>,
}

pub(crate) struct Resolver<'a> {
    index: &'a GraphIndex,
    cfg: &'a Config,
}

/// Where names are looked up for one transition.
#[derive(Copy, Clone, Debug)]
struct Search {
    /// Set by `in_layer`; nothing outside this layer is considered.
    pinned: Option<usize>,
    /// Layer of the resolved destination, searched first when nothing is pinned.
    near: Option<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a GraphIndex, cfg: &'a Config) -> Self {
        Self { index, cfg }
    }

    /// Resolve every transition, collecting failures into `diags`. Only fully
    /// resolved transitions are returned.
    pub fn resolve_all(
        &self,
        raw: &[Transition],
        diags: &mut Diagnostics,
    ) -> Vec<ResolvedTransition> {
        let mut out = Vec::with_capacity(raw.len());
        for (i, t) in raw.iter().enumerate() {
            match self.resolve(i, t) {
                Ok(resolved) => out.push(resolved),
                Err(errors) => diags.extend(errors),
            }
        }
        debug!("resolved {}/{} transition(s)", out.len(), raw.len());
        out
    }

    fn resolve(&self, i: usize, t: &Transition) -> Result<ResolvedTransition, Vec<GraphError>> {
        let path = format!("transitions[{i}]");
        let mut errors = Vec::new();

        let pinned = match &t.layer {
            Some(name) => match self.index.layer_index(name) {
                Some(l) => Some(l),
                None => {
                    return Err(vec![GraphError::UnknownScopeName {
                        path,
                        name: name.clone(),
                    }])
                }
            },
            None => None,
        };

        if let Some(exit_time) = t.exit_time {
            if !(0.0..=1.0).contains(&exit_time) {
                errors.push(GraphError::InvalidExitTime {
                    path: path.clone(),
                    exit_time,
                });
            }
        }

        let destination = t
            .destination
            .as_ref()
            .map(|name| self.destination(name, pinned, &path));
        let search = Search {
            pinned,
            near: match &destination {
                Some(Ok(dest)) => Some(self.index.layer_of(*dest)),
                _ => None,
            },
        };

        let mut sources = BTreeSet::new();
        if t.sources.is_empty() {
            errors.push(GraphError::MissingTransitionSource { path: path.clone() });
        }
        for spec in &t.sources {
            match self.expand(spec, search, &path) {
                Ok(states) => {
                    trace!("{path}: {spec:?} -> {} state(s)", states.len());
                    sources.extend(states);
                }
                Err(e) => errors.extend(e),
            }
        }

        let destination = match destination {
            Some(Ok(entry)) => Some(entry),
            Some(Err(e)) => {
                errors.push(e);
                None
            }
            None => {
                errors.push(GraphError::MissingTransitionDestination { path: path.clone() });
                None
            }
        };

        if let Some(dest) = destination {
            let dest_layer = self.index.layer_of(dest);
            if let Some(&off) = sources
                .iter()
                .find(|&&s| self.index.states[s].layer != dest_layer)
            {
                errors.push(GraphError::CrossLayerTransition {
                    path: path.clone(),
                    source_state: self.index.states[off].id.to_string(),
                    destination: self.index.describe(dest),
                });
            }
        }

        match destination {
            Some(dest) if errors.is_empty() => {
                let destination = match dest {
                    Entry::State(s) => TransitionTarget::State(self.index.states[s].id.clone()),
                    Entry::Scope(s) => {
                        TransitionTarget::StateMachine(self.index.scopes[s].path.clone())
                    }
                };
                let exit_time = match t.exit_time {
                    None if t.use_default_exit_time => Some(self.cfg.default_exit_time),
                    other => other,
                };
                Ok(ResolvedTransition {
                    source_states: sources
                        .into_iter()
                        .map(|s| self.index.states[s].id.clone())
                        .collect(),
                    destination,
                    exit_time,
                    transition_duration: t.transition_duration,
                    use_default_exit_time: t.use_default_exit_time,
                    fixed_duration: t.fixed_duration,
                    offset: t.offset,
                    can_transition_to_self: t.can_transition_to_self,
                    conditions: t.conditions.clone(),
                })
            }
            _ => Err(errors),
        }
    }

    fn expand(
        &self,
        spec: &SourceSpec,
        search: Search,
        path: &str,
    ) -> Result<Vec<usize>, Vec<GraphError>> {
        match spec {
            SourceSpec::Single(name) => self
                .single(name, search, path)
                .map(|s| vec![s])
                .map_err(|e| vec![e]),
            SourceSpec::Multiple(names) => {
                let mut states = Vec::with_capacity(names.len());
                let mut errors = Vec::new();
                for name in names {
                    match self.single(name, search, path) {
                        Ok(s) => states.push(s),
                        Err(e) => errors.push(e),
                    }
                }
                if errors.is_empty() {
                    Ok(states)
                } else {
                    Err(errors)
                }
            }
            SourceSpec::Recursive(name) => {
                self.recursive(name, search, path).map_err(|e| vec![e])
            }
        }
    }

    /// Entries named `name` accepted by `keep`. An unpinned search tries the
    /// destination's layer before every layer.
    fn find(&self, name: &str, search: Search, keep: impl Fn(Entry) -> bool) -> Vec<Entry> {
        if let (None, Some(near)) = (search.pinned, search.near) {
            let local = self.index.lookup_where(name, Some(near), &keep);
            if !local.is_empty() {
                return local;
            }
        }
        self.index.lookup_where(name, search.pinned, &keep)
    }

    /// Exactly one state named `name`.
    fn single(&self, name: &str, search: Search, path: &str) -> Result<usize, GraphError> {
        let states = self.find(name, search, |e| matches!(e, Entry::State(_)));
        match states.as_slice() {
            [] => Err(GraphError::UnknownStateName {
                path: path.to_string(),
                name: name.to_string(),
            }),
            [one] => Ok(one.slot()),
            many => Err(self.ambiguous(path, name, many)),
        }
    }

    /// Every leaf state below the layer or machine `name`. When no scope
    /// carries that name, a state of that name yields itself.
    fn recursive(&self, name: &str, search: Search, path: &str) -> Result<Vec<usize>, GraphError> {
        let scopes = self.find(name, search, |e| matches!(e, Entry::Scope(_)));
        match scopes.as_slice() {
            [one] => {
                let scope = &self.index.scopes[one.slot()];
                if scope.states.is_empty() {
                    Err(GraphError::EmptyRecursiveScope {
                        path: path.to_string(),
                        scope: scope.path.to_string(),
                    })
                } else {
                    Ok(scope.states.clone().collect())
                }
            }
            [] => match self.single(name, search, path) {
                Ok(s) => Ok(vec![s]),
                Err(GraphError::UnknownStateName { .. }) => Err(GraphError::UnknownScopeName {
                    path: path.to_string(),
                    name: name.to_string(),
                }),
                Err(e) => Err(e),
            },
            many => Err(self.ambiguous(path, name, many)),
        }
    }

    /// States take precedence; machines are considered when no state matches.
    fn destination(
        &self,
        name: &str,
        pinned: Option<usize>,
        path: &str,
    ) -> Result<Entry, GraphError> {
        let search = Search { pinned, near: None };
        match self.single(name, search, path) {
            Err(GraphError::UnknownStateName { .. }) if self.cfg.allow_machine_destinations => {}
            other => return other.map(Entry::State),
        }

        let machines = self.find(name, search, |e| {
            matches!(e, Entry::Scope(s) if !self.index.scopes[s].is_layer)
        });
        match machines.as_slice() {
            [] => Err(GraphError::UnknownStateName {
                path: path.to_string(),
                name: name.to_string(),
            }),
            [one] => {
                let scope = &self.index.scopes[one.slot()];
                if scope.states.is_empty() {
                    Err(GraphError::EmptyRecursiveScope {
                        path: path.to_string(),
                        scope: scope.path.to_string(),
                    })
                } else {
                    Ok(*one)
                }
            }
            many => Err(self.ambiguous(path, name, many)),
        }
    }

    fn ambiguous(&self, path: &str, name: &str, entries: &[Entry]) -> GraphError {
        GraphError::AmbiguousName {
            path: path.to_string(),
            name: name.to_string(),
            candidates: entries.iter().map(|&e| self.index.describe(e)).collect(),
        }
    }
}
