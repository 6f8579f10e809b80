//! Error taxonomy and aggregated diagnostics.
//!
//! Construction-time checks (parameter declaration, condition building) return a
//! single [`GraphError`] from the offending call. Whole-graph checks are collected
//! into [`Diagnostics`] so one build reports every problem at once.

use std::fmt;

use thiserror::Error;

use crate::blend::BlendKind;
use crate::parameters::ParameterKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("parameter '{name}' is already declared")]
    DuplicateParameterName { name: String },

    #[error("trigger parameter '{name}' cannot carry a default value")]
    InvalidDefaultForTrigger { name: String },

    #[error("parameter '{name}' is {expected:?} but its default is {found:?}")]
    DefaultKindMismatch {
        name: String,
        expected: ParameterKind,
        found: ParameterKind,
    },

    #[error("condition on '{parameter}' ({kind:?}): {reason}")]
    ConditionKindMismatch {
        parameter: String,
        kind: ParameterKind,
        reason: String,
    },

    #[error("{path}: unknown parameter '{parameter}'")]
    UnknownParameter { path: String, parameter: String },

    #[error("{path}: no state named '{name}'")]
    UnknownStateName { path: String, name: String },

    #[error("{path}: no layer or state machine named '{name}'")]
    UnknownScopeName { path: String, name: String },

    #[error("{path}: '{name}' is ambiguous, candidates: {}", .candidates.join(", "))]
    AmbiguousName {
        path: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error("{path}: scope '{scope}' contains no states")]
    EmptyRecursiveScope { path: String, scope: String },

    #[error("{path}: transition declares no source")]
    MissingTransitionSource { path: String },

    #[error("{path}: transition declares no destination")]
    MissingTransitionDestination { path: String },

    #[error("{path}: '{source_state}' and '{destination}' are in different layers")]
    CrossLayerTransition {
        path: String,
        source_state: String,
        destination: String,
    },

    #[error("{path}: exit time {exit_time} is outside [0, 1]")]
    InvalidExitTime { path: String, exit_time: f32 },

    #[error("{path}: name '{name}' is declared more than once")]
    DuplicateName { path: String, name: String },

    #[error("{path}: invalid name '{name}'")]
    InvalidName { path: String, name: String },

    #[error("{path}: default state '{name}' is not a descendant")]
    UnknownDefaultState { path: String, name: String },

    #[error("{path}: {kind:?} blend tree has no children")]
    EmptyBlendTree { path: String, kind: BlendKind },

    #[error("{path}: missing blend parameter ({slot})")]
    MissingBlendParameter { path: String, slot: String },

    #[error("{path}: child of a {kind:?} blend tree has no y threshold")]
    MissingBlendThreshold { path: String, kind: BlendKind },

    #[error("{path}: blend parameter '{parameter}' is {kind:?}, expected Float")]
    BlendParameterKindMismatch {
        path: String,
        parameter: String,
        kind: ParameterKind,
    },
}

impl GraphError {
    /// Scope path or location label the error refers to.
    pub fn path(&self) -> &str {
        match self {
            GraphError::DuplicateParameterName { name }
            | GraphError::InvalidDefaultForTrigger { name }
            | GraphError::DefaultKindMismatch { name, .. } => name,
            GraphError::ConditionKindMismatch { parameter, .. } => parameter,
            GraphError::UnknownParameter { path, .. }
            | GraphError::UnknownStateName { path, .. }
            | GraphError::UnknownScopeName { path, .. }
            | GraphError::AmbiguousName { path, .. }
            | GraphError::EmptyRecursiveScope { path, .. }
            | GraphError::MissingTransitionSource { path }
            | GraphError::MissingTransitionDestination { path }
            | GraphError::CrossLayerTransition { path, .. }
            | GraphError::InvalidExitTime { path, .. }
            | GraphError::DuplicateName { path, .. }
            | GraphError::InvalidName { path, .. }
            | GraphError::UnknownDefaultState { path, .. }
            | GraphError::EmptyBlendTree { path, .. }
            | GraphError::MissingBlendParameter { path, .. }
            | GraphError::MissingBlendThreshold { path, .. }
            | GraphError::BlendParameterKindMismatch { path, .. } => path,
        }
    }
}

/// Ordered list of every problem found while building a graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    errors: Vec<GraphError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: GraphError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphError> {
        self.errors.iter()
    }

    pub fn errors(&self) -> &[GraphError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<GraphError> {
        self.errors
    }
}

impl Extend<GraphError> for Diagnostics {
    fn extend<T: IntoIterator<Item = GraphError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = GraphError;
    type IntoIter = std::vec::IntoIter<GraphError>;
    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a GraphError;
    type IntoIter = std::slice::Iter<'a, GraphError>;
    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problem(s) in animator graph", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
