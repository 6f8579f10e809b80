//! Parameter registry: named, typed inputs that conditions and blend trees read.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::ids::ParameterHandle;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Float,
    Bool,
    Int,
    Trigger,
}

/// Default value of a parameter. Triggers have none.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ParameterValue {
    Float(f32),
    Bool(bool),
    Int(i32),
}

impl ParameterValue {
    #[inline]
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Int(_) => ParameterKind::Int,
        }
    }

    /// Zero value for `kind`, or `None` for triggers.
    pub fn zero(kind: ParameterKind) -> Option<Self> {
        match kind {
            ParameterKind::Float => Some(ParameterValue::Float(0.0)),
            ParameterKind::Bool => Some(ParameterValue::Bool(false)),
            ParameterKind::Int => Some(ParameterValue::Int(0)),
            ParameterKind::Trigger => None,
        }
    }
}

impl From<f32> for ParameterValue {
    fn from(v: f32) -> Self {
        ParameterValue::Float(v)
    }
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Int(v)
    }
}

/// A declared parameter. `default` is always set except for triggers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParameterValue>,
}

/// Parameters declared for one graph, in declaration order.
///
/// Each build owns its registry; there is no shared global table.
#[derive(Clone, Debug, Default)]
pub struct ParameterRegistry {
    params: IndexMap<String, Parameter>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter. Omitted defaults become the kind's zero value.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        kind: ParameterKind,
        default: Option<ParameterValue>,
    ) -> Result<ParameterHandle, GraphError> {
        let name = name.into();
        if self.params.contains_key(&name) {
            return Err(GraphError::DuplicateParameterName { name });
        }
        let default = match (kind, default) {
            (ParameterKind::Trigger, Some(_)) => {
                return Err(GraphError::InvalidDefaultForTrigger { name });
            }
            (_, None) => ParameterValue::zero(kind),
            (_, Some(value)) if value.kind() == kind => Some(value),
            (_, Some(value)) => {
                return Err(GraphError::DefaultKindMismatch {
                    name,
                    expected: kind,
                    found: value.kind(),
                });
            }
        };

        let index = self.params.len() as u32;
        self.params.insert(
            name.clone(),
            Parameter {
                name: name.clone(),
                kind,
                default,
            },
        );
        Ok(ParameterHandle { index, name, kind })
    }

    pub fn float(
        &mut self,
        name: impl Into<String>,
        default: f32,
    ) -> Result<ParameterHandle, GraphError> {
        self.declare(name, ParameterKind::Float, Some(ParameterValue::Float(default)))
    }

    pub fn bool(
        &mut self,
        name: impl Into<String>,
        default: bool,
    ) -> Result<ParameterHandle, GraphError> {
        self.declare(name, ParameterKind::Bool, Some(ParameterValue::Bool(default)))
    }

    pub fn int(
        &mut self,
        name: impl Into<String>,
        default: i32,
    ) -> Result<ParameterHandle, GraphError> {
        self.declare(name, ParameterKind::Int, Some(ParameterValue::Int(default)))
    }

    pub fn trigger(&mut self, name: impl Into<String>) -> Result<ParameterHandle, GraphError> {
        self.declare(name, ParameterKind::Trigger, None)
    }

    /// Parameter behind `handle`, if the handle came from this registry.
    pub fn get(&self, handle: &ParameterHandle) -> Option<&Parameter> {
        self.params
            .get_index(handle.index())
            .map(|(_, p)| p)
            .filter(|p| p.name == handle.name && p.kind == handle.kind)
    }

    pub fn by_name(&self, name: &str) -> Option<&Parameter> {
        self.params.get(name)
    }

    pub fn handle(&self, name: &str) -> Option<ParameterHandle> {
        self.params
            .get_full(name)
            .map(|(index, _, p)| ParameterHandle {
                index: index as u32,
                name: p.name.clone(),
                kind: p.kind,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Consume the registry into the IR parameter table.
    pub fn into_table(self) -> Vec<Parameter> {
        self.params.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_fills_zero_defaults() {
        let mut reg = ParameterRegistry::new();
        let speed = reg.declare("Speed", ParameterKind::Float, None).unwrap();
        let jump = reg.trigger("JumpTrigger").unwrap();
        assert_eq!(speed.index(), 0);
        assert_eq!(jump.index(), 1);
        assert_eq!(
            reg.get(&speed).unwrap().default,
            Some(ParameterValue::Float(0.0))
        );
        assert_eq!(reg.get(&jump).unwrap().default, None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = ParameterRegistry::new();
        reg.float("Speed", 1.0).unwrap();
        let err = reg.bool("Speed", true).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateParameterName {
                name: "Speed".into()
            }
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn trigger_rejects_default() {
        let mut reg = ParameterRegistry::new();
        let err = reg
            .declare("Fire", ParameterKind::Trigger, Some(ParameterValue::Bool(true)))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidDefaultForTrigger { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn default_must_match_kind() {
        let mut reg = ParameterRegistry::new();
        let err = reg
            .declare("Index", ParameterKind::Int, Some(ParameterValue::Float(1.5)))
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::DefaultKindMismatch {
                expected: ParameterKind::Int,
                found: ParameterKind::Float,
                ..
            }
        ));
    }

    #[test]
    fn foreign_handles_do_not_resolve() {
        let mut a = ParameterRegistry::new();
        let mut b = ParameterRegistry::new();
        a.float("Speed", 0.0).unwrap();
        let turn = b.float("Turn", 0.5).unwrap();
        assert!(a.get(&turn).is_none());
        assert_eq!(a.handle("Speed").unwrap().kind(), ParameterKind::Float);
        let table = a.into_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].name, "Speed");
    }
}
