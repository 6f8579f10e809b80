//! Typed transition conditions.
//!
//! Conditions are built from a [`ParameterHandle`] and checked against the
//! parameter's kind immediately, so a mismatch surfaces at the call that
//! introduced it. Each parameter kind has its own variant; backends lower them
//! to flat `(parameter, mode, threshold)` records with [`Condition::to_record`].

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::ids::ParameterHandle;
use crate::parameters::ParameterKind;

/// Comparator requested by the author. Which ones are legal depends on the
/// parameter kind:
/// - Float: `Greater`, `Less` with a numeric operand
/// - Int: `Greater`, `Less`, `Equals`, `NotEquals` with an integer operand
/// - Bool: `Equals`, `NotEquals` with a bool operand
/// - Trigger: `Fired` with no operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Greater,
    Less,
    Equals,
    NotEquals,
    Fired,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl From<f32> for Operand {
    fn from(v: f32) -> Self {
        Operand::Float(v)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Int(v)
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Bool(v)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatMode {
    Greater,
    Less,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntMode {
    Greater,
    Less,
    Equals,
    NotEquals,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Condition {
    Float {
        parameter: String,
        mode: FloatMode,
        threshold: f32,
    },
    Int {
        parameter: String,
        mode: IntMode,
        value: i32,
    },
    Bool {
        parameter: String,
        expected: bool,
    },
    Trigger {
        parameter: String,
    },
}

/// Flat condition mode understood by engine backends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMode {
    If,
    IfNot,
    Greater,
    Less,
    Equals,
    NotEquals,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub parameter: String,
    pub mode: ConditionMode,
    pub threshold: f32,
}

impl Condition {
    pub fn parameter(&self) -> &str {
        match self {
            Condition::Float { parameter, .. }
            | Condition::Int { parameter, .. }
            | Condition::Bool { parameter, .. }
            | Condition::Trigger { parameter } => parameter,
        }
    }

    /// Parameter kind this condition reads.
    pub fn kind(&self) -> ParameterKind {
        match self {
            Condition::Float { .. } => ParameterKind::Float,
            Condition::Int { .. } => ParameterKind::Int,
            Condition::Bool { .. } => ParameterKind::Bool,
            Condition::Trigger { .. } => ParameterKind::Trigger,
        }
    }

    pub fn to_record(&self) -> ConditionRecord {
        let (mode, threshold) = match self {
            Condition::Float { mode, threshold, .. } => match mode {
                FloatMode::Greater => (ConditionMode::Greater, *threshold),
                FloatMode::Less => (ConditionMode::Less, *threshold),
            },
            Condition::Int { mode, value, .. } => {
                let mode = match mode {
                    IntMode::Greater => ConditionMode::Greater,
                    IntMode::Less => ConditionMode::Less,
                    IntMode::Equals => ConditionMode::Equals,
                    IntMode::NotEquals => ConditionMode::NotEquals,
                };
                (mode, *value as f32)
            }
            Condition::Bool { expected: true, .. } => (ConditionMode::If, 0.0),
            Condition::Bool { expected: false, .. } => (ConditionMode::IfNot, 0.0),
            Condition::Trigger { .. } => (ConditionMode::If, 0.0),
        };
        ConditionRecord {
            parameter: self.parameter().to_string(),
            mode,
            threshold,
        }
    }
}

/// Build a condition on `param`, rejecting comparator/operand pairs the
/// parameter's kind does not support.
pub fn condition(
    param: &ParameterHandle,
    comparator: Comparator,
    operand: Option<Operand>,
) -> Result<Condition, GraphError> {
    let parameter = param.name().to_string();
    let built = match (param.kind(), comparator, operand) {
        (ParameterKind::Float, Comparator::Greater | Comparator::Less, Some(op)) => {
            let threshold = match op {
                Operand::Float(v) => v,
                Operand::Int(v) => v as f32,
                Operand::Bool(_) => {
                    return Err(mismatch(param, "Float parameters need a numeric operand"))
                }
            };
            let mode = if comparator == Comparator::Greater {
                FloatMode::Greater
            } else {
                FloatMode::Less
            };
            Condition::Float {
                parameter,
                mode,
                threshold,
            }
        }
        (ParameterKind::Float, _, None) => {
            return Err(mismatch(param, "Float parameters need a numeric operand"))
        }
        (ParameterKind::Float, _, Some(_)) => {
            return Err(mismatch(param, "Float parameters only support Greater and Less"))
        }
        (ParameterKind::Int, cmp, Some(Operand::Int(value))) => {
            let mode = match cmp {
                Comparator::Greater => IntMode::Greater,
                Comparator::Less => IntMode::Less,
                Comparator::Equals => IntMode::Equals,
                Comparator::NotEquals => IntMode::NotEquals,
                Comparator::Fired => {
                    return Err(mismatch(param, "Fired is only valid for Trigger parameters"))
                }
            };
            Condition::Int {
                parameter,
                mode,
                value,
            }
        }
        (ParameterKind::Int, _, _) => {
            return Err(mismatch(param, "Int parameters need an integer operand"))
        }
        (ParameterKind::Bool, Comparator::Equals, Some(Operand::Bool(b))) => Condition::Bool {
            parameter,
            expected: b,
        },
        (ParameterKind::Bool, Comparator::NotEquals, Some(Operand::Bool(b))) => Condition::Bool {
            parameter,
            expected: !b,
        },
        (ParameterKind::Bool, _, _) => {
            return Err(mismatch(
                param,
                "Bool parameters support Equals or NotEquals with a bool operand",
            ))
        }
        (ParameterKind::Trigger, Comparator::Fired, None) => Condition::Trigger { parameter },
        (ParameterKind::Trigger, _, _) => {
            return Err(mismatch(param, "Trigger parameters only support Fired with no operand"))
        }
    };
    Ok(built)
}

pub fn float_condition(
    param: &ParameterHandle,
    threshold: f32,
    mode: FloatMode,
) -> Result<Condition, GraphError> {
    let cmp = match mode {
        FloatMode::Greater => Comparator::Greater,
        FloatMode::Less => Comparator::Less,
    };
    condition(param, cmp, Some(Operand::Float(threshold)))
}

pub fn int_condition(
    param: &ParameterHandle,
    value: i32,
    mode: IntMode,
) -> Result<Condition, GraphError> {
    let cmp = match mode {
        IntMode::Greater => Comparator::Greater,
        IntMode::Less => Comparator::Less,
        IntMode::Equals => Comparator::Equals,
        IntMode::NotEquals => Comparator::NotEquals,
    };
    condition(param, cmp, Some(Operand::Int(value)))
}

pub fn bool_condition(param: &ParameterHandle, expected: bool) -> Result<Condition, GraphError> {
    condition(param, Comparator::Equals, Some(Operand::Bool(expected)))
}

pub fn trigger_condition(param: &ParameterHandle) -> Result<Condition, GraphError> {
    condition(param, Comparator::Fired, None)
}

fn mismatch(param: &ParameterHandle, reason: &str) -> GraphError {
    GraphError::ConditionKindMismatch {
        parameter: param.name().to_string(),
        kind: param.kind(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterRegistry;

    fn registry() -> (ParameterRegistry, [ParameterHandle; 4]) {
        let mut reg = ParameterRegistry::new();
        let speed = reg.float("Speed", 1.0).unwrap();
        let grounded = reg.bool("IsGrounded", true).unwrap();
        let index = reg.int("IdleIndex", 0).unwrap();
        let jump = reg.trigger("JumpTrigger").unwrap();
        (reg, [speed, grounded, index, jump])
    }

    #[test]
    fn float_accepts_ordering_only() {
        let (_, [speed, ..]) = registry();
        let c = float_condition(&speed, 5.0, FloatMode::Greater).unwrap();
        assert_eq!(c.kind(), ParameterKind::Float);
        assert_eq!(c.to_record().mode, ConditionMode::Greater);

        let int_operand = condition(&speed, Comparator::Less, Some(Operand::Int(2))).unwrap();
        assert_eq!(int_operand.to_record().threshold, 2.0);

        let err = condition(&speed, Comparator::Equals, Some(Operand::Float(1.0))).unwrap_err();
        assert!(matches!(
            err,
            GraphError::ConditionKindMismatch { kind: ParameterKind::Float, .. }
        ));
        assert!(condition(&speed, Comparator::Greater, None).is_err());
    }

    #[test]
    fn int_supports_equality() {
        let (_, [_, _, index, _]) = registry();
        let c = int_condition(&index, 3, IntMode::NotEquals).unwrap();
        let rec = c.to_record();
        assert_eq!(rec.mode, ConditionMode::NotEquals);
        assert_eq!(rec.threshold, 3.0);
        assert!(condition(&index, Comparator::Equals, Some(Operand::Float(3.0))).is_err());
        assert!(condition(&index, Comparator::Fired, Some(Operand::Int(1))).is_err());
    }

    #[test]
    fn bool_lowers_to_if_and_if_not() {
        let (_, [_, grounded, _, _]) = registry();
        let on = bool_condition(&grounded, true).unwrap();
        let off = condition(&grounded, Comparator::NotEquals, Some(Operand::Bool(true))).unwrap();
        assert_eq!(on.to_record().mode, ConditionMode::If);
        assert_eq!(off.to_record().mode, ConditionMode::IfNot);
        assert!(condition(&grounded, Comparator::Greater, Some(Operand::Bool(true))).is_err());
    }

    #[test]
    fn trigger_takes_no_operand() {
        let (_, [speed, _, _, jump]) = registry();
        let c = trigger_condition(&jump).unwrap();
        assert_eq!(c, Condition::Trigger { parameter: "JumpTrigger".into() });
        assert!(condition(&jump, Comparator::Fired, Some(Operand::Bool(true))).is_err());
        assert!(trigger_condition(&speed).is_err());
        assert!(bool_condition(&jump, true).is_err());
    }
}
