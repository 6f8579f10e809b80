//! Blend trees: recursive compositions of motions weighted by float parameters.
//! - 1D trees pick/blend children by `threshold_x` along one parameter
//! - 2D trees place children at `(threshold_x, threshold_y)` over two parameters
//! - Direct trees weight every child by its own parameter
//!
//! Children are moved into their parent on insertion, so a tree can never share
//! a node between two parents.

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostics, GraphError};
use crate::ids::ParameterHandle;
use crate::motion::MotionRef;
use crate::parameters::{ParameterKind, ParameterRegistry};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendKind {
    #[serde(rename = "1d")]
    Simple1D,
    #[serde(rename = "2d_simple_directional")]
    SimpleDirectional2D,
    #[serde(rename = "2d_freeform_directional")]
    FreeformDirectional2D,
    #[serde(rename = "2d_freeform_cartesian")]
    FreeformCartesian2D,
    Direct,
}

impl BlendKind {
    pub fn is_2d(self) -> bool {
        matches!(
            self,
            BlendKind::SimpleDirectional2D
                | BlendKind::FreeformDirectional2D
                | BlendKind::FreeformCartesian2D
        )
    }
}

/// What a blend child plays: a clip or a nested tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BlendMotion {
    Clip(MotionRef),
    Tree(Box<BlendTree>),
}

/// One weighted entry of a blend tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendChild {
    pub motion: BlendMotion,
    #[serde(default)]
    pub threshold_x: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_y: Option<f32>,
    /// Weight parameter for children of a Direct tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_parameter: Option<String>,
    #[serde(default = "one")]
    pub time_scale: f32,
}

fn one() -> f32 {
    1.0
}

impl BlendChild {
    fn new(motion: BlendMotion) -> Self {
        Self {
            motion,
            threshold_x: 0.0,
            threshold_y: None,
            direct_parameter: None,
            time_scale: 1.0,
        }
    }

    pub fn threshold_x(mut self, x: f32) -> Self {
        self.threshold_x = x;
        self
    }

    pub fn threshold_y(mut self, y: f32) -> Self {
        self.threshold_y = Some(y);
        self
    }

    pub fn direct_parameter(mut self, param: &ParameterHandle) -> Self {
        self.direct_parameter = Some(param.name().to_string());
        self
    }

    pub fn time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale;
        self
    }
}

impl From<BlendTree> for BlendChild {
    fn from(tree: BlendTree) -> Self {
        BlendChild::new(BlendMotion::Tree(Box::new(tree)))
    }
}

pub fn clip_1d(motion: impl Into<MotionRef>, threshold: f32) -> BlendChild {
    BlendChild::new(BlendMotion::Clip(motion.into())).threshold_x(threshold)
}

pub fn clip_2d(motion: impl Into<MotionRef>, x: f32, y: f32) -> BlendChild {
    BlendChild::new(BlendMotion::Clip(motion.into()))
        .threshold_x(x)
        .threshold_y(y)
}

pub fn clip_direct(motion: impl Into<MotionRef>, param: &ParameterHandle) -> BlendChild {
    BlendChild::new(BlendMotion::Clip(motion.into())).direct_parameter(param)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendTree {
    pub kind: BlendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_y: Option<String>,
    #[serde(default)]
    pub automatic_thresholds: bool,
    #[serde(default)]
    pub children: Vec<BlendChild>,
}

impl BlendTree {
    fn with_params(
        kind: BlendKind,
        x: Option<&ParameterHandle>,
        y: Option<&ParameterHandle>,
    ) -> Self {
        Self {
            kind,
            parameter_x: x.map(|p| p.name().to_string()),
            parameter_y: y.map(|p| p.name().to_string()),
            automatic_thresholds: false,
            children: Vec::new(),
        }
    }

    pub fn one_d(param: &ParameterHandle) -> Self {
        Self::with_params(BlendKind::Simple1D, Some(param), None)
    }

    pub fn simple_directional_2d(x: &ParameterHandle, y: &ParameterHandle) -> Self {
        Self::with_params(BlendKind::SimpleDirectional2D, Some(x), Some(y))
    }

    pub fn freeform_directional_2d(x: &ParameterHandle, y: &ParameterHandle) -> Self {
        Self::with_params(BlendKind::FreeformDirectional2D, Some(x), Some(y))
    }

    pub fn freeform_cartesian_2d(x: &ParameterHandle, y: &ParameterHandle) -> Self {
        Self::with_params(BlendKind::FreeformCartesian2D, Some(x), Some(y))
    }

    pub fn direct() -> Self {
        Self::with_params(BlendKind::Direct, None, None)
    }

    pub fn automatic_thresholds(mut self, enabled: bool) -> Self {
        self.automatic_thresholds = enabled;
        self
    }

    pub fn child(mut self, child: impl Into<BlendChild>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<BlendChild>,
    {
        self.add_children(children);
        self
    }

    /// Append children to an already constructed tree.
    pub fn add_children<I, C>(&mut self, children: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<BlendChild>,
    {
        self.children.extend(children.into_iter().map(Into::into));
    }

    /// Wrap this tree as a child positioned at `x` in its parent.
    pub fn threshold_x(self, x: f32) -> BlendChild {
        BlendChild::from(self).threshold_x(x)
    }

    /// Wrap this tree as a child positioned at `(x, y)` in its parent.
    pub fn threshold_xy(self, x: f32, y: f32) -> BlendChild {
        BlendChild::from(self).threshold_x(x).threshold_y(y)
    }

    /// Number of clips reachable from this tree.
    pub fn clip_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| match &c.motion {
                BlendMotion::Clip(_) => 1,
                BlendMotion::Tree(t) => t.clip_count(),
            })
            .sum()
    }
}

/// Check structural rules of `tree` and every nested tree.
pub(crate) fn validate_tree(
    tree: &BlendTree,
    path: &str,
    registry: &ParameterRegistry,
    out: &mut Diagnostics,
) {
    if tree.children.is_empty() && tree.kind != BlendKind::Direct {
        out.push(GraphError::EmptyBlendTree {
            path: path.to_string(),
            kind: tree.kind,
        });
    }

    if tree.kind != BlendKind::Direct {
        check_param(tree.parameter_x.as_deref(), "x", path, registry, out);
    }
    if tree.kind.is_2d() {
        check_param(tree.parameter_y.as_deref(), "y", path, registry, out);
    }

    for (i, child) in tree.children.iter().enumerate() {
        let child_path = format!("{path}[{i}]");
        if tree.kind == BlendKind::Direct {
            check_param(
                child.direct_parameter.as_deref(),
                "direct",
                &child_path,
                registry,
                out,
            );
        }
        if tree.kind.is_2d() && child.threshold_y.is_none() {
            out.push(GraphError::MissingBlendThreshold {
                path: child_path.clone(),
                kind: tree.kind,
            });
        }
        if let BlendMotion::Tree(nested) = &child.motion {
            validate_tree(nested, &child_path, registry, out);
        }
    }
}

fn check_param(
    name: Option<&str>,
    slot: &str,
    path: &str,
    registry: &ParameterRegistry,
    out: &mut Diagnostics,
) {
    let Some(name) = name else {
        out.push(GraphError::MissingBlendParameter {
            path: path.to_string(),
            slot: slot.to_string(),
        });
        return;
    };
    match registry.by_name(name) {
        None => out.push(GraphError::UnknownParameter {
            path: path.to_string(),
            parameter: name.to_string(),
        }),
        Some(p) if p.kind != ParameterKind::Float => {
            out.push(GraphError::BlendParameterKindMismatch {
                path: path.to_string(),
                parameter: name.to_string(),
                kind: p.kind,
            })
        }
        Some(_) => {}
    }
}
