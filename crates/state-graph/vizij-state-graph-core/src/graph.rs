//! Layer → state machine → state hierarchy.
//!
//! These types are both the authoring surface and the tree that ends up in the
//! IR. Builders consume and return `self`; nesting a machine inside its parent
//! with [`StateMachine::child`] moves it, which closes the scope. Ownership is
//! strictly tree-shaped.
//!
//! ```
//! use vizij_state_graph_core::{layer, state, state_machine};
//!
//! let base = layer("Base")
//!     .default_state("Idle")
//!     .tag("BASE")
//!     .child(state("Idle", "clips/idle"))
//!     .child(state_machine("Air").tag("AIR").child(state("Jump", "clips/jump")));
//! assert_eq!(base.root.children.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::blend::BlendTree;
use crate::ids::{ScopePath, StateId};
use crate::motion::{AvatarMaskRef, MotionRef};

/// What a state plays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StateMotion {
    /// Nothing; lower layers keep control.
    #[default]
    None,
    Clip(MotionRef),
    Blend(BlendTree),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    #[serde(default)]
    pub motion: StateMotion,
    /// Effective tag, filled in by tag propagation.
    #[serde(default)]
    pub tag: String,
}

impl State {
    pub fn new(name: impl Into<String>, motion: StateMotion) -> Self {
        Self {
            name: name.into(),
            motion,
            tag: String::new(),
        }
    }
}

/// Child of a layer or state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    State(State),
    StateMachine(StateMachine),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::State(s) => &s.name,
            Node::StateMachine(m) => &m.name,
        }
    }
}

impl From<State> for Node {
    fn from(state: State) -> Self {
        Node::State(state)
    }
}

impl From<StateMachine> for Node {
    fn from(machine: StateMachine) -> Self {
        Node::StateMachine(machine)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMachine {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Declared default, by bare or qualified name. Checked at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_tag: Option<String>,
    /// Effective tag, filled in by tag propagation.
    #[serde(default)]
    pub tag: String,
    /// Default state resolved to a concrete id at build time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_default: Option<StateId>,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn default_state(mut self, name: impl Into<String>) -> Self {
        self.default_state = Some(name.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.explicit_tag = Some(tag.into());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Visit every leaf state below this machine in declaration order
    /// (depth-first), passing the state's id.
    pub fn visit_states<'a>(&'a self, scope: &ScopePath, f: &mut impl FnMut(StateId, &'a State)) {
        for child in &self.children {
            match child {
                Node::State(s) => f(StateId::new(scope.clone(), s.name.clone()), s),
                Node::StateMachine(m) => m.visit_states(&scope.child(m.name.clone()), f),
            }
        }
    }

    /// Nested machine by name among the direct children.
    pub fn machine(&self, name: &str) -> Option<&StateMachine> {
        self.children.iter().find_map(|n| match n {
            Node::StateMachine(m) if m.name == name => Some(m),
            _ => None,
        })
    }

    /// State by name among the direct children.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.children.iter().find_map(|n| match n {
            Node::State(s) if s.name == name => Some(s),
            _ => None,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendingMode {
    #[default]
    Override,
    Additive,
}

/// Top-level scope. Layers are evaluated in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer contents; `root.name` is the layer name.
    pub root: StateMachine,
    #[serde(default)]
    pub blending_mode: BlendingMode,
    pub weight: f32,
    #[serde(default)]
    pub sync_timing: bool,
    #[serde(default)]
    pub ik_pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_mask: Option<AvatarMaskRef>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            root: StateMachine::new(name),
            blending_mode: BlendingMode::Override,
            weight: 1.0,
            sync_timing: false,
            ik_pass: false,
            avatar_mask: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn default_state(mut self, name: impl Into<String>) -> Self {
        self.root.default_state = Some(name.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.root.explicit_tag = Some(tag.into());
        self
    }

    pub fn blending_mode(mut self, mode: BlendingMode) -> Self {
        self.blending_mode = mode;
        self
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn sync_timing(mut self, enabled: bool) -> Self {
        self.sync_timing = enabled;
        self
    }

    pub fn ik_pass(mut self, enabled: bool) -> Self {
        self.ik_pass = enabled;
        self
    }

    pub fn avatar_mask(mut self, mask: impl Into<AvatarMaskRef>) -> Self {
        self.avatar_mask = Some(mask.into());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.root = self.root.child(node);
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.root = self.root.children(nodes);
        self
    }

    pub fn scope(&self) -> ScopePath {
        ScopePath::root(self.root.name.clone())
    }

    /// Every leaf state of the layer in declaration order.
    pub fn states(&self) -> Vec<(StateId, &State)> {
        let mut out = Vec::new();
        self.root.visit_states(&self.scope(), &mut |id, s| out.push((id, s)));
        out
    }
}

pub fn layer(name: impl Into<String>) -> Layer {
    Layer::new(name)
}

pub fn state_machine(name: impl Into<String>) -> StateMachine {
    StateMachine::new(name)
}

pub fn state(name: impl Into<String>, motion: impl Into<MotionRef>) -> State {
    State::new(name, StateMotion::Clip(motion.into()))
}

/// State with no motion.
pub fn empty_state(name: impl Into<String>) -> State {
    State::new(name, StateMotion::None)
}

pub fn blend_state(name: impl Into<String>, tree: BlendTree) -> State {
    State::new(name, StateMotion::Blend(tree))
}
