//! Build configuration for vizij-state-graph-core.

use serde::{Deserialize, Serialize};

/// Options applied while resolving and emitting a graph.
/// Defaults match what most engines assume for an authored controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exit time written into transitions declared with `default_exit_time()`
    /// that carry no explicit exit time.
    pub default_exit_time: f32,

    /// When a layer or state machine declares no default state, record its
    /// first leaf state (declaration order) as the effective default.
    pub implicit_default_state: bool,

    /// Allow a transition destination to name a state machine. When disabled,
    /// machine names are not considered when resolving destinations.
    pub allow_machine_destinations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_exit_time: 0.75,
            implicit_default_state: true,
            allow_machine_destinations: true,
        }
    }
}
