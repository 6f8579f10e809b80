//! Tag propagation.
//!
//! A node's effective tag is its own explicit tag, else the effective tag of
//! its parent. Layers without a tag start from the empty string.

use crate::graph::{Layer, Node, StateMachine};

/// Assign effective tags to every machine and state below `layers`.
pub fn propagate_tags(layers: &mut [Layer]) {
    for layer in layers {
        apply(&mut layer.root, "");
    }
}

fn apply(machine: &mut StateMachine, inherited: &str) {
    machine.tag = machine
        .explicit_tag
        .clone()
        .unwrap_or_else(|| inherited.to_string());
    for child in &mut machine.children {
        match child {
            Node::State(s) => s.tag = machine.tag.clone(),
            Node::StateMachine(m) => apply(m, &machine.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{layer, state, state_machine};

    #[test]
    fn nearest_explicit_tag_wins() {
        let mut layers = vec![
            layer("Base").tag("BASE_LAYER_TAG").children([
                state_machine("OnGround").child(state("Run", "run")).child(
                    state_machine("RandomIdles")
                        .tag("RANDOM_IDLES_TAG")
                        .child(state("RandomIdle_0", "idle0")),
                ),
                state_machine("JumpStates")
                    .tag("JUMP_TAG")
                    .child(state("Jump", "jump")),
            ]),
            layer("UpperBody").child(state("Throw", "throw")),
        ];
        propagate_tags(&mut layers);

        let tags: Vec<(String, String)> = layers
            .iter()
            .flat_map(|l| l.states())
            .map(|(id, s)| (id.to_string(), s.tag.clone()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("Base/OnGround/Run".to_string(), "BASE_LAYER_TAG".to_string()),
                (
                    "Base/OnGround/RandomIdles/RandomIdle_0".to_string(),
                    "RANDOM_IDLES_TAG".to_string()
                ),
                ("Base/JumpStates/Jump".to_string(), "JUMP_TAG".to_string()),
                ("UpperBody/Throw".to_string(), String::new()),
            ]
        );
        assert_eq!(
            layers[0].root.machine("OnGround").unwrap().tag,
            "BASE_LAYER_TAG"
        );
    }

    #[test]
    fn untagged_layer_passes_machine_tag_down() {
        let mut layers = vec![layer("Base").child(
            state_machine("Crouched")
                .tag("CROUCH_TAG")
                .child(state("CrouchIdle", "crouch_idle")),
        )];
        propagate_tags(&mut layers);
        let crouched = layers[0].root.machine("Crouched").unwrap();
        assert_eq!(crouched.state("CrouchIdle").unwrap().tag, "CROUCH_TAG");
        assert_eq!(layers[0].root.tag, "");
    }
}
