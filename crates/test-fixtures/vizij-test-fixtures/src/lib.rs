//! Canonical animator graphs shared by tests, examples and benches.
//!
//! Each fixture returns an unbuilt [`AnimatorBuilder`] so callers can add to it
//! or inspect the declarations before calling `build()`.

use anyhow::{anyhow, Result};
use vizij_state_graph_core::{
    blend_state, bool_condition, clip_1d, empty_state, float_condition, int_condition, layer,
    state, state_machine, transition, trigger_condition, AnimatorBuilder, BlendTree,
    BlendingMode, FloatMode, IntMode, MotionRef, Node, ParameterHandle, Transition,
};

/// Speed above which the advanced and basic graphs switch to running.
pub const SPEED_FOR_RUN: f32 = 5.0;

/// Motion handle for a named clip, shaped like a host asset path.
pub fn motion(name: &str) -> MotionRef {
    MotionRef::new(format!("motions/{name}.anim"))
}

type Fixture = fn() -> Result<AnimatorBuilder>;

const FIXTURES: &[(&str, Fixture)] = &[
    ("basic", animators::basic),
    ("advanced", advanced_default),
    ("blend-tree", animators::blend_tree),
    ("ui-button", ui_button_default),
];

fn advanced_default() -> Result<AnimatorBuilder> {
    animators::advanced(3)
}

fn ui_button_default() -> Result<AnimatorBuilder> {
    animators::ui_button(0.35)
}

fn lookup(name: &str) -> Result<Fixture> {
    FIXTURES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| anyhow!("unknown animator fixture '{name}'"))
}

pub mod animators {
    use super::*;

    pub fn keys() -> Vec<String> {
        FIXTURES.iter().map(|(k, _)| k.to_string()).collect()
    }

    pub fn load(name: &str) -> Result<AnimatorBuilder> {
        let fixture = lookup(name)?;
        fixture()
    }

    /// Idle / Run / Jump on one layer.
    pub fn basic() -> Result<AnimatorBuilder> {
        let mut b = AnimatorBuilder::new();
        let speed = b.float_param("Speed", 1.0)?;
        let jump = b.trigger_param("JumpTrigger")?;

        Ok(b.with_layer(layer("Base").default_state("Idle").children([
            state("Idle", motion("idle")),
            state("Run", motion("run")),
            state("Jump", motion("jump")),
        ]))
        .with_transition(
            transition()
                .source_multiple(["Idle", "Run"])
                .destination("Jump")
                .condition(trigger_condition(&jump)?),
        )
        .with_transition(transition().source("Jump").destination("Idle").exit_time(0.9))
        .with_transition(
            transition()
                .source("Idle")
                .destination("Run")
                .condition(float_condition(&speed, SPEED_FOR_RUN, FloatMode::Greater)?),
        )
        .with_transition(
            transition()
                .source("Run")
                .destination("Idle")
                .condition(float_condition(&speed, SPEED_FOR_RUN, FloatMode::Less)?),
        ))
    }

    /// Nested machines, tags, a masked upper-body layer and generated idles.
    pub fn advanced(idle_count: usize) -> Result<AnimatorBuilder> {
        if idle_count == 0 {
            return Err(anyhow!("advanced fixture needs at least one idle"));
        }
        let mut b = AnimatorBuilder::new();
        let speed = b.float_param("Speed", 0.0)?;
        let grounded = b.bool_param("IsGrounded", true)?;
        let jump = b.trigger_param("JumpTrigger")?;
        let crouched = b.bool_param("IsCrouched", false)?;
        let idle_index = b.int_param("CurrentRandomIdleIndex", 0)?;
        let throw = b.trigger_param("ThrowTrigger")?;

        let base = layer("Base")
            .tag("BASE_LAYER_TAG")
            .child(
                state_machine("OnGround")
                    .child(
                        state_machine("CrouchableStates")
                            .child(state("Run", motion("run")))
                            .child(
                                state_machine("RandomIdles")
                                    .tag("RANDOM_IDLES_TAG")
                                    .children(random_idle_states(idle_count)),
                            ),
                    )
                    .child(
                        state_machine("Crouched")
                            .default_state("CrouchIdle")
                            .child(state("CrouchIdle", motion("crouch_idle")))
                            .child(state("CrouchRun", motion("crouch_run"))),
                    ),
            )
            .child(state("Falling", motion("falling")))
            .child(
                state_machine("JumpStates")
                    .tag("JUMP_TAG")
                    .child(state("Jump", motion("jump")))
                    .child(state("RunningJump", motion("running_jump"))),
            );

        let upper = layer("UpperBody")
            .blending_mode(BlendingMode::Override)
            .weight(1.0)
            .sync_timing(true)
            .ik_pass(true)
            .avatar_mask("masks/upper_body.mask")
            .child(empty_state("UpperBodyNone"))
            .child(state("Throw", motion("throw")));

        let run_fast = || float_condition(&speed, SPEED_FOR_RUN, FloatMode::Greater);
        let run_slow = || float_condition(&speed, SPEED_FOR_RUN, FloatMode::Less);
        let on_ground = |v: bool| bool_condition(&grounded, v);

        let transitions = vec![
            transition()
                .source_recursive("RandomIdles")
                .destination("Run")
                .conditions([run_fast()?, on_ground(true)?]),
            transition()
                .source("Run")
                .destination("RandomIdles")
                .conditions([run_slow()?, on_ground(true)?]),
            transition()
                .source_recursive("CrouchIdle")
                .destination("CrouchRun")
                .conditions([run_fast()?, on_ground(true)?]),
            transition()
                .source("CrouchRun")
                .destination("CrouchIdle")
                .conditions([run_slow()?, on_ground(true)?]),
            transition()
                .source_recursive("OnGround")
                .destination("Jump")
                .conditions([trigger_condition(&jump)?, run_slow()?]),
            transition()
                .source_recursive("OnGround")
                .destination("RunningJump")
                .conditions([trigger_condition(&jump)?, run_fast()?]),
            transition()
                .source_multiple(["Jump", "RunningJump"])
                .destination("RandomIdles")
                .exit_time(0.9),
            transition()
                .source_recursive("CrouchableStates")
                .destination("Crouched")
                .condition(bool_condition(&crouched, true)?),
            transition()
                .source_recursive("Crouched")
                .destination("CrouchableStates")
                .condition(bool_condition(&crouched, false)?),
            transition()
                .source_recursive("OnGround")
                .destination("Falling")
                .condition(on_ground(false)?),
            transition()
                .source("Falling")
                .destination("OnGround")
                .condition(on_ground(true)?),
            transition()
                .source("UpperBodyNone")
                .destination("Throw")
                .condition(trigger_condition(&throw)?),
            transition()
                .source("Throw")
                .destination("UpperBodyNone")
                .default_exit_time(),
        ];

        Ok(b.with_layer(base)
            .with_layer(upper)
            .with_transitions(transitions)
            .with_transitions(random_idle_transitions(idle_count, &idle_index)?))
    }

    /// Locomotion blend tree: idle plus walk and run turning sub-trees.
    pub fn blend_tree() -> Result<AnimatorBuilder> {
        let mut b = AnimatorBuilder::new();
        let speed = b.float_param("Speed", 0.0)?;
        let turn = b.float_param("Turn", 0.5)?;

        let locomotion = BlendTree::one_d(&speed)
            .child(clip_1d(motion("idle"), 0.0))
            .child(turning(&turn, "walk").threshold_x(1.5))
            .child(turning(&turn, "run").threshold_x(SPEED_FOR_RUN));

        Ok(b.with_layer(
            layer("Base")
                .default_state("LocomotionBlend")
                .child(blend_state("LocomotionBlend", locomotion)),
        ))
    }

    /// Two-state button animator.
    pub fn ui_button(pressed_time: f32) -> Result<AnimatorBuilder> {
        const DEFAULT_STATE: &str = "Default";
        const CLICK_STATE: &str = "Click";
        let mut b = AnimatorBuilder::new();
        let click = b.trigger_param(CLICK_STATE)?;

        Ok(b.with_layer(
            layer("Base")
                .default_state(DEFAULT_STATE)
                .child(state(DEFAULT_STATE, motion("button_default")))
                .child(state(CLICK_STATE, motion("button_click"))),
        )
        .with_transition(
            transition()
                .source(DEFAULT_STATE)
                .destination(CLICK_STATE)
                .condition(trigger_condition(&click)?),
        )
        .with_transition(
            transition()
                .source(CLICK_STATE)
                .destination(DEFAULT_STATE)
                .exit_time(pressed_time),
        ))
    }

    /// Generated graph for load testing: `layers × machines × states`, with a
    /// recursive transition per machine into the next one.
    pub fn wide(layers: usize, machines: usize, states: usize) -> Result<AnimatorBuilder> {
        let mut b = AnimatorBuilder::new();
        let go = b.trigger_param("Go")?;
        for l in 0..layers {
            let mut lay = layer(format!("Layer{l}"));
            for m in 0..machines {
                lay = lay.child(
                    state_machine(format!("L{l}M{m}"))
                        .children((0..states).map(|s| {
                            state(format!("L{l}M{m}S{s}"), motion("clip"))
                        })),
                );
            }
            b.add_layer(lay);
            for m in 0..machines {
                let next = (m + 1) % machines;
                b.add_transition(
                    transition()
                        .source_recursive(format!("L{l}M{m}"))
                        .destination(format!("L{l}M{next}S0"))
                        .condition(trigger_condition(&go)?),
                );
            }
        }
        Ok(b)
    }

    fn turning(turn: &ParameterHandle, prefix: &str) -> BlendTree {
        let mut tree = BlendTree::one_d(turn).children([
            clip_1d(motion(&format!("{prefix}_sharp_left")), 0.0),
            clip_1d(motion(&format!("{prefix}_left")), 2.0),
        ]);
        tree.add_children([
            clip_1d(motion(&format!("{prefix}_forward")), 5.0),
            clip_1d(motion(&format!("{prefix}_right")), 8.0),
        ]);
        tree.child(clip_1d(motion(&format!("{prefix}_sharp_right")), 10.0))
    }

    fn random_idle_states(count: usize) -> Vec<Node> {
        (0..count)
            .map(|i| state(format!("RandomIdle_{i}"), motion(&format!("idle_{i}"))).into())
            .collect()
    }

    /// A transition from every random idle to every other one.
    fn random_idle_transitions(count: usize, index: &ParameterHandle) -> Result<Vec<Transition>> {
        let mut out = Vec::with_capacity(count * count.saturating_sub(1));
        for i in 0..count {
            for t in (0..count).filter(|&t| t != i) {
                out.push(
                    transition()
                        .source(format!("RandomIdle_{i}"))
                        .destination(format!("RandomIdle_{t}"))
                        .condition(int_condition(index, t as i32, IntMode::Equals)?),
                );
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_loads() {
        for key in animators::keys() {
            animators::load(&key).unwrap_or_else(|e| panic!("{key}: {e}"));
        }
        assert!(animators::load("missing").is_err());
    }
}
