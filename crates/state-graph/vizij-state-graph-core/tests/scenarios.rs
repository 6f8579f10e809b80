use vizij_state_graph_core::{
    layer, state, state_machine, transition, trigger_condition, AnimatorBuilder, GraphError,
    StateId, TransitionTarget,
};

fn ids(states: &[StateId]) -> Vec<String> {
    states.iter().map(|s| s.to_string()).collect()
}

fn base_layer() -> vizij_state_graph_core::Layer {
    layer("Base").default_state("Idle").children([
        state("Idle", "idle"),
        state("Run", "run"),
        state("Jump", "jump"),
    ])
}

#[test]
fn basic_graph_resolves_declared_transitions() {
    let mut b = AnimatorBuilder::new();
    b.float_param("Speed", 1.0).unwrap();
    let jump = b.trigger_param("JumpTrigger").unwrap();

    let graph = b
        .with_layer(base_layer())
        .with_transition(
            transition()
                .source("Idle")
                .destination("Jump")
                .condition(trigger_condition(&jump).unwrap()),
        )
        .with_transition(transition().source("Jump").destination("Idle").exit_time(0.9))
        .build()
        .expect("basic graph validates");

    assert_eq!(graph.transitions.len(), 2);
    let first = &graph.transitions[0];
    assert_eq!(ids(&first.source_states), vec!["Base/Idle"]);
    assert_eq!(
        first.destination,
        TransitionTarget::State(StateId::parse("Base/Jump").unwrap())
    );
    assert_eq!(graph.transitions[1].exit_time, Some(0.9));
    assert_eq!(
        graph.layers[0].root.resolved_default,
        Some(StateId::parse("Base/Idle").unwrap())
    );
}

#[test]
fn unknown_recursive_scope_is_reported() {
    let diags = AnimatorBuilder::new()
        .with_layer(base_layer())
        .with_transition(transition().source_recursive("NoSuchScope").destination("Idle"))
        .build()
        .unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(matches!(
        &diags.errors()[0],
        GraphError::UnknownScopeName { name, .. } if name == "NoSuchScope"
    ));
}

#[test]
fn empty_machine_cannot_be_a_recursive_source() {
    let diags = AnimatorBuilder::new()
        .with_layer(base_layer().child(state_machine("Empty")))
        .with_transition(transition().source_recursive("Empty").destination("Idle"))
        .build()
        .unwrap_err();
    assert!(diags.iter().any(|e| matches!(
        e,
        GraphError::EmptyRecursiveScope { scope, .. } if scope == "Base/Empty"
    )));
}

#[test]
fn duplicate_state_names_in_one_layer_fail() {
    let diags = AnimatorBuilder::new()
        .with_layer(layer("Base").children([state("Idle", "a"), state("Idle", "b")]))
        .build()
        .unwrap_err();
    assert!(diags.iter().any(|e| matches!(
        e,
        GraphError::DuplicateName { path, name } if path == "Base" && name == "Idle"
    )));
}

#[test]
fn unique_names_at_every_level_pass() {
    let graph = AnimatorBuilder::new()
        .with_layer(
            layer("Base")
                .child(state_machine("A").child(state("Idle", "a")))
                .child(state_machine("B").child(state("Idle", "b"))),
        )
        .with_layer(layer("Upper").child(state("Idle", "u")))
        .build();
    assert!(graph.is_ok(), "{:?}", graph.err());
}

#[test]
fn single_source_already_in_multiple_is_deduplicated() {
    let build = |t| {
        AnimatorBuilder::new()
            .with_layer(base_layer())
            .with_transition(t)
            .build()
            .unwrap()
    };
    let plain = build(transition().source_multiple(["Idle", "Run"]).destination("Jump"));
    let unioned = build(
        transition()
            .source_multiple(["Idle", "Run"])
            .source("Idle")
            .destination("Jump"),
    );
    assert_eq!(
        plain.transitions[0].source_states,
        unioned.transitions[0].source_states
    );
    assert_eq!(ids(&unioned.transitions[0].source_states), vec!["Base/Idle", "Base/Run"]);
}

#[test]
fn recursive_sources_are_stable_and_in_declaration_order() {
    let machine = || {
        layer("Base").child(
            state_machine("OnGround")
                .child(state("Walk", "walk"))
                .child(state_machine("Crouched").children([
                    state("CrouchIdle", "ci"),
                    state("CrouchRun", "cr"),
                ]))
                .child(state("Run", "run")),
        )
    };
    let graph = AnimatorBuilder::new()
        .with_layer(machine())
        .with_transition(transition().source_recursive("OnGround").destination("Walk"))
        .with_transition(
            transition()
                .source_recursive("OnGround")
                .source_recursive("Base/OnGround")
                .destination("Walk"),
        )
        .build()
        .unwrap();

    let expected = vec![
        "Base/OnGround/Walk",
        "Base/OnGround/Crouched/CrouchIdle",
        "Base/OnGround/Crouched/CrouchRun",
        "Base/OnGround/Run",
    ];
    assert_eq!(ids(&graph.transitions[0].source_states), expected);
    assert_eq!(graph.transitions[0].source_states, graph.transitions[1].source_states);
}

#[test]
fn single_sources_round_trip_to_declared_pairs() {
    let declared = [("Idle", "Run"), ("Run", "Jump"), ("Jump", "Idle"), ("Idle", "Jump")];
    let graph = AnimatorBuilder::new()
        .with_layer(base_layer())
        .with_transitions(
            declared
                .iter()
                .map(|(s, d)| transition().source(*s).destination(*d)),
        )
        .build()
        .unwrap();

    let json = graph.to_json_pretty().unwrap();
    let reloaded = vizij_state_graph_core::AnimatorGraph::from_json(&json).unwrap();
    let pairs: Vec<(String, String)> = reloaded
        .transition_pairs()
        .into_iter()
        .map(|(s, d)| (s.name, d.as_state().unwrap().name.clone()))
        .collect();
    assert_eq!(pairs.len(), declared.len());
    for (pair, (s, d)) in pairs.iter().zip(declared) {
        assert_eq!(pair, &(s.to_string(), d.to_string()));
    }
}

#[test]
fn nearest_explicit_tag_is_inherited() {
    let graph = AnimatorBuilder::new()
        .with_layer(
            layer("Base")
                .child(state("Idle", "idle"))
                .child(
                    state_machine("Crouched")
                        .tag("CROUCH_TAG")
                        .child(state("CrouchIdle", "ci")),
                ),
        )
        .build()
        .unwrap();

    let crouch = graph
        .state(&StateId::parse("Base/Crouched/CrouchIdle").unwrap())
        .unwrap();
    assert_eq!(crouch.tag, "CROUCH_TAG");
    let idle = graph.state(&StateId::parse("Base/Idle").unwrap()).unwrap();
    assert_eq!(idle.tag, "");
}
