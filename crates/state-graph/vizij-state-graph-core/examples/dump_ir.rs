//! Build one of the fixture animators and print its IR.
//!
//! `cargo run -p vizij-state-graph-core --example dump_ir -- advanced`
//! Set `RUST_LOG=debug` to see the build pipeline.

use anyhow::anyhow;
use vizij_test_fixtures::animators;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let key = std::env::args().nth(1).unwrap_or_else(|| "advanced".to_string());
    let builder = animators::load(&key)?;
    let graph = builder
        .build()
        .map_err(|diags| anyhow!("fixture '{key}' did not validate:\n{diags}"))?;

    eprintln!(
        "{key}: {} layer(s), {} state(s), {} transition(s) ({} source/destination pairs)",
        graph.layers.len(),
        graph.states().len(),
        graph.transitions.len(),
        graph.transition_pairs().len()
    );
    println!("{}", graph.to_json_pretty()?);
    Ok(())
}
