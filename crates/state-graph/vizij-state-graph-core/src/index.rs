//! Flat index over a frozen hierarchy.
//!
//! States are numbered in depth-first declaration order, so the states below
//! any scope form one contiguous range. Names map to every state and scope
//! carrying that leaf name; lookups then filter by qualified suffix.

use std::ops::Range;

use hashbrown::HashMap;

use crate::graph::{Layer, Node, StateMachine};
use crate::ids::{ScopePath, StateId, PATH_SEPARATOR};

#[derive(Debug, Clone)]
pub(crate) struct IndexedState {
    pub id: StateId,
    pub layer: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct IndexedScope {
    pub path: ScopePath,
    pub layer: usize,
    /// Leaf states below this scope, as indices into `GraphIndex::states`.
    pub states: Range<usize>,
    pub is_layer: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    State(usize),
    Scope(usize),
}

impl Entry {
    /// Index into `GraphIndex::states` or `GraphIndex::scopes`.
    pub fn slot(self) -> usize {
        match self {
            Entry::State(i) | Entry::Scope(i) => i,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct GraphIndex {
    pub states: Vec<IndexedState>,
    /// Scopes in pre-order (a machine precedes its nested machines).
    pub scopes: Vec<IndexedScope>,
    layers: Vec<String>,
    names: HashMap<String, Vec<Entry>>,
}

impl GraphIndex {
    pub fn build(layers: &[Layer]) -> Self {
        let mut index = GraphIndex::default();
        for (li, layer) in layers.iter().enumerate() {
            index.layers.push(layer.name().to_string());
            index.add_machine(&layer.root, layer.scope(), li, true);
        }
        index
    }

    fn add_machine(
        &mut self,
        machine: &StateMachine,
        path: ScopePath,
        layer: usize,
        is_layer: bool,
    ) {
        let slot = self.scopes.len();
        let start = self.states.len();
        self.names
            .entry(machine.name.clone())
            .or_default()
            .push(Entry::Scope(slot));
        self.scopes.push(IndexedScope {
            path: path.clone(),
            layer,
            states: start..start,
            is_layer,
        });

        for child in &machine.children {
            match child {
                Node::State(s) => {
                    let i = self.states.len();
                    self.names
                        .entry(s.name.clone())
                        .or_default()
                        .push(Entry::State(i));
                    self.states.push(IndexedState {
                        id: StateId::new(path.clone(), s.name.clone()),
                        layer,
                    });
                }
                Node::StateMachine(m) => {
                    self.add_machine(m, path.child(m.name.clone()), layer, false)
                }
            }
        }

        self.scopes[slot].states = start..self.states.len();
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l == name)
    }

    pub fn layer_of(&self, entry: Entry) -> usize {
        match entry {
            Entry::State(i) => self.states[i].layer,
            Entry::Scope(i) => self.scopes[i].layer,
        }
    }

    pub fn describe(&self, entry: Entry) -> String {
        match entry {
            Entry::State(i) => self.states[i].id.to_string(),
            Entry::Scope(i) => self.scopes[i].path.to_string(),
        }
    }

    /// Number of segments in the full path of `entry`.
    fn depth(&self, entry: Entry) -> usize {
        match entry {
            Entry::State(i) => self.states[i].id.scope.len() + 1,
            Entry::Scope(i) => self.scopes[i].path.len(),
        }
    }

    /// Every state or scope whose path ends with `query`, optionally limited to
    /// one layer. `query` is a bare name or a `/`-qualified suffix.
    pub fn lookup(&self, query: &str, layer: Option<usize>) -> Vec<Entry> {
        self.lookup_where(query, layer, |_| true)
    }

    /// [`Self::lookup`] restricted to entries accepted by `keep`. Among the
    /// kept entries, a full path equal to `query` wins over longer paths that
    /// merely end with it.
    pub fn lookup_where(
        &self,
        query: &str,
        layer: Option<usize>,
        keep: impl Fn(Entry) -> bool,
    ) -> Vec<Entry> {
        let segments: Vec<&str> = query.split(PATH_SEPARATOR).collect();
        let Some(leaf) = segments.last() else {
            return Vec::new();
        };
        let Some(candidates) = self.names.get(*leaf) else {
            return Vec::new();
        };
        let matches: Vec<Entry> = candidates
            .iter()
            .copied()
            .filter(|e| layer.map_or(true, |l| self.layer_of(*e) == l))
            .filter(|e| keep(*e))
            .filter(|e| match *e {
                Entry::State(i) => self.states[i].id.ends_with(&segments),
                Entry::Scope(i) => self.scopes[i].path.ends_with(&segments),
            })
            .collect();

        let exact: Vec<Entry> = matches
            .iter()
            .copied()
            .filter(|e| self.depth(*e) == segments.len())
            .collect();
        if exact.is_empty() {
            matches
        } else {
            exact
        }
    }

    /// States below scope `scope` whose path ends with `query`.
    pub fn lookup_within(&self, scope: usize, query: &str) -> Vec<usize> {
        let segments: Vec<&str> = query.split(PATH_SEPARATOR).collect();
        self.scopes[scope]
            .states
            .clone()
            .filter(|&i| self.states[i].id.ends_with(&segments))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{layer, state, state_machine};

    fn sample() -> Vec<Layer> {
        vec![
            layer("Base").children([
                state_machine("OnGround").children([
                    Node::from(state("Run", "run")),
                    state_machine("Crouched")
                        .child(state("Idle", "crouch_idle"))
                        .child(state("Run", "crouch_run"))
                        .into(),
                ]),
                state_machine("Empty"),
            ]),
            layer("UpperBody").child(state("Idle", "upper_idle")),
        ]
    }

    #[test]
    fn scopes_cover_contiguous_state_ranges() {
        let index = GraphIndex::build(&sample());
        let paths: Vec<String> = index.scopes.iter().map(|s| s.path.to_string()).collect();
        assert_eq!(
            paths,
            vec!["Base", "Base/OnGround", "Base/OnGround/Crouched", "Base/Empty", "UpperBody"]
        );
        assert_eq!(index.scopes[0].states, 0..3);
        assert_eq!(index.scopes[1].states, 0..3);
        assert_eq!(index.scopes[2].states, 1..3);
        assert!(index.scopes[3].states.is_empty());
        assert_eq!(index.scopes[4].states, 3..4);
        assert!(index.scopes[0].is_layer && !index.scopes[1].is_layer);
    }

    #[test]
    fn lookup_filters_by_suffix_and_layer() {
        let index = GraphIndex::build(&sample());
        assert_eq!(index.lookup("Run", None).len(), 2);
        assert_eq!(index.lookup("Crouched/Run", None), vec![Entry::State(2)]);
        assert_eq!(index.lookup("Idle", None).len(), 2);
        assert_eq!(index.lookup("Idle", index.layer_index("UpperBody")), vec![Entry::State(3)]);
        assert_eq!(index.lookup("OnGround", None), vec![Entry::Scope(1)]);
        assert!(index.lookup("Missing", None).is_empty());
        assert!(index.lookup("Other/Run", None).is_empty());
        assert_eq!(index.lookup_within(2, "Idle"), vec![1]);
    }

    #[test]
    fn full_path_beats_longer_suffix_match() {
        let layers = vec![layer("Base")
            .child(state_machine("Base").child(state("Idle", "idle")))
            .child(state("Run", "run"))];
        let index = GraphIndex::build(&layers);
        assert_eq!(index.lookup("Base", None), vec![Entry::Scope(0)]);
        assert_eq!(index.lookup("Base/Base", None), vec![Entry::Scope(1)]);
        assert_eq!(index.lookup("Idle", None), vec![Entry::State(0)]);
    }
}
