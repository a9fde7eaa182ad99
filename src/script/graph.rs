use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::script::node::{PromptNode, StateId};

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// Validation failures detected while building a script graph.
///
/// These are fatal: a graph that fails validation would misbehave silently
/// mid-conversation (wrong branch, dead end), so construction refuses it
/// outright instead of letting it run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate state {0}")]
    DuplicateState(StateId),

    #[error("edge from {from} targets {target}, which is neither a node nor a declared terminal")]
    DanglingEdge { from: StateId, target: StateId },

    #[error("entry state {0} is not in the graph")]
    MissingEntry(StateId),
}

// ---------------------------------------------------------------------------
// Script graph
// ---------------------------------------------------------------------------

/// The full conversation script: a map of state id -> prompt node.
///
/// Immutable once built. Any change to the script means building a new
/// graph, so in-flight sessions never observe rules changing under them.
/// Read-only sharing across sessions is safe.
#[derive(Debug, Clone)]
pub struct ScriptGraph {
    nodes: HashMap<StateId, PromptNode>,
    /// Named edge targets that deliberately have no node: reaching one ends
    /// the conversation. Distinguishes an intentional dead end from an
    /// authoring mistake.
    terminal_tags: HashSet<String>,
    entry: StateId,
}

impl ScriptGraph {
    /// Build and validate a graph.
    ///
    /// Every edge (including advisory skips) must target an existing node
    /// or a declared terminal tag, ids must be unique, and the entry state
    /// must exist.
    pub fn new(
        nodes: Vec<PromptNode>,
        terminal_tags: Vec<String>,
        entry: StateId,
    ) -> Result<Self, GraphError> {
        let terminal_tags: HashSet<String> = terminal_tags.into_iter().collect();

        let mut map = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id.clone();
            if map.insert(id.clone(), node).is_some() {
                return Err(GraphError::DuplicateState(id));
            }
        }

        let graph = Self {
            nodes: map,
            terminal_tags,
            entry,
        };

        if !graph.nodes.contains_key(&graph.entry) {
            return Err(GraphError::MissingEntry(graph.entry));
        }

        for node in graph.nodes.values() {
            let edges = node
                .rules
                .iter()
                .map(|r| &r.edge)
                .chain(node.choices.iter().map(|c| &c.edge));
            for edge in edges {
                for target in std::iter::once(&edge.next).chain(edge.skip.as_ref()) {
                    if !graph.resolvable(target) {
                        return Err(GraphError::DanglingEdge {
                            from: node.id.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Look up a node. Absence means the state is the terminal sentinel.
    pub fn get(&self, id: &StateId) -> Option<&PromptNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &StateId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn entry(&self) -> &StateId {
        &self.entry
    }

    /// Number of numbered questions, for "question N of M" progress.
    pub fn question_count(&self) -> usize {
        self.nodes
            .keys()
            .filter(|id| id.as_question().is_some())
            .count()
    }

    /// All question numbers in ascending order.
    pub fn question_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.nodes.keys().filter_map(StateId::as_question).collect();
        numbers.sort_unstable();
        numbers
    }

    fn resolvable(&self, id: &StateId) -> bool {
        if self.nodes.contains_key(id) {
            return true;
        }
        match id {
            StateId::Digression(tag) => self.terminal_tags.contains(tag),
            StateId::Question(_) => false,
        }
    }
}
