use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// State identifiers
// ---------------------------------------------------------------------------

/// Key of a state in the script graph.
///
/// The script mixes two kinds of states: numbered questions that form the
/// main sequence, and named digressions (analogies, rebuttals, sub-scripts)
/// that branch off it. Comparisons are type-sensitive: `Question(4)` never
/// equals any `Digression`.
///
/// Serialized as a bare number or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateId {
    Question(u32),
    Digression(String),
}

impl StateId {
    pub fn question(n: u32) -> Self {
        StateId::Question(n)
    }

    pub fn digression(tag: impl Into<String>) -> Self {
        StateId::Digression(tag.into())
    }

    /// The question number, if this is a numbered state.
    pub fn as_question(&self) -> Option<u32> {
        match self {
            StateId::Question(n) => Some(*n),
            StateId::Digression(_) => None,
        }
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateId::Question(n) => write!(f, "Q{n}"),
            StateId::Digression(tag) => write!(f, "{tag}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Edges and rules
// ---------------------------------------------------------------------------

/// An outgoing transition.
///
/// `skip` is advisory: it names a question the branch jumps over (e.g. the
/// "heaven and hell" opener skips question 2). The presentation layer
/// surfaces it; resolution never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub next: StateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<StateId>,
}

impl Edge {
    pub fn to(next: StateId) -> Self {
        Self { next, skip: None }
    }
}

/// One anticipated answer and where it leads.
///
/// Triggers are stored lowercase. Rules are kept in a `Vec` because
/// declaration order is the match order (first match wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRule {
    pub trigger: String,
    pub edge: Edge,
}

/// An explicit option on a digression node, e.g. "They answer Heaven" -> Q4.
///
/// Unlike answer rules these are presented to the operator as a fixed menu;
/// the guidance text tells them which one applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchChoice {
    pub label: String,
    pub edge: Edge,
}

// ---------------------------------------------------------------------------
// Prompt nodes
// ---------------------------------------------------------------------------

/// The content shown for one state: the operator-facing prompt or guidance
/// text plus its outgoing transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptNode {
    pub id: StateId,
    pub text: String,
    /// Ordered free-text answer rules. Empty on guidance-only digressions.
    #[serde(default)]
    pub rules: Vec<AnswerRule>,
    /// Fixed branch choices. Empty on ordinary questions.
    #[serde(default)]
    pub choices: Vec<BranchChoice>,
}

impl PromptNode {
    pub fn is_digression(&self) -> bool {
        matches!(self.id, StateId::Digression(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_ids_are_type_sensitive() {
        assert_ne!(StateId::question(4), StateId::digression("4"));
        assert_eq!(StateId::question(4).as_question(), Some(4));
        assert_eq!(StateId::digression("god_analogy").as_question(), None);
    }

    #[test]
    fn state_id_serializes_as_bare_number_or_string() {
        assert_eq!(
            serde_json::to_string(&StateId::question(17)).unwrap(),
            "17"
        );
        assert_eq!(
            serde_json::to_string(&StateId::digression("god_analogy")).unwrap(),
            "\"god_analogy\""
        );

        let q: StateId = serde_json::from_str("17").unwrap();
        assert_eq!(q, StateId::question(17));
        let d: StateId = serde_json::from_str("\"god_analogy\"").unwrap();
        assert_eq!(d, StateId::digression("god_analogy"));
    }

    #[test]
    fn edge_skip_is_omitted_when_absent() {
        let edge = Edge::to(StateId::question(3));
        assert_eq!(serde_json::to_string(&edge).unwrap(), "{\"next\":3}");
    }
}
