use log::debug;

use crate::script::{ScriptGraph, StateId};

// ---------------------------------------------------------------------------
// Resolution outcome
// ---------------------------------------------------------------------------

/// Where the conversation goes after an answer. Total: every (state, answer)
/// pair maps to exactly one of these, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Transition to another state.
    Next(StateId),
    /// Unmatched answer at a digression with fixed choices: stay put and
    /// re-present the choices.
    Stay,
    /// Conversation complete.
    Complete,
}

// ---------------------------------------------------------------------------
// Matching policy
// ---------------------------------------------------------------------------

/// Bidirectional substring containment, intentionally loose: "yes please"
/// matches trigger "yes", and a short answer like "ok" matches a trigger
/// "ok" but not "okay". Empty answers match nothing (`str::contains("")`
/// is always true, so the guard is load-bearing).
fn matches(trigger: &str, answer: &str) -> bool {
    !answer.is_empty() && (answer.contains(trigger) || trigger.contains(answer))
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve a raw operator answer at `state` to the next state.
///
/// The scan is first-match-wins in rule declaration order, not best-match:
/// an answer matching several triggers takes the first declared. Answer
/// normalization is lowercase + trim only; no punctuation or stemming.
pub fn resolve(graph: &ScriptGraph, state: &StateId, answer: &str) -> Resolution {
    let node = match graph.get(state) {
        Some(node) => node,
        None => return Resolution::Complete,
    };

    let normalized = answer.trim().to_lowercase();

    // Ordered rule scan, then the digression's fixed choices by label.
    for rule in &node.rules {
        if matches(&rule.trigger, &normalized) {
            debug!("{state}: trigger \"{}\" matched -> {}", rule.trigger, rule.edge.next);
            return Resolution::Next(rule.edge.next.clone());
        }
    }
    for choice in &node.choices {
        if matches(&choice.label.to_lowercase(), &normalized) {
            debug!("{state}: choice \"{}\" taken -> {}", choice.label, choice.edge.next);
            return Resolution::Next(choice.edge.next.clone());
        }
    }

    // Lexical overrides for the opening question, checked only once the
    // ordinary scan found nothing.
    if *state == StateId::question(1) {
        if normalized.contains("heaven") && normalized.contains("hell") {
            debug!("{state}: opener override -> heaven_question");
            return Resolution::Next(StateId::digression("heaven_question"));
        }
        if ["reincarnation", "other", "not sure"]
            .iter()
            .any(|kw| normalized.contains(kw))
        {
            debug!("{state}: opener override -> Q2");
            return Resolution::Next(StateId::question(2));
        }
    }

    match state {
        StateId::Question(n) => {
            let successor = StateId::question(n + 1);
            if graph.contains(&successor) {
                debug!("{state}: no match, falling through to {successor}");
                Resolution::Next(successor)
            } else {
                debug!("{state}: no match and no successor, conversation ends");
                Resolution::Complete
            }
        }
        StateId::Digression(_) => {
            if node.choices.is_empty() {
                Resolution::Complete
            } else {
                // Authoring expects an explicit choice here, not free text.
                Resolution::Stay
            }
        }
    }
}
