use std::sync::Arc;

use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;

use crate::resolver::{resolve, Resolution};
use crate::script::{PromptNode, ScriptGraph, StateId};

/// Snapshot text recorded when an answer is submitted at a state the graph
/// has no node for (an unauthored digression reached as an edge target).
const UNSCRIPTED_PROMPT: &str = "(unscripted digression)";

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One submitted answer. Immutable once appended.
///
/// The prompt text is snapshotted at answer time so the history stays
/// meaningful even against a rebuilt graph with different wording.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub state_id: StateId,
    pub prompt_text_snapshot: String,
    pub answer_text: String,
    pub timestamp: DateTime<Local>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What the presentation layer gets back for the current position: either
/// the prompt to show, or the signal that the conversation is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn<'a> {
    Prompt(&'a PromptNode),
    Complete,
}

/// Where the session cursor sits.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    At(StateId),
    Complete,
}

/// One operator-run conversation: a cursor into the shared script graph
/// plus the append-only answer history.
///
/// Single-owner, no interior locking; the graph itself is read-only and
/// shared via `Arc` so a surrounding application can serve several
/// sessions off one script.
#[derive(Debug)]
pub struct Session {
    graph: Arc<ScriptGraph>,
    current: Cursor,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(graph: Arc<ScriptGraph>) -> Self {
        let entry = graph.entry().clone();
        Self {
            graph,
            current: Cursor::At(entry),
            history: Vec::new(),
        }
    }

    pub fn graph(&self) -> &ScriptGraph {
        &self.graph
    }

    /// The prompt for the current state, or `Turn::Complete` once the
    /// cursor is terminal or points at a state the graph has no node for.
    pub fn current_turn(&self) -> Turn<'_> {
        match &self.current {
            Cursor::Complete => Turn::Complete,
            Cursor::At(id) => match self.graph.get(id) {
                Some(node) => Turn::Prompt(node),
                None => Turn::Complete,
            },
        }
    }

    /// Record the operator's answer at the current state and advance.
    ///
    /// Terminal is absorbing: once complete, this is a no-op that returns
    /// the completion signal without touching history.
    pub fn submit_answer(&mut self, text: &str) -> Turn<'_> {
        let state = match &self.current {
            Cursor::Complete => return Turn::Complete,
            Cursor::At(id) => id.clone(),
        };

        let snapshot = self
            .graph
            .get(&state)
            .map(|node| node.text.clone())
            .unwrap_or_else(|| UNSCRIPTED_PROMPT.to_string());
        self.history.push(HistoryEntry {
            state_id: state.clone(),
            prompt_text_snapshot: snapshot,
            answer_text: text.to_string(),
            timestamp: Local::now(),
        });

        match resolve(&self.graph, &state, text) {
            Resolution::Next(next) => {
                info!("transition: {state} -> {next}");
                self.current = Cursor::At(next);
            }
            Resolution::Stay => {
                info!("staying at {state}: answer did not pick a branch choice");
            }
            Resolution::Complete => {
                info!("conversation complete (from {state})");
                self.current = Cursor::Complete;
            }
        }

        self.current_turn()
    }

    /// Back to the entry state with empty history. All-or-nothing; calling
    /// it twice is the same as calling it once.
    pub fn reset(&mut self) {
        self.current = Cursor::At(self.graph.entry().clone());
        self.history.clear();
        info!("session reset to {}", self.graph.entry());
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.current_turn(), Turn::Complete)
    }

    /// Current question number and total question count, for "question N
    /// of M" display. `None` at digressions and after completion.
    pub fn progress(&self) -> Option<(u32, usize)> {
        match &self.current {
            Cursor::At(id) => id
                .as_question()
                .map(|n| (n, self.graph.question_count())),
            Cursor::Complete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::dataset::outreach_script;

    fn session() -> Session {
        Session::new(Arc::new(outreach_script().unwrap()))
    }

    #[test]
    fn starts_at_the_entry_question() {
        let s = session();
        match s.current_turn() {
            Turn::Prompt(node) => assert_eq!(node.id, StateId::question(1)),
            Turn::Complete => panic!("fresh session must not be complete"),
        }
        assert!(s.history().is_empty());
        assert_eq!(s.progress(), Some((1, 38)));
    }

    #[test]
    fn submit_appends_one_entry_and_advances() {
        let mut s = session();
        let turn = s.submit_answer("not sure");
        match turn {
            Turn::Prompt(node) => assert_eq!(node.id, StateId::question(2)),
            Turn::Complete => panic!("should have advanced to question 2"),
        }
        assert_eq!(s.history().len(), 1);
        let entry = &s.history()[0];
        assert_eq!(entry.state_id, StateId::question(1));
        assert_eq!(entry.answer_text, "not sure");
        assert_eq!(
            entry.prompt_text_snapshot,
            "What do you think happens to us after we die?"
        );
    }

    #[test]
    fn unmatched_answer_at_digression_stays_and_records() {
        let mut s = session();
        s.submit_answer("heaven and hell");
        assert_eq!(s.progress(), None);
        let turn = s.submit_answer("hmm let me think");
        match turn {
            Turn::Prompt(node) => {
                assert_eq!(node.id, StateId::digression("heaven_question"))
            }
            Turn::Complete => panic!("digression should re-present its choices"),
        }
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn unauthored_digression_records_a_placeholder_then_completes() {
        let mut s = session();
        s.submit_answer("not sure"); // -> 2
        s.submit_answer("yes"); // -> 3
        s.submit_answer("yes"); // -> 4
        let turn = s.submit_answer("no"); // -> lie_response, which has no node
        assert_eq!(turn, Turn::Complete);
        let mut s2 = session();
        s2.submit_answer("not sure");
        s2.submit_answer("yes");
        s2.submit_answer("yes");
        s2.submit_answer("no");
        // Submitting once more at the unauthored state records a placeholder
        // snapshot, then the session is terminal for good.
        s2.submit_answer("anything");
        assert_eq!(s2.history().len(), 5);
        assert_eq!(s2.history()[4].prompt_text_snapshot, UNSCRIPTED_PROMPT);
        s2.submit_answer("more");
        s2.submit_answer("and more");
        assert_eq!(s2.history().len(), 5);
    }

    #[test]
    fn terminal_is_absorbing() {
        let mut s = session();
        // Q1 -> heaven_question -> Q17 -> hell_response_3 (terminal tag)
        s.submit_answer("heaven and hell");
        s.submit_answer("they answer hell");
        s.submit_answer("hell");
        s.submit_answer("whatever");
        assert!(s.is_complete());
        let frozen = s.history().len();
        for _ in 0..5 {
            assert_eq!(s.submit_answer("still here"), Turn::Complete);
        }
        assert_eq!(s.history().len(), frozen);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = session();
        s.submit_answer("not sure");
        s.submit_answer("yes");
        s.reset();
        assert!(s.history().is_empty());
        assert_eq!(s.progress(), Some((1, 38)));
        s.reset();
        assert!(s.history().is_empty());
        assert_eq!(s.progress(), Some((1, 38)));
    }

    #[test]
    fn replaying_history_reproduces_the_final_cursor() {
        let graph = Arc::new(outreach_script().unwrap());
        let mut s = Session::new(Arc::clone(&graph));
        for answer in [
            "heaven and hell",
            "they answer heaven",
            "yes",
            "guilty",
            "reward, surely",
            "banana",
        ] {
            s.submit_answer(answer);
        }

        let answers: Vec<String> = s
            .history()
            .iter()
            .map(|entry| entry.answer_text.clone())
            .collect();
        let mut replay = Session::new(graph);
        for answer in &answers {
            replay.submit_answer(answer);
        }

        assert_eq!(replay.current, s.current);
        assert_eq!(replay.history().len(), s.history().len());
    }
}
