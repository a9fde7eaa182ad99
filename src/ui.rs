use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::script::{PromptNode, ScriptGraph, StateId};
use crate::session::{Session, Turn};

// ---------------------------------------------------------------------------
// Prompt display
// ---------------------------------------------------------------------------

fn skip_note(skip: &Option<StateId>) -> String {
    match skip {
        Some(id) => format!("  (skips {id})"),
        None => String::new(),
    }
}

fn show_prompt(session: &Session, node: &PromptNode) {
    println!();
    match &node.id {
        StateId::Question(n) => {
            if let Some((_, total)) = session.progress() {
                println!("--- Question {n} of {total} ---");
            }
        }
        StateId::Digression(tag) => {
            println!("--- Guidance: {tag} ---");
        }
    }
    println!("{}", node.text);

    // Anticipated answers / fixed branch choices double as a quick-select
    // menu: typing a listed number submits that option's text.
    if !node.rules.is_empty() {
        println!("\nAnticipated answers:");
        for (i, rule) in node.rules.iter().enumerate() {
            println!(
                "  [{}] {}{}",
                i + 1,
                rule.trigger,
                skip_note(&rule.edge.skip)
            );
        }
    }
    if !node.choices.is_empty() {
        println!("\nBranch choices:");
        for (i, choice) in node.choices.iter().enumerate() {
            let offset = node.rules.len() + i + 1;
            println!(
                "  [{offset}] {} -> {}{}",
                choice.label,
                choice.edge.next,
                skip_note(&choice.edge.skip)
            );
        }
    }
}

/// Map a quick-select number back to the option text it stands for.
fn quick_select(node: &PromptNode, input: &str) -> Option<String> {
    let index: usize = input.trim().parse().ok()?;
    if index == 0 {
        return None;
    }
    if let Some(rule) = node.rules.get(index - 1) {
        return Some(rule.trigger.clone());
    }
    node.choices
        .get(index - 1 - node.rules.len())
        .map(|choice| choice.label.clone())
}

// ---------------------------------------------------------------------------
// History and completion screens
// ---------------------------------------------------------------------------

fn show_history(session: &Session) {
    if session.history().is_empty() {
        println!("(no answers recorded yet)");
        return;
    }
    for entry in session.history() {
        println!(
            "  [{}] {}: {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.state_id,
            entry.answer_text
        );
    }
}

/// Sequence overview: every numbered question with its status.
fn show_question_list(session: &Session) {
    let current = session.progress().map(|(n, _)| n);
    for number in session.graph().question_numbers() {
        let id = StateId::question(number);
        let marker = if current == Some(number) {
            '>'
        } else if session.history().iter().any(|e| e.state_id == id) {
            '*'
        } else {
            ' '
        };
        println!("  {marker} {id}");
    }
}

fn show_complete(session: &Session) {
    println!("\n========================================");
    println!("        CONVERSATION COMPLETE");
    println!("========================================");
    println!("  Answers recorded: {}", session.history().len());
    show_history(session);
    println!("========================================\n");
    println!("  [r] Restart    [q] Quit\n");
}

/// Read the post-conversation choice. `true` to restart, `false` to quit.
fn prompt_restart() -> Result<bool> {
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        match input.trim().to_lowercase().as_str() {
            "r" => return Ok(true),
            "q" => return Ok(false),
            _ => println!("  Press [r] to restart or [q] to quit."),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversation loop
// ---------------------------------------------------------------------------

enum RoundOutcome {
    Completed,
    Quit,
}

fn save_history(session: &Session, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(session.history())
        .context("failed to serialize history")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
    println!("(history written to {path})");
    Ok(())
}

fn play_round(session: &mut Session) -> Result<RoundOutcome> {
    loop {
        let node = match session.current_turn() {
            Turn::Complete => return Ok(RoundOutcome::Completed),
            Turn::Prompt(node) => node.clone(),
        };
        show_prompt(session, &node);

        print!("\nTheir answer: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .context("failed to read answer")?;
        let input = input.trim().to_string();

        match input.as_str() {
            ":quit" | ":exit" => return Ok(RoundOutcome::Quit),
            ":history" => {
                show_history(session);
                continue;
            }
            ":questions" => {
                show_question_list(session);
                continue;
            }
            ":save" => {
                save_history(session, "history.json")?;
                continue;
            }
            ":reset" => {
                session.reset();
                println!("(conversation restarted)");
                continue;
            }
            _ => {}
        }

        let answer = quick_select(&node, &input).unwrap_or(input);
        info!("operator answer at {}: \"{answer}\"", node.id);
        session.submit_answer(&answer);
    }
}

/// Run conversations in a loop until the operator quits.
pub fn run(graph: Arc<ScriptGraph>) -> Result<()> {
    let mut session = Session::new(graph);

    loop {
        println!("\n========================================");
        println!("        SCRIPTED CONVERSATION GUIDE");
        println!("========================================");
        println!("Relay each prompt, then type their answer.");
        println!("Commands: :history  :questions  :save  :reset  :quit\n");

        match play_round(&mut session)? {
            RoundOutcome::Quit => {
                println!("Goodbye!");
                break;
            }
            RoundOutcome::Completed => {
                show_complete(&session);
                if !prompt_restart()? {
                    println!("Goodbye!");
                    break;
                }
                session.reset();
                info!("operator chose to restart");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::node::{AnswerRule, BranchChoice, Edge};

    fn node() -> PromptNode {
        PromptNode {
            id: StateId::digression("heaven_question"),
            text: "guidance".into(),
            rules: vec![AnswerRule {
                trigger: "because jesus".into(),
                edge: Edge::to(StateId::question(4)),
            }],
            choices: vec![BranchChoice {
                label: "They answer Hell".into(),
                edge: Edge::to(StateId::question(17)),
            }],
        }
    }

    #[test]
    fn quick_select_spans_rules_then_choices() {
        let node = node();
        assert_eq!(quick_select(&node, "1"), Some("because jesus".into()));
        assert_eq!(quick_select(&node, "2"), Some("They answer Hell".into()));
        assert_eq!(quick_select(&node, "3"), None);
        assert_eq!(quick_select(&node, "0"), None);
        assert_eq!(quick_select(&node, "hell"), None);
    }
}
