use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use regex::Regex;
use serde::Deserialize;

use crate::script::{PromptNode, ScriptGraph, StateId};

// ---------------------------------------------------------------------------
// JSON script files
// ---------------------------------------------------------------------------

/// On-disk script shape. Node ids are bare numbers or strings, matching the
/// `StateId` wire form.
#[derive(Debug, Deserialize)]
struct ScriptDocument {
    entry: StateId,
    #[serde(default)]
    terminal_tags: Vec<String>,
    nodes: Vec<PromptNode>,
}

/// Load a script graph from a JSON file. Validation failures (duplicate
/// ids, dangling edges) are fatal here, at startup, not mid-conversation.
pub fn from_json_file(path: &Path) -> Result<ScriptGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read script file {}", path.display()))?;
    let doc: ScriptDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse script file {}", path.display()))?;
    let graph = ScriptGraph::new(doc.nodes, doc.terminal_tags, doc.entry)
        .with_context(|| format!("script file {} failed validation", path.display()))?;
    info!(
        "loaded {} questions from {}",
        graph.question_count(),
        path.display()
    );
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Raw transcript extraction
// ---------------------------------------------------------------------------

/// Best-effort extraction of numbered questions from a flat text transcript
/// (e.g. text pulled out of the script PDF).
///
/// Recognizes `1. text`, `1) text`, `Question 1: text` and `Q1: text`
/// headings. The result has no flow edges at all: answers advance purely
/// through the resolver's sequential fallback. Advisory, not a substitute
/// for an authored script.
pub fn from_transcript(content: &str) -> Result<ScriptGraph> {
    let headings = [
        Regex::new(r"^\s*(\d+)\s*[.)]\s*(.+)$").context("bad heading pattern")?,
        Regex::new(r"(?i)^question\s*(\d+)[:.]\s*(.+)$").context("bad heading pattern")?,
        Regex::new(r"(?i)^q(\d+)[:.]\s*(.+)$").context("bad heading pattern")?,
    ];

    let mut nodes: Vec<PromptNode> = Vec::new();
    let mut seen: Vec<u32> = Vec::new();
    // Question currently being accumulated: PDF text hard-wraps question
    // bodies, so continuation lines belong to the last heading until a
    // blank line or the next heading.
    let mut open: Option<(u32, String)> = None;

    for line in content.lines() {
        if line.trim().is_empty() {
            if let Some((number, text)) = open.take() {
                push_question(&mut nodes, &mut seen, number, &text);
            }
            continue;
        }

        let heading = headings.iter().find_map(|re| {
            let caps = re.captures(line)?;
            let number: u32 = caps[1].parse().ok()?;
            if number == 0 {
                return None;
            }
            Some((number, caps[2].to_string()))
        });

        match heading {
            Some((number, text)) => {
                if let Some((prev, prev_text)) = open.take() {
                    push_question(&mut nodes, &mut seen, prev, &prev_text);
                }
                open = Some((number, text));
            }
            None => {
                if let Some((_, text)) = open.as_mut() {
                    text.push(' ');
                    text.push_str(line);
                }
            }
        }
    }
    if let Some((number, text)) = open {
        push_question(&mut nodes, &mut seen, number, &text);
    }

    if nodes.is_empty() {
        bail!("no numbered questions found in transcript");
    }

    let entry = seen.iter().min().copied().unwrap_or(1);
    if entry != 1 {
        warn!("transcript has no question 1; entering at question {entry}");
    }
    info!("extracted {} questions from transcript", nodes.len());

    ScriptGraph::new(nodes, vec![], StateId::question(entry))
        .context("extracted transcript failed graph validation")
}

/// Record one extracted question, collapsing hard-wrapped whitespace.
/// The first heading seen for a number wins.
fn push_question(nodes: &mut Vec<PromptNode>, seen: &mut Vec<u32>, number: u32, text: &str) {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() || seen.contains(&number) {
        return;
    }
    seen.push(number);
    nodes.push(PromptNode {
        id: StateId::question(number),
        text,
        rules: vec![],
        choices: vec![],
    });
}

/// Convenience wrapper: read the transcript from disk first.
pub fn from_transcript_file(path: &Path) -> Result<ScriptGraph> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    from_transcript(&content)
}
