mod loader;
mod resolver;
mod script;
mod session;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use log::info;

use script::dataset;

fn main() -> Result<()> {
    // Initialize logging. Control verbosity with RUST_LOG env var:
    //   RUST_LOG=info   cargo run               # transitions
    //   RUST_LOG=debug  cargo run               # + resolver decisions
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let graph = match (args.get(1).map(String::as_str), args.get(2)) {
        (None, _) => dataset::outreach_script()?,
        (Some("--script"), Some(path)) => loader::from_json_file(Path::new(path))?,
        (Some("--transcript"), Some(path)) => loader::from_transcript_file(Path::new(path))?,
        _ => bail!(
            "Usage: scriptflow [--script <graph.json> | --transcript <raw.txt>]\n\
             \n\
             With no arguments the built-in outreach script is used.\n\
             Logging: set RUST_LOG=debug for verbose output"
        ),
    };

    info!(
        "script ready: {} questions, entry at {}",
        graph.question_count(),
        graph.entry()
    );

    ui::run(Arc::new(graph))
}
