//! Interactive loop.

use anyhow::{Context, Result};
use fsq_eval::Evaluator;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::render;

const PROMPT: &str = "> ";

/// Read lines until EOF, printing one result per statement.
pub fn run(evaluator: &mut Evaluator) -> Result<()> {
    let mut rl = DefaultEditor::new().context("failed to create line editor")?;

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = rl.add_history_entry(line.as_str()) {
                        tracing::warn!("failed to add history entry: {}", e);
                    }
                }
                eval_and_print(evaluator, &line);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => return Err(err).context("reading input"),
        }
    }

    Ok(())
}

/// Evaluate a line and print its outcomes. Returns `false` if any failed.
pub fn eval_and_print(evaluator: &mut Evaluator, line: &str) -> bool {
    let tag = evaluator.config().display_tag.clone();
    let mut ok = true;
    for outcome in evaluator.eval_line(line) {
        match outcome.result {
            Ok(value) => {
                if let Some(text) = render::to_pretty(&value, tag.as_deref()) {
                    println!("{text}");
                }
            }
            Err(e) => {
                ok = false;
                eprintln!("error: {e}");
            }
        }
    }
    ok
}
