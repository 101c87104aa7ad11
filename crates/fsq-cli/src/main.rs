//! fsq CLI and REPL
//!
//! Usage:
//!   fsq                    - Start REPL over the demo `fs` object
//!   fsq -e <line>          - Evaluate one line and exit
//!   fsq --load doc.json    - Bind a JSON document as `doc`

mod demo;
mod json_doc;
mod render;
mod repl;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fsq_eval::{EvalConfig, Evaluator, FunctionPolicy};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fsq")]
#[command(version)]
#[command(about = "Evaluate expressions against live objects", long_about = None)]
struct Args {
    /// Evaluate a line and exit
    #[arg(short, long)]
    eval: Option<String>,

    /// Tag key naming record fields
    #[arg(long, default_value = "json")]
    tag: String,

    /// Call zero-argument functions instead of describing them
    #[arg(long)]
    auto_invoke: bool,

    /// Bind a JSON document as `doc`
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,

    /// Do not bind the demo `fs` object
    #[arg(long)]
    no_demo: bool,
}

fn main() -> ExitCode {
    // Logs go to stderr (respects RUST_LOG) so results stay clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut evaluator = build_evaluator(&args)?;

    if let Some(line) = &args.eval {
        let ok = repl::eval_and_print(&mut evaluator, line);
        return Ok(if ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    repl::run(&mut evaluator)?;
    Ok(ExitCode::SUCCESS)
}

fn build_evaluator(args: &Args) -> Result<Evaluator> {
    let policy = if args.auto_invoke {
        FunctionPolicy::AutoInvoke
    } else {
        FunctionPolicy::Describe
    };
    let config = EvalConfig::default()
        .with_display_tag(args.tag.as_str())
        .with_function_policy(policy);
    let mut evaluator = Evaluator::with_config(config);

    if !args.no_demo {
        evaluator
            .bind("fs", demo::field_system())
            .context("binding demo object")?;
    }

    if let Some(path) = &args.load {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let doc: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing {} as JSON", path.display()))?;
        evaluator
            .bind("doc", json_doc::to_value(&doc))
            .context("binding document")?;
    }

    Ok(evaluator)
}
