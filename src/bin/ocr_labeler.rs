//! Replays operator commands against a page and exports the result.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ocr-labeler -- [OPTIONS] <PAGE>
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=info cargo run --bin ocr-labeler -- \
//!     --config labeler.toml \
//!     --commands edits.json \
//!     --export page_001.export.json \
//!     --report \
//!     page_001.json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};

use ocr_labeler::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scope {
    /// Every word on the page
    All,
    /// Only words on fully validated lines
    Validated,
}

impl From<Scope> for ExportScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => ExportScope::All,
            Scope::Validated => ExportScope::ValidatedLines,
        }
    }
}

#[derive(Parser)]
#[command(name = "ocr-labeler")]
#[command(about = "Align OCR words with ground truth and apply recorded edits")]
struct Args {
    /// Path to the page input JSON
    page: PathBuf,

    /// Engine configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of commands to apply in order
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Keep applying commands after one is rejected
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// Mark exact-match lines validated after the commands ran
    #[arg(long, default_value_t = false)]
    mark_exact: bool,

    /// Where to write the export JSON
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Which words to export
    #[arg(long, value_enum, default_value = "all")]
    scope: Scope,

    /// Print the line validation report
    #[arg(long, default_value_t = false)]
    report: bool,

    /// Session label used in log output
    #[arg(long, default_value = "cli")]
    label: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ocr_labeler::init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    let context = SessionContext::new(config, args.label.clone());
    let mut session = LabelingSession::load(context, &args.page)?;
    info!(
        "Loaded {} with {} lines",
        args.page.display(),
        session.page().len()
    );

    if let Some(path) = &args.commands {
        let content =
            std::fs::read_to_string(path).map_err(|e| LabelerError::io(path.as_path(), e))?;
        let commands: Vec<Command> = serde_json::from_str(&content)?;
        info!("Applying {} commands", commands.len());

        let mut rejected = 0;
        for (step, command) in commands.into_iter().enumerate() {
            if let Err(e) = session.execute(command) {
                error!("Command {} rejected: {}", step, e);
                rejected += 1;
                if !args.keep_going {
                    return Err(e.into());
                }
            }
        }
        if rejected > 0 {
            info!("{} commands were rejected", rejected);
        }
    }

    if args.mark_exact {
        session.execute(Command::MarkExactMatchesValidated)?;
    }

    println!("{}", session.statistics());
    if args.report {
        println!("{}", session.report());
    }

    if let Some(path) = &args.export {
        let records = session.export(args.scope.into());
        ocr_labeler::export::write_json(&records, path)?;
    }

    Ok(())
}
