//! vexfile — parse, normalize and rewrite VEX observation schedule files.
//!
//! Two modes:
//!
//! - **stdin mode**: `vexfile < n14c3.vex`
//! - **file mode**: `vexfile n14c3.vex -o n14c3.norm.vex`
//!
//! Either way the document is parsed and re-rendered with the standard
//! layout; parse failures report the offending line.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vexfile::Document;

#[derive(Parser)]
#[command(
    name = "vexfile",
    about = "Parse and rewrite VEX observation schedule files"
)]
struct Cli {
    /// Input file. If omitted, reads from stdin.
    file: Option<PathBuf>,

    /// Write the rendered document here instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'f', long)]
    force: bool,

    /// Document name (defaults to the input file stem, or "stdin")
    #[arg(short = 'n', long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let doc = read_document(&cli)?;

    match &cli.output {
        Some(path) => doc
            .to_file(path, cli.force)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{doc}"),
    }
    Ok(())
}

fn read_document(cli: &Cli) -> Result<Document> {
    match &cli.file {
        Some(path) => {
            let mut doc = Document::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if let Some(name) = cli.name.as_deref() {
                doc.set_name(name);
            }
            Ok(doc)
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            let name = cli.name.as_deref().unwrap_or("stdin");
            Ok(Document::from_text(name, &text)?)
        }
    }
}
