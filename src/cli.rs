//! Minimal CLI: (generate | catalog), defaulting to `generate`
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::catalog::Catalog;
use crate::codegen::GenMode;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// emit `impl From<T>` conversion boilerplate for SmartNum, AstOperand and AstNode
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    /// more log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the conversion fragments (the default when no command is given)
    Generate(GenerateOut),
    /// print the resolved type catalog as JSON
    Catalog(CatalogOut),
}

#[derive(Args, Debug, Clone, Default)]
struct CatalogSettings {
    /// JSON catalog file (`{"integers": [...], "floats": [...]}`); the built-in catalog if omitted
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(clap::Parser, Debug, Default)]
struct GenerateOut {
    #[command(flatten)]
    catalog_settings: CatalogSettings,

    /// only emit these groups (repeatable); all groups if omitted
    #[arg(long, value_enum)]
    mode: Vec<GenMode>,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CatalogOut {
    #[command(flatten)]
    catalog_settings: CatalogSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CatalogSettings {
    fn resolve(&self) -> Result<Catalog> {
        match self.catalog.as_ref() {
            None => Ok(Catalog::standard()),
            Some(path) => Catalog::load(path),
        }
    }
}

impl GenerateOut {
    /// Render everything in memory first so a bad catalog never leaves
    /// partial output behind.
    fn render(&self) -> Result<String> {
        let catalog = self.catalog_settings.resolve()?;
        let modes = if self.mode.is_empty() { GenMode::ALL.to_vec() } else { self.mode.clone() };
        tracing::info!(
            entries = catalog.len(),
            modes = ?modes.iter().map(|m| m.label()).collect::<Vec<_>>(),
            "rendering conversions",
        );
        Ok(crate::codegen::render(&catalog, &modes))
    }
}

impl CatalogOut {
    fn render(&self) -> Result<String> {
        let catalog = self.catalog_settings.resolve()?;
        let mut src = serde_json::to_string_pretty(&catalog.to_file_model())
            .context("failed to serialize catalog")?;
        src.push('\n');
        Ok(src)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        let default_cmd;
        let cmd = match &self.cmd {
            Some(cmd) => cmd,
            None => {
                default_cmd = Command::Generate(GenerateOut::default());
                &default_cmd
            }
        };
        match cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let rust_src = target.render()?;
                write_output(target.out.as_deref(), &rust_src)
            }
            Command::Catalog(target) => {
                let json_src = target.render()?;
                write_output(target.out.as_deref(), &json_src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Write to `out`, or verbatim to stdout (no trailing newline added).
fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    use std::io::Write;

    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, src)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), bytes = src.len(), "wrote output");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(src.as_bytes()).context("failed to write to stdout")?;
            lock.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
