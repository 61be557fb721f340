//! reapply: re-apply scaffolding templates without clobbering local edits.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use reapply::config::Config;
use reapply::normalize::{collapse_magic_comments, ensure_trailing_newline};
use reapply::report::{Report, Strategy};
use reapply::ruby::RubyParser;
use reapply::{merge_branches, splice_script, Error, FieldUpdate};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reapply")]
#[command(
    about = "Re-apply scaffolding templates without clobbering local edits",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Print a JSON report of merge outcomes to stderr
    #[arg(long, global = true)]
    report: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Merge a markdown document, keeping customised sections from the destination
    Markdown(DocumentArgs),
    /// Rebuild the unreleased changelog section from the destination's entries
    Changelog(DocumentArgs),
    /// Splice field declarations into a gemspec
    Script(ScriptArgs),
}

#[derive(clap::Args)]
struct DocumentArgs {
    /// Freshly generated template document
    #[arg(long)]
    template: PathBuf,

    /// Customised document to merge into (missing counts as empty)
    #[arg(long)]
    destination: PathBuf,

    /// Write the result here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ScriptArgs {
    /// Script to splice into
    #[arg(long)]
    destination: PathBuf,

    /// Set a string field
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Set a list field from comma-separated items
    #[arg(long = "set-list", value_name = "FIELD=A,B")]
    set_list: Vec<String>,

    /// Remove every declaration of this dependency
    #[arg(long = "remove-dependency", value_name = "NAME")]
    remove_dependency: Vec<String>,

    /// Write the result here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = Config::load();
    let mut report = Report::default();

    match args.command {
        Command::Markdown(doc) => {
            let template = read(&doc.template)?;
            let destination = read_or_empty(&doc.destination)?;
            let merged = merge_branches(&template, &destination, &cfg.preserve_policy());
            let merged = ensure_trailing_newline(&merged);
            report.record(display(&doc.destination), Strategy::Markdown, &destination, &merged);
            emit(doc.output.as_deref(), &merged)?;
        }
        Command::Changelog(doc) => {
            let template = read(&doc.template)?;
            let destination = read_or_empty(&doc.destination)?;
            let merged = cfg.changelog_merger().merge(&template, &destination);
            let merged = ensure_trailing_newline(&merged);
            report.record(display(&doc.destination), Strategy::Changelog, &destination, &merged);
            emit(doc.output.as_deref(), &merged)?;
        }
        Command::Script(script) => {
            let mut updates = script
                .set
                .iter()
                .map(|arg| FieldUpdate::parse_arg(arg, false))
                .collect::<Result<Vec<_>, _>>()?;
            for arg in &script.set_list {
                updates.push(FieldUpdate::parse_arg(arg, true)?);
            }
            let source = read(&script.destination)?;
            let spliced = splice_script(
                &RubyParser,
                &source,
                &cfg.splice_policy(),
                &updates,
                &script.remove_dependency,
            );
            let spliced = ensure_trailing_newline(&collapse_magic_comments(&spliced));
            report.record(display(&script.destination), Strategy::Script, &source, &spliced);
            emit(script.output.as_deref(), &spliced)?;
        }
    }

    if args.report {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => eprintln!("{json}"),
            Err(error) => tracing::warn!(%error, "Failed to serialise report"),
        }
    }

    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::io(path, source))
}

fn read_or_empty(path: &Path) -> Result<String, Error> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(Error::io(path, source)),
    }
}

fn emit(output: Option<&Path>, content: &str) -> Result<(), Error> {
    match output {
        Some(path) => fs::write(path, content).map_err(|source| Error::io(path, source)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|source| Error::io("<stdout>", source)),
    }
}
