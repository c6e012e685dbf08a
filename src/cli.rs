//! Command-line interface for the wrangler.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::audit::{is_valid_postal_code, problem_keys};
use crate::error::Result;
use crate::normalize::DIRECTIONS;
use crate::pipeline::{audit_map, process_map, ProcessOptions};

/// OSM map wrangler - Shape OpenStreetMap XML exports into document-store records.
#[derive(Parser)]
#[command(name = "osm-wrangler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shape a map export into newline-delimited JSON.
    Process {
        /// Path to the OSM XML export
        input: PathBuf,

        /// Write indented records instead of compact ones
        #[arg(short, long)]
        pretty: bool,

        /// Output path (default: <input>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inventory the export's shape and values without writing records.
    Audit {
        /// Path to the OSM XML export
        input: PathBuf,

        /// Also list every flagged problem key and street token
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            pretty,
            output,
        } => process_command(&input, pretty, output),
        Commands::Audit { input, verbose } => audit_command(&input, verbose),
    }
}

/// Execute the process command.
fn process_command(input: &std::path::Path, pretty: bool, output: Option<PathBuf>) -> Result<()> {
    println!(
        "{} {}",
        style("Processing").bold(),
        style(input.display()).cyan()
    );

    let pb = spinner("Shaping elements...");
    let options = ProcessOptions { pretty, output };
    let stats = match process_map(input, &options) {
        Ok(stats) => stats,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    println!("  Elements: {}", stats.elements_seen);
    println!("  Records: {}", style(stats.records_written).green());
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        stats.output_path.display()
    );

    Ok(())
}

/// Execute the audit command.
fn audit_command(input: &std::path::Path, verbose: bool) -> Result<()> {
    println!(
        "{} {}",
        style("Auditing").bold(),
        style(input.display()).cyan()
    );

    let pb = spinner("Observing elements...");
    let summary = match audit_map(input) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    println!();
    println!("{}", style("Element kinds").bold());
    for (kind, keys) in &summary.attributes {
        let child_kinds = summary
            .shapes
            .get(kind)
            .and_then(|shapes| shapes.get(kind))
            .map(|kinds| {
                kinds
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        if child_kinds.is_empty() {
            println!("  {}: {} attribute keys", style(kind).cyan(), keys.len());
        } else {
            println!(
                "  {}: {} attribute keys, children: {}",
                style(kind).cyan(),
                keys.len(),
                child_kinds
            );
        }
    }

    let flagged = problem_keys(summary.tag_keys());
    println!();
    if flagged.is_empty() {
        println!("{}", style("No problem keys").green());
    } else {
        println!(
            "{} {}",
            style("Problem keys:").yellow().bold(),
            flagged.len()
        );
        if verbose {
            for key in &flagged {
                println!("  {key}");
            }
        }
    }

    let directions: BTreeSet<&str> = DIRECTIONS.keys().copied().collect();
    let street_types = summary.street_types(&directions);
    println!("{} {}", style("Street-type tokens:").bold(), street_types.len());
    if verbose {
        for token in &street_types {
            println!("  {token}");
        }
    }

    let bad_postcodes: Vec<&str> = summary
        .observed_values("addr:postcode")
        .into_iter()
        .filter(|value| !is_valid_postal_code(value))
        .collect();
    if !bad_postcodes.is_empty() {
        println!(
            "{} {}",
            style("Non-standard postal codes:").yellow().bold(),
            bad_postcodes.len()
        );
        if verbose {
            for value in &bad_postcodes {
                println!("  {value}");
            }
        }
    }

    println!(
        "{} {}",
        style("Contributors:").bold(),
        summary.contributors.len()
    );

    Ok(())
}

/// Create a steady-tick progress spinner.
fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
