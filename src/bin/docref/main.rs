//! docref CLI tool
//!
//! Command-line interface for relinking a Markdown documentation tree and generating its toc.
//!
//! ## Commands
//!
//! - `build`: Catalog the tree, rewrite links in place and write the toc page
//! - `check`: Same as `build` without writing anything; exits non-zero if any document would change
//! - `catalog`: Print the basename -> url catalog
//!
//! Every command reads `docref.toml` from the working directory when present. Command-line
//! options override the file.

use clap::{Args, Parser, Subcommand};
use docref::{
    catalog::Catalog, config::DocrefConfig, pipeline::run, relink::RelinkMode, RunSummary,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docref")]
#[command(author, version, about = "Normalize cross-document links and generate a Sphinx toc page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Configuration file path (default: ./docref.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source root, overrides the config file
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Filename to leave out of the catalog (repeatable)
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl SourceArgs {
    fn load(&self) -> Result<DocrefConfig, docref::DocrefError> {
        let mut config = match &self.config {
            Some(path) => DocrefConfig::from_file(path)?,
            None => DocrefConfig::discover(std::env::current_dir()?)?,
        };
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        config.ignore_files.extend(self.ignore.iter().cloned());
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Relink documents in place and write the toc page
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Warn about internal links that match no document
        #[arg(long)]
        warn_unresolved: bool,
    },

    /// Report documents whose links would change, without writing anything
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Warn about internal links that match no document
        #[arg(long)]
        warn_unresolved: bool,
    },

    /// Print the document catalog
    Catalog {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of one `basename -> url` line per document
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Build { source, .. }
            | Commands::Check { source, .. }
            | Commands::Catalog { source, .. } => source.verbose,
        }
    }
}

fn print_summary(summary: &RunSummary, mode: RelinkMode) {
    println!("\n=== Relink Results ===");
    println!("Documents cataloged: {}", summary.cataloged);
    println!("Links remapped: {}", summary.remapped);
    match mode {
        RelinkMode::Write => println!("Documents rewritten: {}", summary.modified.len()),
        RelinkMode::DryRun => {
            println!("Documents that would change: {}", summary.modified.len());
            for path in &summary.modified {
                println!("  {}", path.display());
            }
        }
    }
    if !summary.unresolved.is_empty() {
        println!("Unresolved links: {}", summary.unresolved.len());
        for link in &summary.unresolved {
            println!("  {}: {}", link.path.display(), link.target);
        }
    }
    if summary.toc_written {
        println!("Toc written to {}", summary.toc_path.display());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.command.verbose() { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Build {
            source,
            warn_unresolved,
        } => {
            let mut config = source.load()?;
            config.warn_unresolved |= warn_unresolved;
            let summary = run(&config, RelinkMode::Write)?;
            print_summary(&summary, RelinkMode::Write);
            Ok(())
        }

        Commands::Check {
            source,
            warn_unresolved,
        } => {
            let mut config = source.load()?;
            config.warn_unresolved |= warn_unresolved;
            let summary = run(&config, RelinkMode::DryRun)?;
            print_summary(&summary, RelinkMode::DryRun);
            if !summary.modified.is_empty() {
                eprintln!("Error: links are out of date; run `docref build` to fix them");
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Catalog { source, json } => {
            let config = source.load()?;
            let catalog = Catalog::from_config(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                for (basename, url) in catalog.iter() {
                    println!("{basename} -> {url}");
                }
            }
            Ok(())
        }
    }
}
