//! `rpm-license-updater` — fill in the License column of a package table from dnf metadata.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and apply CLI overrides.
//! 3. Read the table ([`table::Table::read`]).
//! 4. Build the resolver for the configured backend ([`resolver`]). The
//!    `repoquery` backend opens one [`repository::dnf::RepoSession`] for the whole run.
//! 5. Process rows in table order ([`processor::RowProcessor`]).
//! 6. Write the CSV (`-o`) or print a head/tail preview ([`report`]).
//! 7. Exit `0`. Fatal problems and failed rows are reported on stderr only.

mod cli;
mod config;
mod error;
mod models;
mod normalizer;
mod processor;
mod report;
mod repository;
mod resolver;
mod table;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cli::{Cli, ReportFormat};
use config::{load_config, Backend, Config};
use models::RowOutcome;
use normalizer::normalize_name;
use processor::RowProcessor;
use repository::dnf::{DnfRepoQuery, RepoSession};
use repository::info::DnfInfoQuery;
use repository::SystemRunner;
use resolver::evr::{lookup_once, EvrResolver};
use resolver::source::SourceResolver;
use resolver::LicenseResolver;
use table::Table;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("{:#}", e).red());
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    if let Some(package) = &cli.lookup {
        lookup_single(&config, package);
        return Ok(());
    }

    let input = cli.input.as_deref().context("no input CSV given")?;
    let mut table = Table::read(input, &config.columns)?;

    let session;
    let resolver: Box<dyn LicenseResolver + '_> = match config.backend {
        Backend::Repoquery => {
            if !cli.quiet {
                eprintln!(
                    "  {} Initializing dnf and loading repository metadata...",
                    "→".cyan()
                );
            }
            session = RepoSession::open(&config.dnf_command, Box::new(SystemRunner))?;
            Box::new(EvrResolver::new(DnfRepoQuery::new(&session)))
        }
        Backend::Info => Box::new(SourceResolver::new(DnfInfoQuery::new(
            &config.dnf_command,
            Box::new(SystemRunner),
        ))),
    };

    let pb = if !cli.quiet && !cli.verbose {
        let pb = ProgressBar::new(table.rows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let processor = RowProcessor::new(resolver.as_ref(), &config.eligible_value, &config.architectures);
    let summary = processor.process_all(&mut table.rows, |row, outcome| {
        let line = match outcome {
            RowOutcome::Failed { marker, reason } => Some(format!(
                "  {} {}: {} ({})",
                "✗".red(),
                row.package,
                marker,
                reason
            )),
            RowOutcome::Updated(license) if cli.verbose => {
                Some(format!("  {} {}: {}", "✓".green(), row.package, license))
            }
            RowOutcome::Skipped if cli.verbose => Some(format!(
                "  {} Skipping package {} ({} is not '{}')",
                "–".yellow(),
                row.package,
                config.columns.flag,
                config.eligible_value
            )),
            _ => None,
        };

        if let Some(line) = line.filter(|_| !cli.quiet) {
            match &pb {
                Some(pb) => pb.suspend(|| eprintln!("{}", line)),
                None => eprintln!("{}", line),
            }
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match (&cli.output, &cli.report) {
        (Some(path), _) => match table.write(path) {
            Ok(()) => {
                if !cli.quiet {
                    eprintln!("\nUpdated data saved to '{}'", path.display());
                }
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        },
        (None, ReportFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&table.to_json())?);
            return Ok(());
        }
        (None, ReportFormat::Table) => {
            if !cli.quiet {
                report::terminal::render_preview(&table, config.preview_rows);
            }
        }
    }

    report::terminal::render_summary(&summary, cli.quiet);
    Ok(())
}

/// `--lookup`: resolve one package and print its license (or error marker).
fn lookup_single(config: &Config, package: &str) {
    let name = normalize_name(package, &config.architectures);
    let result = match config.backend {
        Backend::Repoquery => lookup_once(&config.dnf_command, Box::new(SystemRunner), &name),
        Backend::Info => SourceResolver::new(DnfInfoQuery::new(&config.dnf_command, Box::new(SystemRunner)))
            .resolve_license(&name),
    };

    match result {
        Ok(license) => println!("{}", license),
        Err(e) => {
            eprintln!("{} {}", "warning:".yellow().bold(), e);
            println!("{}", e.marker());
        }
    }
}
