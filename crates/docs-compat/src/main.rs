use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docs_compat::utils::file_io::{read_document, replace_document};
use docs_compat::utils::glob_expand::expand_globs;
use docs_compat::{CompatConfig, RewriteStats, RuleRegistry, TransformOutcome, Transformer};

#[derive(Parser)]
#[command(name = "docs-compat")]
#[command(about = "Rewrite component-tag markdown into strict template syntax")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the nearest docs-compat.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite documents
    Convert {
        /// Input files (can be multiple files or glob patterns like "docs/**/*.md")
        #[arg(required = true)]
        files: Vec<String>,

        /// Rules to apply (defaults to the configured rules)
        #[arg(short = 'r', long = "rule")]
        rule: Vec<String>,

        /// Edit files in place
        #[arg(short, long)]
        in_place: bool,

        /// Check mode: show what would be changed without modifying files
        #[arg(short, long)]
        check: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report documents the transform would change
    Check {
        /// Input files (can be multiple files or glob patterns like "docs/**/*.md")
        #[arg(required = true)]
        files: Vec<String>,

        /// Rules to check (defaults to the configured rules)
        #[arg(short = 'r', long = "rule")]
        rule: Vec<String>,

        /// Output results as JSONL
        #[arg(long)]
        json: bool,
    },

    /// List all available rules
    ListRules,

    /// Print the custom-element allow-list as JSON
    CustomElements,
}

/// One line of `check --json` output.
#[derive(Serialize)]
struct CheckRecord<'a> {
    file_path: String,
    would_change: bool,
    rewrites: usize,
    by_rule: &'a BTreeMap<String, usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docs_compat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            files,
            rule,
            in_place,
            check: check_mode,
            verbose,
        } => {
            let transformer = build_transformer(&config, &rule)?;
            let file_paths = expand_globs(&files, &config)?;
            let mut changed_files = 0;

            for file_path in file_paths {
                // Progress goes to stderr; stdout carries only document text.
                if verbose {
                    eprintln!("Processing: {}", file_path.display());
                }

                let source = read_document(&file_path)?;
                let id = file_path.to_string_lossy();
                let outcome = transformer.transform(&source, &id);

                let TransformOutcome::Changed(transformed) = outcome else {
                    if verbose {
                        eprintln!("  {} unchanged", "✓".green());
                    }
                    if !in_place && !check_mode {
                        print!("{}", source);
                    }
                    continue;
                };
                changed_files += 1;

                if verbose || check_mode {
                    eprintln!(
                        "  {} {} - {} rewrite(s)",
                        if check_mode { "Would fix" } else { "Fixed" },
                        file_path.display(),
                        transformed.stats.total()
                    );
                    for line in rule_count_lines(&transformed.stats) {
                        eprintln!("{line}");
                    }
                }

                if check_mode {
                    continue;
                }
                if in_place {
                    replace_document(&file_path, &transformed.text)?;
                } else {
                    print!("{}", transformed.text);
                }
            }

            tracing::info!(changed_files, "Conversion finished");
            Ok(())
        }

        Commands::Check { files, rule, json } => {
            let transformer = build_transformer(&config, &rule)?;
            let file_paths = expand_globs(&files, &config)?;

            let mut total_files = 0;
            let mut files_to_change = 0;
            let mut totals = RewriteStats::default();

            for file_path in file_paths {
                total_files += 1;
                let source = read_document(&file_path)?;
                let id = file_path.to_string_lossy();

                let (would_change, stats) = match transformer.transform(&source, &id) {
                    TransformOutcome::Changed(t) => (true, t.stats),
                    TransformOutcome::Unchanged => (false, RewriteStats::default()),
                };
                if would_change {
                    files_to_change += 1;
                    totals.merge(&stats);
                }

                if json {
                    let record = CheckRecord {
                        file_path: file_path.display().to_string(),
                        would_change,
                        rewrites: stats.total(),
                        by_rule: &stats.by_rule,
                    };
                    println!("{}", serde_json::to_string(&record)?);
                } else if would_change {
                    println!(
                        "  {} {} - {} rewrite(s)",
                        "✗".red(),
                        file_path.display(),
                        stats.total()
                    );
                }
            }

            if !json {
                print_check_summary(total_files, files_to_change, &totals);
            }

            if files_to_change > 0 {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::ListRules => {
            println!("{}", "Available rules (in execution order):".bold());
            let registry = RuleRegistry::new();
            for (name, description) in registry.list() {
                println!("  {} - {}", name.cyan(), description);
            }
            Ok(())
        }

        Commands::CustomElements => {
            let elements = config.custom_elements()?;
            println!("{}", elements.to_json()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CompatConfig> {
    match path {
        Some(path) => CompatConfig::load(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            Ok(CompatConfig::discover(&cwd)?)
        }
    }
}

/// Rules named on the command line take precedence over the configuration.
fn build_transformer(config: &CompatConfig, rules: &[String]) -> Result<Transformer> {
    if rules.is_empty() {
        return Ok(Transformer::new(config)?);
    }
    let pipeline = RuleRegistry::new().pipeline(rules)?;
    Ok(Transformer::with_pipeline(&config.markdown_suffix, pipeline))
}

fn rule_count_lines(stats: &RewriteStats) -> impl Iterator<Item = String> + '_ {
    stats
        .by_rule
        .iter()
        .map(|(rule, count)| format!("    {}: {}", rule.cyan(), count))
}

fn print_check_summary(total_files: usize, files_to_change: usize, totals: &RewriteStats) {
    let files_clean = total_files - files_to_change;

    println!("\n{}", "=== Summary ===".bold());
    println!("Total files:         {}", total_files);
    println!(
        "Files to rewrite:    {} {}",
        files_to_change,
        if files_to_change > 0 {
            "✗".red()
        } else {
            "✓".green()
        }
    );
    println!("Clean files:         {} {}", files_clean, "✓".green());

    if !totals.is_empty() {
        println!("\n{}", "Rewrites by rule:".bold());
        for line in rule_count_lines(totals) {
            println!("{line}");
        }
    }

    println!("\nTotal rewrites:      {}", totals.total());
}
