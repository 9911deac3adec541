use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_tree_catalog::{Catalog, RouterConfig};
use command_tree_core::{CommandTree, KeyComparison, NamedValues, SearchOptions, TrailingPolicy};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod output;

use output::{
    BatchEntry, MatchReport, OutputFormat, format_batch, format_listing, format_matches,
    list_commands,
};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
const LOG_ENV: &str = "COMMAND_TREE_LOG";

#[derive(Debug, Parser)]
#[command(name = "command-tree")]
#[command(about = "Resolve command input against declarative command trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one raw command string.
    Search(SearchArgs),
    /// Resolve preparsed named values and positional values.
    SearchPreparsed(SearchPreparsedArgs),
    /// Resolve one raw command string per input line, in parallel.
    Batch(BatchArgs),
    /// Build catalogs and report the first invariant violation.
    Validate(ValidateArgs),
    /// Print every command path with its overload signatures.
    List(ListArgs),
}

/// Where the tree comes from and how to search it.
#[derive(Debug, Args)]
struct TreeArgs {
    /// Catalog file or directory (repeatable, merged in order).
    #[arg(long = "catalog", value_name = "PATH")]
    catalogs: Vec<PathBuf>,
    /// Router config YAML naming catalogs and search options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Compare keys and parameter names case-insensitively.
    #[arg(long)]
    ignore_case: bool,
    /// Drop overloads that leave input unconsumed.
    #[arg(long)]
    reject_trailing: bool,
}

#[derive(Debug, Args)]
struct SearchArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Raw command string, e.g. "mod kick bob -r spam".
    #[arg(allow_hyphen_values = true)]
    input: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct SearchPreparsedArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Named value as NAME=VALUE (repeatable).
    #[arg(long = "named", value_name = "NAME=VALUE", value_parser = parse_named)]
    named: Vec<(String, String)>,
    /// Switch name, supplied without a value (repeatable).
    #[arg(long = "switch", value_name = "NAME")]
    switches: Vec<String>,
    /// Routing keys followed by positional values.
    #[arg(required = true)]
    values: Vec<String>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct BatchArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// File with one command per line (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Number of worker threads (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Search(args) => run_search(args),
        Command::SearchPreparsed(args) => run_search_preparsed(args),
        Command::Batch(args) => run_batch(args),
        Command::Validate(args) => run_validate(args),
        Command::List(args) => run_list(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_search(args: SearchArgs) -> Result<(), String> {
    let (tree, options) = load_tree(&args.tree)?;
    let matches: Vec<MatchReport> = tree
        .search(&args.input, &options)
        .iter()
        .map(MatchReport::from)
        .collect();

    print_output(format_matches(&matches, args.format)?);
    Ok(())
}

fn run_search_preparsed(args: SearchPreparsedArgs) -> Result<(), String> {
    let (tree, options) = load_tree(&args.tree)?;
    let named = collect_named(args.named, args.switches);
    let matches: Vec<MatchReport> = tree
        .search_preparsed(&named, &args.values, &options)
        .iter()
        .map(MatchReport::from)
        .collect();

    print_output(format_matches(&matches, args.format)?);
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    let (tree, options) = load_tree(&args.tree)?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            buf
        }
    };
    let inputs = batch_lines(&raw);

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool
        .build()
        .map_err(|err| format!("Failed to start worker pool: {err}"))?;

    debug!(lines = inputs.len(), "Running batch search");
    let entries: Vec<BatchEntry> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| BatchEntry {
                input: input.to_string(),
                matches: tree
                    .search(input, &options)
                    .iter()
                    .map(MatchReport::from)
                    .collect(),
            })
            .collect()
    });

    print_output(format_batch(&entries, args.format)?);
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let catalogs = args
        .inputs
        .iter()
        .map(|path| {
            Catalog::load(path).map_err(|err| format!("Failed to load '{}': {err}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let catalog = Catalog::merge(catalogs);
    let tree = catalog.build_tree().map_err(|e| e.to_string())?;

    println!(
        "Validated {} catalog source(s) with {} command(s).",
        args.inputs.len(),
        tree.commands().count()
    );
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), String> {
    let (tree, _) = load_tree(&args.tree)?;
    let listing = list_commands(&tree);
    print_output(format_listing(&listing, args.format)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loads the config (if any) and every `--catalog`, then applies flag overrides.
fn load_tree(args: &TreeArgs) -> Result<(CommandTree, SearchOptions), String> {
    let mut catalogs = Vec::new();
    let mut options = SearchOptions::default();

    if let Some(config_path) = &args.config {
        let config = RouterConfig::load(config_path)
            .map_err(|err| format!("Failed to load '{}': {err}", config_path.display()))?;
        let base_dir = config_path.parent().unwrap_or(Path::new("."));
        catalogs.push(config.load_catalog(base_dir).map_err(|e| e.to_string())?);
        options = config.search;
    }

    for path in &args.catalogs {
        let catalog = Catalog::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
        catalogs.push(catalog);
    }

    if catalogs.is_empty() {
        return Err("no catalogs given; use --catalog or --config".to_string());
    }

    if args.ignore_case {
        options.key_comparison = KeyComparison::CaseInsensitive;
    }
    if args.reject_trailing {
        options.trailing = TrailingPolicy::Reject;
    }

    let tree = Catalog::merge(catalogs)
        .build_tree()
        .map_err(|e| e.to_string())?;
    debug!(nodes = tree.len(), options = ?options, "Loaded command tree");
    Ok((tree, options))
}

fn parse_named(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Groups `--named` pairs by name and adds each `--switch` with no values.
fn collect_named(named: Vec<(String, String)>, switches: Vec<String>) -> NamedValues {
    let mut values = NamedValues::new();
    for (name, value) in named {
        values.entry(name).or_default().push(value);
    }
    for name in switches {
        values.entry(name).or_default();
    }
    values
}

/// Non-empty lines that are not `#` comments.
fn batch_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

fn print_output(output: String) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}
