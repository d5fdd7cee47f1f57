//! # xlines
//!
//! Count lines of text across filesystem objects, concurrently.
//!
//! ## Usage
//!
//! ```bash
//! # Count everything under the current directory
//! xlines .
//!
//! # Several origins, four workers (the default cap)
//! xlines src/ docs/ README.md
//!
//! # Single worker, blank lines excluded
//! xlines . --serial --no-whitespace
//!
//! # Extra exclusions on top of the defaults
//! xlines . --exclude-ext svg --exclude-dir node_modules
//!
//! # Machine-readable output
//! xlines . --output json
//! ```
//!
//! The CLI wires the xlineslib pipeline together: resolve origins, filter
//! excluded and binary objects, count concurrently, render. Per-path
//! failures never abort a run; files that are not text show up with a `--`
//! count, and `--debug` lists them plus writes the raw result set as a JSON
//! artifact to the temp directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use xlineslib::{
    count_origins, EngineOptions, ExclusionRules, PathStyle, Totals, MAX_WORKERS,
};

mod render;

/// Output rendering modes. Closed set, matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    fn from_arg(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("xlines")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count lines of text across filesystem objects")
        .arg(
            Arg::new("paths")
                .help("Files or directories to count (defaults to current directory)")
                .num_args(0..)
                .default_value("."),
        )
        .arg(
            Arg::new("workers")
                .short('n')
                .long("workers")
                .value_parser(clap::value_parser!(usize))
                .default_value("4")
                .help("Cap on concurrent counting workers"),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .action(ArgAction::SetTrue)
                .help("Run with a single worker"),
        )
        .arg(
            Arg::new("no-whitespace")
                .short('w')
                .long("no-whitespace")
                .action(ArgAction::SetTrue)
                .help("Exclude blank lines from counts"),
        )
        .arg(
            Arg::new("exclude-ext")
                .short('e')
                .long("exclude-ext")
                .action(ArgAction::Append)
                .help("Additional file extension to exclude (can be repeated)"),
        )
        .arg(
            Arg::new("exclude-dir")
                .long("exclude-dir")
                .action(ArgAction::Append)
                .help("Additional directory marker to exclude (can be repeated)"),
        )
        .arg(
            Arg::new("no-default-exclusions")
                .long("no-default-exclusions")
                .action(ArgAction::SetTrue)
                .help("Start from an empty exclusion set"),
        )
        .arg(
            Arg::new("exclusions-file")
                .long("exclusions-file")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Load excluded extensions from a one-entry-per-line file"),
        )
        .arg(
            Arg::new("show-exclusions")
                .long("show-exclusions")
                .action(ArgAction::SetTrue)
                .help("List the active exclusions and exit"),
        )
        .arg(
            Arg::new("relative")
                .long("relative")
                .action(ArgAction::SetTrue)
                .help("Report paths relative to the current directory"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Verbose logging, skipped-object listing, and a JSON result artifact"),
        )
}

/// Install the tracing subscriber when asked for.
///
/// Logging goes to stderr so tables and JSON stay clean on stdout.
fn init_logging(debug: bool) {
    if !debug && std::env::var_os("XLINES_LOG").is_none() {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_env("XLINES_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Assemble exclusion rules from the flag set.
fn build_rules(matches: &ArgMatches) -> ExclusionRules {
    let mut rules = if matches.get_flag("no-default-exclusions") {
        ExclusionRules::none()
    } else if let Some(path) = matches.get_one::<PathBuf>("exclusions-file") {
        ExclusionRules::from_list_file(path)
    } else {
        ExclusionRules::default()
    };

    if let Some(exts) = matches.get_many::<String>("exclude-ext") {
        for ext in exts {
            rules.add_extension(ext);
        }
    }
    if let Some(dirs) = matches.get_many::<String>("exclude-dir") {
        for dir in dirs {
            rules.add_dir_marker(dir);
        }
    }
    rules
}

fn show_exclusions(rules: &ExclusionRules) {
    println!("File types excluded from line totals:");
    for (index, ext) in rules.extensions().enumerate() {
        println!("  {:>3}): {}", index + 1, ext);
    }
    println!("Directory markers excluded from line totals:");
    for (index, marker) in rules.dir_markers().enumerate() {
        println!("  {:>3}): {}", index + 1, marker);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let debug = matches.get_flag("debug");
    init_logging(debug);

    let rules = build_rules(matches);
    if matches.get_flag("show-exclusions") {
        show_exclusions(&rules);
        return Ok(());
    }

    let origins: Vec<PathBuf> = matches
        .get_many::<String>("paths")
        .map(|v| v.map(PathBuf::from).collect())
        .unwrap_or_else(|| vec![PathBuf::from(".")]);

    let worker_cap = if matches.get_flag("serial") {
        1
    } else {
        *matches.get_one::<usize>("workers").unwrap_or(&MAX_WORKERS)
    };
    if worker_cap == 0 {
        bail!("--workers must be at least 1");
    }

    let mut options = EngineOptions::new()
        .workers(worker_cap)
        .whitespace(!matches.get_flag("no-whitespace"));
    if debug {
        options = options.debug_artifact(std::env::temp_dir().join("xlines-results.json"));
    }

    let style = if matches.get_flag("relative") {
        PathStyle::Relative
    } else {
        PathStyle::Absolute
    };

    let records =
        count_origins(&origins, &rules, style, &options).context("counting failed")?;
    let totals = Totals::from_records(&records);

    let format = matches
        .get_one::<String>("output")
        .map(|s| OutputFormat::from_arg(s))
        .unwrap_or(OutputFormat::Table);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "objects": records,
                "totals": totals,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            print!("{}", render::render_table(&records, &totals));
            if debug {
                if let Some(section) = render::render_failures(&records) {
                    print!("{section}");
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_for(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["xlines"];
        argv.extend(args);
        build_command().get_matches_from(argv)
    }

    #[test]
    fn test_default_args() {
        let matches = matches_for(&[]);
        let paths: Vec<&String> = matches.get_many("paths").unwrap().collect();
        assert_eq!(paths, vec!["."]);
        assert_eq!(*matches.get_one::<usize>("workers").unwrap(), 4);
        assert!(!matches.get_flag("serial"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_arg("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_arg("table"), OutputFormat::Table);
    }

    #[test]
    fn test_rules_from_flags() {
        let matches = matches_for(&[
            ".",
            "--no-default-exclusions",
            "--exclude-ext",
            "svg",
            "--exclude-dir",
            "node_modules",
        ]);
        let rules = build_rules(&matches);

        let exts: Vec<&str> = rules.extensions().collect();
        assert_eq!(exts, vec![".svg"]);
        let markers: Vec<&str> = rules.dir_markers().collect();
        assert_eq!(markers, vec!["node_modules"]);
    }
}
