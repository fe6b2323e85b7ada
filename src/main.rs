// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Loan Tree CLI entrypoint.
//!
//! By default this runs the interactive TUI. `--check` and `--render` run headless and exit.

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use loan_tree::model::demo_tree;
use loan_tree::render::render_tree_unicode;
use loan_tree::store::{check_tree, TreeStore};
use loan_tree::tui::{self, TuiOptions};

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "loan-tree",
    version,
    about = "Edit account, loan and collateral trees in the terminal"
)]
struct CliOptions {
    /// JSON export to import at startup.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Start from the built-in demo tree.
    #[arg(long, conflicts_with = "file")]
    demo: bool,

    /// Print integrity issues and exit (non-zero when any are found).
    #[arg(long, conflicts_with = "render")]
    check: bool,

    /// Print the diagram to stdout and exit.
    #[arg(long)]
    render: bool,

    /// Directory the TUI writes exports into.
    #[arg(long, value_name = "DIR", default_value = ".")]
    export_dir: PathBuf,

    /// Write logs to this file (the TUI logs nowhere otherwise).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl CliOptions {
    fn headless(&self) -> bool {
        self.check || self.render
    }
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn setup_logging(options: &CliOptions) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(options.verbose).into())
        .from_env_lossy();

    if let Some(path) = &options.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|err| err as Box<dyn Error>)?;
    } else if options.headless() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| err as Box<dyn Error>)?;
    }
    // The TUI owns the terminal, so without a log file nothing is installed.
    Ok(())
}

fn load_store(options: &CliOptions) -> Result<TreeStore, Box<dyn Error>> {
    if options.demo {
        return Ok(TreeStore::from_nodes(demo_tree()));
    }

    let mut store = TreeStore::new();
    if let Some(path) = &options.file {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
        let count = store
            .import_json(&text)
            .map_err(|err| format!("cannot import {}: {err}", path.display()))?;
        tracing::info!(path = %path.display(), count, "imported tree");
    }
    Ok(store)
}

/// Prints integrity issues; returns whether the tree is clean.
fn run_check(store: &TreeStore) -> bool {
    let issues = check_tree(store.nodes(), store.selected_id());
    if issues.is_empty() {
        println!("{} nodes, no integrity issues", store.len());
        return true;
    }
    for issue in &issues {
        println!("{issue}");
    }
    println!("{} nodes, {} integrity issues", store.len(), issues.len());
    false
}

fn run(options: CliOptions) -> Result<bool, Box<dyn Error>> {
    setup_logging(&options)?;
    let store = load_store(&options)?;

    if options.check {
        return Ok(run_check(&store));
    }

    if options.render {
        let text = render_tree_unicode(&store)?;
        if !text.is_empty() {
            println!("{text}");
        }
        return Ok(true);
    }

    tui::run(store, TuiOptions { export_dir: options.export_dir })?;
    Ok(true)
}

fn main() {
    let options = CliOptions::parse();

    match run(options) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("loan-tree: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use tracing::level_filters::LevelFilter;

    use super::{level_for, load_store, run_check, setup_logging, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, clap::Error> {
        CliOptions::try_parse_from(std::iter::once("loan-tree").chain(args.iter().copied()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options.file, None);
        assert!(!options.demo);
        assert!(!options.headless());
        assert_eq!(options.export_dir, PathBuf::from("."));
        assert_eq!(options.verbose, 0);
    }

    #[test]
    fn parses_file_and_flags() {
        let options = parse(&["tree.json", "--render", "--export-dir", "out", "-vv"])
            .expect("parse options");
        assert_eq!(options.file, Some(PathBuf::from("tree.json")));
        assert!(options.render);
        assert!(options.headless());
        assert_eq!(options.export_dir, PathBuf::from("out"));
        assert_eq!(options.verbose, 2);
    }

    #[test]
    fn rejects_demo_with_file() {
        parse(&["--demo", "tree.json"]).unwrap_err();
    }

    #[test]
    fn rejects_check_with_render() {
        parse(&["--check", "--render"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(7), LevelFilter::TRACE);
    }

    #[test]
    fn second_logging_setup_reports_an_error() {
        let options = parse(&["--demo", "--render"]).expect("parse options");
        setup_logging(&options).expect("first subscriber installs");
        assert!(setup_logging(&options).is_err());
    }

    #[test]
    fn demo_store_passes_check() {
        let options = parse(&["--demo", "--check"]).expect("parse options");
        let store = load_store(&options).expect("demo store");
        assert!(!store.is_empty());
        assert!(run_check(&store));
    }

    #[test]
    fn missing_file_is_an_error() {
        let options = parse(&["does/not/exist.json"]).expect("parse options");
        let err = load_store(&options).unwrap_err();
        assert!(err.to_string().starts_with("cannot read does/not/exist.json"));
    }
}
