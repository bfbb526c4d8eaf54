//! Command-line interface for xgb2tmva
//! Converts XGBoost text dumps into TMVA weight files and prints reconstructed trees for inspection.
//!
//! Usage:
//!   xgb2tmva convert `<dump>` --features `<file>` [--output `<file>`] [--format `<format>`]
//!   xgb2tmva convert `<dump>` --infer-features                 - Take features from split names
//!   xgb2tmva inspect `<dump>` [--fillna] [--summary]           - Show the reconstructed trees
//!   xgb2tmva list-formats                                      - List all available output formats

mod features;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xgb2tmva::dump::split_blocks;
use xgb2tmva::formats::FormatRegistry;
use xgb2tmva::{Converter, Ensemble, VariableTable};
use xgb2tmva_config::{Loader, Xgb2TmvaConfig};

fn build_cli() -> Command {
    Command::new("xgb2tmva")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert XGBoost text dumps into TMVA BDT weight files")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a dump into a weight file")
                .arg(dump_arg())
                .args(feature_args())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see list-formats)")
                        .default_value("tmva-xml"),
                )
                .arg(fillna_arg())
                .arg(
                    Arg::new("analysis-type")
                        .long("analysis-type")
                        .help("classification, regression or multiclass"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show the trees reconstructed from a dump")
                .arg(dump_arg())
                .args(feature_args())
                .arg(fillna_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see list-formats)")
                        .default_value("treeviz"),
                )
                .arg(
                    Arg::new("summary")
                        .long("summary")
                        .help("Print only tree, split and leaf counts")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
}

fn dump_arg() -> Arg {
    Arg::new("dump")
        .help("Path to the text dump (one tree, or booster[N] blocks)")
        .required(true)
        .index(1)
}

fn feature_args() -> [Arg; 2] {
    [
        Arg::new("features")
            .long("features")
            .short('F')
            .help("Feature list (.json, .yaml/.yml, or one `name [TYPE]` per line)")
            .conflicts_with("infer-features"),
        Arg::new("infer-features")
            .long("infer-features")
            .help("Take features from split names in order of appearance")
            .action(ArgAction::SetTrue),
    ]
}

fn fillna_arg() -> Arg {
    Arg::new("fillna")
        .long("fillna")
        .help("Replace nan leaf values with -999 instead of failing")
        .action(ArgAction::SetTrue)
}

fn main() {
    let matches = build_cli().get_matches();

    let config = load_config(&matches);
    init_logging(&config);

    match matches.subcommand() {
        Some(("convert", sub)) => handle_convert_command(sub, config),
        Some(("inspect", sub)) => handle_inspect_command(sub, config),
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!("a subcommand is required"),
    }
}

fn load_config(matches: &ArgMatches) -> Xgb2TmvaConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    match matches.subcommand() {
        Some(("convert", sub)) => {
            loader = apply_fillna(loader, sub);
            if let Some(analysis_type) = sub.get_one::<String>("analysis-type") {
                loader = loader
                    .set_override("convert.analysis_type", analysis_type.to_ascii_lowercase())
                    .unwrap_or_else(|e| fail(&format!("Invalid override: {}", e)));
            }
        }
        Some(("inspect", sub)) => loader = apply_fillna(loader, sub),
        _ => {}
    }

    loader
        .build()
        .unwrap_or_else(|e| fail(&format!("Configuration error: {}", e)))
}

fn apply_fillna(loader: Loader, matches: &ArgMatches) -> Loader {
    if !matches.get_flag("fillna") {
        return loader;
    }
    loader
        .set_override("convert.nan_substitution", true)
        .unwrap_or_else(|e| fail(&format!("Invalid override: {}", e)))
}

fn init_logging(config: &Xgb2TmvaConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: Xgb2TmvaConfig) {
    let format = matches
        .get_one::<String>("format")
        .expect("format has a default");
    let registry = FormatRegistry::with_defaults();
    let formatter = registry
        .resolve(format)
        .unwrap_or_else(|e| fail(&e.to_string()));

    let ensemble = load_ensemble(matches, Converter::new(config.convert.to_options()));
    let output = formatter
        .serialize(&ensemble)
        .unwrap_or_else(|e| fail(&e.to_string()));

    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, &output)
                .unwrap_or_else(|e| fail(&format!("Cannot write {}: {}", path, e)));
            info!(path = %path, summary = %ensemble.summary(), "wrote output");
        }
        None => print!("{}", output),
    }
}

/// Handle the inspect command
fn handle_inspect_command(matches: &ArgMatches, config: Xgb2TmvaConfig) {
    let ensemble = load_ensemble(matches, Converter::new(config.convert.to_options()));

    if matches.get_flag("summary") {
        println!("{}", ensemble.summary());
        return;
    }

    let format = matches
        .get_one::<String>("format")
        .expect("format has a default");
    let output = FormatRegistry::with_defaults()
        .serialize(&ensemble, format)
        .unwrap_or_else(|e| fail(&e.to_string()));
    print!("{}", output);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for formatter in registry.iter() {
        println!("  {} (.{})", formatter.name(), formatter.file_extension());
        println!("    {}", formatter.description());
        println!();
    }
}

/// Read the dump and feature list named on the command line and build the ensemble.
fn load_ensemble(matches: &ArgMatches, converter: Converter) -> Ensemble {
    let dump_path = matches
        .get_one::<String>("dump")
        .expect("dump path is required");
    let dump = fs::read_to_string(dump_path)
        .unwrap_or_else(|e| fail(&format!("Cannot read {}: {}", dump_path, e)));

    let variables = match matches.get_one::<String>("features") {
        Some(path) => features::load_feature_file(Path::new(path))
            .unwrap_or_else(|e| fail(&format!("Feature list error: {}", e))),
        None if matches.get_flag("infer-features") => infer_variables(&dump),
        None => fail("No feature list given; pass --features <file> or --infer-features"),
    };

    converter
        .build_ensemble_from_dump(&dump, variables)
        .unwrap_or_else(|e| fail(&format!("Conversion error: {}", e)))
}

fn infer_variables(dump: &str) -> VariableTable {
    let blocks: Vec<&str> = split_blocks(dump)
        .unwrap_or_else(|e| fail(&format!("Conversion error: {}", e)))
        .into_iter()
        .map(|block| block.text)
        .collect();
    VariableTable::infer(&blocks)
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
