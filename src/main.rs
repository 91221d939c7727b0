mod settings;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use p2cave_data::catalog::Catalog;
use p2cave_data::cave_parser;
use p2cave_data::derivation::{self, SublevelAnalysis};
use p2cave_types::CaveKind;

use crate::settings::Settings;

/// Print per-sublevel spawn bounds for a Pikmin 2 cave definition file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Cave definition file, e.g. `caveinfo/tutorial_1.txt`.
    cave: PathBuf,

    /// TOML settings file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).wrap_err("loading settings")?;
    init_logging(&settings.log_level, cli.verbose);

    let mut catalog = Catalog::builtin();
    settings.extend_catalog(&mut catalog);

    let bytes = std::fs::read(&cli.cave)
        .wrap_err_with(|| format!("reading {}", cli.cave.display()))?;
    let input = String::from_utf8_lossy(&bytes);
    let cave = cave_parser::parse_cave(&input, &catalog)
        .wrap_err_with(|| format!("parsing {}", cli.cave.display()))?;

    let kind = cli
        .cave
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(CaveKind::from_file_stem)
        .unwrap_or_default();
    log::info!(
        "{}: {kind:?} cave with {} sublevels",
        cli.cave.display(),
        cave.sublevels.len()
    );

    let analysis = derivation::analyze_cave(&cave, &catalog);
    for diagnostic in &analysis.diagnostics {
        log::warn!("{diagnostic}");
    }
    for sublevel in &analysis.sublevels {
        print_sublevel(sublevel);
    }
    Ok(())
}

fn init_logging(filters: &str, verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filters);
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.parse_default_env();
    builder.init();
}

fn print_sublevel(sublevel: &SublevelAnalysis) {
    println!("Sublevel {}", sublevel.number);
    for class in sublevel.classes() {
        let Some(entry) = sublevel.entries_of_class(class).next() else {
            continue;
        };
        let info = &entry.info;
        let name = if info.disambiguator.is_empty() {
            info.display_name.clone()
        } else {
            format!("{} ({})", info.display_name, info.disambiguator)
        };
        println!(
            "  {class:<16} {name:<32} {:<4} min {:>3}  max {:>3}",
            info.kind.tag(),
            sublevel.min_spawns(class),
            sublevel.max_spawns(class).to_string(),
        );
    }
    if let Some((source, max)) = sublevel.max_mitites() {
        println!("  Mitite groups {}: max {max}", source.description());
    }
}
