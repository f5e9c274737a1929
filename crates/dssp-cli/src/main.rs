//! `dssp` command-line front end
//!
//! Exit codes: 0 on success (infeasible designs included), 1 on invalid
//! requests or standards, 2 on unreadable or malformed files.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dssp_core::{
    DesignError, DesignOrchestrator, DesignRequest, DesignResponse, SanitaryPipeRequest,
    StormPipeRequest, WaterServiceRequest,
};
use dssp_hydrology::{tabulate_standard, IntensityTable};
use dssp_standards::{ConfigFormat, ConfigurationError, StandardsTable};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_INVALID: u8 = 1;
const EXIT_UNREADABLE: u8 = 2;

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn cli() -> Command {
    let input = Arg::new("input")
        .long("input")
        .short('i')
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Request JSON file");
    let pretty = Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Pretty-print JSON output");

    Command::new("dssp")
        .version(dssp_core::VERSION)
        .about("Development servicing design: storm, sanitary and water service sizing")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("standards")
                .long("standards")
                .value_name("FILE")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Standards table (.toml, .yaml, .json); built-in table when absent"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("design")
                .about("Design a single pipe or service")
                .subcommand_required(true)
                .subcommand(
                    Command::new("storm")
                        .about("Size a storm sewer (Rational Method + Manning)")
                        .arg(input.clone())
                        .arg(pretty.clone()),
                )
                .subcommand(
                    Command::new("sanitary")
                        .about("Size a sanitary sewer (peaked demand + Manning)")
                        .arg(input.clone())
                        .arg(pretty.clone()),
                )
                .subcommand(
                    Command::new("water")
                        .about("Size a water service (Hazen-Williams)")
                        .arg(input.clone())
                        .arg(pretty.clone()),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Design a JSON array of requests tagged by \"kind\", in parallel")
                .arg(input)
                .arg(pretty),
        )
        .subcommand(
            Command::new("standards")
                .about("Print the standards table in effect")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "yaml", "toml"])
                        .default_value("json")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("idf")
                .about("Print rainfall intensities for every registered return period")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let orchestrator = orchestrator(matches.get_one::<PathBuf>("standards"))?;

    match matches.subcommand() {
        Some(("design", args)) => design(&orchestrator, args),
        Some(("batch", args)) => batch(&orchestrator, args),
        Some(("standards", args)) => {
            let format = match args.get_one::<String>("format").map(String::as_str) {
                Some("yaml") => ConfigFormat::Yaml,
                Some("toml") => ConfigFormat::Toml,
                _ => ConfigFormat::Json,
            };
            println!("{}", orchestrator.standards().to_string_with(format)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(("idf", args)) => {
            let table = tabulate_standard(orchestrator.standards())?;
            if args.get_flag("json") {
                print_json(&table, true)
            } else {
                print!("{}", render_intensity_table(&table));
                Ok(ExitCode::SUCCESS)
            }
        }
        _ => anyhow::bail!("no command given; see --help"),
    }
}

/// Orchestrator over the built-in table, or over a file installed as the
/// process-wide table
fn orchestrator(standards: Option<&PathBuf>) -> Result<DesignOrchestrator> {
    if let Some(path) = standards {
        let table = StandardsTable::from_path(path)?;
        dssp_standards::install(table)?;
    }
    Ok(DesignOrchestrator::global())
}

fn design(orchestrator: &DesignOrchestrator, args: &ArgMatches) -> Result<ExitCode> {
    let (kind, sub) = args.subcommand().context("design kind required")?;
    let input = sub.get_one::<PathBuf>("input").context("--input is required")?;

    let response = match kind {
        "storm" => DesignResponse::Storm(
            orchestrator.design_storm_pipe(&read_json::<StormPipeRequest>(input)?)?,
        ),
        "sanitary" => DesignResponse::Sanitary(
            orchestrator.design_sanitary_pipe(&read_json::<SanitaryPipeRequest>(input)?)?,
        ),
        "water" => DesignResponse::Water(
            orchestrator.design_water_service(&read_json::<WaterServiceRequest>(input)?)?,
        ),
        other => anyhow::bail!("unknown design kind '{other}'"),
    };

    if !response.is_adequate() {
        tracing::warn!(notes = response.notes().len(), "Design does not meet every criterion");
    }
    print_json(&response, sub.get_flag("pretty"))
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum BatchItem {
    Ok {
        response: DesignResponse,
    },
    Error {
        field: Option<&'static str>,
        message: String,
    },
}

fn batch(orchestrator: &DesignOrchestrator, args: &ArgMatches) -> Result<ExitCode> {
    let input = args.get_one::<PathBuf>("input").context("--input is required")?;
    let requests: Vec<DesignRequest> = read_json(input)?;

    let items: Vec<BatchItem> = requests
        .par_iter()
        .map(|request| match orchestrator.design(request) {
            Ok(response) => BatchItem::Ok { response },
            Err(err) => BatchItem::Error {
                field: err.field(),
                message: err.to_string(),
            },
        })
        .collect();

    let failed = items
        .iter()
        .filter(|item| matches!(item, BatchItem::Error { .. }))
        .count();
    tracing::info!(requests = items.len(), failed, "Batch complete");

    print_json(&items, args.get_flag("pretty"))?;
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<ExitCode> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}

fn render_intensity_table(table: &IntensityTable) -> String {
    let mut out = format!("{:>8}", "T (yr)");
    for d in &table.durations_min {
        out.push_str(&format!("{:>9}", format!("{:.0} min", d.value())));
    }
    out.push('\n');
    for row in &table.rows {
        out.push_str(&format!("{:>8}", row.return_period_years.years()));
        for i in &row.intensities_mm_h {
            out.push_str(&format!("{:>9.1}", i.value()));
        }
        out.push('\n');
    }
    out.push_str("intensities in mm/h\n");
    out
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<DesignError>() {
            return match e {
                DesignError::Configuration(c) => configuration_exit_code(c),
                _ => EXIT_INVALID,
            };
        }
        if let Some(c) = cause.downcast_ref::<ConfigurationError>() {
            return configuration_exit_code(c);
        }
        if let Some(e) = cause.downcast_ref::<serde_json::Error>() {
            // well-formed JSON with bad values is a request error
            return if e.is_data() { EXIT_INVALID } else { EXIT_UNREADABLE };
        }
        if cause.is::<std::io::Error>() {
            return EXIT_UNREADABLE;
        }
    }
    EXIT_INVALID
}

fn configuration_exit_code(err: &ConfigurationError) -> u8 {
    match err {
        ConfigurationError::Io { .. } | ConfigurationError::Parse { .. } => EXIT_UNREADABLE,
        _ => EXIT_INVALID,
    }
}
