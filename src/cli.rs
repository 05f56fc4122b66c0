use serde::Serialize;

use crate::config::Settings;
use crate::data::{load_configured, load_dataset, validate_indexes, ValidationSeverity};
use crate::engine::{split_type_combo, QueryEngine, QueryRequest, SpeciesFilter, StatQuery};
use crate::{logging, server};

const USAGE: &str =
    "usage: pokefinder <serve|lookup|move|types|stats|matchup|profile|query|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Lookup,
    Move,
    Types,
    Stats,
    Matchup,
    Profile,
    Query,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("lookup") => Some(Command::Lookup),
        Some("move") => Some(Command::Move),
        Some("types") => Some(Command::Types),
        Some("stats") => Some(Command::Stats),
        Some("matchup") => Some(Command::Matchup),
        Some("profile") => Some(Command::Profile),
        Some("query") => Some(Command::Query),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let settings = Settings::from_env();
    logging::init(&settings.log_filter);

    match command {
        Command::Serve => handle_serve(&settings),
        Command::Validate => handle_validate(args, &settings),
        Command::Lookup
        | Command::Move
        | Command::Types
        | Command::Stats
        | Command::Matchup
        | Command::Profile
        | Command::Query => match build_request(command, args) {
            Ok(request) => handle_query(&request, &settings),
            Err(usage) => {
                eprintln!("usage: pokefinder {usage}");
                2
            }
        },
    }
}

fn handle_serve(settings: &Settings) -> i32 {
    match server::run_server(settings) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Turn positional args into a request; `Err` carries the usage line for the command.
pub fn build_request(command: Command, args: &[String]) -> Result<QueryRequest, &'static str> {
    let positional = |index: usize| args.get(index).filter(|arg| !arg.starts_with("--"));
    let filter = species_flags(args);

    let request = match command {
        Command::Lookup => QueryRequest::Lookup {
            name: positional(2).ok_or("lookup <name>")?.to_lowercase(),
        },
        Command::Move => QueryRequest::Move {
            move_name: positional(2)
                .ok_or("move <move> [--legendary] [--mythical] [--ultra-beast]")?
                .to_lowercase(),
            filter,
        },
        Command::Types => QueryRequest::Types {
            types: split_type_combo(
                positional(2)
                    .ok_or("types <type[-type]> [--legendary] [--mythical] [--ultra-beast]")?,
            ),
            filter,
        },
        Command::Stats => {
            const STATS_USAGE: &str =
                "stats <primary> <secondary> [--min-primary N] [--min-secondary N] [--min-speed N]";
            let primary = positional(2).ok_or(STATS_USAGE)?;
            let secondary = positional(3).ok_or(STATS_USAGE)?;
            let mut query = StatQuery::new(primary.as_str(), secondary.as_str()).filter(filter);
            query.min_primary = option_u32(args, "--min-primary", STATS_USAGE)?.unwrap_or(0);
            query.min_secondary = option_u32(args, "--min-secondary", STATS_USAGE)?;
            query.min_speed = option_u32(args, "--min-speed", STATS_USAGE)?;
            QueryRequest::Stats(query)
        }
        Command::Matchup => QueryRequest::Matchup {
            types: split_type_combo(positional(2).ok_or("matchup <type[-type]>")?),
        },
        Command::Profile => QueryRequest::Profile {
            name: positional(2).ok_or("profile <name>")?.to_lowercase(),
        },
        Command::Query => {
            const QUERY_USAGE: &str = "query '<json request>'";
            let raw = args.get(2).ok_or(QUERY_USAGE)?;
            let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| QUERY_USAGE)?;
            QueryRequest::from_json(&value).map_err(|err| {
                eprintln!("invalid request: {err}");
                QUERY_USAGE
            })?
        }
        Command::Serve | Command::Validate => {
            return Err("<lookup|move|types|stats|matchup|profile|query> ...")
        }
    };
    Ok(request)
}

fn species_flags(args: &[String]) -> SpeciesFilter {
    let has = |flag: &str| args.iter().any(|arg| arg == flag);
    SpeciesFilter::new(has("--legendary"), has("--mythical"), has("--ultra-beast"))
}

/// Value following `flag`, if present. A missing or non-numeric value yields `usage`.
fn option_u32(
    args: &[String],
    flag: &str,
    usage: &'static str,
) -> Result<Option<u32>, &'static str> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(index) => args
            .get(index + 1)
            .and_then(|value| value.parse::<u32>().ok())
            .map(Some)
            .ok_or(usage),
    }
}

fn handle_query(request: &QueryRequest, settings: &Settings) -> i32 {
    let engine = match load_configured(settings)
        .map_err(|err| err.to_string())
        .and_then(|indexes| QueryEngine::new(indexes).map_err(|err| err.to_string()))
    {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };

    match engine.execute(request) {
        Ok(outcome) => print_json(&outcome),
        Err(err) => {
            eprintln!("{} failed: {err}", request.op());
            1
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String], settings: &Settings) -> i32 {
    let indexes = match args.get(2) {
        Some(dir) => load_dataset(dir),
        None => load_configured(settings),
    };
    let indexes = match indexes {
        Ok(indexes) => indexes,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_indexes(&indexes);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }

    let errors = report.count(ValidationSeverity::Error);
    let warnings = report.count(ValidationSeverity::Warning);
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        1
    } else {
        println!("validation passed: {warnings} warning(s)");
        0
    }
}
