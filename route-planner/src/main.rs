use std::env;
use std::process::ExitCode;
use std::str::FromStr;

use tracing::warn;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_planner::domain::DayPolicy;
use route_planner::planner::{
    LayoverPolicy, Planner, Query, RawLegFilter, SearchConfig, SearchResult, SortOrder,
};
use route_planner::timetable::Timetable;

const USAGE: &str = "usage: route-planner <timetable.json> <origin> <destination>";

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

/// Read an environment override, keeping `default` if unset or malformed.
fn env_or<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %value, %default, "ignoring malformed override");
            default
        }),
        Err(_) => default,
    }
}

/// Parse an optional override; unset, blank or malformed means `None`.
fn parse_optional<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let value = raw?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(name, value = %value, "ignoring malformed override");
            None
        }
    }
}

fn config_from_env() -> SearchConfig {
    let defaults = SearchConfig::default();
    let max_results = parse_optional("MAX_RESULTS", env::var("MAX_RESULTS").ok());

    SearchConfig::new(
        env_or("MIN_TRANSFER_MINS", defaults.min_transfer_mins),
        env_or("MAX_LEGS", defaults.max_legs),
        env_or("SAME_DAY_THRESHOLD_MINS", defaults.same_day_threshold_mins),
        max_results,
    )
}

fn filter_from_env() -> RawLegFilter {
    let var = |name: &str| env::var(name).ok();
    RawLegFilter {
        carrier: var("CARRIER"),
        day: var("DAY"),
        max_fare_a: var("MAX_FARE_A"),
        max_fare_b: var("MAX_FARE_B"),
        earliest_departure: var("EARLIEST_DEPARTURE"),
        latest_departure: var("LATEST_DEPARTURE"),
        max_duration_mins: var("MAX_DURATION_MINS"),
    }
}

fn sort_from_env() -> SortOrder {
    match env::var("SORT") {
        Ok(value) => value.parse().unwrap_or_else(|err| {
            warn!(%err, "falling back to discovery order");
            SortOrder::Discovery
        }),
        Err(_) => SortOrder::Discovery,
    }
}

fn print_result(result: &SearchResult, policy: &DayPolicy) {
    if result.is_empty() {
        println!("No routes found.");
        return;
    }

    if !result.direct.is_empty() {
        println!("Direct:");
        for leg in &result.direct {
            println!(
                "  [{}] {} | {} min | {} / {}",
                leg.id(),
                leg,
                leg.duration_mins(),
                leg.fare_a(),
                leg.fare_b()
            );
        }
    }

    if !result.connections.is_empty() {
        println!("Connections:");
        for (n, it) in result.connections.iter().enumerate() {
            println!(
                "  {}. {} change(s) | {} min | {} / {} | runs: {}",
                n + 1,
                it.change_count(),
                it.total_duration_mins(),
                it.total_fare_a(),
                it.total_fare_b(),
                it.valid_days(policy)
            );
            for leg in it.legs() {
                println!("       [{}] {}", leg.id(), leg);
            }
        }
    }
}

fn main() -> ExitCode {
    init_logger();

    let args: Vec<String> = env::args().skip(1).collect();
    let [path, origin, destination] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let timetable = match Timetable::load(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = config_from_env();
    let policy = config.day_policy();
    let index = timetable.route_index();
    let mut planner = Planner::new(timetable.legs(), &index, config);
    if env::var("LAYOVER_POLICY").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
        planner = planner.with_layover_policy(LayoverPolicy::default());
    }

    let query = Query::new(origin.as_str(), destination.as_str())
        .with_filter(filter_from_env().coerce())
        .sorted_by(sort_from_env());

    let result = planner.search(&query);
    print_result(&result, &policy);

    ExitCode::SUCCESS
}
