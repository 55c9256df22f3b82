#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::SeedableRng;
use std::io::{self, BufWriter, Write};
use std::num::ParseIntError;
use std::process::ExitCode;
use std::str::FromStr;
use thiserror::Error;
use torus_life::LifeError;
use torus_life::scaling::{self, ScalingConfig};
use torus_life::torus::{Grid, LogObserver, Strategy, TorusLife, TorusLifeConfig};

const DEFAULT_SEED: u64 = 1;
const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const USAGE: &str = "usage: torus-life [ROWS COLUMNS [WORKERS]] [--per-cell] [--threads N] [--seed N] [--steps N] [--quiet]";

#[derive(Debug, Error)]
enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(String),
    #[error("invalid {what} {value:?}: {source}")]
    InvalidNumber {
        what: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("unknown argument: {0}")]
    Unknown(String),
    #[error("COLUMNS is required when ROWS is given")]
    MissingColumns,
    #[error("unexpected extra argument: {0}")]
    ExtraPositional(String),
    #[error("--per-cell does not take a worker count")]
    PerCellWithWorkers,
}

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Life(#[from] LifeError),
    #[error("failed to write grid: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Default, PartialEq)]
struct MainArgs {
    dims: Option<(usize, usize)>,
    workers: Option<usize>,
    per_cell: bool,
    threads: Option<usize>,
    seed: Option<u64>,
    steps: Option<u64>,
    quiet: bool,
}

fn parse_number<T>(what: &str, value: &str) -> Result<T, ArgsError>
where
    T: FromStr<Err = ParseIntError>,
{
    value.parse().map_err(|source| ArgsError::InvalidNumber {
        what: what.to_string(),
        value: value.to_string(),
        source,
    })
}

fn parse_args<I>(args: I) -> Result<MainArgs, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = MainArgs::default();
    let mut positionals = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value_for = |flag: &str| {
            args.next()
                .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
        };
        match arg.as_str() {
            "--per-cell" => parsed.per_cell = true,
            "--quiet" => parsed.quiet = true,
            "--threads" => {
                parsed.threads = Some(parse_number("--threads", &value_for("--threads")?)?);
            }
            "--seed" => parsed.seed = Some(parse_number("--seed", &value_for("--seed")?)?),
            "--steps" => parsed.steps = Some(parse_number("--steps", &value_for("--steps")?)?),
            _ if arg.starts_with("--") => return Err(ArgsError::Unknown(arg)),
            _ => positionals.push(arg),
        }
    }

    let mut positionals = positionals.into_iter();
    if let Some(rows) = positionals.next() {
        let columns = positionals.next().ok_or(ArgsError::MissingColumns)?;
        parsed.dims = Some((
            parse_number("rows", &rows)?,
            parse_number("columns", &columns)?,
        ));
    }
    if let Some(workers) = positionals.next() {
        parsed.workers = Some(parse_number("worker count", &workers)?);
    }
    if let Some(extra) = positionals.next() {
        return Err(ArgsError::ExtraPositional(extra));
    }
    if parsed.per_cell && parsed.workers.is_some() {
        return Err(ArgsError::PerCellWithWorkers);
    }
    Ok(parsed)
}

fn write_grid<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    writeln!(out, "{grid}")?;
    out.flush()
}

fn run_simulation(args: &MainArgs, rows: usize, columns: usize) -> Result<(), MainError> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed.unwrap_or(DEFAULT_SEED));
    let grid = Grid::random(rows, columns, &mut rng)?;

    let strategy = match (args.per_cell, args.workers) {
        (true, _) => Strategy::PerCell,
        (false, Some(workers)) => Strategy::Parallel { workers },
        (false, None) => Strategy::Serial,
    };
    let mut config = TorusLifeConfig::default().strategy(strategy);
    if let Some(threads) = args.threads {
        config = config.thread_count(threads);
    }
    let mut engine = TorusLife::with_config(grid, config)?.with_observer(LogObserver);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if !args.quiet {
        write_grid(&mut out, engine.grid())?;
    }

    // Without --steps this runs until the process is interrupted.
    while args.steps.is_none_or(|limit| engine.generation() < limit) {
        engine.step()?;
        if !args.quiet {
            write_grid(&mut out, engine.grid())?;
        }
    }
    Ok(())
}

fn run_scaling(args: &MainArgs) -> Result<(), MainError> {
    let config = ScalingConfig {
        seed: args.seed.unwrap_or(DEFAULT_SEED),
        thread_count: args.threads,
        ..ScalingConfig::default()
    };
    println!("Strong scaling:");
    scaling::strong_scaling(&config)?;
    println!("Weak scaling:");
    scaling::weak_scaling(&config)?;
    Ok(())
}

/// Parse `argv` and run; returns the process exit status.
fn run<I>(argv: I) -> u8
where
    I: IntoIterator<Item = String>,
{
    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return EXIT_USAGE;
        }
    };

    let result = match args.dims {
        Some((rows, columns)) => run_simulation(&args, rows, columns),
        None => run_scaling(&args),
    };
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("torus-life: {err}");
            EXIT_FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    ExitCode::from(run(std::env::args().skip(1)))
}

#[cfg(test)]
mod tests {
    use super::{ArgsError, EXIT_FAILURE, EXIT_USAGE, MainArgs, parse_args, run};

    fn argv(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn parse(line: &str) -> Result<MainArgs, ArgsError> {
        parse_args(argv(line))
    }

    fn parse_error(line: &str) -> ArgsError {
        parse(line).unwrap_err()
    }

    #[test]
    fn dimensions_only_selects_serial() {
        let args = parse("12 20").unwrap();
        assert_eq!(args.dims, Some((12, 20)));
        assert_eq!(args.workers, None);
        assert!(!args.per_cell);
    }

    #[test]
    fn flags_and_worker_count() {
        let args = parse("--threads 3 8 9 4 --seed 42 --steps 5 --quiet").unwrap();
        assert_eq!(
            args,
            MainArgs {
                dims: Some((8, 9)),
                workers: Some(4),
                per_cell: false,
                threads: Some(3),
                seed: Some(42),
                steps: Some(5),
                quiet: true,
            }
        );
    }

    #[test]
    fn no_arguments_means_scaling_run() {
        assert_eq!(parse("").unwrap(), MainArgs::default());
    }

    #[test]
    fn parse_failures_are_reported() {
        let err = parse_error("ten 5");
        assert!(matches!(err, ArgsError::InvalidNumber { .. }));
        let err = parse_error("-3 5");
        assert!(matches!(err, ArgsError::InvalidNumber { .. }));
        let err = parse_error("10");
        assert!(matches!(err, ArgsError::MissingColumns));
        let err = parse_error("1 2 3 4");
        assert!(matches!(err, ArgsError::ExtraPositional(_)));
        let err = parse_error("--steps");
        assert!(matches!(err, ArgsError::MissingValue(_)));
        let err = parse_error("--bogus");
        assert!(matches!(err, ArgsError::Unknown(_)));
        let err = parse_error("4 4 2 --per-cell");
        assert!(matches!(err, ArgsError::PerCellWithWorkers));
    }

    #[test]
    fn parse_failures_exit_with_usage_status() {
        assert_eq!(run(argv("ten 5")), EXIT_USAGE);
        assert_eq!(run(argv("4 4 --bogus")), EXIT_USAGE);
        assert_eq!(run(argv("-3 5 --steps 1")), EXIT_USAGE);
    }

    #[test]
    fn core_errors_exit_with_failure_status() {
        assert_eq!(run(argv("0 5 --steps 1 --quiet")), EXIT_FAILURE);
        assert_eq!(run(argv("5 0 --steps 1 --quiet")), EXIT_FAILURE);
        assert_eq!(run(argv("4 4 0 --steps 1 --quiet")), EXIT_FAILURE);
    }

    #[test]
    fn bounded_runs_exit_cleanly() {
        assert_eq!(run(argv("6 6 --steps 2 --quiet")), 0);
        assert_eq!(run(argv("6 6 3 --steps 2 --quiet --threads 2")), 0);
        assert_eq!(run(argv("4 5 --per-cell --steps 1 --quiet")), 0);
    }
}
