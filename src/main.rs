// Simulator binary - runs one or every policy over a JSON workload
//
// The input file uses the fixture layout (`input` plus optional `expectedOutput`). Results are
// printed as a table or as JSON; when expectations are present they are checked and a mismatch
// makes the process exit with status 1.

use std::error::Error;
use std::process::ExitCode;

use cpu_sched_sim::{Fixture, FixtureError, PolicyKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line options parsed from program arguments.
#[derive(Debug, Default)]
struct CliOptions {
    /// Policies to run, in order. Empty means `--policy` was not given.
    policies: Vec<PolicyKind>,
    /// Path to the JSON workload.
    input: Option<String>,
    context_switch: Option<i64>,
    quantum: Option<i64>,
    aging: Option<i64>,
    json: bool,
    verbose: bool,
}

fn parse_number(key: &str, value: &str) -> Result<i64, Box<dyn Error>> {
    value
        .parse::<i64>()
        .map_err(|err| format!("{key}: invalid number `{value}`: {err}").into())
}

fn parse_policies(value: &str) -> Result<Vec<PolicyKind>, FixtureError> {
    if value.eq_ignore_ascii_case("all") {
        return Ok(PolicyKind::ALL.to_vec());
    }
    value
        .split(',')
        .map(|label| {
            label.trim().parse::<PolicyKind>().map_err(|label| FixtureError::UnknownPolicy {
                label,
            })
        })
        .collect()
}

impl CliOptions {
    /// Apply a `--key value` pair. Returns `false` for unknown keys.
    fn apply(&mut self, key: &str, value: &str) -> Result<bool, Box<dyn Error>> {
        match key {
            "--policy" | "--scheduler" => self.policies = parse_policies(value)?,
            "--input" | "-i" => self.input = Some(value.to_string()),
            "--context-switch" | "--cs" => self.context_switch = Some(parse_number(key, value)?),
            "--quantum" | "--rr-quantum" => self.quantum = Some(parse_number(key, value)?),
            "--aging" | "--aging-interval" => self.aging = Some(parse_number(key, value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Parse command-line arguments into `CliOptions`.
///
/// Value options accept both `--key=value` and `--key value`:
/// - `--policy <sjf|rr|priority|ag|all>` (comma-separated lists allowed)
/// - `--input <file.json>`
/// - `--context-switch <n>`, `--quantum <n>`, `--aging <n>` override the file's parameters
///
/// Flags: `--json` prints the reports as JSON, `--verbose` enables debug logging.
fn parse_cli_options() -> Result<CliOptions, Box<dyn Error>> {
    let mut options = CliOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            _ => {
                if let Some((key, value)) = arg.split_once('=') {
                    if !options.apply(key, value)? {
                        return Err(format!("unknown option `{key}`").into());
                    }
                } else if let Some(value) = args.next() {
                    if !options.apply(&arg, &value)? {
                        return Err(format!("unknown option `{arg}`").into());
                    }
                } else {
                    return Err(format!("option `{arg}` expects a value").into());
                }
            }
        }
    }
    Ok(options)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool, Box<dyn Error>> {
    let options = parse_cli_options()?;
    init_logging(options.verbose);

    let input = options
        .input
        .as_deref()
        .ok_or("missing --input <file.json>")?;
    let mut fixture = Fixture::load(input)?;
    if let Some(cs) = options.context_switch {
        fixture.input.context_switch = cs;
    }
    if let Some(quantum) = options.quantum {
        fixture.input.rr_quantum = Some(quantum);
    }
    if let Some(aging) = options.aging {
        fixture.input.aging_interval = Some(aging);
    }
    let policies = if options.policies.is_empty() {
        vec![PolicyKind::default()]
    } else {
        options.policies
    };
    info!(fixture = fixture.label(), policies = policies.len(), "running");

    let mut all_passed = true;
    let mut reports = Vec::with_capacity(policies.len());
    for policy in policies {
        let report = fixture.run(policy)?;
        let outcome = fixture.check(&report);
        all_passed &= outcome.passed();
        if options.json {
            reports.push(report);
        } else {
            println!("{report}");
            if outcome.compared {
                println!("{outcome}");
            }
            println!();
        }
        if !outcome.passed() && options.json {
            eprintln!("{outcome}");
        }
    }
    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(all_passed)
}

/// Main entry point for the simulator binary.
///
/// Exits with status 1 when a run disagrees with the file's expected output.
///
/// # Example Usage
/// ```bash
/// cargo run -- --policy=ag --input tests/fixtures/ag_priority_preemption.json
/// cargo run -- --policy all --input workload.json --context-switch 1 --quantum 3 --aging 5
/// ```
fn main() -> Result<ExitCode, Box<dyn Error>> {
    Ok(if run()? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
