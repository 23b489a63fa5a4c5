//! notnull CLI - demo programs for the `NotNull` contract.
//!
//! ```text
//! main() -> init_tracing() -> resolve policy -> policy::install() -> scenario
//!                                  |
//!                                  v
//!               --policy > NOTNULL_ON_VIOLATION > config file > terminate
//! ```
//!
//! The policy is fixed before any scenario runs and cannot change afterwards.

mod demo;

use anyhow::{Context, Result, bail};
use std::{
    env,
    io::{self, Write},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use notnull_config::{NotNullConfig, policy_from_env, resolve_policy};
use notnull_types::{ViolationPolicy, policy};

const USAGE: &str = "\
usage: notnull [--policy <terminate|raise|ignore>] [checked|violation]

scenarios:
  checked     every handle is valid; no violation occurs (default)
  violation   a reset handle is passed as a NotNull parameter";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Demo transcripts own stdout; logs go to stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Scenario {
    #[default]
    Checked,
    Violation,
}

impl Scenario {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "checked" => Some(Scenario::Checked),
            "violation" => Some(Scenario::Violation),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    policy: Option<ViolationPolicy>,
    scenario: Scenario,
    help: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        let mut scenario_seen = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--policy" => {
                    let Some(raw) = args.next() else {
                        bail!("--policy needs a value\n\n{USAGE}");
                    };
                    parsed.policy = Some(parse_policy(&raw)?);
                }
                other => {
                    if let Some(raw) = other.strip_prefix("--policy=") {
                        parsed.policy = Some(parse_policy(raw)?);
                    } else if let Some(scenario) = Scenario::parse(other) {
                        if scenario_seen {
                            bail!("only one scenario may be given\n\n{USAGE}");
                        }
                        scenario_seen = true;
                        parsed.scenario = scenario;
                    } else {
                        bail!("unknown argument `{other}`\n\n{USAGE}");
                    }
                }
            }
        }

        Ok(parsed)
    }
}

fn parse_policy(raw: &str) -> Result<ViolationPolicy> {
    raw.parse::<ViolationPolicy>()
        .with_context(|| USAGE.to_string())
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match NotNullConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %err.path().display(), "Ignoring config: {err}");
            None
        }
    };
    let requested = resolve_policy(config.as_ref(), args.policy.or_else(policy_from_env));
    let active = policy::install(requested).context("failed to fix the violation policy")?;
    tracing::info!(policy = %active, scenario = ?args.scenario, "Starting demo");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match args.scenario {
        Scenario::Checked => demo::checked(&mut out),
        Scenario::Violation => demo::violation(&mut out),
    };
    written.context("failed to write demo output")?;
    out.flush()?;

    Ok(())
}
