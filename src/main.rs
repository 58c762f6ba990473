//! fpga-crihook - FPGA provisioning hook for OCI containers
//!
//! Runs as a prestart hook: reads the container state from stdin, finds the
//! FPGA functions the container asked for and makes sure its devices are
//! programmed with them before the container starts.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bitstream;
mod bundle;
mod cli;
mod config;
mod device;
mod error;
mod exec;
mod hook;
mod request;
mod resolver;

#[cfg(test)]
mod test_fixtures;

use cli::Cli;
use exec::SystemRunner;
use hook::{Hook, Outcome, ProvisionState};

/// Log to stderr; stdout carries the messages the runtime records
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.hook_config();
    let runner = SystemRunner;
    let hook = Hook::new(&config, &runner);

    match hook.process(std::io::stdin().lock()) {
        Ok(Outcome::Skipped(reason)) => println!("{reason}"),
        Ok(Outcome::Provisioned(reports)) => {
            for report in &reports {
                let state = match report.state {
                    ProvisionState::AlreadyProgrammed => "already programmed",
                    ProvisionState::Programmed => "programmed",
                };
                tracing::info!(request = %report.request, "{state}");
            }
        }
        Err(e) => {
            println!("{}", error::render(&e));
            std::process::exit(1);
        }
    }
}
