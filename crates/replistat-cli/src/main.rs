use std::io;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use replistat_cli::cli::Cli;
use replistat_cli::client::HttpTopologyClient;
use replistat_cli::config::InstanceConfig;
use replistat_cli::{landscape, report};

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if is_root() {
        eprintln!("It is prohibited to run replistat as the root user");
        process::exit(1);
    }

    process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let config = match InstanceConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("replistat: {err:#}");
            return 1;
        }
    };

    let mut client = match HttpTopologyClient::new(cli.url.as_deref(), cli.master_url.as_deref()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("replistat: {err}");
            return 1;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.print_landscape_tree {
        return match landscape::run_landscape_report(&mut client, &mut out) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("replistat: {err:#}");
                1
            }
        };
    }

    let opts = report::ReportOptions {
        long_format: cli.all,
        site_filter: cli.site.clone(),
        machine: cli.machine_mode(),
        secondary_active: !cli.omit_secondary_active_status,
        local_only: cli.localhost,
    };
    match report::run_status_report(&mut client, &config, &opts, &mut out) {
        Ok(status) => status.exit_code(),
        Err(err) => {
            eprintln!("replistat: {err}");
            1
        }
    }
}

// stdout is a parsed contract; diagnostics go to stderr only.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("REPLISTAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}
