//! Stackgate CLI
//!
//! Usage: stackgate <COMMAND>
//!
//! Commands:
//!   scan     List the upstream stacks a configuration file references
//!   inspect  Inspect one stack and print its derived requirements
//!   deploy   Gate a service deployment on its dependency stacks

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

/// Log filter override, e.g. `STACKGATE_LOG=stackgate=trace`
const LOG_ENV: &str = "STACKGATE_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = commands::Context::load(cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::Scan {
            file,
            project_root,
            references,
        } => commands::scan::cmd_scan(&ctx, &file, project_root.as_deref(), references),
        Commands::Inspect { stack, target } => commands::inspect::cmd_inspect(&ctx, &stack, &target),
        Commands::Deploy {
            service_path,
            stage,
            environment,
            service,
            depends_on,
            service_config,
            inject_process_env,
            target,
        } => commands::deploy::cmd_deploy(
            &ctx,
            commands::deploy::DeployArgs {
                service_path,
                stage,
                environment,
                service,
                depends_on,
                service_config,
                inject_process_env,
                target,
            },
        ),
    }
}

/// Logs go to stderr so stdout stays parseable in `--json` mode
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
