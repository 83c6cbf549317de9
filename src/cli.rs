use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stackgate - gate serverless deployments on their upstream stacks
#[derive(Parser, Debug)]
#[command(name = "stackgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./stackgate.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the upstream stacks a configuration file references
    Scan {
        /// Service configuration file (YAML or JSON)
        file: PathBuf,

        /// Directory the file must live under (default: current directory)
        #[arg(long)]
        project_root: Option<PathBuf>,

        /// Print every reference with its location instead of the stack set
        #[arg(long)]
        references: bool,
    },

    /// Inspect one stack and print what dependents can derive from it
    Inspect {
        /// Stack name
        stack: String,

        #[command(flatten)]
        target: ControlPlaneArgs,
    },

    /// Inspect dependencies, resolve variables, then deploy the service
    Deploy {
        /// Service directory
        #[arg(default_value = ".")]
        service_path: PathBuf,

        /// Deployment stage passed to the deploy command
        #[arg(long)]
        stage: String,

        /// Environment label used for `<ENV>_NAME` overrides
        #[arg(long = "env")]
        environment: String,

        /// Service name (default: the service directory name)
        #[arg(long)]
        service: Option<String>,

        /// Dependency stack (repeatable). When omitted the service config is scanned
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,

        /// Service config scanned for dependencies, relative to the service path
        #[arg(long, default_value = "serverless.yml")]
        service_config: PathBuf,

        /// Also write resolved variables into this process's environment
        #[arg(long)]
        inject_process_env: bool,

        #[command(flatten)]
        target: ControlPlaneArgs,
    },
}

/// Where the control plane lives
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ControlPlaneArgs {
    /// Region (overrides config and STACKGATE_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Credential profile (overrides config and STACKGATE_PROFILE)
    #[arg(long)]
    pub profile: Option<String>,

    /// Read stacks and parameters from a YAML fixture instead of the AWS CLI
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deploy_with_repeated_dependencies() {
        let cli = Cli::try_parse_from([
            "stackgate",
            "deploy",
            "services/api",
            "--stage",
            "dev",
            "--env",
            "staging",
            "--depends-on",
            "vpc-stack",
            "--depends-on",
            "db-stack",
            "--region",
            "eu-west-1",
        ])
        .unwrap();

        match cli.command {
            Commands::Deploy {
                service_path,
                stage,
                environment,
                depends_on,
                service_config,
                target,
                ..
            } => {
                assert_eq!(service_path, PathBuf::from("services/api"));
                assert_eq!(stage, "dev");
                assert_eq!(environment, "staging");
                assert_eq!(depends_on, vec!["vpc-stack", "db-stack"]);
                assert_eq!(service_config, PathBuf::from("serverless.yml"));
                assert_eq!(target.region.as_deref(), Some("eu-west-1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stackgate", "inspect", "vpc-stack", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn deploy_requires_stage_and_env() {
        assert!(Cli::try_parse_from(["stackgate", "deploy", "--stage", "dev"]).is_err());
    }
}
