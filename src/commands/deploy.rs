use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use stackgate::application::{
    DependencyScanner, EnvInjection, RemoteDeployError, RemoteDeployRequest, RemoteDeployUseCase,
};
use stackgate::domain::value_objects::StackIdentifier;
use stackgate::infrastructure::ServerlessCliDeployer;

use super::{emit, Context};
use crate::cli::ControlPlaneArgs;

/// Parsed `deploy` arguments
#[derive(Debug)]
pub struct DeployArgs {
    pub service_path: PathBuf,
    pub stage: String,
    pub environment: String,
    pub service: Option<String>,
    pub depends_on: Vec<String>,
    pub service_config: PathBuf,
    pub inject_process_env: bool,
    pub target: ControlPlaneArgs,
}

pub fn cmd_deploy(ctx: &Context, args: DeployArgs) -> Result<()> {
    let service = args
        .service
        .clone()
        .or_else(|| service_name(&args.service_path))
        .context("cannot infer a service name; pass --service")?;

    let dependencies = resolve_dependencies(ctx, &args)?;
    tracing::info!(
        service = %service,
        dependencies = dependencies.len(),
        "resolved dependency list"
    );

    let injection = if args.inject_process_env || ctx.config.deploy.inject_process_env {
        EnvInjection::Process
    } else {
        EnvInjection::Overlay
    };

    let mut request = RemoteDeployRequest::new(
        &service,
        &args.service_path,
        &args.environment,
        &args.stage,
    )
    .with_dependencies(dependencies)
    .with_profile(ctx.profile(&args.target))
    .with_injection(injection);
    if let Some(region) = &args.target.region {
        request = request.with_region(region);
    }

    let deployer = ServerlessCliDeployer::new(ctx.config.deploy.command.clone());
    let use_case = RemoteDeployUseCase::new(ctx.connector(&args.target)?, deployer, ctx.events.clone());

    match use_case.execute(&request) {
        Ok(report) => {
            if ctx.json {
                emit(serde_json::json!({
                    "event": "complete",
                    "command": "deploy",
                    "service": report.service,
                    "dependencies": report.dependencies,
                    "variables": report.environment.as_map().keys().collect::<Vec<_>>(),
                    "duration_seconds": report.duration_seconds,
                }))?;
            } else {
                println!(
                    "Deployed {} ({} dependencies, {} variables) in {}s",
                    report.service,
                    report.dependencies.len(),
                    report.environment.len(),
                    report.duration_seconds
                );
            }
            Ok(())
        }
        Err(err) => {
            if !ctx.json {
                print_guidance(&err);
            }
            Err(err.into())
        }
    }
}

/// Explicit `--depends-on` list, otherwise whatever the service config references
fn resolve_dependencies(ctx: &Context, args: &DeployArgs) -> Result<Vec<StackIdentifier>> {
    if !args.depends_on.is_empty() {
        return args
            .depends_on
            .iter()
            .map(|raw| StackIdentifier::new(raw).map_err(anyhow::Error::from))
            .collect();
    }

    let config_path = args.service_path.join(&args.service_config);
    let scanner = DependencyScanner::new(ctx.config.parser.reference_parser(), ctx.events.clone());
    let found: BTreeSet<StackIdentifier> = scanner.scan(&config_path, Some(&args.service_path));
    Ok(found.into_iter().collect())
}

fn service_name(path: &std::path::Path) -> Option<String> {
    let path = path.canonicalize().ok()?;
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

fn print_guidance(err: &RemoteDeployError) {
    let recommendations = err.recommendations();
    if recommendations.is_empty() {
        return;
    }
    eprintln!("Recommendations:");
    for line in recommendations {
        eprintln!("  - {line}");
    }
}
