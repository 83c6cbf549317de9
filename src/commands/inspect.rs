use anyhow::{bail, Result};
use stackgate::application::{InspectionResult, StackInspector};
use stackgate::domain::entities::StackRequirements;
use stackgate::domain::value_objects::StackIdentifier;

use super::{emit, Context};
use crate::cli::ControlPlaneArgs;

pub fn cmd_inspect(ctx: &Context, stack: &str, target: &ControlPlaneArgs) -> Result<()> {
    let stack = StackIdentifier::new(stack)?;
    let profile = ctx.profile(target);
    let inspector = StackInspector::new(ctx.connector(target)?, ctx.events.clone());

    let result = inspector.inspect(&stack, &profile);

    if ctx.json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "inspect",
            "data": result,
        }))?;
    }

    match result {
        InspectionResult::Found(requirements) => {
            if !ctx.json {
                print_requirements(&requirements);
            }
            Ok(())
        }
        InspectionResult::Failed(failure) => {
            if !ctx.json {
                eprintln!("Recommendations:");
                for line in &failure.recommendations {
                    eprintln!("  - {line}");
                }
            }
            bail!("failed to inspect stack '{}': {}", failure.stack, failure.error)
        }
    }
}

fn print_requirements(requirements: &StackRequirements) {
    let readiness = if requirements.ready_for_deployment() {
        "ready"
    } else {
        "not ready"
    };
    println!("Stack:   {}", requirements.stack_name);
    println!("Region:  {}", requirements.region);
    println!("Status:  {} ({readiness})", requirements.status);

    if !requirements.dependencies.is_empty() {
        let deps: Vec<&str> = requirements.dependencies.iter().map(|d| d.as_str()).collect();
        println!("Depends: {}", deps.join(", "));
    }

    if requirements.environment_variables.is_empty() {
        println!("\nNo environment variables derived.");
        return;
    }
    println!("\nEnvironment variables:");
    let width = requirements
        .environment_variables
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0);
    for (name, value) in &requirements.environment_variables {
        println!("  {name:<width$}  {value}");
    }
}
