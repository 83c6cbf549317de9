use std::path::Path;

use anyhow::Result;
use stackgate::application::DependencyScanner;

use super::{emit, Context};

pub fn cmd_scan(
    ctx: &Context,
    file: &Path,
    project_root: Option<&Path>,
    references: bool,
) -> Result<()> {
    let scanner = DependencyScanner::new(ctx.config.parser.reference_parser(), ctx.events.clone());

    if references {
        let found = scanner.scan_references(file, project_root)?;
        if ctx.json {
            emit(serde_json::json!({
                "event": "complete",
                "command": "scan",
                "file": file,
                "references": found,
            }))?;
        } else {
            for reference in &found {
                match &reference.output_name {
                    Some(output) => println!(
                        "{}\t{}\t{}.{}",
                        reference.location, reference.kind, reference.target, output
                    ),
                    None => println!("{}\t{}\t{}", reference.location, reference.kind, reference.target),
                }
            }
        }
        return Ok(());
    }

    let stacks = scanner.scan(file, project_root);
    if ctx.json {
        emit(serde_json::json!({
            "event": "complete",
            "command": "scan",
            "file": file,
            "dependencies": stacks,
        }))?;
    } else {
        for stack in &stacks {
            println!("{stack}");
        }
    }
    Ok(())
}
