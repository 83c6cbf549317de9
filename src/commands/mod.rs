//! Subcommand handlers
//!
//! Each handler builds its use case from the shared [`Context`] and prints
//! either human-readable text or, with `--json`, NDJSON lines on stdout.

pub mod deploy;
pub mod inspect;
pub mod scan;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use stackgate::config::{Config, OutputFormat};
use stackgate::domain::ports::{ControlPlaneConnector, EventSink, ProfileConfig};
use stackgate::infrastructure::{
    AwsCliConnector, InMemoryControlPlane, JsonEventSink, TracingEventSink,
};

use crate::cli::ControlPlaneArgs;

/// Settings shared by every subcommand
pub struct Context {
    pub config: Config,
    pub json: bool,
    pub events: Arc<dyn EventSink>,
}

impl Context {
    /// Load layered config and pick the event sink for the output mode
    pub fn load(explicit_config: Option<&Path>, json_flag: bool) -> Result<Self> {
        let (config, warnings) =
            Config::load_layered(None, explicit_config).context("failed to load configuration")?;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        let json = json_flag || config.output.format == OutputFormat::Json;
        let events: Arc<dyn EventSink> = if json {
            Arc::new(JsonEventSink::stdout())
        } else {
            Arc::new(TracingEventSink)
        };

        Ok(Self {
            config,
            json,
            events,
        })
    }

    /// Flags win over environment and config
    pub fn profile(&self, args: &ControlPlaneArgs) -> ProfileConfig {
        let region = args
            .region
            .clone()
            .unwrap_or_else(|| self.config.aws.region.clone());
        let profile = args.profile.clone().or_else(|| self.config.aws.profile.clone());

        let config = ProfileConfig::new(region);
        match profile {
            Some(profile) => config.with_profile(profile),
            None => config,
        }
    }

    /// Fixture-backed when `--fixture` is given, otherwise the AWS CLI
    pub fn connector(&self, args: &ControlPlaneArgs) -> Result<Arc<dyn ControlPlaneConnector>> {
        match &args.fixture {
            Some(path) => {
                let plane = InMemoryControlPlane::from_fixture(path)
                    .with_context(|| format!("failed to load fixture {}", path.display()))?;
                tracing::debug!(fixture = %path.display(), "using fixture control plane");
                Ok(Arc::new(plane))
            }
            None => Ok(Arc::new(AwsCliConnector::new())),
        }
    }
}

/// Write one NDJSON line to stdout
pub fn emit(event: serde_json::Value) -> Result<()> {
    use std::io::Write;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{event}")?;
    Ok(())
}
