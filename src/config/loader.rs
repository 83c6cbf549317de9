//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StackgateError, StackgateResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, OutputFormat};

/// Project config file name
pub const PROJECT_CONFIG_FILE: &str = "stackgate.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> StackgateResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| StackgateError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Explicit file, else `stackgate.toml` in the project root (default: cwd),
/// else the user config, else defaults; environment overrides on top
pub fn load_layered(
    project_root: Option<&Path>,
    explicit: Option<&Path>,
) -> StackgateResult<(Config, Vec<ConfigWarning>)> {
    let (config, warnings) = match config_source(project_root, explicit) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_with_warnings(&path)?
        }
        None => (Config::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

pub(crate) fn config_source(project_root: Option<&Path>, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let root = project_root
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok());
    if let Some(root) = root {
        let project_config = root.join(PROJECT_CONFIG_FILE);
        if project_config.is_file() {
            return Some(project_config);
        }
    }

    user_config_path().filter(|p| p.is_file())
}

/// `$XDG_CONFIG_HOME/stackgate/config.toml`, else `~/.config/stackgate/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|dir| dir.join("stackgate").join("config.toml"))
}

/// Apply environment variable overrides (STACKGATE_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

pub(crate) fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(region) = lookup("STACKGATE_REGION") {
        config.aws.region = region.trim().to_string();
    }

    if let Some(profile) = lookup("STACKGATE_PROFILE") {
        config.aws.profile = Some(profile.trim().to_string());
    }

    if let Some(format) = lookup("STACKGATE_OUTPUT") {
        config.output.format = EnvVarValidator::new("STACKGATE_OUTPUT", &["text", "json"]).parse(
            &format,
            OutputFormat::parse,
            config.output.format,
        );
    }

    if let Some(command) = lookup("STACKGATE_DEPLOY_COMMAND") {
        config.deploy.command = command.trim().to_string();
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "aws",
        "region",
        "profile",
        "parser",
        "infrastructure_nouns",
        "output",
        "format",
        "deploy",
        "command",
        "inject_process_env",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
