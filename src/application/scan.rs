//! Dependency Scanner
//!
//! Applies the reference parser to one configuration document and reports
//! the upstream stacks it depends on.
//!
//! Input safety is checked before the file is read:
//! - the canonical path must stay inside the canonical project root
//! - the file must be at most [`MAX_CONFIG_BYTES`]
//!
//! The document is parsed as YAML (JSON is accepted too) and re-rendered as
//! canonical JSON text before parsing, so references split by YAML line
//! folding or hidden inside tagged nodes (`!Sub`, `!Ref`) are still seen.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use serde_yaml_ng::Value as YamlValue;
use thiserror::Error;

use crate::domain::entities::DependencyReference;
use crate::domain::ports::{EventSink, NoopEventSink, ResolverEvent, SOURCE_SCANNER};
use crate::domain::services::ReferenceParser;
use crate::domain::value_objects::StackIdentifier;

/// Largest configuration document the scanner will read (10 MiB)
pub const MAX_CONFIG_BYTES: u64 = 10 * 1024 * 1024;

/// Scan failures
#[derive(Debug, Error)]
pub enum ScanError {
    /// Path escapes the project root
    #[error("path '{path}' escapes project boundary '{root}'")]
    PathEscape { path: PathBuf, root: PathBuf },

    /// File is over the size ceiling
    #[error("'{path}' is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("failed to render '{path}' as JSON: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scans configuration documents for cross-stack references
pub struct DependencyScanner {
    parser: ReferenceParser,
    events: Arc<dyn EventSink>,
}

impl Default for DependencyScanner {
    fn default() -> Self {
        Self::new(ReferenceParser::default(), Arc::new(NoopEventSink))
    }
}

impl DependencyScanner {
    pub fn new(parser: ReferenceParser, events: Arc<dyn EventSink>) -> Self {
        Self { parser, events }
    }

    /// Upstream stacks referenced by the document at `path`
    ///
    /// Never fails: any rejection or read/parse error yields an empty set
    /// and a warning in the log.
    pub fn scan(&self, path: &Path, project_root: Option<&Path>) -> BTreeSet<StackIdentifier> {
        match self.scan_references(path, project_root) {
            Ok(references) => references.into_iter().map(|r| r.target).collect(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "dependency scan skipped");
                BTreeSet::new()
            }
        }
    }

    /// Every reference in the document at `path`, in order of discovery
    ///
    /// Emits one `dependency:detected` event per reference.
    pub fn scan_references(
        &self,
        path: &Path,
        project_root: Option<&Path>,
    ) -> Result<Vec<DependencyReference>, ScanError> {
        let canonical = validate_containment(path, project_root)?;

        let size = std::fs::metadata(&canonical)
            .map_err(|source| ScanError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size > MAX_CONFIG_BYTES {
            return Err(ScanError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: MAX_CONFIG_BYTES,
            });
        }

        let content = std::fs::read_to_string(&canonical).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = canonical_text(&content).map_err(|err| match err {
            CanonicalTextError::Yaml(source) => ScanError::Yaml {
                path: path.to_path_buf(),
                source,
            },
            CanonicalTextError::Json(source) => ScanError::Serialize {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let references: Vec<DependencyReference> = self
            .parser
            .extract(&text)
            .into_iter()
            .map(|r| r.with_file(path))
            .collect();

        for reference in &references {
            self.events.publish(
                &ResolverEvent::DependencyDetected {
                    kind: reference.kind,
                    source_file: path.to_path_buf(),
                    target: reference.target.clone(),
                    output_name: reference.output_name.clone(),
                },
                SOURCE_SCANNER,
            );
        }

        tracing::debug!(
            path = %path.display(),
            references = references.len(),
            "scanned configuration"
        );
        Ok(references)
    }
}

/// Canonical `path`, if it stays inside `project_root` (default: cwd)
fn validate_containment(path: &Path, project_root: Option<&Path>) -> Result<PathBuf, ScanError> {
    let root = match project_root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().map_err(|source| ScanError::Io {
            path: PathBuf::from("."),
            source,
        })?,
    };
    let root_canonical = root
        .canonicalize()
        .map_err(|source| ScanError::Io { path: root, source })?;
    let canonical = path.canonicalize().map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if !canonical.starts_with(&root_canonical) {
        return Err(ScanError::PathEscape {
            path: path.to_path_buf(),
            root: root_canonical,
        });
    }
    Ok(canonical)
}

#[derive(Debug)]
enum CanonicalTextError {
    Yaml(serde_yaml_ng::Error),
    Json(serde_json::Error),
}

/// YAML/JSON document rendered as compact JSON text
fn canonical_text(content: &str) -> Result<String, CanonicalTextError> {
    let document: YamlValue = serde_yaml_ng::from_str(content).map_err(CanonicalTextError::Yaml)?;
    serde_json::to_string(&to_json(document)).map_err(CanonicalTextError::Json)
}

fn to_json(value: YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or_else(|| JsonValue::String(n.to_string()))
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(items.into_iter().map(to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let object: Map<String, JsonValue> = mapping
                .into_iter()
                .map(|(k, v)| (key_to_string(k), to_json(v)))
                .collect();
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => {
            let mut object = Map::new();
            object.insert(tagged.tag.to_string(), to_json(tagged.value));
            JsonValue::Object(object)
        }
    }
}

fn key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        other => match to_json(other) {
            JsonValue::String(s) => s,
            json => json.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ResolverEvent>>>,
    }

    impl EventSink for RecordingEventSink {
        fn publish(&self, event: &ResolverEvent, source: &str) {
            assert_eq!(source, SOURCE_SCANNER);
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn canonical_text_flattens_tags_and_keys() {
        let text = canonical_text("Outputs:\n  Id: !Sub '${ssm:/vpc-stack/id}'\n1: one\n").unwrap();
        assert_eq!(
            text,
            r#"{"1":"one","Outputs":{"Id":{"!Sub":"${ssm:/vpc-stack/id}"}}}"#
        );
    }

    #[test]
    fn folded_scalars_are_rejoined() {
        let yaml = "env:\n  VPC: >-\n    ${cf:vpc-stack.VpcId}\n    trailing\n";
        let text = canonical_text(yaml).unwrap();
        assert!(text.contains("${cf:vpc-stack.VpcId} trailing"));
    }

    #[test]
    fn scan_emits_one_event_per_reference() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("serverless.yml");
        std::fs::write(
            &file,
            "provider:\n  environment:\n    VPC_ID: ${ssm:/vpc-stack/vpc-id}\n    SUBNETS: ${cf:vpc-stack.SubnetIds}\n",
        )
        .unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let scanner = DependencyScanner::new(
            ReferenceParser::default(),
            Arc::new(RecordingEventSink {
                events: events.clone(),
            }),
        );

        let deps = scanner.scan(&file, Some(dir.path()));
        assert_eq!(deps.len(), 1);

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert!(matches!(
            &recorded[1],
            ResolverEvent::DependencyDetected { output_name: Some(name), .. } if name == "SubnetIds"
        ));
    }

    #[test]
    fn escape_is_rejected_before_reading() {
        let outer = tempdir().unwrap();
        let root = outer.path().join("project");
        std::fs::create_dir(&root).unwrap();
        let file = outer.path().join("outside.yml");
        std::fs::write(&file, "a: ${ssm:/vpc-stack/id}\n").unwrap();

        let err = DependencyScanner::default()
            .scan_references(&file, Some(&root))
            .unwrap_err();
        assert!(matches!(err, ScanError::PathEscape { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_typed_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.yml");
        std::fs::write(&file, "a: [unclosed\n").unwrap();

        let err = DependencyScanner::default()
            .scan_references(&file, Some(dir.path()))
            .unwrap_err();
        assert!(matches!(err, ScanError::Yaml { .. }));
        assert!(DependencyScanner::default()
            .scan(&file, Some(dir.path()))
            .is_empty());
    }
}
