//! Reference Parser
//!
//! Extracts stack identifiers from dynamic reference expressions embedded in
//! configuration text. Two reference kinds are recognised:
//!
//! - parameter paths: `${ssm:/vpc-stack/vpc-id}`
//! - stack outputs: `${cf:vpc-stack.VpcId}` and `${cf(us-east-1):vpc-stack.VpcId}`
//!
//! Payloads may contain one level of nested interpolation
//! (`${ssm:/${opt:stage}-api-stack/url}`). Deeper nesting is not matched.
//!
//! Payloads are free-form, so stack names are inferred with an ordered
//! cascade of structural rules rather than a grammar:
//!
//! | payload shape                             | result                |
//! |-------------------------------------------|-----------------------|
//! | `/${stage}-api-gateway-stack/url`         | `api-gateway-stack`   |
//! | `/vpc-stack/vpc-id`                       | `vpc-stack`           |
//! | `/${stage}/database/host`                 | `database`            |
//! | `/myapp/config/key`                       | `myapp`               |
//! | `${svc}-${stage}-db-stack` (cf)           | `db-stack`            |
//!
//! Everything here is pure: no I/O, no events.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{DependencyReference, ReferenceKind, SourceLocation};
use crate::domain::value_objects::StackIdentifier;

/// Suffix that marks a path segment as naming a stack
pub const MARKER_SUFFIX: &str = "-stack";

const MARKER_TOKEN: &str = "stack";

const WILDCARD: &str = "*";

/// Legacy decryption flags allowed at the end of a parameter path
const LEGACY_PATH_FLAGS: [&str; 3] = ["~true", "~false", "~split"];

/// Well-known infrastructure nouns used when no segment carries the marker
pub const DEFAULT_INFRASTRUCTURE_NOUNS: &[&str] = &[
    "vpc",
    "network",
    "networking",
    "database",
    "db",
    "rds",
    "aurora",
    "dynamodb",
    "cognito",
    "auth",
    "identity",
    "sqs",
    "sns",
    "queue",
    "eventbridge",
    "lambda",
    "compute",
    "ecs",
    "eks",
    "fargate",
    "cluster",
    "kubernetes",
    "k8s",
];

/// `${ssm:PAYLOAD}` with at most one level of nested `${...}`
static PARAMETER_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{ssm:((?:[^$}]|\$\{[^}]*\})+)\}").expect("parameter path pattern")
});

/// `${cf:PAYLOAD}` / `${cf(REGION):PAYLOAD}`
static STACK_OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{cf(?:\([^)]*\))?:((?:[^$}]|\$\{[^}]*\})+)\}").expect("stack output pattern")
});

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("placeholder pattern"));

static DASH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").expect("dash run"));

/// A path segment that interpolates something and ends in the marker suffix
static INTERPOLATED_STACK_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|/)([^/]*\$\{[^}]*\}[^/]*-stack)(?:/|$)").expect("stack segment pattern")
});

/// `${...}-LITERAL-stack`
static LEADING_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{[^}]*\}-([A-Za-z0-9][A-Za-z0-9_-]*)-stack$").expect("leading placeholder")
});

/// `LITERAL-${...}-stack`
static INNER_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_-]*)-\$\{[^}]*\}-stack$").expect("inner placeholder")
});

/// `LITERAL-stack${...}` / `LITERAL-stack-${...}`
static TRAILING_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_-]*)-stack-?\$\{[^}]*\}$").expect("trailing placeholder")
});

/// A parameter-path reference as it appears in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPathMatch {
    /// Payload after `ssm:`, legacy flags removed
    pub raw_path: String,
    pub offset: usize,
}

/// A stack-output reference as it appears in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutputMatch {
    /// Everything before the last top-level `.`
    pub stack_expr: String,
    pub output_name: String,
    pub offset: usize,
}

/// Find every `${ssm:...}` reference in `text`, in order of appearance
pub fn find_parameter_path_references(text: &str) -> Vec<ParameterPathMatch> {
    PARAMETER_PATH_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let payload = caps.get(1)?.as_str();
            let raw_path = strip_legacy_flags(payload.trim());
            (!raw_path.is_empty()).then(|| ParameterPathMatch {
                raw_path: raw_path.to_string(),
                offset: whole.start(),
            })
        })
        .collect()
}

/// Find every `${cf:stack.Output}` reference in `text`, in order of appearance
///
/// Payloads without a top-level `.` are not stack-output references and are
/// skipped.
pub fn find_stack_output_references(text: &str) -> Vec<StackOutputMatch> {
    STACK_OUTPUT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let payload = caps.get(1)?.as_str().trim();
            let (stack_expr, output_name) = split_output_payload(payload)?;
            Some(StackOutputMatch {
                stack_expr: stack_expr.to_string(),
                output_name: output_name.to_string(),
                offset: whole.start(),
            })
        })
        .collect()
}

/// Stack identifier named by a stack-output reference's stack expression
pub fn stack_from_output_expr(stack_expr: &str) -> Option<StackIdentifier> {
    let expr = stack_expr.trim();
    if expr.contains("${") {
        StackIdentifier::parse(reduce_base_name(expr)?)
    } else {
        StackIdentifier::parse(expr)
    }
}

/// Reduce an interpolated expression to its stack base name
///
/// Tries, in order:
/// 1. `${...}-LITERAL-stack`  -> `LITERAL-stack`
/// 2. `LITERAL-${...}-stack`  -> `LITERAL-stack`
/// 3. `LITERAL-stack-${...}`  -> `LITERAL-stack`
///
/// Otherwise placeholders collapse to `-`, repeated and boundary dashes are
/// removed, and the marker suffix is ensured: kept if already present,
/// truncated after the first `stack` if that token appears elsewhere, else
/// appended. Returns `None` when nothing but placeholders remains.
pub fn reduce_base_name(expr: &str) -> Option<String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    for pattern in [
        &*LEADING_PLACEHOLDER_RE,
        &*INNER_PLACEHOLDER_RE,
        &*TRAILING_PLACEHOLDER_RE,
    ] {
        if let Some(caps) = pattern.captures(expr) {
            return Some(format!("{}{}", &caps[1], MARKER_SUFFIX));
        }
    }

    let collapsed = PLACEHOLDER_RE.replace_all(expr, "-");
    let collapsed = DASH_RUN_RE.replace_all(&collapsed, "-");
    let base = collapsed.trim_matches('-');
    if base.is_empty() {
        return None;
    }

    if base.ends_with(MARKER_SUFFIX) || base == MARKER_TOKEN {
        return Some(base.to_string());
    }
    if let Some(idx) = base.find(MARKER_TOKEN) {
        return Some(base[..idx + MARKER_TOKEN.len()].to_string());
    }
    Some(format!("{base}{MARKER_SUFFIX}"))
}

/// Reference parser with an injectable infrastructure noun allow-list
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    nouns: Vec<String>,
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::with_nouns(DEFAULT_INFRASTRUCTURE_NOUNS.iter().copied())
    }
}

impl ReferenceParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `nouns` instead of [`DEFAULT_INFRASTRUCTURE_NOUNS`]
    pub fn with_nouns<I, S>(nouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            nouns: nouns
                .into_iter()
                .map(|n| n.as_ref().trim().to_ascii_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn nouns(&self) -> &[String] {
        &self.nouns
    }

    /// Stack identifier implied by a parameter path
    ///
    /// 1. The first segment that interpolates a value and ends in `-stack`
    ///    is reduced with [`reduce_base_name`].
    /// 2. Otherwise placeholders become wildcards and segments are scanned
    ///    left to right (wildcards and boundary dashes removed, empty
    ///    segments skipped): first segment containing `-stack`, else first
    ///    segment with an allow-listed noun token, else the first segment.
    ///    A first segment that is not a valid identifier yields `None`.
    pub fn stack_from_parameter_path(&self, raw_path: &str) -> Option<StackIdentifier> {
        if let Some(caps) = INTERPOLATED_STACK_SEGMENT_RE.captures(raw_path) {
            if let Some(id) = reduce_base_name(&caps[1]).and_then(StackIdentifier::parse) {
                return Some(id);
            }
        }

        let wildcarded = PLACEHOLDER_RE.replace_all(raw_path, WILDCARD);
        let segments: Vec<String> = wildcarded
            .split('/')
            .map(clean_segment)
            .filter(|s| !s.is_empty())
            .collect();

        let valid = |s: &String| StackIdentifier::parse(s);
        if let Some(marked) = segments
            .iter()
            .filter(|s| s.contains(MARKER_SUFFIX))
            .find_map(valid)
        {
            return Some(marked);
        }
        if let Some(noun) = segments
            .iter()
            .filter(|s| self.has_infrastructure_noun(s))
            .find_map(valid)
        {
            return Some(noun);
        }
        // The first segment or nothing; later segments are never promoted
        segments.first().and_then(valid)
    }

    fn has_infrastructure_noun(&self, segment: &str) -> bool {
        segment
            .to_ascii_lowercase()
            .split(['-', '_'])
            .any(|token| self.nouns.iter().any(|n| n == token))
    }

    /// Every cross-stack reference in `text`: parameter paths first, then
    /// stack outputs, each in order of appearance
    pub fn extract(&self, text: &str) -> Vec<DependencyReference> {
        let parameter_refs = find_parameter_path_references(text)
            .into_iter()
            .filter_map(|m| {
                let target = self.stack_from_parameter_path(&m.raw_path)?;
                Some(DependencyReference {
                    kind: ReferenceKind::ParameterPath,
                    location: SourceLocation {
                        file: None,
                        offset: m.offset,
                    },
                    target,
                    output_name: None,
                })
            });

        let output_refs = find_stack_output_references(text)
            .into_iter()
            .filter_map(|m| {
                let target = stack_from_output_expr(&m.stack_expr)?;
                Some(DependencyReference {
                    kind: ReferenceKind::StackOutput,
                    location: SourceLocation {
                        file: None,
                        offset: m.offset,
                    },
                    target,
                    output_name: Some(m.output_name),
                })
            });

        parameter_refs.chain(output_refs).collect()
    }
}

fn strip_legacy_flags(payload: &str) -> &str {
    LEGACY_PATH_FLAGS
        .iter()
        .find_map(|flag| payload.strip_suffix(flag))
        .unwrap_or(payload)
        .trim_end()
}

/// Drop wildcards and boundary dashes; inner dash runs are literal
fn clean_segment(segment: &str) -> String {
    segment
        .replace(WILDCARD, "")
        .trim()
        .trim_matches('-')
        .to_string()
}

/// Split at the last `.` outside any nested placeholder
fn split_output_payload(payload: &str) -> Option<(&str, &str)> {
    let bytes = payload.as_bytes();
    let mut depth = 0usize;
    let mut split_at = None;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' if i > 0 && bytes[i - 1] == b'$' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'.' if depth == 0 => split_at = Some(i),
            _ => {}
        }
    }

    let idx = split_at?;
    let (stack_expr, output_name) = (payload[..idx].trim(), payload[idx + 1..].trim());
    if stack_expr.is_empty() || output_name.is_empty() {
        return None;
    }
    Some((stack_expr, output_name))
}
