//! Environment variable naming
//!
//! Two transforms, one per source:
//! - stack outputs are PascalCase/camelCase keys: `VpcId` -> `VPC_ID`
//! - config-store keys are paths: `db/host-name` -> `DB_HOST_NAME`

use std::sync::LazyLock;

use regex::Regex;

static CASE_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("case boundary pattern"));

static NON_ALNUM_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("non-alphanumeric pattern"));

/// `VpcId` -> `VPC_ID`, `apiGatewayRestApiId` -> `API_GATEWAY_REST_API_ID`
///
/// Only a lowercase letter followed by an uppercase letter is a boundary, so
/// acronyms stay together (`DBHost` -> `DBHOST`).
pub fn output_key_to_env_name(key: &str) -> String {
    CASE_BOUNDARY_RE
        .replace_all(key, "${1}_${2}")
        .to_uppercase()
}

/// `db/host-name` -> `DB_HOST_NAME`
pub fn store_key_to_env_name(key: &str) -> String {
    NON_ALNUM_RUN_RE
        .replace_all(key, "_")
        .trim_matches('_')
        .to_uppercase()
}
