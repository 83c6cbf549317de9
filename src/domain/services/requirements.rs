//! Stack requirements derivation
//!
//! Turns a `StackDescriptor` plus a configuration-store snapshot into
//! `StackRequirements`. Pure: the inspector does the fetching.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::{ConfigEntry, StackDescriptor, StackRequirements};
use crate::domain::value_objects::StackIdentifier;

use super::env_naming::{output_key_to_env_name, store_key_to_env_name};

/// Stack tag listing upstream stacks (comma or whitespace separated)
pub const DEPENDENCY_TAG: &str = "Dependencies";

/// Namespaces probed in the configuration store after the stack's own prefix
pub const CONFIG_STORE_NAMESPACES: [&str; 2] = ["infrastructure", "shared"];

static STACK_ARN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"arn:aws[a-z-]*:cloudformation:[a-z0-9-]+:\d{12}:stack/([A-Za-z][A-Za-z0-9-]*)/")
        .expect("stack arn pattern")
});

/// Configuration-store prefixes to probe for `stack`, in priority order
///
/// `/NAME/`, `/name/` (only when it differs), `/infrastructure/NAME/`,
/// `/shared/NAME/`.
pub fn config_store_prefixes(stack: &StackIdentifier) -> Vec<String> {
    let name = stack.as_str();
    let mut prefixes = vec![format!("/{name}/")];

    let lower = name.to_ascii_lowercase();
    if lower != name {
        prefixes.push(format!("/{lower}/"));
    }
    for ns in CONFIG_STORE_NAMESPACES {
        prefixes.push(format!("/{ns}/{name}/"));
    }
    prefixes
}

/// Add entries under `prefix` to `values`, keyed by the path below the prefix
///
/// Keys already present are kept, so earlier prefixes take priority.
pub fn flatten_config_entries(
    prefix: &str,
    entries: &[ConfigEntry],
    values: &mut BTreeMap<String, String>,
) {
    for entry in entries {
        let Some(rest) = entry.name.strip_prefix(prefix) else {
            continue;
        };
        let key = rest.trim_start_matches('/');
        if key.is_empty() {
            continue;
        }
        values
            .entry(key.to_string())
            .or_insert_with(|| entry.value.clone());
    }
}

/// Output-derived variables overlaid with store-derived variables
///
/// On a name collision the configuration store wins.
// TODO: expose the collision policy as a config knob once a caller needs output-wins
pub fn derive_environment_variables(
    outputs: &BTreeMap<String, String>,
    store_values: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut vars: BTreeMap<String, String> = outputs
        .iter()
        .map(|(k, v)| (output_key_to_env_name(k), v.clone()))
        .filter(|(k, _)| !k.is_empty())
        .collect();

    for (key, value) in store_values {
        let name = store_key_to_env_name(key);
        if !name.is_empty() {
            vars.insert(name, value.clone());
        }
    }
    vars
}

/// Upstream stacks named by the dependency tag or by stack ARNs in outputs
pub fn extract_stack_dependencies(descriptor: &StackDescriptor) -> BTreeSet<StackIdentifier> {
    let from_tag = descriptor
        .tags
        .get(DEPENDENCY_TAG)
        .into_iter()
        .flat_map(|v| v.split(|c: char| c == ',' || c.is_whitespace()))
        .filter_map(StackIdentifier::parse);

    let from_arns = descriptor.outputs.values().flat_map(|value| {
        STACK_ARN_RE
            .captures_iter(value)
            .filter_map(|caps| StackIdentifier::parse(&caps[1]))
            .collect::<Vec<_>>()
    });

    from_tag
        .chain(from_arns)
        .filter(|id| id != &descriptor.name)
        .collect()
}

/// Build requirements from a descriptor and flattened store values
pub fn derive_requirements(
    descriptor: StackDescriptor,
    config_store_values: BTreeMap<String, String>,
) -> StackRequirements {
    let dependencies = extract_stack_dependencies(&descriptor);
    let environment_variables =
        derive_environment_variables(&descriptor.outputs, &config_store_values);

    StackRequirements {
        stack_name: descriptor.name,
        region: descriptor.region,
        outputs: descriptor.outputs,
        parameters: descriptor.parameters,
        environment_variables,
        dependencies,
        status: descriptor.status,
        config_store_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::StackStatus;

    fn id(s: &str) -> StackIdentifier {
        StackIdentifier::new(s).unwrap()
    }

    #[test]
    fn prefixes_cover_name_lowercase_and_namespaces() {
        assert_eq!(
            config_store_prefixes(&id("VpcStack")),
            vec![
                "/VpcStack/",
                "/vpcstack/",
                "/infrastructure/VpcStack/",
                "/shared/VpcStack/",
            ]
        );
    }

    #[test]
    fn lowercase_prefix_is_not_repeated() {
        assert_eq!(config_store_prefixes(&id("vpc-stack")).len(), 3);
    }

    #[test]
    fn flatten_strips_prefix_and_keeps_first_value() {
        let mut values = BTreeMap::new();
        flatten_config_entries(
            "/vpc-stack/",
            &[
                ConfigEntry::new("/vpc-stack/db/host", "primary"),
                ConfigEntry::new("/other/db/host", "ignored"),
                ConfigEntry::new("/vpc-stack/", "empty-key"),
            ],
            &mut values,
        );
        flatten_config_entries(
            "/shared/vpc-stack/",
            &[ConfigEntry::new("/shared/vpc-stack/db/host", "shadowed")],
            &mut values,
        );

        assert_eq!(values.len(), 1);
        assert_eq!(values["db/host"], "primary");
    }

    #[test]
    fn store_values_win_over_outputs() {
        let outputs = BTreeMap::from([
            ("DbHost".to_string(), "from-output".to_string()),
            ("VpcId".to_string(), "vpc-1".to_string()),
        ]);
        let store = BTreeMap::from([("db/host".to_string(), "from-store".to_string())]);

        let vars = derive_environment_variables(&outputs, &store);
        assert_eq!(vars["DB_HOST"], "from-store");
        assert_eq!(vars["VPC_ID"], "vpc-1");
    }

    #[test]
    fn dependencies_from_tag_and_arns_without_self() {
        let descriptor = StackDescriptor::new(id("api-stack"), "us-east-1", StackStatus::UpdateComplete)
            .with_tag(DEPENDENCY_TAG, "vpc-stack, db-stack  api-stack,,")
            .with_output(
                "AuthStackArn",
                "arn:aws:cloudformation:us-east-1:123456789012:stack/auth-stack/6b1f-11ee",
            )
            .with_output(
                "SelfArn",
                "arn:aws:cloudformation:us-east-1:123456789012:stack/api-stack/0000",
            );

        let deps: Vec<String> = extract_stack_dependencies(&descriptor)
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(deps, vec!["auth-stack", "db-stack", "vpc-stack"]);
    }

    #[test]
    fn derive_requirements_copies_descriptor_fields() {
        let descriptor = StackDescriptor::new(id("db-stack"), "eu-west-1", StackStatus::CreateComplete)
            .with_output("ClusterEndpoint", "db.example")
            .with_parameter("InstanceClass", "db.t3.micro");
        let store = BTreeMap::from([("port".to_string(), "5432".to_string())]);

        let reqs = derive_requirements(descriptor, store);
        assert_eq!(reqs.stack_name, "db-stack");
        assert_eq!(reqs.region, "eu-west-1");
        assert_eq!(reqs.parameters["InstanceClass"], "db.t3.micro");
        assert_eq!(reqs.environment_variables["CLUSTER_ENDPOINT"], "db.example");
        assert_eq!(reqs.environment_variables["PORT"], "5432");
        assert_eq!(reqs.config_store_values["port"], "5432");
        assert!(reqs.ready_for_deployment());
    }
}
