//! Environment Resolver
//!
//! Resolves each required variable from a fixed precedence chain:
//! 1. `NAME` in the ambient environment
//! 2. `LABEL_NAME` in the ambient environment (label upper-cased)
//! 3. the value the stack supplies
//!
//! A source only counts when it yields a non-empty string.

use std::sync::Arc;

use crate::domain::entities::{EnvironmentResolutionResult, StackRequirements};
use crate::domain::ports::{AmbientEnvironment, EventSink, ResolverEvent, SOURCE_RESOLVER};

pub struct EnvironmentResolver {
    events: Arc<dyn EventSink>,
}

impl EnvironmentResolver {
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self { events }
    }

    /// Resolve every variable `requirements` derives
    pub fn resolve(
        &self,
        ambient: &dyn AmbientEnvironment,
        service: &str,
        environment: &str,
        requirements: &StackRequirements,
    ) -> EnvironmentResolutionResult {
        let declared = requirements
            .environment_variables
            .iter()
            .map(|(name, value)| (name.clone(), Some(value.clone())));
        self.resolve_declared(ambient, service, environment, declared)
    }

    /// Resolve an explicit `name -> stack value` declaration, in order
    pub fn resolve_declared<I>(
        &self,
        ambient: &dyn AmbientEnvironment,
        service: &str,
        environment: &str,
        declared: I,
    ) -> EnvironmentResolutionResult
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let scope = environment.to_uppercase();
        let mut result = EnvironmentResolutionResult::default();

        for (name, stack_value) in declared {
            let value = non_empty(ambient.var(&name))
                .or_else(|| non_empty(ambient.var(&format!("{scope}_{name}"))))
                .or_else(|| non_empty(stack_value));

            match value {
                Some(value) => {
                    result.resolved.insert(name, value);
                }
                None => result.missing.push(name),
            }
        }

        let event = if result.is_valid() {
            ResolverEvent::EnvironmentValidated {
                service: service.to_string(),
                environment: environment.to_string(),
                resolved_count: result.resolved.len(),
                missing: Vec::new(),
            }
        } else {
            tracing::info!(
                service,
                environment,
                missing = ?result.missing,
                "environment incomplete"
            );
            ResolverEvent::EnvironmentValidationFailed {
                service: service.to_string(),
                environment: environment.to_string(),
                resolved_count: result.resolved.len(),
                missing: result.missing.clone(),
            }
        };
        self.events.publish(&event, SOURCE_RESOLVER);

        result
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoopEventSink;
    use crate::domain::value_objects::{StackIdentifier, StackStatus};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ResolverEvent>>>,
    }

    impl EventSink for RecordingEventSink {
        fn publish(&self, event: &ResolverEvent, _source: &str) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn ambient(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn requirements(vars: &[(&str, &str)]) -> StackRequirements {
        vars.iter().fold(
            StackRequirements::new(
                StackIdentifier::new("db-stack").unwrap(),
                "us-east-1",
                StackStatus::CreateComplete,
            ),
            |reqs, (k, v)| reqs.with_environment_variable(*k, *v),
        )
    }

    fn resolver() -> EnvironmentResolver {
        EnvironmentResolver::new(Arc::new(NoopEventSink))
    }

    #[test]
    fn stack_value_used_when_nothing_ambient() {
        let result = resolver().resolve(
            &ambient(&[]),
            "api",
            "prod",
            &requirements(&[("DB_HOST", "db.example")]),
        );
        assert!(result.is_valid());
        assert_eq!(result.resolved["DB_HOST"], "db.example");
        assert!(result.missing.is_empty());
    }

    #[test]
    fn precedence_ambient_then_scoped_then_stack() {
        let reqs = requirements(&[("DB_HOST", "stack")]);
        let cases = [
            (vec![("DB_HOST", "ambient"), ("PROD_DB_HOST", "scoped")], "ambient"),
            (vec![("PROD_DB_HOST", "scoped")], "scoped"),
            (vec![("STAGING_DB_HOST", "other-scope")], "stack"),
            (vec![("DB_HOST", ""), ("PROD_DB_HOST", "scoped")], "scoped"),
        ];

        for (pairs, expected) in cases {
            let result = resolver().resolve(&ambient(&pairs), "api", "prod", &reqs);
            assert_eq!(result.resolved["DB_HOST"], expected, "{pairs:?}");
        }
    }

    #[test]
    fn declared_without_any_source_is_missing() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let resolver = EnvironmentResolver::new(Arc::new(RecordingEventSink {
            events: events.clone(),
        }));

        let result = resolver.resolve_declared(
            &ambient(&[]),
            "api",
            "prod",
            [
                ("API_KEY".to_string(), None),
                ("DB_HOST".to_string(), Some("db.example".to_string())),
                ("EMPTY".to_string(), Some(String::new())),
            ],
        );

        assert!(!result.is_valid());
        assert_eq!(result.missing, vec!["API_KEY", "EMPTY"]);
        assert_eq!(result.resolved.len(), 1);

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert!(matches!(
            &recorded[0],
            ResolverEvent::EnvironmentValidationFailed { missing, .. } if missing.len() == 2
        ));
    }

    #[test]
    fn valid_resolution_emits_validated() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let resolver = EnvironmentResolver::new(Arc::new(RecordingEventSink {
            events: events.clone(),
        }));

        resolver.resolve(&ambient(&[]), "api", "dev", &requirements(&[("A", "1")]));

        let recorded = events.lock().unwrap();
        assert_eq!(recorded[0].name(), "env:validated");
        assert_eq!(recorded[0].payload()["resolved"], 1);
    }
}
