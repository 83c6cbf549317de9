//! Property tests for variable name derivation.

use proptest::prelude::*;

use stackgate::domain::services::env_naming::{output_key_to_env_name, store_key_to_env_name};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: derived names are upper snake case.
    #[test]
    fn property_output_names_are_upper_snake(key in "[A-Za-z][A-Za-z0-9]{0,24}") {
        let name = output_key_to_env_name(&key);
        prop_assert!(name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!name.starts_with('_'));
    }

    /// PROPERTY: store names never contain separator runs or edge underscores.
    #[test]
    fn property_store_names_are_collapsed(key in "[a-z/.\\-]{0,32}") {
        let name = store_key_to_env_name(&key);
        prop_assert!(!name.contains("__"));
        prop_assert!(!name.starts_with('_') && !name.ends_with('_'));
    }

    /// PROPERTY: derivation is idempotent.
    #[test]
    fn property_store_derivation_idempotent(key in "[A-Za-z0-9/._\\-]{0,32}") {
        let once = store_key_to_env_name(&key);
        prop_assert_eq!(store_key_to_env_name(&once), once);
    }
}
