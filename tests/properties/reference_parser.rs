//! Property tests for reference extraction.

use proptest::prelude::*;

use stackgate::domain::services::{reduce_base_name, stack_from_output_expr};
use stackgate::{ReferenceParser, StackIdentifier};

fn stack_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9]{0,12}(-[a-z0-9]{1,8}){0,2}-stack").unwrap()
}

fn filler() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _:#\\-\n]{0,40}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: extraction never panics and only yields valid identifiers.
    #[test]
    fn property_extract_yields_valid_identifiers(text in "(?s).{0,256}") {
        for reference in ReferenceParser::default().extract(&text) {
            prop_assert!(StackIdentifier::parse(reference.target.as_str()).is_some());
            prop_assert!(!reference.target.as_str().contains('$'));
        }
    }

    /// PROPERTY: a literal marker segment is always recovered unchanged.
    #[test]
    fn property_marker_segment_is_recovered(
        name in stack_name(),
        key in "[a-z]{1,10}",
        before in filler(),
        after in filler(),
    ) {
        let text = format!("{before}${{ssm:/{name}/{key}}}{after}");
        let targets: Vec<String> = ReferenceParser::default()
            .extract(&text)
            .into_iter()
            .map(|r| r.target.to_string())
            .collect();
        prop_assert_eq!(targets, vec![name]);
    }

    /// PROPERTY: stack-output references keep the output name after the last dot.
    #[test]
    fn property_stack_output_reference(name in stack_name(), output in "[A-Z][A-Za-z0-9]{0,15}") {
        let text = format!("${{cf:{name}.{output}}}");
        let refs = ReferenceParser::default().extract(&text);
        prop_assert_eq!(refs.len(), 1);
        prop_assert_eq!(refs[0].target.as_str(), name.as_str());
        prop_assert_eq!(refs[0].output_name.as_deref(), Some(output.as_str()));
    }

    /// PROPERTY: interpolation prefixes are stripped from stack-output expressions.
    #[test]
    fn property_interpolated_prefix_is_stripped(name in stack_name()) {
        let expr = format!("${{self:service}}-${{opt:stage}}-{name}");
        let id = stack_from_output_expr(&expr);
        prop_assert_eq!(id.as_ref().map(StackIdentifier::as_str), Some(name.as_str()));
    }

    /// PROPERTY: output-expression inference never panics on arbitrary input.
    #[test]
    fn property_stack_from_output_expr_never_panics(expr in "(?s).{0,64}") {
        let _ = stack_from_output_expr(&expr);
        let _ = reduce_base_name(&expr);
    }
}
