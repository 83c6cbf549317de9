//! Domain Services
//!
//! Pure business logic:
//! - `reference_parser` - stack identifiers from reference expressions
//! - `requirements` - derive `StackRequirements` from a descriptor
//! - `env_naming` - output/store key to variable name transforms
//! - `recommendations` - classify inspection failures

pub mod env_naming;
pub mod recommendations;
pub mod reference_parser;
pub mod requirements;

pub use recommendations::FailureClass;
pub use reference_parser::{
    find_parameter_path_references, find_stack_output_references, reduce_base_name,
    stack_from_output_expr, ParameterPathMatch, ReferenceParser, StackOutputMatch,
    DEFAULT_INFRASTRUCTURE_NOUNS, MARKER_SUFFIX,
};
pub use requirements::{
    config_store_prefixes, derive_requirements, flatten_config_entries, CONFIG_STORE_NAMESPACES,
    DEPENDENCY_TAG,
};
