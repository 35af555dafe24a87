use graphforge_emit::EmissionError;
use graphforge_schema::GenerationError;
use miette::Diagnostic;
use thiserror::Error;

/// Build options that were rejected before any schema work started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("Empty `resolvers` array property found in `build_schema` options!")]
    #[diagnostic(
        code(graphforge::config::empty_resolvers),
        help("list at least one inline resolver or a glob matching resolver files")
    )]
    EmptyResolvers,

    #[error("Empty `types` array property found in `build_schema` options!")]
    #[diagnostic(
        code(graphforge::config::empty_types),
        help("declare at least one type in `types`")
    )]
    EmptyTypes,
}

#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emission(#[from] EmissionError),
}
