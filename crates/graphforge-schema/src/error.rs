use graphforge_metadata::{LoadError, TypeKind};
use miette::Diagnostic;
use thiserror::Error;

/// Why a schema could not be generated from the supplied metadata.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error("schema has no queries")]
    #[diagnostic(
        code(graphforge::generate::missing_query),
        help("a GraphQL schema needs a `Query` type; add at least one query to a resolver")
    )]
    MissingQuery,

    #[error("`{name}` is a reserved type name")]
    #[diagnostic(code(graphforge::generate::reserved_name))]
    ReservedTypeName { name: String },

    #[error("invalid name `{name}` at {location}")]
    #[diagnostic(
        code(graphforge::generate::invalid_name),
        help("names must match /[_A-Za-z][_0-9A-Za-z]*/ and must not start with `__`")
    )]
    InvalidName { location: String, name: String },

    #[error("type `{name}` is declared more than once")]
    #[diagnostic(code(graphforge::generate::duplicate_type))]
    DuplicateType { name: String },

    #[error("field `{field}` is defined more than once on `{type_name}`")]
    #[diagnostic(code(graphforge::generate::duplicate_field))]
    DuplicateField { type_name: String, field: String },

    #[error("unknown type `{name}` referenced by {referenced_by}")]
    #[diagnostic(
        code(graphforge::generate::unknown_type),
        help("declare `{name}` in `types`, or use a built-in scalar")
    )]
    UnknownType { name: String, referenced_by: String },

    #[error("`{object}` implements `{name}`, which is not an interface")]
    #[diagnostic(code(graphforge::generate::not_an_interface))]
    NotAnInterface { object: String, name: String },

    #[error(
        "resolver `{resolver}` adds fields to `{type_name}`, which is {} type, not an object",
        article(*kind)
    )]
    #[diagnostic(code(graphforge::generate::field_resolver_target))]
    InvalidFieldResolverTarget {
        resolver: String,
        type_name: String,
        kind: TypeKind,
    },

    #[error("{} `{name}` must define at least one {}", kind.as_str(), member_word(*kind))]
    #[diagnostic(code(graphforge::generate::empty_type))]
    EmptyType { name: String, kind: TypeKind },

    #[error("{location} returns `{ty}`, which is not an output type")]
    #[diagnostic(code(graphforge::generate::output_type))]
    InvalidOutputType { location: String, ty: String },

    #[error("{location} accepts `{ty}`, which is not an input type")]
    #[diagnostic(code(graphforge::generate::input_type))]
    InvalidInputType { location: String, ty: String },

    #[error(
        "`{object}.{field}` has type `{found}` but interface `{interface}` expects `{expected}`"
    )]
    #[diagnostic(code(graphforge::generate::interface_field))]
    InterfaceFieldMismatch {
        object: String,
        interface: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error(
        "`{object}.{field}({argument})` has type `{found}` but interface `{interface}` expects `{expected}`"
    )]
    #[diagnostic(code(graphforge::generate::interface_argument))]
    InterfaceArgumentMismatch {
        object: String,
        interface: String,
        field: String,
        argument: String,
        expected: String,
        found: String,
    },

    #[error(
        "`{object}.{field}({argument})` is required but not declared by interface `{interface}`"
    )]
    #[diagnostic(
        code(graphforge::generate::interface_argument),
        help("give `{argument}` a nullable type or a default value")
    )]
    InterfaceExtraRequiredArgument {
        object: String,
        interface: String,
        field: String,
        argument: String,
    },

    #[error("union `{union}` includes `{member}`, which is not an object type")]
    #[diagnostic(code(graphforge::generate::union_member))]
    InvalidUnionMember { union: String, member: String },
}

fn article(kind: TypeKind) -> String {
    match kind {
        TypeKind::Object | TypeKind::InputObject | TypeKind::Interface | TypeKind::Enum => {
            format!("an {}", kind.as_str())
        }
        TypeKind::Union | TypeKind::Scalar => format!("a {}", kind.as_str()),
    }
}

fn member_word(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Enum => "value",
        TypeKind::Union => "member",
        _ => "field",
    }
}
