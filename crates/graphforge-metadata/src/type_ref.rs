use alloc::borrow::Cow;
use core::fmt;
use core::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A GraphQL type reference such as `String`, `[User!]` or `ID!`.
///
/// Serialized as its SDL notation, so descriptor files can write
/// `type = "[User!]!"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRefError {
    #[error("empty type reference")]
    Empty,
    #[error("invalid type name in `{0}`")]
    InvalidName(String),
    #[error("unbalanced brackets in `{0}`")]
    Unbalanced(String),
    #[error("unexpected input after type reference `{0}`")]
    Trailing(String),
    #[error("type reference `{0}` nests lists too deeply")]
    TooDeep(String),
}

/// Deepest list nesting accepted by the parser.
pub const MAX_LIST_DEPTH: usize = 32;

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Wrap in a non-null marker. Already non-null references are returned as is.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// The innermost named type, with list and non-null wrappers removed.
    pub fn named_type(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Replace the innermost named type when it equals `from`.
    ///
    /// Returns `true` when a replacement happened.
    pub fn rename_named(&mut self, from: &str, to: &str) -> bool {
        match self {
            Self::Named(name) if name == from => {
                *name = to.to_string();
                true
            }
            Self::Named(_) => false,
            Self::List(inner) | Self::NonNull(inner) => inner.rename_named(from, to),
        }
    }
}

/// Whether `name` is a valid GraphQL name (`/[_A-Za-z][_0-9A-Za-z]*/`).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn parse_type<'a>(
    s: &'a str,
    input: &str,
    depth: usize,
) -> Result<(TypeRef, &'a str), TypeRefError> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('[') {
        if depth == MAX_LIST_DEPTH {
            return Err(TypeRefError::TooDeep(input.to_string()));
        }
        let (inner, rest) = parse_type(rest, input, depth + 1)?;
        let Some(rest) = rest.trim_start().strip_prefix(']') else {
            return Err(TypeRefError::Unbalanced(input.to_string()));
        };
        Ok(with_non_null(TypeRef::List(Box::new(inner)), rest))
    } else {
        let end = s
            .find(|c: char| c != '_' && !c.is_ascii_alphanumeric())
            .unwrap_or(s.len());
        let name = &s[..end];
        if !is_valid_name(name) {
            return Err(TypeRefError::InvalidName(input.to_string()));
        }
        Ok(with_non_null(TypeRef::named(name), &s[end..]))
    }
}

fn with_non_null(ty: TypeRef, rest: &str) -> (TypeRef, &str) {
    let rest = rest.trim_start();
    match rest.strip_prefix('!') {
        Some(rest) => (TypeRef::NonNull(Box::new(ty)), rest),
        None => (ty, rest),
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(TypeRefError::Empty);
        }
        let (ty, rest) = parse_type(input, input, 0)?;
        match rest.trim_start() {
            "" => Ok(ty),
            rest if rest.starts_with(']') => Err(TypeRefError::Unbalanced(input.to_string())),
            _ => Err(TypeRefError::Trailing(input.to_string())),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl JsonSchema for TypeRef {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("TypeRef")
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "title": "Type Reference",
            "description": "GraphQL type reference in SDL notation.",
            "examples": ["String!", "[User!]!", "ID"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named() -> anyhow::Result<()> {
        assert_eq!("String".parse::<TypeRef>()?, TypeRef::named("String"));
        Ok(())
    }

    #[test]
    fn parses_nested_wrappers() -> anyhow::Result<()> {
        let ty: TypeRef = "[User!]!".parse()?;
        assert_eq!(ty, TypeRef::named("User").non_null().list().non_null());
        assert_eq!(ty.named_type(), "User");
        assert!(ty.is_non_null());
        Ok(())
    }

    #[test]
    fn tolerates_whitespace() -> anyhow::Result<()> {
        let ty: TypeRef = " [ Int ! ] ".parse()?;
        assert_eq!(ty.to_string(), "[Int!]");
        Ok(())
    }

    #[test]
    fn display_round_trips_notation() -> anyhow::Result<()> {
        for input in ["ID", "ID!", "[ID]", "[[Float!]]!"] {
            assert_eq!(input.parse::<TypeRef>()?.to_string(), input);
        }
        Ok(())
    }

    #[test]
    fn rejects_empty() {
        assert_eq!("  ".parse::<TypeRef>(), Err(TypeRefError::Empty));
    }

    #[test]
    fn rejects_invalid_names() {
        assert!(matches!(
            "1abc".parse::<TypeRef>(),
            Err(TypeRefError::InvalidName(_))
        ));
        assert!(matches!(
            "[]".parse::<TypeRef>(),
            Err(TypeRefError::InvalidName(_))
        ));
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(matches!(
            "[Int".parse::<TypeRef>(),
            Err(TypeRefError::Unbalanced(_))
        ));
        assert!(matches!(
            "Int]".parse::<TypeRef>(),
            Err(TypeRefError::Unbalanced(_))
        ));
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(matches!(
            "Int!!".parse::<TypeRef>(),
            Err(TypeRefError::Trailing(_))
        ));
        assert!(matches!(
            "Int String".parse::<TypeRef>(),
            Err(TypeRefError::Trailing(_))
        ));
    }

    #[test]
    fn non_null_is_idempotent() {
        let ty = TypeRef::named("Int").non_null().non_null();
        assert_eq!(ty.to_string(), "Int!");
    }

    #[test]
    fn rename_named_only_touches_matching_name() -> anyhow::Result<()> {
        let mut ty: TypeRef = "[Date!]".parse()?;
        assert!(ty.rename_named("Date", "DateTime"));
        assert_eq!(ty.to_string(), "[DateTime!]");
        assert!(!ty.rename_named("Date", "Timestamp"));
        Ok(())
    }

    #[test]
    fn deserializes_from_string() -> anyhow::Result<()> {
        let ty: TypeRef = serde_json::from_str(r#""[String!]""#)?;
        assert_eq!(ty.to_string(), "[String!]");
        assert!(serde_json::from_str::<TypeRef>(r#""[String""#).is_err());
        Ok(())
    }

    #[test]
    fn rejects_runaway_list_nesting() -> anyhow::Result<()> {
        let input = format!("{}Int{}", "[".repeat(10_000), "]".repeat(10_000));
        assert!(matches!(
            input.parse::<TypeRef>(),
            Err(TypeRefError::TooDeep(_))
        ));

        let deepest = format!(
            "{}Int{}",
            "[".repeat(MAX_LIST_DEPTH),
            "]".repeat(MAX_LIST_DEPTH)
        );
        assert_eq!(deepest.parse::<TypeRef>()?.to_string(), deepest);
        Ok(())
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("User2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("2User"));
        assert!(!is_valid_name("user-name"));
    }
}
