use graphforge_metadata::{ResolverSource, TypeDescriptor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{GenerationError, ScalarType, Schema};

/// How the `Date` pseudo-type is represented in the generated schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateScalarMode {
    /// `DateTime`, an ISO 8601 string.
    #[default]
    IsoDate,
    /// `Timestamp`, milliseconds since the UNIX epoch.
    Timestamp,
}

impl DateScalarMode {
    pub fn scalar(self) -> ScalarType {
        match self {
            Self::IsoDate => ScalarType {
                name: "DateTime".into(),
                description: Some(
                    "A date-time string at UTC, such as 2007-12-03T10:15:30Z, \
                     compliant with the `date-time` format outlined in section 5.6 of the RFC 3339 \
                     profile of the ISO 8601 standard for representation of dates and times \
                     using the Gregorian calendar."
                        .into(),
                ),
            },
            Self::Timestamp => ScalarType {
                name: "Timestamp".into(),
                description: Some(
                    "The `Timestamp` scalar type represents date and time as number of \
                     milliseconds from start of UNIX epoch."
                        .into(),
                ),
            },
        }
    }
}

/// Inputs of schema generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SchemaGeneratorOptions {
    /// Resolvers providing the root operations: inline tables or glob
    /// patterns matching `.toml` / `.json` resolver files.
    #[serde(default)]
    pub resolvers: Vec<ResolverSource>,

    /// Declared object, interface, input, enum, union and scalar types.
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,

    /// Skip the final validation pass over the assembled schema.
    #[serde(default)]
    pub skip_check: bool,

    /// Scalar used for fields typed as `Date`.
    #[serde(default)]
    pub date_scalar_mode: DateScalarMode,
}

/// Builds a [`Schema`] from resolver and type metadata.
#[async_trait::async_trait]
pub trait SchemaGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the metadata does not describe a valid schema.
    async fn generate_from_metadata(
        &self,
        options: &SchemaGeneratorOptions,
    ) -> Result<Schema, GenerationError>;

    /// Blocking variant of [`SchemaGenerator::generate_from_metadata`].
    ///
    /// # Errors
    ///
    /// Returns an error when the metadata does not describe a valid schema.
    fn generate_from_metadata_sync(
        &self,
        options: &SchemaGeneratorOptions,
    ) -> Result<Schema, GenerationError>;
}
