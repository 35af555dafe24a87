use alloc::borrow::Cow;
use core::convert::Infallible;
use std::path::{Path, PathBuf};

use graphforge_emit::PrintSchemaOptions;
use graphforge_metadata::{ResolverSource, TypeDescriptor};
use graphforge_schema::{DateScalarMode, SchemaGeneratorOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ConfigurationError;

/// File name used when the schema file path is not given.
pub const DEFAULT_SCHEMA_FILE_NAME: &str = "schema.gql";

/// Everything a build needs: the generator inputs plus the emit directive.
///
/// Deserialized through a flat table that rejects unknown keys, so a
/// misspelled option is an error rather than silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBuildOptions")]
pub struct BuildOptions {
    #[serde(flatten)]
    pub generator: SchemaGeneratorOptions,

    /// Write the generated schema to disk: `true` for `schema.gql` in the
    /// working directory, a path, or a table with `path` and print options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_schema_file: Option<EmitSchemaFile>,
}

fn example_resolvers() -> Vec<String> {
    vec!["resolvers/**/*.toml".into()]
}

fn example_emit_schema_file() -> EmitSchemaFile {
    EmitSchemaFile::Options(EmitSchemaFileOptions {
        path: Some("generated/schema.gql".into()),
        ..EmitSchemaFileOptions::default()
    })
}

/// Build options as written in a config file.
#[derive(Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "Build Options")]
struct RawBuildOptions {
    /// Resolvers providing the root operations.
    ///
    /// Each entry is an inline resolver table or a glob pattern matching
    /// `.toml` / `.json` resolver files.
    #[schemars(title = "Resolvers", example = example_resolvers())]
    #[serde(default)]
    resolvers: Vec<ResolverSource>,

    /// Declared object, interface, input, enum, union and scalar types.
    #[schemars(title = "Types")]
    #[serde(default)]
    types: Vec<TypeDescriptor>,

    /// Skip the final validation pass over the assembled schema.
    #[schemars(title = "Skip Check")]
    #[serde(default)]
    skip_check: bool,

    /// Scalar used for fields typed as `Date`: `iso_date` or `timestamp`.
    #[schemars(title = "Date Scalar Mode")]
    #[serde(default)]
    date_scalar_mode: DateScalarMode,

    /// Write the generated schema to disk.
    ///
    /// `true` writes `schema.gql` into the working directory, a string is
    /// the target path, and a table sets `path` plus print options.
    /// `false` or an empty string writes nothing.
    #[schemars(title = "Emit Schema File", example = example_emit_schema_file())]
    #[serde(default)]
    emit_schema_file: Option<EmitSchemaFile>,
}

impl From<RawBuildOptions> for BuildOptions {
    fn from(raw: RawBuildOptions) -> Self {
        Self {
            generator: SchemaGeneratorOptions {
                resolvers: raw.resolvers,
                types: raw.types,
                skip_check: raw.skip_check,
                date_scalar_mode: raw.date_scalar_mode,
            },
            emit_schema_file: raw.emit_schema_file,
        }
    }
}

impl JsonSchema for BuildOptions {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("BuildOptions")
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        RawBuildOptions::json_schema(generator)
    }
}

impl BuildOptions {
    /// Reject options without resolvers or without types.
    ///
    /// # Errors
    ///
    /// Returns the first empty list found, resolvers before types.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.generator.resolvers.is_empty() {
            return Err(ConfigurationError::EmptyResolvers);
        }
        if self.generator.types.is_empty() {
            return Err(ConfigurationError::EmptyTypes);
        }
        Ok(())
    }

    /// Whether a build with these options writes a schema file.
    pub fn emits_schema_file(&self) -> bool {
        self.emit_schema_file
            .as_ref()
            .is_some_and(EmitSchemaFile::is_requested)
    }
}

/// Where, and how, to write the schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EmitSchemaFile {
    Enabled(bool),
    Path(PathBuf),
    Options(EmitSchemaFileOptions),
}

/// Table form of [`EmitSchemaFile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
#[schemars(title = "Emit Schema File Options")]
pub struct EmitSchemaFileOptions {
    /// Target file. Defaults to `schema.gql` in the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Print descriptions as `#` comments instead of block strings.
    pub comment_descriptions: bool,

    /// Order types, fields, arguments and enum values lexicographically.
    pub sorted_schema: bool,
}

impl Default for EmitSchemaFileOptions {
    fn default() -> Self {
        let print = PrintSchemaOptions::default();
        Self {
            path: None,
            comment_descriptions: print.comment_descriptions,
            sorted_schema: print.sorted_schema,
        }
    }
}

impl EmitSchemaFileOptions {
    pub fn print_options(&self) -> PrintSchemaOptions {
        PrintSchemaOptions {
            comment_descriptions: self.comment_descriptions,
            sorted_schema: self.sorted_schema,
        }
    }
}

/// A resolved emit directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitTarget {
    pub path: PathBuf,
    pub print_options: PrintSchemaOptions,
}

impl From<bool> for EmitSchemaFile {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}

impl From<PathBuf> for EmitSchemaFile {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&str> for EmitSchemaFile {
    fn from(value: &str) -> Self {
        Self::Path(value.into())
    }
}

impl From<EmitSchemaFileOptions> for EmitSchemaFile {
    fn from(value: EmitSchemaFileOptions) -> Self {
        Self::Options(value)
    }
}

impl EmitSchemaFile {
    /// `false` and the empty path turn emission off; everything else turns it on.
    pub fn is_requested(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Path(path) => !path.as_os_str().is_empty(),
            Self::Options(_) => true,
        }
    }

    /// Resolve against `working_dir`, which supplies the default location.
    pub fn resolve(&self, working_dir: &Path) -> Option<EmitTarget> {
        let Ok(target) = self.resolve_with(|| Ok::<_, Infallible>(working_dir.to_path_buf()));
        target
    }

    /// Resolve the directive, asking `working_dir` for the default location
    /// only when no explicit path is given.
    ///
    /// # Errors
    ///
    /// Propagates the error of `working_dir`.
    pub fn resolve_with<E>(
        &self,
        working_dir: impl FnOnce() -> Result<PathBuf, E>,
    ) -> Result<Option<EmitTarget>, E> {
        let default_path = || working_dir().map(|dir| dir.join(DEFAULT_SCHEMA_FILE_NAME));
        let target = match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(EmitTarget {
                path: default_path()?,
                print_options: PrintSchemaOptions::default(),
            }),
            Self::Path(path) if path.as_os_str().is_empty() => None,
            Self::Path(path) => Some(EmitTarget {
                path: path.clone(),
                print_options: PrintSchemaOptions::default(),
            }),
            Self::Options(options) => {
                let path = match options.path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
                    Some(path) => path.clone(),
                    None => default_path()?,
                };
                Some(EmitTarget {
                    path,
                    print_options: options.print_options(),
                })
            }
        };
        Ok(target)
    }
}
