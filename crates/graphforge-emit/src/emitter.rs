use std::io;
use std::path::{Path, PathBuf};

use graphforge_schema::Schema;
use miette::Diagnostic;
use thiserror::Error;

use crate::{PrintSchemaOptions, print_schema};

/// Header written above the printed schema.
pub const GENERATED_SCHEMA_WARNING: &str = "\
# -----------------------------------------------
# !!!  THIS FILE WAS GENERATED BY GRAPHFORGE  !!!
# !!!   DO NOT MODIFY THIS FILE BY YOURSELF   !!!
# -----------------------------------------------

";

#[derive(Debug, Error, Diagnostic)]
pub enum EmissionError {
    #[error("failed to create directory {}: {source}", path.display())]
    #[diagnostic(code(graphforge::emit::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write schema file {}: {source}", path.display())]
    #[diagnostic(code(graphforge::emit::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to determine the current working directory: {0}")]
    #[diagnostic(
        code(graphforge::emit::working_dir),
        help("pass an explicit schema file path")
    )]
    WorkingDirectory(#[source] io::Error),
}

/// Writes a schema's textual representation somewhere.
#[async_trait::async_trait]
pub trait SchemaEmitter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the schema cannot be written to `path`.
    async fn emit(
        &self,
        path: &Path,
        schema: &Schema,
        options: &PrintSchemaOptions,
    ) -> Result<(), EmissionError>;

    /// Blocking variant of [`SchemaEmitter::emit`].
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be written to `path`.
    fn emit_sync(
        &self,
        path: &Path,
        schema: &Schema,
        options: &PrintSchemaOptions,
    ) -> Result<(), EmissionError>;
}

/// The full contents of an emitted schema file: warning header plus SDL.
pub fn schema_file_content(schema: &Schema, options: &PrintSchemaOptions) -> String {
    format!("{GENERATED_SCHEMA_WARNING}{}", print_schema(schema, options))
}

/// Emits schema files to the local file system, creating parent directories
/// as needed and overwriting existing files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEmitter;

/// Parent directory that has to exist before `path` can be written, if any.
fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[async_trait::async_trait]
impl SchemaEmitter for FileEmitter {
    #[tracing::instrument(skip(self, schema, options), fields(path = %path.display()))]
    async fn emit(
        &self,
        path: &Path,
        schema: &Schema,
        options: &PrintSchemaOptions,
    ) -> Result<(), EmissionError> {
        let content = schema_file_content(schema, options);
        if let Some(parent) = parent_dir(path) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| EmissionError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|source| EmissionError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("wrote schema file");
        Ok(())
    }

    #[tracing::instrument(skip(self, schema, options), fields(path = %path.display()))]
    fn emit_sync(
        &self,
        path: &Path,
        schema: &Schema,
        options: &PrintSchemaOptions,
    ) -> Result<(), EmissionError> {
        let content = schema_file_content(schema, options);
        if let Some(parent) = parent_dir(path) {
            std::fs::create_dir_all(parent).map_err(|source| EmissionError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| EmissionError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("wrote schema file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_dir_skips_bare_file_names() {
        assert_eq!(parent_dir(Path::new("schema.gql")), None);
        assert_eq!(parent_dir(Path::new("out/schema.gql")), Some(Path::new("out")));
    }

    #[test]
    fn warning_header_is_a_comment_block() {
        assert!(
            GENERATED_SCHEMA_WARNING
                .lines()
                .all(|line| line.is_empty() || line.starts_with('#'))
        );
        assert!(GENERATED_SCHEMA_WARNING.ends_with("\n\n"));
    }
}
