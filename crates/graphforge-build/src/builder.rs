use std::path::PathBuf;

use graphforge_emit::{EmissionError, FileEmitter, SchemaEmitter};
use graphforge_schema::{MetadataSchemaGenerator, Schema, SchemaGenerator};

use crate::{BuildError, BuildOptions, EmitTarget};

/// Validates [`BuildOptions`], generates the schema and writes the schema
/// file when one is requested.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder<G = MetadataSchemaGenerator, E = FileEmitter> {
    generator: G,
    emitter: E,
    working_dir: Option<PathBuf>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: SchemaGenerator, E: SchemaEmitter> SchemaBuilder<G, E> {
    pub fn with_collaborators(generator: G, emitter: E) -> Self {
        Self {
            generator,
            emitter,
            working_dir: None,
        }
    }

    /// Directory the default `schema.gql` is placed in. Defaults to the
    /// process working directory at emit time.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// # Errors
    ///
    /// Returns [`BuildError::Configuration`] without calling the generator when
    /// resolvers or types are empty; generator and emitter failures are
    /// passed through.
    #[tracing::instrument(skip_all, fields(
        resolvers = options.generator.resolvers.len(),
        types = options.generator.types.len(),
    ))]
    pub async fn build(&self, options: &BuildOptions) -> Result<Schema, BuildError> {
        options.validate()?;
        let schema = self
            .generator
            .generate_from_metadata(&options.generator)
            .await?;
        tracing::debug!(types = schema.type_count(), "generated schema");

        if let Some(target) = self.emit_target(options)? {
            self.emitter
                .emit(&target.path, &schema, &target.print_options)
                .await?;
        }
        Ok(schema)
    }

    /// Blocking variant of [`SchemaBuilder::build`].
    ///
    /// # Errors
    ///
    /// Same as [`SchemaBuilder::build`].
    #[tracing::instrument(skip_all, fields(
        resolvers = options.generator.resolvers.len(),
        types = options.generator.types.len(),
    ))]
    pub fn build_sync(&self, options: &BuildOptions) -> Result<Schema, BuildError> {
        options.validate()?;
        let schema = self.generator.generate_from_metadata_sync(&options.generator)?;
        tracing::debug!(types = schema.type_count(), "generated schema");

        if let Some(target) = self.emit_target(options)? {
            self.emitter
                .emit_sync(&target.path, &schema, &target.print_options)?;
        }
        Ok(schema)
    }

    fn emit_target(&self, options: &BuildOptions) -> Result<Option<EmitTarget>, EmissionError> {
        let Some(directive) = &options.emit_schema_file else {
            return Ok(None);
        };
        let target = directive.resolve_with(|| match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(EmissionError::WorkingDirectory),
        })?;
        if target.is_none() {
            tracing::debug!("schema file emission not requested");
        }
        Ok(target)
    }
}

/// Build with [`MetadataSchemaGenerator`] and [`FileEmitter`].
///
/// # Errors
///
/// See [`SchemaBuilder::build`].
pub async fn build_schema(options: &BuildOptions) -> Result<Schema, BuildError> {
    SchemaBuilder::new().build(options).await
}

/// Blocking variant of [`build_schema`].
///
/// # Errors
///
/// See [`SchemaBuilder::build`].
pub fn build_schema_sync(options: &BuildOptions) -> Result<Schema, BuildError> {
    SchemaBuilder::new().build_sync(options)
}
