use std::path::PathBuf;

use bpaf::Bpaf;
use graphforge_build::{EmitSchemaFile, build_schema, build_schema_sync};
use graphforge_schema::Schema;

#[derive(Debug, Clone, Bpaf)]
pub struct BuildArgs {
    /// Config file to use instead of the nearest graphforge.toml
    #[bpaf(long("config"), argument("PATH"))]
    pub config: Option<PathBuf>,

    /// Write the schema to PATH, overriding `emit_schema_file`
    #[bpaf(long("emit"), argument("PATH"))]
    pub emit: Option<PathBuf>,

    /// Use the blocking resolver loader and schema emitter
    #[bpaf(long("sync"), switch)]
    pub sync: bool,
}

pub async fn run(args: BuildArgs) -> miette::Result<Schema> {
    let loaded = super::load_config(args.config.as_deref())?;
    let mut options = loaded.config.build;
    if let Some(emit) = args.emit {
        options.emit_schema_file = Some(EmitSchemaFile::Path(emit));
    }
    if !options.emits_schema_file() {
        tracing::info!("no schema file requested, only checking the schema");
    }

    let schema = if args.sync {
        tokio::task::spawn_blocking(move || build_schema_sync(&options))
            .await
            .map_err(|e| miette::miette!("schema build task failed: {e}"))??
    } else {
        build_schema(&options).await?
    };
    tracing::info!(
        config = %loaded.path.display(),
        types = schema.type_count(),
        "schema built"
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    fn args(config: PathBuf, emit: Option<PathBuf>, sync: bool) -> BuildArgs {
        BuildArgs {
            config: Some(config),
            emit,
            sync,
        }
    }

    #[tokio::test]
    async fn emit_flag_overrides_config() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = fixtures::project(tmp.path(), fixtures::CONFIG)?;
        let target = tmp.path().join("out/schema.gql");

        let schema = run(args(config, Some(target.clone()), false))
            .await
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(schema.query_type_name(), "Query");
        assert!(std::fs::read_to_string(target)?.contains("authors: [Author!]!"));
        Ok(())
    }

    #[tokio::test]
    async fn sync_flag_builds_on_a_blocking_thread() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = fixtures::project(tmp.path(), fixtures::CONFIG)?;
        let target = tmp.path().join("schema.graphql");

        run(args(config, Some(target.clone()), true))
            .await
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert!(target.is_file());
        Ok(())
    }

    #[tokio::test]
    async fn configuration_errors_surface() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = fixtures::project(tmp.path(), "resolvers = []\n")?;

        let Err(err) = run(args(config, None, false)).await else {
            anyhow::bail!("expected a configuration error");
        };
        assert_eq!(
            err.to_string(),
            "Empty `resolvers` array property found in `build_schema` options!"
        );
        Ok(())
    }
}
