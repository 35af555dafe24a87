use std::path::PathBuf;

use bpaf::Bpaf;
use graphforge_build::build_schema;
use graphforge_emit::{PrintSchemaOptions, print_schema};

#[derive(Debug, Clone, Bpaf)]
pub struct PrintArgs {
    /// Config file to use instead of the nearest graphforge.toml
    #[bpaf(long("config"), argument("PATH"))]
    pub config: Option<PathBuf>,

    /// Print descriptions as `#` comments
    #[bpaf(long("comment-descriptions"), switch)]
    pub comment_descriptions: bool,

    /// Keep declaration order instead of sorting
    #[bpaf(long("unsorted"), switch)]
    pub unsorted: bool,
}

/// Generate the schema and render it as SDL, ignoring `emit_schema_file`.
pub async fn run(args: PrintArgs) -> miette::Result<String> {
    let mut options = super::load_config(args.config.as_deref())?.config.build;
    options.emit_schema_file = None;
    let schema = build_schema(&options).await?;
    Ok(print_schema(
        &schema,
        &PrintSchemaOptions {
            comment_descriptions: args.comment_descriptions,
            sorted_schema: !args.unsorted,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[tokio::test]
    async fn prints_without_writing_files() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let config = format!("emit_schema_file = true\n{}", fixtures::CONFIG);
        let config = fixtures::project(tmp.path(), &config)?;

        let sdl = run(PrintArgs {
            config: Some(config),
            comment_descriptions: true,
            unsorted: false,
        })
        .await
        .map_err(|e| anyhow::anyhow!("{e:?}"))?;

        assert!(sdl.starts_with("# Someone who writes\ntype Author {"));
        assert!(!tmp.path().join("schema.gql").exists());
        Ok(())
    }
}
