pub mod build;
pub mod config_schema;
pub mod print;

use std::path::Path;

use graphforge_config::LoadedConfig;

/// Load `path`, or the nearest `graphforge.toml` above the working directory.
fn load_config(path: Option<&Path>) -> miette::Result<LoadedConfig> {
    let loaded = match path {
        Some(path) => graphforge_config::load_file(path),
        None => graphforge_config::load(),
    };
    loaded.map_err(|e| miette::miette!("{e:#}"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub const CONFIG: &str = r#"
resolvers = ["resolvers/*.toml"]

[[types]]
name = "Author"
kind = "object"
description = "Someone who writes"

[[types.fields]]
name = "name"
type = "String!"
"#;

    pub const RESOLVER: &str = r#"
[[resolvers]]
name = "AuthorResolver"

[[resolvers.queries]]
name = "authors"
type = "[Author!]!"
"#;

    /// Lay out a project in `dir` and return the config path.
    pub fn project(dir: &Path, config: &str) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir.join("resolvers"))?;
        std::fs::write(dir.join("resolvers/author.toml"), RESOLVER)?;
        let path = dir.join(graphforge_config::CONFIG_FILENAME);
        std::fs::write(&path, config)?;
        Ok(path)
    }
}
