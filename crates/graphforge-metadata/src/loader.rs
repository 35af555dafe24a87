use std::path::{Path, PathBuf};

use miette::Diagnostic;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ResolverDescriptor;

/// Where resolver descriptors come from.
///
/// A plain string is a glob pattern matched against descriptor files; a table
/// is an inline resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResolverSource {
    /// Glob pattern matching `.toml` or `.json` resolver descriptor files.
    Glob(String),
    Inline(ResolverDescriptor),
}

impl From<ResolverDescriptor> for ResolverSource {
    fn from(value: ResolverDescriptor) -> Self {
        Self::Inline(value)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("invalid resolver glob `{pattern}`: {source}")]
    #[diagnostic(code(graphforge::load::pattern))]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to expand resolver glob `{pattern}`: {source}")]
    #[diagnostic(code(graphforge::load::glob))]
    Glob {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    #[error("failed to read {}: {source}", path.display())]
    #[diagnostic(code(graphforge::load::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    #[diagnostic(code(graphforge::load::parse))]
    Parse { path: PathBuf, message: String },

    #[error("unsupported resolver file: {}", path.display())]
    #[diagnostic(
        code(graphforge::load::extension),
        help("resolver descriptor files must end in `.toml` or `.json`")
    )]
    UnsupportedExtension { path: PathBuf },
}

/// On-disk shape of a resolver descriptor file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ResolverFile {
    #[serde(default)]
    resolvers: Vec<ResolverDescriptor>,
}

#[derive(Debug, Clone, Copy)]
enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    fn detect(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<Vec<ResolverDescriptor>, LoadError> {
        let parsed: Result<ResolverFile, String> = match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed
            .map(|file| file.resolvers)
            .map_err(|message| LoadError::Parse {
                path: path.to_path_buf(),
                message,
            })
    }
}

/// Expand a glob into the matching files, in the order `glob` yields them.
fn expand(pattern: &str) -> Result<Vec<PathBuf>, LoadError> {
    let entries = glob::glob(pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|source| LoadError::Glob {
            pattern: pattern.to_string(),
            source,
        })?);
    }
    if paths.is_empty() {
        tracing::warn!(pattern, "resolver glob matched no files");
    }
    Ok(paths)
}

/// Resolve every source into resolver descriptors, reading files with `std::fs`.
///
/// Inline resolvers are passed through; glob sources contribute the
/// resolvers of each matched file in order.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or a matched file cannot be
/// read or parsed.
#[tracing::instrument(skip_all, fields(sources = sources.len()))]
pub fn load_resolvers(sources: &[ResolverSource]) -> Result<Vec<ResolverDescriptor>, LoadError> {
    let mut resolvers = Vec::new();
    for source in sources {
        match source {
            ResolverSource::Inline(resolver) => resolvers.push(resolver.clone()),
            ResolverSource::Glob(pattern) => {
                for path in expand(pattern)? {
                    let format = FileFormat::detect(&path)?;
                    let content =
                        std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
                            path: path.clone(),
                            source,
                        })?;
                    let loaded = format.parse(&path, &content)?;
                    tracing::debug!(path = %path.display(), count = loaded.len(), "loaded resolvers");
                    resolvers.extend(loaded);
                }
            }
        }
    }
    Ok(resolvers)
}

/// Async variant of [`load_resolvers`] reading files with `tokio::fs`.
///
/// # Errors
///
/// Same as [`load_resolvers`].
#[tracing::instrument(skip_all, fields(sources = sources.len()))]
pub async fn load_resolvers_async(
    sources: &[ResolverSource],
) -> Result<Vec<ResolverDescriptor>, LoadError> {
    let mut resolvers = Vec::new();
    for source in sources {
        match source {
            ResolverSource::Inline(resolver) => resolvers.push(resolver.clone()),
            ResolverSource::Glob(pattern) => {
                for path in expand(pattern)? {
                    let format = FileFormat::detect(&path)?;
                    let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
                        LoadError::Read {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    let loaded = format.parse(&path, &content)?;
                    tracing::debug!(path = %path.display(), count = loaded.len(), "loaded resolvers");
                    resolvers.extend(loaded);
                }
            }
        }
    }
    Ok(resolvers)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{FieldDescriptor, TypeRef};

    const USER_TOML: &str = r#"
[[resolvers]]
name = "UserResolver"

[[resolvers.queries]]
name = "me"
type = "User!"
"#;

    const POST_JSON: &str = r#"{
  "resolvers": [
    {"name": "PostResolver", "queries": [{"name": "posts", "type": "[Post!]!"}]}
  ]
}"#;

    fn glob_in(dir: &Path, pattern: &str) -> ResolverSource {
        ResolverSource::Glob(dir.join(pattern).to_string_lossy().to_string())
    }

    #[test]
    fn inline_sources_pass_through() -> anyhow::Result<()> {
        let inline = ResolverDescriptor::new("Inline")
            .query(FieldDescriptor::new("ping", TypeRef::named("String")));
        let loaded = load_resolvers(&[inline.clone().into()])?;
        assert_eq!(loaded, vec![inline]);
        Ok(())
    }

    #[test]
    fn loads_toml_and_json_in_glob_order() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join("a_user.toml"), USER_TOML)?;
        fs::write(tmp.path().join("b_post.json"), POST_JSON)?;

        let loaded = load_resolvers(&[glob_in(tmp.path(), "*")])?;
        let names: Vec<_> = loaded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["UserResolver", "PostResolver"]);
        assert_eq!(loaded[1].queries[0].ty.to_string(), "[Post!]!");
        Ok(())
    }

    #[test]
    fn empty_glob_contributes_nothing() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let loaded = load_resolvers(&[glob_in(tmp.path(), "*.toml")])?;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = load_resolvers(&[ResolverSource::Glob("a/***/b".into())]);
        assert!(matches!(err, Err(LoadError::Pattern { .. })));
    }

    #[test]
    fn unsupported_extension_is_reported() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join("resolvers.yaml"), "resolvers: []")?;
        let err = load_resolvers(&[glob_in(tmp.path(), "*.yaml")]);
        assert!(matches!(err, Err(LoadError::UnsupportedExtension { .. })));
        Ok(())
    }

    #[test]
    fn parse_errors_name_the_file() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join("broken.toml"), "[[resolvers]\nname = ")?;
        let Err(err) = load_resolvers(&[glob_in(tmp.path(), "*.toml")]) else {
            anyhow::bail!("expected parse error");
        };
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
        Ok(())
    }

    #[tokio::test]
    async fn async_loader_matches_sync_loader() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::write(tmp.path().join("user.toml"), USER_TOML)?;
        fs::write(tmp.path().join("post.json"), POST_JSON)?;
        let sources = vec![
            glob_in(tmp.path(), "*"),
            ResolverDescriptor::new("Inline").into(),
        ];

        let sync = load_resolvers(&sources)?;
        let from_async = load_resolvers_async(&sources).await?;
        assert_eq!(sync, from_async);
        assert_eq!(sync.len(), 3);
        Ok(())
    }

    #[test]
    fn resolver_source_deserializes_untagged() -> anyhow::Result<()> {
        let sources: Vec<ResolverSource> = serde_json::from_str(
            r#"["resolvers/*.toml", {"name": "Inline", "queries": [{"name": "ping", "type": "String"}]}]"#,
        )?;
        assert!(matches!(&sources[0], ResolverSource::Glob(p) if p == "resolvers/*.toml"));
        assert!(matches!(&sources[1], ResolverSource::Inline(r) if r.name == "Inline"));
        Ok(())
    }
}
