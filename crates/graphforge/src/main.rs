#![doc = include_str!("../README.md")]

use bpaf::Bpaf;
use tracing_subscriber::prelude::*;

mod commands;

use commands::build::{BuildArgs, build_args};
use commands::print::{PrintArgs, print_args};

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage, generate(cli))]
/// Generate GraphQL schema files from resolver and type descriptors
struct Cli {
    #[bpaf(external(commands))]
    command: Commands,
}

#[derive(Debug, Clone, Bpaf)]
enum Commands {
    #[bpaf(command("build"))]
    /// Build the schema described by graphforge.toml
    Build(#[bpaf(external(build_args))] BuildArgs),

    #[bpaf(command("print"))]
    /// Print the schema as SDL to stdout
    Print(#[bpaf(external(print_args))] PrintArgs),

    #[bpaf(command("config-schema"))]
    /// Print the JSON Schema of graphforge.toml
    ConfigSchema,
}

fn setup_tracing() {
    // Verbose span entry/exit only when GRAPHFORGE_LOG is set.
    let (filter, explicit) = match tracing_subscriber::EnvFilter::try_from_env("GRAPHFORGE_LOG") {
        Ok(f) => (f, true),
        Err(_) => (tracing_subscriber::EnvFilter::new("info"), false),
    };
    tracing_subscriber::registry()
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_indent_lines(true)
                .with_verbose_exit(explicit)
                .with_verbose_entry(explicit)
                .with_timer(tracing_tree::time::Uptime::default())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn setup_miette() {
    let theme = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        miette::GraphicalTheme::unicode()
    } else {
        miette::GraphicalTheme::unicode_nocolor()
    };
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .graphical_theme(theme.clone())
                .build(),
        )
    }))
    .ok();
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    setup_miette();
    setup_tracing();

    match cli().run().command {
        Commands::Build(args) => {
            commands::build::run(args).await?;
        }
        Commands::Print(args) => {
            print!("{}", commands::print::run(args).await?);
        }
        Commands::ConfigSchema => {
            println!("{}", commands::config_schema::run()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn cli_parses_build_defaults() -> anyhow::Result<()> {
        let parsed = cli()
            .run_inner(&["build"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match parsed.command {
            Commands::Build(args) => {
                assert!(args.config.is_none());
                assert!(args.emit.is_none());
                assert!(!args.sync);
            }
            _ => panic!("expected Build"),
        }
        Ok(())
    }

    #[test]
    fn cli_parses_build_all_options() -> anyhow::Result<()> {
        let parsed = cli()
            .run_inner(&[
                "build",
                "--config",
                "api/graphforge.toml",
                "--emit",
                "out/schema.gql",
                "--sync",
            ])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match parsed.command {
            Commands::Build(args) => {
                assert_eq!(args.config, Some(PathBuf::from("api/graphforge.toml")));
                assert_eq!(args.emit, Some(PathBuf::from("out/schema.gql")));
                assert!(args.sync);
            }
            _ => panic!("expected Build"),
        }
        Ok(())
    }

    #[test]
    fn cli_parses_print_flags() -> anyhow::Result<()> {
        let parsed = cli()
            .run_inner(&["print", "--comment-descriptions", "--unsorted"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        match parsed.command {
            Commands::Print(args) => {
                assert!(args.comment_descriptions);
                assert!(args.unsorted);
                assert!(args.config.is_none());
            }
            _ => panic!("expected Print"),
        }
        Ok(())
    }

    #[test]
    fn cli_parses_config_schema() -> anyhow::Result<()> {
        let parsed = cli()
            .run_inner(&["config-schema"])
            .map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert!(matches!(parsed.command, Commands::ConfigSchema));
        Ok(())
    }
}
