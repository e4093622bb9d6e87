use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dm_upgrade::{parse_version, SchemaVersion};
use tracing_subscriber::EnvFilter;

mod commands;

/// dmup: Check schema-version compatibility before a DM deployment.
///
/// Evaluate a board of database, snapshot and service versions, export it as
/// a static page, or edit it live in the browser.
#[derive(Parser)]
#[command(name = "dmup", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the board and print every entity's status.
    Check {
        /// Board file. Defaults to ./dm-board.toml, or the stock board.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the database schema version.
        #[arg(long, allow_negative_numbers = true, value_parser = version_arg)]
        database: Option<SchemaVersion>,

        /// Override the snapshot schema version.
        #[arg(long, allow_negative_numbers = true, value_parser = version_arg)]
        snapshot: Option<SchemaVersion>,

        /// Override a service schema version. Repeatable.
        #[arg(long = "service", value_name = "NAME=VERSION", value_parser = service_arg)]
        services: Vec<(String, SchemaVersion)>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Exit with an error when any entity is not OK.
        #[arg(long)]
        strict: bool,
    },

    /// Write the board as a static page.
    Export {
        /// Board file. Defaults to ./dm-board.toml, or the stock board.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the output directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Override the URL sub-path the page is served from.
        #[arg(long)]
        base_path: Option<String>,
    },

    /// Launch the board in a local web server for live editing.
    Serve {
        /// Board file. Defaults to ./dm-board.toml, or the stock board.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Interface to bind.
        #[arg(long)]
        host: Option<String>,

        /// Port to serve on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Open the page in the default browser.
        #[arg(long)]
        open: bool,
    },

    /// Write a board file with the stock entities.
    Init {
        /// Where to write the board file.
        #[arg(default_value = dm_upgrade_config::DEFAULT_FILE_NAME)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn version_arg(s: &str) -> Result<SchemaVersion, String> {
    parse_version(s).map_err(|e| e.to_string())
}

fn service_arg(s: &str) -> Result<(String, SchemaVersion), String> {
    let (name, version) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VERSION, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing service name in `{s}`"));
    }
    Ok((name.to_string(), version_arg(version)?))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Check {
            config,
            database,
            snapshot,
            services,
            json,
            strict,
        } => {
            let overrides = commands::Overrides {
                database,
                snapshot,
                services,
            };
            commands::check(config.as_deref(), &overrides, json, strict)
        }
        Commands::Export {
            config,
            out,
            base_path,
        } => commands::export(config.as_deref(), out, base_path),
        Commands::Serve {
            config,
            host,
            port,
            open,
        } => commands::serve(config.as_deref(), host, port, open).await,
        Commands::Init { path, force } => commands::init(&path, force),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn service_override_parsing() {
        assert_eq!(service_arg("Bidder=3"), Ok(("Bidder".into(), 3)));
        assert_eq!(
            service_arg("Or any dm client=2"),
            Ok(("Or any dm client".into(), 2))
        );
        assert!(service_arg("Bidder").is_err());
        assert!(service_arg("=3").is_err());
        assert!(service_arg("Bidder=x").is_err());
    }

    #[test]
    fn check_arguments() {
        let cli = Cli::try_parse_from([
            "dmup",
            "check",
            "--snapshot",
            "3",
            "--service",
            "Act=2",
            "--service",
            "EP=4",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                snapshot,
                services,
                strict,
                json,
                ..
            } => {
                assert_eq!(snapshot, Some(3));
                assert_eq!(services, vec![("Act".into(), 2), ("EP".into(), 4)]);
                assert!(strict);
                assert!(!json);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn non_numeric_version_is_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["dmup", "check", "--database", "abc"]).is_err());
    }
}
