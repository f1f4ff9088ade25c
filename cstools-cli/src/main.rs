use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;
use cstools_core::{CliErrorDisplay, CsToolsConfig, CsToolsError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    handle_config_command, handle_tools_command, list_tools, ConfigCommand, ToolsCommand, TOOLS,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "cstools")]
#[command(version = VERSION)]
#[command(about = "CS Tools - administration tools for the ThoughtSpot platform")]
#[command(long_about = r#"
CS Tools is a collection of utilities for ThoughtSpot administrators. Each
tool talks to a ThoughtSpot cluster over its REST API.

Put the cluster address and credentials in cstools.toml (or set CSTOOLS_URL,
CSTOOLS_USERNAME and CSTOOLS_PASSWORD), then run 'cstools tools list'.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(long, global = true, help = "Show beta and private tools")]
    private: bool,

    #[arg(long, global = true, help = "Extra configuration file")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run one of the tools against a ThoughtSpot cluster")]
    Tools {
        #[command(subcommand)]
        action: ToolsCommand,
    },

    #[command(about = "Show the effective configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Build the command tree, hiding tools that are not visible at this privacy level.
fn build_cli(show_private: bool) -> clap::Command {
    Cli::command().mut_subcommand("tools", |tools| {
        TOOLS.iter().fold(tools, |tools, tool| {
            tools.mut_subcommand(tool.name, |cmd| {
                let mut after_help = format!("v{}", tool.version);
                if let Some(url) = tool.docs_url {
                    after_help.push_str(&format!("  docs: {}", url));
                }
                cmd.hide(!tool.privacy.is_visible(show_private))
                    .after_help(after_help)
            })
        })
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let show_private = std::env::args_os().any(|arg| arg == "--private");
    let matches = build_cli(show_private).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CsToolsError>() {
                Some(err) => eprintln!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(err)),
                None => eprintln!("{}: {:#}", "Error".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, config: &CsToolsConfig) {
    let default_level = if verbose { "debug" } else { config.log_level() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version { detailed } = cli.command {
        return cmd_version(detailed, cli.private);
    }

    let config = config::load_config(cli.config)?;
    init_logging(cli.verbose, &config);

    match cli.command {
        Commands::Tools { action } => handle_tools_command(action, &config, cli.private).await,
        Commands::Config { action } => handle_config_command(action, &config),
        Commands::Version { .. } => Ok(()),
    }
}

fn cmd_version(detailed: bool, show_private: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "CS Tools Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!(
            "  {:<15} https://github.com/thoughtspot/cs_tools",
            "Repository:".bold()
        );
        println!();
        println!("  {}", "Tools:".bold());
        for tool in list_tools(show_private) {
            println!("    {:<20} v{:<8} {}", tool.name, tool.version, tool.privacy);
        }
        println!();
        println!("  {}", "Build Information:".bold());
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("cstools {}", VERSION);
    }

    Ok(())
}
