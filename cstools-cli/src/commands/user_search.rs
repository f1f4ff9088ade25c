use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cstools_core::{CsToolsConfig, ThoughtSpot};

use super::output::{print_json, records_table, OutputFormat};

#[derive(Subcommand)]
pub enum UserSearchCommand {
    #[command(about = "Find a user by GUID, username or display name")]
    Find {
        #[arg(help = "User GUID, username or display name")]
        principal: String,

        #[arg(long, help = "List every match instead of failing when several users match")]
        allow_many: bool,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: OutputFormat,
    },
}

pub async fn handle_user_search_command(
    action: UserSearchCommand,
    config: &CsToolsConfig,
) -> Result<()> {
    match action {
        UserSearchCommand::Find {
            principal,
            allow_many,
            format,
        } => {
            let ts = ThoughtSpot::connect(config).await?;
            let users = ts.user().get(&principal, !allow_many).await?;

            if format == OutputFormat::Json {
                return print_json(&users);
            }

            println!("{}", "Users".cyan().bold());
            println!();
            println!(
                "{}",
                records_table(
                    &users,
                    &[("GUID", "id"), ("Username", "name"), ("Display Name", "displayName")],
                )
            );
            Ok(())
        }
    }
}
