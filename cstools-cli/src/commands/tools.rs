use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use cstools_core::CsToolsConfig;

use super::created_objects::{handle_created_objects_command, CreatedObjectsCommand};
use super::dependency_checker::{handle_dependency_checker_command, DependencyCheckerCommand};
use super::searchable::{handle_searchable_command, SearchableCommand};
use super::user_search::{handle_user_search_command, UserSearchCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privacy {
    /// Released, uses public APIs only.
    Public,
    /// Unreleased.
    Beta,
    /// Released, but relies on internal APIs.
    Private,
    /// Template for writing new tools.
    #[allow(dead_code)]
    Example,
}

impl Privacy {
    pub fn is_visible(&self, show_private: bool) -> bool {
        matches!(self, Privacy::Public) || show_private
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Privacy::Public => write!(f, "public"),
            Privacy::Beta => write!(f, "beta"),
            Privacy::Private => write!(f, "private"),
            Privacy::Example => write!(f, "example"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub privacy: Privacy,
    pub version: &'static str,
    pub about: &'static str,
    pub docs_url: Option<&'static str>,
}

const DOCS_BASE: &str = "https://thoughtspot.github.io/cs_tools/cs-tools";

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "created-objects",
        privacy: Privacy::Public,
        version: "1.1.0",
        about: "List liveboards, answers and worksheets with their authors",
        docs_url: Some(DOCS_BASE),
    },
    ToolDescriptor {
        name: "searchable",
        privacy: Privacy::Public,
        version: "1.3.0",
        about: "Gather platform metadata into JSON files for offline analysis",
        docs_url: Some(DOCS_BASE),
    },
    ToolDescriptor {
        name: "dependency-checker",
        privacy: Privacy::Private,
        version: "1.0.0",
        about: "Find content built on top of worksheets and tables",
        docs_url: None,
    },
    ToolDescriptor {
        name: "user-search",
        privacy: Privacy::Beta,
        version: "0.1.0",
        about: "Look up users by GUID, username or display name",
        docs_url: None,
    },
];

pub fn list_tools(show_private: bool) -> impl Iterator<Item = &'static ToolDescriptor> {
    TOOLS
        .iter()
        .filter(move |tool| tool.privacy.is_visible(show_private))
}

#[derive(Subcommand)]
pub enum ToolsCommand {
    #[command(about = "List the available tools")]
    List,

    #[command(about = "List liveboards, answers and worksheets with their authors")]
    CreatedObjects {
        #[command(subcommand)]
        action: CreatedObjectsCommand,
    },

    #[command(about = "Gather platform metadata into JSON files for offline analysis")]
    Searchable {
        #[command(subcommand)]
        action: SearchableCommand,
    },

    #[command(about = "Find content built on top of worksheets and tables")]
    DependencyChecker {
        #[command(subcommand)]
        action: DependencyCheckerCommand,
    },

    #[command(about = "Look up users by GUID, username or display name")]
    UserSearch {
        #[command(subcommand)]
        action: UserSearchCommand,
    },
}

pub async fn handle_tools_command(
    action: ToolsCommand,
    config: &CsToolsConfig,
    show_private: bool,
) -> Result<()> {
    match action {
        ToolsCommand::List => cmd_tools_list(show_private),
        ToolsCommand::CreatedObjects { action } => {
            handle_created_objects_command(action, config).await
        }
        ToolsCommand::Searchable { action } => handle_searchable_command(action, config).await,
        ToolsCommand::DependencyChecker { action } => {
            handle_dependency_checker_command(action, config).await
        }
        ToolsCommand::UserSearch { action } => handle_user_search_command(action, config).await,
    }
}

fn cmd_tools_list(show_private: bool) -> Result<()> {
    println!("{}", "Available Tools".cyan().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Tool").fg(Color::Cyan),
            Cell::new("Privacy").fg(Color::Cyan),
            Cell::new("Version").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
        ]);

    let mut count = 0;
    for tool in list_tools(show_private) {
        let privacy = match tool.privacy {
            Privacy::Public => Cell::new(tool.privacy).fg(Color::Green),
            Privacy::Beta => Cell::new(tool.privacy).fg(Color::Yellow),
            Privacy::Private | Privacy::Example => Cell::new(tool.privacy).fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(tool.name),
            privacy,
            Cell::new(format!("v{}", tool.version)),
            Cell::new(tool.about),
        ]);
        count += 1;
    }

    println!("{}", table);
    println!();
    println!("  Total: {} tools", count);

    if !show_private {
        println!(
            "  Pass {} to include beta and private tools.",
            "--private".cyan()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_tools_only_by_default() {
        let names: Vec<_> = list_tools(false).map(|t| t.name).collect();
        assert_eq!(names, vec!["created-objects", "searchable"]);
    }

    #[test]
    fn test_private_flag_shows_everything() {
        assert_eq!(list_tools(true).count(), TOOLS.len());
    }

    #[test]
    fn test_beta_tool_hidden_by_default() {
        let tool = TOOLS.iter().find(|t| t.name == "user-search").unwrap();
        assert_eq!(tool.privacy, Privacy::Beta);
        assert!(!tool.privacy.is_visible(false));
        assert!(tool.privacy.is_visible(true));
    }

    #[test]
    fn test_tool_names_unique() {
        for (i, tool) in TOOLS.iter().enumerate() {
            assert!(TOOLS[i + 1..].iter().all(|other| other.name != tool.name));
        }
    }
}
