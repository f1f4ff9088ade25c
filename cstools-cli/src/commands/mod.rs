pub mod config;
pub mod created_objects;
pub mod dependency_checker;
pub mod output;
pub mod searchable;
pub mod tools;
pub mod user_search;

pub use config::{handle_config_command, ConfigCommand};
pub use tools::{handle_tools_command, list_tools, ToolsCommand, TOOLS};
