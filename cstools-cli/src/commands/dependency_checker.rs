use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cstools_core::models::str_field;
use cstools_core::{CsToolsConfig, MetadataQuery, Record, ThoughtSpot};
use serde_json::Value;
use std::collections::HashMap;

use super::output::records_table;

#[derive(Subcommand)]
pub enum DependencyCheckerCommand {
    #[command(about = "List every object that depends on a worksheet, view or table")]
    List {
        #[arg(short, long = "tag", help = "Only check content with this tag (repeatable)")]
        tags: Vec<String>,

        #[arg(long, help = "Check dependents of each column instead of each table")]
        include_columns: bool,
    },
}

pub async fn handle_dependency_checker_command(
    action: DependencyCheckerCommand,
    config: &CsToolsConfig,
) -> Result<()> {
    match action {
        DependencyCheckerCommand::List {
            tags,
            include_columns,
        } => cmd_list(tags, include_columns, config).await,
    }
}

async fn cmd_list(tags: Vec<String>, include_columns: bool, config: &CsToolsConfig) -> Result<()> {
    let ts = ThoughtSpot::connect(config).await?;

    let query = MetadataQuery {
        tags,
        chunksize: config.fetch.page_size,
        ..Default::default()
    };
    let content = ts.metadata().all(&query).await?;

    let tables: Vec<&Record> = content
        .iter()
        .filter(|record| !str_field(record, "type").is_some_and(|t| t.ends_with("BOOK")))
        .collect();
    let ids: Vec<String> = tables
        .iter()
        .filter_map(|record| str_field(record, "id").map(str::to_string))
        .collect();
    let names: HashMap<&str, &str> = tables
        .iter()
        .filter_map(|record| Some((str_field(record, "id")?, str_field(record, "name")?)))
        .collect();

    let mut dependents = ts
        .metadata()
        .dependents(&ids, false, include_columns, config.fetch.dependents_chunksize)
        .await?;

    if dependents.is_empty() {
        println!("{}", "No dependent objects found.".yellow());
        return Ok(());
    }

    for record in &mut dependents {
        let parent = str_field(record, "parent_guid")
            .and_then(|guid| names.get(guid).copied())
            .map(Value::from)
            .unwrap_or(Value::Null);
        record.insert("parent_name".to_string(), parent);
    }

    println!("{}", "Dependent Objects".cyan().bold());
    println!();

    let table = records_table(
        &dependents,
        &[
            ("Parent", "parent_name"),
            ("Parent GUID", "parent_guid"),
            ("Dependent", "name"),
            ("Type", "type"),
            ("Author", "authorName"),
        ],
    );
    println!("{}", table);
    println!();
    println!("  Total: {} dependents", dependents.len());

    Ok(())
}
