use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cstools_core::{CsToolsConfig, MetadataCategory, MetadataQuery, ThoughtSpot};

use super::output::{print_json, records_table, OutputFormat};

#[derive(Subcommand)]
pub enum CreatedObjectsCommand {
    #[command(about = "List every liveboard, answer and worksheet")]
    List {
        #[arg(short, long = "tag", help = "Only content with this tag (repeatable)")]
        tags: Vec<String>,

        #[arg(
            short,
            long,
            default_value = "all",
            help = "Content category (all, yours, favorites)"
        )]
        category: MetadataCategory,

        #[arg(long, help = "Include content authored by system accounts")]
        include_system: bool,

        #[arg(long, help = "Also list every column")]
        include_columns: bool,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: OutputFormat,
    },
}

pub async fn handle_created_objects_command(
    action: CreatedObjectsCommand,
    config: &CsToolsConfig,
) -> Result<()> {
    match action {
        CreatedObjectsCommand::List {
            tags,
            category,
            include_system,
            include_columns,
            format,
        } => {
            let query = MetadataQuery {
                category,
                tags,
                exclude_system_content: !include_system,
                include_columns,
                chunksize: config.fetch.page_size,
            };
            cmd_list(&query, format, config).await
        }
    }
}

async fn cmd_list(query: &MetadataQuery, format: OutputFormat, config: &CsToolsConfig) -> Result<()> {
    let ts = ThoughtSpot::connect(config).await?;
    let content = ts.metadata().all(query).await?;

    if format == OutputFormat::Json {
        return print_json(&content);
    }

    println!("{}", "Created Objects".cyan().bold());
    println!(
        "Category: {}{}",
        query.category.to_string().yellow(),
        if query.tags.is_empty() {
            String::new()
        } else {
            format!("  Tags: {}", query.tags.join(", ").yellow())
        }
    );
    println!();

    let table = records_table(
        &content,
        &[
            ("Name", "name"),
            ("Type", "type"),
            ("Author", "authorName"),
            ("Context", "context"),
        ],
    );
    println!("{}", table);
    println!();
    println!("  Total: {} objects", content.len());

    Ok(())
}
