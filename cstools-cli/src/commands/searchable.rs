use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use cstools_core::middlewares::map_subtype_to_type;
use cstools_core::models::str_field;
use cstools_core::ux::{fit_to_terminal, table_layout};
use cstools_core::{
    CsToolsConfig, MetadataQuery, MetadataType, PermissionType, Record,
    RestApiV1, SharingAccess, TaskBoard, ThoughtSpot,
};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::info;

use super::output::write_json;

const TASKS: [(&str, &str); 8] = [
    ("gather_metadata", "Collecting Metadata"),
    ("dump_metadata", "Writing Metadata"),
    ("gather_columns", "Collecting Metadata Columns"),
    ("dump_columns", "Writing Metadata Columns"),
    ("gather_dependents", "Collecting Dependencies"),
    ("dump_dependents", "Writing Metadata Dependents"),
    ("gather_access_controls", "Collecting Sharing Access Controls"),
    ("dump_access_controls", "Writing Sharing Access Controls"),
];

#[derive(Subcommand)]
pub enum SearchableCommand {
    #[command(about = "Gather metadata, columns, dependents and sharing into JSON files")]
    Gather {
        #[arg(short, long, help = "Directory to write the JSON files to")]
        directory: PathBuf,

        #[arg(long, help = "Do not collect sharing access controls")]
        skip_permissions: bool,

        #[arg(long, help = "Do not collect dependent objects")]
        skip_dependents: bool,
    },
}

pub async fn handle_searchable_command(
    action: SearchableCommand,
    config: &CsToolsConfig,
) -> Result<()> {
    match action {
        SearchableCommand::Gather {
            directory,
            skip_permissions,
            skip_dependents,
        } => cmd_gather(&directory, skip_permissions, skip_dependents, config).await,
    }
}

async fn cmd_gather(
    directory: &Path,
    skip_permissions: bool,
    skip_dependents: bool,
    config: &CsToolsConfig,
) -> Result<()> {
    let ts = ThoughtSpot::connect(config).await?;
    let fetch = &config.fetch;

    let live = config.display.live && std::io::stdout().is_terminal();
    let width = if live {
        fit_to_terminal(config.display.table_width)
    } else {
        config.display.table_width
    };
    let board = TaskBoard::new(TASKS)?
        .with_layout(table_layout(width))
        .live(live);

    board.refresh()?;

    let query = MetadataQuery {
        exclude_system_content: false,
        chunksize: fetch.page_size,
        ..Default::default()
    };
    let content = board
        .run_async("gather_metadata", ts.metadata().all(&query))
        .await?;
    board.run("dump_metadata", || {
        write_json(directory, "ts_metadata_object", &content)
    })?;

    let table_ids: Vec<String> = content
        .iter()
        .filter(|record| !str_field(record, "type").is_some_and(|t| t.ends_with("BOOK")))
        .filter_map(|record| str_field(record, "id").map(str::to_string))
        .collect();

    let columns = board
        .run_async(
            "gather_columns",
            ts.metadata()
                .columns(&table_ids, true, fetch.columns_chunksize),
        )
        .await?;
    board.run("dump_columns", || {
        write_json(directory, "ts_metadata_column", &columns)
    })?;

    if skip_dependents {
        board.skip("gather_dependents")?;
        board.skip("dump_dependents")?;
    } else {
        let column_ids: Vec<String> = columns.iter().filter_map(column_id).collect();
        let dependents = board
            .run_async(
                "gather_dependents",
                ts.metadata()
                    .dependents(&column_ids, true, false, fetch.dependents_chunksize),
            )
            .await?;
        board.run("dump_dependents", || {
            write_json(directory, "ts_dependent_object", &dependents)
        })?;
    }

    if skip_permissions {
        board.skip("gather_access_controls")?;
        board.skip("dump_access_controls")?;
    } else {
        let sharing = board
            .run_async(
                "gather_access_controls",
                gather_access_controls(&ts, &content, fetch.permissions_chunksize),
            )
            .await?;
        board.run("dump_access_controls", || {
            write_json(directory, "ts_sharing_access", &sharing)
        })?;
    }

    info!("Gathered {} objects into {}", content.len(), directory.display());
    println!();
    println!(
        "{} Wrote files to {}",
        "✓".green().bold(),
        directory.display().to_string().cyan()
    );

    Ok(())
}

fn column_id(column: &Record) -> Option<String> {
    column
        .get("header")
        .and_then(|h| h.get("id"))
        .and_then(|id| id.as_str())
        .map(str::to_string)
}

/// Permissions are requested per object type, so group the content first.
async fn gather_access_controls(
    ts: &ThoughtSpot<RestApiV1>,
    content: &[Record],
    chunksize: usize,
) -> cstools_core::CsToolsResult<Vec<SharingAccess>> {
    let mut by_type: BTreeMap<&'static str, (MetadataType, Vec<String>)> = BTreeMap::new();

    for record in content {
        let (Some(id), Some(raw_type)) = (str_field(record, "id"), str_field(record, "type")) else {
            continue;
        };
        let mapped = map_subtype_to_type(raw_type);
        let Some(metadata_type) = MetadataType::parse(&mapped) else {
            continue;
        };

        by_type
            .entry(metadata_type.as_str())
            .or_insert_with(|| (metadata_type, Vec::new()))
            .1
            .push(id.to_string());
    }

    let mut sharing = Vec::new();
    for (metadata_type, ids) in by_type.into_values() {
        let grants = ts
            .metadata()
            .permissions(&ids, metadata_type, PermissionType::Explicit, chunksize)
            .await?;
        sharing.extend(grants);
    }

    Ok(sharing)
}
