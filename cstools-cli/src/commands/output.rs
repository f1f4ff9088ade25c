use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use cstools_core::Record;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}', expected text or json", other)),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Render a plain cell for a JSON value; strings lose their quotes and null is blank.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A table of `records`, one column per `(header, key)` pair.
pub fn records_table(records: &[Record], columns: &[(&str, &str)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|(header, _)| Cell::new(header).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );

    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|(_, key)| Cell::new(cell_text(record.get(*key))))
                .collect::<Vec<_>>(),
        );
    }

    table
}

/// Write `data` as pretty JSON to `<directory>/<name>.json`.
pub fn write_json<T: Serialize + ?Sized>(directory: &Path, name: &str, data: &T) -> Result<PathBuf> {
    if directory.exists() && !directory.is_dir() {
        bail!("{} is not a directory", directory.display());
    }
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create {}", directory.display()))?;

    let path = directory.join(format!("{}.json", name));
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(Some(&json!("Sales"))), "Sales");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&json!(3))), "3");
    }

    #[test]
    fn test_records_table() {
        let record = json!({"name": "Sales", "type": "LOGICAL_TABLE"})
            .as_object()
            .cloned()
            .unwrap();
        let rendered = records_table(&[record], &[("Name", "name"), ("Type", "type")]).to_string();

        assert!(rendered.contains("Sales"));
        assert!(rendered.contains("LOGICAL_TABLE"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");

        let path = write_json(&target, "ts_metadata_object", &json!([{"id": "a"}])).unwrap();

        assert_eq!(path, target.join("ts_metadata_object.json"));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, json!([{"id": "a"}]));
    }
}
