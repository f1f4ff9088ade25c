use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::api::util::is_valid_guid;
use crate::api::{MetadataListParams, ThoughtSpotApi};
use crate::error::{CsToolsError, CsToolsResult};
use crate::models::{str_field, MetadataSubtype, MetadataType, Record};

/// The data source a search runs against; set exactly one field, by name or GUID.
#[derive(Debug, Clone, Default)]
pub struct DataSourceSelector {
    pub worksheet: Option<String>,
    pub table: Option<String>,
    pub view: Option<String>,
}

impl DataSourceSelector {
    pub fn worksheet(name: impl Into<String>) -> Self {
        Self {
            worksheet: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self {
            view: Some(name.into()),
            ..Default::default()
        }
    }

    /// The selected identifier with its display name and listing subtype.
    fn resolve(&self) -> CsToolsResult<(&str, &'static str, MetadataSubtype)> {
        let selected: Vec<(&str, &'static str, MetadataSubtype)> = [
            (&self.worksheet, "worksheet", MetadataSubtype::Worksheet),
            (&self.table, "system table", MetadataSubtype::OneToOneLogical),
            (&self.view, "view", MetadataSubtype::AggrWorksheet),
        ]
        .into_iter()
        .filter_map(|(value, friendly, subtype)| {
            value.as_deref().map(|v| (v, friendly, subtype))
        })
        .collect();

        match selected.as_slice() {
            [one] => Ok(*one),
            [] => Err(CsToolsError::invalid_argument(
                "search needs one of: worksheet, table, view",
            )),
            _ => Err(CsToolsError::invalid_argument(
                "worksheet, table and view are mutually exclusive",
            )),
        }
    }
}

pub struct SearchMiddleware<'a, A: ThoughtSpotApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ThoughtSpotApi + ?Sized> SearchMiddleware<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Run a search query and return one record per result row.
    pub async fn search(&self, query: &str, source: &DataSourceSelector) -> CsToolsResult<Vec<Record>> {
        let (identifier, friendly, subtype) = source.resolve()?;

        let guid = if is_valid_guid(identifier) {
            identifier.to_string()
        } else {
            self.find_guid(identifier, friendly, subtype).await?
        };

        debug!(data_source = %guid, query, "Executing search");
        let response = self.api.search_data(query, &guid).await?;

        to_records(&response)
    }

    async fn find_guid(
        &self,
        name: &str,
        friendly: &'static str,
        subtype: MetadataSubtype,
    ) -> CsToolsResult<String> {
        let params = MetadataListParams::new(MetadataType::LogicalTable)
            .subtypes(&[subtype])
            .pattern(name)
            .sorted_by("CREATED", true);

        let headers = self.api.metadata_list(&params).await?.headers;
        let wanted = name.to_lowercase();

        let matches: Vec<&Record> = headers
            .iter()
            .filter(|h| str_field(h, "name").is_some_and(|n| n.to_lowercase() == wanted))
            .collect();

        match matches.as_slice() {
            [] => Err(CsToolsError::content_not_found(
                friendly,
                format!("No {} found with the name {}", friendly, name),
            )),
            [one] => str_field(one, "id").map(str::to_string).ok_or_else(|| {
                CsToolsError::ApiParseError(format!("{} '{}' has no id", friendly, name))
            }),
            _ => Err(CsToolsError::ambiguous(friendly, name)),
        }
    }
}

fn to_records(response: &Value) -> CsToolsResult<Vec<Record>> {
    let columns: Vec<&str> = response
        .get("columnNames")
        .and_then(Value::as_array)
        .ok_or_else(|| CsToolsError::ApiParseError("search response has no 'columnNames'".to_string()))?
        .iter()
        .filter_map(Value::as_str)
        .collect();

    let rows = response
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| CsToolsError::ApiParseError("search response has no 'data'".to_string()))?;

    let records = rows
        .iter()
        .filter_map(Value::as_array)
        .map(|row| {
            columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.to_string(), unwrap_cell(value)))
                .collect::<Map<String, Value>>()
        })
        .collect();

    Ok(records)
}

/// Date-time cells arrive as `{"v": {"s": <epoch>}}`.
fn unwrap_cell(value: &Value) -> Value {
    let Some(inner) = value.as_object().and_then(|o| o.get("v")) else {
        return value.clone();
    };

    match inner.get("s") {
        Some(seconds) => seconds.clone(),
        None => {
            warn!("Unexpected value in search-data response: {}", value);
            value.clone()
        }
    }
}
