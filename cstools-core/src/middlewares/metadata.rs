use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, info};

use super::{chunked, collect_pages, is_final_page, UserMiddleware};
use crate::api::{MetadataListParams, ThoughtSpotApi};
use crate::error::{CsToolsError, CsToolsResult};
use crate::models::{
    str_field, GuidTracker, MetadataCategory, MetadataSubtype, MetadataType, ObjectKind,
    PermissionEntry, PermissionType, Record, SharingAccess,
};

const SYSTEM_AUTHORS: [&str; 2] = ["system", "tsadmin"];
const EDOC_BATCH_SIZE: usize = 500;

/// Filters for [`MetadataMiddleware::all`].
#[derive(Debug, Clone)]
pub struct MetadataQuery {
    pub category: MetadataCategory,
    pub tags: Vec<String>,
    pub exclude_system_content: bool,
    pub include_columns: bool,
    pub chunksize: usize,
}

impl Default for MetadataQuery {
    fn default() -> Self {
        Self {
            category: MetadataCategory::All,
            tags: Vec::new(),
            exclude_system_content: true,
            include_columns: false,
            chunksize: 500,
        }
    }
}

impl MetadataQuery {
    /// Describe the filters for a "nothing found" message.
    fn describe(&self) -> String {
        let mut reason = format!(
            "'{}' category ({} admin-generated content)",
            self.category,
            if self.exclude_system_content {
                "excluding"
            } else {
                "including"
            }
        );

        if !self.tags.is_empty() {
            reason.push_str(" and tags: ");
            reason.push_str(&self.tags.join(", "));
        }

        reason
    }
}

pub struct MetadataMiddleware<'a, A: ThoughtSpotApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ThoughtSpotApi + ?Sized> MetadataMiddleware<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Every liveboard, answer and logical table visible under `query`,
    /// optionally followed by every logical column.
    ///
    /// Each record gains a `type` and a `context` field. `context` is the name
    /// of the column's owning table when that table was listed earlier in the
    /// same run, and `null` otherwise. Fields the server already sent win over
    /// the injected ones.
    pub async fn all(&self, query: &MetadataQuery) -> CsToolsResult<Vec<Record>> {
        let mut types = vec![
            MetadataType::PinboardAnswerBook,
            MetadataType::QuestionAnswerBook,
            MetadataType::LogicalTable,
        ];
        if query.include_columns {
            types.push(MetadataType::LogicalColumn);
        }

        let mut tracker = GuidTracker::new();
        let mut content = Vec::new();

        for metadata_type in types {
            let mut params = MetadataListParams::new(metadata_type)
                .category(query.category)
                .tags(&query.tags)
                .batch_size(query.chunksize);

            loop {
                let page = self.api.metadata_list(&params).await?;
                let done = is_final_page(&page, &params);
                params.offset = page.next_offset(params.offset);

                let fetched = page.len();
                let mut kept = 0;

                for header in page.headers {
                    let record = enrich(header, metadata_type, &mut tracker);

                    if query.exclude_system_content && is_system_authored(&record) {
                        continue;
                    }
                    kept += 1;
                    content.push(record);
                }

                debug!(
                    metadata_type = %metadata_type,
                    fetched,
                    kept,
                    next_offset = params.offset,
                    "Aggregated page"
                );

                if done {
                    break;
                }
            }
        }

        if content.is_empty() {
            return Err(CsToolsError::content_not_found("metadata", query.describe()));
        }

        info!("Found {} metadata objects", content.len());
        Ok(content)
    }

    /// Column records of the given logical tables.
    pub async fn columns(
        &self,
        ids: &[String],
        include_hidden: bool,
        chunksize: usize,
    ) -> CsToolsResult<Vec<Record>> {
        let mut columns = Vec::new();

        for chunk in chunked(ids, chunksize)? {
            let details = self
                .api
                .metadata_details(MetadataType::LogicalTable, chunk, include_hidden)
                .await?;

            let storables = match details.get("storables") {
                Some(Value::Array(items)) => items.clone(),
                Some(item @ Value::Object(_)) => vec![item.clone()],
                _ => {
                    return Err(CsToolsError::ApiParseError(
                        "metadata details response has no 'storables'".to_string(),
                    ))
                }
            };

            for storable in storables {
                if let Some(Value::Array(items)) = storable.get("columns") {
                    columns.extend(items.iter().filter_map(|c| c.as_object().cloned()));
                }
            }
        }

        Ok(columns)
    }

    /// Permission grants on `ids`, with each principal classified as a user or a group.
    pub async fn permissions(
        &self,
        ids: &[String],
        object_type: impl Into<ObjectKind>,
        permission_type: PermissionType,
        chunksize: usize,
    ) -> CsToolsResult<Vec<SharingAccess>> {
        let metadata_type = object_type.into().object_type();
        let chunks = chunked(ids, chunksize)?;

        let users: HashSet<String> = UserMiddleware::new(self.api)
            .all()
            .await?
            .iter()
            .filter_map(|user| str_field(user, "id").map(str::to_string))
            .collect();

        let mut sharing = Vec::new();

        for chunk in chunks {
            let response = self
                .api
                .security_metadata_permissions(metadata_type, chunk, permission_type)
                .await?;

            for object in as_object(&response, "permissions response")?.values() {
                let Some(grants) = object.get("permissions").and_then(Value::as_object) else {
                    continue;
                };

                for (principal, grant) in grants {
                    let entry: PermissionEntry = serde_json::from_value(grant.clone())
                        .map_err(|e| CsToolsError::ApiParseError(e.to_string()))?;
                    let is_user = users.contains(principal);

                    sharing.push(SharingAccess {
                        object_guid: entry.top_level_object_id,
                        permission_type: permission_type.api_value().to_string(),
                        share_mode: entry.share_mode,
                        shared_to_user_guid: is_user.then(|| principal.clone()),
                        shared_to_group_guid: (!is_user).then(|| principal.clone()),
                    });
                }
            }
        }

        Ok(sharing)
    }

    /// Objects built on top of `ids`.
    ///
    /// With `include_columns` the ids are first swapped for the ids of their
    /// columns; `for_columns` says the ids already are columns.
    pub async fn dependents(
        &self,
        ids: &[String],
        for_columns: bool,
        include_columns: bool,
        chunksize: usize,
    ) -> CsToolsResult<Vec<Record>> {
        let (ids, metadata_type) = if include_columns {
            let column_ids: Vec<String> = self
                .columns(ids, false, chunksize)
                .await?
                .iter()
                .filter_map(|column| {
                    column
                        .get("header")
                        .and_then(|h| h.get("id"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect();
            (column_ids, MetadataType::LogicalColumn)
        } else if for_columns {
            (ids.to_vec(), MetadataType::LogicalColumn)
        } else {
            (ids.to_vec(), MetadataType::LogicalTable)
        };

        let mut dependents = Vec::new();

        for chunk in chunked(&ids, chunksize)? {
            let response = self
                .api
                .dependency_list_dependents(metadata_type, chunk)
                .await?;

            for (parent_guid, by_type) in as_object(&response, "dependents response")? {
                let Some(by_type) = by_type.as_object() else {
                    continue;
                };

                for (dependency_type, headers) in by_type {
                    let Some(headers) = headers.as_array() else {
                        continue;
                    };

                    for header in headers.iter().filter_map(Value::as_object) {
                        let mut record = Map::new();
                        record.insert("parent_guid".to_string(), Value::from(parent_guid.as_str()));
                        record.insert("type".to_string(), Value::from(dependency_type.as_str()));
                        record.extend(header.clone());
                        dependents.push(record);
                    }
                }
            }
        }

        Ok(dependents)
    }

    /// Map each of `ids` to the type export calls need, as `{id, type}` records.
    pub async fn get_edoc_object_list(&self, ids: &[String]) -> CsToolsResult<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut mapped = Vec::new();

        for metadata_type in MetadataType::DOWNLOADABLE {
            let params = MetadataListParams::new(metadata_type)
                .batch_size(EDOC_BATCH_SIZE)
                .fetch_ids(ids);

            for header in collect_pages(self.api, params).await? {
                let Some(id) = str_field(&header, "id") else {
                    continue;
                };

                let object_type = if metadata_type == MetadataType::LogicalTable {
                    str_field(&header, "type")
                        .map(map_subtype_to_type)
                        .unwrap_or_else(|| metadata_type.as_str().to_string())
                } else {
                    metadata_type.as_str().to_string()
                };

                let mut record = Map::new();
                record.insert("id".to_string(), Value::from(id));
                record.insert("type".to_string(), Value::from(object_type));
                mapped.push(record);
            }
        }

        Ok(mapped)
    }

    /// Ids of downloadable content carrying any of `tags`, first-seen order.
    pub async fn get_object_ids_with_tags(&self, tags: &[String]) -> CsToolsResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for metadata_type in MetadataType::DOWNLOADABLE {
            let params = MetadataListParams::new(metadata_type)
                .batch_size(EDOC_BATCH_SIZE)
                .tags(tags);

            for header in collect_pages(self.api, params).await? {
                if let Some(id) = str_field(&header, "id") {
                    if seen.insert(id.to_string()) {
                        ids.push(id.to_string());
                    }
                }
            }
        }

        Ok(ids)
    }
}

/// Logical table subtypes collapse to `LOGICAL_TABLE`; anything else is returned as given.
pub fn map_subtype_to_type(subtype: &str) -> String {
    match MetadataSubtype::parse(subtype) {
        Some(_) => MetadataType::LogicalTable.as_str().to_string(),
        None => subtype.to_string(),
    }
}

fn enrich(header: Record, metadata_type: MetadataType, tracker: &mut GuidTracker) -> Record {
    tracker.track(&header);

    let context = if metadata_type == MetadataType::LogicalColumn {
        str_field(&header, "owner")
            .and_then(|owner| tracker.name_of(owner))
            .map(Value::from)
            .unwrap_or(Value::Null)
    } else {
        Value::Null
    };

    let mut record = Map::new();
    record.insert("type".to_string(), Value::from(metadata_type.as_str()));
    record.insert("context".to_string(), context);
    record.extend(header);
    record
}

fn is_system_authored(record: &Record) -> bool {
    str_field(record, "authorName").is_some_and(|author| SYSTEM_AUTHORS.contains(&author))
}

fn as_object<'v>(value: &'v Value, what: &str) -> CsToolsResult<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CsToolsError::ApiParseError(format!("{} is not an object", what)))
}
