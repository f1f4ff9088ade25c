mod rest_v1;
pub mod util;

pub use rest_v1::RestApiV1;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CsToolsResult;
use crate::models::{ListPage, MetadataCategory, MetadataSubtype, MetadataType, PermissionType};

/// Query for one page of `metadata/list`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataListParams {
    pub metadata_type: MetadataType,
    pub subtypes: Vec<MetadataSubtype>,
    pub category: Option<MetadataCategory>,
    pub tag_names: Vec<String>,
    pub pattern: Option<String>,
    pub fetch_ids: Vec<String>,
    pub batch_size: Option<usize>,
    pub offset: usize,
    pub show_hidden: bool,
    pub sort: Option<String>,
    pub sort_ascending: Option<bool>,
}

impl MetadataListParams {
    pub fn new(metadata_type: MetadataType) -> Self {
        Self {
            metadata_type,
            subtypes: Vec::new(),
            category: None,
            tag_names: Vec::new(),
            pattern: None,
            fetch_ids: Vec::new(),
            batch_size: None,
            offset: 0,
            show_hidden: false,
            sort: None,
            sort_ascending: None,
        }
    }

    pub fn subtypes(mut self, subtypes: &[MetadataSubtype]) -> Self {
        self.subtypes = subtypes.to_vec();
        self
    }

    pub fn category(mut self, category: MetadataCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags(mut self, tags: &[String]) -> Self {
        self.tag_names = tags.to_vec();
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn fetch_ids(mut self, ids: &[String]) -> Self {
        self.fetch_ids = ids.to_vec();
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn sorted_by(mut self, sort: impl Into<String>, ascending: bool) -> Self {
        self.sort = Some(sort.into());
        self.sort_ascending = Some(ascending);
        self
    }

    /// Flatten into query pairs, omitting anything unset.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("type", self.metadata_type.as_str().to_string()),
            ("offset", self.offset.to_string()),
            ("showhidden", self.show_hidden.to_string()),
        ];

        if let Some(subtypes) = util::stringified_array(self.subtypes.iter().map(|s| s.as_str())) {
            query.push(("subtypes", subtypes));
        }
        if let Some(category) = &self.category {
            query.push(("category", category.api_value().to_string()));
        }
        if let Some(size) = self.batch_size {
            query.push(("batchsize", size.to_string()));
        }
        if let Some(tags) = util::stringified_array(&self.tag_names) {
            query.push(("tagname", tags));
        }
        if let Some(pattern) = &self.pattern {
            query.push(("pattern", pattern.clone()));
        }
        if let Some(ids) = util::stringified_array(&self.fetch_ids) {
            query.push(("fetchids", ids));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        if let Some(ascending) = self.sort_ascending {
            query.push(("sortascending", ascending.to_string()));
        }

        query
    }
}

/// The subset of the platform's REST surface the middlewares depend on.
///
/// Every method performs exactly one request. Implementations must not retry.
#[async_trait]
pub trait ThoughtSpotApi: Send + Sync {
    async fn metadata_list(&self, params: &MetadataListParams) -> CsToolsResult<ListPage>;

    async fn metadata_details(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
        show_hidden: bool,
    ) -> CsToolsResult<Value>;

    async fn security_metadata_permissions(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
        permission_type: PermissionType,
    ) -> CsToolsResult<Value>;

    async fn dependency_list_dependents(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
    ) -> CsToolsResult<Value>;

    async fn search_data(&self, query: &str, data_source_guid: &str) -> CsToolsResult<Value>;
}
