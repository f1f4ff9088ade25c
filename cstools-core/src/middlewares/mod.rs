//! Higher-level operations built from one or more REST calls.
//!
//! Every middleware borrows a [`ThoughtSpotApi`] and issues its requests
//! strictly one after another, so results are always appended in request
//! order.

mod metadata;
mod search;
mod user;

pub use metadata::{map_subtype_to_type, MetadataMiddleware, MetadataQuery};
pub use search::{DataSourceSelector, SearchMiddleware};
pub use user::UserMiddleware;

use std::slice::Chunks;
use tracing::{debug, warn};

use crate::api::{MetadataListParams, ThoughtSpotApi};
use crate::error::{CsToolsError, CsToolsResult};
use crate::models::{ListPage, Record};

/// Split `ids` into request-sized chunks, rejecting a zero chunk size.
pub(crate) fn chunked(ids: &[String], chunksize: usize) -> CsToolsResult<Chunks<'_, String>> {
    if chunksize == 0 {
        return Err(CsToolsError::invalid_argument(
            "chunksize must be greater than 0",
        ));
    }
    Ok(ids.chunks(chunksize))
}

/// True when the listing loop should stop after `page`.
///
/// An empty page that still claims more batches would otherwise loop forever
/// on the same offset.
pub(crate) fn is_final_page(page: &ListPage, params: &MetadataListParams) -> bool {
    if page.is_last_batch {
        return true;
    }
    if page.is_empty() {
        warn!(
            metadata_type = %params.metadata_type,
            offset = params.offset,
            "Empty page without isLastBatch, stopping"
        );
        return true;
    }
    false
}

/// Fetch every page for `params`, starting at its offset.
pub(crate) async fn collect_pages<A>(api: &A, mut params: MetadataListParams) -> CsToolsResult<Vec<Record>>
where
    A: ThoughtSpotApi + ?Sized,
{
    let mut records = Vec::new();

    loop {
        let page = api.metadata_list(&params).await?;
        debug!(
            metadata_type = %params.metadata_type,
            offset = params.offset,
            count = page.len(),
            "Fetched page"
        );

        let done = is_final_page(&page, &params);
        params.offset = page.next_offset(params.offset);
        records.extend(page.headers);

        if done {
            break;
        }
    }

    Ok(records)
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory [`ThoughtSpotApi`] that answers from closures and records calls.

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    use crate::api::{MetadataListParams, ThoughtSpotApi};
    use crate::error::CsToolsResult;
    use crate::models::{ListPage, MetadataType, PermissionType};

    type ListFn = Box<dyn Fn(&MetadataListParams) -> CsToolsResult<ListPage> + Send + Sync>;
    type IdsFn = Box<dyn Fn(MetadataType, &[String]) -> CsToolsResult<Value> + Send + Sync>;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        List(MetadataListParams),
        Details(Vec<String>),
        Permissions(MetadataType, Vec<String>),
        Dependents(MetadataType, Vec<String>),
        Search(String, String),
    }

    pub struct MockApi {
        list: ListFn,
        details: IdsFn,
        permissions: IdsFn,
        dependents: IdsFn,
        search: Box<dyn Fn(&str, &str) -> CsToolsResult<Value> + Send + Sync>,
        calls: Mutex<Vec<Call>>,
    }

    impl Default for MockApi {
        fn default() -> Self {
            Self {
                list: Box::new(|_| Ok(ListPage::new(Vec::new(), true))),
                details: Box::new(|_, _| Ok(json!({ "storables": [] }))),
                permissions: Box::new(|_, _| Ok(json!({}))),
                dependents: Box::new(|_, _| Ok(json!({}))),
                search: Box::new(|_, _| Ok(json!({ "columnNames": [], "data": [] }))),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl MockApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on_list(
            mut self,
            f: impl Fn(&MetadataListParams) -> CsToolsResult<ListPage> + Send + Sync + 'static,
        ) -> Self {
            self.list = Box::new(f);
            self
        }

        pub fn on_details(
            mut self,
            f: impl Fn(MetadataType, &[String]) -> CsToolsResult<Value> + Send + Sync + 'static,
        ) -> Self {
            self.details = Box::new(f);
            self
        }

        pub fn on_permissions(
            mut self,
            f: impl Fn(MetadataType, &[String]) -> CsToolsResult<Value> + Send + Sync + 'static,
        ) -> Self {
            self.permissions = Box::new(f);
            self
        }

        pub fn on_dependents(
            mut self,
            f: impl Fn(MetadataType, &[String]) -> CsToolsResult<Value> + Send + Sync + 'static,
        ) -> Self {
            self.dependents = Box::new(f);
            self
        }

        pub fn on_search(
            mut self,
            f: impl Fn(&str, &str) -> CsToolsResult<Value> + Send + Sync + 'static,
        ) -> Self {
            self.search = Box::new(f);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ThoughtSpotApi for MockApi {
        async fn metadata_list(&self, params: &MetadataListParams) -> CsToolsResult<ListPage> {
            self.record(Call::List(params.clone()));
            (self.list)(params)
        }

        async fn metadata_details(
            &self,
            metadata_type: MetadataType,
            ids: &[String],
            _show_hidden: bool,
        ) -> CsToolsResult<Value> {
            self.record(Call::Details(ids.to_vec()));
            (self.details)(metadata_type, ids)
        }

        async fn security_metadata_permissions(
            &self,
            metadata_type: MetadataType,
            ids: &[String],
            _permission_type: PermissionType,
        ) -> CsToolsResult<Value> {
            self.record(Call::Permissions(metadata_type, ids.to_vec()));
            (self.permissions)(metadata_type, ids)
        }

        async fn dependency_list_dependents(
            &self,
            metadata_type: MetadataType,
            ids: &[String],
        ) -> CsToolsResult<Value> {
            self.record(Call::Dependents(metadata_type, ids.to_vec()));
            (self.dependents)(metadata_type, ids)
        }

        async fn search_data(&self, query: &str, data_source_guid: &str) -> CsToolsResult<Value> {
            self.record(Call::Search(query.to_string(), data_source_guid.to_string()));
            (self.search)(query, data_source_guid)
        }
    }

    /// Build a header record from a JSON object literal.
    pub fn header(value: Value) -> crate::models::Record {
        value.as_object().cloned().unwrap_or_default()
    }
}
