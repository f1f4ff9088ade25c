use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{MetadataListParams, ThoughtSpotApi};
use crate::config::ThoughtSpotConfig;
use crate::error::{CsToolsError, CsToolsResult};
use crate::models::{ListPage, MetadataType, PermissionType};

const API_PREFIX: &str = "callosum/v1/tspublic/v1";
const REQUESTED_BY: &str = "ThoughtSpot";

/// Client for the platform's v1 REST surface.
///
/// Session cookies from [`RestApiV1::session_login`] are kept in the client's
/// cookie store and replayed on every later call.
pub struct RestApiV1 {
    client: Client,
    base_url: String,
}

impl RestApiV1 {
    pub fn new(base_url: &str, timeout: Duration, disable_ssl: bool) -> CsToolsResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(disable_ssl)
            .timeout(timeout)
            .user_agent(concat!("cstools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CsToolsError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ThoughtSpotConfig) -> CsToolsResult<Self> {
        if config.url.is_empty() {
            return Err(CsToolsError::MissingConfig("thoughtspot.url".to_string()));
        }
        Self::new(
            &config.url,
            Duration::from_secs(config.timeout_secs),
            config.disable_ssl,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header("X-Requested-By", REQUESTED_BY)
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> CsToolsResult<T> {
        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| CsToolsError::ApiParseError(e.to_string()))
    }

    /// Establish a session; the server answers with a cookie, not a body.
    pub async fn session_login(&self, username: &str, password: &str) -> CsToolsResult<()> {
        let response = self
            .request(reqwest::Method::POST, "session/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(CsToolsError::ApiAuthenticationFailed {
                host: self.base_url.clone(),
                message: format!("login rejected for user '{}'", username),
            });
        }
        response.error_for_status()?;

        info!("Logged in to {} as {}", self.base_url, username);
        Ok(())
    }
}

fn json_ids(ids: &[String]) -> CsToolsResult<String> {
    Ok(serde_json::to_string(ids)?)
}

#[async_trait]
impl ThoughtSpotApi for RestApiV1 {
    async fn metadata_list(&self, params: &MetadataListParams) -> CsToolsResult<ListPage> {
        let request = self
            .request(reqwest::Method::GET, "metadata/list")
            .query(&params.to_query());
        self.send(request).await
    }

    async fn metadata_details(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
        show_hidden: bool,
    ) -> CsToolsResult<Value> {
        let query = [
            ("type", metadata_type.as_str().to_string()),
            ("id", json_ids(ids)?),
            ("showhidden", show_hidden.to_string()),
            ("dropquestiondetails", "false".to_string()),
            ("version", "-1".to_string()),
        ];
        let request = self
            .request(reqwest::Method::GET, "metadata/details")
            .query(&query);
        self.send(request).await
    }

    async fn security_metadata_permissions(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
        permission_type: PermissionType,
    ) -> CsToolsResult<Value> {
        let query = [
            ("type", metadata_type.as_str().to_string()),
            ("id", json_ids(ids)?),
            ("dependentshare", "false".to_string()),
            ("permissiontype", permission_type.api_value().to_string()),
        ];
        let request = self
            .request(reqwest::Method::GET, "security/metadata/permissions")
            .query(&query);
        self.send(request).await
    }

    async fn dependency_list_dependents(
        &self,
        metadata_type: MetadataType,
        ids: &[String],
    ) -> CsToolsResult<Value> {
        let form = [
            ("type", metadata_type.as_str().to_string()),
            ("id", json_ids(ids)?),
            ("batchsize", "-1".to_string()),
            ("offset", "-1".to_string()),
        ];
        let request = self
            .request(reqwest::Method::POST, "dependency/listdependents")
            .form(&form);
        self.send(request).await
    }

    async fn search_data(&self, query: &str, data_source_guid: &str) -> CsToolsResult<Value> {
        let params = [
            ("query_string", query),
            ("data_source_guid", data_source_guid),
            ("batchsize", "-1"),
            ("pagenumber", "-1"),
            ("offset", "-1"),
            ("formattype", "COMPACT"),
        ];
        let request = self
            .request(reqwest::Method::POST, "searchdata")
            .query(&params);
        self.send(request).await
    }
}
