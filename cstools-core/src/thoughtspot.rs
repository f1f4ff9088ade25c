use tracing::{debug, info};

use crate::api::{RestApiV1, ThoughtSpotApi};
use crate::config::CsToolsConfig;
use crate::error::CsToolsResult;
use crate::middlewares::{MetadataMiddleware, SearchMiddleware, UserMiddleware};

/// Entry point for talking to one platform instance.
pub struct ThoughtSpot<A: ThoughtSpotApi = RestApiV1> {
    api: A,
}

impl ThoughtSpot<RestApiV1> {
    /// Build the REST client and log in when credentials are configured.
    pub async fn connect(config: &CsToolsConfig) -> CsToolsResult<Self> {
        let url = config.require_url()?;
        let mut ts_config = config.thoughtspot.clone();
        ts_config.url = url.to_string();

        let api = RestApiV1::from_config(&ts_config)?;

        match (&ts_config.username, &ts_config.password) {
            (Some(username), Some(password)) => api.session_login(username, password).await?,
            _ => debug!("No credentials configured, skipping login"),
        }

        info!("Connected to {}", api.base_url());
        Ok(Self { api })
    }
}

impl<A: ThoughtSpotApi> ThoughtSpot<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn metadata(&self) -> MetadataMiddleware<'_, A> {
        MetadataMiddleware::new(&self.api)
    }

    pub fn user(&self) -> UserMiddleware<'_, A> {
        UserMiddleware::new(&self.api)
    }

    pub fn search(&self) -> SearchMiddleware<'_, A> {
        SearchMiddleware::new(&self.api)
    }
}
