use tracing::debug;

use super::collect_pages;
use crate::api::util::is_valid_guid;
use crate::api::{MetadataListParams, ThoughtSpotApi};
use crate::error::{CsToolsError, CsToolsResult};
use crate::models::{MetadataType, Record};

const USER_BATCH_SIZE: usize = 50;

pub struct UserMiddleware<'a, A: ThoughtSpotApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ThoughtSpotApi + ?Sized> UserMiddleware<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Header records of every user.
    pub async fn all(&self) -> CsToolsResult<Vec<Record>> {
        let params = MetadataListParams::new(MetadataType::User).batch_size(USER_BATCH_SIZE);
        let users = collect_pages(self.api, params).await?;

        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Find users by GUID, username or display name.
    ///
    /// With `error_if_ambiguous` more than one match is an error and the result
    /// holds exactly one record.
    pub async fn get(&self, principal: &str, error_if_ambiguous: bool) -> CsToolsResult<Vec<Record>> {
        let params = MetadataListParams::new(MetadataType::User);
        let params = if is_valid_guid(principal) {
            params.fetch_ids(&[principal.to_string()])
        } else {
            params.pattern(principal)
        };

        let users = self.api.metadata_list(&params).await?.headers;

        if users.is_empty() {
            return Err(CsToolsError::content_not_found(
                "USER",
                format!("No user found with the name {}", principal),
            ));
        }

        if error_if_ambiguous && users.len() > 1 {
            return Err(CsToolsError::ambiguous("user", principal));
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middlewares::mock::{header, Call, MockApi};
    use crate::models::{str_field, ListPage};
    use serde_json::json;

    const GUID: &str = "0291f1cd-5f8e-4d96-80e2-e5ef1aa6c44f";

    #[tokio::test]
    async fn test_all_uses_batches_of_fifty() {
        let api = MockApi::new().on_list(|params| {
            let headers = if params.offset == 0 {
                (0..50).map(|i| header(json!({"id": format!("u{}", i)}))).collect()
            } else {
                vec![header(json!({"id": "u50"}))]
            };
            Ok(ListPage::new(headers, params.offset > 0))
        });

        let users = UserMiddleware::new(&api).all().await.unwrap();

        assert_eq!(users.len(), 51);
        match &api.calls()[1] {
            Call::List(params) => {
                assert_eq!(params.offset, 50);
                assert_eq!(params.batch_size, Some(50));
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_by_guid_uses_fetch_ids() {
        let api = MockApi::new().on_list(|params| {
            assert_eq!(params.fetch_ids, vec![GUID.to_string()]);
            assert!(params.pattern.is_none());
            Ok(ListPage::new(vec![header(json!({"id": GUID, "name": "ana"}))], true))
        });

        let users = UserMiddleware::new(&api).get(GUID, true).await.unwrap();
        assert_eq!(str_field(&users[0], "name"), Some("ana"));
    }

    #[tokio::test]
    async fn test_get_by_name_uses_pattern() {
        let api = MockApi::new().on_list(|params| {
            assert_eq!(params.pattern.as_deref(), Some("ana"));
            Ok(ListPage::new(vec![header(json!({"id": "u1", "name": "ana"}))], true))
        });

        let users = UserMiddleware::new(&api).get("ana", true).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let api = MockApi::new();
        let err = UserMiddleware::new(&api).get("nobody", true).await.unwrap_err();

        assert!(err.to_string().contains("No user found with the name nobody"));
    }

    #[tokio::test]
    async fn test_get_ambiguous() {
        let api = MockApi::new().on_list(|_| {
            Ok(ListPage::new(
                vec![header(json!({"id": "u1"})), header(json!({"id": "u2"}))],
                true,
            ))
        });

        let middleware = UserMiddleware::new(&api);
        assert!(matches!(
            middleware.get("an", true).await,
            Err(CsToolsError::AmbiguousContent { .. })
        ));
        assert_eq!(middleware.get("an", false).await.unwrap().len(), 2);
    }
}
