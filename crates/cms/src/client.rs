//! HTTP client for the Directus-style item store.
//!
//! One outbound request per call, envelope parsing, and remapping of the
//! store's known error shapes into operator-actionable messages. No retry,
//! no circuit breaking; timeouts are whatever the HTTP client defaults to.

use puspresma_common::{AppError, AppResult, CmsConfig};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::query::{Filter, Query};

/// Result-set metadata returned alongside list queries.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Meta {
    /// Total rows in the collection.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// Rows matching the current filter.
    #[serde(default)]
    pub filter_count: Option<u64>,
}

/// Token pair issued by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTokens {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token lifetime in milliseconds.
    #[serde(default)]
    pub expires: Option<i64>,
}

/// Identity record from the provider's "who am I" endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CmsUser {
    /// Provider-side user id.
    pub id: String,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

/// Client for one item store instance.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    static_token: Option<String>,
}

impl CmsClient {
    /// Create a client from configuration. Fails when the base URL does not
    /// parse.
    pub fn new(config: &CmsConfig) -> AppResult<Self> {
        Url::parse(&config.url)
            .map_err(|e| AppError::Config(format!("URL CMS tidak valid '{}': {e}", config.url)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            static_token: config.static_token.clone(),
        })
    }

    /// Base URL of the store, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.static_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// List rows of a collection.
    pub async fn list_items<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> AppResult<(Vec<T>, Option<Meta>)> {
        let response = self
            .request(Method::GET, &format!("/items/{collection}"))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }

        let envelope: Envelope<Vec<T>> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;
        Ok((envelope.data, envelope.meta))
    }

    /// Count rows matching a filter.
    pub async fn count_items(&self, collection: &str, filter: Option<Filter>) -> AppResult<u64> {
        let mut query = Query::new().fields(&["id"]).limit(1).with_counts();
        if let Some(filter) = filter {
            query = query.filter(filter);
        }

        let (_, meta) = self.list_items::<Value>(collection, &query).await?;
        Ok(meta.and_then(|m| m.filter_count).unwrap_or(0))
    }

    /// Fetch a single row by id. Returns `None` when the store reports the
    /// id as missing — which it does as either 404 or, with itemized read
    /// permissions, as 403.
    pub async fn get_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<T>> {
        self.get_item_with(collection, id, &Query::new()).await
    }

    /// Fetch a single row by id with field projection.
    pub async fn get_item_with<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        query: &Query,
    ) -> AppResult<Option<T>> {
        let response = self
            .request(Method::GET, &format!("/items/{collection}/{id}"))
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND || response.status() == StatusCode::FORBIDDEN
        {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;
        Ok(Some(envelope.data))
    }

    /// Fetch a singleton collection. The store returns an object for
    /// singletons and an array for regular collections; both shapes are
    /// accepted so a misconfigured collection still resolves.
    pub async fn get_singleton<T: DeserializeOwned>(&self, collection: &str) -> AppResult<Option<T>> {
        let response = self
            .request(Method::GET, &format!("/items/{collection}"))
            .query(&Query::new().limit(1).to_params())
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }

        let envelope: Envelope<Value> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;

        let data = match envelope.data {
            Value::Array(items) => match items.into_iter().next() {
                Some(item) => item,
                None => return Ok(None),
            },
            Value::Null => return Ok(None),
            other => other,
        };

        serde_json::from_value(data)
            .map(Some)
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))
    }

    /// Insert one row and return the stored record.
    pub async fn create_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &Value,
    ) -> AppResult<T> {
        let response = self
            .request(Method::POST, &format!("/items/{collection}"))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;
        Ok(envelope.data)
    }

    /// Patch one row and return the updated record.
    pub async fn update_item<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
    ) -> AppResult<T> {
        let response = self
            .request(Method::PATCH, &format!("/items/{collection}/{id}"))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;
        Ok(envelope.data)
    }

    /// Permanently delete one row.
    pub async fn delete_item(&self, collection: &str, id: &str) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, &format!("/items/{collection}/{id}"))
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error(collection, response).await);
        }
        Ok(())
    }

    /// Upload one file to the store's asset pipeline; returns the asset id.
    pub async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> AppResult<String> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::BadRequest(format!("Tipe berkas tidak valid: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, "/files")
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Cms(format!("CMS tidak dapat dihubungi: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::remap_error("files", response).await);
        }

        #[derive(Deserialize)]
        struct FileRecord {
            #[serde(deserialize_with = "crate::records::de_id")]
            id: String,
        }

        let envelope: Envelope<FileRecord> = response
            .json()
            .await
            .map_err(|e| AppError::Cms(format!("Respons CMS tidak valid: {e}")))?;
        Ok(envelope.data.id)
    }

    /// Exchange credentials for a token pair at the identity provider.
    pub async fn auth_login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("CMS tidak dapat dihubungi: {e}")))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(Self::remap_error("auth", response).await);
        }

        let envelope: Envelope<AuthTokens> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Respons login tidak valid: {e}")))?;
        Ok(envelope.data)
    }

    /// Validate a bearer token against the provider's "who am I" endpoint.
    pub async fn auth_me(&self, token: &str) -> AppResult<CmsUser> {
        let response = self
            .http
            .get(format!("{}/users/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("CMS tidak dapat dihubungi: {e}")))?;

        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(Self::remap_error("users", response).await);
        }

        let envelope: Envelope<CmsUser> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Respons identitas tidak valid: {e}")))?;
        Ok(envelope.data)
    }

    /// Remap the store's known error shapes into operator-actionable
    /// messages; everything else surfaces as a generic CMS failure.
    async fn remap_error(collection: &str, response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(collection, status = %status, "CMS request rejected");

        let (code, message) = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.errors.into_iter().next())
            .map_or_else(
                || (None, String::new()),
                |item| (item.extensions.and_then(|e| e.code), item.message),
            );

        if status == StatusCode::UNAUTHORIZED {
            return AppError::Cms("Token akses CMS tidak valid atau kedaluwarsa".to_string());
        }

        let lower = message.to_lowercase();
        if code.as_deref() == Some("ROUTE_NOT_FOUND") || lower.contains("doesn't exist") {
            return AppError::Cms(format!("Koleksi '{collection}' tidak ada di CMS"));
        }
        if code.as_deref() == Some("FORBIDDEN") || lower.contains("permission") {
            return AppError::Cms(format!(
                "Akses ke koleksi '{collection}' ditolak; periksa permission role API di CMS"
            ));
        }

        if message.is_empty() {
            AppError::Cms(format!("CMS menolak permintaan ke '{collection}' ({status})"))
        } else {
            AppError::Cms(format!(
                "CMS menolak permintaan ke '{collection}' ({status}): {message}"
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base_url: &str) -> CmsConfig {
        CmsConfig {
            url: base_url.to_string(),
            static_token: None,
            asset_width: 800,
        }
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = CmsClient::new(&test_config("not a url"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_items_parses_envelope_and_meta() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba");
                then.status(200).json_body(json!({
                    "data": [
                        { "id": 1, "judul": "Gemastik" },
                        { "id": 2, "judul": "Pimnas" },
                    ],
                    "meta": { "total_count": 7, "filter_count": 2 }
                }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let (rows, meta) = client
            .list_items::<Value>("lomba", &Query::new().with_counts())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(meta.unwrap().filter_count, Some(2));
    }

    #[tokio::test]
    async fn test_list_items_sends_filter_params() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/lomba")
                    .query_param("limit", "5")
                    .query_param("filter", json!({ "status": { "_eq": "open" } }).to_string());
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let query = Query::new().filter(Filter::eq("status", "open")).limit(5);
        client.list_items::<Value>("lomba", &query).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_item_missing_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/lomba/99");
                then.status(404)
                    .json_body(json!({ "errors": [{ "message": "Item doesn't exist." }] }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let result = client.get_item::<Value>("lomba", "99").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_permission_error_is_remapped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/items/kontak");
                then.status(403).json_body(json!({
                    "errors": [{
                        "message": "You don't have permission to access this.",
                        "extensions": { "code": "FORBIDDEN" }
                    }]
                }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let err = client
            .list_items::<Value>("kontak", &Query::new())
            .await
            .unwrap_err();

        match err {
            AppError::Cms(msg) => {
                assert!(msg.contains("kontak"));
                assert!(msg.contains("permission role"));
            }
            other => panic!("expected Cms error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_count_items_uses_filter_count() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/pendaftaran_expo")
                    .query_param("meta", "total_count,filter_count");
                then.status(200).json_body(json!({
                    "data": [{ "id": 1 }],
                    "meta": { "total_count": 40, "filter_count": 9 }
                }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let count = client
            .count_items("pendaftaran_expo", Some(Filter::eq("expo_id", "3")))
            .await
            .unwrap();
        assert_eq!(count, 9);
    }

    #[tokio::test]
    async fn test_create_item_returns_stored_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/items/kontak")
                    .json_body_includes(json!({ "nama": "Budi" }).to_string());
                then.status(200).json_body(json!({
                    "data": { "id": 12, "nama": "Budi", "status": "unread" }
                }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let created: Value = client
            .create_item("kontak", &json!({ "nama": "Budi", "pesan": "Halo" }))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created["status"], "unread");
    }

    #[tokio::test]
    async fn test_auth_me_rejects_bad_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/me");
                then.status(401)
                    .json_body(json!({ "errors": [{ "message": "Invalid token" }] }));
            })
            .await;

        let client = CmsClient::new(&test_config(&server.base_url())).unwrap();
        let err = client.auth_me("bogus").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_static_token_attached_as_bearer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/items/lomba")
                    .header("authorization", "Bearer portal-static-token");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;

        let config = CmsConfig {
            url: server.base_url(),
            static_token: Some("portal-static-token".to_string()),
            asset_width: 800,
        };
        let client = CmsClient::new(&config).unwrap();
        client.list_items::<Value>("lomba", &Query::new()).await.unwrap();

        mock.assert_async().await;
    }
}
