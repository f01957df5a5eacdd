//! Client for a JSONBin-style hosted JSON document API.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::Snapshot;

const MASTER_KEY_HEADER: &str = "X-Master-Key";
const BIN_NAME_HEADER: &str = "X-Bin-Name";

/// Hosted storage for a single JSON document per id.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Create a document holding `snapshot`, returning its assigned id.
    async fn create(&self, snapshot: &Snapshot) -> StoreResult<String>;
    async fn read_latest(&self, id: &str) -> StoreResult<Snapshot>;
    async fn replace(&self, id: &str, snapshot: &Snapshot) -> StoreResult<()>;
}

#[derive(Debug, Deserialize)]
struct LatestEnvelope {
    record: Snapshot,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    metadata: CreateMetadata,
}

#[derive(Debug, Deserialize)]
struct CreateMetadata {
    id: String,
}

pub struct JsonBinClient {
    client: reqwest::Client,
    api_url: String,
    master_key: String,
    bin_name: Option<String>,
}

impl JsonBinClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        master_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            master_key: master_key.into(),
            bin_name: None,
        }
    }

    /// Name attached to newly created documents.
    pub fn with_bin_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.bin_name = (!name.is_empty()).then_some(name);
        self
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{id}", self.api_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> StoreResult<reqwest::Response> {
        let response = request
            .header(MASTER_KEY_HEADER, &self.master_key)
            .send()
            .await?;
        let status = response.status();
        debug!(url, %status, "document host responded");
        if !status.is_success() {
            return Err(StoreError::status(url, status));
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentHost for JsonBinClient {
    async fn create(&self, snapshot: &Snapshot) -> StoreResult<String> {
        let body = serde_json::to_vec(snapshot)?;
        let mut request = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(name) = &self.bin_name {
            request = request.header(BIN_NAME_HEADER, name);
        }

        let bytes = self.send(request, &self.api_url).await?.bytes().await?;
        let envelope: CreateEnvelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.metadata.id)
    }

    async fn read_latest(&self, id: &str) -> StoreResult<Snapshot> {
        let url = format!("{}/latest", self.document_url(id));
        let bytes = self.send(self.client.get(&url), &url).await?.bytes().await?;
        let envelope: LatestEnvelope = serde_json::from_slice(&bytes)?;
        Ok(envelope.record)
    }

    async fn replace(&self, id: &str, snapshot: &Snapshot) -> StoreResult<()> {
        let url = self.document_url(id);
        let body = serde_json::to_vec(snapshot)?;
        let request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{closed_url, serve_once, test_client};
    use serde_json::json;

    fn client(base: &str) -> JsonBinClient {
        JsonBinClient::new(test_client(), format!("{base}/v3/b/"), "secret-key")
            .with_bin_name("uchis-ru-data")
    }

    #[tokio::test]
    async fn create_posts_snapshot_and_returns_id() {
        let body = json!({"record": {}, "metadata": {"id": "doc-1", "private": true}});
        let (base, server) = serve_once("200 OK", body.to_string()).await;

        let id = client(&base)
            .create(&Snapshot::with_admin_account())
            .await
            .expect("create");
        let request = server.await.expect("server");
        let lower = request.to_lowercase();

        assert_eq!(id, "doc-1");
        assert!(request.starts_with("POST /v3/b HTTP/1.1"));
        assert!(lower.contains("x-master-key: secret-key"));
        assert!(lower.contains("x-bin-name: uchis-ru-data"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.contains("\"admin123\""));
    }

    #[tokio::test]
    async fn read_latest_unwraps_record() {
        let body = json!({"record": {"cards": [{"id": 9}]}, "metadata": {"id": "doc-1"}});
        let (base, server) = serve_once("200 OK", body.to_string()).await;

        let snapshot = client(&base).read_latest("doc-1").await.expect("read");
        let request = server.await.expect("server");

        assert!(request.starts_with("GET /v3/b/doc-1/latest HTTP/1.1"));
        assert!(request.to_lowercase().contains("x-master-key: secret-key"));
        assert_eq!(snapshot.cards.len(), 1);
    }

    #[tokio::test]
    async fn replace_puts_by_id() {
        let (base, server) = serve_once("200 OK", "{}".to_string()).await;

        client(&base)
            .replace("doc-1", &Snapshot::default())
            .await
            .expect("replace");
        let request = server.await.expect("server");

        assert!(request.starts_with("PUT /v3/b/doc-1 HTTP/1.1"));
        assert!(!request.to_lowercase().contains("x-bin-name"));
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let (base, server) = serve_once("401 Unauthorized", "{}".to_string()).await;
        let err = client(&base).read_latest("doc-1").await.expect_err("401");
        server.await.expect("server");
        assert!(matches!(err, StoreError::Network(_)));
    }

    #[tokio::test]
    async fn unexpected_body_is_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"record": []}"#.to_string()).await;
        let err = client(&base).read_latest("doc-1").await.expect_err("bad body");
        server.await.expect("server");
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let err = client(&closed_url().await)
            .create(&Snapshot::default())
            .await
            .expect_err("unreachable");
        assert!(matches!(err, StoreError::Network(_)));
    }
}
