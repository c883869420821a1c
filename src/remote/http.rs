//! HTTP implementations of the collaborator seams.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{
    OverlayRepository, RemoteError, RemoteResult, StreamBackend, StreamId, StreamStarted,
};
use crate::document::{DocumentId, DocumentPatch, OverlayDocument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("stagecast/", env!("CARGO_PKG_VERSION"));

fn build_client() -> RemoteResult<Client> {
    Ok(Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    url
}

async fn expect_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound);
    }
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }
    Ok(response.json().await?)
}

/// Document store client speaking the `/overlays` CRUD surface.
#[derive(Debug, Clone)]
pub struct HttpOverlayRepository {
    client: Client,
    base: Url,
}

impl HttpOverlayRepository {
    pub fn new(base: Url) -> RemoteResult<Self> {
        Ok(Self::with_client(build_client()?, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
}

impl OverlayRepository for HttpOverlayRepository {
    async fn create(&self, document: &OverlayDocument) -> RemoteResult<OverlayDocument> {
        let url = endpoint(&self.base, &["overlays"]);
        let response = self.client.post(url).json(document).send().await?;
        expect_json(response).await
    }

    async fn list(&self) -> RemoteResult<Vec<OverlayDocument>> {
        let url = endpoint(&self.base, &["overlays"]);
        let response = self.client.get(url).send().await?;
        expect_json(response).await
    }

    async fn fetch(&self, id: &DocumentId) -> RemoteResult<OverlayDocument> {
        let url = endpoint(&self.base, &["overlays", id.as_str()]);
        let response = self.client.get(url).send().await?;
        expect_json(response).await
    }

    async fn update(&self, id: &DocumentId, patch: &DocumentPatch) -> RemoteResult<OverlayDocument> {
        let url = endpoint(&self.base, &["overlays", id.as_str()]);
        let response = self.client.put(url).json(patch).send().await?;
        expect_json(response).await
    }

    async fn delete(&self, id: &DocumentId) -> RemoteResult<bool> {
        let url = endpoint(&self.base, &["overlays", id.as_str()]);
        let response = self.client.delete(url).send().await?;
        let body: DeleteResponse = expect_json(response).await?;
        Ok(body.deleted)
    }

    async fn health(&self) -> RemoteResult<bool> {
        let url = endpoint(&self.base, &["health"]);
        let response = self.client.get(url).send().await?;
        let body: HealthResponse = expect_json(response).await?;
        Ok(body.ok)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartStreamRequest<'a> {
    source_address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StopStreamRequest<'a> {
    stream_id: &'a StreamId,
}

#[derive(Debug, Deserialize)]
struct StopStreamResponse {
    stopped: bool,
}

/// Streaming backend client speaking the `/stream` control surface.
#[derive(Debug, Clone)]
pub struct HttpStreamBackend {
    client: Client,
    base: Url,
}

impl HttpStreamBackend {
    pub fn new(base: Url) -> RemoteResult<Self> {
        Ok(Self::with_client(build_client()?, base))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

impl StreamBackend for HttpStreamBackend {
    async fn start(&self, source_address: &str) -> RemoteResult<StreamStarted> {
        let url = endpoint(&self.base, &["stream", "start"]);
        let body = StartStreamRequest { source_address };
        let response = self.client.post(url).json(&body).send().await?;
        expect_json(response).await
    }

    async fn stop(&self, stream_id: &StreamId) -> RemoteResult<bool> {
        let url = endpoint(&self.base, &["stream", "stop"]);
        let body = StopStreamRequest { stream_id };
        let response = self.client.post(url).json(&body).send().await?;
        let body: StopStreamResponse = expect_json(response).await?;
        Ok(body.stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000/api").expect("literal url is valid")
    }

    #[test]
    fn endpoints_extend_the_base_path() {
        assert_eq!(
            endpoint(&base(), &["overlays"]).as_str(),
            "http://localhost:8000/api/overlays"
        );
        assert_eq!(
            endpoint(&base(), &["overlays", "64f0"]).as_str(),
            "http://localhost:8000/api/overlays/64f0"
        );
        assert_eq!(
            endpoint(&base(), &["stream", "start"]).as_str(),
            "http://localhost:8000/api/stream/start"
        );
    }

    #[test]
    fn trailing_slash_on_the_base_does_not_double_up() {
        let base = Url::parse("http://localhost:8000/api/").expect("literal url is valid");
        assert_eq!(
            endpoint(&base, &["overlays"]).as_str(),
            "http://localhost:8000/api/overlays"
        );
    }

    #[test]
    fn start_request_uses_camel_case_wire_names() {
        let body = StartStreamRequest {
            source_address: "rtsp://camera.local/feed",
        };
        let json = serde_json::to_value(&body).expect("request should serialize");
        assert_eq!(
            json,
            serde_json::json!({"sourceAddress": "rtsp://camera.local/feed"})
        );
    }

    #[test]
    fn stop_request_carries_the_stream_id() {
        let id = StreamId::from("s-9");
        let body = StopStreamRequest { stream_id: &id };
        let json = serde_json::to_value(&body).expect("request should serialize");
        assert_eq!(json, serde_json::json!({"streamId": "s-9"}));
    }
}
