//! Seams to the two external collaborators: the persisted overlay document
//! store and the streaming backend. The engine holds no other durable state
//! and performs no direct file or socket I/O outside these traits.

pub mod http;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{DocumentId, DocumentPatch, OverlayDocument};

pub use http::{HttpOverlayRepository, HttpStreamBackend};

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The collaborator reports no such resource.
    #[error("remote resource not found")]
    NotFound,
    /// Any other non-2xx response.
    #[error("remote call failed with status {0}")]
    Status(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// The persisted overlay document store.
///
/// All methods map 1:1 onto the collaborator's CRUD surface; implementations
/// must not cache or reorder. Futures are `Send` so the session can hand the
/// background edit sync to the runtime.
pub trait OverlayRepository: Send + Sync + 'static {
    /// Persist a draft; the returned document carries its new id.
    fn create(
        &self,
        document: &OverlayDocument,
    ) -> impl Future<Output = RemoteResult<OverlayDocument>> + Send;

    /// All persisted documents, in collaborator-determined order.
    fn list(&self) -> impl Future<Output = RemoteResult<Vec<OverlayDocument>>> + Send;

    fn fetch(&self, id: &DocumentId) -> impl Future<Output = RemoteResult<OverlayDocument>> + Send;

    /// Partial update; returns the full updated document, which is
    /// authoritative.
    fn update(
        &self,
        id: &DocumentId,
        patch: &DocumentPatch,
    ) -> impl Future<Output = RemoteResult<OverlayDocument>> + Send;

    /// Returns whether the collaborator actually deleted a document.
    fn delete(&self, id: &DocumentId) -> impl Future<Output = RemoteResult<bool>> + Send;

    /// Readiness probe for the hosting surface.
    fn health(&self) -> impl Future<Output = RemoteResult<bool>> + Send;
}

/// Opaque handle to a running stream, required to stop it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(String);

impl StreamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Successful stream allocation: the handle plus a playable path relative to
/// the playback base address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStarted {
    pub stream_id: StreamId,
    pub relative_playable_path: String,
}

/// The streaming backend that ingests a source and serves it back as a
/// playable stream.
pub trait StreamBackend: Send + Sync + 'static {
    fn start(
        &self,
        source_address: &str,
    ) -> impl Future<Output = RemoteResult<StreamStarted>> + Send;

    /// Returns whether the backend actually tore a session down.
    fn stop(&self, stream_id: &StreamId) -> impl Future<Output = RemoteResult<bool>> + Send;
}
