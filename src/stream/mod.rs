//! Streaming session lifecycle, independent of overlay editing: start a
//! named session against the streaming collaborator, expose the playable
//! address, stop it again.

pub mod playback;

use thiserror::Error;
use url::Url;

use crate::remote::{RemoteError, StreamBackend, StreamId};

pub use playback::{AdaptiveEngine, AdaptiveSession, MediaSurface, PlaybackAttachment, PlaybackError};

pub type StreamResult<T> = std::result::Result<T, StreamError>;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("source address is empty")]
    EmptySourceAddress,
    #[error("a streaming session is already active; stop it first")]
    SessionActive,
    #[error("playable path {path:?} does not resolve against {base}")]
    UnresolvablePlayablePath { path: String, base: Url },
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A running stream: the collaborator's handle plus the absolute address a
/// player can consume.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSession {
    stream_id: StreamId,
    playable_address: Url,
}

impl StreamSession {
    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    pub fn playable_address(&self) -> &Url {
        &self.playable_address
    }
}

/// Owns at most one active stream session against the backend.
pub struct StreamController<B: StreamBackend> {
    backend: B,
    /// Base address the backend's relative playable paths resolve against.
    playback_base: Url,
    active: Option<StreamSession>,
}

impl<B: StreamBackend> StreamController<B> {
    pub fn new(backend: B, playback_base: Url) -> Self {
        Self {
            backend,
            playback_base,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&StreamSession> {
        self.active.as_ref()
    }

    /// Ask the backend to ingest `source_address` and record the resulting
    /// session. Refuses to start over an active session rather than
    /// orphaning it; the caller stops first.
    pub async fn start(&mut self, source_address: &str) -> StreamResult<&StreamSession> {
        if source_address.is_empty() {
            return Err(StreamError::EmptySourceAddress);
        }
        if self.active.is_some() {
            return Err(StreamError::SessionActive);
        }

        let started = self.backend.start(source_address).await?;
        let playable_address = self
            .playback_base
            .join(&started.relative_playable_path)
            .map_err(|_| StreamError::UnresolvablePlayablePath {
                path: started.relative_playable_path.clone(),
                base: self.playback_base.clone(),
            })?;
        tracing::info!(
            stream_id = %started.stream_id,
            playable = %playable_address,
            "stream session started"
        );

        self.active = Some(StreamSession {
            stream_id: started.stream_id,
            playable_address,
        });
        Ok(self.active.as_ref().expect("session was just stored"))
    }

    /// Tear the active session down. A missing session, or a backend that
    /// no longer knows the stream, is a no-op from the caller's
    /// perspective; the session is cleared either way.
    pub async fn stop(&mut self) -> StreamResult<()> {
        let Some(session) = self.active.take() else {
            return Ok(());
        };
        match self.backend.stop(session.stream_id()).await {
            Ok(stopped) => {
                if !stopped {
                    tracing::debug!(stream_id = %session.stream_id(), "backend had no such stream to stop");
                }
            }
            Err(err) => {
                tracing::warn!(stream_id = %session.stream_id(), ?err, "stream stop failed; treating as stopped");
            }
        }
        Ok(())
    }
}
