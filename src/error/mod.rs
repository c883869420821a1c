use crate::overlay::OverlayError;
use crate::remote::RemoteError;
use crate::session::SessionError;
use crate::stream::{PlaybackError, StreamError};
use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Crate-level error for callers that drive several engine components
/// through one surface. Nothing in here is process-fatal; every variant is
/// recoverable at the call site.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
