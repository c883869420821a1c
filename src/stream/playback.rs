//! Attaches a playable address to a video rendering surface, choosing
//! between adaptive-streaming playback and native playback depending on
//! what the runtime supports. The adaptive session is scoped to the
//! attachment: acquired on attach, released on detach, re-attach, or drop,
//! including when manifest parsing never completes.

use thiserror::Error;
use url::Url;

/// MIME type a surface must handle natively when no adaptive engine is
/// available.
const ADAPTIVE_STREAM_MIME: &str = "application/vnd.apple.mpegurl";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("rendering surface supports neither adaptive nor native streaming playback")]
    UnsupportedSurface,
}

/// The video rendering surface the attachment drives.
pub trait MediaSurface {
    fn can_play_native(&self, mime_type: &str) -> bool;
    fn set_source(&mut self, address: &Url);
    fn clear_source(&mut self);
    fn begin_playback(&mut self);
}

/// Adaptive-streaming runtime: reports availability and allocates playback
/// sessions.
pub trait AdaptiveEngine {
    type Session: AdaptiveSession;

    fn is_supported(&self) -> bool;
    fn create_session(&mut self) -> Self::Session;
}

/// One manifest-driven playback session. `destroy` must release all decoder
/// and network resources; the attachment guarantees it is called exactly
/// once per session.
pub trait AdaptiveSession {
    fn load_manifest(&mut self, address: &Url);
    /// Bind the session to its rendering surface.
    fn attach_media(&mut self);
    fn destroy(&mut self);
}

#[derive(Debug)]
enum AttachmentState<S> {
    Detached,
    /// Adaptive session is loading the manifest; autoplay is deferred until
    /// the engine confirms it parsed.
    AttachingAdaptive { session: S },
    AttachedAdaptive { session: S },
    AttachedNative,
}

/// State machine keyed on the playable address. An address change is always
/// a full teardown-then-reattach, never an in-place source swap.
pub struct PlaybackAttachment<E: AdaptiveEngine, S: MediaSurface> {
    engine: E,
    surface: S,
    autoplay: bool,
    address: Option<Url>,
    state: AttachmentState<E::Session>,
}

impl<E: AdaptiveEngine, S: MediaSurface> PlaybackAttachment<E, S> {
    pub fn new(engine: E, surface: S, autoplay: bool) -> Self {
        Self {
            engine,
            surface,
            autoplay,
            address: None,
            state: AttachmentState::Detached,
        }
    }

    pub fn address(&self) -> Option<&Url> {
        self.address.as_ref()
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.state, AttachmentState::Detached)
    }

    pub fn is_attached(&self) -> bool {
        matches!(
            self.state,
            AttachmentState::AttachedAdaptive { .. } | AttachmentState::AttachedNative
        )
    }

    /// Drive the attachment to the given address. `None` detaches; a new
    /// address tears the previous attachment down first and then attaches
    /// with whichever strategy the runtime supports.
    pub fn set_address(&mut self, address: Option<Url>) -> Result<(), PlaybackError> {
        self.teardown();
        let Some(address) = address else {
            return Ok(());
        };

        if self.engine.is_supported() {
            let mut session = self.engine.create_session();
            session.load_manifest(&address);
            session.attach_media();
            self.address = Some(address);
            self.state = AttachmentState::AttachingAdaptive { session };
            return Ok(());
        }

        if self.surface.can_play_native(ADAPTIVE_STREAM_MIME) {
            self.surface.set_source(&address);
            if self.autoplay {
                self.surface.begin_playback();
            }
            self.address = Some(address);
            self.state = AttachmentState::AttachedNative;
            return Ok(());
        }

        Err(PlaybackError::UnsupportedSurface)
    }

    /// Signal from the adaptive session that the manifest finished parsing.
    /// Spurious signals in any other state are ignored.
    pub fn manifest_parsed(&mut self) {
        let state = std::mem::replace(&mut self.state, AttachmentState::Detached);
        self.state = match state {
            AttachmentState::AttachingAdaptive { session } => {
                if self.autoplay {
                    self.surface.begin_playback();
                }
                AttachmentState::AttachedAdaptive { session }
            }
            other => other,
        };
    }

    pub fn detach(&mut self) {
        self.teardown();
    }

    // Adaptive resources are released before the surface is touched, so a
    // half-attached session (manifest never parsed) cannot leak across
    // start/stop cycles.
    fn teardown(&mut self) {
        let state = std::mem::replace(&mut self.state, AttachmentState::Detached);
        match state {
            AttachmentState::AttachingAdaptive { mut session }
            | AttachmentState::AttachedAdaptive { mut session } => {
                session.destroy();
            }
            AttachmentState::AttachedNative | AttachmentState::Detached => {}
        }
        if self.address.take().is_some() {
            self.surface.clear_source();
        }
    }
}

impl<E: AdaptiveEngine, S: MediaSurface> Drop for PlaybackAttachment<E, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
