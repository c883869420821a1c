//! Reconciles the editable overlay with its remote persisted counterpart:
//! initial load, optimistic local mutation with fire-and-forget remote sync,
//! and preset save/update/delete.

use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;

use crate::document::{DocumentId, DocumentPatch, OverlayDocument};
use crate::geometry::{NormPoint, NormSize};
use crate::overlay::{ElementContent, ElementId, ElementPatch, OverlayElement, OverlayError, OverlayStore};
use crate::remote::{OverlayRepository, RemoteError};

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("preset name is empty")]
    EmptyPresetName,
    #[error("no preset loaded")]
    NoPresetLoaded,
    #[error(transparent)]
    Element(#[from] OverlayError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

const DEFAULT_TEXT_POSITION: NormPoint = NormPoint::new(0.1, 0.1);
const DEFAULT_TEXT_SIZE: NormSize = NormSize::new(0.2, 0.1);
const DEFAULT_IMAGE_POSITION: NormPoint = NormPoint::new(0.5, 0.5);
const DEFAULT_IMAGE_SIZE: NormSize = NormSize::new(0.2, 0.2);

/// One editing surface's session. Constructed with a repository handle when
/// the surface mounts and dropped with it; there is no process-wide editor
/// state.
///
/// `working elements` are the single source of truth for the live editing
/// session: local edits land synchronously and in call order, and a failed
/// background sync never rolls them back.
pub struct EditorSession<R: OverlayRepository> {
    repository: Arc<R>,
    store: OverlayStore,
    /// Persisted document being live-synchronized by local edits.
    active_document_id: Option<DocumentId>,
    /// Target of `update`; set by loading or saving a preset.
    selected_preset_id: Option<DocumentId>,
    /// Locally known presets, most recently saved first.
    presets: Vec<OverlayDocument>,
}

impl<R: OverlayRepository> EditorSession<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            store: OverlayStore::new(),
            active_document_id: None,
            selected_preset_id: None,
            presets: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[OverlayElement] {
        self.store.elements()
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn presets(&self) -> &[OverlayDocument] {
        &self.presets
    }

    pub fn active_document_id(&self) -> Option<&DocumentId> {
        self.active_document_id.as_ref()
    }

    pub fn selected_preset_id(&self) -> Option<&DocumentId> {
        self.selected_preset_id.as_ref()
    }

    /// Fetch all persisted documents and, if any exist, adopt the first one
    /// returned as the live-synchronized document. The collaborator decides
    /// what comes first; no ordering is imposed here.
    pub async fn load_initial(&mut self) -> SessionResult<()> {
        let documents = self.repository.list().await?;
        if let Some(first) = documents.first() {
            self.active_document_id = first.id.clone();
            self.store.replace_all(first.elements.clone());
            tracing::debug!(
                document_id = ?first.id,
                elements = first.elements.len(),
                "adopted initial overlay document"
            );
        }
        self.presets = documents;
        Ok(())
    }

    /// Load one preset into the working copy and make it the target of both
    /// `update` and live edit sync. On failure the prior working state is
    /// left unchanged.
    pub async fn load_preset(&mut self, id: &DocumentId) -> SessionResult<()> {
        let document = self.repository.fetch(id).await?;
        self.store.replace_all(document.elements);
        self.selected_preset_id = Some(id.clone());
        self.active_document_id = Some(id.clone());
        Ok(())
    }

    /// Persist the current working elements as a new named preset. The new
    /// preset becomes the `update` target but live edit sync keeps pointing
    /// at the previously active document.
    pub async fn save(&mut self, name: &str) -> SessionResult<&OverlayDocument> {
        if name.is_empty() {
            return Err(SessionError::EmptyPresetName);
        }
        let draft = OverlayDocument::draft(name, self.store.snapshot());
        let saved = self.repository.create(&draft).await?;
        tracing::info!(document_id = ?saved.id, name, "saved overlay preset");
        self.selected_preset_id = saved.id.clone();
        self.presets.insert(0, saved);
        Ok(&self.presets[0])
    }

    /// Push the current working elements as a full replacement of the
    /// selected preset's elements. The remote's accepted value is
    /// authoritative and replaces the working copy.
    pub async fn update(&mut self) -> SessionResult<()> {
        let id = self
            .selected_preset_id
            .clone()
            .ok_or(SessionError::NoPresetLoaded)?;
        let patch = DocumentPatch::elements(self.store.snapshot());
        let updated = self.repository.update(&id, &patch).await?;
        self.store.replace_all(updated.elements);
        Ok(())
    }

    /// Apply an element edit to the working copy, synchronously and in call
    /// order. When a document is live-synchronized, the full post-merge
    /// element collection is pushed to it in the background; that push is
    /// snapshotted before this call returns, so a later edit can never ship
    /// a payload that misses an earlier one. A failed push is logged and the
    /// local edit stands.
    pub fn apply_local_edit(
        &mut self,
        id: &ElementId,
        patch: &ElementPatch,
    ) -> SessionResult<OverlayElement> {
        let element = self.store.patch(id, patch)?;
        if let Some(document_id) = self.active_document_id.clone() {
            let payload = DocumentPatch::elements(self.store.snapshot());
            let repository = Arc::clone(&self.repository);
            match Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        if let Err(err) = repository.update(&document_id, &payload).await {
                            tracing::warn!(
                                document_id = %document_id,
                                ?err,
                                "background overlay sync failed; keeping local state"
                            );
                        }
                    });
                }
                Err(_) => {
                    tracing::warn!(
                        document_id = %document_id,
                        "no async runtime available; skipping background overlay sync"
                    );
                }
            }
        }
        Ok(element)
    }

    /// Delete a preset remotely and locally. Clears the `update` target if
    /// it pointed at the deleted preset. Returns whether the collaborator
    /// actually deleted anything.
    pub async fn delete_preset(&mut self, id: &DocumentId) -> SessionResult<bool> {
        let deleted = self.repository.delete(id).await?;
        self.presets.retain(|preset| preset.id.as_ref() != Some(id));
        if self.selected_preset_id.as_ref() == Some(id) {
            self.selected_preset_id = None;
        }
        Ok(deleted)
    }

    /// Add a text element at the default geometry. Local only; the element
    /// reaches the remote copy with the next `save`/`update` or edit sync.
    pub fn add_text(&mut self, content: impl Into<String>) -> ElementId {
        self.store.create(
            ElementContent::text(content),
            DEFAULT_TEXT_POSITION,
            DEFAULT_TEXT_SIZE,
        )
    }

    /// Add an image element at the default geometry. Local only.
    pub fn add_image(&mut self, source_address: impl Into<String>) -> ElementId {
        self.store.create(
            ElementContent::image(source_address),
            DEFAULT_IMAGE_POSITION,
            DEFAULT_IMAGE_SIZE,
        )
    }
}
