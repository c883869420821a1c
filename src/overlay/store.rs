use thiserror::Error;

use super::element::{ElementContent, ElementId, ElementPatch, OverlayElement};
use crate::geometry::{NormPoint, NormSize};

pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("no overlay element with id {0}")]
    ElementNotFound(ElementId),
}

/// In-memory ordered collection of the overlay currently being edited.
/// Purely local; synchronization with the persisted copy is the session's
/// concern.
#[derive(Debug, Clone, Default)]
pub struct OverlayStore {
    elements: Vec<OverlayElement>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &ElementId) -> Option<&OverlayElement> {
        self.elements.iter().find(|element| &element.id == id)
    }

    /// Append a new element with a fresh id, full opacity, no rotation, and
    /// a stack index above every existing element so it paints on top.
    pub fn create(
        &mut self,
        content: ElementContent,
        position: NormPoint,
        size: NormSize,
    ) -> ElementId {
        let id = ElementId::generate();
        let stack_index = self.next_stack_index();
        self.elements.push(OverlayElement {
            id: id.clone(),
            content,
            position,
            size,
            opacity: 1.0,
            rotation: 0.0,
            stack_index,
        });
        id
    }

    // Loaded presets may carry sparse indices above the element count, so
    // top-of-stack is whichever of count and max index is larger.
    fn next_stack_index(&self) -> i64 {
        let max = self
            .elements
            .iter()
            .map(|element| element.stack_index)
            .max()
            .unwrap_or(0);
        max.max(self.elements.len() as i64) + 1
    }

    /// Merge partial changes into the element matching `id`, leaving every
    /// other element untouched. Returns the element's post-merge state.
    pub fn patch(&mut self, id: &ElementId, patch: &ElementPatch) -> OverlayResult<OverlayElement> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| &element.id == id)
            .ok_or_else(|| OverlayError::ElementNotFound(id.clone()))?;
        element.apply(patch);
        Ok(element.clone())
    }

    /// Bulk-replace the working collection, used when loading a document.
    pub fn replace_all(&mut self, elements: Vec<OverlayElement>) {
        self.elements = elements;
    }

    pub fn snapshot(&self) -> Vec<OverlayElement> {
        self.elements.clone()
    }

    /// Elements in paint order: ascending stack index, insertion order on
    /// ties.
    pub fn paint_order(&self) -> Vec<&OverlayElement> {
        let mut ordered: Vec<&OverlayElement> = self.elements.iter().collect();
        ordered.sort_by_key(|element| element.stack_index);
        ordered
    }
}
