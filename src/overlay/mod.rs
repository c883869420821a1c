pub mod element;
pub mod gesture;
pub mod store;

pub use element::{ElementContent, ElementId, ElementKind, ElementPatch, OverlayElement};
pub use store::{OverlayError, OverlayResult, OverlayStore};
