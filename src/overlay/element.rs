use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{NormPoint, NormSize};

/// Stable identifier of an overlay element, unique within an overlay and
/// never reused. Assigned at creation time from a freshly generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Image,
}

/// Kind-specific payload: the displayed string for text, a source address
/// for images. Serialized as the `type`/`content` field pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementContent {
    Text { content: String },
    Image { content: String },
}

impl ElementContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn image(source_address: impl Into<String>) -> Self {
        Self::Image {
            content: source_address.into(),
        }
    }

    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Text { content } | Self::Image { content } => content,
        }
    }

    fn set(&mut self, value: String) {
        match self {
            Self::Text { content } | Self::Image { content } => *content = value,
        }
    }
}

/// One positioned overlay element. Geometry lives in the normalized
/// coordinate space; paint order is decided by `stack_index` (higher on
/// top), with ties broken by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayElement {
    pub id: ElementId,
    #[serde(flatten)]
    pub content: ElementContent,
    #[serde(flatten)]
    pub position: NormPoint,
    #[serde(flatten)]
    pub size: NormSize,
    pub opacity: f64,
    pub rotation: f64,
    #[serde(rename = "zIndex")]
    pub stack_index: i64,
}

impl OverlayElement {
    /// Merge the given partial changes into this element. Fields absent from
    /// the patch are left untouched; applying the same patch twice yields the
    /// same state as applying it once.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(content) = &patch.content {
            self.content.set(content.clone());
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(stack_index) = patch.stack_index {
            self.stack_index = stack_index;
        }
    }
}

/// Partial element changes. Rotation is accepted for both kinds; it is part
/// of the contract for future element kinds even though no current gesture
/// produces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub position: Option<NormPoint>,
    pub size: Option<NormSize>,
    pub opacity: Option<f64>,
    pub rotation: Option<f64>,
    pub stack_index: Option<i64>,
}

impl ElementPatch {
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn position(position: NormPoint) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Anchor and extents together; a resize that moves the anchor corner
    /// must land as one patch.
    pub fn bounds(position: NormPoint, size: NormSize) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            ..Self::default()
        }
    }
}
