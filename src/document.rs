use std::fmt;

use serde::{Deserialize, Serialize};

use crate::overlay::OverlayElement;

/// Remote-assigned overlay document identifier. Only persisted documents
/// have one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A named overlay preset as held by the remote document store. A document
/// with an `id` is persisted; one without is a draft that exists only in the
/// editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: Vec<OverlayElement>,
}

impl OverlayDocument {
    pub fn draft(name: impl Into<String>, elements: Vec<OverlayElement>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            elements,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Partial document update for `PUT /overlays/{id}`. Absent fields are left
/// untouched by the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<OverlayElement>>,
}

impl DocumentPatch {
    /// Full replacement of a preset's element list, the shape pushed by both
    /// `update` and the background edit sync.
    pub fn elements(elements: Vec<OverlayElement>) -> Self {
        Self {
            elements: Some(elements),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_has_no_id_until_persisted() {
        let draft = OverlayDocument::draft("Match overlay", Vec::new());
        assert!(!draft.is_persisted());

        let json = serde_json::to_value(&draft).expect("draft should serialize");
        assert_eq!(
            json,
            serde_json::json!({"name": "Match overlay", "elements": []})
        );
    }

    #[test]
    fn persisted_document_round_trips_with_underscore_id() {
        let json = r#"{"_id":"64f0","name":"Scoreboard","elements":[]}"#;
        let document: OverlayDocument = serde_json::from_str(json).expect("document should parse");
        assert_eq!(document.id, Some(DocumentId::from("64f0")));
        assert!(document.is_persisted());
        assert_eq!(document.description, None);

        let back = serde_json::to_value(&document).expect("document should serialize");
        assert_eq!(back["_id"], "64f0");
    }

    #[test]
    fn document_patch_serializes_only_present_fields() {
        let patch = DocumentPatch::elements(Vec::new());
        let json = serde_json::to_value(&patch).expect("patch should serialize");
        assert_eq!(json, serde_json::json!({"elements": []}));
    }
}
