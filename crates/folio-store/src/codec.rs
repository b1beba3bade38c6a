//! JSON import/export of whole documents.
//!
//! Export is plain `serde_json`. Import is stricter than deserialization:
//! every top-level field must be present (an absent `mainSections` or
//! `sidebarWidgets` is fatal rather than defaulting to empty), and block ids
//! must be unique within each collection.

use serde_json::Value;

use folio_types::{Collection, Document};

use crate::error::ImportError;

/// Top-level fields required on import, in serialized order.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "id",
    "name",
    "description",
    "mainSections",
    "sidebarWidgets",
    "layout",
    "styles",
    "createdAt",
    "updatedAt",
];

/// Serialize a document to pretty JSON.
pub fn export_json(doc: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}

/// Parse and validate an exported document.
pub fn import_json(text: &str) -> Result<Document, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    import_value(value)
}

/// Validate an already-parsed value.
pub fn import_value(value: Value) -> Result<Document, ImportError> {
    let Some(obj) = value.as_object() else {
        return Err(ImportError::NotAnObject);
    };
    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(ImportError::MissingField(field));
        }
    }

    let doc: Document = serde_json::from_value(value)?;

    for collection in [Collection::Main, Collection::Secondary] {
        if let Some(id) = doc.duplicate_id(collection) {
            return Err(ImportError::DuplicateBlock { collection, id });
        }
    }

    tracing::debug!(
        document = %doc.id,
        sections = doc.main.len(),
        widgets = doc.secondary.len(),
        "imported document"
    );
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{Block, BlockKind};

    fn sample() -> Document {
        let mut doc = Document::new("resume");
        doc.main.push(Block::new(BlockKind::Hero, "Header", 0));
        doc.secondary.push(Block::new(BlockKind::Contact, "Contact", 0));
        doc
    }

    #[test]
    fn test_export_then_import_preserves_document() {
        let doc = sample();
        let text = export_json(&doc).unwrap();
        assert_eq!(import_json(&text).unwrap(), doc);
    }

    #[test]
    fn test_missing_main_sections_is_fatal() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("mainSections");
        let err = import_value(value).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("mainSections")));
    }

    #[test]
    fn test_missing_sidebar_widgets_is_fatal() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("sidebarWidgets");
        let err = import_value(value).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("sidebarWidgets")));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(import_json("[1, 2]"), Err(ImportError::NotAnObject)));
        assert!(matches!(import_json("{nope"), Err(ImportError::Json(_))));
    }

    #[test]
    fn test_duplicate_block_rejected() {
        let mut doc = sample();
        let dup = doc.main[0].clone();
        doc.main.push(dup);
        let text = export_json(&doc).unwrap();
        let err = import_json(&text).unwrap_err();
        assert!(matches!(
            err,
            ImportError::DuplicateBlock { collection: Collection::Main, .. }
        ));
    }

    #[test]
    fn test_same_id_across_collections_is_allowed() {
        let mut doc = sample();
        doc.secondary[0].id = doc.main[0].id;
        let text = export_json(&doc).unwrap();
        assert!(import_json(&text).is_ok());
    }
}
