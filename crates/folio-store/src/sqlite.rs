//! SQLite persistence for documents.
//!
//! One row per document: the exported JSON body plus a few denormalized
//! columns so listing doesn't have to parse every body.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use folio_types::{Document, DocumentId};

use crate::codec;
use crate::error::StoreError;
use crate::{DocumentStore, DocumentSummary};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    body TEXT NOT NULL,
    sections INTEGER NOT NULL,
    widgets INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_updated ON documents(updated_at);
"#;

/// Database-backed [`DocumentStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DocumentStore for SqliteStore {
    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let body = codec::export_json(doc)?;
        self.conn.lock().execute(
            "INSERT INTO documents (id, name, body, sections, widgets, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                body = excluded.body,
                sections = excluded.sections,
                widgets = excluded.widgets,
                updated_at = excluded.updated_at",
            params![
                doc.id.to_string(),
                doc.name,
                body,
                doc.main.len() as i64,
                doc.secondary.len() as i64,
                doc.updated_at as i64,
            ],
        )?;
        tracing::debug!(document = %doc.id, "saved document");
        Ok(())
    }

    fn load(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let body: Option<String> = self
            .conn
            .lock()
            .query_row(
                "SELECT body FROM documents WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match body {
            Some(body) => Ok(Some(codec::import_json(&body)?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, sections, widgets, updated_at
             FROM documents ORDER BY updated_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let sections: i64 = row.get(2)?;
            let widgets: i64 = row.get(3)?;
            let updated_at: i64 = row.get(4)?;
            Ok((id, row.get::<_, String>(1)?, sections, widgets, updated_at))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, name, sections, widgets, updated_at) = row?;
            let Ok(id) = DocumentId::parse(&id) else {
                tracing::warn!("skipping document row with unparseable id {:?}", id);
                continue;
            };
            out.push(DocumentSummary {
                id,
                name,
                sections: sections as usize,
                widgets: widgets as usize,
                updated_at: updated_at as u64,
            });
        }
        Ok(out)
    }

    fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let n = self
            .conn
            .lock()
            .execute("DELETE FROM documents WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::{Block, BlockKind};

    #[test]
    fn test_document_crud() {
        let store = SqliteStore::in_memory().unwrap();
        let mut doc = Document::new("resume");
        doc.main.push(Block::new(BlockKind::Experience, "Work", 0));

        store.save(&doc).unwrap();
        let loaded = store.load(&doc.id).unwrap().unwrap();
        assert_eq!(loaded, doc);

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "resume");
        assert_eq!(list[0].sections, 1);

        assert!(store.delete(&doc.id).unwrap());
        assert!(store.load(&doc.id).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = SqliteStore::in_memory().unwrap();
        let mut doc = Document::new("v1");
        store.save(&doc).unwrap();
        doc.name = "v2".into();
        store.save(&doc).unwrap();

        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "v2");
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.db");
        let doc = Document::new("persisted");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.save(&doc).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load(&doc.id).unwrap(), Some(doc));
    }
}
