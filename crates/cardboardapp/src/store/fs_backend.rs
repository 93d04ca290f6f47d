use super::backend::{Collection, Document, DocumentBackend, Query};
use crate::error::{CardboardError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem document backend: one JSON file per document.
///
/// ```text
/// <root>/
/// ├── spaces/{id}.json
/// └── topics/
///     ├── {topicId}.json
///     └── {topicId}/flashcards/{id}.json
/// ```
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &Collection) -> Result<PathBuf> {
        if let Collection::Flashcards { topic_id } = collection {
            check_id(topic_id)?;
        }
        Ok(self.root.join(collection.path()))
    }

    fn doc_path(&self, collection: &Collection, id: &str) -> Result<PathBuf> {
        check_id(id)?;
        Ok(self.collection_dir(collection)?.join(format!("{}.json", id)))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(CardboardError::Io)?;
        }
        Ok(())
    }

    /// Removes `topics/{id}/flashcards/` and then `topics/{id}/` once they
    /// are empty. The card is already gone, so failures here only log.
    fn prune_card_dirs(&self, collection: &Collection) -> Result<()> {
        let cards_dir = self.collection_dir(collection)?;
        let mut dirs = vec![cards_dir.clone()];
        dirs.extend(cards_dir.parent().map(Path::to_path_buf));
        for dir in dirs {
            let empty = fs::read_dir(&dir).map_or(false, |mut entries| entries.next().is_none());
            if !empty {
                break;
            }
            if let Err(error) = fs::remove_dir(&dir) {
                tracing::debug!(dir = %dir.display(), %error, "left directory in place");
                break;
            }
        }
        Ok(())
    }

    fn read_doc(&self, path: &Path) -> Result<Document> {
        let content = fs::read_to_string(path).map_err(CardboardError::Io)?;
        let doc: Document =
            serde_json::from_str(&content).map_err(CardboardError::Serialization)?;
        Ok(doc)
    }

    fn write_doc(&self, collection: &Collection, id: &str, doc: &Document) -> Result<()> {
        let dir = self.collection_dir(collection)?;
        self.ensure_dir(&dir)?;
        let target = self.doc_path(collection, id)?;
        let content = serde_json::to_string_pretty(doc).map_err(CardboardError::Serialization)?;

        // Atomic Write
        let tmp_path = dir.join(format!(".doc-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(CardboardError::Io)?;
        fs::rename(&tmp_path, target).map_err(CardboardError::Io)?;
        Ok(())
    }
}

/// Document ids become file names, so they must be a single safe path component.
fn check_id(id: &str) -> Result<()> {
    let unsafe_id = id.is_empty()
        || id == "."
        || id == ".."
        || id.starts_with('.')
        || id.contains(['/', '\\', '\0']);
    if unsafe_id {
        return Err(CardboardError::Store(format!("Invalid document id: {:?}", id)));
    }
    Ok(())
}

impl DocumentBackend for FsBackend {
    fn get(&self, collection: &Collection, id: &str) -> Result<Option<Document>> {
        let path = self.doc_path(collection, id)?;
        if !path.exists() {
            return Ok(None);
        }
        self.read_doc(&path).map(Some)
    }

    fn list(&self, collection: &Collection, query: &Query) -> Result<Vec<(String, Document)>> {
        let dir = self.collection_dir(collection)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(&dir).map_err(CardboardError::Io)? {
            let path = entry.map_err(CardboardError::Io)?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if id.starts_with('.') {
                continue;
            }
            found.push((id.to_string(), self.read_doc(&path)?));
        }
        query.apply(&mut found);
        Ok(found)
    }

    fn set(&self, collection: &Collection, id: &str, doc: &Document) -> Result<()> {
        self.write_doc(collection, id, doc)
    }

    fn update(&self, collection: &Collection, id: &str, partial: &Document) -> Result<()> {
        let mut existing =
            self.get(collection, id)?
                .ok_or_else(|| CardboardError::DocumentNotFound {
                    collection: collection.path(),
                    id: id.to_string(),
                })?;
        for (key, value) in partial {
            existing.insert(key.clone(), value.clone());
        }
        self.write_doc(collection, id, &existing)
    }

    fn delete(&self, collection: &Collection, id: &str) -> Result<()> {
        let path = self.doc_path(collection, id)?;
        if path.exists() {
            fs::remove_file(path).map_err(CardboardError::Io)?;
        }
        if let Collection::Flashcards { .. } = collection {
            self.prune_card_dirs(collection)?;
        }
        Ok(())
    }
}
