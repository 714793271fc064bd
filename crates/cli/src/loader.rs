//! Plain-text document loading for ingestion
//!
//! A path is either a single UTF-8 file (any extension) or a directory,
//! walked recursively for `*.txt` / `*.md` files in path order.

use anyhow::{bail, Context, Result};
use docgraph_text_chunker::Metadata;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub doc_id: String,
    pub text: String,
    pub metadata: Metadata,
}

/// Load every document under `path`.
///
/// `doc_id` overrides the file-stem id and is only accepted for a single file.
/// Two files of one directory that share a stem are an error, since both
/// would ingest as the same document.
pub fn load_documents(path: &Path, doc_id: Option<&str>) -> Result<Vec<LoadedDocument>> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        return Ok(vec![load_file(path, doc_id)?]);
    }

    if doc_id.is_some() {
        bail!("doc_id can only be set when ingesting a single file");
    }

    let files = text_files(path)?;
    if files.is_empty() {
        log::warn!("No .txt or .md files under {}", path.display());
    }
    let docs = files
        .iter()
        .map(|file| load_file(file, None))
        .collect::<Result<Vec<_>>>()?;

    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for (doc, file) in docs.iter().zip(&files) {
        if let Some(first) = seen.insert(doc.doc_id.as_str(), file) {
            bail!(
                "Duplicate document id {}: {} and {}",
                doc.doc_id,
                first.display(),
                file.display()
            );
        }
    }
    Ok(docs)
}

fn text_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && has_text_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn load_file(path: &Path, doc_id: Option<&str>) -> Result<LoadedDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let doc_id = match doc_id {
        Some(id) => id.to_string(),
        None if stem.is_empty() => bail!("Cannot derive a document id from {}", path.display()),
        None => stem.clone(),
    };

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let mut metadata = Metadata::new();
    metadata.insert("filename".into(), Value::from(filename));
    metadata.insert(
        "filepath".into(),
        Value::from(path.to_string_lossy().into_owned()),
    );
    metadata.insert("title".into(), Value::from(stem));

    Ok(LoadedDocument {
        doc_id,
        text,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn single_file_uses_stem_as_id() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tender_rules.txt");
        fs::write(&file, "Section 1 applies.").unwrap();

        let docs = load_documents(&file, None).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_id, "tender_rules");
        assert_eq!(docs[0].metadata["filename"], "tender_rules.txt");
        assert_eq!(docs[0].metadata["title"], "tender_rules");
    }

    #[test]
    fn explicit_id_wins_for_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let docs = load_documents(&file, Some("rules-2024")).unwrap();
        assert_eq!(docs[0].doc_id, "rules-2024");
    }

    #[test]
    fn directory_walk_filters_by_extension_in_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.MD"), "a").unwrap();
        fs::write(dir.path().join("skip.pdf"), "binary").unwrap();
        fs::write(dir.path().join("nested").join("c.md"), "c").unwrap();

        let ids: Vec<_> = load_documents(dir.path(), None)
            .unwrap()
            .into_iter()
            .map(|d| d.doc_id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn shared_stems_in_one_directory_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("a").join("rules.txt"), "Old.").unwrap();
        fs::write(dir.path().join("b").join("rules.md"), "New.").unwrap();

        let err = load_documents(dir.path(), None).unwrap_err().to_string();

        assert!(err.contains("Duplicate document id rules"), "{err}");
        assert!(err.contains("rules.txt") && err.contains("rules.md"), "{err}");
    }

    #[test]
    fn directory_rejects_explicit_id() {
        let dir = TempDir::new().unwrap();
        assert!(load_documents(dir.path(), Some("x")).is_err());
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = load_documents(Path::new("/no/such/file.txt"), None).unwrap_err();
        assert!(err.to_string().contains("Path does not exist"));
    }
}
