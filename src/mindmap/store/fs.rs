use super::MapStore;
use crate::codec;
use crate::error::{MindmapError, Result};
use crate::tree::TreeStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const MAP_EXT: &str = "json";
const TITLE_FILENAME_LIMIT: usize = 50;

/// A map stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(MindmapError::Io)?;
            }
        }
        Ok(())
    }
}

impl MapStore for FileStore {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<Option<TreeStore>> {
        if !self.path.exists() {
            return Ok(None);
        }
        if !self.path.is_file() {
            return Err(MindmapError::Format(format!(
                "Path '{}' is not a file.",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path).map_err(MindmapError::Io)?;
        let tree = codec::from_json(&content)?;
        debug!(path = %self.path.display(), nodes = tree.len(), "loaded map");
        Ok(Some(tree))
    }

    fn save(&mut self, tree: &TreeStore) -> Result<()> {
        self.ensure_parent_dir()?;
        let content = codec::to_json(tree)?;

        // Write next to the target, then rename over it.
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        let tmp_file = dir.join(format!(".map-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(MindmapError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(MindmapError::Io(e));
        }

        debug!(path = %self.path.display(), nodes = tree.len(), "saved map");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Sorted names of the `.json` maps in `dir` (config file excluded).
pub fn list_maps(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(MindmapError::Io)? {
        let path = entry.map_err(MindmapError::Io)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(MAP_EXT) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name != crate::config::CONFIG_FILENAME {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// File name for a map created from a title: unsafe characters become `_`.
pub fn filename_for_title(title: &str) -> String {
    let sanitized: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(TITLE_FILENAME_LIMIT)
        .collect();
    let base = if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    };
    format!("{base}.{MAP_EXT}")
}

/// Resolves what the user typed into a map path: a listed name, a name
/// without the extension, or otherwise a path of its own.
pub fn resolve_map_path(dir: &Path, input: &str) -> PathBuf {
    let listed = list_maps(dir).unwrap_or_default();
    if listed.iter().any(|name| name == input) {
        return dir.join(input);
    }
    let with_ext = format!("{input}.{MAP_EXT}");
    if listed.contains(&with_ext) {
        return dir.join(with_ext);
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_directories_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("map.json"));

        let mut tree = TreeStore::new();
        let card = tree.create_root("Card").id.clone();
        tree.add_child(card.as_str(), "Child");
        store.save(&tree).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap().unwrap(), tree);

        // No temp files left behind.
        for entry in fs::read_dir(dir.path().join("nested")).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(!name.to_string_lossy().ends_with(".tmp"));
        }
    }

    #[test]
    fn empty_file_is_an_empty_map() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "").unwrap();
        let tree = FileStore::new(&path).load().unwrap().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn directory_is_not_a_map() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.load(), Err(MindmapError::Format(_))));
    }

    #[test]
    fn lists_json_maps_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        assert_eq!(list_maps(dir.path()).unwrap(), vec!["a.json", "b.json"]);
        assert!(list_maps(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn title_filenames_are_sanitized() {
        assert_eq!(filename_for_title("My Plans!"), "My_Plans_.json");
        assert_eq!(filename_for_title("   "), "untitled.json");
        let long = "x".repeat(80);
        assert_eq!(filename_for_title(&long), format!("{}.json", "x".repeat(50)));
    }

    #[test]
    fn resolves_listed_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("work.json"), "{}").unwrap();
        assert_eq!(resolve_map_path(dir.path(), "work"), dir.path().join("work.json"));
        assert_eq!(
            resolve_map_path(dir.path(), "work.json"),
            dir.path().join("work.json")
        );
        assert_eq!(
            resolve_map_path(dir.path(), "other/place.json"),
            PathBuf::from("other/place.json")
        );
    }
}
