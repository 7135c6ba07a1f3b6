use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// One filesystem entry in a tree snapshot.
///
/// `children` is only present for directories that yielded at least one
/// child node; it is omitted from the JSON otherwise.
#[derive(Debug, Serialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("failed to stat {path}: {source}")]
    Stat {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: String,
        source: std::io::Error,
    },
}

/// Recursively materialize the directory (or single file) at `path`.
///
/// Errors on `path` itself are returned to the caller. Errors while
/// walking an entry below it (unreadable subdirectory, broken symlink)
/// drop that entry from `children` without failing the parent.
///
/// Children appear in `read_dir` order; no sort is applied. The walk has
/// no depth limit and no cycle detection, so a symlink loop will recurse
/// until the stack runs out.
pub fn build_tree(path: &str) -> Result<FileNode, TreeError> {
    let metadata = fs::metadata(path).map_err(|source| TreeError::Stat {
        path: path.to_string(),
        source,
    })?;

    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        // No base name for paths like "/" or "."; fall back to the path itself
        .unwrap_or_else(|| path.to_string());

    let mut node = FileNode {
        name,
        path: path.to_string(),
        is_dir: metadata.is_dir(),
        children: None,
    };

    if metadata.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| TreeError::ReadDir {
            path: path.to_string(),
            source,
        })?;

        let mut children = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { continue };
            let child_path = Path::new(path).join(entry.file_name());
            match build_tree(&child_path.to_string_lossy()) {
                Ok(child) => children.push(child),
                Err(err) => debug!("skipping {}: {}", child_path.display(), err),
            }
        }

        if !children.is_empty() {
            node.children = Some(children);
        }
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_file_builds_leaf_node() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("note.txt");
        std::fs::write(&file_path, "hello").unwrap();

        let node = build_tree(&path_str(&file_path)).unwrap();

        assert_eq!(node.name, "note.txt");
        assert_eq!(node.path, path_str(&file_path));
        assert!(!node.is_dir);
        assert!(node.children.is_none());
    }

    #[test]
    fn test_empty_directory_omits_children_field() {
        let temp_dir = TempDir::new().unwrap();

        let node = build_tree(&path_str(temp_dir.path())).unwrap();
        assert!(node.is_dir);
        assert!(node.children.is_none());

        // The field must be absent from the wire format, not null or []
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("children").is_none());
        assert_eq!(value.get("isDir"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_nested_directory_structure() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::create_dir(root.join("b")).unwrap();
        std::fs::write(root.join("b").join("c.txt"), "c").unwrap();

        let node = build_tree(&path_str(root)).unwrap();
        assert!(node.is_dir);

        let children = node.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);

        // Enumeration order is not guaranteed; look children up by name
        let a = children.iter().find(|c| c.name == "a.txt").unwrap();
        assert!(!a.is_dir);
        assert!(a.children.is_none());

        let b = children.iter().find(|c| c.name == "b").unwrap();
        assert!(b.is_dir);
        assert_eq!(b.path, path_str(&root.join("b")));

        let b_children = b.children.as_ref().unwrap();
        assert_eq!(b_children.len(), 1);
        assert_eq!(b_children[0].name, "c.txt");
        assert!(!b_children[0].is_dir);
        assert!(b_children[0].children.is_none());
    }

    #[test]
    fn test_missing_root_fails_with_stat_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = build_tree(&path_str(&missing));
        assert!(matches!(result, Err(TreeError::Stat { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_omitted() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join("visible.txt"), "ok").unwrap();
        let locked = root.join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("hidden.txt"), "secret").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root; permission bits are not enforced
        if std::fs::read_dir(&locked).is_ok() {
            return;
        }

        let node = build_tree(&path_str(root)).unwrap();

        let children = node.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "visible.txt");

        // Restore so TempDir can clean up
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_fails_with_read_dir_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root; permission bits are not enforced
        if std::fs::read_dir(&locked).is_ok() {
            return;
        }

        // Fatal at the top-level call, unlike the nested case above
        let result = build_tree(&path_str(&locked));
        assert!(matches!(result, Err(TreeError::ReadDir { .. })));

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_repeated_walks_are_structurally_identical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::create_dir(root.join("b")).unwrap();
        std::fs::write(root.join("b").join("c.txt"), "c").unwrap();

        let first = build_tree(&path_str(root)).unwrap();
        let second = build_tree(&path_str(root)).unwrap();

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }
}
