//! Access to file trees at named points in version history.
//!
//! The aggregator only needs two questions answered: which files exist at a
//! checkpoint, and what a given file contained there. [`History`] captures
//! exactly that, with a git implementation backed by `gix` and an in-memory
//! one for tests and for running without a repository.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::TaglocError;
use crate::Result;

/// Read-only view of file trees at arbitrary references.
pub trait History {
    /// All non-directory paths present at `reference`, `/`-separated and
    /// relative to the tree root.
    ///
    /// Fails with [`TaglocError::CheckpointNotFound`] when the reference
    /// does not resolve.
    fn list_files(&self, reference: &str) -> Result<Vec<String>>;

    /// Full text content of `path` as of `reference`.
    fn read_file(&self, reference: &str, path: &str) -> Result<String>;
}

/// [`History`] over a git repository.
///
/// References go through rev-parse and are peeled to trees, so lightweight
/// tags, annotated tags, branches and commit ids are all accepted.
pub struct GitHistory {
    repo: gix::Repository,
}

/// What a tree entry points at, as far as reading content is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Tree,
    /// Gitlink to a commit in another repository
    Submodule,
    /// Regular file, executable or symlink
    Blob,
}

struct FoundEntry {
    kind: EntryKind,
    oid: gix::ObjectId,
}

impl GitHistory {
    /// Open the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = gix::discover(path.as_ref()).map_err(|e| {
            TaglocError::Git(format!("Failed to discover git repository: {}", e))
        })?;
        Ok(Self { repo })
    }

    /// Resolve a reference to the root tree it points at.
    fn resolve_tree(&self, reference: &str) -> Result<gix::Tree<'_>> {
        let not_found = |message: String| TaglocError::CheckpointNotFound {
            reference: reference.to_string(),
            message,
        };

        let id = self
            .repo
            .rev_parse_single(reference.as_bytes())
            .map_err(|e| not_found(e.to_string()))?;

        id.object()
            .map_err(|e| not_found(e.to_string()))?
            .peel_to_tree()
            .map_err(|e| not_found(e.to_string()))
    }

    fn find_tree(&self, oid: gix::ObjectId) -> Result<gix::Tree<'_>> {
        self.repo
            .find_object(oid)
            .map_err(|e| TaglocError::Git(format!("Failed to find tree: {}", e)))?
            .try_into_tree()
            .map_err(|_| TaglocError::Git(format!("Object {} is not a tree", oid)))
    }

    /// Recursively collect every non-tree entry below `tree`.
    fn collect_files(
        &self,
        tree: &gix::Tree<'_>,
        prefix: &str,
        files: &mut Vec<String>,
    ) -> Result<()> {
        for entry in tree.iter() {
            let entry = entry
                .map_err(|e| TaglocError::Git(format!("Failed to read tree entry: {}", e)))?;

            let name = entry.filename().to_string();
            let path = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };

            if entry.mode().is_tree() {
                let subtree = self.find_tree(entry.oid().to_owned())?;
                self.collect_files(&subtree, &path, files)?;
            } else {
                files.push(path);
            }
        }
        Ok(())
    }

    fn read_blob(&self, oid: gix::ObjectId, reference: &str, path: &str) -> Result<String> {
        let blob = self
            .repo
            .find_object(oid)
            .map_err(|e| TaglocError::Git(format!("Failed to find object {}: {}", oid, e)))?
            .try_into_blob()
            .map_err(|_| TaglocError::NotAFile {
                reference: reference.to_string(),
                path: path.to_string(),
            })?;

        String::from_utf8(blob.data.to_vec()).map_err(|_| TaglocError::NotText {
            reference: reference.to_string(),
            path: path.to_string(),
        })
    }
}

/// Find a direct child of `tree` by name.
fn find_entry(tree: &gix::Tree<'_>, name: &str) -> Result<Option<FoundEntry>> {
    for entry in tree.iter() {
        let entry = entry
            .map_err(|e| TaglocError::Git(format!("Failed to read tree entry: {}", e)))?;

        if entry.filename() != name {
            continue;
        }

        let mode = entry.mode();
        let kind = if mode.is_tree() {
            EntryKind::Tree
        } else if mode.is_commit() {
            EntryKind::Submodule
        } else {
            EntryKind::Blob
        };

        return Ok(Some(FoundEntry {
            kind,
            oid: entry.oid().to_owned(),
        }));
    }
    Ok(None)
}

impl History for GitHistory {
    fn list_files(&self, reference: &str) -> Result<Vec<String>> {
        let tree = self.resolve_tree(reference)?;
        let mut files = Vec::new();
        self.collect_files(&tree, "", &mut files)?;
        Ok(files)
    }

    fn read_file(&self, reference: &str, path: &str) -> Result<String> {
        let not_found = || TaglocError::FileNotFound {
            reference: reference.to_string(),
            path: path.to_string(),
        };

        let mut tree = self.resolve_tree(reference)?;
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();

        while let Some(name) = components.next() {
            let found = find_entry(&tree, name)?.ok_or_else(not_found)?;
            let is_last = components.peek().is_none();

            match (is_last, found.kind) {
                (false, EntryKind::Tree) => tree = self.find_tree(found.oid)?,
                (false, _) => return Err(not_found()),
                (true, EntryKind::Blob) => return self.read_blob(found.oid, reference, path),
                (true, _) => {
                    return Err(TaglocError::NotAFile {
                        reference: reference.to_string(),
                        path: path.to_string(),
                    })
                }
            }
        }

        Err(not_found())
    }
}

/// [`History`] held entirely in memory.
///
/// Each checkpoint is a flat map from path to content. A `None` content
/// marks an entry that is listed but cannot be read, the way a submodule
/// shows up in a real tree.
///
/// ```rust
/// use tagloclib::{History, MemoryHistory};
///
/// let history = MemoryHistory::new()
///     .checkpoint("v1", [("README.md", "hello\n")])
///     .unreadable("v1", "vendor/lib");
///
/// assert_eq!(history.list_files("v1").unwrap(), vec!["README.md", "vendor/lib"]);
/// assert!(history.read_file("v1", "vendor/lib").is_err());
/// assert!(history.list_files("v2").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    checkpoints: HashMap<String, BTreeMap<String, Option<String>>>,
}

impl MemoryHistory {
    /// Create a history with no checkpoints; every reference is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add files to a checkpoint, creating it if needed.
    pub fn checkpoint<P, C>(
        mut self,
        reference: &str,
        files: impl IntoIterator<Item = (P, C)>,
    ) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        let tree = self.checkpoints.entry(reference.to_string()).or_default();
        for (path, content) in files {
            tree.insert(path.into(), Some(content.into()));
        }
        self
    }

    /// Add an entry that is listed at `reference` but fails to read.
    pub fn unreadable(mut self, reference: &str, path: &str) -> Self {
        self.checkpoints
            .entry(reference.to_string())
            .or_default()
            .insert(path.to_string(), None);
        self
    }

    fn tree(&self, reference: &str) -> Result<&BTreeMap<String, Option<String>>> {
        self.checkpoints
            .get(reference)
            .ok_or_else(|| TaglocError::CheckpointNotFound {
                reference: reference.to_string(),
                message: "unknown reference".to_string(),
            })
    }
}

impl History for MemoryHistory {
    fn list_files(&self, reference: &str) -> Result<Vec<String>> {
        Ok(self.tree(reference)?.keys().cloned().collect())
    }

    fn read_file(&self, reference: &str, path: &str) -> Result<String> {
        match self.tree(reference)?.get(path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(TaglocError::NotAFile {
                reference: reference.to_string(),
                path: path.to_string(),
            }),
            None => Err(TaglocError::FileNotFound {
                reference: reference.to_string(),
                path: path.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::{tempdir, TempDir};

    fn git(dir: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=tagloc",
                "-c",
                "user.email=tagloc@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
                "-c",
                "init.defaultBranch=main",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Two-commit repository: `baseline` (lightweight) and `v2` (annotated).
    /// Returns `None` when the git binary is unavailable.
    fn fixture_repo() -> Option<TempDir> {
        let dir = tempdir().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"])?;

        fs::write(root.join("README.md"), "one\ntwo\nthree").unwrap();
        fs::create_dir_all(root.join("cmd/server")).unwrap();
        fs::write(root.join("cmd/server/main.go"), "package main\n").unwrap();
        git(root, &["add", "-A"])?;
        git(root, &["commit", "-q", "-m", "baseline"])?;
        git(root, &["tag", "baseline"])?;

        fs::write(root.join("init.sql"), "CREATE TABLE t();\n").unwrap();
        fs::write(root.join("logo.bin"), [0xffu8, 0xfe, 0x00, 0x81]).unwrap();
        fs::remove_file(root.join("README.md")).unwrap();
        let head = git(root, &["rev-parse", "HEAD"])?;
        git(root, &["add", "-A"])?;
        git(
            root,
            &["update-index", "--add", "--cacheinfo", &format!("160000,{},vendor/lib", head)],
        )?;
        git(root, &["commit", "-q", "-m", "second"])?;
        git(root, &["tag", "-a", "v2", "-m", "second milestone"])?;

        Some(dir)
    }

    #[test]
    fn test_git_list_files_at_tag() {
        let Some(dir) = fixture_repo() else { return };
        let history = GitHistory::discover(dir.path()).unwrap();

        let files = history.list_files("baseline").unwrap();
        assert_eq!(files, vec!["README.md", "cmd/server/main.go"]);
    }

    #[test]
    fn test_git_list_files_at_annotated_tag_includes_submodule() {
        let Some(dir) = fixture_repo() else { return };
        let history = GitHistory::discover(dir.path()).unwrap();

        let files = history.list_files("v2").unwrap();
        assert!(files.contains(&"init.sql".to_string()));
        assert!(files.contains(&"vendor/lib".to_string()));
        assert!(!files.contains(&"README.md".to_string()));
    }

    #[test]
    fn test_git_read_file_at_tag() {
        let Some(dir) = fixture_repo() else { return };
        let history = GitHistory::discover(dir.path()).unwrap();

        assert_eq!(
            history.read_file("baseline", "README.md").unwrap(),
            "one\ntwo\nthree"
        );
        assert_eq!(
            history.read_file("baseline", "cmd/server/main.go").unwrap(),
            "package main\n"
        );
    }

    #[test]
    fn test_git_read_errors_are_distinguishable() {
        let Some(dir) = fixture_repo() else { return };
        let history = GitHistory::discover(dir.path()).unwrap();

        assert!(matches!(
            history.read_file("v2", "README.md"),
            Err(TaglocError::FileNotFound { .. })
        ));
        assert!(matches!(
            history.read_file("v2", "cmd/server"),
            Err(TaglocError::NotAFile { .. })
        ));
        assert!(matches!(
            history.read_file("v2", "vendor/lib"),
            Err(TaglocError::NotAFile { .. })
        ));
        assert!(matches!(
            history.read_file("v2", "logo.bin"),
            Err(TaglocError::NotText { .. })
        ));
        assert!(matches!(
            history.read_file("v2", "init.sql/nested"),
            Err(TaglocError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_git_unknown_reference() {
        let Some(dir) = fixture_repo() else { return };
        let history = GitHistory::discover(dir.path()).unwrap();

        assert!(matches!(
            history.list_files("no-such-tag"),
            Err(TaglocError::CheckpointNotFound { .. })
        ));
        assert!(matches!(
            history.read_file("no-such-tag", "README.md"),
            Err(TaglocError::CheckpointNotFound { .. })
        ));
    }

    #[test]
    fn test_git_discover_outside_repository() {
        let dir = tempdir().unwrap();
        let result = GitHistory::discover(dir.path().join("missing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_memory_history_lists_sorted_paths() {
        let history = MemoryHistory::new().checkpoint(
            "v1",
            [("src/main.go", "package main"), ("README.md", "# hi")],
        );

        assert_eq!(
            history.list_files("v1").unwrap(),
            vec!["README.md", "src/main.go"]
        );
    }

    #[test]
    fn test_memory_history_read() {
        let history = MemoryHistory::new()
            .checkpoint("v1", [("a.txt", "x\ny")])
            .unreadable("v1", "vendor/lib");

        assert_eq!(history.read_file("v1", "a.txt").unwrap(), "x\ny");
        assert!(matches!(
            history.read_file("v1", "vendor/lib"),
            Err(TaglocError::NotAFile { .. })
        ));
        assert!(matches!(
            history.read_file("v1", "b.txt"),
            Err(TaglocError::FileNotFound { .. })
        ));
        assert!(matches!(
            history.read_file("v2", "a.txt"),
            Err(TaglocError::CheckpointNotFound { .. })
        ));
    }

    #[test]
    fn test_memory_history_checkpoints_are_independent() {
        let history = MemoryHistory::new()
            .checkpoint("v1", [("a.txt", "1")])
            .checkpoint("v2", [("b.txt", "2")])
            .checkpoint("v1", [("c.txt", "3")]);

        assert_eq!(history.list_files("v1").unwrap(), vec!["a.txt", "c.txt"]);
        assert_eq!(history.list_files("v2").unwrap(), vec!["b.txt"]);
    }
}
