// ── File discovery ───────────────────────────────────────────────────────────

use crate::outbox::error::FatalError;
use crate::outbox::types::Candidate;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively enumerate the regular files under `root`, in whatever order
/// the filesystem yields them. Directories, symlinks and special files are
/// skipped; unreadable subtrees are silently dropped from the walk.
pub fn discover(root: &Path) -> Result<Vec<Candidate>, FatalError> {
    if !root.is_dir() {
        return Err(FatalError::DirectoryNotFound(root.display().to_string()));
    }

    let candidates = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| Candidate::from_path(entry.path()))
        .collect();

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    #[test]
    fn finds_regular_files_at_all_depths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"a").unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        fs::write(dir.path().join("nested/b.txt"), b"b").unwrap();
        fs::write(dir.path().join("nested/deeper/c"), b"c").unwrap();

        let found: HashSet<String> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|c| c.file_name)
            .collect();

        assert_eq!(
            found,
            HashSet::from(["a.csv".to_string(), "b.txt".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn directories_are_not_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("only_a_dir")).unwrap();

        let found = discover(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_root_is_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = discover(&missing).unwrap_err();
        assert!(matches!(err, FatalError::DirectoryNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("outside.csv"), b"x").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let found = discover(dir.path()).unwrap();
        assert!(found.is_empty());
    }
}
