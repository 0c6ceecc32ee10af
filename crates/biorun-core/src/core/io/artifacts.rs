use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How many produced files are named individually in a run summary.
pub const PREVIEW_LIMIT: usize = 3;

/// Lists regular files under `dir` whose extension is one of `extensions`, sorted by path.
///
/// With `recursive == false` only direct children are considered. A missing directory yields
/// an empty list.
pub fn find_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.contains(&ext))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Every regular file inside `dir`, sorted by path. Directories themselves are not listed.
pub fn list_files(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// A truncated view of a file list: the first few names plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub shown: Vec<String>,
    pub remaining: usize,
    pub total: usize,
}

impl Preview {
    pub fn of(files: &[PathBuf], limit: usize) -> Self {
        let shown = files
            .iter()
            .take(limit)
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .collect();
        Self {
            shown,
            remaining: files.len().saturating_sub(limit),
            total: files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn find_files_filters_by_extension_and_depth() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("b.pdb"), "").unwrap();
        fs::write(root.join("a.pdb"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("nested/c.pdb"), "").unwrap();

        let flat = find_files(root, &["pdb"], false);
        assert_eq!(flat, vec![root.join("a.pdb"), root.join("b.pdb")]);

        let deep = find_files(root, &["pdb"], true);
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&root.join("nested/c.pdb")));
    }

    #[test]
    fn find_files_on_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        assert!(find_files(&dir.path().join("absent"), &["fa"], true).is_empty());
    }

    #[test]
    fn list_files_skips_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("seqs")).unwrap();
        fs::write(dir.path().join("x.fa"), "").unwrap();
        fs::write(dir.path().join("seqs/y.fa"), "").unwrap();
        assert_eq!(list_files(dir.path(), false), vec![dir.path().join("x.fa")]);
        assert_eq!(list_files(dir.path(), true).len(), 2);
    }

    #[test]
    fn preview_truncates_and_counts_the_rest() {
        let files: Vec<PathBuf> = (1..=5)
            .map(|i| PathBuf::from(format!("/out/model_{}.pdb", i)))
            .collect();
        let preview = Preview::of(&files, PREVIEW_LIMIT);
        assert_eq!(preview.shown, vec!["model_1.pdb", "model_2.pdb", "model_3.pdb"]);
        assert_eq!(preview.remaining, 2);
        assert_eq!(preview.total, 5);

        let short = Preview::of(&files[..2], PREVIEW_LIMIT);
        assert_eq!(short.remaining, 0);
        assert!(Preview::of(&[], PREVIEW_LIMIT).is_empty());
    }
}
