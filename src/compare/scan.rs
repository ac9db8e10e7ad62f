//! Build a `FolderComparison` by walking two directory trees side by side.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::compare::direction::{redetermine, SyncVariant};
use crate::compare::model::{Category, ContainerRef, FolderComparison};
use crate::error::{AppError, Result};

/// Modification times closer than this count as equal (FAT precision).
const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

/// One pair of roots to compare. Either side may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPairSpec {
    pub left: Option<PathBuf>,
    pub right: Option<PathBuf>,
}

impl FolderPairSpec {
    pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        Self {
            left: Some(left.into()),
            right: Some(right.into()),
        }
    }
}

#[derive(Debug, Clone)]
enum EntryKind {
    File {
        size: u64,
        modified: Option<SystemTime>,
    },
    Directory,
    Symlink {
        target: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    path: PathBuf,
    kind: EntryKind,
}

impl Entry {
    fn new(path: PathBuf) -> Result<Self> {
        let metadata = fs::symlink_metadata(&path)?;
        let kind = if metadata.is_symlink() {
            EntryKind::Symlink {
                target: fs::read_link(&path).ok(),
            }
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File {
                size: metadata.len(),
                modified: metadata.modified().ok(),
            }
        };
        Ok(Self { path, kind })
    }

    fn size(&self) -> u64 {
        match self.kind {
            EntryKind::File { size, .. } => size,
            _ => 0,
        }
    }
}

/// Compare every folder pair and assign sync directions for `variant`.
///
/// Pairs with both sides missing are kept as null pairs; the view drops them.
pub fn compare_folder_pairs(pairs: &[FolderPairSpec], variant: SyncVariant) -> Result<FolderComparison> {
    let start = Instant::now();
    let mut cmp = FolderComparison::new();

    for pair in pairs {
        for path in [&pair.left, &pair.right].into_iter().flatten() {
            if !path.is_dir() {
                return Err(AppError::InvalidPath(format!(
                    "{} is not a directory",
                    path.display()
                )));
            }
        }

        let base = cmp.add_base_pair(pair.left.clone(), pair.right.clone());
        let left = read_entries(pair.left.as_deref())?;
        let right = read_entries(pair.right.as_deref())?;
        compare_entries(&mut cmp, ContainerRef::Base(base), left, right);
    }

    redetermine(&mut cmp, &variant.directions());

    tracing::info!(
        pairs = pairs.len(),
        items = cmp.item_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        variant = variant.label(),
        "folder comparison finished"
    );
    Ok(cmp)
}

/// Read the immediate children of `dir`, keyed and ordered by name.
///
/// Entries whose metadata can't be read are skipped.
fn read_entries(dir: Option<&Path>) -> Result<BTreeMap<String, Entry>> {
    let mut entries = BTreeMap::new();
    let Some(dir) = dir else {
        return Ok(entries);
    };

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        match Entry::new(entry.path()) {
            Ok(e) => {
                entries.insert(entry.file_name().to_string_lossy().to_string(), e);
            }
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), %err, "skipping unreadable entry");
            }
        }
    }
    Ok(entries)
}

/// Like `read_entries`, but a subfolder that can't be listed counts as empty.
fn read_sub_entries(dir: Option<&Path>) -> BTreeMap<String, Entry> {
    read_entries(dir).unwrap_or_else(|err| {
        tracing::debug!(?dir, %err, "skipping unreadable folder");
        BTreeMap::new()
    })
}

fn compare_entries(
    cmp: &mut FolderComparison,
    parent: ContainerRef,
    mut left: BTreeMap<String, Entry>,
    mut right: BTreeMap<String, Entry>,
) {
    let mut names: Vec<String> = left.keys().chain(right.keys()).cloned().collect();
    names.sort();
    names.dedup();

    for name in names {
        match (left.remove(&name), right.remove(&name)) {
            (Some(l), None) => add_one_sided(cmp, parent, &name, l, Category::LeftSideOnly),
            (None, Some(r)) => add_one_sided(cmp, parent, &name, r, Category::RightSideOnly),
            (Some(l), Some(r)) => add_both_sided(cmp, parent, &name, l, r),
            (None, None) => {}
        }
    }
}

fn add_one_sided(
    cmp: &mut FolderComparison,
    parent: ContainerRef,
    name: &str,
    entry: Entry,
    category: Category,
) {
    let (size_left, size_right) = match category {
        Category::LeftSideOnly => (entry.size(), 0),
        _ => (0, entry.size()),
    };
    match entry.kind {
        EntryKind::Directory => {
            let folder = cmp.add_folder(parent, name, category);
            let children = read_sub_entries(Some(&entry.path));
            let (left, right) = match category {
                Category::LeftSideOnly => (children, BTreeMap::new()),
                _ => (BTreeMap::new(), children),
            };
            compare_entries(cmp, ContainerRef::Folder(folder), left, right);
        }
        EntryKind::File { .. } => {
            cmp.add_file(parent, name, category, size_left, size_right);
        }
        EntryKind::Symlink { .. } => {
            cmp.add_symlink(parent, name, category);
        }
    }
}

fn add_both_sided(cmp: &mut FolderComparison, parent: ContainerRef, name: &str, l: Entry, r: Entry) {
    match (&l.kind, &r.kind) {
        (EntryKind::Directory, EntryKind::Directory) => {
            let folder = cmp.add_folder(parent, name, Category::Equal);
            let left = read_sub_entries(Some(&l.path));
            let right = read_sub_entries(Some(&r.path));
            compare_entries(cmp, ContainerRef::Folder(folder), left, right);
        }
        (
            EntryKind::File {
                size: size_l,
                modified: mod_l,
            },
            EntryKind::File {
                size: size_r,
                modified: mod_r,
            },
        ) => {
            let category = file_category(*size_l, *mod_l, *size_r, *mod_r);
            cmp.add_file(parent, name, category, *size_l, *size_r);
        }
        (EntryKind::Symlink { target: tl }, EntryKind::Symlink { target: tr }) => {
            let category = if tl == tr {
                Category::Equal
            } else {
                Category::DifferentContent
            };
            cmp.add_symlink(parent, name, category);
        }
        // Type mismatch: shown as a conflicting file, folder contents are not listed.
        _ => {
            cmp.add_file(parent, name, Category::Conflict, l.size(), r.size());
        }
    }
}

fn file_category(
    size_l: u64,
    modified_l: Option<SystemTime>,
    size_r: u64,
    modified_r: Option<SystemTime>,
) -> Category {
    let (Some(time_l), Some(time_r)) = (modified_l, modified_r) else {
        return if size_l == size_r {
            Category::Equal
        } else {
            Category::DifferentContent
        };
    };

    let delta = match time_l.duration_since(time_r) {
        Ok(d) => d,
        Err(e) => e.duration(),
    };
    if delta <= MTIME_TOLERANCE {
        if size_l == size_r {
            Category::Equal
        } else {
            Category::Conflict
        }
    } else if time_l > time_r {
        Category::LeftNewer
    } else {
        Category::RightNewer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::model::{ItemKind, SyncOperation};
    use std::fs::File;
    use tempfile::TempDir;

    fn set_mtime(path: &Path, secs: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn setup_pair() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        fs::create_dir_all(left.join("docs")).unwrap();
        fs::create_dir_all(right.join("docs")).unwrap();
        fs::create_dir_all(left.join("only_left")).unwrap();

        fs::write(left.join("same.txt"), "abc").unwrap();
        fs::write(right.join("same.txt"), "abc").unwrap();
        set_mtime(&left.join("same.txt"), 1_000_000);
        set_mtime(&right.join("same.txt"), 1_000_001);

        fs::write(left.join("docs/readme.md"), "new text").unwrap();
        fs::write(right.join("docs/readme.md"), "old").unwrap();
        set_mtime(&left.join("docs/readme.md"), 2_000_000);
        set_mtime(&right.join("docs/readme.md"), 1_000_000);

        fs::write(left.join("only_left/a.bin"), "12345").unwrap();
        fs::write(right.join("extra.txt"), "zz").unwrap();
        (dir, left, right)
    }

    fn find<'a>(
        cmp: &'a FolderComparison,
        parent: ContainerRef,
        name: &str,
    ) -> &'a crate::compare::model::FileSystemObject {
        let children = cmp.children(parent).unwrap();
        children
            .files
            .iter()
            .chain(&children.links)
            .chain(&children.folders)
            .filter_map(|id| cmp.retrieve(*id))
            .find(|obj| obj.item_name_any() == name)
            .unwrap_or_else(|| panic!("{name} not found"))
    }

    #[test]
    fn categorizes_files_and_folders() {
        let (_dir, left, right) = setup_pair();
        let cmp = compare_folder_pairs(&[FolderPairSpec::new(&left, &right)], SyncVariant::TwoWay)
            .unwrap();
        let base = ContainerRef::Base(cmp.base_pairs()[0].id);

        assert_eq!(find(&cmp, base, "same.txt").category, Category::Equal);
        assert_eq!(find(&cmp, base, "extra.txt").category, Category::RightSideOnly);

        let only_left = find(&cmp, base, "only_left");
        assert_eq!(only_left.category, Category::LeftSideOnly);
        let a_bin = find(&cmp, ContainerRef::Folder(only_left.id), "a.bin");
        assert_eq!(a_bin.category, Category::LeftSideOnly);
        assert_eq!(a_bin.file_size(), Some(5));

        let docs = find(&cmp, base, "docs");
        assert_eq!(docs.category, Category::Equal);
        let readme = find(&cmp, ContainerRef::Folder(docs.id), "readme.md");
        assert_eq!(readme.category, Category::LeftNewer);
        assert!(matches!(
            readme.kind,
            ItemKind::File {
                size_left: 8,
                size_right: 3
            }
        ));
    }

    #[test]
    fn directions_follow_variant() {
        let (_dir, left, right) = setup_pair();
        let cmp = compare_folder_pairs(&[FolderPairSpec::new(&left, &right)], SyncVariant::Mirror)
            .unwrap();
        let base = ContainerRef::Base(cmp.base_pairs()[0].id);
        assert_eq!(
            find(&cmp, base, "extra.txt").sync_operation(),
            SyncOperation::DeleteRight
        );
    }

    #[test]
    fn missing_root_is_invalid_path() {
        let dir = TempDir::new().unwrap();
        let err = compare_folder_pairs(
            &[FolderPairSpec::new(dir.path(), dir.path().join("nope"))],
            SyncVariant::TwoWay,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn one_sided_pair_lists_single_side() {
        let (_dir, left, _right) = setup_pair();
        let pair = FolderPairSpec {
            left: Some(left),
            right: None,
        };
        let cmp = compare_folder_pairs(&[pair], SyncVariant::TwoWay).unwrap();
        let base = ContainerRef::Base(cmp.base_pairs()[0].id);
        assert_eq!(find(&cmp, base, "same.txt").category, Category::LeftSideOnly);
    }

    #[test]
    fn same_time_different_size_is_conflict() {
        let t = Some(SystemTime::UNIX_EPOCH + Duration::from_secs(50));
        assert_eq!(file_category(1, t, 2, t), Category::Conflict);
        assert_eq!(file_category(1, None, 2, None), Category::DifferentContent);
        assert_eq!(file_category(2, None, 2, t), Category::Equal);
    }
}
