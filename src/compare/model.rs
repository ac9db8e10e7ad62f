use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Handle of a base folder pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseId(u32);

/// Stable handle of a folder, file or symlink inside a `FolderComparison`.
///
/// Handles stay valid until the item is removed; afterwards `retrieve`
/// returns `None` for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

/// Anything that owns child items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    Base(BaseId),
    Folder(ObjectId),
}

/// Comparison result of one item pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    LeftSideOnly,
    RightSideOnly,
    LeftNewer,
    RightNewer,
    DifferentContent,
    /// Equal content, differing metadata (e.g. name case). Sub-category of equal.
    DifferentMetadata,
    Equal,
    Conflict,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::LeftSideOnly => "left only",
            Category::RightSideOnly => "right only",
            Category::LeftNewer => "left newer",
            Category::RightNewer => "right newer",
            Category::DifferentContent => "different",
            Category::DifferentMetadata => "metadata",
            Category::Equal => "equal",
            Category::Conflict => "conflict",
        }
    }
}

/// Direction in which an item would be synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncDirection {
    /// Copy right to left.
    Left,
    /// Copy left to right.
    Right,
    #[default]
    None,
}

/// Operation a sync would perform, derived from category and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncOperation {
    CreateNewLeft,
    CreateNewRight,
    DeleteLeft,
    DeleteRight,
    OverwriteLeft,
    OverwriteRight,
    CopyMetadataToLeft,
    CopyMetadataToRight,
    DoNothing,
    Equal,
    UnresolvedConflict,
}

impl SyncOperation {
    pub fn from_category(category: Category, direction: SyncDirection) -> Self {
        match category {
            Category::Equal => SyncOperation::Equal,
            Category::LeftSideOnly => match direction {
                SyncDirection::Left => SyncOperation::DeleteLeft,
                SyncDirection::Right => SyncOperation::CreateNewRight,
                SyncDirection::None => SyncOperation::DoNothing,
            },
            Category::RightSideOnly => match direction {
                SyncDirection::Left => SyncOperation::CreateNewLeft,
                SyncDirection::Right => SyncOperation::DeleteRight,
                SyncDirection::None => SyncOperation::DoNothing,
            },
            Category::LeftNewer | Category::RightNewer | Category::DifferentContent => {
                match direction {
                    SyncDirection::Left => SyncOperation::OverwriteLeft,
                    SyncDirection::Right => SyncOperation::OverwriteRight,
                    SyncDirection::None => SyncOperation::DoNothing,
                }
            }
            Category::DifferentMetadata => match direction {
                SyncDirection::Left => SyncOperation::CopyMetadataToLeft,
                SyncDirection::Right => SyncOperation::CopyMetadataToRight,
                SyncDirection::None => SyncOperation::DoNothing,
            },
            Category::Conflict => match direction {
                SyncDirection::Left => SyncOperation::OverwriteLeft,
                SyncDirection::Right => SyncOperation::OverwriteRight,
                SyncDirection::None => SyncOperation::UnresolvedConflict,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncOperation::CreateNewLeft => "create left",
            SyncOperation::CreateNewRight => "create right",
            SyncOperation::DeleteLeft => "delete left",
            SyncOperation::DeleteRight => "delete right",
            SyncOperation::OverwriteLeft => "update left",
            SyncOperation::OverwriteRight => "update right",
            SyncOperation::CopyMetadataToLeft => "metadata left",
            SyncOperation::CopyMetadataToRight => "metadata right",
            SyncOperation::DoNothing => "no action",
            SyncOperation::Equal => "equal",
            SyncOperation::UnresolvedConflict => "conflict",
        }
    }
}

/// Child lists of a container, in source order.
#[derive(Debug, Clone, Default)]
pub struct Children {
    pub files: Vec<ObjectId>,
    pub links: Vec<ObjectId>,
    pub folders: Vec<ObjectId>,
}

/// Kind-specific payload of a comparison item.
#[derive(Debug, Clone)]
pub enum ItemKind {
    Folder(Children),
    File { size_left: u64, size_right: u64 },
    Symlink,
}

/// One compared folder, file or symlink pair.
#[derive(Debug, Clone)]
pub struct FileSystemObject {
    pub id: ObjectId,
    pub parent: ContainerRef,
    pub name_left: Option<String>,
    pub name_right: Option<String>,
    /// Inactive items are excluded from synchronization by the user.
    pub active: bool,
    pub category: Category,
    pub sync_direction: SyncDirection,
    pub kind: ItemKind,
}

impl FileSystemObject {
    /// Name of whichever side exists, left preferred.
    pub fn item_name_any(&self) -> &str {
        self.name_left
            .as_deref()
            .or(self.name_right.as_deref())
            .unwrap_or("")
    }

    pub fn sync_operation(&self) -> SyncOperation {
        SyncOperation::from_category(self.category, self.sync_direction)
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder(_))
    }

    /// Larger of the two side sizes for files, `None` otherwise.
    pub fn file_size(&self) -> Option<u64> {
        match self.kind {
            ItemKind::File {
                size_left,
                size_right,
            } => Some(size_left.max(size_right)),
            _ => None,
        }
    }
}

/// Top-level pair of compared folders.
#[derive(Debug, Clone)]
pub struct BaseFolderPair {
    pub id: BaseId,
    pub left_path: Option<PathBuf>,
    pub right_path: Option<PathBuf>,
    pub children: Children,
}

impl BaseFolderPair {
    /// Both sides unset: nothing was compared.
    pub fn is_null_pair(&self) -> bool {
        self.left_path.is_none() && self.right_path.is_none()
    }

    pub fn display_name(&self) -> String {
        short_display_name(self.left_path.as_deref(), self.right_path.as_deref())
    }
}

/// The comparison forest: base pairs plus an id-indexed item store.
#[derive(Debug, Default)]
pub struct FolderComparison {
    base_pairs: Vec<BaseFolderPair>,
    objects: HashMap<ObjectId, FileSystemObject>,
    next_id: u64,
}

impl FolderComparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_base_pair(&mut self, left: Option<PathBuf>, right: Option<PathBuf>) -> BaseId {
        let id = BaseId(self.base_pairs.len() as u32);
        self.base_pairs.push(BaseFolderPair {
            id,
            left_path: left,
            right_path: right,
            children: Children::default(),
        });
        id
    }

    pub fn add_folder(&mut self, parent: ContainerRef, name: &str, category: Category) -> ObjectId {
        self.insert(parent, name, category, ItemKind::Folder(Children::default()))
    }

    pub fn add_file(
        &mut self,
        parent: ContainerRef,
        name: &str,
        category: Category,
        size_left: u64,
        size_right: u64,
    ) -> ObjectId {
        self.insert(
            parent,
            name,
            category,
            ItemKind::File {
                size_left,
                size_right,
            },
        )
    }

    pub fn add_symlink(&mut self, parent: ContainerRef, name: &str, category: Category) -> ObjectId {
        self.insert(parent, name, category, ItemKind::Symlink)
    }

    fn insert(
        &mut self,
        parent: ContainerRef,
        name: &str,
        category: Category,
        kind: ItemKind,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let (name_left, name_right) = match category {
            Category::LeftSideOnly => (Some(name.to_string()), None),
            Category::RightSideOnly => (None, Some(name.to_string())),
            _ => (Some(name.to_string()), Some(name.to_string())),
        };

        match self.children_mut(parent) {
            Some(children) => match kind {
                ItemKind::Folder(_) => children.folders.push(id),
                ItemKind::File { .. } => children.files.push(id),
                ItemKind::Symlink => children.links.push(id),
            },
            None => {
                debug_assert!(false, "parent {:?} does not exist", parent);
                tracing::warn!(?parent, "adding item to unknown parent");
            }
        }

        self.objects.insert(
            id,
            FileSystemObject {
                id,
                parent,
                name_left,
                name_right,
                active: true,
                category,
                sync_direction: SyncDirection::None,
                kind,
            },
        );
        id
    }

    /// Set the active flag. Returns `false` if the id is stale.
    pub fn set_active(&mut self, id: ObjectId, active: bool) -> bool {
        match self.objects.get_mut(&id) {
            Some(obj) => {
                obj.active = active;
                true
            }
            None => false,
        }
    }

    /// Set the sync direction. Returns `false` if the id is stale.
    pub fn set_sync_direction(&mut self, id: ObjectId, direction: SyncDirection) -> bool {
        match self.objects.get_mut(&id) {
            Some(obj) => {
                obj.sync_direction = direction;
                true
            }
            None => false,
        }
    }

    /// Remove an item and, for folders, everything below it.
    ///
    /// Ids of removed items no longer resolve.
    pub fn remove(&mut self, id: ObjectId) {
        let Some(parent) = self.objects.get(&id).map(|obj| obj.parent) else {
            return;
        };
        if let Some(children) = self.children_mut(parent) {
            children.files.retain(|c| *c != id);
            children.links.retain(|c| *c != id);
            children.folders.retain(|c| *c != id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(obj) = self.objects.remove(&next) {
                if let ItemKind::Folder(children) = obj.kind {
                    pending.extend(children.files);
                    pending.extend(children.links);
                    pending.extend(children.folders);
                }
            }
        }
    }

    /// Resolve an id back to the live item.
    pub fn retrieve(&self, id: ObjectId) -> Option<&FileSystemObject> {
        self.objects.get(&id)
    }

    /// Resolve an id that must name a folder.
    pub fn retrieve_folder(&self, id: ObjectId) -> Option<&FileSystemObject> {
        self.retrieve(id).filter(|obj| obj.is_folder())
    }

    pub fn base_pairs(&self) -> &[BaseFolderPair] {
        &self.base_pairs
    }

    pub fn base_pair(&self, id: BaseId) -> Option<&BaseFolderPair> {
        self.base_pairs.get(id.0 as usize)
    }

    pub fn children(&self, container: ContainerRef) -> Option<&Children> {
        match container {
            ContainerRef::Base(id) => self.base_pair(id).map(|base| &base.children),
            ContainerRef::Folder(id) => match &self.retrieve(id)?.kind {
                ItemKind::Folder(children) => Some(children),
                _ => None,
            },
        }
    }

    fn children_mut(&mut self, container: ContainerRef) -> Option<&mut Children> {
        match container {
            ContainerRef::Base(id) => self
                .base_pairs
                .get_mut(id.0 as usize)
                .map(|base| &mut base.children),
            ContainerRef::Folder(id) => match &mut self.objects.get_mut(&id)?.kind {
                ItemKind::Folder(children) => Some(children),
                _ => None,
            },
        }
    }

    /// Visit every item, in no particular order.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut FileSystemObject> {
        self.objects.values_mut()
    }

    pub fn item_count(&self) -> usize {
        self.objects.len()
    }
}

/// Short label for a pair of folder paths.
///
/// Trailing components shared by both sides (case-insensitive) win, e.g.
/// `/a/proj` and `/b/proj` become `proj`. Otherwise both last components are
/// shown. A missing side yields the other side's name.
pub fn short_display_name(left: Option<&Path>, right: Option<&Path>) -> String {
    match (left, right) {
        (None, None) => String::new(),
        (Some(left), None) => last_component(left),
        (None, Some(right)) => last_component(right),
        (Some(left), Some(right)) => {
            let mut common_trail: Vec<String> = Vec::new();
            let mut l = left;
            let mut r = right;
            while let (Some(name_l), Some(name_r), Some(parent_l), Some(parent_r)) =
                (l.file_name(), r.file_name(), l.parent(), r.parent())
            {
                let name_l = name_l.to_string_lossy();
                if name_l.to_lowercase() != name_r.to_string_lossy().to_lowercase() {
                    break;
                }
                common_trail.insert(0, name_l.to_string());
                l = parent_l;
                r = parent_r;
            }

            if !common_trail.is_empty() {
                return common_trail.join("/");
            }
            format!("{} - {}", last_component(left), last_component(right))
        }
    }
}

fn last_component(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FolderComparison, BaseId, ObjectId, ObjectId) {
        let mut cmp = FolderComparison::new();
        let base = cmp.add_base_pair(Some("/l/proj".into()), Some("/r/proj".into()));
        let src = cmp.add_folder(ContainerRef::Base(base), "src", Category::Equal);
        let main = cmp.add_file(ContainerRef::Folder(src), "main.rs", Category::LeftNewer, 10, 7);
        (cmp, base, src, main)
    }

    #[test]
    fn side_names_follow_category() {
        let mut cmp = FolderComparison::new();
        let base = cmp.add_base_pair(Some("/l".into()), Some("/r".into()));
        let left = cmp.add_file(ContainerRef::Base(base), "a", Category::LeftSideOnly, 1, 0);
        let right = cmp.add_file(ContainerRef::Base(base), "b", Category::RightSideOnly, 0, 1);

        let left = cmp.retrieve(left).unwrap();
        assert_eq!(left.name_left.as_deref(), Some("a"));
        assert!(left.name_right.is_none());
        assert_eq!(cmp.retrieve(right).unwrap().item_name_any(), "b");
    }

    #[test]
    fn children_are_registered_by_kind() {
        let (mut cmp, base, src, main) = sample();
        let link = cmp.add_symlink(ContainerRef::Folder(src), "current", Category::Equal);

        let base_children = cmp.children(ContainerRef::Base(base)).unwrap();
        assert_eq!(base_children.folders, vec![src]);
        let src_children = cmp.children(ContainerRef::Folder(src)).unwrap();
        assert_eq!(src_children.files, vec![main]);
        assert_eq!(src_children.links, vec![link]);
        assert!(cmp.children(ContainerRef::Folder(main)).is_none());
    }

    #[test]
    fn file_size_is_larger_side() {
        let (cmp, _, src, main) = sample();
        assert_eq!(cmp.retrieve(main).unwrap().file_size(), Some(10));
        assert_eq!(cmp.retrieve(src).unwrap().file_size(), None);
    }

    #[test]
    fn remove_makes_subtree_stale() {
        let (mut cmp, base, src, main) = sample();
        cmp.remove(src);

        assert!(cmp.retrieve(src).is_none());
        assert!(cmp.retrieve(main).is_none());
        assert!(cmp.children(ContainerRef::Base(base)).unwrap().folders.is_empty());
        assert_eq!(cmp.item_count(), 0);
    }

    #[test]
    fn retrieve_folder_rejects_files() {
        let (cmp, _, src, main) = sample();
        assert!(cmp.retrieve_folder(src).is_some());
        assert!(cmp.retrieve_folder(main).is_none());
    }

    #[test]
    fn setters_report_stale_ids() {
        let (mut cmp, _, src, main) = sample();
        assert!(cmp.set_active(main, false));
        assert!(!cmp.retrieve(main).unwrap().active);
        cmp.remove(src);
        assert!(!cmp.set_active(main, true));
        assert!(!cmp.set_sync_direction(main, SyncDirection::Left));
    }

    #[test]
    fn sync_operation_from_category() {
        use SyncDirection as D;
        use SyncOperation as Op;
        assert_eq!(Op::from_category(Category::LeftSideOnly, D::Right), Op::CreateNewRight);
        assert_eq!(Op::from_category(Category::LeftSideOnly, D::Left), Op::DeleteLeft);
        assert_eq!(Op::from_category(Category::RightSideOnly, D::Right), Op::DeleteRight);
        assert_eq!(Op::from_category(Category::RightNewer, D::Left), Op::OverwriteLeft);
        assert_eq!(Op::from_category(Category::DifferentMetadata, D::Right), Op::CopyMetadataToRight);
        assert_eq!(Op::from_category(Category::Conflict, D::None), Op::UnresolvedConflict);
        assert_eq!(Op::from_category(Category::Equal, D::Left), Op::Equal);
        assert_eq!(Op::from_category(Category::DifferentContent, D::None), Op::DoNothing);
    }

    #[test]
    fn display_name_uses_common_trail() {
        let name = short_display_name(
            Some(Path::new("/home/me/Work/Proj")),
            Some(Path::new("/mnt/backup/work/proj")),
        );
        assert_eq!(name, "Work/Proj");
    }

    #[test]
    fn display_name_without_common_trail() {
        let name = short_display_name(Some(Path::new("/data/a")), Some(Path::new("/data/b")));
        assert_eq!(name, "a - b");
    }

    #[test]
    fn display_name_with_one_side_missing() {
        assert_eq!(short_display_name(None, Some(Path::new("/x/right"))), "right");
        assert_eq!(short_display_name(Some(Path::new("/")), None), "/");
    }

    #[test]
    fn null_pair_detection() {
        let mut cmp = FolderComparison::new();
        let null = cmp.add_base_pair(None, None);
        let half = cmp.add_base_pair(None, Some("/r".into()));
        assert!(cmp.base_pair(null).unwrap().is_null_pair());
        assert!(!cmp.base_pair(half).unwrap().is_null_pair());
    }
}
