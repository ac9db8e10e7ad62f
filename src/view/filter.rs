//! Inclusion predicates applied by the subtree extractor.
//!
//! The two built-in families mirror the toggle bars of a sync tool: one
//! switch per comparison category, or one per sync operation. Both carry a
//! "show inactive" switch that hides items excluded from synchronization.

use std::fmt;
use std::sync::Arc;

use crate::compare::model::{Category, FileSystemObject, SyncOperation};

/// Toggles for filtering by comparison category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub show_inactive: bool,
    pub left_only: bool,
    pub right_only: bool,
    pub left_newer: bool,
    pub right_newer: bool,
    pub different: bool,
    /// Covers equal items and metadata-only differences.
    pub equal: bool,
    pub conflict: bool,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            show_inactive: true,
            left_only: true,
            right_only: true,
            left_newer: true,
            right_newer: true,
            different: true,
            equal: true,
            conflict: true,
        }
    }
}

impl CategoryFilter {
    pub const LABELS: [&'static str; 7] = [
        "left only",
        "right only",
        "left newer",
        "right newer",
        "different",
        "equal",
        "conflict",
    ];

    pub fn matches(&self, obj: &FileSystemObject) -> bool {
        if !obj.active && !self.show_inactive {
            return false;
        }
        match obj.category {
            Category::LeftSideOnly => self.left_only,
            Category::RightSideOnly => self.right_only,
            Category::LeftNewer => self.left_newer,
            Category::RightNewer => self.right_newer,
            Category::DifferentContent => self.different,
            Category::Equal | Category::DifferentMetadata => self.equal,
            Category::Conflict => self.conflict,
        }
    }

    /// Toggle values in `LABELS` order.
    pub fn flags(&self) -> [bool; 7] {
        [
            self.left_only,
            self.right_only,
            self.left_newer,
            self.right_newer,
            self.different,
            self.equal,
            self.conflict,
        ]
    }

    /// Flip the toggle at `index` (in `LABELS` order). Out of range is ignored.
    pub fn toggle(&mut self, index: usize) {
        let flag = match index {
            0 => &mut self.left_only,
            1 => &mut self.right_only,
            2 => &mut self.left_newer,
            3 => &mut self.right_newer,
            4 => &mut self.different,
            5 => &mut self.equal,
            6 => &mut self.conflict,
            _ => return,
        };
        *flag = !*flag;
    }
}

/// Toggles for filtering by planned sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFilter {
    pub show_inactive: bool,
    pub create_left: bool,
    pub create_right: bool,
    pub delete_left: bool,
    pub delete_right: bool,
    /// Overwrites and metadata updates towards the left side.
    pub overwrite_left: bool,
    pub overwrite_right: bool,
    pub do_nothing: bool,
    pub equal: bool,
    pub conflict: bool,
}

impl Default for ActionFilter {
    fn default() -> Self {
        Self {
            show_inactive: true,
            create_left: true,
            create_right: true,
            delete_left: true,
            delete_right: true,
            overwrite_left: true,
            overwrite_right: true,
            do_nothing: true,
            equal: true,
            conflict: true,
        }
    }
}

impl ActionFilter {
    pub const LABELS: [&'static str; 9] = [
        "create left",
        "create right",
        "delete left",
        "delete right",
        "update left",
        "update right",
        "no action",
        "equal",
        "conflict",
    ];

    pub fn matches(&self, obj: &FileSystemObject) -> bool {
        if !obj.active && !self.show_inactive {
            return false;
        }
        match obj.sync_operation() {
            SyncOperation::CreateNewLeft => self.create_left,
            SyncOperation::CreateNewRight => self.create_right,
            SyncOperation::DeleteLeft => self.delete_left,
            SyncOperation::DeleteRight => self.delete_right,
            SyncOperation::OverwriteLeft | SyncOperation::CopyMetadataToLeft => self.overwrite_left,
            SyncOperation::OverwriteRight | SyncOperation::CopyMetadataToRight => {
                self.overwrite_right
            }
            SyncOperation::DoNothing => self.do_nothing,
            SyncOperation::Equal => self.equal,
            SyncOperation::UnresolvedConflict => self.conflict,
        }
    }

    pub fn flags(&self) -> [bool; 9] {
        [
            self.create_left,
            self.create_right,
            self.delete_left,
            self.delete_right,
            self.overwrite_left,
            self.overwrite_right,
            self.do_nothing,
            self.equal,
            self.conflict,
        ]
    }

    pub fn toggle(&mut self, index: usize) {
        let flag = match index {
            0 => &mut self.create_left,
            1 => &mut self.create_right,
            2 => &mut self.delete_left,
            3 => &mut self.delete_right,
            4 => &mut self.overwrite_left,
            5 => &mut self.overwrite_right,
            6 => &mut self.do_nothing,
            7 => &mut self.equal,
            8 => &mut self.conflict,
            _ => return,
        };
        *flag = !*flag;
    }
}

/// Boxed predicate for callers outside the two built-in families.
pub type ItemPredicate = Arc<dyn Fn(&FileSystemObject) -> bool + Send + Sync>;

/// The inclusion predicate a view was last built with.
///
/// Kept by the view so that file buckets can be re-filtered lazily.
#[derive(Clone, Default)]
pub enum Filter {
    #[default]
    All,
    ByCategory(CategoryFilter),
    ByAction(ActionFilter),
    Custom(ItemPredicate),
}

impl Filter {
    pub fn custom(pred: impl Fn(&FileSystemObject) -> bool + Send + Sync + 'static) -> Self {
        Filter::Custom(Arc::new(pred))
    }

    pub fn matches(&self, obj: &FileSystemObject) -> bool {
        match self {
            Filter::All => true,
            Filter::ByCategory(f) => f.matches(obj),
            Filter::ByAction(f) => f.matches(obj),
            Filter::Custom(pred) => pred(obj),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "All"),
            Filter::ByCategory(c) => f.debug_tuple("ByCategory").field(c).finish(),
            Filter::ByAction(a) => f.debug_tuple("ByAction").field(a).finish(),
            Filter::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
