//! Sync direction presets and their application to a comparison.

use crate::compare::model::{Category, FolderComparison, SyncDirection};

/// Built-in synchronization variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncVariant {
    /// Propagate changes both ways; real conflicts stay unresolved.
    #[default]
    TwoWay,
    /// Make the right side an exact copy of the left.
    Mirror,
    /// Copy new and updated items left to right, never delete.
    Update,
}

impl SyncVariant {
    /// Parse from a config/CLI string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "two-way" | "twoway" => Some(SyncVariant::TwoWay),
            "mirror" => Some(SyncVariant::Mirror),
            "update" => Some(SyncVariant::Update),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncVariant::TwoWay => "two-way",
            SyncVariant::Mirror => "mirror",
            SyncVariant::Update => "update",
        }
    }

    pub fn directions(&self) -> DirectionSet {
        use SyncDirection as D;
        match self {
            SyncVariant::TwoWay => DirectionSet {
                left_only: D::Right,
                right_only: D::Left,
                left_newer: D::Right,
                right_newer: D::Left,
                different: D::None,
                conflict: D::None,
            },
            SyncVariant::Mirror => DirectionSet {
                left_only: D::Right,
                right_only: D::Right,
                left_newer: D::Right,
                right_newer: D::Right,
                different: D::Right,
                conflict: D::Right,
            },
            SyncVariant::Update => DirectionSet {
                left_only: D::Right,
                right_only: D::None,
                left_newer: D::Right,
                right_newer: D::None,
                different: D::Right,
                conflict: D::None,
            },
        }
    }
}

/// Direction to use for each category that can need synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSet {
    pub left_only: SyncDirection,
    pub right_only: SyncDirection,
    pub left_newer: SyncDirection,
    pub right_newer: SyncDirection,
    pub different: SyncDirection,
    /// Also used for metadata-only differences.
    pub conflict: SyncDirection,
}

impl DirectionSet {
    pub fn direction_for(&self, category: Category) -> SyncDirection {
        match category {
            Category::LeftSideOnly => self.left_only,
            Category::RightSideOnly => self.right_only,
            Category::LeftNewer => self.left_newer,
            Category::RightNewer => self.right_newer,
            Category::DifferentContent => self.different,
            Category::Conflict | Category::DifferentMetadata => self.conflict,
            Category::Equal => SyncDirection::None,
        }
    }
}

/// Recompute the sync direction of every item from its category.
pub fn redetermine(cmp: &mut FolderComparison, directions: &DirectionSet) {
    let mut changed = 0usize;
    for item in cmp.items_mut() {
        let direction = directions.direction_for(item.category);
        if item.sync_direction != direction {
            item.sync_direction = direction;
            changed += 1;
        }
    }
    tracing::debug!(changed, "sync directions redetermined");
}
