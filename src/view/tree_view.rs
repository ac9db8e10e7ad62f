//! Flat, expandable row list over a `PrunedForest`.
//!
//! Rows only hold arena indices and ids; every call that needs live item
//! data takes the comparison tree as a parameter and resolves ids again.

use std::collections::HashSet;

use crate::compare::model::{BaseFolderPair, BaseId, FileSystemObject, FolderComparison, ObjectId};
use crate::view::extract::{NodeData, NodeIdx, PrunedForest};
use crate::view::filter::{ActionFilter, CategoryFilter, Filter};
use crate::view::percent::distribute_percent;
use crate::view::sort::{sort_single_level, SortColumn, SortSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Root,
    Folder,
    /// Synthetic row standing for all included files of `node`.
    Files,
}

/// One visible row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLine {
    pub level: usize,
    pub percent: u8,
    pub node: NodeIdx,
    pub kind: LineKind,
}

/// Disclosure state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Expanded,
    Collapsible,
    Empty,
}

/// Kind-specific payload of a materialized row.
#[derive(Debug)]
pub enum NodeDetails<'a> {
    Root {
        base: &'a BaseFolderPair,
        display_name: &'a str,
    },
    Folder {
        folder: &'a FileSystemObject,
    },
    Files {
        items: Vec<&'a FileSystemObject>,
    },
}

/// A row resolved against the live comparison tree.
#[derive(Debug)]
pub struct DisplayNode<'a> {
    pub level: usize,
    pub percent: u8,
    pub bytes: u64,
    pub item_count: u64,
    pub status: NodeStatus,
    pub details: NodeDetails<'a>,
}

/// Logical identity used to carry expansion over a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ExpandedId {
    Base(BaseId),
    Folder(ObjectId),
}

/// The tree grid's data view.
pub struct TreeView {
    /// Base pairs with at least one side set, captured once.
    base_ids: Vec<BaseId>,
    forest: PrunedForest,
    filter: Filter,
    sort: SortSpec,
    lines: Vec<TreeLine>,
}

impl TreeView {
    /// Build a view showing everything.
    pub fn new(tree: &FolderComparison, sort: SortSpec) -> Self {
        let base_ids: Vec<BaseId> = tree
            .base_pairs()
            .iter()
            .filter(|base| !base.is_null_pair())
            .map(|base| base.id)
            .collect();

        let mut view = Self {
            base_ids,
            forest: PrunedForest::default(),
            filter: Filter::All,
            sort,
            lines: Vec::new(),
        };
        view.set_filter(tree, Filter::All);
        view
    }

    /// Re-extract with `filter` and keep what was expanded expanded.
    pub fn set_filter(&mut self, tree: &FolderComparison, filter: Filter) {
        let forest = PrunedForest::build(tree, &self.base_ids, &filter);
        self.filter = filter;
        self.apply_view(tree, forest);
    }

    pub fn apply_filter_by_category(&mut self, tree: &FolderComparison, filter: CategoryFilter) {
        self.set_filter(tree, Filter::ByCategory(filter));
    }

    pub fn apply_filter_by_action(&mut self, tree: &FolderComparison, filter: ActionFilter) {
        self.set_filter(tree, Filter::ByAction(filter));
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Change the sort order. The current forest is reused as is.
    pub fn set_sort(&mut self, tree: &FolderComparison, column: SortColumn, ascending: bool) {
        self.sort = SortSpec { column, ascending };
        let expanded = self.expanded_ids(tree);
        self.reseed(tree, &expanded);
    }

    pub fn sort_config(&self) -> SortSpec {
        self.sort
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[TreeLine] {
        &self.lines
    }

    pub fn status(&self, row: usize) -> NodeStatus {
        let Some(line) = self.lines.get(row) else {
            return NodeStatus::Empty;
        };
        if self
            .lines
            .get(row + 1)
            .is_some_and(|next| next.level > line.level)
        {
            return NodeStatus::Expanded;
        }

        match line.kind {
            LineKind::Files => NodeStatus::Empty,
            LineKind::Root | LineKind::Folder => {
                let has_children = self
                    .forest
                    .node(line.node)
                    .is_some_and(|node| node.container.has_children());
                if has_children {
                    NodeStatus::Collapsible
                } else {
                    NodeStatus::Empty
                }
            }
        }
    }

    /// Insert the children of a collapsed row right after it.
    ///
    /// Only valid for rows whose status is `Collapsible`.
    pub fn expand(&mut self, tree: &FolderComparison, row: usize) {
        let status = self.status(row);
        debug_assert_eq!(status, NodeStatus::Collapsible, "expand on row {row}");
        if status != NodeStatus::Collapsible {
            return;
        }

        let line = self.lines[row];
        let children = self.children_of(tree, line.node, line.level + 1);
        self.lines.splice(row + 1..row + 1, children);
    }

    /// Remove every row nested below `row`.
    pub fn collapse(&mut self, row: usize) {
        let Some(line) = self.lines.get(row) else {
            return;
        };
        let level = line.level;
        let end = self.lines[row + 1..]
            .iter()
            .position(|l| l.level <= level)
            .map_or(self.lines.len(), |pos| row + 1 + pos);
        self.lines.drain(row + 1..end);
    }

    /// Row of the nearest enclosing node, `None` at top level.
    pub fn parent_of(&self, row: usize) -> Option<usize> {
        let level = self.lines.get(row)?.level;
        self.lines[..row].iter().rposition(|l| l.level < level)
    }

    /// Resolve a row for display.
    ///
    /// Folder rows whose folder is gone yield `None`. Files rows are
    /// re-filtered on every call.
    pub fn line_at<'a>(&'a self, tree: &'a FolderComparison, row: usize) -> Option<DisplayNode<'a>> {
        let line = *self.lines.get(row)?;
        let node = self.forest.node(line.node)?;
        let cont = &node.container;
        let status = self.status(row);

        let (bytes, item_count, details) = match (line.kind, &node.data) {
            (LineKind::Root, NodeData::Root { base_id, display_name }) => {
                let base = tree.base_pair(*base_id)?;
                (
                    cont.bytes_gross,
                    cont.item_count_gross,
                    NodeDetails::Root { base, display_name },
                )
            }
            (LineKind::Folder, NodeData::Folder { folder_id }) => {
                let Some(folder) = tree.retrieve_folder(*folder_id) else {
                    tracing::warn!(?folder_id, row, "folder row no longer resolves");
                    return None;
                };
                (
                    cont.bytes_gross,
                    cont.item_count_gross,
                    NodeDetails::Folder { folder },
                )
            }
            (LineKind::Files, _) => {
                let items = self.current_files(tree, cont.first_file_id?)?;
                (cont.bytes_net, cont.item_count_net, NodeDetails::Files { items })
            }
            (kind, data) => {
                debug_assert!(false, "row kind {kind:?} does not match node {data:?}");
                return None;
            }
        };

        Some(DisplayNode {
            level: line.level,
            percent: line.percent,
            bytes,
            item_count,
            status,
            details,
        })
    }

    /// Files then symlinks next to `first_file`, passing the current filter.
    fn current_files<'a>(
        &self,
        tree: &'a FolderComparison,
        first_file: ObjectId,
    ) -> Option<Vec<&'a FileSystemObject>> {
        let Some(anchor) = tree.retrieve(first_file) else {
            tracing::warn!(?first_file, "files row anchor no longer resolves");
            return None;
        };
        let children = tree.children(anchor.parent)?;

        Some(
            children
                .files
                .iter()
                .chain(children.links.iter())
                .filter_map(|id| tree.retrieve(*id))
                .filter(|obj| self.filter.matches(obj))
                .collect(),
        )
    }

    fn apply_view(&mut self, tree: &FolderComparison, forest: PrunedForest) {
        let expanded = self.expanded_ids(tree);
        self.forest = forest;
        self.reseed(tree, &expanded);
    }

    /// Identities of the rows currently showing their children.
    fn expanded_ids(&self, tree: &FolderComparison) -> HashSet<ExpandedId> {
        self.lines
            .windows(2)
            .filter(|pair| pair[1].level > pair[0].level)
            .filter_map(|pair| self.logical_id(tree, &pair[0]))
            .collect()
    }

    fn logical_id(&self, tree: &FolderComparison, line: &TreeLine) -> Option<ExpandedId> {
        match (line.kind, &self.forest.node(line.node)?.data) {
            (LineKind::Root, NodeData::Root { base_id, .. }) => Some(ExpandedId::Base(*base_id)),
            (LineKind::Folder, NodeData::Folder { folder_id }) => tree
                .retrieve_folder(*folder_id)
                .map(|_| ExpandedId::Folder(*folder_id)),
            _ => None,
        }
    }

    /// Rebuild the row list from the current forest, re-expanding `expanded`.
    fn reseed(&mut self, tree: &FolderComparison, expanded: &HashSet<ExpandedId>) {
        let mut lines = if self.base_ids.len() == 1 {
            // A lone base pair needs no root row.
            match self.forest.roots().first() {
                Some(&root) => self.children_of(tree, root, 0),
                None => Vec::new(),
            }
        } else {
            let mut roots: Vec<TreeLine> = self
                .forest
                .roots()
                .iter()
                .map(|&node| TreeLine {
                    level: 0,
                    percent: 0,
                    node,
                    kind: LineKind::Root,
                })
                .collect();
            self.finish_level(tree, &mut roots);
            roots
        };

        let mut row = 0;
        while row < lines.len() {
            let line = lines[row];
            let restore = self
                .logical_id(tree, &line)
                .is_some_and(|id| expanded.contains(&id))
                && self
                    .forest
                    .node(line.node)
                    .is_some_and(|node| node.container.has_children());
            if restore {
                let children = self.children_of(tree, line.node, line.level + 1);
                lines.splice(row + 1..row + 1, children);
            }
            row += 1;
        }

        self.lines = lines;
    }

    /// One row per kept sub folder plus the files row, ready for display.
    fn children_of(&self, tree: &FolderComparison, node: NodeIdx, level: usize) -> Vec<TreeLine> {
        let Some(parent) = self.forest.node(node) else {
            return Vec::new();
        };
        let cont = &parent.container;

        let mut lines: Vec<TreeLine> = cont
            .sub_folders
            .iter()
            .map(|&child| TreeLine {
                level,
                percent: 0,
                node: child,
                kind: LineKind::Folder,
            })
            .collect();
        if cont.first_file_id.is_some() {
            lines.push(TreeLine {
                level,
                percent: 0,
                node,
                kind: LineKind::Files,
            });
        }

        self.finish_level(tree, &mut lines);
        lines
    }

    /// Percentages by bytes, then sort.
    fn finish_level(&self, tree: &FolderComparison, lines: &mut [TreeLine]) {
        let weights: Vec<u64> = lines
            .iter()
            .map(|line| {
                self.forest.node(line.node).map_or(0, |node| match line.kind {
                    LineKind::Files => node.container.bytes_net,
                    LineKind::Root | LineKind::Folder => node.container.bytes_gross,
                })
            })
            .collect();

        for (line, percent) in lines.iter_mut().zip(distribute_percent(&weights)) {
            line.percent = percent;
        }
        sort_single_level(lines, tree, &self.forest, self.sort);
    }
}
