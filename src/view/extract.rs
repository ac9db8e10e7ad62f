//! Pruned, aggregate-annotated shadow tree of a `FolderComparison`.
//!
//! Nodes live in an index arena so that flat rows can reference them by
//! `NodeIdx`. The arena is rebuilt from scratch on every filter change.

use crate::compare::model::{BaseId, ContainerRef, FolderComparison, ObjectId};
use crate::view::filter::Filter;

/// Index of a node in a `PrunedForest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

/// Aggregates for one folder (or base pair) of the pruned tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Kept child folders, in source order.
    pub sub_folders: Vec<NodeIdx>,
    /// First included file or symlink directly below. Marks the files
    /// bucket and is the anchor used to look the files up again.
    pub first_file_id: Option<ObjectId>,
    /// Included direct files and symlinks only.
    pub bytes_net: u64,
    pub item_count_net: u64,
    /// Net values plus the gross values of every child folder, whether the
    /// folder itself matched or not.
    pub bytes_gross: u64,
    pub item_count_gross: u64,
}

impl Container {
    /// Whether expanding this node would show anything.
    pub fn has_children(&self) -> bool {
        self.first_file_id.is_some() || !self.sub_folders.is_empty()
    }
}

/// What a pruned node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root { base_id: BaseId, display_name: String },
    Folder { folder_id: ObjectId },
}

#[derive(Debug, Clone)]
pub struct ViewNode {
    pub container: Container,
    pub data: NodeData,
}

/// The filtered forest: one root per non-empty base pair.
#[derive(Debug, Default)]
pub struct PrunedForest {
    nodes: Vec<ViewNode>,
    roots: Vec<NodeIdx>,
}

impl PrunedForest {
    /// Extract every base pair in `base_ids` with `filter`, dropping roots
    /// that end up with neither files nor folders.
    pub fn build(cmp: &FolderComparison, base_ids: &[BaseId], filter: &Filter) -> Self {
        let mut forest = Self::default();

        for &base_id in base_ids {
            let Some(base) = cmp.base_pair(base_id) else {
                tracing::warn!(?base_id, "base pair no longer resolves");
                continue;
            };

            let mut root = forest.extract_visible_subtree(cmp, ContainerRef::Base(base_id), filter);
            if root.first_file_id.is_none() && root.sub_folders.is_empty() {
                continue;
            }
            compress_node(&mut root);

            let idx = forest.push(ViewNode {
                container: root,
                data: NodeData::Root {
                    base_id,
                    display_name: base.display_name(),
                },
            });
            forest.roots.push(idx);
        }

        tracing::debug!(
            roots = forest.roots.len(),
            nodes = forest.nodes.len(),
            "pruned forest built"
        );
        forest
    }

    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIdx) -> Option<&ViewNode> {
        self.nodes.get(idx.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: ViewNode) -> NodeIdx {
        self.nodes.push(node);
        NodeIdx(self.nodes.len() - 1)
    }

    /// Aggregate `hier` and intern its kept descendants.
    ///
    /// Child folders are decided only after their own recursion: a child is
    /// dropped when it failed `filter` and kept neither files nor folders.
    fn extract_visible_subtree(
        &mut self,
        cmp: &FolderComparison,
        hier: ContainerRef,
        filter: &Filter,
    ) -> Container {
        let mut cont = Container::default();
        let Some(children) = cmp.children(hier) else {
            tracing::warn!(?hier, "container no longer resolves");
            return cont;
        };

        for file in children.files.iter().filter_map(|id| cmp.retrieve(*id)) {
            if filter.matches(file) {
                cont.bytes_net += file.file_size().unwrap_or(0);
                cont.item_count_net += 1;
                cont.first_file_id.get_or_insert(file.id);
            }
        }
        for link in children.links.iter().filter_map(|id| cmp.retrieve(*id)) {
            if filter.matches(link) {
                cont.item_count_net += 1;
                cont.first_file_id.get_or_insert(link.id);
            }
        }

        cont.bytes_gross = cont.bytes_net;
        cont.item_count_gross = cont.item_count_net;

        for folder in children.folders.iter().filter_map(|id| cmp.retrieve(*id)) {
            let included = filter.matches(folder);

            let mut sub = self.extract_visible_subtree(cmp, ContainerRef::Folder(folder.id), filter);
            if included {
                sub.item_count_gross += 1;
            }
            cont.bytes_gross += sub.bytes_gross;
            cont.item_count_gross += sub.item_count_gross;

            if !included && sub.first_file_id.is_none() && sub.sub_folders.is_empty() {
                continue;
            }
            compress_node(&mut sub);

            let idx = self.push(ViewNode {
                container: sub,
                data: NodeData::Folder {
                    folder_id: folder.id,
                },
            });
            cont.sub_folders.push(idx);
        }
        cont
    }
}

/// A node holding only files gets no separate files bucket.
///
/// Empty child folders are left in place.
fn compress_node(cont: &mut Container) {
    if cont.sub_folders.is_empty() {
        cont.first_file_id = None;
    }
}
