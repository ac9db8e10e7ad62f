use std::cmp::Ordering;

use crate::compare::model::FolderComparison;
use crate::view::extract::{Container, NodeData, PrunedForest};
use crate::view::tree_view::{LineKind, TreeLine};

/// Column a sibling group is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    ItemCount,
    Bytes,
}

impl SortColumn {
    /// Parse a column name from config or the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortColumn::Name),
            "count" | "items" => Some(SortColumn::ItemCount),
            "bytes" | "size" => Some(SortColumn::Bytes),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::ItemCount => "Items",
            SortColumn::Bytes => "Size",
        }
    }

    /// Cycle to the next column.
    pub fn next(&self) -> Self {
        match self {
            SortColumn::Name => SortColumn::ItemCount,
            SortColumn::ItemCount => SortColumn::Bytes,
            SortColumn::Bytes => SortColumn::Name,
        }
    }

    /// Direction a column starts with when first selected.
    pub fn default_ascending(&self) -> bool {
        matches!(self, SortColumn::Name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: SortColumn::Bytes,
            ascending: false,
        }
    }
}

/// Sort one sibling group in place.
///
/// Only `lines` is reordered; nested groups are sorted when they are
/// materialized.
pub fn sort_single_level(
    lines: &mut [TreeLine],
    tree: &FolderComparison,
    forest: &PrunedForest,
    spec: SortSpec,
) {
    match spec.column {
        SortColumn::Name => {
            let unresolved = lines
                .iter()
                .filter(|l| l.kind == LineKind::Folder && folder_name(l, tree, forest).is_none())
                .count();
            if unresolved > 0 {
                tracing::warn!(unresolved, "sorting folder rows that no longer resolve");
            }
            lines.sort_by(|a, b| compare_by_name(a, b, tree, forest, spec.ascending));
        }
        SortColumn::ItemCount => sort_by_value(lines, forest, spec.ascending, |c| {
            (c.item_count_net, c.item_count_gross)
        }),
        SortColumn::Bytes => {
            sort_by_value(lines, forest, spec.ascending, |c| (c.bytes_net, c.bytes_gross))
        }
    }
}

/// Order by a (net, gross) pair: files rows use net, everything else gross.
fn sort_by_value(
    lines: &mut [TreeLine],
    forest: &PrunedForest,
    ascending: bool,
    value: impl Fn(&Container) -> (u64, u64),
) {
    let key = |line: &TreeLine| -> u64 {
        let Some(node) = forest.node(line.node) else {
            return 0;
        };
        let (net, gross) = value(&node.container);
        match line.kind {
            LineKind::Files => net,
            LineKind::Root | LineKind::Folder => gross,
        }
    };

    lines.sort_by(|a, b| {
        files_last(a, b).unwrap_or_else(|| {
            let ord = key(a).cmp(&key(b));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        })
    });
}

/// The files bucket trails its sibling folders, whatever the column or
/// direction. `None` when neither row is a files row.
fn files_last(a: &TreeLine, b: &TreeLine) -> Option<Ordering> {
    match (a.kind, b.kind) {
        (LineKind::Files, LineKind::Files) => Some(Ordering::Equal),
        (LineKind::Files, _) => Some(Ordering::Greater),
        (_, LineKind::Files) => Some(Ordering::Less),
        _ => None,
    }
}

fn compare_by_name(
    a: &TreeLine,
    b: &TreeLine,
    tree: &FolderComparison,
    forest: &PrunedForest,
    ascending: bool,
) -> Ordering {
    if let Some(ord) = files_last(a, b) {
        return ord;
    }
    let directed = |ord: Ordering| if ascending { ord } else { ord.reverse() };

    match (a.kind, b.kind) {
        (LineKind::Root, LineKind::Root) => {
            match (root_name(a, forest), root_name(b, forest)) {
                (Some(x), Some(y)) => directed(natural_cmp(x, y)),
                (x, y) => x.is_some().cmp(&y.is_some()),
            }
        }

        // unresolvable first, in both directions
        (LineKind::Folder, LineKind::Folder) => {
            match (folder_name(a, tree, forest), folder_name(b, tree, forest)) {
                (Some(x), Some(y)) => directed(natural_cmp(x, y)),
                (x, y) => x.is_some().cmp(&y.is_some()),
            }
        }

        (ka, kb) => kind_rank(ka).cmp(&kind_rank(kb)),
    }
}

fn kind_rank(kind: LineKind) -> u8 {
    match kind {
        LineKind::Root => 0,
        LineKind::Folder => 1,
        LineKind::Files => 2,
    }
}

fn root_name<'a>(line: &TreeLine, forest: &'a PrunedForest) -> Option<&'a str> {
    match &forest.node(line.node)?.data {
        NodeData::Root { display_name, .. } => Some(display_name.as_str()),
        NodeData::Folder { .. } => None,
    }
}

fn folder_name<'a>(
    line: &TreeLine,
    tree: &'a FolderComparison,
    forest: &PrunedForest,
) -> Option<&'a str> {
    match &forest.node(line.node)?.data {
        NodeData::Folder { folder_id } => tree.retrieve_folder(*folder_id).map(|f| f.item_name_any()),
        NodeData::Root { .. } => None,
    }
}

/// Natural, case-insensitive order with a case-sensitive tiebreak.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    alphanumeric_sort::compare_str(a.to_lowercase(), b.to_lowercase()).then_with(|| a.cmp(b))
}
