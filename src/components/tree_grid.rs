use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use sync_tree_view::compare::model::FolderComparison;
use sync_tree_view::view::{DisplayNode, NodeDetails, NodeStatus, SortColumn, TreeView};

use crate::theme::{level_color, ThemeColors};

const PERCENT_WIDTH: usize = 6;
const COUNT_WIDTH: usize = 9;
const SIZE_WIDTH: usize = 11;
const INDENT: &str = "  ";

/// Tree grid: name with disclosure marker, percentage bar, item count, size.
pub struct TreeGridWidget<'a> {
    view: &'a TreeView,
    cmp: &'a FolderComparison,
    theme: &'a ThemeColors,
    selected: usize,
    scroll_offset: usize,
    show_percentage: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeGridWidget<'a> {
    pub fn new(view: &'a TreeView, cmp: &'a FolderComparison, theme: &'a ThemeColors) -> Self {
        Self {
            view,
            cmp,
            theme,
            selected: 0,
            scroll_offset: 0,
            show_percentage: true,
            block: None,
        }
    }

    pub fn selection(mut self, selected: usize, scroll_offset: usize) -> Self {
        self.selected = selected;
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn show_percentage(mut self, show: bool) -> Self {
        self.show_percentage = show;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn name_width(&self, total: usize) -> usize {
        let mut fixed = COUNT_WIDTH + SIZE_WIDTH + 2;
        if self.show_percentage {
            fixed += PERCENT_WIDTH + 1;
        }
        total.saturating_sub(fixed)
    }

    fn header(&self, width: usize) -> Line<'static> {
        let sort = self.view.sort_config();
        let title = |column: SortColumn, text: &str| {
            if sort.column == column {
                format!("{} {}", text, if sort.ascending { "▲" } else { "▼" })
            } else {
                text.to_string()
            }
        };

        let name_width = self.name_width(width);
        let mut text = pad_right(&title(SortColumn::Name, "Name"), name_width);
        if self.show_percentage {
            text.push_str(&pad_right(" %", PERCENT_WIDTH + 1));
        }
        text.push(' ');
        text.push_str(&pad_left(&title(SortColumn::ItemCount, "Items"), COUNT_WIDTH));
        text.push(' ');
        text.push_str(&pad_left(&title(SortColumn::Bytes, "Size"), SIZE_WIDTH));

        Line::from(Span::styled(
            text,
            Style::default()
                .fg(self.theme.header_fg)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn row(&self, row: usize, width: usize) -> Line<'static> {
        let is_selected = row == self.selected;
        let Some(node) = self.view.line_at(self.cmp, row) else {
            let level = self.view.lines().get(row).map_or(0, |l| l.level);
            let text = format!("{}  <removed>", INDENT.repeat(level));
            return Line::from(Span::styled(
                pad_right(&text, width),
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::ITALIC),
            ));
        };

        let base_style = if is_selected {
            Style::default()
                .bg(self.theme.grid_selected_bg)
                .fg(self.theme.grid_selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.grid_fg)
        };
        let name_style = if is_selected {
            base_style
        } else {
            match node.details {
                NodeDetails::Root { .. } => Style::default()
                    .fg(self.theme.root_fg)
                    .add_modifier(Modifier::BOLD),
                NodeDetails::Folder { .. } => Style::default().fg(self.theme.folder_fg),
                NodeDetails::Files { .. } => Style::default()
                    .fg(self.theme.files_fg)
                    .add_modifier(Modifier::ITALIC),
            }
        };

        let marker = match node.status {
            NodeStatus::Expanded => "▾ ",
            NodeStatus::Collapsible => "▸ ",
            NodeStatus::Empty => "  ",
        };

        let name_width = self.name_width(width);
        let indent = INDENT.repeat(node.level);
        let mut spans = vec![
            Span::styled(indent, base_style),
            Span::styled(marker, base_style.fg(self.theme.disclosure_fg)),
        ];
        let used = node.level * INDENT.len() + 2;
        spans.push(Span::styled(
            pad_right(&row_label(&node), name_width.saturating_sub(used)),
            name_style,
        ));

        if self.show_percentage {
            spans.push(Span::styled(" ", base_style));
            spans.extend(percent_bar(node.percent, level_color(node.level)));
        }

        spans.push(Span::styled(
            format!(" {}", pad_left(&node.item_count.to_string(), COUNT_WIDTH)),
            base_style,
        ));
        spans.push(Span::styled(
            format!(" {}", pad_left(&format_size(node.bytes), SIZE_WIDTH)),
            base_style,
        ));
        Line::from(spans)
    }
}

impl<'a> Widget for TreeGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        let width = inner_area.width as usize;
        buf.set_line(inner_area.x, inner_area.y, &self.header(width), inner_area.width);

        let visible_height = inner_area.height as usize - 1;
        let rows = (self.scroll_offset..self.view.row_count()).take(visible_height);
        for (i, row) in rows.enumerate() {
            let y = inner_area.y + 1 + i as u16;
            buf.set_line(inner_area.x, y, &self.row(row, width), inner_area.width);
        }
    }
}

/// Text of the name column.
pub fn row_label(node: &DisplayNode) -> String {
    match &node.details {
        NodeDetails::Root { display_name, .. } => display_name.to_string(),
        NodeDetails::Folder { folder } => folder.item_name_any().to_string(),
        NodeDetails::Files { .. } => "Files".to_string(),
    }
}

/// `percent` as a fixed-width bar: the filled share on `fill`, the label
/// centered over both parts.
fn percent_bar(percent: u8, fill: Color) -> Vec<Span<'static>> {
    let label = format!("{}%", percent);
    let text = format!("{:^width$}", label, width = PERCENT_WIDTH);
    let filled = (percent as usize * PERCENT_WIDTH + 50) / 100;
    let (head, tail) = text.split_at(filled.min(text.len()));
    vec![
        Span::styled(head.to_string(), Style::default().bg(fill).fg(Color::Black)),
        Span::styled(tail.to_string(), Style::default()),
    ]
}

/// Format a byte size as human readable.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn pad_left(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:>width$}", truncated, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use sync_tree_view::compare::model::{Category, ContainerRef};
    use sync_tree_view::view::SortSpec;

    fn setup() -> (FolderComparison, TreeView) {
        let mut cmp = FolderComparison::new();
        let base = cmp.add_base_pair(Some("/l/proj".into()), Some("/r/proj".into()));
        let docs = cmp.add_folder(ContainerRef::Base(base), "docs", Category::Equal);
        cmp.add_file(ContainerRef::Folder(docs), "readme", Category::Equal, 3 * 1024, 3 * 1024);
        cmp.add_file(ContainerRef::Base(base), "top", Category::LeftNewer, 1024, 10);
        let view = TreeView::new(
            &cmp,
            SortSpec {
                column: SortColumn::Name,
                ascending: true,
            },
        );
        (cmp, view)
    }

    fn render_text(widget: TreeGridWidget, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn renders_header_and_rows() {
        let (cmp, view) = setup();
        let tc = theme::dark_theme();
        let lines = render_text(TreeGridWidget::new(&view, &cmp, &tc), 60, 4);

        assert!(lines[0].contains("Name ▲"));
        assert!(lines[0].contains("Size"));
        assert!(lines[1].contains("docs"));
        assert!(lines[1].contains("75%"));
        assert!(lines[1].contains("3.00 KB"));
        assert!(lines[2].contains("Files"));
        assert!(lines[2].contains("25%"));
        assert!(lines[3].trim().is_empty());
    }

    #[test]
    fn percentage_column_can_be_hidden() {
        let (cmp, view) = setup();
        let tc = theme::dark_theme();
        let lines = render_text(
            TreeGridWidget::new(&view, &cmp, &tc).show_percentage(false),
            60,
            3,
        );
        assert!(!lines[1].contains('%'));
        assert!(lines[1].contains("docs"));
    }

    #[test]
    fn selected_row_is_highlighted() {
        let (cmp, view) = setup();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        TreeGridWidget::new(&view, &cmp, &tc)
            .selection(1, 0)
            .render(area, &mut buf);

        assert_eq!(buf.cell((0, 2)).unwrap().bg, tc.grid_selected_bg);
        assert_ne!(buf.cell((0, 1)).unwrap().bg, tc.grid_selected_bg);
    }

    #[test]
    fn scroll_offset_skips_rows() {
        let (cmp, view) = setup();
        let tc = theme::dark_theme();
        let lines = render_text(TreeGridWidget::new(&view, &cmp, &tc).selection(1, 1), 60, 3);
        assert!(lines[1].contains("Files"));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let (cmp, view) = setup();
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        TreeGridWidget::new(&view, &cmp, &tc).render(area, &mut buf);
    }

    #[test]
    fn percent_bar_fill_matches_share() {
        let spans = percent_bar(50, Color::Red);
        assert_eq!(spans[0].content.len(), 3);
        assert_eq!(spans[1].content.len(), 3);
        assert_eq!(percent_bar(0, Color::Red)[0].content.len(), 0);
        assert_eq!(percent_bar(100, Color::Red)[0].content.len(), PERCENT_WIDTH);
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn padding_truncates() {
        assert_eq!(pad_right("abcdef", 3), "abc");
        assert_eq!(pad_left("7", 3), "  7");
    }
}
