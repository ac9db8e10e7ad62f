use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use sync_tree_view::view::{DisplayNode, NodeDetails};

use crate::app::App;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree_grid::{format_size, row_label, TreeGridWidget};
use crate::theme::ThemeColors;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame, theme: &ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(frame.area());

    // border + header row
    let visible_height = chunks[0].height.saturating_sub(3) as usize;
    app.update_scroll(visible_height);
    app.clear_expired_status();

    let title = format!(" {} rows ", app.view.row_count());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));
    let grid = TreeGridWidget::new(&app.view, &app.cmp, theme)
        .selection(app.selected, app.scroll_offset)
        .show_percentage(app.show_percentage)
        .block(block);
    frame.render_widget(grid, chunks[0]);

    let (info, stale) = selection_info(app);
    let sort = app.view.sort_config();
    let sort_label = format!(
        "Sort: {} {}",
        sort.column.label(),
        if sort.ascending { "▲" } else { "▼" }
    );
    let toggles = app.filter_toggles();

    let mut status = StatusBarWidget::new(&info, theme)
        .sort_label(&sort_label)
        .filter(app.filter_mode.label(), &toggles);
    if let Some((msg, _)) = &app.status_message {
        status = status.status_message(msg, false);
    } else if stale {
        status = status.status_message(&info, true);
    }
    frame.render_widget(status, chunks[1]);
}

/// One-line description of the selected row, and whether that row is stale.
fn selection_info(app: &App) -> (String, bool) {
    if app.view.row_count() == 0 {
        return ("Nothing to show with the current filter".to_string(), false);
    }
    match app.view.line_at(&app.cmp, app.selected) {
        Some(node) => (describe(&node), false),
        None => ("Item no longer exists".to_string(), true),
    }
}

fn describe(node: &DisplayNode) -> String {
    let totals = format!("{} items, {}", node.item_count, format_size(node.bytes));
    match &node.details {
        NodeDetails::Root { base, .. } => {
            let side = |p: &Option<std::path::PathBuf>| {
                p.as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string())
            };
            format!(
                "{} ⇄ {} | {}",
                side(&base.left_path),
                side(&base.right_path),
                totals
            )
        }
        NodeDetails::Folder { folder } => format!(
            "{} | {} | {} | {}",
            row_label(node),
            folder.category.label(),
            folder.sync_operation().label(),
            totals
        ),
        NodeDetails::Files { items } => {
            let names: Vec<&str> = items.iter().map(|i| i.item_name_any()).collect();
            format!("{} | {}", totals, names.join(", "))
        }
    }
}
