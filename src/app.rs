use std::time::Instant;

use sync_tree_view::compare::model::FolderComparison;
use sync_tree_view::config::AppConfig;
use sync_tree_view::view::{ActionFilter, CategoryFilter, NodeStatus, TreeView};

/// Which toggle bar drives the view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Category,
    Action,
}

impl FilterMode {
    /// Parse filter mode from config string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "action" => FilterMode::Action,
            _ => FilterMode::Category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::Category => "Category",
            FilterMode::Action => "Action",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            FilterMode::Category => FilterMode::Action,
            FilterMode::Action => FilterMode::Category,
        }
    }
}

/// Main application state.
pub struct App {
    pub cmp: FolderComparison,
    pub view: TreeView,
    pub selected: usize,
    pub scroll_offset: usize,
    /// Rows visible in the grid, updated on every draw.
    pub viewport_height: usize,
    pub filter_mode: FilterMode,
    pub category_filter: CategoryFilter,
    pub action_filter: ActionFilter,
    pub show_percentage: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App over a finished comparison.
    pub fn new(cmp: FolderComparison, config: &AppConfig) -> Self {
        let view = TreeView::new(&cmp, config.sort_spec());
        let show_inactive = config.show_inactive();

        let mut app = Self {
            cmp,
            view,
            selected: 0,
            scroll_offset: 0,
            viewport_height: 0,
            filter_mode: FilterMode::from_str(config.filter_mode()),
            category_filter: CategoryFilter {
                show_inactive,
                ..Default::default()
            },
            action_filter: ActionFilter {
                show_inactive,
                ..Default::default()
            },
            show_percentage: config.show_percentage(),
            should_quit: false,
            status_message: None,
        };
        app.apply_filter();
        app
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.view.row_count() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.view.row_count().saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let step = self.viewport_height.max(1);
        self.selected = (self.selected + step).min(self.view.row_count().saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        let step = self.viewport_height.max(1);
        self.selected = self.selected.saturating_sub(step);
    }

    /// Update the scroll offset to ensure the selected row is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        self.viewport_height = visible_height;
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }

    // ── Tree operations ──────────────────────────────────────────────────────

    /// Expand a collapsed row, or step onto the first child of an expanded one.
    pub fn expand_or_step_in(&mut self) {
        match self.view.status(self.selected) {
            NodeStatus::Expanded => self.select_next(),
            NodeStatus::Collapsible => self.view.expand(&self.cmp, self.selected),
            NodeStatus::Empty => {}
        }
    }

    /// Collapse an expanded row, otherwise jump to its parent.
    pub fn collapse_or_step_out(&mut self) {
        match self.view.status(self.selected) {
            NodeStatus::Expanded => self.view.collapse(self.selected),
            NodeStatus::Collapsible | NodeStatus::Empty => {
                if let Some(parent) = self.view.parent_of(self.selected) {
                    self.selected = parent;
                }
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        match self.view.status(self.selected) {
            NodeStatus::Expanded => self.view.collapse(self.selected),
            NodeStatus::Collapsible => self.view.expand(&self.cmp, self.selected),
            NodeStatus::Empty => {}
        }
    }

    // ── Sorting ──────────────────────────────────────────────────────────────

    /// Switch to the next column in its natural direction.
    pub fn cycle_sort_column(&mut self) {
        let column = self.view.sort_config().column.next();
        self.view.set_sort(&self.cmp, column, column.default_ascending());
        self.set_status_message(format!("Sort: {}", column.label()));
    }

    pub fn flip_sort_direction(&mut self) {
        let spec = self.view.sort_config();
        self.view.set_sort(&self.cmp, spec.column, !spec.ascending);
    }

    // ── Filtering ────────────────────────────────────────────────────────────

    pub fn switch_filter_mode(&mut self) {
        self.filter_mode = self.filter_mode.next();
        self.apply_filter();
        self.set_status_message(format!("Filter by {}", self.filter_mode.label().to_lowercase()));
    }

    /// Flip option `index` of the active filter family.
    pub fn toggle_filter_option(&mut self, index: usize) {
        match self.filter_mode {
            FilterMode::Category => self.category_filter.toggle(index),
            FilterMode::Action => self.action_filter.toggle(index),
        }
        self.apply_filter();
    }

    /// Show inactive items in both families.
    pub fn toggle_show_inactive(&mut self) {
        let show = !self.category_filter.show_inactive;
        self.category_filter.show_inactive = show;
        self.action_filter.show_inactive = show;
        self.apply_filter();
        self.set_status_message(if show {
            "Showing inactive items".to_string()
        } else {
            "Hiding inactive items".to_string()
        });
    }

    pub fn toggle_percentage(&mut self) {
        self.show_percentage = !self.show_percentage;
    }

    /// Labels and states of the active family's toggles.
    pub fn filter_toggles(&self) -> Vec<(&'static str, bool)> {
        match self.filter_mode {
            FilterMode::Category => CategoryFilter::LABELS
                .iter()
                .copied()
                .zip(self.category_filter.flags())
                .collect(),
            FilterMode::Action => ActionFilter::LABELS
                .iter()
                .copied()
                .zip(self.action_filter.flags())
                .collect(),
        }
    }

    fn apply_filter(&mut self) {
        match self.filter_mode {
            FilterMode::Category => self
                .view
                .apply_filter_by_category(&self.cmp, self.category_filter),
            FilterMode::Action => self.view.apply_filter_by_action(&self.cmp, self.action_filter),
        }
        tracing::debug!(rows = self.view.row_count(), mode = ?self.filter_mode, "filter applied");

        let rows = self.view.row_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }
}
