use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Two-line status bar: selection details on top, sort and filter toggles
/// with key hints below. A status message replaces the top line.
pub struct StatusBarWidget<'a> {
    info: &'a str,
    theme: &'a ThemeColors,
    sort_label: &'a str,
    filter_label: &'a str,
    toggles: &'a [(&'static str, bool)],
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            info,
            theme,
            sort_label: "",
            filter_label: "",
            toggles: &[],
            status_message: None,
            is_error: false,
        }
    }

    pub fn sort_label(mut self, label: &'a str) -> Self {
        self.sort_label = label;
        self
    }

    pub fn filter(mut self, label: &'a str, toggles: &'a [(&'static str, bool)]) -> Self {
        self.filter_label = label;
        self.toggles = toggles;
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    fn top_line(&self, width: usize) -> Line<'static> {
        match self.status_message {
            Some(msg) => {
                let style = if self.is_error {
                    Style::default()
                        .bg(self.theme.error_fg)
                        .fg(self.theme.status_fg)
                } else {
                    Style::default().fg(self.theme.success_fg)
                };
                Line::from(Span::styled(fit(msg, width), style))
            }
            None => Line::from(Span::styled(
                fit(self.info, width),
                Style::default().fg(self.theme.status_fg),
            )),
        }
    }

    fn bottom_line(&self, width: usize) -> Line<'static> {
        let key_hints = " s:sort r:rev f:filter x:inactive p:% q:quit ";

        let mut spans = vec![
            Span::styled(
                format!("{} ", self.sort_label),
                Style::default().fg(self.theme.info_fg),
            ),
            Span::styled(
                format!("{}:", self.filter_label),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        for (i, (label, enabled)) in self.toggles.iter().enumerate() {
            let style = if *enabled {
                Style::default().fg(self.theme.status_fg)
            } else {
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::CROSSED_OUT)
            };
            spans.push(Span::styled(format!(" {}:{}", i + 1, label), style));
        }

        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let hints_len = key_hints.len();
        if used + hints_len < width {
            spans.push(Span::raw(" ".repeat(width - used - hints_len)));
            spans.push(Span::styled(
                key_hints,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        buf.set_style(area, Style::default().bg(self.theme.status_bg));
        buf.set_line(area.x, area.y, &self.top_line(width), area.width);
        if area.height > 1 {
            buf.set_line(area.x, area.y + 1, &self.bottom_line(width), area.width);
        }
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;
    use ratatui::style::Color;

    fn test_theme() -> ThemeColors {
        theme::dark_theme()
    }

    fn row_text(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_info_and_filters_rendered() {
        let tc = test_theme();
        let toggles = [("left only", true), ("equal", false)];
        let widget = StatusBarWidget::new("docs · 3 items", &tc)
            .sort_label("Sort: Size ▼")
            .filter("Category", &toggles);

        let area = Rect::new(0, 0, 120, 2);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row_text(&buf, 0, 120).contains("docs · 3 items"));
        let bottom = row_text(&buf, 1, 120);
        assert!(bottom.contains("Sort: Size ▼"));
        assert!(bottom.contains("1:left only"));
        assert!(bottom.contains("2:equal"));
        assert!(bottom.contains("q:quit"));
    }

    #[test]
    fn test_disabled_toggle_is_dimmed() {
        let tc = test_theme();
        let toggles = [("equal", false)];
        let widget = StatusBarWidget::new("", &tc).filter("Category", &toggles);

        let area = Rect::new(0, 0, 80, 2);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let bottom = row_text(&buf, 1, 80);
        let x = bottom.find("1:equal").unwrap() as u16;
        let cell = buf.cell((x, 1)).unwrap();
        assert_eq!(cell.fg, tc.dim_fg);
        assert!(cell.modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_status_message_success() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("info", &tc).status_message("Sort: Name", false);

        let area = Rect::new(0, 0, 80, 2);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        assert!(row_text(&buf, 0, 80).contains("Sort: Name"));
        assert!(!row_text(&buf, 0, 80).contains("info"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, Color::Rgb(166, 227, 161));
    }

    #[test]
    fn test_status_message_error() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("info", &tc).status_message("Folder removed", true);

        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.bg, Color::Rgb(243, 139, 168));
        assert_eq!(cell.fg, Color::Rgb(205, 214, 244));
    }

    #[test]
    fn test_narrow_area_drops_hints() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("x", &tc).sort_label("Sort: Name ▲");
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert!(!row_text(&buf, 1, 20).contains("quit"));
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = test_theme();
        let widget = StatusBarWidget::new("info", &tc);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
    }
}
