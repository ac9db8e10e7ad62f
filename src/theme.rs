//! Viewer colors: a fixed dark palette plus per-level percentage bar colors.

use ratatui::style::Color;

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Grid
    pub grid_fg: Color,
    pub grid_selected_bg: Color,
    pub grid_selected_fg: Color,
    pub root_fg: Color,
    pub folder_fg: Color,
    pub files_fg: Color,
    pub header_fg: Color,
    pub disclosure_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        grid_fg: Color::Rgb(205, 214, 244),          // #cdd6f4 (text)
        grid_selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        grid_selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        root_fg: Color::Rgb(203, 166, 247),          // #cba6f7 (mauve)
        folder_fg: Color::Rgb(137, 180, 250),        // #89b4fa (blue)
        files_fg: Color::Rgb(205, 214, 244),
        header_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        disclosure_fg: Color::Rgb(108, 112, 134), // #6c7086 (overlay0)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        info_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086
    }
}

/// Percentage bar fill for nesting `level`; twelve pastel tones, repeating.
pub fn level_color(level: usize) -> Color {
    const PALETTE: [(u8, u8, u8); 12] = [
        (0xcc, 0xcc, 0xff),
        (0xcc, 0xff, 0xcc),
        (0xff, 0xff, 0x99),
        (0xdd, 0xdd, 0xdd),
        (0xff, 0xcc, 0xff),
        (0x99, 0xff, 0xcc),
        (0xcc, 0xcc, 0x99),
        (0xff, 0xcc, 0xcc),
        (0xcc, 0xff, 0x99),
        (0xff, 0xff, 0xcc),
        (0xcc, 0xff, 0xff),
        (0xff, 0xcc, 0x99),
    ];
    let (r, g, b) = PALETTE[level % PALETTE.len()];
    Color::Rgb(r, g, b)
}
