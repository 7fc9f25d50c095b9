use ratatui::{
    style::{Color, Modifier, Style},
    widgets::Padding,
};

/// Ambient accent color, used as the highlight wherever no explicit
/// color is configured.
pub const ACCENT: Color = Color::LightBlue;

/// Vertical treatment of the space between consecutive week rows.
///
/// The two renditions are mutually exclusive by construction: a grid
/// either leaves blank rows between its weeks or rules them off, never
/// both.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowSeparator {
    /// Leave this many blank rows, revealing whatever background the
    /// host drew beneath the widget.
    Gap(u16),
    /// Draw this many rows of horizontal rule in the border color.
    Rule(u16),
}

impl RowSeparator {
    pub(crate) fn height(self) -> u16 {
        match self {
            RowSeparator::Gap(rows) | RowSeparator::Rule(rows) => rows,
        }
    }
}

/// Appearance configuration for a [`Calendar`](crate::Calendar).
///
/// All fields are public; [`Theme::new`] (and `Default`) gives the
/// stock appearance: plain dark-gray day cells separated by a one-row
/// gap, bold header and weekday rows, no backgrounds, and the
/// [`ACCENT`] highlight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Theme {
    /// Inset applied to the widget's area before any layout.
    pub content_inset: Padding,
    /// Columns inserted between day-cell columns.
    pub item_spacing: u16,
    /// Treatment of the space between week rows.
    pub separator: RowSeparator,
    /// Color of [`RowSeparator::Rule`] lines.  `None` falls back to
    /// `text_color`.
    pub border_color: Option<Color>,
    /// Modifiers for day-cell text.
    pub day_style: Style,
    /// Modifiers for the month header.
    pub header_style: Style,
    /// Modifiers for the weekday bar.
    pub weekday_style: Style,
    /// Day-cell foreground, and the fallback for the other text colors.
    pub text_color: Color,
    /// Month-header foreground.  `None` falls back to `text_color`.
    pub header_text_color: Option<Color>,
    /// Weekday-bar foreground.  `None` falls back to `text_color`.
    pub weekday_text_color: Option<Color>,
    /// Background filled across the full header row, or `None` to leave
    /// it clear.
    pub header_background: Option<Color>,
    /// Per-day-cell background, or `None` for no fill.
    pub cell_background: Option<Color>,
    /// Background of the selected cell.
    pub highlight_color: Color,
}

impl Theme {
    pub const fn new() -> Theme {
        Theme {
            content_inset: Padding::ZERO,
            item_spacing: 0,
            separator: RowSeparator::Gap(1),
            border_color: None,
            day_style: Style::new(),
            header_style: Style::new().add_modifier(Modifier::BOLD),
            weekday_style: Style::new().add_modifier(Modifier::BOLD),
            text_color: Color::DarkGray,
            header_text_color: None,
            weekday_text_color: None,
            header_background: None,
            cell_background: None,
            highlight_color: ACCENT,
        }
    }

    pub(crate) fn header(&self) -> Style {
        let style = self
            .header_style
            .fg(self.header_text_color.unwrap_or(self.text_color));
        self.header_background.map_or(style, |bg| style.bg(bg))
    }

    pub(crate) fn weekday_bar(&self) -> Style {
        self.weekday_style
            .fg(self.weekday_text_color.unwrap_or(self.text_color))
    }

    pub(crate) fn day_cell(&self, selected: bool, outside: bool) -> Style {
        let mut style = self.day_style.fg(self.text_color);
        if let Some(bg) = self.cell_background {
            style = style.bg(bg);
        }
        if outside {
            style = style.add_modifier(Modifier::DIM);
        }
        if selected {
            style = style.bg(self.highlight_color);
        }
        style
    }

    pub(crate) fn rule(&self) -> Style {
        Style::new().fg(self.border_color.unwrap_or(self.text_color))
    }
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_separator_is_a_single_row_gap() {
        assert_eq!(Theme::new().separator, RowSeparator::Gap(1));
    }

    #[test]
    fn a_rule_replaces_the_gap_entirely() {
        let theme = Theme {
            separator: RowSeparator::Rule(2),
            ..Theme::new()
        };
        assert!(matches!(theme.separator, RowSeparator::Rule(_)));
        assert_eq!(theme.separator.height(), 2);
    }

    #[test]
    fn border_color_falls_back_to_text_color() {
        let theme = Theme::new();
        assert_eq!(theme.rule().fg, Some(Color::DarkGray));
        let theme = Theme {
            border_color: Some(Color::Red),
            ..theme
        };
        assert_eq!(theme.rule().fg, Some(Color::Red));
    }

    #[test]
    fn header_colors_fall_back_to_text_color() {
        let theme = Theme::new();
        assert_eq!(theme.header().fg, Some(Color::DarkGray));
        assert_eq!(theme.header().bg, None);
        let theme = Theme {
            header_text_color: Some(Color::Yellow),
            header_background: Some(Color::Blue),
            ..theme
        };
        assert_eq!(theme.header().fg, Some(Color::Yellow));
        assert_eq!(theme.header().bg, Some(Color::Blue));
    }

    #[test]
    fn selected_cell_gets_the_highlight_background() {
        let style = Theme::new().day_cell(true, false);
        assert_eq!(style.bg, Some(ACCENT));
        let style = Theme {
            highlight_color: Color::Green,
            ..Theme::new()
        }
        .day_cell(true, false);
        assert_eq!(style.bg, Some(Color::Green));
    }
}
