use crate::state::CalendarState;
use crate::theme::{RowSeparator, Theme};
use crate::weeks::{Row, Week, WeekdayExt, DAYS_IN_WEEK};
use crate::CalendarDelegate;
use ratatui::{prelude::*, widgets::*};
use std::marker::PhantomData;

/// Columns per day cell, sized for a two-digit day plus its selection
/// brackets
const CELL_WIDTH: u16 = 4;

/// Weekday columns of the grid
const WEEK_COLUMNS: u16 = 7;

static WEEKDAY_LABELS: [&str; DAYS_IN_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const RULE: char = '─';

/// The calendar widget.  Everything that persists between frames lives
/// in the [`CalendarState`] it renders; the widget itself carries only
/// a [`Theme`] and is cheap to rebuild per draw call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Calendar<D> {
    theme: Theme,
    _delegate: PhantomData<D>,
}

impl<D> Calendar<D> {
    pub fn new() -> Calendar<D> {
        Calendar {
            theme: Theme::new(),
            _delegate: PhantomData,
        }
    }

    /// Replaces the default appearance.
    pub fn theme(mut self, theme: Theme) -> Calendar<D> {
        self.theme = theme;
        self
    }
}

impl<D> Default for Calendar<D> {
    fn default() -> Calendar<D> {
        Calendar::new()
    }
}

impl<D: CalendarDelegate> StatefulWidget for Calendar<D> {
    type State = CalendarState<D>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = apply_inset(area, self.theme.content_inset);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let spacing = self.theme.item_spacing;
        let width = grid_width(spacing);
        let left = inner.width.saturating_sub(width) / 2;
        let rows = state.grid_rows();
        let separator = self.theme.separator.height();
        let offset = state.ensure_visible(&rows, separator, inner.height);
        let mut canvas = BufferCanvas::new(inner, buf);
        let mut y = 0u16;
        for (index, row) in rows.iter().enumerate().skip(offset) {
            if y >= inner.height {
                break;
            }
            match row {
                Row::Header { year, month } => {
                    let title = center(&format!("{month} {year}"), width);
                    canvas.mvprint(y, left, title, self.theme.header());
                    y = y.saturating_add(1);
                }
                Row::Weekdays => {
                    canvas.mvprint(y, left, weekday_bar(spacing), self.theme.weekday_bar());
                    y = y.saturating_add(1);
                }
                Row::Week(week) => {
                    self.draw_week(&mut canvas, y, left, week, state);
                    y = y.saturating_add(1);
                    if index + 1 < rows.len() {
                        if let RowSeparator::Rule(_) = self.theme.separator {
                            for line in 0..separator {
                                canvas.hline(
                                    y.saturating_add(line),
                                    left,
                                    RULE,
                                    width,
                                    self.theme.rule(),
                                );
                            }
                        }
                        y = y.saturating_add(separator);
                    }
                }
            }
        }
    }
}

impl<D: CalendarDelegate> Calendar<D> {
    fn draw_week(
        &self,
        canvas: &mut BufferCanvas<'_>,
        y: u16,
        left: u16,
        week: &Week,
        state: &CalendarState<D>,
    ) {
        let stride = CELL_WIDTH.saturating_add(self.theme.item_spacing);
        for (wd, cell) in week.columns() {
            let Some(date) = cell else {
                continue;
            };
            let outside = week.is_outside(date);
            if outside && !state.shows_outside_days() {
                continue;
            }
            let selected = !outside && date == state.selected();
            let day = date.day();
            let text = if selected {
                format!("[{day:2}]")
            } else {
                format!(" {day:2} ")
            };
            let x = left.saturating_add(stride.saturating_mul(wd.index0()));
            canvas.mvprint(y, x, text, self.theme.day_cell(selected, outside));
        }
    }
}

fn grid_width(item_spacing: u16) -> u16 {
    CELL_WIDTH
        .saturating_mul(WEEK_COLUMNS)
        .saturating_add(item_spacing.saturating_mul(WEEK_COLUMNS - 1))
}

fn center(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let len = text.chars().count();
    if len >= width {
        return text.to_owned();
    }
    let left = (width - len) / 2;
    let mut line = " ".repeat(left);
    line.push_str(text);
    line.push_str(&" ".repeat(width - left - len));
    line
}

fn weekday_bar(item_spacing: u16) -> String {
    let gutter = " ".repeat(usize::from(item_spacing));
    WEEKDAY_LABELS
        .map(|label| format!(" {label} "))
        .join(gutter.as_str())
}

fn apply_inset(area: Rect, inset: Padding) -> Rect {
    Rect {
        x: area.x.saturating_add(inset.left),
        y: area.y.saturating_add(inset.top),
        width: area
            .width
            .saturating_sub(inset.left.saturating_add(inset.right)),
        height: area
            .height
            .saturating_sub(inset.top.saturating_add(inset.bottom)),
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> BufferCanvas<'a> {
        BufferCanvas { area, buf }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond
            // the widget's area, though we need to be sure that the Rect
            // passed to the Paragraph is entirely within the frame lest a
            // panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16, style: Style) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ACCENT;
    use time::macros::date;

    fn render<D: CalendarDelegate>(
        cal: Calendar<D>,
        area: Rect,
        state: &mut CalendarState<D>,
    ) -> Buffer {
        let mut buffer = Buffer::empty(area);
        cal.render(area, &mut buffer, state);
        buffer
    }

    // February 2026 starts on a Sunday and spans exactly four weeks,
    // which keeps the expected grids small.
    #[test]
    fn renders_a_single_month_grid() {
        let mut state = CalendarState::new(date!(2026 - 02 - 01), ());
        let area = Rect::new(0, 0, 28, 9);
        let buffer = render(Calendar::new(), area, &mut state);
        let mut expected = Buffer::with_lines([
            "       February 2026        ",
            " Su  Mo  Tu  We  Th  Fr  Sa ",
            "[ 1]  2   3   4   5   6   7 ",
            "                            ",
            "  8   9  10  11  12  13  14 ",
            "                            ",
            " 15  16  17  18  19  20  21 ",
            "                            ",
            " 22  23  24  25  26  27  28 ",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(0, 0, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 1, 28, 1), text.add_modifier(Modifier::BOLD));
        for y in [2, 4, 6, 8] {
            expected.set_style(Rect::new(0, y, 28, 1), text);
        }
        expected.set_style(Rect::new(0, 2, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn outside_days_are_hidden_by_default() {
        let mut state = CalendarState::new(date!(2026 - 08 - 01), ());
        let area = Rect::new(0, 0, 28, 3);
        let buffer = render(Calendar::new(), area, &mut state);
        let mut expected = Buffer::with_lines([
            "        August 2026         ",
            " Su  Mo  Tu  We  Th  Fr  Sa ",
            "                        [ 1]",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(0, 0, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 1, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(24, 2, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn outside_days_render_dimmed_when_shown() {
        let mut state = CalendarState::new(date!(2026 - 08 - 01), ()).show_outside_days(true);
        let area = Rect::new(0, 0, 28, 3);
        let buffer = render(Calendar::new(), area, &mut state);
        let mut expected = Buffer::with_lines([
            "        August 2026         ",
            " Su  Mo  Tu  We  Th  Fr  Sa ",
            " 26  27  28  29  30  31 [ 1]",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(0, 0, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 1, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 2, 24, 1), text.add_modifier(Modifier::DIM));
        expected.set_style(Rect::new(24, 2, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn rule_separator_draws_borders_between_weeks() {
        let theme = Theme {
            separator: RowSeparator::Rule(1),
            border_color: Some(Color::Red),
            ..Theme::new()
        };
        let mut state = CalendarState::new(date!(2026 - 02 - 01), ());
        let area = Rect::new(0, 0, 28, 9);
        let buffer = render(Calendar::new().theme(theme), area, &mut state);
        let mut expected = Buffer::with_lines([
            "       February 2026        ",
            " Su  Mo  Tu  We  Th  Fr  Sa ",
            "[ 1]  2   3   4   5   6   7 ",
            "────────────────────────────",
            "  8   9  10  11  12  13  14 ",
            "────────────────────────────",
            " 15  16  17  18  19  20  21 ",
            "────────────────────────────",
            " 22  23  24  25  26  27  28 ",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(0, 0, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 1, 28, 1), text.add_modifier(Modifier::BOLD));
        for y in [2, 4, 6, 8] {
            expected.set_style(Rect::new(0, y, 28, 1), text);
        }
        for y in [3, 5, 7] {
            expected.set_style(Rect::new(0, y, 28, 1), Style::new().fg(Color::Red));
        }
        expected.set_style(Rect::new(0, 2, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn content_inset_shifts_the_grid() {
        let theme = Theme {
            content_inset: Padding::new(2, 0, 1, 0),
            ..Theme::new()
        };
        let mut state = CalendarState::new(date!(2026 - 02 - 01), ());
        let area = Rect::new(0, 0, 30, 10);
        let buffer = render(Calendar::new().theme(theme), area, &mut state);
        let mut expected = Buffer::with_lines([
            "                              ",
            "         February 2026        ",
            "   Su  Mo  Tu  We  Th  Fr  Sa ",
            "  [ 1]  2   3   4   5   6   7 ",
            "                              ",
            "    8   9  10  11  12  13  14 ",
            "                              ",
            "   15  16  17  18  19  20  21 ",
            "                              ",
            "   22  23  24  25  26  27  28 ",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(2, 1, 28, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(2, 2, 28, 1), text.add_modifier(Modifier::BOLD));
        for y in [3, 5, 7, 9] {
            expected.set_style(Rect::new(2, y, 28, 1), text);
        }
        expected.set_style(Rect::new(2, 3, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn item_spacing_widens_the_grid() {
        let theme = Theme {
            item_spacing: 1,
            ..Theme::new()
        };
        let mut state = CalendarState::new(date!(2026 - 02 - 01), ());
        let area = Rect::new(0, 0, 34, 3);
        let buffer = render(Calendar::new().theme(theme), area, &mut state);
        let mut expected = Buffer::with_lines([
            "          February 2026           ",
            " Su   Mo   Tu   We   Th   Fr   Sa ",
            "[ 1]   2    3    4    5    6    7 ",
        ]);
        let text = Style::new().fg(Color::DarkGray);
        expected.set_style(Rect::new(0, 0, 34, 1), text.add_modifier(Modifier::BOLD));
        expected.set_style(Rect::new(0, 1, 34, 1), text.add_modifier(Modifier::BOLD));
        for x in 0..7u16 {
            expected.set_style(Rect::new(x * 5, 2, 4, 1), text);
        }
        expected.set_style(Rect::new(0, 2, 4, 1), text.bg(ACCENT));
        assert_eq!(buffer, expected);
    }
}
