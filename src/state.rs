use crate::weeks::{build_rows, first_day_of_month, last_day_of_month, Row};
use crate::CalendarDelegate;
use thiserror::Error;
use time::Date;

/// Date range, selection, and scroll state behind a
/// [`Calendar`](crate::Calendar) widget.
///
/// The displayed grid always covers whole months, every month from the
/// start date's through the end date's.  The widget rebuilds the grid
/// from this state on each render, so range changes take effect on the
/// next frame without an explicit regeneration step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarState<D> {
    start: Date,
    end: Date,
    selected: Date,
    show_outside_days: bool,
    select_before_start: bool,
    delegate: D,
    offset: usize,
    max_offset: usize,
    viewport_rows: usize,
    pending_scroll: Option<Date>,
}

impl<D: CalendarDelegate> CalendarState<D> {
    /// Creates a calendar starting at `start`.  The end date defaults
    /// to the last day of `start`'s month and the selection to `start`
    /// itself.
    pub fn new(start: Date, delegate: D) -> CalendarState<D> {
        CalendarState {
            start,
            end: last_day_of_month(start),
            selected: start,
            show_outside_days: false,
            select_before_start: true,
            delegate,
            offset: 0,
            max_offset: 0,
            viewport_rows: 1,
            pending_scroll: None,
        }
    }

    /// Sets the inclusive end of the displayed range.
    pub fn end_date(mut self, end: Date) -> Result<CalendarState<D>, RangeError> {
        if end < self.start {
            return Err(RangeError {
                start: self.start,
                end,
            });
        }
        self.end = end;
        self.selected = self.clamp_selectable(self.selected);
        Ok(self)
    }

    /// Sets the selected date, clamped into the selectable interval.
    /// Programmatic selection does not consult the delegate.
    pub fn selected_date(mut self, date: Date) -> CalendarState<D> {
        self.selected = self.clamp_selectable(date);
        self
    }

    /// Whether day cells belonging to adjacent months render in the
    /// weeks that pad a month section out to full width.
    pub fn show_outside_days(mut self, show: bool) -> CalendarState<D> {
        self.show_outside_days = show;
        self
    }

    /// Whether days of the first month that precede the start date can
    /// be selected.
    pub fn select_before_start(mut self, can: bool) -> CalendarState<D> {
        self.select_before_start = can;
        self
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn selected(&self) -> Date {
        self.selected
    }

    pub fn shows_outside_days(&self) -> bool {
        self.show_outside_days
    }

    pub fn can_select_before_start(&self) -> bool {
        self.select_before_start
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Moves the start of the displayed range.  Fails if `start` would
    /// pass the current end date.
    pub fn set_start(&mut self, start: Date) -> Result<(), RangeError> {
        if self.end < start {
            return Err(RangeError {
                start,
                end: self.end,
            });
        }
        self.start = start;
        self.selected = self.clamp_selectable(self.selected);
        Ok(())
    }

    /// Moves the end of the displayed range.  Fails if `end` would pass
    /// the current start date.
    pub fn set_end(&mut self, end: Date) -> Result<(), RangeError> {
        if end < self.start {
            return Err(RangeError {
                start: self.start,
                end,
            });
        }
        self.end = end;
        self.selected = self.clamp_selectable(self.selected);
        Ok(())
    }

    /// Programmatic selection: clamps `date` into the selectable
    /// interval and schedules a scroll that brings the selection
    /// on-screen.  The delegate is not consulted.
    pub fn set_selected(&mut self, date: Date) {
        self.selected = self.clamp_selectable(date);
        self.pending_scroll = Some(self.selected);
    }

    /// Whether `date` may become the selection.
    pub fn is_selectable(&self, date: Date) -> bool {
        (self.lower_selectable()..=self.end).contains(&date)
    }

    /// Attempts to select `date`.  The selection commits only when the
    /// date is selectable and the delegate does not veto it; a commit
    /// schedules a scroll that brings the date on-screen and then
    /// notifies the delegate.  Returns whether the selection was
    /// committed.
    pub fn select(&mut self, date: Date) -> bool {
        if !self.is_selectable(date) || !self.delegate.should_select_date(date) {
            return false;
        }
        self.selected = date;
        self.pending_scroll = Some(date);
        self.delegate.did_select_date(date);
        true
    }

    /// Forces the grid to scroll so that `date`'s week is on-screen at
    /// the next render.  Dates outside the displayed months are clamped
    /// to the nearest grid edge.
    pub fn scroll_to_date(&mut self, date: Date) {
        let clamped = date.clamp(
            first_day_of_month(self.start),
            last_day_of_month(self.end),
        );
        self.pending_scroll = Some(clamped);
    }

    /// Scrolls by whole grid rows.  Fails without moving when already
    /// at the corresponding edge.
    pub fn scroll_rows(&mut self, delta: isize) -> Result<(), OutOfRangeError> {
        let target = self.offset.saturating_add_signed(delta).min(self.max_offset);
        if target == self.offset {
            return Err(OutOfRangeError);
        }
        self.pending_scroll = None;
        self.offset = target;
        Ok(())
    }

    /// Scrolls forwards by one viewport's worth of rows.
    pub fn page_forwards(&mut self) -> Result<(), OutOfRangeError> {
        self.scroll_rows(isize::try_from(self.viewport_rows).unwrap_or(isize::MAX))
    }

    /// Scrolls backwards by one viewport's worth of rows.
    pub fn page_backwards(&mut self) -> Result<(), OutOfRangeError> {
        self.scroll_rows(isize::try_from(self.viewport_rows).map_or(isize::MIN, |rows| -rows))
    }

    fn lower_selectable(&self) -> Date {
        if self.select_before_start {
            first_day_of_month(self.start)
        } else {
            self.start
        }
    }

    fn clamp_selectable(&self, date: Date) -> Date {
        date.clamp(self.lower_selectable(), self.end)
    }

    pub(crate) fn grid_rows(&self) -> Vec<Row> {
        build_rows(self.start, self.end)
    }

    /// Resolves any pending scroll against the grid, clamps the offset,
    /// and records the viewport metrics the paging operations use.
    /// Called from the widget once the rendered height is known;
    /// returns the first visible row.
    pub(crate) fn ensure_visible(&mut self, rows: &[Row], separator: u16, viewport: u16) -> usize {
        let viewport = usize::from(viewport.max(1));
        let heights = row_heights(rows, separator);
        self.max_offset = max_offset(&heights, viewport);
        self.offset = self.offset.min(self.max_offset);
        if let Some(date) = self.pending_scroll.take() {
            let target = rows
                .iter()
                .position(|row| matches!(row, Row::Week(week) if week.contains(date)));
            if let Some(target) = target {
                if target < self.offset {
                    self.offset = target;
                } else {
                    while self.offset < target
                        && heights[self.offset..=target].iter().sum::<usize>() > viewport
                    {
                        self.offset += 1;
                    }
                }
                self.offset = self.offset.min(self.max_offset);
            }
        }
        let mut shown = 0;
        let mut filled = 0;
        for height in &heights[self.offset..] {
            filled += height;
            if filled > viewport && shown > 0 {
                break;
            }
            shown += 1;
        }
        self.viewport_rows = shown.max(1);
        self.offset
    }
}

fn row_heights(rows: &[Row], separator: u16) -> Vec<usize> {
    let last = rows.len().saturating_sub(1);
    rows.iter()
        .enumerate()
        .map(|(i, row)| match row {
            Row::Week(_) if i < last => 1 + usize::from(separator),
            _ => 1,
        })
        .collect()
}

// Largest first-row index from which the remaining rows still fill the
// viewport, so scrolling cannot run the grid off the top of the screen.
fn max_offset(heights: &[usize], viewport: usize) -> usize {
    let mut filled = 0;
    for (i, height) in heights.iter().enumerate().rev() {
        filled += height;
        if filled > viewport {
            return (i + 1).min(heights.len() - 1);
        }
    }
    0
}

/// Error returned when a range's end precedes its start.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("calendar range ends ({end}) before it starts ({start})")]
pub struct RangeError {
    pub start: Date,
    pub end: Date,
}

/// Error returned when a scroll step is requested at the edge of the
/// displayed grid.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("reached the edge of the calendar")]
pub struct OutOfRangeError;
