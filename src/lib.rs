//! A scrollable month-grid calendar widget for [ratatui], with a
//! delegate-gated notion of the selected date.
//!
//! [`CalendarState`] holds the displayed date range, the selection, and
//! the scroll position; [`Calendar`] renders it as vertically stacked
//! month sections; [`Theme`] carries the appearance knobs.  An
//! application observes (and may veto) selection changes by giving the
//! state a [`CalendarDelegate`].
//!
//! [ratatui]: https://docs.rs/ratatui

mod state;
mod theme;
mod weeks;
mod widget;

pub use crate::state::{CalendarState, OutOfRangeError, RangeError};
pub use crate::theme::{RowSeparator, Theme, ACCENT};
pub use crate::widget::Calendar;
use time::Date;

/// Observer of selection changes on a [`CalendarState`].
///
/// [`did_select_date`](CalendarDelegate::did_select_date) is invoked
/// after every committed selection.  A delegate may additionally veto
/// pending selections by overriding
/// [`should_select_date`](CalendarDelegate::should_select_date); the
/// default implementation approves everything.
pub trait CalendarDelegate {
    /// Called after `date` has become the selected date.
    fn did_select_date(&mut self, date: Date);

    /// Called with a pending selection before it commits.  Returning
    /// `false` leaves the current selection in place and suppresses the
    /// [`did_select_date`](CalendarDelegate::did_select_date)
    /// notification.
    fn should_select_date(&mut self, date: Date) -> bool {
        let _ = date;
        true
    }
}

/// A calendar without an observer: every in-range selection commits.
impl CalendarDelegate for () {
    fn did_select_date(&mut self, _date: Date) {}
}
