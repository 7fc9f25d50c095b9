use std::iter::successors;
use time::{Date, Month, Weekday, Weekday::*};

pub(crate) const DAYS_IN_WEEK: usize = 7;

const WEEKDAYS: [Weekday; DAYS_IN_WEEK] =
    [Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday];

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// One Sunday-first row of a month section.  Cells hold the real date
/// occupying that weekday column, including days of adjacent months;
/// the section tag says which month the row belongs to.  A cell is
/// `None` only where the date would fall outside the representable
/// range.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Week {
    year: i32,
    month: Month,
    days: [Option<Date>; DAYS_IN_WEEK],
}

impl Week {
    // Returns the section week containing `date`, which can be at any
    // day of the week
    fn around(year: i32, month: Month, date: Date) -> Week {
        let i = usize::from(date.weekday().index0());
        let mut week = Week {
            year,
            month,
            days: [None; DAYS_IN_WEEK],
        };
        week.set(date);
        for d in iter_days_before(date).take(i) {
            week.set(d);
        }
        for d in iter_days_after(date).take(DAYS_IN_WEEK - i - 1) {
            week.set(d);
        }
        week
    }

    fn set(&mut self, date: Date) {
        self.days[usize::from(date.weekday().index0())] = Some(date);
    }

    pub(crate) fn get(&self, wd: Weekday) -> Option<Date> {
        self.days.get(usize::from(wd.index0())).copied().flatten()
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = (Weekday, Option<Date>)> + '_ {
        WEEKDAYS.into_iter().map(|wd| (wd, self.get(wd)))
    }

    /// Whether `date` is one of this row's own-section days.
    pub(crate) fn contains(&self, date: Date) -> bool {
        !self.is_outside(date) && self.days.contains(&Some(date))
    }

    /// Whether a cell date belongs to a month other than this row's
    /// section.
    pub(crate) fn is_outside(&self, date: Date) -> bool {
        (date.year(), date.month()) != (self.year, self.month)
    }
}

/// One scrollable unit of the grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Row {
    Header { year: i32, month: Month },
    Weekdays,
    Week(Week),
}

pub(crate) fn first_day_of_month(date: Date) -> Date {
    date.replace_day(1)
        .expect("the first of a valid date's month should exist")
}

pub(crate) fn last_day_of_month(date: Date) -> Date {
    let pivot = date
        .replace_day(28)
        .expect("the 28th of a valid date's month should exist");
    successors(Some(pivot), |&d| d.next_day())
        .take_while(|d| d.month() == date.month())
        .last()
        .expect("a month should contain at least its 28th day")
}

/// The weeks covering one month, first to last, each padded to a full
/// Sunday..Saturday span.
pub(crate) fn month_weeks(year: i32, month: Month) -> Vec<Week> {
    let first = Date::from_calendar_date(year, month, 1)
        .expect("every month of a representable year should start on the 1st");
    let mut weeks = Vec::new();
    let mut date = first;
    loop {
        let week = Week::around(year, month, date);
        weeks.push(week);
        match week.get(Saturday).and_then(Date::next_day) {
            Some(next) if (next.year(), next.month()) == (year, month) => date = next,
            _ => break,
        }
    }
    weeks
}

/// Grid rows for every month from `start`'s through `end`'s.  Requires
/// `start <= end`.
pub(crate) fn build_rows(start: Date, end: Date) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut year = start.year();
    let mut month = start.month();
    loop {
        rows.push(Row::Header { year, month });
        rows.push(Row::Weekdays);
        rows.extend(month_weeks(year, month).into_iter().map(Row::Week));
        if (year, month) == (end.year(), end.month()) {
            break;
        }
        if month == Month::December {
            year += 1;
        }
        month = month.next();
    }
    rows
}

fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day()).skip(1)
}
