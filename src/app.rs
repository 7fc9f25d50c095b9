use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use dategrid::{Calendar, CalendarDelegate, CalendarState, Theme};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration, Weekday};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

/// Feeds the status bar with committed selections; with the
/// weekdays-only rule it also vetoes weekend days.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SelectionStatus {
    weekdays_only: bool,
    committed: Option<Date>,
    picks: usize,
}

impl SelectionStatus {
    pub(crate) fn new(weekdays_only: bool) -> SelectionStatus {
        SelectionStatus {
            weekdays_only,
            committed: None,
            picks: 0,
        }
    }

    fn status_line(&self, selected: Date) -> String {
        match self.committed {
            Some(date) => {
                let picks = self.picks;
                format!(" {date} · {picks} picked")
            }
            None => format!(" {selected}"),
        }
    }
}

impl CalendarDelegate for SelectionStatus {
    fn did_select_date(&mut self, date: Date) {
        self.committed = Some(date);
        self.picks += 1;
    }

    fn should_select_date(&mut self, date: Date) -> bool {
        !(self.weekdays_only
            && matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    calendar: CalendarState<SelectionStatus>,
    theme: Theme,
    state: AppState,
}

impl App {
    pub(crate) fn new(calendar: CalendarState<SelectionStatus>, theme: Theme) -> App {
        App {
            calendar,
            theme,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Left => self.select_days(-1),
                KeyCode::Right => self.select_days(1),
                KeyCode::Up => self.select_days(-7),
                KeyCode::Down => self.select_days(7),
                KeyCode::Char('j') => self.calendar.scroll_rows(1).is_ok(),
                KeyCode::Char('k') => self.calendar.scroll_rows(-1).is_ok(),
                KeyCode::Char('z') | KeyCode::PageDown => self.calendar.page_forwards().is_ok(),
                KeyCode::Char('w') | KeyCode::PageUp => self.calendar.page_backwards().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    let selected = self.calendar.selected();
                    self.calendar.scroll_to_date(selected);
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('0') => state.handle_input(JumpToInput::Digit(0)),
                        KeyCode::Char('1') => state.handle_input(JumpToInput::Digit(1)),
                        KeyCode::Char('2') => state.handle_input(JumpToInput::Digit(2)),
                        KeyCode::Char('3') => state.handle_input(JumpToInput::Digit(3)),
                        KeyCode::Char('4') => state.handle_input(JumpToInput::Digit(4)),
                        KeyCode::Char('5') => state.handle_input(JumpToInput::Digit(5)),
                        KeyCode::Char('6') => state.handle_input(JumpToInput::Digit(6)),
                        KeyCode::Char('7') => state.handle_input(JumpToInput::Digit(7)),
                        KeyCode::Char('8') => state.handle_input(JumpToInput::Digit(8)),
                        KeyCode::Char('9') => state.handle_input(JumpToInput::Digit(9)),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.calendar.scroll_to_date(date);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn select_days(&mut self, days: i64) -> bool {
        let Some(target) = self.calendar.selected().checked_add(Duration::days(days)) else {
            return false;
        };
        self.calendar.select(target)
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [calendar_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Calendar::new()
            .theme(self.theme)
            .render(calendar_area, buf, &mut self.calendar);
        let status = self.calendar.delegate().status_line(self.calendar.selected());
        Line::raw(status).style(BASE_STYLE).render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
