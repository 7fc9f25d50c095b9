mod app;
mod help;
mod jumpto;
use crate::app::{App, SelectionStatus};
use anyhow::Context;
use dategrid::{CalendarState, RowSeparator, Theme};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        start: Option<Date>,
        end: Option<Date>,
        outside: bool,
        weekdays_only: bool,
        border: bool,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut start = None;
        let mut end = None;
        let mut outside = false;
        let mut weekdays_only = false;
        let mut border = false;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("outside") => outside = true,
                Arg::Long("weekdays-only") => weekdays_only = true,
                Arg::Long("border") => border = true,
                Arg::Value(value) if end.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) if start.is_none() => start = Some(d),
                        Ok(d) => end = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            start,
            end,
            outside,
            weekdays_only,
            border,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                start,
                end,
                outside,
                weekdays_only,
                border,
            } => {
                let start = match start {
                    Some(date) => date,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let mut calendar = CalendarState::new(start, SelectionStatus::new(weekdays_only))
                    .show_outside_days(outside);
                if let Some(end) = end {
                    calendar = calendar
                        .end_date(end)
                        .context("end date must not precede the start date")?;
                }
                let mut theme = Theme::new();
                if border {
                    theme.separator = RowSeparator::Rule(1);
                }
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar, theme).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: dategrid [OPTIONS] [STARTDATE] [ENDDATE]");
                println!();
                println!("Browse a scrollable month calendar and pick a date");
                println!();
                println!("Dates are given as YYYY-MM-DD.  The calendar starts at STARTDATE");
                println!("(default: today) and runs through ENDDATE (default: the end of the");
                println!("start month).");
                println!();
                println!("Options:");
                println!("      --border          Rule off week rows instead of spacing them");
                println!("      --outside         Show the days of adjacent months");
                println!("      --weekdays-only   Refuse to select Saturdays and Sundays");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
