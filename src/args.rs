//! Command-line argument parsing using clap.
//!
//! One positional reference date, read as `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]`
//! or `day month year` with a month name.

use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueHint};
use std::io::IsTerminal;
use tracing::debug;

use crate::error::{GestcalError, Result};
use crate::formatter::{
    get_locale_name, locale_from_name, month_names_for_locale, parse_ethiopian_month, parse_month,
};
use crate::types::{
    COLOR_ENABLED_BY_DEFAULT, CalendarDate, CalendarSystem, GUTTER_WIDTH, Mode, MonthNames,
    ReportContext,
};

/// Environment variable that pins "today" for reproducible output.
pub const TODAY_ENV: &str = "GESTCAL_TEST_TIME";

#[derive(Parser, Debug)]
#[command(name = "gestcal")]
#[command(
    about = "Ethiopian/Gregorian EDD and antenatal/postnatal visit calculator",
    long_about = None
)]
#[command(version)]
#[command(after_help = HELP_MESSAGE)]
pub struct Args {
    /// What the date means and which report to show.
    #[arg(
        short = 'm',
        long,
        default_value = "edd",
        help_heading = "Calculation options",
        value_name = "mode"
    )]
    pub mode: Mode,

    /// Calendar the date is written in.
    #[arg(
        short = 'c',
        long,
        default_value = "gregorian",
        help_heading = "Calculation options",
        value_name = "system"
    )]
    pub calendar: CalendarSystem,

    /// Use this date as today (YYYY-MM-DD, Gregorian).
    #[arg(
        short = 't',
        long,
        help_heading = "Calculation options",
        value_name = "date"
    )]
    pub today: Option<String>,

    /// Language of Ethiopian month names (default from locale).
    #[arg(short = 'l', long, help_heading = "Output options", value_name = "lang")]
    pub lang: Option<MonthNames>,

    /// Disable colorized output.
    #[arg(long, help_heading = "Output options")]
    pub color: bool,

    /// Reference date (LMP, EDD or delivery date depending on mode).
    #[arg(value_name = "date", value_hint = ValueHint::Other, num_args = 1..=3)]
    pub date: Vec<String>,
}

/// Help message displayed with --help.
const HELP_MESSAGE: &str = "Convert dates between the Gregorian and Ethiopian calendars and
schedule antenatal (ANC) and postnatal (PNC) follow-up visits.

Examples:
  gestcal 2025-03-01                 LMP and gestational age for EDD 1 March 2025
  gestcal -m lmp 2024-06-10          EDD and gestational age for an LMP
  gestcal -m anc 2024-06-10          Next ANC visit window for an LMP
  gestcal -m pnc 2024-10-01          Next PNC visit window for a delivery date
  gestcal -m convert -c ethiopian 5 Hidar 2017
                                     Show an Ethiopian date in both calendars
  gestcal -t 2024-11-01 -m anc 2024-06-10
                                     Compute as of a given day

Environment:
  GESTCAL_TEST_TIME   Override today's date (YYYY-MM-DD)
  GESTCAL_LOG         Log filter, e.g. debug";

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }
}

impl ReportContext {
    pub fn new(args: &Args) -> Result<Self> {
        let today = get_today_date(args.today.as_deref())?;

        let color = !args.color && COLOR_ENABLED_BY_DEFAULT && std::io::stdout().is_terminal();

        let locale_name = get_locale_name();
        let month_names = args
            .lang
            .unwrap_or_else(|| month_names_for_locale(&locale_name));

        Ok(ReportContext {
            month_names,
            locale: locale_from_name(&locale_name),
            color,
            today,
            gutter_width: GUTTER_WIDTH,
        })
    }
}

/// Today's date: explicit override, then GESTCAL_TEST_TIME, then the local clock.
///
/// A set but unparsable GESTCAL_TEST_TIME is an error, not a fallback to the clock.
pub fn get_today_date(explicit: Option<&str>) -> Result<CalendarDate> {
    if let Some(s) = explicit {
        return parse_date(s, CalendarSystem::Gregorian);
    }
    if let Some(test_time) = std::env::var_os(TODAY_ENV) {
        let test_time = test_time.to_string_lossy();
        let date = parse_date(&test_time, CalendarSystem::Gregorian)?;
        debug!(?date, "today pinned by {}", TODAY_ENV);
        return Ok(date);
    }
    CalendarDate::try_from(Local::now().date_naive())
}

/// Reference date from the positional arguments.
pub fn get_reference_date(args: &Args) -> Result<CalendarDate> {
    match args.date.as_slice() {
        [] => Err(GestcalError::InvalidInput(
            "missing reference date".to_string(),
        )),
        [single] => parse_date(single, args.calendar),
        [day, month, year] => parse_date_parts(day, month, year, args.calendar),
        _ => Err(GestcalError::InvalidInput(format!(
            "Invalid date: {}",
            args.date.join(" ")
        ))),
    }
}

/// Parse a single-token date in the given calendar; time of day is dropped.
pub fn parse_date(s: &str, system: CalendarSystem) -> Result<CalendarDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(GestcalError::InvalidInput(
            "missing reference date".to_string(),
        ));
    }

    let date_part = match s.split_once(['T', ' ']) {
        Some((date, time)) => {
            if system == CalendarSystem::Gregorian {
                return parse_gregorian_datetime(s);
            }
            validate_time(time)?;
            date
        }
        None => s,
    };

    let fields: Vec<&str> = date_part.split('-').collect();
    let [year, month, day] = fields.as_slice() else {
        return Err(GestcalError::InvalidInput(format!(
            "Invalid date: {} (expected YYYY-MM-DD)",
            s
        )));
    };
    let year = parse_number::<i32>(year, "year")?;
    let month = parse_number::<u32>(month, "month")?;
    let day = parse_number::<u32>(day, "day")?;
    build_date(year, month, day, system)
}

/// Parse `day month year` where month may be a name.
pub fn parse_date_parts(
    day: &str,
    month: &str,
    year: &str,
    system: CalendarSystem,
) -> Result<CalendarDate> {
    let day = parse_number::<u32>(day, "day")?;
    let month = match system {
        CalendarSystem::Gregorian => parse_month(month),
        CalendarSystem::Ethiopian => parse_ethiopian_month(month),
    }
    .ok_or_else(|| GestcalError::InvalidInput(format!("Invalid month: {}", month)))?;
    let year = parse_number::<i32>(year, "year")?;
    build_date(year, month, day, system)
}

fn parse_gregorian_datetime(s: &str) -> Result<CalendarDate> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| GestcalError::InvalidInput(format!("Invalid date: {}", s)))
        .and_then(CalendarDate::from_datetime)
}

fn validate_time(time: &str) -> Result<()> {
    let valid = ["%H:%M:%S", "%H:%M"]
        .iter()
        .any(|fmt| chrono::NaiveTime::parse_from_str(time, fmt).is_ok());
    if valid {
        Ok(())
    } else {
        Err(GestcalError::InvalidInput(format!(
            "Invalid time of day: {}",
            time
        )))
    }
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T> {
    s.trim()
        .parse::<T>()
        .map_err(|_| GestcalError::InvalidInput(format!("Invalid {}: {}", what, s)))
}

fn build_date(year: i32, month: u32, day: u32, system: CalendarSystem) -> Result<CalendarDate> {
    match system {
        CalendarSystem::Gregorian => {
            if !(1..=9999).contains(&year) {
                return Err(GestcalError::InvalidInput(format!(
                    "Invalid year: {} (must be 1-9999)",
                    year
                )));
            }
            CalendarDate::gregorian(year, month, day)
        }
        CalendarSystem::Ethiopian => CalendarDate::ethiopian(year, month, day),
    }
}
