//! Report formatting with Ethiopian month names, localized Gregorian dates and color.

use chrono::Locale;
use unicode_width::UnicodeWidthStr;

use crate::types::{
    AMHARIC_MONTHS, AppointmentResult, COLOR_RESET, COLOR_SAND_YELLOW, COLOR_TEAL, CalendarDate,
    CalendarSystem, DatePair, EddSummary, GestationalAge, MonthNames, ReportContext,
    ScheduleKind, TIGRINYA_MONTHS, TRANSLITERATED_MONTHS, VisitWindow,
};

/// Raw locale name from environment (LC_ALL > LC_TIME > LANG > en_US).
pub fn get_locale_name() -> String {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_TIME"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| "en_US.UTF-8".to_string())
}

/// Parse `ll_CC.charset@modifier` into a chrono locale, falling back to en_US.
pub fn locale_from_name(name: &str) -> Locale {
    name.split('.')
        .next()
        .unwrap_or("en_US")
        .split('@')
        .next()
        .unwrap_or("en_US")
        .parse()
        .unwrap_or(Locale::en_US)
}

/// Pick Ethiopian month names from a locale name; Tigrinya unless Amharic.
pub fn month_names_for_locale(name: &str) -> MonthNames {
    let language = name.split(['_', '.', '@', '-']).next().unwrap_or("");
    if language.eq_ignore_ascii_case("am") {
        MonthNames::Amharic
    } else {
        MonthNames::Tigrinya
    }
}

pub fn month_name_table(names: MonthNames) -> &'static [&'static str; 13] {
    match names {
        MonthNames::Tigrinya => &TIGRINYA_MONTHS,
        MonthNames::Amharic => &AMHARIC_MONTHS,
        MonthNames::Transliterated => &TRANSLITERATED_MONTHS,
    }
}

/// Ethiopian month name; month 13 is Pagume.
pub fn get_ethiopian_month_name(month: u32, names: MonthNames) -> &'static str {
    let table = month_name_table(names);
    table[(month.clamp(1, 13) - 1) as usize]
}

/// Parse Ethiopian month from number (1-13) or name in any supported script.
pub fn parse_ethiopian_month(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>()
        && (1..=13).contains(&n)
    {
        return Some(n);
    }

    let s_lower = s.to_lowercase();
    [TIGRINYA_MONTHS, AMHARIC_MONTHS, TRANSLITERATED_MONTHS]
        .iter()
        .find_map(|table| {
            table
                .iter()
                .position(|name| name.to_lowercase() == s_lower)
                .map(|i| i as u32 + 1)
        })
}

/// Parse Gregorian month from number (1-12) or English name.
pub fn parse_month(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>()
        && (1..=12).contains(&n)
    {
        return Some(n);
    }

    let s_lower = s.to_lowercase();
    let month_names: [(&str, u32); 23] = [
        // English full names
        ("january", 1),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("may", 5),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
        // English short forms
        ("jan", 1),
        ("feb", 2),
        ("mar", 3),
        ("apr", 4),
        ("jun", 6),
        ("jul", 7),
        ("aug", 8),
        ("sep", 9),
        ("oct", 10),
        ("nov", 11),
        ("dec", 12),
    ];
    month_names
        .iter()
        .find(|(name, _)| *name == s_lower)
        .map(|(_, num)| *num)
}

/// `DD <month> YYYY` in the Ethiopian calendar.
pub fn format_ethiopian(date: &CalendarDate, names: MonthNames) -> String {
    let eth = date.to_system(CalendarSystem::Ethiopian);
    format!(
        "{:02} {} {:04}",
        eth.day(),
        get_ethiopian_month_name(eth.month(), names),
        eth.year()
    )
}

/// `d MMM yyyy` in the Gregorian calendar.
pub fn format_gregorian(date: &CalendarDate, locale: Locale) -> String {
    format_gregorian_pattern(date, locale, "%-d %b %Y")
}

/// `d MMMM yyyy` in the Gregorian calendar.
pub fn format_gregorian_long(date: &CalendarDate, locale: Locale) -> String {
    format_gregorian_pattern(date, locale, "%-d %B %Y")
}

fn format_gregorian_pattern(date: &CalendarDate, locale: Locale, pattern: &str) -> String {
    match date.to_naive_date() {
        Ok(naive) => naive.format_localized(pattern, locale).to_string(),
        Err(_) => format_numeric(&date.to_system(CalendarSystem::Gregorian)),
    }
}

/// Numeric `YYYY-MM-DD` in the date's own calendar.
pub fn format_numeric(date: &CalendarDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Message shown instead of a window, per schedule.
pub fn status_message(kind: ScheduleKind, result: &AppointmentResult) -> Option<&'static str> {
    match (kind, result) {
        (_, AppointmentResult::Window(_)) => None,
        (ScheduleKind::Antenatal, AppointmentResult::TooEarly) => {
            Some("LMP date is in the future - please check the date entered")
        }
        (ScheduleKind::Antenatal, AppointmentResult::Today) => {
            Some("LMP date is today - please check the date entered")
        }
        (ScheduleKind::Antenatal, AppointmentResult::NoFurtherVisits) => {
            Some("Too close to delivery date - no further ANC visits")
        }
        (ScheduleKind::Postnatal, AppointmentResult::TooEarly) => {
            Some("Delivery date is in the future - please check the date entered")
        }
        (ScheduleKind::Postnatal, AppointmentResult::Today) => {
            Some("Delivery date is today - please check the date entered")
        }
        (ScheduleKind::Postnatal, AppointmentResult::NoFurtherVisits) => {
            Some("No further PNC visits")
        }
    }
}

pub fn format_gestational_age(age: GestationalAge) -> String {
    match age {
        GestationalAge::None => "none".to_string(),
        GestationalAge::Weeks(1) => "1 week".to_string(),
        GestationalAge::Weeks(n) => format!("{} weeks", n),
    }
}

/// Pad text on the right to a display width, accounting for Unicode character widths.
fn pad_right(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        return text.to_string();
    }
    format!("{}{}", text, " ".repeat(width - text_width))
}

fn colorize(ctx: &ReportContext, text: &str, color: &str) -> String {
    if ctx.color {
        format!("{}{}{}", color, text, COLOR_RESET)
    } else {
        text.to_string()
    }
}

/// Lay out rows as aligned columns; the last column is never padded.
pub fn format_rows(ctx: &ReportContext, rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let gutter = " ".repeat(ctx.gutter_width);

    rows.iter()
        .map(|row| {
            let last = row.len().saturating_sub(1);
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == last {
                        cell.clone()
                    } else {
                        pad_right(cell, widths[i])
                    }
                })
                .collect::<Vec<_>>()
                .join(&gutter)
        })
        .collect()
}

fn pair_cells(ctx: &ReportContext, label: &str, pair: &DatePair) -> Vec<String> {
    vec![
        label.to_string(),
        format_ethiopian(&pair.ethiopian, ctx.month_names),
        format!("({})", format_gregorian_long(&pair.gregorian, ctx.locale)),
    ]
}

/// LMP, EDD and gestational age.
pub fn format_edd_report(ctx: &ReportContext, summary: &EddSummary) -> Vec<String> {
    let rows = vec![
        pair_cells(ctx, "LMP", &summary.lmp),
        pair_cells(ctx, "EDD", &summary.edd),
        vec![
            "Gestational age".to_string(),
            format_gestational_age(summary.gestational_age),
        ],
    ];
    format_rows(ctx, &rows)
}

fn format_window(ctx: &ReportContext, window: &VisitWindow) -> Vec<String> {
    let mut lines = vec![colorize(ctx, &window.label, COLOR_TEAL)];
    let rows = vec![
        vec![
            "From".to_string(),
            format_ethiopian(&window.start.ethiopian, ctx.month_names),
        ],
        vec![
            "To".to_string(),
            format_ethiopian(&window.end.ethiopian, ctx.month_names),
        ],
    ];
    lines.extend(format_rows(ctx, &rows));
    lines.push(format!(
        "({} - {})",
        format_gregorian(&window.start.gregorian, ctx.locale),
        format_gregorian(&window.end.gregorian, ctx.locale)
    ));
    lines
}

/// Next visit window, or the status message for the schedule.
pub fn format_appointment_report(
    ctx: &ReportContext,
    kind: ScheduleKind,
    result: &AppointmentResult,
) -> Vec<String> {
    match result {
        AppointmentResult::Window(window) => format_window(ctx, window),
        other => status_message(kind, other)
            .map(|msg| vec![colorize(ctx, msg, COLOR_SAND_YELLOW)])
            .unwrap_or_default(),
    }
}

/// One date in both calendars, numeric and spelled out.
pub fn format_conversion_report(ctx: &ReportContext, pair: &DatePair) -> Vec<String> {
    let weekday = pair
        .gregorian
        .to_naive_date()
        .map(|naive| naive.format_localized("%A", ctx.locale).to_string())
        .unwrap_or_default();
    let rows = vec![
        vec![
            "Gregorian".to_string(),
            format_numeric(&pair.gregorian),
            format!(
                "{} ({})",
                format_gregorian_long(&pair.gregorian, ctx.locale),
                weekday
            ),
        ],
        vec![
            "Ethiopian".to_string(),
            format_numeric(&pair.ethiopian),
            format_ethiopian(&pair.ethiopian, ctx.month_names),
        ],
    ];
    format_rows(ctx, &rows)
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_edd_report(ctx: &ReportContext, summary: &EddSummary) {
    print_lines(&format_edd_report(ctx, summary));
}

pub fn print_appointment_report(
    ctx: &ReportContext,
    kind: ScheduleKind,
    result: &AppointmentResult,
) {
    print_lines(&format_appointment_report(ctx, kind, result));
}

pub fn print_conversion_report(ctx: &ReportContext, pair: &DatePair) {
    print_lines(&format_conversion_report(ctx, pair));
}
