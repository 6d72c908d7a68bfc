//! Type definitions and constants for gestational calendar calculations.

use std::borrow::Cow;

use clap::ValueEnum;

/// Calendar system a [`CalendarDate`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum CalendarSystem {
    /// Proleptic Gregorian calendar.
    Gregorian,
    /// Ethiopian calendar (Amete Mihret era), 13 months.
    Ethiopian,
}

/// A single day with year/month/day fields under a calendar system.
///
/// Fields are private so a value is always a valid day of its calendar.
/// Build one with [`CalendarDate::gregorian`] or [`CalendarDate::ethiopian`],
/// or convert from a `chrono::NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub(crate) system: CalendarSystem,
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) day: u32,
}

impl CalendarDate {
    pub fn system(&self) -> CalendarSystem {
        self.system
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

/// The same absolute day shown in both calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePair {
    pub gregorian: CalendarDate,
    pub ethiopian: CalendarDate,
}

/// One row of a visit schedule.
///
/// `elapsed < threshold_days` selects the row; `lower_bound_days` only
/// documents the range the row covers. [`VisitSchedule::new`] requires it to
/// equal the previous row's threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitWindowRule {
    pub lower_bound_days: i64,
    pub threshold_days: i64,
    pub start_offset_days: i64,
    pub end_offset_days: i64,
    pub label: Cow<'static, str>,
}

impl VisitWindowRule {
    pub const fn new(
        lower_bound_days: i64,
        threshold_days: i64,
        start_offset_days: i64,
        end_offset_days: i64,
        label: &'static str,
    ) -> Self {
        VisitWindowRule {
            lower_bound_days,
            threshold_days,
            start_offset_days,
            end_offset_days,
            label: Cow::Borrowed(label),
        }
    }

    pub fn applies_to(&self, elapsed: i64) -> bool {
        elapsed < self.threshold_days
    }
}

/// Ordered visit table, validated by [`VisitSchedule::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitSchedule {
    pub(crate) rules: Vec<VisitWindowRule>,
}

impl VisitSchedule {
    pub fn rules(&self) -> &[VisitWindowRule] {
        &self.rules
    }
}

/// A computed visit window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitWindow {
    pub label: String,
    pub start: DatePair,
    pub end: DatePair,
}

/// Outcome of a next-visit lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentResult {
    /// Reference date lies after today.
    TooEarly,
    /// Reference date is today.
    Today,
    /// Next visit window.
    Window(VisitWindow),
    /// Past the last threshold of the table.
    NoFurtherVisits,
}

/// Gestational age as reported to the user: nothing below one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestationalAge {
    None,
    Weeks(u32),
}

/// LMP and EDD in both calendars with the current gestational age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EddSummary {
    pub lmp: DatePair,
    pub edd: DatePair,
    pub gestational_age: GestationalAge,
}

/// Built-in visit schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Antenatal care, counted from the last menstrual period.
    Antenatal,
    /// Postnatal care, counted from the delivery date.
    Postnatal,
}

impl ScheduleKind {
    pub fn rules(self) -> &'static [VisitWindowRule] {
        match self {
            ScheduleKind::Antenatal => ANTENATAL_RULES,
            ScheduleKind::Postnatal => POSTNATAL_RULES,
        }
    }

    /// The built-in tables satisfy every [`VisitSchedule`] invariant.
    pub fn schedule(self) -> VisitSchedule {
        VisitSchedule {
            rules: self.rules().to_vec(),
        }
    }
}

// Naegele's rule: 40 weeks from LMP to EDD
pub const GESTATION_DAYS: i64 = 280;
pub const DAYS_PER_WEEK: i64 = 7;

// Rata Die of 1 Meskerem 1 (Julian 29 August 8 CE)
pub const ETHIOPIAN_EPOCH_RD: i64 = 2796;
pub const ETHIOPIAN_MONTHS: u32 = 13;
pub const ETHIOPIAN_MONTH_DAYS: u32 = 30;
pub const PAGUME_DAYS: u32 = 5;
pub const PAGUME_DAYS_LEAP: u32 = 6;

pub const ANC2_START: i64 = 168;
pub const ANC2_END: i64 = 203;
pub const ANC3_START: i64 = 210;
pub const ANC3_END: i64 = 231;
pub const ANC4_START: i64 = 238;
pub const ANC4_END: i64 = 259;

pub const PNC2_START: i64 = 6;
pub const PNC2_END: i64 = 7;
pub const PNC3_START: i64 = 35;
pub const PNC3_END: i64 = 42;

pub const ANTENATAL_RULES: &[VisitWindowRule] = &[
    VisitWindowRule::new(0, ANC2_START, ANC2_START, ANC2_END, "ANC visit 2"),
    VisitWindowRule::new(ANC2_START, ANC3_START, ANC3_START, ANC3_END, "ANC visit 3"),
    VisitWindowRule::new(ANC3_START, ANC4_START, ANC4_START, ANC4_END, "ANC visit 4"),
];

pub const POSTNATAL_RULES: &[VisitWindowRule] = &[
    VisitWindowRule::new(0, PNC2_START, PNC2_START, PNC2_END, "PNC visit 2"),
    VisitWindowRule::new(PNC2_START, PNC3_START, PNC3_START, PNC3_END, "PNC visit 3"),
];

// ANSI color codes
pub const COLOR_RESET: &str = "\x1b[0m";
pub const COLOR_TEAL: &str = "\x1b[96m";
pub const COLOR_SAND_YELLOW: &str = "\x1b[93m";

// Color is enabled by default for better user experience
pub const COLOR_ENABLED_BY_DEFAULT: bool = true;

/// Language of Ethiopian month names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MonthNames {
    /// Tigrinya (ትግርኛ).
    #[value(name = "ti")]
    Tigrinya,
    /// Amharic (አማርኛ).
    #[value(name = "am")]
    Amharic,
    /// Latin transliteration.
    #[value(name = "en")]
    Transliterated,
}

/// What the reference date means and which report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Date is an EDD: show LMP, EDD and gestational age.
    Edd,
    /// Date is an LMP: show LMP, EDD and gestational age.
    Lmp,
    /// Date is an LMP: show the next antenatal visit window.
    Anc,
    /// Date is a delivery date: show the next postnatal visit window.
    Pnc,
    /// Show the date in both calendars.
    Convert,
}

/// Report formatting context containing all display options.
#[derive(Clone, Debug)]
pub struct ReportContext {
    /// Language of Ethiopian month names.
    pub month_names: MonthNames,
    /// Locale for Gregorian month abbreviations.
    pub locale: chrono::Locale,
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// Today's date, captured once per run.
    pub today: CalendarDate,
    /// Width of gutter between report columns.
    pub gutter_width: usize,
}

pub const GUTTER_WIDTH: usize = 2;

pub const TIGRINYA_MONTHS: [&str; 13] = [
    "መስከረም", "ጥቅምቲ", "ሕዳር", "ታሕሳስ", "ጥሪ", "ለካቲት", "መጋቢት", "ሚያዝያ", "ግንቦት", "ሰነ", "ሓምለ",
    "ነሓሰ", "ጳጉሜን",
];

pub const AMHARIC_MONTHS: [&str; 13] = [
    "መስከረም", "ጥቅምት", "ኅዳር", "ታኅሣሥ", "ጥር", "የካቲት", "መጋቢት", "ሚያዝያ", "ግንቦት", "ሰኔ", "ሐምሌ",
    "ነሐሴ", "ጳጉሜን",
];

pub const TRANSLITERATED_MONTHS: [&str; 13] = [
    "Meskerem", "Tikimt", "Hidar", "Tahsas", "Tir", "Yekatit", "Megabit", "Miyazya", "Ginbot",
    "Sene", "Hamle", "Nehase", "Pagume",
];
