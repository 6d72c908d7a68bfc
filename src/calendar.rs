//! Calendar conversion and appointment-window logic over Rata Die day numbers.
//!
//! Every [`CalendarDate`] maps to a fixed day number (day 1 = proleptic
//! Gregorian 0001-01-01). Conversions go through that number, so they are
//! stateless and exact in both directions.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{GestcalError, Result};
use crate::types::{
    AppointmentResult, CalendarDate, CalendarSystem, DAYS_PER_WEEK, DatePair, ETHIOPIAN_EPOCH_RD,
    ETHIOPIAN_MONTH_DAYS, ETHIOPIAN_MONTHS, EddSummary, GESTATION_DAYS, GestationalAge,
    PAGUME_DAYS, PAGUME_DAYS_LEAP, VisitSchedule, VisitWindow, VisitWindowRule,
};

/// Earliest supported day: Gregorian 0001-01-01.
pub const MIN_FIXED_DAY: i64 = 1;
/// Latest supported day: Gregorian 9999-12-31.
pub const MAX_FIXED_DAY: i64 = 3_652_059;

pub fn is_gregorian_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Ethiopian leap years precede years divisible by four.
pub fn is_ethiopian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 3
}

pub fn gregorian_days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_gregorian_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn ethiopian_days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1..=12 => ETHIOPIAN_MONTH_DAYS,
        13 if is_ethiopian_leap_year(year) => PAGUME_DAYS_LEAP,
        13 => PAGUME_DAYS,
        _ => 0,
    }
}

fn fixed_from_gregorian(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year) - 1;
    let m = i64::from(month);
    let correction = if month <= 2 {
        0
    } else if is_gregorian_leap_year(year) {
        -1
    } else {
        -2
    };
    365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + (367 * m - 362).div_euclid(12)
        + correction
        + i64::from(day)
}

fn gregorian_year_from_fixed(fixed: i64) -> i32 {
    let d0 = fixed - 1;
    let n400 = d0.div_euclid(146_097);
    let d1 = d0.rem_euclid(146_097);
    let n100 = d1 / 36_524;
    let d2 = d1 % 36_524;
    let n4 = d2 / 1_461;
    let d3 = d2 % 1_461;
    let n1 = d3 / 365;
    let year = 400 * n400 + 100 * n100 + 4 * n4 + n1;
    // Last day of a leap cycle belongs to the year just counted
    let year = if n100 == 4 || n1 == 4 { year } else { year + 1 };
    year as i32
}

fn gregorian_from_fixed(fixed: i64) -> (i32, u32, u32) {
    let year = gregorian_year_from_fixed(fixed);
    let prior_days = fixed - fixed_from_gregorian(year, 1, 1);
    let correction = if fixed < fixed_from_gregorian(year, 3, 1) {
        0
    } else if is_gregorian_leap_year(year) {
        1
    } else {
        2
    };
    let month = (12 * (prior_days + correction) + 373).div_euclid(367) as u32;
    let day = (fixed - fixed_from_gregorian(year, month, 1) + 1) as u32;
    (year, month, day)
}

fn fixed_from_ethiopian(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year);
    ETHIOPIAN_EPOCH_RD - 1
        + 365 * (y - 1)
        + y.div_euclid(4)
        + i64::from(ETHIOPIAN_MONTH_DAYS) * (i64::from(month) - 1)
        + i64::from(day)
}

fn ethiopian_from_fixed(fixed: i64) -> (i32, u32, u32) {
    let year = (4 * (fixed - ETHIOPIAN_EPOCH_RD) + 1463).div_euclid(1461) as i32;
    let month = ((fixed - fixed_from_ethiopian(year, 1, 1)) / i64::from(ETHIOPIAN_MONTH_DAYS))
        as u32
        + 1;
    let day = (fixed + 1 - fixed_from_ethiopian(year, month, 1)) as u32;
    (year, month, day)
}

fn out_of_range(fixed: i64) -> GestcalError {
    GestcalError::InvalidInput(format!(
        "day {} is outside the supported range (years 1-9999 Gregorian)",
        fixed
    ))
}

impl CalendarDate {
    /// Validated Gregorian date (years 1-9999).
    pub fn gregorian(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(GestcalError::InvalidInput(format!(
                "Invalid Gregorian month: {} (must be 1-12)",
                month
            )));
        }
        let days = gregorian_days_in_month(year, month);
        if !(1..=days).contains(&day) {
            return Err(GestcalError::InvalidInput(format!(
                "Invalid Gregorian day: {} (month {} has {} days)",
                day, month, days
            )));
        }
        Self::from_fixed(
            fixed_from_gregorian(year, month, day),
            CalendarSystem::Gregorian,
        )
    }

    /// Validated Ethiopian date; month 13 is Pagume.
    pub fn ethiopian(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1..=ETHIOPIAN_MONTHS).contains(&month) {
            return Err(GestcalError::InvalidInput(format!(
                "Invalid Ethiopian month: {} (must be 1-{})",
                month, ETHIOPIAN_MONTHS
            )));
        }
        let days = ethiopian_days_in_month(year, month);
        if !(1..=days).contains(&day) {
            return Err(GestcalError::InvalidInput(format!(
                "Invalid Ethiopian day: {} (month {} of {} has {} days)",
                day, month, year, days
            )));
        }
        Self::from_fixed(
            fixed_from_ethiopian(year, month, day),
            CalendarSystem::Ethiopian,
        )
    }

    /// Build a date from a fixed day number in the given system.
    pub fn from_fixed(fixed: i64, system: CalendarSystem) -> Result<Self> {
        if !(MIN_FIXED_DAY..=MAX_FIXED_DAY).contains(&fixed) {
            return Err(out_of_range(fixed));
        }
        let (year, month, day) = match system {
            CalendarSystem::Gregorian => gregorian_from_fixed(fixed),
            CalendarSystem::Ethiopian => ethiopian_from_fixed(fixed),
        };
        Ok(CalendarDate {
            system,
            year,
            month,
            day,
        })
    }

    /// Drop the time of day and keep the calendar day.
    pub fn from_datetime(datetime: NaiveDateTime) -> Result<Self> {
        Self::try_from(datetime.date())
    }

    /// Rata Die day number.
    pub fn fixed(&self) -> i64 {
        match self.system {
            CalendarSystem::Gregorian => fixed_from_gregorian(self.year, self.month, self.day),
            CalendarSystem::Ethiopian => fixed_from_ethiopian(self.year, self.month, self.day),
        }
    }

    /// Same day expressed in another calendar. Never fails for a valid date.
    pub fn to_system(&self, system: CalendarSystem) -> Self {
        if system == self.system {
            return *self;
        }
        let (year, month, day) = match system {
            CalendarSystem::Gregorian => gregorian_from_fixed(self.fixed()),
            CalendarSystem::Ethiopian => ethiopian_from_fixed(self.fixed()),
        };
        CalendarDate {
            system,
            year,
            month,
            day,
        }
    }

    pub fn pair(&self) -> DatePair {
        DatePair {
            gregorian: self.to_system(CalendarSystem::Gregorian),
            ethiopian: self.to_system(CalendarSystem::Ethiopian),
        }
    }

    /// Whether both dates denote the same day, whatever their systems.
    pub fn same_day(&self, other: &CalendarDate) -> bool {
        self.fixed() == other.fixed()
    }

    /// Shift by a signed number of days, keeping the calendar system.
    pub fn add_days(&self, days: i64) -> Result<Self> {
        Self::from_fixed(self.fixed().saturating_add(days), self.system)
    }

    pub fn is_leap_year(&self) -> bool {
        match self.system {
            CalendarSystem::Gregorian => is_gregorian_leap_year(self.year),
            CalendarSystem::Ethiopian => is_ethiopian_leap_year(self.year),
        }
    }

    /// The Gregorian form as a chrono date, for formatting.
    pub fn to_naive_date(&self) -> Result<NaiveDate> {
        let fixed = self.fixed();
        i32::try_from(fixed)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| out_of_range(fixed))
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = GestcalError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        CalendarDate::gregorian(date.year(), date.month(), date.day())
    }
}

/// Gregorian to Ethiopian.
pub fn convert_to_ethiopian(date: &CalendarDate) -> CalendarDate {
    date.to_system(CalendarSystem::Ethiopian)
}

/// Ethiopian to Gregorian.
pub fn convert_to_gregorian(date: &CalendarDate) -> CalendarDate {
    date.to_system(CalendarSystem::Gregorian)
}

/// Signed whole days from `a` to `b`.
pub fn days_between(a: &CalendarDate, b: &CalendarDate) -> i64 {
    b.fixed() - a.fixed()
}

/// Estimated date of delivery by Naegele's rule.
pub fn compute_edd(lmp: &CalendarDate) -> Result<CalendarDate> {
    lmp.add_days(GESTATION_DAYS)
}

/// Last menstrual period implied by an EDD.
pub fn compute_lmp(edd: &CalendarDate) -> Result<CalendarDate> {
    edd.add_days(-GESTATION_DAYS)
}

/// Completed weeks since LMP, zero when LMP is today or later.
pub fn compute_gestational_age_weeks(lmp: &CalendarDate, today: &CalendarDate) -> u32 {
    let days = days_between(lmp, today);
    if days <= 0 {
        return 0;
    }
    (days / DAYS_PER_WEEK) as u32
}

pub fn gestational_age(lmp: &CalendarDate, today: &CalendarDate) -> GestationalAge {
    match compute_gestational_age_weeks(lmp, today) {
        0 => GestationalAge::None,
        weeks => GestationalAge::Weeks(weeks),
    }
}

/// LMP, EDD and gestational age starting from a known EDD.
pub fn summarize_edd(edd: &CalendarDate, today: &CalendarDate) -> Result<EddSummary> {
    let lmp = compute_lmp(edd)?;
    Ok(EddSummary {
        lmp: lmp.pair(),
        edd: edd.pair(),
        gestational_age: gestational_age(&lmp, today),
    })
}

/// LMP, EDD and gestational age starting from a known LMP.
pub fn summarize_lmp(lmp: &CalendarDate, today: &CalendarDate) -> Result<EddSummary> {
    let edd = compute_edd(lmp)?;
    Ok(EddSummary {
        lmp: lmp.pair(),
        edd: edd.pair(),
        gestational_age: gestational_age(lmp, today),
    })
}

impl VisitSchedule {
    /// Validate a custom table.
    ///
    /// Thresholds must be strictly ascending, each rule's lower bound must sit
    /// below its threshold and equal the previous rule's threshold, and the
    /// window must not end before it starts.
    pub fn new(rules: Vec<VisitWindowRule>) -> Result<Self> {
        if rules.is_empty() {
            return Err(GestcalError::InvalidSchedule(
                "schedule has no rules".to_string(),
            ));
        }
        for (i, rule) in rules.iter().enumerate() {
            if rule.lower_bound_days >= rule.threshold_days {
                return Err(GestcalError::InvalidSchedule(format!(
                    "{}: lower bound {} is not below threshold {}",
                    rule.label, rule.lower_bound_days, rule.threshold_days
                )));
            }
            if rule.start_offset_days > rule.end_offset_days {
                return Err(GestcalError::InvalidSchedule(format!(
                    "{}: window ends (day {}) before it starts (day {})",
                    rule.label, rule.end_offset_days, rule.start_offset_days
                )));
            }
            if i > 0 && rules[i - 1].threshold_days != rule.lower_bound_days {
                return Err(GestcalError::InvalidSchedule(format!(
                    "{}: lower bound {} does not continue from threshold {}",
                    rule.label,
                    rule.lower_bound_days,
                    rules[i - 1].threshold_days
                )));
            }
            if i > 0 && rules[i - 1].threshold_days >= rule.threshold_days {
                return Err(GestcalError::InvalidSchedule(format!(
                    "{}: threshold {} does not follow {}",
                    rule.label,
                    rule.threshold_days,
                    rules[i - 1].threshold_days
                )));
            }
        }
        Ok(VisitSchedule { rules })
    }

    /// First rule whose threshold lies above `elapsed`.
    pub fn rule_for(&self, elapsed: i64) -> Option<&VisitWindowRule> {
        self.rules.iter().find(|rule| rule.applies_to(elapsed))
    }
}

/// Next visit window for a reference date (LMP or delivery) as of `today`.
pub fn next_visit(
    reference: &CalendarDate,
    today: &CalendarDate,
    schedule: &VisitSchedule,
) -> Result<AppointmentResult> {
    let elapsed = days_between(reference, today);
    debug!(elapsed, "days since reference date");

    if elapsed < 0 {
        return Ok(AppointmentResult::TooEarly);
    }
    if elapsed == 0 {
        return Ok(AppointmentResult::Today);
    }

    let Some(rule) = schedule.rule_for(elapsed) else {
        debug!(elapsed, "past last threshold");
        return Ok(AppointmentResult::NoFurtherVisits);
    };
    debug!(label = %rule.label, threshold = rule.threshold_days, "visit rule selected");

    let start = reference.add_days(rule.start_offset_days)?;
    let end = reference.add_days(rule.end_offset_days)?;
    Ok(AppointmentResult::Window(VisitWindow {
        label: rule.label.to_string(),
        start: start.pair(),
        end: end.pair(),
    }))
}
