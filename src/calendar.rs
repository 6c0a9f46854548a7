//! Calendar helpers for date ranges, month bounds and month labels.

use std::cmp::Ordering;

use time::{Date, Duration, Month};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// Create a date range, returning `None` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Option<Self> {
        if start > end {
            None
        } else {
            Some(Self { start, end })
        }
    }

    /// Whether `date` falls inside the range, bounds included.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A calendar month identified by its year and month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, u8::from(self.month)).cmp(&(other.year, u8::from(other.month)))
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl YearMonth {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month that follows this one, rolling over into the next year.
    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }

    /// The month before this one, rolling back into the previous year.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// The first and last calendar days of the month.
    pub fn bounds(self) -> DateRange {
        month_bounds(self.year, self.month)
    }

    /// The month formatted as "MM-YYYY", e.g. "03-2024".
    pub fn period_key(self) -> String {
        format!("{:02}-{:04}", u8::from(self.month), self.year)
    }

    /// The three-letter abbreviation of the month, e.g. "Mar".
    pub fn label(self) -> &'static str {
        month_label(self.month)
    }
}

/// Every month from `first` to `last`, both included, in chronological order.
///
/// Returns an empty list when `first` is after `last`.
pub fn months_between(first: YearMonth, last: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut current = first;

    while current <= last {
        months.push(current);
        current = current.next();
    }

    months
}

/// The number of days in the given month.
pub fn days_in_month(year: i32, month: Month) -> u8 {
    month_bounds(year, month).end.day()
}

pub fn month_bounds(year: i32, month: Month) -> DateRange {
    let start = first_day_of_month(year, month);
    // The last day is the day before the first day of the following month.
    let next = YearMonth { year, month }.next();
    let end = first_day_of_month(next.year, next.month) - Duration::days(1);

    DateRange { start, end }
}

/// The Monday to Sunday week containing `anchor_date`.
pub fn week_bounds(anchor_date: Date) -> DateRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    DateRange { start, end }
}

pub fn year_bounds(year: i32) -> DateRange {
    DateRange {
        start: first_day_of_month(year, Month::January),
        end: month_bounds(year, Month::December).end,
    }
}

fn first_day_of_month(year: i32, month: Month) -> Date {
    // Day 1 exists in every month of every year `Date` can represent.
    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN)
}

fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
