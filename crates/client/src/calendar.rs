//! Client-side shaping of calendar views

use crate::types::{DaySummary, EventSummary};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Cells of a Monday-first month grid: `None` pads the first week
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let padding = first.weekday().num_days_from_monday() as usize;

    let mut cells = vec![None; padding];
    cells.extend(
        first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(Some),
    );
    Some(cells)
}

/// Parse `YYYY-MM` into a year and month
pub fn parse_year_month(year_month: &str) -> Option<(i32, u32)> {
    let (year, month) = year_month.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok().filter(|m| (1..=12).contains(m))?;
    Some((year, month))
}

/// Day summaries keyed by date
pub fn index_days(days: &[DaySummary]) -> HashMap<NaiveDate, &DaySummary> {
    days.iter().map(|day| (day.date, day)).collect()
}

/// Every event listed under each day it spans, days in order
pub fn events_by_day(events: &[EventSummary]) -> BTreeMap<NaiveDate, Vec<&EventSummary>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&EventSummary>> = BTreeMap::new();

    for event in events {
        for day in event
            .start_date
            .iter_days()
            .take_while(|day| *day <= event.end_date)
        {
            by_day.entry(day).or_default().push(event);
        }
    }

    by_day
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// How many places an event still offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    EnrollmentClosed,
    Full,
    LastSpot,
    Open { free: u32, max: u32 },
}

impl Availability {
    pub fn of(event: &EventSummary) -> Self {
        if !event.enrollment_open {
            return Self::EnrollmentClosed;
        }

        match event.max_participants.saturating_sub(event.current_participants) {
            0 => Self::Full,
            1 => Self::LastSpot,
            free => Self::Open {
                free,
                max: event.max_participants,
            },
        }
    }

    pub fn can_enroll(self) -> bool {
        !matches!(self, Self::EnrollmentClosed | Self::Full)
    }
}
