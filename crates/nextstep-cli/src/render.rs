//! Plain-text rendering of calendar views

use anyhow::{Context, Result};
use chrono::Datelike;
use nextstep_client::calendar::{self, Availability};
use nextstep_client::types::{DayView, EventSummary, MonthView, TimeSlot};
use serde::Serialize;
use std::fmt::Write;

const WEEKDAYS: &str = " Mon  Tue  Wed  Thu  Fri  Sat  Sun";

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Month grid with free slot counts, followed by the month's events
pub fn month(view: &MonthView) -> Result<String> {
    let (year, month) = calendar::parse_year_month(&view.year_month)
        .with_context(|| format!("Invalid month {}", view.year_month))?;
    let grid = calendar::month_grid(year, month)
        .with_context(|| format!("Invalid month {}", view.year_month))?;
    let days = calendar::index_days(&view.days);

    let mut out = String::new();
    writeln!(out, "{}", view.year_month)?;
    writeln!(out, "{WEEKDAYS}")?;

    for week in grid.chunks(7) {
        for cell in week.iter().copied() {
            match cell.and_then(|date| days.get(&date).map(|day| (date, *day))) {
                Some((date, day)) => {
                    let mark = if day.has_user_reservation { '*' } else { ' ' };
                    write!(out, " {:>2}{mark}{}", date.day(), day.available_slots.min(9))?;
                }
                None => match cell {
                    Some(date) => write!(out, " {:>2}  ", date.day())?,
                    None => out.push_str("     "),
                },
            }
        }
        out.push('\n');
    }

    let by_day = calendar::events_by_day(&view.events);
    if !by_day.is_empty() {
        writeln!(out)?;
        for (date, events) in by_day {
            for event in events {
                writeln!(out, "{date}  {}", event_line(event))?;
            }
        }
    }

    Ok(out)
}

pub fn day(view: &DayView) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", view.date)?;

    for slot in &view.slots {
        writeln!(out, "  {}", slot_line(slot))?;
    }
    for event in &view.events {
        writeln!(out, "  {}", event_line(event))?;
    }

    Ok(out)
}

fn slot_line(slot: &TimeSlot) -> String {
    let mut line = format!(
        "{}-{} {:?} {}",
        slot.start_time.format("%H:%M"),
        slot.end_time.format("%H:%M"),
        slot.status,
        slot.id
    );
    if let Some(title) = &slot.event_title {
        let _ = write!(line, " ({title})");
    }
    if slot.is_user_registered {
        line.push_str(" [booked]");
    }
    line
}

pub fn event_line(event: &EventSummary) -> String {
    let availability = match Availability::of(event) {
        Availability::EnrollmentClosed => "enrollment closed".to_string(),
        Availability::Full => "full".to_string(),
        Availability::LastSpot => "last spot".to_string(),
        Availability::Open { free, max } => format!("{free}/{max} free"),
    };
    let registered = if event.is_user_registered {
        " [registered]"
    } else {
        ""
    };
    format!("{} ({availability}) {}{registered}", event.title, event.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nextstep_client::types::DaySummary;

    #[test]
    fn test_month_marks_reserved_days() {
        let view = MonthView {
            year_month: "2026-03".to_string(),
            days: vec![DaySummary {
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                total_slots: 4,
                available_slots: 2,
                has_user_reservation: true,
            }],
            events: vec![],
        };

        let text = month(&view).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "2026-03");
        // 1 March 2026 is a Sunday, so the 2nd opens the second row
        assert!(lines[3].starts_with("  2*2"));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let view = MonthView {
            year_month: "March".to_string(),
            days: vec![],
            events: vec![],
        };
        assert!(month(&view).is_err());
    }
}
