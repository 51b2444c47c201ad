use crate::domain::Event;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Tbd,
    Past,
    Today,
    ThisWeek,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledEvent {
    #[serde(flatten)]
    pub event: Event,
    pub status: EventStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventsPage {
    pub upcoming: Vec<ScheduledEvent>,
    pub past: Vec<ScheduledEvent>,
}

/// Parses an event date. Date-only values are taken as midnight UTC.
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

/// Whole days until `date`, rounded up.
fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let diff_ms = (date - now).num_milliseconds();
    diff_ms.div_euclid(DAY_MS) + i64::from(diff_ms.rem_euclid(DAY_MS) != 0)
}

pub fn event_status(date: Option<&str>, now: DateTime<Utc>) -> EventStatus {
    let Some(date) = date.and_then(parse_event_date) else {
        return EventStatus::Tbd;
    };
    match days_until(date, now) {
        d if d < 0 => EventStatus::Past,
        0 => EventStatus::Today,
        1..=7 => EventStatus::ThisWeek,
        _ => EventStatus::Upcoming,
    }
}

/// Undated events first, then future events soonest first, then past events
/// oldest first.
fn schedule_order(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a >= now, b >= now) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.cmp(&b),
        },
    }
}

pub fn build_events_page(events: Vec<Event>, now: DateTime<Utc>) -> EventsPage {
    let mut dated: Vec<(Option<DateTime<Utc>>, Event)> = events
        .into_iter()
        .map(|e| (e.date.as_deref().and_then(parse_event_date), e))
        .collect();
    dated.sort_by(|(a, _), (b, _)| schedule_order(*a, *b, now));

    let mut page = EventsPage::default();
    for (_, event) in dated {
        let status = event_status(event.date.as_deref(), now);
        let scheduled = ScheduledEvent { event, status };
        if status == EventStatus::Past {
            page.past.push(scheduled);
        } else {
            page.upcoming.push(scheduled);
        }
    }
    page
}
