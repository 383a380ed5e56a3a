//! Calendar events and the per-day agenda.

use crate::errors::{StoreError, StoreResult};
use crate::repository::Record;
use crate::storage::EVENTS_KEY;
use crate::todos::Todo;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    #[default]
    Personal,
    Work,
    Health,
    Social,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Meeting,
        EventKind::Personal,
        EventKind::Work,
        EventKind::Health,
        EventKind::Social,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default = "default_time", with = "hh_mm")]
    pub time: NaiveTime,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_reminder")]
    pub reminder: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default = "default_time", with = "hh_mm")]
    pub time: NaiveTime,
    #[serde(default, rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_reminder")]
    pub reminder: bool,
}

/// Everything scheduled on one day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCount {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub count: usize,
}

/// Calendar sidebar figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOverview {
    pub date: NaiveDate,
    /// First few events of the day, earliest first.
    pub today: Vec<Event>,
    pub total: usize,
    /// Events in the Sunday-to-Saturday week containing `date`.
    pub this_week: usize,
    /// Events on any later day.
    pub upcoming: usize,
    pub by_type: Vec<KindCount>,
}

const OVERVIEW_TODAY_LIMIT: usize = 3;

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_reminder() -> bool {
    true
}

/// Times are stored as `HH:MM`.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
            .map_err(|err| D::Error::custom(format!("invalid time {value:?}: {err}")))
    }
}

impl Event {
    pub fn create(draft: EventDraft) -> StoreResult<Self> {
        let mut event = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            date: draft.date,
            time: draft.time,
            kind: draft.kind,
            location: String::new(),
            reminder: draft.reminder,
        };
        event.apply(draft)?;
        Ok(event)
    }

    pub fn apply(&mut self, draft: EventDraft) -> StoreResult<()> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(StoreError::Invalid("event title must not be empty".into()));
        }
        self.title = title.to_string();
        self.description = draft.description.trim().to_string();
        self.date = draft.date;
        self.time = draft.time;
        self.kind = draft.kind;
        self.location = draft.location.trim().to_string();
        self.reminder = draft.reminder;
        Ok(())
    }
}

/// Events on `date`, earliest first.
pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<Event> {
    let mut day: Vec<Event> = events.iter().filter(|event| event.date == date).cloned().collect();
    day.sort_by_key(|event| event.time);
    day
}

pub fn agenda(date: NaiveDate, events: &[Event], todos: &[Todo]) -> Agenda {
    Agenda {
        date,
        events: events_on(events, date),
        todos: todos
            .iter()
            .filter(|todo| todo.due_date == Some(date))
            .cloned()
            .collect(),
    }
}

pub fn overview(today: NaiveDate, events: &[Event]) -> CalendarOverview {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    let week_end = week_start + Duration::days(6);

    let mut first = events_on(events, today);
    first.truncate(OVERVIEW_TODAY_LIMIT);

    CalendarOverview {
        date: today,
        today: first,
        total: events.len(),
        this_week: events
            .iter()
            .filter(|event| (week_start..=week_end).contains(&event.date))
            .count(),
        upcoming: events.iter().filter(|event| event.date > today).count(),
        by_type: EventKind::ALL
            .iter()
            .map(|&kind| KindCount {
                kind,
                count: events.iter().filter(|event| event.kind == kind).count(),
            })
            .collect(),
    }
}

impl Record for Event {
    const KEY: &'static str = EVENTS_KEY;

    fn id(&self) -> Uuid {
        self.id
    }

    fn seed(_today: NaiveDate) -> Vec<Self> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todos::{Priority, TodoCategory};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn event(title: &str, date: NaiveDate, time: &str) -> Event {
        let draft: EventDraft = serde_json::from_value(serde_json::json!({
            "title": title,
            "date": date,
            "time": time,
        }))
        .unwrap();
        Event::create(draft).unwrap()
    }

    #[test]
    fn draft_defaults_match_form() {
        let draft: EventDraft = serde_json::from_value(serde_json::json!({
            "title": "Dentist",
            "date": "2026-03-10"
        }))
        .unwrap();
        let event = Event::create(draft).unwrap();
        assert_eq!(event.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(event.kind, EventKind::Personal);
        assert!(event.reminder);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["time"], "09:00");
        assert_eq!(json["type"], "personal");
    }

    #[test]
    fn events_on_sorts_by_time() {
        let events = vec![
            event("lunch", day(10), "12:30"),
            event("standup", day(10), "09:15"),
            event("tomorrow", day(11), "08:00"),
        ];
        let titles: Vec<String> = events_on(&events, day(10)).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["standup", "lunch"]);
    }

    #[test]
    fn overview_summarises_the_calendar() {
        // 2026-03-11 is a Wednesday; its week runs Sunday the 8th to Saturday the 14th.
        let today = day(11);
        let mut work = event("review", day(13), "10:00");
        work.kind = EventKind::Work;
        let events = vec![
            event("late", today, "20:00"),
            event("breakfast", today, "07:30"),
            event("lunch", today, "12:00"),
            event("standup", today, "09:00"),
            event("last sunday", day(8), "09:00"),
            event("before", day(7), "09:00"),
            work,
            event("next week", day(15), "09:00"),
        ];

        let overview = overview(today, &events);
        let titles: Vec<&str> = overview.today.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["breakfast", "standup", "lunch"]);
        assert_eq!(overview.total, 8);
        assert_eq!(overview.this_week, 6);
        assert_eq!(overview.upcoming, 2);
        assert_eq!(
            overview.by_type,
            vec![
                KindCount { kind: EventKind::Meeting, count: 0 },
                KindCount { kind: EventKind::Personal, count: 7 },
                KindCount { kind: EventKind::Work, count: 1 },
                KindCount { kind: EventKind::Health, count: 0 },
                KindCount { kind: EventKind::Social, count: 0 },
            ]
        );
    }

    #[test]
    fn overview_of_empty_calendar() {
        let overview = overview(day(11), &[]);
        assert!(overview.today.is_empty());
        assert_eq!((overview.total, overview.this_week, overview.upcoming), (0, 0, 0));
        assert!(overview.by_type.iter().all(|kind| kind.count == 0));
    }

    #[test]
    fn agenda_includes_todos_due_that_day() {
        let todos = vec![
            Todo {
                id: Uuid::new_v4(),
                text: "pay rent".into(),
                completed: false,
                priority: Priority::High,
                due_date: Some(day(10)),
                category: TodoCategory::Personal,
            },
            Todo {
                id: Uuid::new_v4(),
                text: "no date".into(),
                completed: false,
                priority: Priority::Low,
                due_date: None,
                category: TodoCategory::Personal,
            },
        ];
        let agenda = agenda(day(10), &[event("gym", day(10), "18:00")], &todos);
        assert_eq!(agenda.events.len(), 1);
        assert_eq!(agenda.todos.len(), 1);
        assert_eq!(agenda.todos[0].text, "pay rent");
    }
}
