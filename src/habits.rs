//! Habit records: descriptive metadata, a completion ledger and the streak
//! fields derived from it.

use crate::errors::{StoreError, StoreResult};
use crate::ledger::Ledger;
use crate::repository::{Record, Repository};
use crate::storage::HABITS_KEY;
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_ICON: &str = "🎯";
pub const DEFAULT_TARGET_DAYS: u8 = 7;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Health,
    Productivity,
    #[default]
    Personal,
    Fitness,
    Learning,
    Social,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 6] = [
        HabitCategory::Health,
        HabitCategory::Productivity,
        HabitCategory::Personal,
        HabitCategory::Fitness,
        HabitCategory::Learning,
        HabitCategory::Social,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Weekdays on which a habit is due. Empty and all-seven both mean every day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule(Vec<Weekday>);

impl Schedule {
    pub fn every_day() -> Self {
        Self(WEEK.to_vec())
    }

    pub fn days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut schedule = Self(days.into_iter().collect());
        schedule.normalize();
        schedule
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.0
    }

    pub fn is_every_day(&self) -> bool {
        self.0.is_empty() || self.0.len() == WEEK.len()
    }

    pub fn is_due(&self, date: NaiveDate) -> bool {
        self.is_every_day() || self.0.contains(&date.weekday())
    }

    /// Short label such as "Every day", "Weekdays" or "Mon, Thu".
    pub fn describe(&self) -> String {
        if self.is_every_day() {
            return "Every day".to_string();
        }
        if self.0 == WEEK[..5] {
            return "Weekdays".to_string();
        }
        if self.0 == WEEK[5..] {
            return "Weekends".to_string();
        }
        self.0
            .iter()
            .map(|day| day.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Sorts Monday-first and drops duplicates.
    fn normalize(&mut self) {
        self.0.sort_by_key(|day| day.num_days_from_monday());
        self.0.dedup();
    }
}

impl Serialize for Schedule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        weekday_names::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        weekday_names::deserialize(deserializer).map(Self)
    }
}

/// Weekdays are stored by lowercase full name (`"monday"`).
mod weekday_names {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error, ser::SerializeSeq};

    pub fn name(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        }
    }

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(days.len()))?;
        for day in days {
            seq.serialize_element(name(*day))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|value| {
                value
                    .parse::<Weekday>()
                    .map_err(|_| D::Error::custom(format!("unknown weekday: {value}")))
            })
            .collect()
    }
}

/// Where a habit stands for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodayState {
    NotScheduledToday,
    PendingToday,
    CompletedToday,
}

/// User-editable habit fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitDraft {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub category: HabitCategory,
    pub difficulty: Difficulty,
    pub target_days: Option<u8>,
    pub scheduled_days: Option<Schedule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub category: HabitCategory,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "Schedule::every_day")]
    pub scheduled_days: Schedule,
    #[serde(default = "default_target_days")]
    pub target_days: u8,
    #[serde(default)]
    pub completion_history: Ledger,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

fn default_target_days() -> u8 {
    DEFAULT_TARGET_DAYS
}

impl HabitRecord {
    pub fn create(draft: HabitDraft, now: DateTime<Utc>) -> StoreResult<Self> {
        let mut habit = Self::blank(now);
        habit.apply(draft, now)?;
        Ok(habit)
    }

    /// Replaces the descriptive fields. History and streaks are untouched.
    pub fn apply(&mut self, draft: HabitDraft, now: DateTime<Utc>) -> StoreResult<()> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("habit name must not be empty".into()));
        }

        self.name = name.to_string();
        self.description = draft.description.trim().to_string();
        self.icon = draft
            .icon
            .map(|icon| icon.trim().to_string())
            .filter(|icon| !icon.is_empty())
            .unwrap_or_else(default_icon);
        self.category = draft.category;
        self.difficulty = draft.difficulty;
        self.target_days = draft
            .target_days
            .map(|days| days.clamp(1, 7))
            .unwrap_or(DEFAULT_TARGET_DAYS);
        self.scheduled_days = draft.scheduled_days.unwrap_or_else(Schedule::every_day);
        self.scheduled_days.normalize();
        self.updated_at = now;
        Ok(())
    }

    pub fn today_state(&self, today: NaiveDate) -> TodayState {
        if !self.scheduled_days.is_due(today) {
            TodayState::NotScheduledToday
        } else if self.completion_history.is_completed(today) {
            TodayState::CompletedToday
        } else {
            TodayState::PendingToday
        }
    }

    /// Recomputes the current streak and raises the best-streak watermark.
    pub fn refresh_streaks(&mut self, today: NaiveDate) {
        self.current_streak = self.completion_history.current_streak(today);
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    pub fn toggle_today(&mut self, today: NaiveDate, now: DateTime<Utc>) {
        self.completion_history.toggle(today, now);
        self.updated_at = now;
        self.refresh_streaks(today);
    }

    pub fn clear_day(&mut self, date: NaiveDate, today: NaiveDate, now: DateTime<Utc>) {
        if self.completion_history.entry(date).is_some() {
            self.completion_history.clear_day(date);
            self.updated_at = now;
        }
        self.refresh_streaks(today);
    }

    fn seeded(name: &str, icon: &str, category: HabitCategory, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            category,
            ..Self::blank(now)
        }
    }

    fn blank(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            icon: default_icon(),
            category: HabitCategory::default(),
            difficulty: Difficulty::default(),
            scheduled_days: Schedule::every_day(),
            target_days: DEFAULT_TARGET_DAYS,
            completion_history: Ledger::new(),
            current_streak: 0,
            best_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for HabitRecord {
    const KEY: &'static str = HABITS_KEY;

    fn id(&self) -> Uuid {
        self.id
    }

    fn seed(_today: NaiveDate) -> Vec<Self> {
        let now = Utc::now();
        vec![
            Self::seeded("Drink Water", "💧", HabitCategory::Health, now),
            Self::seeded("Read 10 pages", "📚", HabitCategory::Learning, now),
        ]
    }

    fn normalize(&mut self, today: NaiveDate) {
        let entries = self.completion_history.entries().to_vec();
        self.completion_history = Ledger::from_entries(entries);
        self.scheduled_days.normalize();
        self.target_days = self.target_days.clamp(1, 7);
        self.best_streak = self.best_streak.max(self.completion_history.longest_run());
        self.refresh_streaks(today);
    }

    fn refresh(&mut self, today: NaiveDate) {
        self.refresh_streaks(today);
    }
}

impl Repository<HabitRecord> {
    /// Flips today's completion for one habit and returns the updated record.
    pub async fn toggle_today(
        &mut self,
        id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> StoreResult<HabitRecord> {
        self.update(id, |habit| {
            habit.toggle_today(today, now);
            Ok(habit.clone())
        })
        .await
    }

    /// Clears today's entry on every habit.
    pub async fn reset_day(&mut self, today: NaiveDate, now: DateTime<Utc>) -> StoreResult<()> {
        self.update_all(|habit| habit.clear_day(today, today, now)).await?;
        info!("reset {today} across {} habits", self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CompletionEntry;
    use crate::storage::{Backend, MemoryBackend};
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        // A Tuesday.
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap()
    }

    fn draft(name: &str) -> HabitDraft {
        HabitDraft {
            name: name.into(),
            ..HabitDraft::default()
        }
    }

    fn completed(date: NaiveDate) -> CompletionEntry {
        CompletionEntry {
            date,
            completed: true,
            completed_at: Some(now()),
        }
    }

    #[test]
    fn create_fills_defaults() {
        let habit = HabitRecord::create(draft("  Meditate "), now()).unwrap();
        assert_eq!(habit.name, "Meditate");
        assert_eq!(habit.icon, DEFAULT_ICON);
        assert_eq!(habit.category, HabitCategory::Personal);
        assert_eq!(habit.difficulty, Difficulty::Medium);
        assert_eq!(habit.target_days, 7);
        assert!(habit.scheduled_days.is_every_day());
        assert!(habit.completion_history.is_empty());
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = HabitRecord::create(draft("   "), now()).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
    }

    #[test]
    fn edit_keeps_history_and_streaks() {
        let mut habit = HabitRecord::create(draft("Run"), now()).unwrap();
        habit.toggle_today(today(), now());

        habit
            .apply(
                HabitDraft {
                    name: "Run 5k".into(),
                    difficulty: Difficulty::Hard,
                    ..HabitDraft::default()
                },
                now(),
            )
            .unwrap();

        assert_eq!(habit.name, "Run 5k");
        assert_eq!(habit.difficulty, Difficulty::Hard);
        assert_eq!(habit.current_streak, 1);
        assert_eq!(habit.completion_history.len(), 1);
    }

    #[test]
    fn today_state_follows_schedule_and_ledger() {
        let mut habit = HabitRecord::create(
            HabitDraft {
                name: "Gym".into(),
                scheduled_days: Some(Schedule::days([Weekday::Mon, Weekday::Wed])),
                ..HabitDraft::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(habit.today_state(today()), TodayState::NotScheduledToday);

        habit.scheduled_days = Schedule::days([Weekday::Tue]);
        assert_eq!(habit.today_state(today()), TodayState::PendingToday);

        habit.toggle_today(today(), now());
        assert_eq!(habit.today_state(today()), TodayState::CompletedToday);

        habit.toggle_today(today(), now());
        assert_eq!(habit.today_state(today()), TodayState::PendingToday);
    }

    #[test]
    fn best_streak_is_a_watermark() {
        let mut habit = HabitRecord::create(draft("Floss"), now()).unwrap();
        habit.completion_history = Ledger::from_entries([
            completed(today() - Duration::days(2)),
            completed(today() - Duration::days(1)),
        ]);

        habit.toggle_today(today(), now());
        assert_eq!(habit.current_streak, 3);
        assert_eq!(habit.best_streak, 3);

        habit.toggle_today(today(), now());
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.best_streak, 3);

        habit.completion_history = Ledger::new();
        habit.refresh_streaks(today());
        assert_eq!(habit.best_streak, 3);
    }

    #[test]
    fn schedule_descriptions() {
        assert_eq!(Schedule::default().describe(), "Every day");
        assert_eq!(Schedule::every_day().describe(), "Every day");
        assert_eq!(Schedule::days(WEEK[..5].iter().copied()).describe(), "Weekdays");
        assert_eq!(Schedule::days([Weekday::Sun, Weekday::Sat]).describe(), "Weekends");
        assert_eq!(Schedule::days([Weekday::Thu, Weekday::Mon]).describe(), "Mon, Thu");
    }

    #[test]
    fn sparse_stored_record_is_normalized() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Journal",
            "scheduledDays": ["friday", "monday", "friday"],
            "completionHistory": [
                { "date": "2026-03-09", "completed": true },
                { "date": "2026-03-10", "completed": false },
                { "date": "2026-03-10", "completed": true, "completedAt": "2026-03-10T06:00:00Z" }
            ],
            "currentStreak": 99,
            "createdAt": "2026-03-01T00:00:00Z",
            "updatedAt": "2026-03-01T00:00:00Z"
        });
        let mut habit: HabitRecord = serde_json::from_value(json).unwrap();
        habit.normalize(today());

        assert_eq!(habit.icon, DEFAULT_ICON);
        assert_eq!(habit.category, HabitCategory::Personal);
        assert_eq!(habit.scheduled_days.weekdays(), &[Weekday::Mon, Weekday::Fri]);
        assert_eq!(habit.completion_history.len(), 2);
        assert_eq!(habit.current_streak, 2);
        assert_eq!(habit.best_streak, 2);
    }

    #[test]
    fn scheduled_days_round_trip_as_names() {
        let habit = HabitRecord::create(
            HabitDraft {
                name: "Swim".into(),
                scheduled_days: Some(Schedule::days([Weekday::Sat])),
                ..HabitDraft::default()
            },
            now(),
        )
        .unwrap();
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["scheduledDays"], serde_json::json!(["saturday"]));
    }

    #[tokio::test]
    async fn repository_toggle_and_reset_persist() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let mut repo: Repository<HabitRecord> = Repository::load(Arc::clone(&backend), today()).await;
        assert_eq!(repo.len(), 2);

        let id = repo.list()[0].id;
        let toggled = repo.toggle_today(id, today(), now()).await.unwrap();
        assert_eq!(toggled.current_streak, 1);

        let reloaded: Repository<HabitRecord> = Repository::load(Arc::clone(&backend), today()).await;
        assert!(reloaded.get(id).unwrap().completion_history.is_completed(today()));

        repo.reset_day(today(), now()).await.unwrap();
        let habit = repo.get(id).unwrap();
        assert_eq!(habit.completion_history.len(), 1);
        assert!(!habit.completion_history.is_completed(today()));
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.best_streak, 1);
    }

    #[tokio::test]
    async fn refresh_moves_streaks_to_a_new_day() {
        let mut repo: Repository<HabitRecord> =
            Repository::load(Arc::new(MemoryBackend::new()), today()).await;
        let id = repo.list()[0].id;
        repo.toggle_today(id, today(), now()).await.unwrap();

        repo.refresh(today() + Duration::days(1));
        let habit = repo.get(id).unwrap();
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.best_streak, 1);

        repo.refresh(today());
        assert_eq!(repo.get(id).unwrap().current_streak, 1);
    }

    #[tokio::test]
    async fn confirmed_habit_delete_stays_deleted_after_reload() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let mut repo: Repository<HabitRecord> = Repository::load(Arc::clone(&backend), today()).await;
        let doomed = repo.insert(HabitRecord::create(draft("Floss"), now()).unwrap()).await.unwrap();
        let kept = repo.list()[0].id;

        let token = repo.request_delete(doomed.id).unwrap();
        let removed = repo.confirm_delete(token).await.unwrap();
        assert_eq!(removed.name, "Floss");

        let reloaded: Repository<HabitRecord> = Repository::load(backend, today()).await;
        assert!(reloaded.get(doomed.id).is_none());
        assert!(reloaded.get(kept).is_some());
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test]
    async fn malformed_habits_document_loads_seed_habits() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        backend.save(HABITS_KEY, b"{\"habits\": [").await.unwrap();

        let repo: Repository<HabitRecord> = Repository::load(backend, today()).await;
        let names: Vec<&str> = repo.list().iter().map(|habit| habit.name.as_str()).collect();
        assert_eq!(names, ["Drink Water", "Read 10 pages"]);
        assert!(repo.list().iter().all(|habit| habit.completion_history.is_empty()));
    }

    #[tokio::test]
    async fn toggle_unknown_habit_fails() {
        let mut repo: Repository<HabitRecord> =
            Repository::load(Arc::new(MemoryBackend::new()), today()).await;
        let err = repo.toggle_today(Uuid::new_v4(), today(), now()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
