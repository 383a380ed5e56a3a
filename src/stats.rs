use crate::habits::{HabitCategory, HabitRecord, TodayState};
use crate::ledger::{DayMark, percentage};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

const STRIP_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: HabitCategory,
    pub count: usize,
    pub completed_today: usize,
}

/// Completions across the whole collection on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub completed: usize,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub date: NaiveDate,
    pub total_habits: usize,
    pub completed_today: usize,
    pub active_streaks: usize,
    pub total_streak_days: u32,
    pub best_streak: u32,
    pub completion_rate: u8,
    pub categories: Vec<CategoryStats>,
    /// The seven days ending today, oldest first.
    pub week: Vec<DaySummary>,
}

/// A habit together with everything shown next to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCard {
    #[serde(flatten)]
    pub habit: HabitRecord,
    pub today: TodayState,
    pub completion_rate: u8,
    pub schedule: String,
    pub last_7_days: Vec<DayMark>,
}

pub fn build_summary_at(today: NaiveDate, habits: &[HabitRecord]) -> HabitSummary {
    let completed_today = habits
        .iter()
        .filter(|habit| habit.completion_history.is_completed(today))
        .count();

    let total_entries: usize = habits.iter().map(|habit| habit.completion_history.len()).sum();
    let total_completions: usize = habits
        .iter()
        .map(|habit| habit.completion_history.completed_count())
        .sum();

    let categories = HabitCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<&HabitRecord> =
                habits.iter().filter(|habit| habit.category == category).collect();
            if members.is_empty() {
                return None;
            }
            Some(CategoryStats {
                category,
                count: members.len(),
                completed_today: members
                    .iter()
                    .filter(|habit| habit.completion_history.is_completed(today))
                    .count(),
            })
        })
        .collect();

    HabitSummary {
        date: today,
        total_habits: habits.len(),
        completed_today,
        active_streaks: habits.iter().filter(|habit| habit.current_streak > 0).count(),
        total_streak_days: habits.iter().map(|habit| habit.current_streak).sum(),
        best_streak: habits.iter().map(|habit| habit.best_streak).max().unwrap_or(0),
        completion_rate: percentage(total_completions, total_entries),
        categories,
        week: week_at(today, habits),
    }
}

fn week_at(today: NaiveDate, habits: &[HabitRecord]) -> Vec<DaySummary> {
    (0..i64::from(STRIP_DAYS))
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let completed = habits
                .iter()
                .filter(|habit| habit.completion_history.is_completed(date))
                .count();
            DaySummary {
                date,
                weekday: date.weekday(),
                completed,
                rate: percentage(completed, habits.len()),
            }
        })
        .collect()
}

pub fn habit_card(today: NaiveDate, habit: &HabitRecord) -> HabitCard {
    HabitCard {
        habit: habit.clone(),
        today: habit.today_state(today),
        completion_rate: habit.completion_history.completion_rate(),
        schedule: habit.scheduled_days.describe(),
        last_7_days: habit.completion_history.last_days(today, STRIP_DAYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::HabitDraft;
    use crate::ledger::{CompletionEntry, Ledger};
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn habit(name: &str, category: HabitCategory, done: &[(i64, bool)]) -> HabitRecord {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        let mut habit = HabitRecord::create(
            HabitDraft {
                name: name.into(),
                category,
                ..HabitDraft::default()
            },
            now,
        )
        .unwrap();
        habit.completion_history = Ledger::from_entries(done.iter().map(|&(offset, completed)| {
            CompletionEntry {
                date: today() - Duration::days(offset),
                completed,
                completed_at: None,
            }
        }));
        habit.refresh_streaks(today());
        habit
    }

    #[test]
    fn summary_aggregates_across_habits() {
        let habits = vec![
            habit("water", HabitCategory::Health, &[(0, true), (1, true), (2, false)]),
            habit("walk", HabitCategory::Health, &[(1, true)]),
            habit("read", HabitCategory::Learning, &[(0, true)]),
        ];

        let summary = build_summary_at(today(), &habits);
        assert_eq!(summary.total_habits, 3);
        assert_eq!(summary.completed_today, 2);
        assert_eq!(summary.active_streaks, 2);
        assert_eq!(summary.total_streak_days, 3);
        assert_eq!(summary.best_streak, 2);
        assert_eq!(summary.completion_rate, 80);
        assert_eq!(
            summary.categories,
            vec![
                CategoryStats {
                    category: HabitCategory::Health,
                    count: 2,
                    completed_today: 1
                },
                CategoryStats {
                    category: HabitCategory::Learning,
                    count: 1,
                    completed_today: 1
                },
            ]
        );
    }

    #[test]
    fn week_counts_completions_per_day() {
        let habits = vec![
            habit("water", HabitCategory::Health, &[(0, true), (1, true), (2, false)]),
            habit("walk", HabitCategory::Health, &[(1, true), (6, true), (7, true)]),
            habit("read", HabitCategory::Learning, &[(0, true)]),
            habit("write", HabitCategory::Learning, &[]),
        ];

        let week = build_summary_at(today(), &habits).week;
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, today() - Duration::days(6));
        assert_eq!(week[6].date, today());
        assert_eq!(week[6].weekday, Weekday::Mon);

        let completed: Vec<usize> = week.iter().map(|day| day.completed).collect();
        assert_eq!(completed, [1, 0, 0, 0, 0, 2, 2]);
        let rates: Vec<u8> = week.iter().map(|day| day.rate).collect();
        assert_eq!(rates, [25, 0, 0, 0, 0, 50, 50]);
    }

    #[test]
    fn empty_collection_has_zero_rate() {
        let summary = build_summary_at(today(), &[]);
        assert_eq!(summary.completion_rate, 0);
        assert_eq!(summary.best_streak, 0);
        assert!(summary.categories.is_empty());
        assert!(summary.week.iter().all(|day| day.completed == 0 && day.rate == 0));
    }

    #[test]
    fn card_includes_seven_day_strip() {
        let card = habit_card(today(), &habit("stretch", HabitCategory::Fitness, &[(0, true), (3, true)]));
        assert_eq!(card.last_7_days.len(), 7);
        assert_eq!(card.last_7_days.iter().filter(|day| day.completed).count(), 2);
        assert_eq!(card.today, TodayState::CompletedToday);
        assert_eq!(card.schedule, "Every day");
        assert_eq!(card.completion_rate, 100);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "stretch");
        assert_eq!(json["today"], "completed-today");
    }
}
