//! Per-day completion records for a single habit, and the streak and rate
//! statistics derived from them.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub date: NaiveDate,
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One marker of a short completion strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMark {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub completed: bool,
}

/// Completion history of one habit.
///
/// Conceptually a map from date to status: there is at most one entry per
/// date. Storage order is insertion order and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(Vec<CompletionEntry>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from raw entries, keeping the last entry seen for a
    /// duplicated date.
    pub fn from_entries(entries: impl IntoIterator<Item = CompletionEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            match ledger.position(entry.date) {
                Some(index) => ledger.0[index] = entry,
                None => ledger.0.push(entry),
            }
        }
        ledger
    }

    pub fn entries(&self) -> &[CompletionEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&CompletionEntry> {
        self.0.iter().find(|entry| entry.date == date)
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.entry(date).is_some_and(|entry| entry.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|entry| entry.completed).count()
    }

    /// Flips the status of `date`, creating a completed entry if none exists.
    pub fn toggle(&mut self, date: NaiveDate, now: DateTime<Utc>) -> &CompletionEntry {
        let index = match self.position(date) {
            Some(index) => {
                let entry = &mut self.0[index];
                entry.completed = !entry.completed;
                entry.completed_at = entry.completed.then_some(now);
                index
            }
            None => {
                self.0.push(CompletionEntry {
                    date,
                    completed: true,
                    completed_at: Some(now),
                });
                self.0.len() - 1
            }
        };
        &self.0[index]
    }

    /// Marks `date` as not completed if an entry exists; otherwise a no-op.
    pub fn clear_day(&mut self, date: NaiveDate) {
        if let Some(index) = self.position(date) {
            let entry = &mut self.0[index];
            entry.completed = false;
            entry.completed_at = None;
        }
    }

    /// Consecutive completed days ending at `today`.
    ///
    /// Walks backwards one calendar day at a time and stops at the first day
    /// that is missing or not completed. A missing entry for `today` itself
    /// is a gap, so the streak is zero until today is checked off.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let by_date: BTreeMap<NaiveDate, bool> =
            self.0.iter().map(|entry| (entry.date, entry.completed)).collect();

        let mut streak = 0;
        let mut cursor = today;
        while by_date.get(&cursor).copied().unwrap_or(false) {
            streak += 1;
            cursor -= Duration::days(1);
        }
        streak
    }

    /// Longest run of consecutive completed days anywhere in the history.
    pub fn longest_run(&self) -> u32 {
        let completed: BTreeSet<NaiveDate> = self
            .0
            .iter()
            .filter(|entry| entry.completed)
            .map(|entry| entry.date)
            .collect();

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for date in completed {
            run = match previous {
                Some(prev) if (date - prev).num_days() == 1 => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }
        longest
    }

    /// Percentage of entries marked completed, rounded; 0 for an empty ledger.
    pub fn completion_rate(&self) -> u8 {
        percentage(self.completed_count(), self.len())
    }

    /// The `days` days ending at `today`, oldest first.
    pub fn last_days(&self, today: NaiveDate, days: u32) -> Vec<DayMark> {
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(i64::from(offset));
                DayMark {
                    date,
                    weekday: date.weekday(),
                    completed: self.is_completed(date),
                }
            })
            .collect()
    }

    fn position(&self, date: NaiveDate) -> Option<usize> {
        self.0.iter().position(|entry| entry.date == date)
    }
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part as f64 * 100.0 / whole as f64).round();
    rounded.clamp(0.0, 100.0) as u8
}
