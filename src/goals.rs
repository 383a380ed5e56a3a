//! Goals broken into milestones, with progress and status derived from the
//! milestones that are checked off.

use crate::errors::{StoreError, StoreResult};
use crate::ledger::percentage;
use crate::repository::{Record, Repository};
use crate::storage::GOALS_KEY;
use crate::todos::{Priority, blank_date};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    #[default]
    Personal,
    Career,
    Health,
    Financial,
    Learning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Overdue,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDraft {
    /// Present when editing an existing milestone.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub priority: Priority,
    #[serde(deserialize_with = "blank_date::deserialize")]
    pub deadline: Option<NaiveDate>,
    pub milestones: Vec<MilestoneDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn create(draft: GoalDraft, today: NaiveDate, now: DateTime<Utc>) -> StoreResult<Self> {
        let mut goal = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            category: GoalCategory::default(),
            priority: Priority::default(),
            deadline: None,
            milestones: Vec::new(),
            progress: 0,
            status: GoalStatus::NotStarted,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        goal.apply(draft, today, now)?;
        Ok(goal)
    }

    /// Replaces the editable fields. Milestones that keep their id keep
    /// their completion flag.
    pub fn apply(&mut self, draft: GoalDraft, today: NaiveDate, now: DateTime<Utc>) -> StoreResult<()> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(StoreError::Invalid("goal title must not be empty".into()));
        }

        // A retained id may be claimed once; later repeats become new milestones.
        let mut claimed = HashSet::new();
        let milestones = draft
            .milestones
            .into_iter()
            .filter_map(|milestone| {
                let text = milestone.text.trim().to_string();
                if text.is_empty() {
                    return None;
                }
                let existing = milestone
                    .id
                    .filter(|id| claimed.insert(*id))
                    .and_then(|id| self.milestones.iter().find(|m| m.id == id));
                let id = existing.map_or_else(Uuid::new_v4, |m| m.id);
                claimed.insert(id);
                Some(Milestone {
                    id,
                    completed: existing.is_some_and(|m| m.completed),
                    text,
                })
            })
            .collect();

        self.title = title.to_string();
        self.description = draft.description.trim().to_string();
        self.category = draft.category;
        self.priority = draft.priority;
        self.deadline = draft.deadline;
        self.milestones = milestones;
        self.updated_at = now;
        self.recompute(today, now);
        Ok(())
    }

    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// `round(100 * completed / total)`, 0 without milestones.
    pub fn compute_progress(&self) -> u8 {
        percentage(self.completed_milestones(), self.milestones.len())
    }

    pub fn compute_status(&self, today: NaiveDate) -> GoalStatus {
        let progress = self.compute_progress();
        if progress == 100 {
            GoalStatus::Completed
        } else if self.deadline.is_some_and(|deadline| deadline < today) {
            GoalStatus::Overdue
        } else if progress > 0 {
            GoalStatus::InProgress
        } else {
            GoalStatus::NotStarted
        }
    }

    /// Days until the deadline; negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.deadline.map(|deadline| (deadline - today).num_days())
    }

    pub fn toggle_milestone(
        &mut self,
        milestone_id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or(StoreError::NotFound(milestone_id))?;
        milestone.completed = !milestone.completed;
        self.updated_at = now;
        self.recompute(today, now);
        Ok(())
    }

    /// Refreshes progress and status. `completed_at` is stamped when the goal
    /// first reaches 100% and cleared when it drops below again.
    fn recompute(&mut self, today: NaiveDate, now: DateTime<Utc>) {
        self.progress = self.compute_progress();
        self.status = self.compute_status(today);
        if self.progress == 100 {
            self.completed_at.get_or_insert(now);
        } else {
            self.completed_at = None;
        }
    }

    fn seeded(title: &str, category: GoalCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category,
            priority: Priority::default(),
            deadline: None,
            milestones: Vec::new(),
            progress: 0,
            status: GoalStatus::NotStarted,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Goal {
    const KEY: &'static str = GOALS_KEY;

    fn id(&self) -> Uuid {
        self.id
    }

    fn seed(_today: NaiveDate) -> Vec<Self> {
        let now = Utc::now();
        vec![
            Self::seeded("Learn React", GoalCategory::Learning, now),
            Self::seeded("Exercise 3 times a week", GoalCategory::Health, now),
        ]
    }

    fn normalize(&mut self, today: NaiveDate) {
        self.progress = self.compute_progress();
        self.status = self.compute_status(today);
        if self.progress == 100 {
            self.completed_at.get_or_insert(self.updated_at);
        } else {
            self.completed_at = None;
        }
    }
}

impl Repository<Goal> {
    pub async fn toggle_milestone(
        &mut self,
        goal_id: Uuid,
        milestone_id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> StoreResult<Goal> {
        self.update(goal_id, |goal| {
            goal.toggle_milestone(milestone_id, today, now)?;
            Ok(goal.clone())
        })
        .await
    }
}
