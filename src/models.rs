use crate::goals::Goal;
use crate::pomodoro::{Mode, PomodoroStats, Timer};
use crate::repository::DeleteToken;
use crate::todos::{Todo, TodoCounts, TodoFilter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: DeleteToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub display_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TodoQuery {
    pub filter: TodoFilter,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
    pub counts: TodoCounts,
}

#[derive(Debug, Deserialize)]
pub struct RenameTodo {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    pub date: Option<NaiveDate>,
}

/// A goal with its countdown to the deadline.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub completed_milestones: usize,
    pub days_remaining: Option<i64>,
}

impl GoalView {
    pub fn new(goal: Goal, today: NaiveDate) -> Self {
        Self {
            completed_milestones: goal.completed_milestones(),
            days_remaining: goal.days_remaining(today),
            goal,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroResponse {
    pub timer: Timer,
    pub progress: f64,
    pub stats: PomodoroStats,
}
