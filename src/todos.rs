use crate::errors::{StoreError, StoreResult};
use crate::repository::Record;
use crate::storage::TODOS_KEY;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoCategory {
    Work,
    #[default]
    Personal,
    Shopping,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Completed,
    Pending,
    High,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "blank_date::deserialize")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: TodoCategory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoDraft {
    pub text: String,
    pub priority: Priority,
    #[serde(deserialize_with = "blank_date::deserialize")]
    pub due_date: Option<NaiveDate>,
    pub category: TodoCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TodoCounts {
    pub completed: usize,
    pub remaining: usize,
    pub total: usize,
}

/// Optional dates where forms send `""` for "no date".
pub(crate) mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid date {value:?}: {err}"))),
        }
    }
}

impl Todo {
    pub fn create(draft: TodoDraft) -> StoreResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            text: validated_text(&draft.text)?,
            completed: false,
            priority: draft.priority,
            due_date: draft.due_date,
            category: draft.category,
        })
    }

    pub fn rename(&mut self, text: &str) -> StoreResult<()> {
        self.text = validated_text(text)?;
        Ok(())
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn matches(&self, filter: TodoFilter, today: NaiveDate) -> bool {
        match filter {
            TodoFilter::All => true,
            TodoFilter::Completed => self.completed,
            TodoFilter::Pending => !self.completed,
            TodoFilter::High => self.priority == Priority::High,
            TodoFilter::Overdue => self.is_overdue(today),
        }
    }
}

fn validated_text(text: &str) -> StoreResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::Invalid("todo text must not be empty".into()));
    }
    Ok(text.to_string())
}

pub fn filter_todos(todos: &[Todo], filter: TodoFilter, today: NaiveDate) -> Vec<Todo> {
    todos
        .iter()
        .filter(|todo| todo.matches(filter, today))
        .cloned()
        .collect()
}

pub fn count_todos(todos: &[Todo]) -> TodoCounts {
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoCounts {
        completed,
        remaining: todos.len() - completed,
        total: todos.len(),
    }
}

impl Record for Todo {
    const KEY: &'static str = TODOS_KEY;

    fn id(&self) -> Uuid {
        self.id
    }

    fn seed(today: NaiveDate) -> Vec<Self> {
        vec![
            Self {
                id: Uuid::new_v4(),
                text: "Welcome to your todo list!".into(),
                completed: false,
                priority: Priority::Medium,
                due_date: today.succ_opt(),
                category: TodoCategory::Personal,
            },
            Self {
                id: Uuid::new_v4(),
                text: "Check out the habits and goals trackers".into(),
                completed: false,
                priority: Priority::High,
                due_date: Some(today),
                category: TodoCategory::Work,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn blank_due_date_means_no_date() {
        let draft: TodoDraft = serde_json::from_value(serde_json::json!({
            "text": "call mom",
            "priority": "high",
            "dueDate": ""
        }))
        .unwrap();
        assert_eq!(draft.due_date, None);

        let dated: TodoDraft =
            serde_json::from_value(serde_json::json!({ "text": "rent", "dueDate": "2026-03-31" })).unwrap();
        assert_eq!(dated.due_date, NaiveDate::from_ymd_opt(2026, 3, 31));

        let undated: TodoDraft = serde_json::from_value(serde_json::json!({ "text": "rest" })).unwrap();
        assert_eq!(undated.due_date, None);

        let bad = serde_json::from_value::<TodoDraft>(serde_json::json!({ "text": "x", "dueDate": "soon" }));
        assert!(bad.is_err());
    }

    fn todo(text: &str, completed: bool, priority: Priority, due: Option<NaiveDate>) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            text: text.into(),
            completed,
            priority,
            due_date: due,
            category: TodoCategory::default(),
        }
    }

    fn sample() -> Vec<Todo> {
        let yesterday = today().pred_opt();
        vec![
            todo("done", true, Priority::Low, yesterday),
            todo("late", false, Priority::High, yesterday),
            todo("today", false, Priority::Medium, Some(today())),
            todo("someday", false, Priority::Low, None),
        ]
    }

    fn texts(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|todo| todo.text.as_str()).collect()
    }

    #[test]
    fn filters_select_expected_todos() {
        let todos = sample();
        assert_eq!(filter_todos(&todos, TodoFilter::All, today()).len(), 4);
        assert_eq!(texts(&filter_todos(&todos, TodoFilter::Completed, today())), ["done"]);
        assert_eq!(
            texts(&filter_todos(&todos, TodoFilter::Pending, today())),
            ["late", "today", "someday"]
        );
        assert_eq!(texts(&filter_todos(&todos, TodoFilter::High, today())), ["late"]);
        assert_eq!(texts(&filter_todos(&todos, TodoFilter::Overdue, today())), ["late"]);
    }

    #[test]
    fn counts_split_completed_and_remaining() {
        let counts = count_todos(&sample());
        assert_eq!(
            counts,
            TodoCounts {
                completed: 1,
                remaining: 3,
                total: 4
            }
        );
    }

    #[test]
    fn create_and_rename_require_text() {
        assert!(Todo::create(TodoDraft::default()).is_err());

        let mut todo = Todo::create(TodoDraft {
            text: " buy milk ".into(),
            ..TodoDraft::default()
        })
        .unwrap();
        assert_eq!(todo.text, "buy milk");
        assert!(todo.rename("").is_err());
        assert_eq!(todo.text, "buy milk");
    }
}
