use crate::errors::{StoreError, StoreResult};
use crate::repository::Record;
use crate::storage::NOTES_KEY;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    #[default]
    Personal,
    Work,
    Journal,
    Ideas,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: NoteCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
}

/// Search text plus an optional category; both must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteQuery {
    pub search: Option<String>,
    pub category: Option<NoteCategory>,
}

impl Note {
    pub fn create(draft: NoteDraft, now: DateTime<Utc>) -> StoreResult<Self> {
        let mut note = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            content: String::new(),
            category: NoteCategory::default(),
            created_at: now,
            updated_at: now,
        };
        note.apply(draft, now)?;
        Ok(note)
    }

    pub fn apply(&mut self, draft: NoteDraft, now: DateTime<Utc>) -> StoreResult<()> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(StoreError::Invalid(
                "note title and content must not be empty".into(),
            ));
        }
        self.title = title.to_string();
        self.content = content.to_string();
        self.category = draft.category;
        self.updated_at = now;
        Ok(())
    }
}

impl NoteQuery {
    pub fn matches(&self, note: &Note) -> bool {
        let category_matches = self.category.is_none_or(|category| note.category == category);
        let search_matches = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                note.title.to_lowercase().contains(&term) || note.content.to_lowercase().contains(&term)
            }
        };
        category_matches && search_matches
    }

    pub fn apply(&self, notes: &[Note]) -> Vec<Note> {
        notes.iter().filter(|note| self.matches(note)).cloned().collect()
    }
}

impl Record for Note {
    const KEY: &'static str = NOTES_KEY;

    fn id(&self) -> Uuid {
        self.id
    }

    fn seed(_today: NaiveDate) -> Vec<Self> {
        let now = Utc::now();
        vec![
            Self {
                id: Uuid::new_v4(),
                title: "Welcome to Notes!".into(),
                content: "Your personal space for thoughts, plans and ideas.".into(),
                category: NoteCategory::Personal,
                created_at: now,
                updated_at: now,
            },
            Self {
                id: Uuid::new_v4(),
                title: "Daily Journal Entry".into(),
                content: "Started tracking habits today.".into(),
                category: NoteCategory::Journal,
                created_at: now,
                updated_at: now,
            },
        ]
    }
}
