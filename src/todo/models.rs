use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::shared::AppError;
use crate::validation::null_as_default;

/// Database model for todos table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct TodoModel {
    pub id: i64,
    pub task_name: String,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a todo.
///
/// Missing and `null` fields decode to empty values so validation can report them instead
/// of the decoder rejecting the whole payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TodoPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 5))]
    pub task_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default)]
    #[validate(required)]
    pub due_date: Option<DateTime<Utc>>,
}

/// The client-controlled fields of a todo, after validation
#[derive(Debug, Clone, PartialEq)]
pub struct TodoDraft {
    pub task_name: String,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
}

impl TryFrom<TodoPayload> for TodoDraft {
    type Error = AppError;

    fn try_from(payload: TodoPayload) -> Result<Self, Self::Error> {
        crate::validation::validate(&payload)?;
        // validate() guarantees due_date is present
        let due_date = payload.due_date.ok_or(AppError::InvalidPayload)?;

        Ok(Self {
            task_name: payload.task_name,
            completed: payload.completed,
            due_date,
        })
    }
}

/// Outcome of looking up a todo on behalf of a user
#[derive(Debug, Clone, PartialEq)]
pub enum TodoAccess {
    /// The todo exists and belongs to the user
    Owned(TodoModel),
    /// The todo exists but belongs to someone else
    NotOwned,
    /// No todo with that id
    Missing,
}

impl TodoModel {
    /// Builds a freshly stored todo with both timestamps set to now
    pub fn from_draft(id: i64, draft: &TodoDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            task_name: draft.task_name.clone(),
            completed: draft.completed,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the client-controlled fields and bumps updated_at
    pub fn apply(&mut self, draft: &TodoDraft) {
        self.task_name = draft.task_name.clone();
        self.completed = draft.completed;
        self.due_date = draft.due_date;
        self.updated_at = Utc::now();
    }
}
