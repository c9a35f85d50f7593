use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::{TodoAccess, TodoDraft, TodoModel};
use crate::shared::AppError;
use crate::store::Store;
use crate::user::models::UserModel;

/// Service for todo business logic; every operation is scoped to the acting user
pub struct TodoService {
    store: Arc<dyn Store>,
}

impl TodoService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, owner, draft), fields(user_id = owner.id))]
    pub async fn create_todo(
        &self,
        owner: &UserModel,
        draft: TodoDraft,
    ) -> Result<TodoModel, AppError> {
        let todo = self.store.create_todo(&draft, owner.id).await?;
        info!(todo_id = todo.id, "Todo created");
        Ok(todo)
    }

    #[instrument(skip(self, owner), fields(user_id = owner.id))]
    pub async fn list_todos(&self, owner: &UserModel) -> Result<Vec<TodoModel>, AppError> {
        self.store.list_todos(owner.id).await
    }

    #[instrument(skip(self, owner, draft), fields(user_id = owner.id))]
    pub async fn update_todo(
        &self,
        owner: &UserModel,
        todo_id: i64,
        draft: TodoDraft,
    ) -> Result<TodoModel, AppError> {
        let denial = "You are not authorized to update this todo";
        self.authorize(owner, todo_id, denial).await?;

        // Deleted since the ownership check
        let todo = self
            .store
            .update_todo(&draft, todo_id)
            .await
            .map_err(|e| deny_if_missing(e, denial))?;
        info!(todo_id, "Todo updated");
        Ok(todo)
    }

    #[instrument(skip(self, owner), fields(user_id = owner.id))]
    pub async fn delete_todo(&self, owner: &UserModel, todo_id: i64) -> Result<(), AppError> {
        let denial = "You are not authorized to delete this todo";
        self.authorize(owner, todo_id, denial).await?;

        self.store
            .delete_todo(todo_id)
            .await
            .map_err(|e| deny_if_missing(e, denial))?;
        info!(todo_id, "Todo deleted");
        Ok(())
    }

    /// Missing and foreign todos get the same 404 so callers can't probe for ids
    async fn authorize(
        &self,
        owner: &UserModel,
        todo_id: i64,
        denial: &str,
    ) -> Result<TodoModel, AppError> {
        match self.store.get_todo(todo_id, owner.id).await? {
            TodoAccess::Owned(todo) => Ok(todo),
            access => {
                warn!(todo_id, user_id = owner.id, ?access, "Todo access denied");
                Err(AppError::NotFound(denial.to_string()))
            }
        }
    }
}

fn deny_if_missing(error: AppError, denial: &str) -> AppError {
    match error {
        AppError::NotFound(_) => AppError::NotFound(denial.to_string()),
        other => other,
    }
}
