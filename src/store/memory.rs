use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::repository::Store;
use crate::shared::AppError;
use crate::todo::models::{TodoAccess, TodoDraft, TodoModel};
use crate::user::models::{Credentials, NewUser, UserModel};
use crate::user::password::check_password;

#[derive(Default)]
struct Tables {
    todos: BTreeMap<i64, TodoModel>,
    users: BTreeMap<i64, UserModel>,
    users_todos: Vec<(i64, i64)>, // (user_id, todo_id)
    next_todo_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn owner_of(&self, todo_id: i64) -> Option<i64> {
        self.users_todos
            .iter()
            .find(|(_, t)| *t == todo_id)
            .map(|(u, _)| *u)
    }
}

/// In-memory implementation of Store for development and testing
///
/// Mirrors the PostgreSQL store: ids start at 1, emails are unique and deleting a todo
/// removes its ownership row. Data is lost when the process exits.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of ownership rows (useful for checking cascades)
    pub fn ownership_count(&self) -> usize {
        self.tables
            .lock()
            .map(|tables| tables.users_todos.len())
            .unwrap_or(0)
    }

    /// Owners recorded for a todo
    pub fn owners_of(&self, todo_id: i64) -> Vec<i64> {
        self.tables
            .lock()
            .map(|tables| {
                tables
                    .users_todos
                    .iter()
                    .filter(|(_, t)| *t == todo_id)
                    .map(|(u, _)| *u)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| {
            warn!("In-memory store lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl Store for InMemoryStore {
    #[instrument(skip(self, todo))]
    async fn create_todo(&self, todo: &TodoDraft, owner_id: i64) -> Result<TodoModel, AppError> {
        debug!(owner_id, task_name = %todo.task_name, "Creating todo in memory");

        let mut tables = self.tables()?;
        tables.next_todo_id += 1;
        let created = TodoModel::from_draft(tables.next_todo_id, todo);

        // Both rows go in under the same lock, so readers never see half of it
        tables.todos.insert(created.id, created.clone());
        tables.users_todos.push((owner_id, created.id));

        debug!(todo_id = created.id, "Todo created successfully in memory");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_todos(&self, owner_id: i64) -> Result<Vec<TodoModel>, AppError> {
        debug!(owner_id, "Listing todos in memory");

        let tables = self.tables()?;
        let mut todos: Vec<TodoModel> = tables
            .users_todos
            .iter()
            .filter(|(u, _)| *u == owner_id)
            .filter_map(|(_, t)| tables.todos.get(t).cloned())
            .collect();
        todos.sort_by_key(|todo| todo.id);

        debug!(owner_id, todo_count = todos.len(), "Todos listed in memory");
        Ok(todos)
    }

    #[instrument(skip(self))]
    async fn get_todo(&self, todo_id: i64, owner_id: i64) -> Result<TodoAccess, AppError> {
        debug!(todo_id, owner_id, "Checking todo ownership in memory");

        let tables = self.tables()?;
        let access = match tables.todos.get(&todo_id) {
            None => TodoAccess::Missing,
            Some(todo) if tables.owner_of(todo_id) == Some(owner_id) => {
                TodoAccess::Owned(todo.clone())
            }
            Some(_) => TodoAccess::NotOwned,
        };

        debug!(todo_id, owner_id, ?access, "Todo ownership checked in memory");
        Ok(access)
    }

    #[instrument(skip(self, todo))]
    async fn update_todo(&self, todo: &TodoDraft, todo_id: i64) -> Result<TodoModel, AppError> {
        debug!(todo_id, "Updating todo in memory");

        let mut tables = self.tables()?;
        let stored = tables.todos.get_mut(&todo_id).ok_or_else(|| {
            warn!(todo_id, "Todo not found for update in memory");
            AppError::NotFound("Todo not found".to_string())
        })?;
        stored.apply(todo);

        debug!(todo_id, "Todo updated successfully in memory");
        Ok(stored.clone())
    }

    #[instrument(skip(self))]
    async fn delete_todo(&self, todo_id: i64) -> Result<(), AppError> {
        debug!(todo_id, "Deleting todo from memory");

        let mut tables = self.tables()?;
        if tables.todos.remove(&todo_id).is_none() {
            warn!(todo_id, "Todo not found for deletion in memory");
            return Err(AppError::NotFound("Todo not found".to_string()));
        }
        tables.users_todos.retain(|(_, t)| *t != todo_id);

        debug!(todo_id, "Todo deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(email = %user.email, "Creating user in memory");

        let mut tables = self.tables()?;
        if tables.users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already registered in memory");
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        tables.next_user_id += 1;
        let created = UserModel {
            id: tables.next_user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        };
        tables.users.insert(created.id, created.clone());

        debug!(user_id = created.id, "User created successfully in memory");
        Ok(created)
    }

    #[instrument(skip(self, credentials))]
    async fn get_user(&self, credentials: &Credentials) -> Result<Option<UserModel>, AppError> {
        debug!(email = %credentials.email, "Fetching user by credentials from memory");

        let candidate = {
            let tables = self.tables()?;
            tables
                .users
                .values()
                .find(|u| u.email == credentials.email)
                .cloned()
        };

        let stored_hash = candidate.as_ref().map(|user| user.password_hash.as_str());
        let matches = check_password(&credentials.password, stored_hash).await?;

        Ok(candidate.filter(|_| matches))
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        let tables = self.tables()?;
        Ok(tables.users.get(&user_id).cloned())
    }
}
