use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, warn};

use super::repository::Store;
use crate::shared::AppError;
use crate::todo::models::{TodoAccess, TodoDraft, TodoModel};
use crate::user::models::{Credentials, NewUser, UserModel};
use crate::user::password::check_password;

const TODO_COLUMNS: &str = "id, task_name, completed, due_date, created_at, updated_at";
const USER_COLUMNS: &str = "id, username, email, password";

/// PostgreSQL implementation of Store
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl Store for PostgresStore {
    #[instrument(skip(self, todo))]
    async fn create_todo(&self, todo: &TodoDraft, owner_id: i64) -> Result<TodoModel, AppError> {
        debug!(owner_id, task_name = %todo.task_name, "Creating todo in database");

        let mut tx = self.pool.begin().await.map_err(|e| {
            warn!(error = %e, "Failed to start transaction");
            database_error(e)
        })?;

        let created = sqlx::query_as::<_, TodoModel>(&format!(
            "INSERT INTO todos (task_name, completed, due_date) VALUES ($1, $2, $3) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.task_name)
        .bind(todo.completed)
        .bind(todo.due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to insert todo");
            database_error(e)
        })?;

        // Dropping tx on error rolls the todo insert back
        sqlx::query("INSERT INTO users_todos (user_id, todo_id) VALUES ($1, $2)")
            .bind(owner_id)
            .bind(created.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                warn!(error = %e, todo_id = created.id, "Failed to insert todo ownership");
                database_error(e)
            })?;

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "Failed to commit todo creation");
            database_error(e)
        })?;

        debug!(todo_id = created.id, "Todo created successfully in database");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_todos(&self, owner_id: i64) -> Result<Vec<TodoModel>, AppError> {
        debug!(owner_id, "Listing todos from database");

        let todos = sqlx::query_as::<_, TodoModel>(
            "SELECT t.id, t.task_name, t.completed, t.due_date, t.created_at, t.updated_at \
             FROM todos t \
             JOIN users_todos ut ON ut.todo_id = t.id \
             WHERE ut.user_id = $1 \
             ORDER BY t.id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, owner_id, "Failed to list todos");
            database_error(e)
        })?;

        debug!(owner_id, todo_count = todos.len(), "Todos listed from database");
        Ok(todos)
    }

    #[instrument(skip(self))]
    async fn get_todo(&self, todo_id: i64, owner_id: i64) -> Result<TodoAccess, AppError> {
        debug!(todo_id, owner_id, "Checking todo ownership in database");

        let row = sqlx::query(
            "SELECT t.id, t.task_name, t.completed, t.due_date, t.created_at, t.updated_at, \
                    ut.user_id \
             FROM todos t \
             LEFT JOIN users_todos ut ON ut.todo_id = t.id \
             WHERE t.id = $1",
        )
        .bind(todo_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, todo_id, "Failed to fetch todo");
            database_error(e)
        })?;

        let access = match row {
            None => TodoAccess::Missing,
            Some(row) => {
                let owner: Option<i64> = row.get("user_id");
                if owner == Some(owner_id) {
                    TodoAccess::Owned(TodoModel {
                        id: row.get("id"),
                        task_name: row.get("task_name"),
                        completed: row.get("completed"),
                        due_date: row.get("due_date"),
                        created_at: row.get("created_at"),
                        updated_at: row.get("updated_at"),
                    })
                } else {
                    TodoAccess::NotOwned
                }
            }
        };

        debug!(todo_id, owner_id, ?access, "Todo ownership checked in database");
        Ok(access)
    }

    #[instrument(skip(self, todo))]
    async fn update_todo(&self, todo: &TodoDraft, todo_id: i64) -> Result<TodoModel, AppError> {
        debug!(todo_id, "Updating todo in database");

        let updated = sqlx::query_as::<_, TodoModel>(&format!(
            "UPDATE todos SET task_name = $1, completed = $2, due_date = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.task_name)
        .bind(todo.completed)
        .bind(todo.due_date)
        .bind(todo_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, todo_id, "Failed to update todo");
            database_error(e)
        })?
        .ok_or_else(|| {
            warn!(todo_id, "Todo not found for update");
            AppError::NotFound("Todo not found".to_string())
        })?;

        debug!(todo_id, "Todo updated successfully in database");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_todo(&self, todo_id: i64) -> Result<(), AppError> {
        debug!(todo_id, "Deleting todo from database");

        // users_todos rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(todo_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, todo_id, "Failed to delete todo");
                database_error(e)
            })?;

        if result.rows_affected() == 0 {
            warn!(todo_id, "Todo not found for deletion");
            return Err(AppError::NotFound("Todo not found".to_string()));
        }

        debug!(todo_id, "Todo deleted successfully from database");
        Ok(())
    }

    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError> {
        debug!(email = %user.email, "Creating user in database");

        let created = sqlx::query_as::<_, UserModel>(&format!(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                warn!(email = %user.email, "Email already registered");
                AppError::Conflict("Email already registered".to_string())
            }
            e => {
                warn!(error = %e, "Failed to create user");
                database_error(e)
            }
        })?;

        debug!(user_id = created.id, "User created successfully in database");
        Ok(created)
    }

    #[instrument(skip(self, credentials))]
    async fn get_user(&self, credentials: &Credentials) -> Result<Option<UserModel>, AppError> {
        debug!(email = %credentials.email, "Fetching user by credentials from database");

        let user = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(&credentials.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by email");
            database_error(e)
        })?;

        let stored_hash = user.as_ref().map(|user| user.password_hash.as_str());
        let matches = check_password(&credentials.password, stored_hash).await?;

        Ok(user.filter(|_| matches))
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError> {
        debug!(user_id, "Fetching user by id from database");

        sqlx::query_as::<_, UserModel>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Failed to fetch user by id");
                database_error(e)
            })
    }
}
