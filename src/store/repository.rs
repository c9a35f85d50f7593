use async_trait::async_trait;

use crate::shared::AppError;
use crate::todo::models::{TodoAccess, TodoDraft, TodoModel};
use crate::user::models::{Credentials, NewUser, UserModel};

/// Trait for todo and user persistence
///
/// Implementations must be safe to share between concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts the todo and its ownership row atomically
    async fn create_todo(&self, todo: &TodoDraft, owner_id: i64) -> Result<TodoModel, AppError>;

    /// Todos owned by the user, oldest first
    async fn list_todos(&self, owner_id: i64) -> Result<Vec<TodoModel>, AppError>;

    /// Existence and ownership check for a single todo
    async fn get_todo(&self, todo_id: i64, owner_id: i64) -> Result<TodoAccess, AppError>;

    /// Replaces the client-controlled fields. Does not check ownership; callers
    /// authorize with `get_todo` first.
    async fn update_todo(&self, todo: &TodoDraft, todo_id: i64) -> Result<TodoModel, AppError>;

    /// Deletes the todo and its ownership row. Does not check ownership; callers
    /// authorize with `get_todo` first.
    async fn delete_todo(&self, todo_id: i64) -> Result<(), AppError>;

    /// Fails with `AppError::Conflict` when the email is taken
    async fn create_user(&self, user: &NewUser) -> Result<UserModel, AppError>;

    /// Looks up by email and verifies the password against the stored hash
    async fn get_user(&self, credentials: &Credentials) -> Result<Option<UserModel>, AppError>;

    async fn get_user_by_id(&self, user_id: i64) -> Result<Option<UserModel>, AppError>;
}
