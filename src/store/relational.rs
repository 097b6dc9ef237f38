//! Relational variant: `Todos` table with AUTOINCREMENT ids and a 0/1 completion column.

use super::{apply_list_policy, ConcurrencyMode, ListFailurePolicy, TodoStore};
use crate::error::AppError;
use crate::model::{Backend, Todo, TodoId, TodoPatch};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub const TODOS_TABLE: &str = "Todos";

/// Create the `Todos` table if it does not exist. AUTOINCREMENT keeps ids from being reused after deletes.
pub async fn ensure_todos_table(pool: &SqlitePool) -> Result<(), AppError> {
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0
        )
        "#,
        TODOS_TABLE
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}

type TodoRow = (i64, String, i64);

fn row_to_todo((id, title, completed): TodoRow) -> Todo {
    Todo {
        id: TodoId::Int(id),
        title,
        completed: completed != 0,
    }
}

fn row_id(id: &TodoId) -> Option<i64> {
    match id {
        TodoId::Int(n) => Some(*n),
        TodoId::Uuid(_) => None,
    }
}

#[derive(Clone)]
pub struct SqlTodoStore {
    pool: SqlitePool,
    list_policy: ListFailurePolicy,
    concurrency: ConcurrencyMode,
}

impl SqlTodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqlTodoStore {
            pool,
            list_policy: ListFailurePolicy::FailSoft,
            concurrency: ConcurrencyMode::LastWriterWins,
        }
    }

    pub fn with_list_policy(mut self, policy: ListFailurePolicy) -> Self {
        self.list_policy = policy;
        self
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency = mode;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_all(&self) -> Result<Vec<Todo>, AppError> {
        let sql = format!("SELECT id, title, completed FROM {}", TODOS_TABLE);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<TodoRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(row_to_todo).collect())
    }

    async fn fetch_one(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT id, title, completed FROM {} WHERE id = ?", TODOS_TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let row: Option<TodoRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(row_to_todo))
    }
}

#[async_trait]
impl TodoStore for SqlTodoStore {
    fn backend(&self) -> Backend {
        Backend::Relational
    }

    fn parse_id(&self, raw: &str) -> Option<TodoId> {
        // canonical decimal only: " 1", "+1" and "01" name no row
        raw.parse::<i64>()
            .ok()
            .filter(|n| n.to_string() == raw)
            .map(TodoId::Int)
    }

    async fn list(&self) -> Result<Vec<Todo>, AppError> {
        apply_list_policy(self.list_policy, Backend::Relational, self.fetch_all().await)
    }

    async fn get(&self, id: &TodoId) -> Result<Option<Todo>, AppError> {
        match row_id(id) {
            Some(n) => self.fetch_one(n).await,
            None => Ok(None),
        }
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let sql = format!("INSERT INTO {} (title, completed) VALUES (?, 0)", TODOS_TABLE);
        tracing::debug!(sql = %sql, "query");
        let result = sqlx::query(&sql)
            .bind(title)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to insert todo");
                AppError::CreationFailed(e.to_string())
            })?;
        if result.rows_affected() != 1 {
            return Err(AppError::CreationFailed(format!(
                "insert reported {} affected rows",
                result.rows_affected()
            )));
        }
        Ok(Todo {
            id: TodoId::Int(result.last_insert_rowid()),
            title: title.to_string(),
            completed: false,
        })
    }

    async fn update(&self, id: &TodoId, patch: TodoPatch) -> Result<(), AppError> {
        if !patch.is_full() {
            return Err(AppError::validation(
                "body",
                "relational update requires both title and completed",
            ));
        }
        let found = match row_id(id) {
            Some(row) => self.fetch_one(row).await?.map(|todo| (row, todo)),
            None => None,
        };
        let Some((row, current)) = found else {
            tracing::warn!(id = %id, "todo not found; update skipped");
            return Ok(());
        };
        let merged = patch.apply(current.clone());
        let completed = i64::from(merged.completed);
        match self.concurrency {
            ConcurrencyMode::LastWriterWins => {
                let sql = format!("UPDATE {} SET title = ?, completed = ? WHERE id = ?", TODOS_TABLE);
                tracing::debug!(sql = %sql, id = row, "query");
                sqlx::query(&sql)
                    .bind(&merged.title)
                    .bind(completed)
                    .bind(row)
                    .execute(&self.pool)
                    .await?;
            }
            ConcurrencyMode::CompareAndSwap => {
                let sql = format!(
                    "UPDATE {} SET title = ?, completed = ? WHERE id = ? AND title = ? AND completed = ?",
                    TODOS_TABLE
                );
                tracing::debug!(sql = %sql, id = row, "query");
                let result = sqlx::query(&sql)
                    .bind(&merged.title)
                    .bind(completed)
                    .bind(row)
                    .bind(&current.title)
                    .bind(i64::from(current.completed))
                    .execute(&self.pool)
                    .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::Conflict(format!("todo {} changed during update", id)));
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), AppError> {
        let Some(row) = row_id(id) else {
            return Ok(());
        };
        let sql = format!("DELETE FROM {} WHERE id = ?", TODOS_TABLE);
        tracing::debug!(sql = %sql, id = row, "query");
        sqlx::query(&sql).bind(row).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
