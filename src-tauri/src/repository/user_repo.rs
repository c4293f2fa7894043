//! User Repository
//!
//! Users are provisioned elsewhere; the console only needs enough of them
//! to hang assignments on.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, User};
use super::db::{inserted_id, not_initialized, now_millis, SharedConnection};
use super::traits::Repository;

pub struct UserRepository {
    conn: SharedConnection,
}

impl UserRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn create(&self, entity: &User) -> DomainResult<User> {
        let name = entity.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("user name must not be empty".into()));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let taken: Option<u32> = conn
            .query_row("SELECT id FROM users WHERE name = ?", params![name], |row| row.get(0))
            .optional()?;
        if taken.is_some() {
            return Err(DomainError::Conflict(format!("user {} already exists", name)));
        }

        conn.execute(
            "INSERT INTO users (name, updated_at) VALUES (?, ?)",
            params![name, now_millis()],
        )?;

        Ok(User::new(inserted_id(conn)?, name.to_string()))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<User>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let user = conn
            .query_row("SELECT id, name FROM users WHERE id = ?", params![id], |row| {
                Ok(User::new(row.get(0)?, row.get(1)?))
            })
            .optional()?;
        Ok(user)
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| Ok(User::new(row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn update(&self, entity: &User) -> DomainResult<User> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE users SET name = ?, updated_at = ? WHERE id = ?",
            params![entity.name, now_millis(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("User {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    /// Deletes the user and every assignment that references it
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let dropped = tx.execute("DELETE FROM client_users WHERE user_id = ?", params![id])?;
        let removed = tx.execute("DELETE FROM users WHERE id = ?", params![id])?;
        tx.commit()?;

        if removed == 0 {
            return Err(DomainError::NotFound(format!("User {} not found", id)));
        }
        log::info!("deleted user {} and {} assignments", id, dropped);
        Ok(())
    }
}
