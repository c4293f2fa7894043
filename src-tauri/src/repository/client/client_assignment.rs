//! Client-User Assignment Operations
//!
//! Single-row operations on the client/user relation. Each call is atomic on
//! its own; multi-row order rewrites live in `client_ordering`.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{ClientAssignment, DomainError, DomainResult};
use super::super::db::{not_initialized, now_millis};
use super::client_ordering::next_order_for_user;
use super::client_repo::{ensure_client, ensure_user, row_to_assignment};

/// Trait for client-user assignment operations
#[async_trait]
pub trait ClientAssignmentOperations {
    /// Assign a client to a user, appended after the user's current clients
    async fn assign_client(&self, client_id: u32, user_id: u32, enable: bool) -> DomainResult<ClientAssignment>;

    /// Remove a client from a user's list
    async fn unassign_client(&self, client_id: u32, user_id: u32) -> DomainResult<()>;

    /// Toggle the enable flag of one assignment
    async fn set_assignment_enabled(&self, client_id: u32, user_id: u32, enable: bool) -> DomainResult<ClientAssignment>;

    /// Overwrite the order value of one assignment
    async fn set_assignment_order(&self, client_id: u32, user_id: u32, order: i32) -> DomainResult<ClientAssignment>;

    /// All assignments of a user, by stored order then client id
    async fn assignments_for_user(&self, user_id: u32) -> DomainResult<Vec<ClientAssignment>>;
}

#[async_trait]
impl ClientAssignmentOperations for super::client_repo::NodeClientRepository {
    async fn assign_client(&self, client_id: u32, user_id: u32, enable: bool) -> DomainResult<ClientAssignment> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        ensure_client(&tx, client_id)?;
        ensure_user(&tx, user_id)?;

        let existing: Option<u32> = tx
            .query_row(
                "SELECT client_id FROM client_users WHERE client_id = ? AND user_id = ?",
                params![client_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "client {} is already assigned to user {}",
                client_id, user_id
            )));
        }

        let order = next_order_for_user(&tx, user_id)?;
        tx.execute(
            "INSERT INTO client_users (client_id, user_id, enable, sort_order, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![client_id, user_id, enable, order, now_millis()],
        )?;
        tx.commit()?;

        Ok(ClientAssignment {
            client_id,
            user_id,
            enable,
            order,
        })
    }

    async fn unassign_client(&self, client_id: u32, user_id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let removed = conn.execute(
            "DELETE FROM client_users WHERE client_id = ? AND user_id = ?",
            params![client_id, user_id],
        )?;
        if removed == 0 {
            return Err(missing(client_id, user_id));
        }
        Ok(())
    }

    async fn set_assignment_enabled(&self, client_id: u32, user_id: u32, enable: bool) -> DomainResult<ClientAssignment> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE client_users SET enable = ?, updated_at = ? WHERE client_id = ? AND user_id = ?",
            params![enable, now_millis(), client_id, user_id],
        )?;
        if changed == 0 {
            return Err(missing(client_id, user_id));
        }

        load_one(conn, client_id, user_id)
    }

    async fn set_assignment_order(&self, client_id: u32, user_id: u32, order: i32) -> DomainResult<ClientAssignment> {
        if order < 0 {
            return Err(DomainError::Validation(format!("order must not be negative, got {}", order)));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE client_users SET sort_order = ?, updated_at = ? WHERE client_id = ? AND user_id = ?",
            params![order, now_millis(), client_id, user_id],
        )?;
        if changed == 0 {
            return Err(missing(client_id, user_id));
        }

        load_one(conn, client_id, user_id)
    }

    async fn assignments_for_user(&self, user_id: u32) -> DomainResult<Vec<ClientAssignment>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(
            "SELECT client_id, user_id, enable, sort_order FROM client_users
             WHERE user_id = ?
             ORDER BY sort_order, client_id",
        )?;
        let assignments = stmt
            .query_map(params![user_id], row_to_assignment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assignments)
    }
}

fn load_one(conn: &rusqlite::Connection, client_id: u32, user_id: u32) -> DomainResult<ClientAssignment> {
    let assignment = conn.query_row(
        "SELECT client_id, user_id, enable, sort_order FROM client_users WHERE client_id = ? AND user_id = ?",
        params![client_id, user_id],
        row_to_assignment,
    )?;
    Ok(assignment)
}

fn missing(client_id: u32, user_id: u32) -> DomainError {
    DomainError::NotFound(format!("client {} is not assigned to user {}", client_id, user_id))
}
