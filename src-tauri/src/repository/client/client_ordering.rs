//! Client Ordering Operations
//!
//! Per-user order management. Orders of different users over the same client
//! are independent, so every statement here is scoped by `user_id`.

use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::domain::{dense_orders, validate_permutation, ClientAssignment, DomainResult};
use super::super::db::{not_initialized, now_millis};
use super::client_repo::{ensure_user, row_to_assignment};

/// Trait for client ordering operations
#[async_trait]
pub trait ClientOrderingOperations {
    /// Rewrite the order of every client assigned to `user_id`.
    ///
    /// `ordered_client_ids` must be a permutation of the user's current
    /// clients. On success each client's order equals its index in the list;
    /// on any error nothing is written.
    async fn bulk_set_order(&self, user_id: u32, ordered_client_ids: &[u32]) -> DomainResult<Vec<ClientAssignment>>;
}

#[async_trait]
impl ClientOrderingOperations for super::client_repo::NodeClientRepository {
    async fn bulk_set_order(&self, user_id: u32, ordered_client_ids: &[u32]) -> DomainResult<Vec<ClientAssignment>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        ensure_user(&tx, user_id)?;

        let current: Vec<u32> = {
            let mut stmt = tx.prepare("SELECT client_id FROM client_users WHERE user_id = ?")?;
            let ids = stmt
                .query_map(params![user_id], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };

        if let Err(e) = validate_permutation(&current, ordered_client_ids) {
            log::warn!("rejected reorder for user {}: {}", user_id, e);
            return Err(e);
        }

        let now = now_millis();
        for (client_id, order) in dense_orders(ordered_client_ids) {
            tx.execute(
                "UPDATE client_users SET sort_order = ?, updated_at = ? WHERE client_id = ? AND user_id = ?",
                params![order, now, client_id, user_id],
            )?;
        }

        let committed = {
            let mut stmt = tx.prepare(
                "SELECT client_id, user_id, enable, sort_order FROM client_users
                 WHERE user_id = ?
                 ORDER BY sort_order",
            )?;
            let rows = stmt
                .query_map(params![user_id], row_to_assignment)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        tx.commit()?;

        log::info!("committed order of {} clients for user {}", committed.len(), user_id);
        Ok(committed)
    }
}

/// Order value for a newly assigned client: one past the user's current maximum
pub(super) fn next_order_for_user(conn: &Connection, user_id: u32) -> DomainResult<i32> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM client_users WHERE user_id = ?",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(next)
}
