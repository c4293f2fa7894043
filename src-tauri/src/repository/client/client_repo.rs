//! Node Client Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for NodeClient CRUD operations.
//! Specialized operations are in separate modules:
//! - client_assignment: per-user enable flag and order
//! - client_ordering: bulk per-user reorder

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

use crate::domain::{ClientAssignment, DomainError, DomainResult, NodeClient};
use super::super::db::{inserted_id, not_initialized, now_millis, SharedConnection};
use super::super::traits::Repository;
use super::client_ordering::next_order_for_user;

/// SQLite implementation of NodeClient repository
pub struct NodeClientRepository {
    pub(super) conn: SharedConnection,
}

impl NodeClientRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Create a client and assign it to `user_id` in one transaction.
    ///
    /// The assignment is appended after the user's existing clients.
    pub async fn create_for_user(&self, entity: &NodeClient, user_id: u32, enable: bool) -> DomainResult<NodeClient> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        ensure_user(&tx, user_id)?;
        let mut client = insert_client(&tx, entity)?;
        let order = next_order_for_user(&tx, user_id)?;
        tx.execute(
            "INSERT INTO client_users (client_id, user_id, enable, sort_order, updated_at) VALUES (?, ?, ?, ?, ?)",
            params![client.id, user_id, enable, order, now_millis()],
        )?;
        tx.commit()?;

        client.users.push(ClientAssignment {
            client_id: client.id,
            user_id,
            enable,
            order,
        });
        log::info!("created client {} for user {} at order {}", client.id, user_id, order);
        Ok(client)
    }

    /// Clients assigned to `user_id`, each with its full assignment list.
    ///
    /// Returned in ascending client id; the per-user display order is
    /// derived by the caller.
    pub async fn list_for_user(&self, user_id: u32) -> DomainResult<Vec<NodeClient>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.node_id, c.name FROM node_clients c
             JOIN client_users cu ON cu.client_id = c.id
             WHERE cu.user_id = ?
             ORDER BY c.id",
        )?;
        let mut clients = stmt
            .query_map(params![user_id], row_to_client)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut assignments = load_assignment_map(conn)?;
        for client in clients.iter_mut() {
            client.users = assignments.remove(&client.id).unwrap_or_default();
        }
        Ok(clients)
    }
}

#[async_trait]
impl Repository<NodeClient> for NodeClientRepository {
    async fn create(&self, entity: &NodeClient) -> DomainResult<NodeClient> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        insert_client(conn, entity)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<NodeClient>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let client = conn
            .query_row(
                "SELECT id, node_id, name FROM node_clients WHERE id = ?",
                params![id],
                row_to_client,
            )
            .optional()?;

        match client {
            Some(mut client) => {
                client.users = load_assignments(conn, client.id)?;
                Ok(Some(client))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<NodeClient>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, node_id, name FROM node_clients ORDER BY id")?;
        let mut clients = stmt
            .query_map([], row_to_client)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut assignments = load_assignment_map(conn)?;
        for client in clients.iter_mut() {
            client.users = assignments.remove(&client.id).unwrap_or_default();
        }
        Ok(clients)
    }

    /// Updates name and hosting node; assignments are left alone
    async fn update(&self, entity: &NodeClient) -> DomainResult<NodeClient> {
        let name = entity.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("client name must not be empty".into()));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        ensure_node(conn, entity.node_id)?;
        let changed = conn.execute(
            "UPDATE node_clients SET node_id = ?, name = ?, updated_at = ? WHERE id = ?",
            params![entity.node_id, name, now_millis(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Client {} not found", entity.id)));
        }

        let mut client = NodeClient::new(entity.id, entity.node_id, name.to_string());
        client.users = load_assignments(conn, entity.id)?;
        Ok(client)
    }

    /// Removes the client and its assignment rows for every user.
    ///
    /// Other clients keep their order values; gaps close on the next reorder.
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let dropped = tx.execute("DELETE FROM client_users WHERE client_id = ?", params![id])?;
        let removed = tx.execute("DELETE FROM node_clients WHERE id = ?", params![id])?;
        if removed == 0 {
            return Err(DomainError::NotFound(format!("Client {} not found", id)));
        }
        tx.commit()?;

        log::info!("deleted client {} and {} assignments", id, dropped);
        Ok(())
    }
}

fn insert_client(conn: &Connection, entity: &NodeClient) -> DomainResult<NodeClient> {
    let name = entity.name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("client name must not be empty".into()));
    }
    ensure_node(conn, entity.node_id)?;

    conn.execute(
        "INSERT INTO node_clients (node_id, name, updated_at) VALUES (?, ?, ?)",
        params![entity.node_id, name, now_millis()],
    )?;

    Ok(NodeClient::new(inserted_id(conn)?, entity.node_id, name.to_string()))
}

pub(crate) fn ensure_node(conn: &Connection, node_id: u32) -> DomainResult<()> {
    let found: Option<u32> = conn
        .query_row("SELECT id FROM nodes WHERE id = ?", params![node_id], |row| row.get(0))
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| DomainError::NotFound(format!("Node {} not found", node_id)))
}

pub(super) fn ensure_user(conn: &Connection, user_id: u32) -> DomainResult<()> {
    let found: Option<u32> = conn
        .query_row("SELECT id FROM users WHERE id = ?", params![user_id], |row| row.get(0))
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| DomainError::NotFound(format!("User {} not found", user_id)))
}

pub(super) fn ensure_client(conn: &Connection, client_id: u32) -> DomainResult<()> {
    let found: Option<u32> = conn
        .query_row("SELECT id FROM node_clients WHERE id = ?", params![client_id], |row| row.get(0))
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| DomainError::NotFound(format!("Client {} not found", client_id)))
}

/// Clients of one node with their assignments
pub(crate) fn list_clients_of_node(conn: &Connection, node_id: u32) -> DomainResult<Vec<NodeClient>> {
    let mut stmt = conn.prepare("SELECT id, node_id, name FROM node_clients WHERE node_id = ? ORDER BY id")?;
    let mut clients = stmt
        .query_map(params![node_id], row_to_client)?
        .collect::<Result<Vec<_>, _>>()?;

    for client in clients.iter_mut() {
        client.users = load_assignments(conn, client.id)?;
    }
    Ok(clients)
}

fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<NodeClient> {
    Ok(NodeClient::new(row.get(0)?, row.get(1)?, row.get(2)?))
}

pub(super) fn row_to_assignment(row: &rusqlite::Row) -> rusqlite::Result<ClientAssignment> {
    Ok(ClientAssignment {
        client_id: row.get(0)?,
        user_id: row.get(1)?,
        enable: row.get(2)?,
        order: row.get(3)?,
    })
}

fn load_assignments(conn: &Connection, client_id: u32) -> DomainResult<Vec<ClientAssignment>> {
    let mut stmt = conn.prepare(
        "SELECT client_id, user_id, enable, sort_order FROM client_users WHERE client_id = ? ORDER BY user_id",
    )?;
    let assignments = stmt
        .query_map(params![client_id], row_to_assignment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assignments)
}

/// Every assignment row grouped by client id
pub(crate) fn load_assignment_map(conn: &Connection) -> DomainResult<HashMap<u32, Vec<ClientAssignment>>> {
    let mut stmt = conn.prepare(
        "SELECT client_id, user_id, enable, sort_order FROM client_users ORDER BY client_id, user_id",
    )?;
    let mut map: HashMap<u32, Vec<ClientAssignment>> = HashMap::new();
    for assignment in stmt.query_map([], row_to_assignment)? {
        let assignment = assignment?;
        map.entry(assignment.client_id).or_default().push(assignment);
    }
    Ok(map)
}
