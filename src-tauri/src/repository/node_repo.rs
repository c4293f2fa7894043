//! Node Repository
//!
//! SQLite-backed implementation for Node CRUD operations.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Node, NodeWithClients};
use super::client::{list_clients_of_node, load_assignment_map};
use super::db::{inserted_id, not_initialized, now_millis, SharedConnection};
use super::traits::Repository;

/// SQLite implementation of Node repository
pub struct NodeRepository {
    conn: SharedConnection,
}

impl NodeRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Every node with its clients and their assignments, sorted by pinyin of the name
    pub async fn list_with_clients(&self) -> DomainResult<Vec<NodeWithClients>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let nodes = select_nodes(conn)?;
        let mut assignments = load_assignment_map(conn)?;

        let mut stmt = conn.prepare("SELECT id, node_id, name FROM node_clients ORDER BY id")?;
        let clients = stmt
            .query_map([], |row| {
                Ok(crate::domain::NodeClient::new(row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut result: Vec<NodeWithClients> = nodes
            .into_iter()
            .map(|node| NodeWithClients { node, items: Vec::new() })
            .collect();

        for mut client in clients {
            client.users = assignments.remove(&client.id).unwrap_or_default();
            if let Some(entry) = result.iter_mut().find(|n| n.node.id == client.node_id) {
                entry.items.push(client);
            }
        }

        Ok(result)
    }

    /// A single node with its clients
    pub async fn find_with_clients(&self, id: u32) -> DomainResult<Option<NodeWithClients>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let node = conn
            .query_row("SELECT id, name, address FROM nodes WHERE id = ?", params![id], row_to_node)
            .optional()?;
        match node {
            Some(node) => {
                let items = list_clients_of_node(conn, node.id)?;
                Ok(Some(NodeWithClients { node, items }))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Repository<Node> for NodeRepository {
    async fn create(&self, entity: &Node) -> DomainResult<Node> {
        let name = validate_name(&entity.name)?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO nodes (name, address, updated_at) VALUES (?, ?, ?)",
            params![name, entity.address, now_millis()],
        )?;

        let mut node = entity.clone();
        node.id = inserted_id(conn)?;
        node.name = name;
        Ok(node)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Node>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let node = conn
            .query_row("SELECT id, name, address FROM nodes WHERE id = ?", params![id], row_to_node)
            .optional()?;
        Ok(node)
    }

    async fn list(&self) -> DomainResult<Vec<Node>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        select_nodes(conn)
    }

    async fn update(&self, entity: &Node) -> DomainResult<Node> {
        let name = validate_name(&entity.name)?;

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE nodes SET name = ?, address = ?, updated_at = ? WHERE id = ?",
            params![name, entity.address, now_millis(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Node {} not found", entity.id)));
        }

        let mut node = entity.clone();
        node.name = name;
        Ok(node)
    }

    /// Deletes the node, its clients and all of their assignments atomically
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;
        let dropped = tx.execute(
            "DELETE FROM client_users WHERE client_id IN (SELECT id FROM node_clients WHERE node_id = ?)",
            params![id],
        )?;
        let clients = tx.execute("DELETE FROM node_clients WHERE node_id = ?", params![id])?;
        let removed = tx.execute("DELETE FROM nodes WHERE id = ?", params![id])?;
        if removed == 0 {
            return Err(DomainError::NotFound(format!("Node {} not found", id)));
        }
        tx.commit()?;

        log::info!("deleted node {} with {} clients and {} assignments", id, clients, dropped);
        Ok(())
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("node name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<Node> {
    Ok(Node {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn select_nodes(conn: &rusqlite::Connection) -> DomainResult<Vec<Node>> {
    let mut stmt = conn.prepare("SELECT id, name, address FROM nodes")?;
    let mut nodes = stmt
        .query_map([], row_to_node)?
        .collect::<Result<Vec<_>, _>>()?;

    // Chinese names sort by pinyin
    nodes.sort_by_cached_key(|node| (pinyin_key(&node.name), node.id));
    Ok(nodes)
}

/// Lowercased sort key with Chinese characters replaced by their plain pinyin
pub(crate) fn pinyin_key(name: &str) -> String {
    use pinyin::ToPinyin;

    name.chars()
        .map(|c| match c.to_pinyin() {
            Some(p) => p.plain().to_string(),
            None => c.to_lowercase().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinyin_key() {
        assert_eq!(pinyin_key("北京"), "beijing");
        assert_eq!(pinyin_key("Tokyo-1"), "tokyo-1");
        assert!(pinyin_key("上海") < pinyin_key("香港"));
    }
}
