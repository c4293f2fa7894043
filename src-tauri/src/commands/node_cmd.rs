//! Tauri Commands for Node operations
//!
//! Exposes Node CRUD to the frontend via Tauri IPC.

use tauri::State;
use crate::domain::{DomainError, DomainResult, Node, NodeWithClients};
use crate::repository::Repository;
use crate::AppState;

/// Create a new node
#[tauri::command]
pub async fn create_node(
    state: State<'_, AppState>,
    name: String,
    address: Option<String>,
) -> DomainResult<Node> {
    let node = match address {
        Some(addr) if !addr.trim().is_empty() => Node::with_address(0, name, addr.trim().to_string()),
        _ => Node::new(0, name),
    };
    let created = state.nodes.create(&node).await?;
    log::info!("created node {} ({})", created.id, created.name);
    Ok(created)
}

/// List all nodes with their clients
#[tauri::command]
pub async fn list_nodes(state: State<'_, AppState>) -> DomainResult<Vec<NodeWithClients>> {
    state.nodes.list_with_clients().await
}

/// Get node by ID
#[tauri::command]
pub async fn get_node(state: State<'_, AppState>, id: u32) -> DomainResult<Option<NodeWithClients>> {
    state.nodes.find_with_clients(id).await
}

/// Update node
#[tauri::command]
pub async fn update_node(
    state: State<'_, AppState>,
    id: u32,
    name: Option<String>,
    address: Option<String>,
) -> DomainResult<Node> {
    let existing = state
        .nodes
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Node {} not found", id)))?;

    // An empty address clears it
    let address = match address {
        Some(addr) if addr.trim().is_empty() => None,
        Some(addr) => Some(addr.trim().to_string()),
        None => existing.address,
    };

    let updated = Node {
        id: existing.id,
        name: name.unwrap_or(existing.name),
        address,
    };

    state.nodes.update(&updated).await
}

/// Delete node together with its clients
#[tauri::command]
pub async fn delete_node(state: State<'_, AppState>, id: u32) -> DomainResult<()> {
    state.nodes.delete(id).await.map_err(|e| {
        log::error!("delete node {} failed: {}", id, e);
        e
    })
}
