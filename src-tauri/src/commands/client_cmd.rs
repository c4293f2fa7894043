//! Tauri Commands for Node Client operations

use tauri::State;
use crate::domain::{DomainError, DomainResult, NodeClient};
use crate::repository::Repository;
use crate::AppState;

/// Create a client on a node, optionally assigned to a user right away
#[tauri::command]
pub async fn create_node_client(
    state: State<'_, AppState>,
    node_id: u32,
    name: String,
    user_id: Option<u32>,
    enable: Option<bool>,
) -> DomainResult<NodeClient> {
    let client = NodeClient::new(0, node_id, name);
    match user_id {
        Some(uid) => state.clients.create_for_user(&client, uid, enable.unwrap_or(true)).await,
        None => state.clients.create(&client).await,
    }
}

/// Rename a client or move it to another node
#[tauri::command]
pub async fn update_node_client(
    state: State<'_, AppState>,
    id: u32,
    node_id: Option<u32>,
    name: Option<String>,
) -> DomainResult<NodeClient> {
    let existing = state
        .clients
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Client {} not found", id)))?;

    let updated = NodeClient {
        id: existing.id,
        node_id: node_id.unwrap_or(existing.node_id),
        name: name.unwrap_or(existing.name),
        users: existing.users,
    };

    state.clients.update(&updated).await
}

/// Delete a client and its assignments for every user
#[tauri::command]
pub async fn delete_node_client(state: State<'_, AppState>, id: u32) -> DomainResult<()> {
    state.clients.delete(id).await.map_err(|e| {
        log::error!("delete client {} failed: {}", id, e);
        e
    })
}

/// Clients assigned to a user, each with every user's assignment
#[tauri::command]
pub async fn list_user_node_clients(
    state: State<'_, AppState>,
    user_id: u32,
) -> DomainResult<Vec<NodeClient>> {
    state.clients.list_for_user(user_id).await
}
