//! Tauri Commands for client-user assignments
//!
//! Single-row edits plus the atomic bulk reorder.

use tauri::State;
use crate::domain::{ClientAssignment, DomainResult};
use crate::repository::{ClientAssignmentOperations, ClientOrderingOperations};
use crate::AppState;

/// Assign a client to a user
#[tauri::command]
pub async fn assign_client(
    state: State<'_, AppState>,
    client_id: u32,
    user_id: u32,
    enable: Option<bool>,
) -> DomainResult<ClientAssignment> {
    state.clients.assign_client(client_id, user_id, enable.unwrap_or(true)).await
}

/// Remove a client from a user
#[tauri::command]
pub async fn unassign_client(
    state: State<'_, AppState>,
    client_id: u32,
    user_id: u32,
) -> DomainResult<()> {
    state.clients.unassign_client(client_id, user_id).await
}

/// Enable or disable a client for one user
#[tauri::command]
pub async fn set_assignment_enabled(
    state: State<'_, AppState>,
    client_id: u32,
    user_id: u32,
    enable: bool,
) -> DomainResult<ClientAssignment> {
    state.clients.set_assignment_enabled(client_id, user_id, enable).await
}

/// Set the order of one client for one user
#[tauri::command]
pub async fn set_assignment_order(
    state: State<'_, AppState>,
    client_id: u32,
    user_id: u32,
    order: i32,
) -> DomainResult<ClientAssignment> {
    state.clients.set_assignment_order(client_id, user_id, order).await
}

/// Replace a user's whole client order
#[tauri::command]
pub async fn bulk_set_order(
    state: State<'_, AppState>,
    user_id: u32,
    ordered_client_ids: Vec<u32>,
) -> DomainResult<Vec<ClientAssignment>> {
    log::info!("reorder requested for user {}: {:?}", user_id, ordered_client_ids);
    state.clients.bulk_set_order(user_id, &ordered_client_ids).await
}
