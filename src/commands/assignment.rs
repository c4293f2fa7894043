//! Assignment Commands
//!
//! Per-user enable flag and order, plus the bulk reorder.

use serde::Serialize;
use crate::models::ClientAssignment;
use crate::mutation::MutationError;
use super::call;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentArgs {
    client_id: u32,
    user_id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignArgs {
    client_id: u32,
    user_id: u32,
    enable: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetEnabledArgs {
    client_id: u32,
    user_id: u32,
    enable: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetOrderArgs {
    client_id: u32,
    user_id: u32,
    order: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkSetOrderArgs<'a> {
    user_id: u32,
    ordered_client_ids: &'a [u32],
}

pub async fn assign_client(client_id: u32, user_id: u32, enable: bool) -> Result<ClientAssignment, MutationError> {
    call("assign_client", &AssignArgs { client_id, user_id, enable: Some(enable) }).await
}

pub async fn unassign_client(client_id: u32, user_id: u32) -> Result<(), MutationError> {
    call("unassign_client", &AssignmentArgs { client_id, user_id }).await
}

pub async fn set_assignment_enabled(client_id: u32, user_id: u32, enable: bool) -> Result<ClientAssignment, MutationError> {
    call("set_assignment_enabled", &SetEnabledArgs { client_id, user_id, enable }).await
}

pub async fn set_assignment_order(client_id: u32, user_id: u32, order: i32) -> Result<ClientAssignment, MutationError> {
    call("set_assignment_order", &SetOrderArgs { client_id, user_id, order }).await
}

/// Commit a whole new order for one user; nothing changes unless this succeeds
pub async fn bulk_set_order(user_id: u32, ordered_client_ids: &[u32]) -> Result<Vec<ClientAssignment>, MutationError> {
    call("bulk_set_order", &BulkSetOrderArgs { user_id, ordered_client_ids }).await
}
