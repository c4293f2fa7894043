//! Node Commands
//!
//! Frontend bindings for node-related backend commands.

use serde::Serialize;
use crate::models::{Node, NodeWithClients};
use crate::mutation::MutationError;
use super::{call, IdArgs, NoArgs};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
pub struct CreateNodeArgs<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
}

#[derive(Serialize)]
pub struct UpdateNodeArgs<'a> {
    pub id: u32,
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
}

// ========================
// Commands
// ========================

pub async fn list_nodes() -> Result<Vec<NodeWithClients>, MutationError> {
    call("list_nodes", &NoArgs {}).await
}

pub async fn create_node(args: &CreateNodeArgs<'_>) -> Result<Node, MutationError> {
    call("create_node", args).await
}

pub async fn update_node(args: &UpdateNodeArgs<'_>) -> Result<Node, MutationError> {
    call("update_node", args).await
}

pub async fn delete_node(id: u32) -> Result<(), MutationError> {
    call("delete_node", &IdArgs { id }).await
}
