//! Node Client Commands

use serde::Serialize;
use crate::models::NodeClient;
use crate::mutation::MutationError;
use super::{call, IdArgs};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeClientArgs<'a> {
    pub node_id: u32,
    pub name: &'a str,
    pub user_id: Option<u32>,
    pub enable: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeClientArgs<'a> {
    pub id: u32,
    pub node_id: Option<u32>,
    pub name: Option<&'a str>,
}

pub async fn create_node_client(args: &CreateNodeClientArgs<'_>) -> Result<NodeClient, MutationError> {
    call("create_node_client", args).await
}

pub async fn update_node_client(args: &UpdateNodeClientArgs<'_>) -> Result<NodeClient, MutationError> {
    call("update_node_client", args).await
}

pub async fn delete_node_client(id: u32) -> Result<(), MutationError> {
    call("delete_node_client", &IdArgs { id }).await
}
