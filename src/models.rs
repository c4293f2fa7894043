//! Frontend Models
//!
//! Data structures matching backend entities.

use serde::{Deserialize, Serialize};

/// Node data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: u32,
    pub name: String,
    pub address: Option<String>,
}

/// Node with its clients, as returned by `list_nodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithClients {
    #[serde(flatten)]
    pub node: Node,
    pub items: Vec<NodeClient>,
}

/// Node client with every user's assignment (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeClient {
    pub id: u32,
    pub node_id: u32,
    pub name: String,
    #[serde(default)]
    pub users: Vec<ClientAssignment>,
}

impl NodeClient {
    pub fn assignment_for(&self, user_id: u32) -> Option<&ClientAssignment> {
        self.users.iter().find(|a| a.user_id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAssignment {
    pub client_id: u32,
    pub user_id: u32,
    pub enable: bool,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
}

/// Settings served by `get_console_config`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub mutation_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mutation_timeout_ms: 15_000,
        }
    }
}
