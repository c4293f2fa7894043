//! Node Entity
//!
//! A node hosts any number of node clients.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::client::NodeClient;

/// A managed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Optional host address (e.g. "10.0.0.5:7000")
    pub address: Option<String>,
}

impl Node {
    pub fn new(id: u32, name: String) -> Self {
        Self {
            id,
            name,
            address: None,
        }
    }

    pub fn with_address(id: u32, name: String, address: String) -> Self {
        Self {
            id,
            name,
            address: Some(address),
        }
    }
}

impl Entity for Node {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// A node together with the clients it hosts, as listed by the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithClients {
    #[serde(flatten)]
    pub node: Node,
    pub items: Vec<NodeClient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1, "edge-1".to_string());
        assert_eq!(node.id(), 1);
        assert!(node.address.is_none());
    }

    #[test]
    fn test_node_with_clients_flattens() {
        let entry = NodeWithClients {
            node: Node::with_address(4, "hk".to_string(), "10.0.0.4".to_string()),
            items: Vec::new(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "hk");
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
