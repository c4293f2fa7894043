//! Node Client Entity
//!
//! A client hosted on a node. Clients are assigned to users; every
//! (client, user) pair carries its own enable flag and display order.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A node client and its per-user assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeClient {
    /// Unique identifier
    pub id: u32,
    /// Hosting node
    pub node_id: u32,
    /// Display name
    pub name: String,
    /// One entry per assigned user
    #[serde(default)]
    pub users: Vec<ClientAssignment>,
}

impl NodeClient {
    pub fn new(id: u32, node_id: u32, name: String) -> Self {
        Self {
            id,
            node_id,
            name,
            users: Vec::new(),
        }
    }

    /// The assignment of this client to `user_id`, if any
    pub fn assignment_for(&self, user_id: u32) -> Option<&ClientAssignment> {
        self.users.iter().find(|a| a.user_id == user_id)
    }
}

impl Entity for NodeClient {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Join row between a client and a user
///
/// Identity is `(client_id, user_id)`. `order` is only meaningful relative to
/// the other assignments of the same user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAssignment {
    pub client_id: u32,
    pub user_id: u32,
    pub enable: bool,
    pub order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_lookup() {
        let mut client = NodeClient::new(7, 1, "relay".to_string());
        client.users.push(ClientAssignment { client_id: 7, user_id: 2, enable: true, order: 3 });
        client.users.push(ClientAssignment { client_id: 7, user_id: 5, enable: false, order: 0 });

        assert_eq!(client.assignment_for(5).map(|a| a.order), Some(0));
        assert!(client.assignment_for(9).is_none());
    }
}
