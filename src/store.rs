//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use crate::models::{ClientAssignment, Node, NodeClient, NodeWithClients, User};
use crate::projection;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// All nodes, each with its clients and their assignments
    pub nodes: Vec<NodeWithClients>,
    /// All users
    pub users: Vec<User>,
    /// User whose node client table is shown
    pub selected_user: Option<u32>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Every client across all nodes, in node order
pub fn all_clients(nodes: &[NodeWithClients]) -> Vec<NodeClient> {
    nodes.iter().flat_map(|n| n.items.iter().cloned()).collect()
}

// ========================
// Store Helper Functions
// ========================

/// Replace a node's own fields, keeping its clients
pub fn store_update_node(store: &AppStore, updated: Node) {
    if let Some(entry) = store.nodes().write().iter_mut().find(|n| n.node.id == updated.id) {
        entry.node = updated;
    }
}

/// Remove a node (and with it, its clients) by ID
pub fn store_remove_node(store: &AppStore, node_id: u32) {
    store.nodes().write().retain(|n| n.node.id != node_id);
}

/// Remove a client from whichever node holds it
pub fn store_remove_client(store: &AppStore, client_id: u32) {
    for node in store.nodes().write().iter_mut() {
        node.items.retain(|c| c.id != client_id);
    }
}

/// Write an acknowledged reorder back into the cached clients
pub fn store_apply_committed(store: &AppStore, committed: &[ClientAssignment]) {
    for node in store.nodes().write().iter_mut() {
        projection::apply_committed(&mut node.items, committed);
    }
}

/// Remove a user and drop their assignments from the cache
pub fn store_remove_user(store: &AppStore, user_id: u32) {
    store.users().write().retain(|u| u.id != user_id);
    for node in store.nodes().write().iter_mut() {
        for client in node.items.iter_mut() {
            client.users.retain(|a| a.user_id != user_id);
        }
    }
    if store.selected_user().get_untracked() == Some(user_id) {
        store.selected_user().set(None);
    }
}
