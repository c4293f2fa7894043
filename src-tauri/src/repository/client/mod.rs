//! Node Client Repository Module
//!
//! This module provides client repository functionality split into specialized sub-modules:
//! - client_repo: Core CRUD operations
//! - client_assignment: Client-User relationship operations
//! - client_ordering: Per-user order management

mod client_repo;
mod client_assignment;
mod client_ordering;

pub use client_repo::NodeClientRepository;
pub(crate) use client_repo::{list_clients_of_node, load_assignment_map};

// Re-export all operation traits so they can be used by importing NodeClientRepository
pub use client_assignment::ClientAssignmentOperations;
pub use client_ordering::ClientOrderingOperations;
