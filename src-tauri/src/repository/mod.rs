//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod node_repo;
mod user_repo;
pub mod client;

#[cfg(test)]
mod tests;

pub use traits::Repository;
pub use db::{init_db, DbState, SharedConnection};
pub use node_repo::NodeRepository;
pub use user_repo::UserRepository;
pub use client::{NodeClientRepository, ClientAssignmentOperations, ClientOrderingOperations};
