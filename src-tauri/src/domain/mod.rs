//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde for serialization).

mod entity;
mod node;
mod client;
mod user;
mod assignment;

pub use entity::{Entity, DomainError, DomainResult};
pub use node::{Node, NodeWithClients};
pub use client::{NodeClient, ClientAssignment};
pub use user::User;
pub use assignment::{validate_permutation, dense_orders};
