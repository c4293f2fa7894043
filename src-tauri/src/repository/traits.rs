//! Repository Layer - Core Traits
//!
//! CRUD interface shared by the node, node client and user repositories.
//! Assignment and ordering operations live in their own traits under `client`.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// CRUD over one entity table
///
/// Every method takes the shared connection lock for its whole duration, so
/// multi-row writes (cascading deletes, client creation with an assignment)
/// are atomic to other callers.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Insert `entity`, ignoring its id, and return it with the stored id.
    /// Blank names are rejected with `Validation`.
    async fn create(&self, entity: &T) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// All rows; nodes come back in pinyin order of their names
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Overwrite the stored row; `NotFound` if the id does not exist
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Remove the row and everything that references it
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}
