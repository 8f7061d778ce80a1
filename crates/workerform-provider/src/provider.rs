//! The provider contract driven by an orchestration layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of comparing persisted state with desired configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Whether anything needs to happen at all.
    pub changes: bool,
    /// Changed fields that force destroy-and-recreate.
    pub replaces: Vec<String>,
}

impl DiffResult {
    pub fn no_changes() -> Self {
        Self::default()
    }

    /// `replaces` alone already implies `changes`.
    pub fn new(replaces: Vec<String>, update: bool) -> Self {
        Self {
            changes: !replaces.is_empty() || update,
            replaces,
        }
    }

    pub fn requires_replace(&self) -> bool {
        !self.replaces.is_empty()
    }

    pub fn requires_update(&self) -> bool {
        self.changes && self.replaces.is_empty()
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResult<T> {
    /// Opaque id, meaningless to the remote platform.
    pub id: String,
    pub outs: T,
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult<T> {
    pub outs: T,
}

/// Lifecycle operations for one kind of remote resource.
///
/// Every call is independent: nothing is cached between calls, and the only
/// state carried over is what the caller persists from the returned `outs`.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Desired configuration.
    type Inputs: Send + Sync;
    /// Persisted state.
    type Outputs: Send + Sync;

    /// Creates the remote resource.
    async fn create(&self, inputs: &Self::Inputs) -> Result<CreateResult<Self::Outputs>>;

    /// Decides between no-op, in-place update and replacement.
    async fn diff(
        &self,
        id: &str,
        olds: &Self::Outputs,
        news: &Self::Inputs,
    ) -> Result<DiffResult>;

    /// Updates the remote resource in place.
    async fn update(
        &self,
        id: &str,
        olds: &Self::Outputs,
        news: &Self::Inputs,
    ) -> Result<UpdateResult<Self::Outputs>>;

    /// Deletes the remote resource.
    async fn delete(&self, id: &str, props: &Self::Outputs) -> Result<()>;
}

/// Names of identity fields whose values differ.
pub(crate) fn changed_fields(fields: &[(&str, &str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, old, new)| old != new)
        .map(|(name, _, _)| (*name).to_string())
        .collect()
}
