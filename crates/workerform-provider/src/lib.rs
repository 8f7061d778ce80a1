//! # workerform-provider
//!
//! Reconciliation for worker scripts and their queue consumers.
//!
//! Each resource kind implements [`ResourceProvider`]: the caller hands in the
//! state persisted after the last successful apply ("olds") together with the
//! desired configuration ("news") and gets back either a [`DiffResult`] or a
//! fresh state to persist. Providers never mutate persisted state themselves.
//!
//! ## Example
//!
//! ```ignore
//! use workerform_cloudflare::CloudflareClient;
//! use workerform_provider::{ResourceProvider, ScriptProvider};
//!
//! let provider = ScriptProvider::new(CloudflareClient::new(token));
//! let diff = provider.diff(&id, &persisted, &desired).await?;
//! if diff.changes && diff.replaces.is_empty() {
//!     let updated = provider.update(&id, &persisted, &desired).await?;
//! }
//! ```

mod error;
mod provider;
pub mod queue_consumer;
pub mod script;

pub use error::{ErrorCategory, ProviderError, Result};
pub use provider::{CreateResult, DiffResult, ResourceProvider, UpdateResult};
pub use queue_consumer::{QueueConsumerArgs, QueueConsumerProvider, QueueConsumerState};
pub use script::{ScriptArgs, ScriptProvider, ScriptState};
