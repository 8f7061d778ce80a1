//! Queue consumers attached to a worker script.
//!
//! The consumer id is assigned by the platform on creation and is the only
//! handle for later updates and deletes, so it is carried in the persisted
//! state for the lifetime of the resource.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use workerform_cloudflare::{CloudflareClient, ConsumerParams, ConsumerSettings};
use workerform_core::{canonical_json, generate_id};

use crate::error::{ProviderError, Result};
use crate::provider::{
    CreateResult, DiffResult, ResourceProvider, UpdateResult, changed_fields,
};

/// Desired configuration of a queue consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueConsumerArgs {
    pub account_id: String,
    pub queue_id: String,
    pub script_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_queue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consumer_concurrency: Option<u32>,
}

impl QueueConsumerArgs {
    pub fn new(
        account_id: impl Into<String>,
        queue_id: impl Into<String>,
        script_name: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            queue_id: queue_id.into(),
            script_name: script_name.into(),
            dead_letter_queue: None,
            batch_size: None,
            max_retries: None,
            max_wait_time_ms: None,
            retry_delay: None,
            max_consumer_concurrency: None,
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("accountId", &self.account_id),
            ("queueId", &self.queue_id),
            ("scriptName", &self.script_name),
        ] {
            if value.is_empty() {
                return Err(ProviderError::validation(format!("empty {field} provided")));
            }
        }
        Ok(())
    }

    /// Request body for create and update.
    pub fn params(&self) -> ConsumerParams {
        ConsumerParams::worker(
            self.script_name.clone(),
            self.dead_letter_queue.clone(),
            ConsumerSettings::from_parts(
                self.batch_size,
                self.max_retries,
                self.max_wait_time_ms,
                self.retry_delay,
                self.max_consumer_concurrency,
            ),
        )
    }
}

/// Persisted queue consumer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueConsumerState {
    #[serde(flatten)]
    pub args: QueueConsumerArgs,
    pub consumer_id: String,
}

/// Provider for queue consumers.
#[derive(Debug, Clone)]
pub struct QueueConsumerProvider {
    client: CloudflareClient,
}

impl QueueConsumerProvider {
    pub fn new(client: CloudflareClient) -> Self {
        Self { client }
    }

    /// Pure comparison; the consumer id never counts as a change.
    pub fn diff_state(olds: &QueueConsumerState, news: &QueueConsumerArgs) -> Result<DiffResult> {
        let replaces = changed_fields(&[
            ("accountId", olds.args.account_id.as_str(), news.account_id.as_str()),
            ("queueId", olds.args.queue_id.as_str(), news.queue_id.as_str()),
        ]);
        let update = canonical_json(&olds.args)? != canonical_json(news)?;
        Ok(DiffResult::new(replaces, update))
    }
}

#[async_trait]
impl ResourceProvider for QueueConsumerProvider {
    type Inputs = QueueConsumerArgs;
    type Outputs = QueueConsumerState;

    async fn create(&self, inputs: &QueueConsumerArgs) -> Result<CreateResult<QueueConsumerState>> {
        inputs.validate()?;
        let consumer_id = self
            .client
            .create_queue_consumer(&inputs.account_id, &inputs.queue_id, &inputs.params())
            .await?;

        Ok(CreateResult {
            id: generate_id(),
            outs: QueueConsumerState {
                args: inputs.clone(),
                consumer_id,
            },
        })
    }

    async fn diff(
        &self,
        _id: &str,
        olds: &QueueConsumerState,
        news: &QueueConsumerArgs,
    ) -> Result<DiffResult> {
        let diff = Self::diff_state(olds, news)?;
        tracing::debug!(
            queue_id = %news.queue_id,
            consumer_id = %olds.consumer_id,
            changes = diff.changes,
            replaces = ?diff.replaces,
            "Diffed queue consumer"
        );
        Ok(diff)
    }

    async fn update(
        &self,
        _id: &str,
        olds: &QueueConsumerState,
        news: &QueueConsumerArgs,
    ) -> Result<UpdateResult<QueueConsumerState>> {
        news.validate()?;
        self.client
            .update_queue_consumer(
                &news.account_id,
                &news.queue_id,
                &olds.consumer_id,
                &news.params(),
            )
            .await?;

        Ok(UpdateResult {
            outs: QueueConsumerState {
                args: news.clone(),
                consumer_id: olds.consumer_id.clone(),
            },
        })
    }

    async fn delete(&self, _id: &str, props: &QueueConsumerState) -> Result<()> {
        self.client
            .delete_queue_consumer(
                &props.args.account_id,
                &props.args.queue_id,
                &props.consumer_id,
            )
            .await?;
        Ok(())
    }
}
