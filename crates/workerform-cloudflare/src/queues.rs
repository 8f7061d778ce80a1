//! Queue consumer endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::CloudflareClient;
use crate::error::ApiError;

/// Request body shared by consumer creation and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerParams {
    #[serde(rename = "type")]
    pub consumer_type: &'static str,
    pub script_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_queue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ConsumerSettings>,
}

impl ConsumerParams {
    pub fn worker(
        script_name: impl Into<String>,
        dead_letter_queue: Option<String>,
        settings: Option<ConsumerSettings>,
    ) -> Self {
        Self {
            consumer_type: "worker",
            script_name: script_name.into(),
            dead_letter_queue,
            settings,
        }
    }
}

/// Consumer tuning. Only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsumerSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<u32>,
}

impl ConsumerSettings {
    /// `Some` only when at least one field is set.
    ///
    /// The API treats a missing `settings` object as "use the queue defaults",
    /// which is not the same as sending explicit zero values.
    pub fn from_parts(
        batch_size: Option<u32>,
        max_retries: Option<u32>,
        max_wait_time_ms: Option<u64>,
        retry_delay: Option<u32>,
        max_concurrency: Option<u32>,
    ) -> Option<Self> {
        let settings = Self {
            batch_size,
            max_retries,
            max_wait_time_ms,
            retry_delay,
            max_concurrency,
        };
        (settings != Self::default()).then_some(settings)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedConsumer {
    consumer_id: Option<serde_json::Value>,
}

/// Pull `result.consumer_id` out of a creation response.
fn decode_consumer_id(body: &str) -> Result<String, ApiError> {
    let envelope: Envelope<CreatedConsumer> = serde_json::from_str(body)
        .map_err(|e| ApiError::decode(format!("invalid consumer response: {e}")))?;
    let created = envelope
        .result
        .ok_or_else(|| ApiError::decode("consumer response has no result"))?;

    match created.consumer_id {
        Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(id),
        Some(serde_json::Value::String(_)) => Err(ApiError::decode("consumer_id is empty")),
        Some(other) => Err(ApiError::decode(format!(
            "consumer_id is not a string: {other}"
        ))),
        None => Err(ApiError::decode("consumer_id is missing")),
    }
}

impl CloudflareClient {
    /// `POST /accounts/{account_id}/queues/{queue_id}/consumers`, returning the new consumer id.
    pub async fn create_queue_consumer(
        &self,
        account_id: &str,
        queue_id: &str,
        params: &ConsumerParams,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(&["accounts", account_id, "queues", queue_id, "consumers"])?;
        tracing::info!(account_id, queue_id, script = %params.script_name, "Creating queue consumer");

        let body = self
            .send_with_retry("create_queue_consumer", || {
                Ok(self.request(Method::POST, url.clone()).json(params))
            })
            .await?;

        let consumer_id = decode_consumer_id(&body)?;
        tracing::debug!(account_id, queue_id, consumer_id = %consumer_id, "Queue consumer created");
        Ok(consumer_id)
    }

    /// `POST /accounts/{account_id}/queues/{queue_id}/consumers/{consumer_id}`
    pub async fn update_queue_consumer(
        &self,
        account_id: &str,
        queue_id: &str,
        consumer_id: &str,
        params: &ConsumerParams,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&[
            "accounts",
            account_id,
            "queues",
            queue_id,
            "consumers",
            consumer_id,
        ])?;
        tracing::info!(account_id, queue_id, consumer_id, "Updating queue consumer");

        self.send_with_retry("update_queue_consumer", || {
            Ok(self.request(Method::POST, url.clone()).json(params))
        })
        .await?;
        Ok(())
    }

    /// `DELETE /accounts/{account_id}/queues/{queue_id}/consumers/{consumer_id}`
    pub async fn delete_queue_consumer(
        &self,
        account_id: &str,
        queue_id: &str,
        consumer_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&[
            "accounts",
            account_id,
            "queues",
            queue_id,
            "consumers",
            consumer_id,
        ])?;
        tracing::info!(account_id, queue_id, consumer_id, "Deleting queue consumer");

        self.send_with_retry("delete_queue_consumer", || {
            Ok(self.request(Method::DELETE, url.clone()))
        })
        .await?;
        Ok(())
    }
}
