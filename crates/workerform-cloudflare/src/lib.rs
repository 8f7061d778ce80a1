//! # workerform-cloudflare
//!
//! Thin client for the handful of Cloudflare API v4 endpoints workerform
//! reconciles against:
//!
//! - `PUT`/`DELETE /accounts/{account}/workers/scripts/{script}`
//! - `POST /accounts/{account}/queues/{queue}/consumers`
//! - `POST`/`DELETE /accounts/{account}/queues/{queue}/consumers/{consumer}`
//!
//! Every call is bearer-authenticated and goes through [`with_retry`], which
//! retries any failed attempt on a fixed schedule.

mod client;
mod error;
pub mod queues;
mod retry;
pub mod scripts;

pub use client::{CloudflareClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use queues::{ConsumerParams, ConsumerSettings};
pub use retry::{RetryPolicy, with_retry};
pub use scripts::{ModulePart, ScriptMetadata, ScriptUpload};
