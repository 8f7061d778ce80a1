//! Module worker scripts.
//!
//! Persisted state is the desired configuration plus `scriptHash`, the digest
//! of the bundle that was last uploaded. Diffing always rescans the script
//! directory, because file contents can change while every declared field
//! stays the same.

mod upload;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use workerform_cloudflare::CloudflareClient;
use workerform_core::{Binding, bundle, canonical_json, generate_id, normalize_bindings};

use crate::error::Result;
use crate::provider::{
    CreateResult, DiffResult, ResourceProvider, UpdateResult, changed_fields,
};

/// Desired configuration of a module worker script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptArgs {
    pub account_id: String,
    /// Script name; also the remote address of the script.
    pub name: String,
    pub script_dir: String,
    pub main_module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logpush: Option<bool>,
}

impl ScriptArgs {
    /// Copy with bindings in canonical order.
    pub fn normalized(&self) -> Self {
        Self {
            bindings: normalize_bindings(&self.bindings),
            ..self.clone()
        }
    }
}

/// What was last successfully uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptState {
    #[serde(flatten)]
    pub args: ScriptArgs,
    pub script_hash: String,
}

impl ScriptState {
    pub fn new(args: &ScriptArgs, script_hash: impl Into<String>) -> Self {
        Self {
            args: args.normalized(),
            script_hash: script_hash.into(),
        }
    }
}

/// Provider for module worker scripts.
#[derive(Debug, Clone)]
pub struct ScriptProvider {
    client: CloudflareClient,
}

impl ScriptProvider {
    pub fn new(client: CloudflareClient) -> Self {
        Self { client }
    }

    /// Diff without going through the trait; `id` plays no part in it.
    pub async fn diff_state(&self, olds: &ScriptState, news: &ScriptArgs) -> Result<DiffResult> {
        let replaces = changed_fields(&[
            ("accountId", olds.args.account_id.as_str(), news.account_id.as_str()),
            ("name", olds.args.name.as_str(), news.name.as_str()),
        ]);

        let script_hash = bundle::digest(&news.script_dir).await?;
        let candidate = ScriptState::new(news, script_hash);
        let persisted = ScriptState::new(&olds.args, olds.script_hash.clone());
        let update = canonical_json(&persisted)? != canonical_json(&candidate)?;

        let diff = DiffResult::new(replaces, update);
        tracing::debug!(
            script = %news.name,
            changes = diff.changes,
            replaces = ?diff.replaces,
            content_changed = olds.script_hash != candidate.script_hash,
            "Diffed worker script"
        );
        Ok(diff)
    }
}

#[async_trait]
impl ResourceProvider for ScriptProvider {
    type Inputs = ScriptArgs;
    type Outputs = ScriptState;

    async fn create(&self, inputs: &ScriptArgs) -> Result<CreateResult<ScriptState>> {
        let script_hash = upload::upload(&self.client, inputs).await?;
        Ok(CreateResult {
            id: generate_id(),
            outs: ScriptState::new(inputs, script_hash),
        })
    }

    async fn diff(&self, _id: &str, olds: &ScriptState, news: &ScriptArgs) -> Result<DiffResult> {
        self.diff_state(olds, news).await
    }

    async fn update(
        &self,
        _id: &str,
        _olds: &ScriptState,
        news: &ScriptArgs,
    ) -> Result<UpdateResult<ScriptState>> {
        let script_hash = upload::upload(&self.client, news).await?;
        Ok(UpdateResult {
            outs: ScriptState::new(news, script_hash),
        })
    }

    async fn delete(&self, _id: &str, props: &ScriptState) -> Result<()> {
        self.client
            .delete_script(&props.args.account_id, &props.args.name)
            .await?;
        Ok(())
    }
}
