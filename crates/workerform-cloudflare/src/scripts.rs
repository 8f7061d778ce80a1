//! Worker script upload and deletion.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use workerform_core::{Binding, ContentKind};

use crate::client::CloudflareClient;
use crate::error::ApiError;

/// The `metadata` part of a script upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptMetadata {
    pub main_module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_flags: Option<Vec<String>>,
    pub bindings: Vec<Binding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logpush: Option<bool>,
}

/// One module file of a script upload.
#[derive(Debug, Clone)]
pub struct ModulePart {
    pub filename: String,
    pub kind: ContentKind,
    pub bytes: Vec<u8>,
}

/// Everything sent by a single script upload.
#[derive(Debug, Clone)]
pub struct ScriptUpload {
    pub metadata: ScriptMetadata,
    pub modules: Vec<ModulePart>,
}

impl ScriptUpload {
    /// Build the multipart body. Called once per attempt since forms are consumed on send.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let metadata = serde_json::to_vec(&self.metadata)
            .map_err(|e| ApiError::request(format!("failed to encode metadata: {e}")))?;
        let mut form = Form::new().part(
            "metadata",
            Part::bytes(metadata)
                .file_name("metadata")
                .mime_str("application/json")
                .map_err(|e| ApiError::request(e.to_string()))?,
        );

        for module in &self.modules {
            let part = Part::bytes(module.bytes.clone())
                .file_name(module.filename.clone())
                .mime_str(module.kind.mime_type())
                .map_err(|e| ApiError::request(e.to_string()))?;
            form = form.part(module.filename.clone(), part);
        }
        Ok(form)
    }
}

impl CloudflareClient {
    /// `PUT /accounts/{account_id}/workers/scripts/{script_name}`
    pub async fn put_script(
        &self,
        account_id: &str,
        script_name: &str,
        upload: &ScriptUpload,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["accounts", account_id, "workers", "scripts", script_name])?;
        tracing::info!(
            account_id,
            script = script_name,
            modules = upload.modules.len(),
            "Uploading worker script"
        );

        self.send_with_retry("put_script", || {
            Ok(self.request(Method::PUT, url.clone()).multipart(upload.to_form()?))
        })
        .await?;
        Ok(())
    }

    /// `DELETE /accounts/{account_id}/workers/scripts/{script_name}`
    pub async fn delete_script(&self, account_id: &str, script_name: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["accounts", account_id, "workers", "scripts", script_name])?;
        tracing::info!(account_id, script = script_name, "Deleting worker script");

        self.send_with_retry("delete_script", || {
            Ok(self.request(Method::DELETE, url.clone()))
        })
        .await?;
        Ok(())
    }
}
