//! Turning desired script configuration into an upload.

use workerform_cloudflare::{CloudflareClient, ModulePart, ScriptMetadata, ScriptUpload};
use workerform_core::{LoadedBundle, bundle, normalize_bindings, validate_bindings};

use super::ScriptArgs;
use crate::error::{ProviderError, Result};

fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ProviderError::validation(format!("empty {field} provided")));
    }
    Ok(())
}

/// Check the fields that must be present before touching the filesystem.
pub(crate) fn validate_args(args: &ScriptArgs) -> Result<()> {
    require_non_empty(&args.account_id, "accountId")?;
    require_non_empty(&args.name, "name")?;
    require_non_empty(&args.script_dir, "scriptDir")?;
    validate_bindings(&args.bindings)?;
    Ok(())
}

/// Build the upload body for `args` from an already loaded bundle.
pub(crate) fn build_upload(args: &ScriptArgs, bundle: LoadedBundle) -> Result<ScriptUpload> {
    if !bundle.contains(&args.main_module) {
        return Err(ProviderError::validation("mainModule not found"));
    }

    let metadata = ScriptMetadata {
        main_module: args.main_module.clone(),
        compatibility_date: args.compatibility_date.clone(),
        compatibility_flags: args.compatibility_flags.clone(),
        bindings: normalize_bindings(&args.bindings),
        logpush: args.logpush,
    };

    let modules = bundle
        .modules
        .into_iter()
        .map(|m| ModulePart {
            filename: m.file.filename,
            kind: m.file.kind,
            bytes: m.bytes,
        })
        .collect();

    Ok(ScriptUpload { metadata, modules })
}

/// Validate, load, upload. Returns the digest of the uploaded bundle.
pub(crate) async fn upload(client: &CloudflareClient, args: &ScriptArgs) -> Result<String> {
    validate_args(args)?;

    let bundle = bundle::load(&args.script_dir).await?;
    let digest = bundle.digest.clone();
    let upload = build_upload(args, bundle)?;

    client
        .put_script(&args.account_id, &args.name, &upload)
        .await?;

    tracing::info!(
        account_id = %args.account_id,
        script = %args.name,
        digest = %digest,
        "Worker script uploaded"
    );
    Ok(digest)
}
