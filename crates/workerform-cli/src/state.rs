use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// What apply leaves behind: the resource id and the provider's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile<T> {
    pub id: String,
    pub outs: T,
}

/// Reads a state file; a missing file means the resource does not exist yet.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<StateFile<T>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read state: {}", path.display()));
        }
    };
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Invalid state file: {}", path.display()))?;
    Ok(Some(state))
}

/// Writes next to the target and renames, so a crash never leaves half a file.
pub fn save<T: Serialize>(path: &Path, state: &StateFile<T>) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content + "\n")
        .with_context(|| format!("Failed to write state: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to write state: {}", path.display()))?;
    Ok(())
}

pub fn remove(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove state: {}", path.display())),
    }
}

pub fn read_desired<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
