use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::{Serialize, de::DeserializeOwned};
use workerform_provider::{DiffResult, ResourceProvider};

use crate::output::{describe_diff, print_json, print_success};
use crate::state::{self, StateFile};

/// What apply does for a given state and diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Replace,
    Update,
    Noop,
}

impl Action {
    pub fn decide(diff: Option<&DiffResult>) -> Self {
        match diff {
            None => Action::Create,
            Some(d) if d.requires_replace() => Action::Replace,
            Some(d) if d.requires_update() => Action::Update,
            Some(_) => Action::Noop,
        }
    }
}

pub async fn plan<P>(provider: &P, kind: &str, desired: &Path, state_path: Option<&Path>) -> Result<()>
where
    P: ResourceProvider,
    P::Inputs: DeserializeOwned,
    P::Outputs: DeserializeOwned,
{
    let news: P::Inputs = state::read_desired(desired)?;
    let existing = match state_path {
        Some(path) => state::load::<P::Outputs>(path)?,
        None => None,
    };

    let diff = match &existing {
        Some(current) => {
            let diff = provider.diff(&current.id, &current.outs, &news).await?;
            println!("{} {}: {}", "Plan".cyan(), kind, describe_diff(&diff));
            diff
        }
        None => {
            println!("{} {}: create", "Plan".cyan(), kind);
            DiffResult::new(vec![], true)
        }
    };
    print_json(&diff)
}

pub async fn apply<P>(provider: &P, kind: &str, desired: &Path, state_path: &Path) -> Result<()>
where
    P: ResourceProvider,
    P::Inputs: DeserializeOwned,
    P::Outputs: Serialize + DeserializeOwned,
{
    let news: P::Inputs = state::read_desired(desired)?;
    let existing = state::load::<P::Outputs>(state_path)?;

    let diff = match &existing {
        Some(current) => Some(provider.diff(&current.id, &current.outs, &news).await?),
        None => None,
    };
    let action = Action::decide(diff.as_ref());
    tracing::debug!(kind, ?action, "Applying");

    match (action, existing) {
        (Action::Noop, _) => {
            print_success(&format!("{kind} is up to date"));
        }
        (Action::Update, Some(current)) => {
            let updated = provider.update(&current.id, &current.outs, &news).await?;
            state::save(
                state_path,
                &StateFile {
                    id: current.id.clone(),
                    outs: updated.outs,
                },
            )?;
            print_success(&format!("Updated {kind} {}", current.id.cyan()));
        }
        (Action::Replace, Some(current)) => {
            provider.delete(&current.id, &current.outs).await?;
            state::remove(state_path)?;
            print_success(&format!("Deleted {kind} {}", current.id.cyan()));
            create(provider, kind, &news, state_path).await?;
        }
        _ => {
            create(provider, kind, &news, state_path).await?;
        }
    }
    Ok(())
}

async fn create<P>(provider: &P, kind: &str, news: &P::Inputs, state_path: &Path) -> Result<()>
where
    P: ResourceProvider,
    P::Outputs: Serialize,
{
    let created = provider.create(news).await?;
    state::save(
        state_path,
        &StateFile {
            id: created.id.clone(),
            outs: created.outs,
        },
    )?;
    print_success(&format!("Created {kind} {}", created.id.cyan()));
    Ok(())
}

pub async fn destroy<P>(provider: &P, kind: &str, state_path: &Path) -> Result<()>
where
    P: ResourceProvider,
    P::Outputs: DeserializeOwned,
{
    let Some(current) = state::load::<P::Outputs>(state_path)? else {
        anyhow::bail!("No state at {}; nothing to destroy", state_path.display());
    };
    provider.delete(&current.id, &current.outs).await?;
    state::remove(state_path)?;
    print_success(&format!("Deleted {kind} {}", current.id.cyan()));
    Ok(())
}
