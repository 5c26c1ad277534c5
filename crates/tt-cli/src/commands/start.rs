//! Start command: open a session on a project.

use anyhow::{Context, Result};
use tt_core::{Clock, StartOutcome};
use tt_store::Store;

use crate::cli::ProjectArgs;

pub fn run<C: Clock>(store: &mut Store<C>, args: &ProjectArgs) -> Result<()> {
    let outcome = store
        .start_tracking(&args.project)
        .with_context(|| format!("failed to record start of '{}'", args.project))?;

    if outcome == StartOutcome::Started {
        tracing::debug!(project = %args.project, "tracking started");
    }
    Ok(())
}
