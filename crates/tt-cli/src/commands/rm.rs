//! Rm command: delete a project after explicit confirmation.

use anyhow::{Context, Result};
use tt_core::Clock;
use tt_store::Store;

use crate::cli::RmArgs;

/// Deletes the project only when `--force` was given.
///
/// Returns whether anything was deleted.
pub fn run<C: Clock>(store: &mut Store<C>, args: &RmArgs) -> Result<bool> {
    if !args.force {
        tracing::info!("must supply force argument (-f/--force) to delete");
        return Ok(false);
    }

    match store.delete_project(&args.project) {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to delete '{}'", args.project)),
    }
}
