//! Stop command: close the running session on a project.

use anyhow::{Context, Result};
use tt_core::{Clock, StopOutcome, format_duration};
use tt_store::Store;

use crate::cli::ProjectArgs;

pub fn run<C: Clock>(store: &mut Store<C>, args: &ProjectArgs) -> Result<()> {
    match store.stop_tracking(&args.project) {
        Ok(StopOutcome::Stopped { duration }) => {
            tracing::info!("stopped {} after {}", args.project, format_duration(duration));
            Ok(())
        }
        Ok(StopOutcome::NeverStarted | StopOutcome::Inactive { .. }) => Ok(()),
        // Already reported by the store; not a failure.
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("failed to record stop of '{}'", args.project))
        }
    }
}
