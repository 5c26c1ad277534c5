//! List command: print every project name.

use std::io::Write;

use anyhow::Result;
use tt_core::Clock;
use tt_store::Store;

pub fn run<W: Write, C: Clock>(writer: &mut W, store: &Store<C>) -> Result<()> {
    for project in store.projects() {
        writeln!(writer, "{}", project.name())?;
    }
    Ok(())
}
