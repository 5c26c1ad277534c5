//! Dump command: print the stored document.

use std::io::Write;

use anyhow::Result;
use tt_core::Clock;
use tt_store::Store;

pub fn run<W: Write, C: Clock>(writer: &mut W, store: &Store<C>) -> Result<()> {
    writer.write_all(store.to_document_string()?.as_bytes())?;
    Ok(())
}
