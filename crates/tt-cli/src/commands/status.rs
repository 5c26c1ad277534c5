//! Status command: one-line summary of running projects.
//!
//! Prints `[ <name> T: <total> C: <current>, ... ]`, suitable for a shell
//! prompt. Prints nothing when no project is running.

use std::io::Write;

use anyhow::Result;
use tt_core::{Clock, format_duration};
use tt_store::Store;

pub fn run<W: Write, C: Clock>(writer: &mut W, store: &Store<C>) -> Result<()> {
    let now = store.now();
    let entries: Vec<String> = store
        .active_projects()
        .map(|project| {
            format!(
                "{} T: {} C: {}",
                project.name(),
                format_duration(project.total_elapsed(now)),
                format_duration(project.current_elapsed(now)),
            )
        })
        .collect();

    if !entries.is_empty() {
        writeln!(writer, "[ {} ]", entries.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tt_core::{ManualClock, Timestamp};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn test_status_shows_running_projects_only() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timetracker.json");
        let clock = ManualClock::new(ts("2012-12-24T09:00:00"));
        let mut store = Store::load_with_clock(&path, &clock);

        store.start_tracking("writing").unwrap();
        clock.set(ts("2012-12-24T11:00:00"));
        store.stop_tracking("writing").unwrap();
        clock.set(ts("2012-12-24T12:00:00"));
        store.start_tracking("writing").unwrap();
        store.start_tracking("admin").unwrap();
        clock.set(ts("2012-12-24T12:15:00"));
        store.stop_tracking("admin").unwrap();
        clock.set(ts("2012-12-24T12:30:00"));
        store.start_tracking("reading").unwrap();
        clock.set(ts("2012-12-24T13:00:00"));

        let mut output = Vec::new();
        run(&mut output, &store).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(
            output.trim_end(),
            @"[ writing T: 3h0m0s C: 1h0m0s, reading T: 0h30m0s C: 0h30m0s ]"
        );
    }

    #[test]
    fn test_status_folds_days_into_hours() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timetracker.json");
        let clock = ManualClock::new(ts("2012-12-22T00:00:00"));
        let mut store = Store::load_with_clock(&path, &clock);
        store.start_tracking("marathon").unwrap();
        clock.set(ts("2012-12-24T06:27:59"));

        let mut output = Vec::new();
        run(&mut output, &store).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @"[ marathon T: 54h27m59s C: 54h27m59s ]");
    }

    #[test]
    fn test_status_is_silent_when_idle() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timetracker.json");
        let clock = ManualClock::new(ts("2012-12-24T09:00:00"));
        let mut store = Store::load_with_clock(&path, &clock);
        store.start_tracking("writing").unwrap();
        store.stop_tracking("writing").unwrap();

        let mut output = Vec::new();
        run(&mut output, &store).unwrap();

        assert!(output.is_empty());
    }
}
