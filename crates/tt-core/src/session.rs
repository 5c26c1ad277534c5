//! Start/stop intervals.

use chrono::Duration;

use crate::project::ProjectError;
use crate::time::Timestamp;

/// How a closed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnd {
    pub stop: Timestamp,
    /// Always `stop - start` of the owning session.
    pub duration: Duration,
}

/// One contiguous interval of work on a project.
///
/// A session without an end is open: it is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    start: Timestamp,
    end: Option<SessionEnd>,
}

impl Session {
    /// An open session starting at `start`.
    pub const fn open(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    /// A closed session, checking that `duration` matches the interval.
    pub fn closed(
        start: Timestamp,
        stop: Timestamp,
        duration: Duration,
    ) -> Result<Self, ProjectError> {
        if stop < start {
            return Err(ProjectError::StopBeforeStart { start, stop });
        }
        if duration != stop - start {
            return Err(ProjectError::DurationMismatch {
                start,
                stop,
                seconds: duration.num_seconds(),
            });
        }
        Ok(Self {
            start,
            end: Some(SessionEnd { stop, duration }),
        })
    }

    pub const fn start(&self) -> Timestamp {
        self.start
    }

    pub fn stop(&self) -> Option<Timestamp> {
        self.end.map(|end| end.stop)
    }

    /// Recorded duration; `None` while the session is open.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end.duration)
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Duration up to `now`: the recorded one if closed, live otherwise.
    ///
    /// A `now` before `start` counts as zero.
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        self.duration()
            .unwrap_or_else(|| (now - self.start).max(Duration::zero()))
    }

    /// Closes the session at `now`.
    ///
    /// A clock that moved backwards closes it at `start`, so durations are
    /// never negative.
    pub(crate) fn close(&mut self, now: Timestamp) -> Duration {
        let stop = now.max(self.start);
        let duration = stop - self.start;
        self.end = Some(SessionEnd { stop, duration });
        duration
    }
}
