//! Projects and their session state machine.
//!
//! A project is inactive when it has no sessions or its last session is
//! closed, and active when its last session is open. Only the last session
//! may ever be open.

use chrono::Duration;
use thiserror::Error;

use crate::session::Session;
use crate::time::Timestamp;

/// Invariant violations when building a project from existing sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// A session other than the last one has no stop time.
    #[error("project {name}: session {index} is open but is not the last session")]
    OpenSessionNotLast { name: String, index: usize },

    /// A session stops before it starts.
    #[error("session stops at {stop} before it starts at {start}")]
    StopBeforeStart { start: Timestamp, stop: Timestamp },

    /// The closed sessions add up to more time than can be represented.
    #[error("project {name}: total recorded time overflows")]
    TotalOverflow { name: String },

    /// A session's recorded duration is not `stop - start`.
    #[error("session {start}..{stop} records {seconds}s, which does not match its interval")]
    DurationMismatch {
        start: Timestamp,
        stop: Timestamp,
        seconds: i64,
    },
}

/// Result of asking a project to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session was opened.
    Started,
    /// The project was already running; nothing changed.
    AlreadyActive { since: Timestamp },
}

/// Result of asking a project to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The open session was closed with this duration.
    Stopped { duration: Duration },
    /// The project has no sessions; nothing changed.
    NeverStarted,
    /// The last session was already closed at `since`; nothing changed.
    Inactive { since: Timestamp },
}

/// A named activity with an ordered history of sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    sessions: Vec<Session>,
    /// Sum over closed sessions. Never includes the open one.
    closed_total: Duration,
}

impl Project {
    /// Creates a project with no sessions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sessions: Vec::new(),
            closed_total: Duration::zero(),
        }
    }

    /// Creates a project from recorded sessions, oldest first.
    pub fn with_sessions(
        name: impl Into<String>,
        sessions: Vec<Session>,
    ) -> Result<Self, ProjectError> {
        let name = name.into();
        let last = sessions.len().saturating_sub(1);
        if let Some(index) = sessions
            .iter()
            .position(Session::is_open)
            .filter(|&index| index != last)
        {
            return Err(ProjectError::OpenSessionNotLast { name, index });
        }

        let Some(closed_total) = sessions
            .iter()
            .filter_map(Session::duration)
            .try_fold(Duration::zero(), |acc, d| acc.checked_add(&d))
        else {
            return Err(ProjectError::TotalOverflow { name });
        };

        Ok(Self {
            name,
            sessions,
            closed_total,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn last_session(&self) -> Option<&Session> {
        self.sessions.last()
    }

    pub fn is_active(&self) -> bool {
        self.last_session().is_some_and(Session::is_open)
    }

    /// Opens a new session at `now` unless one is already running.
    pub fn start(&mut self, now: Timestamp) -> StartOutcome {
        if let Some(open) = self.last_session().filter(|s| s.is_open()) {
            let since = open.start();
            tracing::warn!("{} in progress as of {since}", self.name);
            return StartOutcome::AlreadyActive { since };
        }

        self.sessions.push(Session::open(now));
        tracing::debug!(project = %self.name, start = %now, "session started");
        StartOutcome::Started
    }

    /// Closes the running session at `now`.
    pub fn stop(&mut self, now: Timestamp) -> StopOutcome {
        let Some(last) = self.sessions.last_mut() else {
            tracing::info!("{} has never been started", self.name);
            return StopOutcome::NeverStarted;
        };

        if let Some(since) = last.stop() {
            tracing::info!("{} has been inactive since {since}", self.name);
            return StopOutcome::Inactive { since };
        }

        let duration = last.close(now);
        self.closed_total = saturating_add(self.closed_total, duration);
        tracing::debug!(project = %self.name, stop = %now, %duration, "session stopped");
        StopOutcome::Stopped { duration }
    }

    /// Time in the running session so far, or zero when inactive.
    pub fn current_elapsed(&self, now: Timestamp) -> Duration {
        self.last_session()
            .filter(|s| s.is_open())
            .map_or_else(Duration::zero, |s| s.elapsed(now))
    }

    /// Time across all sessions, counting a running session up to `now`.
    pub fn total_elapsed(&self, now: Timestamp) -> Duration {
        saturating_add(self.closed_total, self.current_elapsed(now))
    }
}

fn saturating_add(a: Duration, b: Duration) -> Duration {
    a.checked_add(&b).unwrap_or(Duration::MAX)
}
