//! Core domain logic for the time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Time values: second-precision timestamps and their string encodings
//! - Sessions: start/stop intervals with derived durations
//! - Projects: the start/stop state machine and elapsed-time accounting

pub mod clock;
pub mod project;
pub mod session;
pub mod time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use project::{Project, ProjectError, StartOutcome, StopOutcome};
pub use session::{Session, SessionEnd};
pub use time::{
    FormatError, Timestamp, duration_from_seconds, duration_to_seconds, format_duration,
    format_timestamp, parse_timestamp,
};
