//! On-disk document format.
//!
//! ```json
//! {
//!   "projects": {
//!     "writing": [
//!       { "start": "2012-12-24T09:00:00", "stop": "2012-12-24T10:30:00", "duration": 5400 },
//!       { "start": "2012-12-25T09:00:00" }
//!     ]
//!   }
//! }
//! ```
//!
//! Project entries keep document order in both directions. `duration` is a
//! whole number of seconds and only ever appears alongside `stop`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tt_core::{Project, Session, Timestamp, duration_from_seconds, duration_to_seconds};

use crate::StoreError;

/// The whole persisted file.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Document {
    projects: ProjectEntries,
}

/// One persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SessionRecord {
    start: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<i64>,
}

/// Project name to session list, in document order.
#[derive(Debug, Default)]
struct ProjectEntries(Vec<(String, Vec<SessionRecord>)>);

impl Document {
    pub(crate) fn from_projects(projects: &[Project]) -> Self {
        let entries = projects
            .iter()
            .map(|project| {
                let sessions = project.sessions().iter().map(SessionRecord::from).collect();
                (project.name().to_string(), sessions)
            })
            .collect();
        Self {
            projects: ProjectEntries(entries),
        }
    }

    pub(crate) fn into_projects(self) -> Result<Vec<Project>, StoreError> {
        self.projects
            .0
            .into_iter()
            .map(|(name, records)| -> Result<Project, StoreError> {
                let sessions = records
                    .into_iter()
                    .map(SessionRecord::into_session)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Project::with_sessions(name, sessions)?)
            })
            .collect()
    }
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            start: session.start(),
            stop: session.stop(),
            duration: session.duration().map(duration_to_seconds),
        }
    }
}

impl SessionRecord {
    fn into_session(self) -> Result<Session, StoreError> {
        match (self.stop, self.duration) {
            (None, None) => Ok(Session::open(self.start)),
            (None, Some(_)) => Err(StoreError::DurationWithoutStop { start: self.start }),
            (Some(stop), Some(seconds)) => {
                let duration = duration_from_seconds(seconds)?;
                Ok(Session::closed(self.start, stop, duration)?)
            }
            // Older files may omit the duration of a closed session.
            (Some(stop), None) => Ok(Session::closed(self.start, stop, stop - self.start)?),
        }
    }
}

impl Serialize for ProjectEntries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, sessions) in &self.0 {
            map.serialize_entry(name, sessions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProjectEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ProjectEntriesVisitor)
    }
}

struct ProjectEntriesVisitor;

impl<'de> Visitor<'de> for ProjectEntriesVisitor {
    type Value = ProjectEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of project names to session lists")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, Vec<SessionRecord>)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, sessions)) = access.next_entry::<String, Vec<SessionRecord>>()? {
            if entries.iter().any(|(existing, _)| *existing == name) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate project {name:?}"
                )));
            }
            entries.push((name, sessions));
        }
        Ok(ProjectEntries(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use serde_json::json;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn decode(value: serde_json::Value) -> Result<Vec<Project>, StoreError> {
        let document: Document = serde_json::from_value(value).map_err(StoreError::Decode)?;
        document.into_projects()
    }

    #[test]
    fn test_encodes_closed_and_open_sessions() {
        let start = ts("2012-12-24T09:00:00");
        let stop = ts("2012-12-24T10:30:00");
        let project = Project::with_sessions(
            "writing",
            vec![
                Session::closed(start, stop, stop - start).unwrap(),
                Session::open(ts("2012-12-25T09:00:00")),
            ],
        )
        .unwrap();

        let value = serde_json::to_value(Document::from_projects(&[project])).unwrap();

        assert_eq!(
            value,
            json!({
                "projects": {
                    "writing": [
                        { "start": "2012-12-24T09:00:00", "stop": "2012-12-24T10:30:00", "duration": 5400 },
                        { "start": "2012-12-25T09:00:00" }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_decoding_keeps_document_order() {
        let text = r#"{"projects": {"zeta": [], "alpha": [], "mid": []}}"#;
        let document: Document = serde_json::from_str(text).unwrap();
        let names: Vec<String> = document
            .into_projects()
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_encoding_keeps_insertion_order() {
        let projects = [Project::new("zeta"), Project::new("alpha")];
        let text = serde_json::to_string(&Document::from_projects(&projects)).unwrap();
        assert_eq!(text, r#"{"projects":{"zeta":[],"alpha":[]}}"#);
    }

    #[test]
    fn test_decodes_durations_exactly() {
        let projects = decode(json!({
            "projects": {
                "p": [{ "start": "2012-12-20T12:00:00", "stop": "2012-12-22T14:00:01", "duration": 180_001 }]
            }
        }))
        .unwrap();
        let session = projects[0].sessions()[0];
        assert_eq!(session.duration(), Some(Duration::seconds(180_001)));
    }

    #[test]
    fn test_missing_duration_is_derived_from_stop() {
        let projects = decode(json!({
            "projects": {
                "p": [{ "start": "2012-12-20T12:00:00", "stop": "2012-12-20T14:00:00" }]
            }
        }))
        .unwrap();
        assert_eq!(
            projects[0].sessions()[0].duration(),
            Some(Duration::hours(2))
        );
    }

    #[test]
    fn test_duration_without_stop_is_rejected() {
        let err = decode(json!({
            "projects": {
                "p": [{ "start": "2012-12-20T12:00:00", "duration": 60 }]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::DurationWithoutStop { .. }));
    }

    #[test]
    fn test_inconsistent_duration_is_rejected() {
        let err = decode(json!({
            "projects": {
                "p": [{ "start": "2012-12-20T12:00:00", "stop": "2012-12-20T14:00:00", "duration": 60 }]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::Project(_)));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let err = decode(json!({
            "projects": {
                "p": [{ "start": "2012-12-20T12:00:00", "stop": "2012-12-20T14:00:00", "duration": -7200 }]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[test]
    fn test_open_session_before_the_end_is_rejected() {
        let err = decode(json!({
            "projects": {
                "p": [
                    { "start": "2012-12-20T12:00:00" },
                    { "start": "2012-12-21T12:00:00", "stop": "2012-12-21T13:00:00", "duration": 3600 }
                ]
            }
        }))
        .unwrap_err();
        assert!(matches!(err, StoreError::Project(_)));
    }

    #[test]
    fn test_malformed_timestamps_fail_to_parse() {
        let result: Result<Document, _> = serde_json::from_value(json!({
            "projects": { "p": [{ "start": "2012-12-20 12:00:00" }] }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_project_names_fail_to_parse() {
        let text = r#"{"projects": {"p": [], "p": []}}"#;
        let err = serde_json::from_str::<Document>(text).unwrap_err();
        assert!(err.to_string().contains("duplicate project"));
    }
}
