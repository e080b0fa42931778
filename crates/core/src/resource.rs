//! Validated resource names for the remote reasoning-engine service.
//!
//! Every management- and data-plane call is addressed by a full resource
//! path of the form `projects/{project}/locations/{location}/reasoningEngines/{id}`.
//! `EngineName` parses and re-renders that path so malformed identifiers are
//! rejected before a request is ever built.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A well-formed reasoning-engine resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineName {
    project: String,
    location: String,
    engine_id: String,
}

impl EngineName {
    /// Build a resource name from its parts. All parts must be non-empty.
    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let name = Self {
            project: project.into(),
            location: location.into(),
            engine_id: engine_id.into(),
        };
        if name.project.is_empty() || name.location.is_empty() || name.engine_id.is_empty() {
            return Err(EngineError::InvalidResource(
                "project, location, and engine id must all be non-empty".into(),
            ));
        }
        Ok(name)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The trailing engine id segment — the "agent short id" used as the
    /// session-map key and in gateway URLs.
    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    /// The parent collection, `projects/{p}/locations/{l}`.
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }
}

impl fmt::Display for EngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/{}/reasoningEngines/{}",
            self.project, self.location, self.engine_id
        )
    }
}

impl FromStr for EngineName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            ["projects", project, "locations", location, "reasoningEngines", engine_id] => {
                Self::new(*project, *location, *engine_id)
            }
            _ => Err(EngineError::InvalidResource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_name() {
        let name: EngineName = "projects/demo/locations/us-central1/reasoningEngines/123"
            .parse()
            .unwrap();
        assert_eq!(name.project(), "demo");
        assert_eq!(name.location(), "us-central1");
        assert_eq!(name.engine_id(), "123");
    }

    #[test]
    fn display_round_trips() {
        let raw = "projects/demo/locations/europe-west4/reasoningEngines/3749695290530070528";
        let name: EngineName = raw.parse().unwrap();
        assert_eq!(name.to_string(), raw);
    }

    #[test]
    fn rejects_malformed_names() {
        assert!("".parse::<EngineName>().is_err());
        assert!("reasoningEngines/123".parse::<EngineName>().is_err());
        assert!(
            "projects/demo/locations/us-central1/reasoningEngines"
                .parse::<EngineName>()
                .is_err()
        );
        assert!(
            "projects/demo/locations/us-central1/models/123"
                .parse::<EngineName>()
                .is_err()
        );
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(
            "projects//locations/us-central1/reasoningEngines/123"
                .parse::<EngineName>()
                .is_err()
        );
        assert!(EngineName::new("demo", "", "123").is_err());
    }

    #[test]
    fn parent_is_project_and_location() {
        let name = EngineName::new("demo", "us-central1", "123").unwrap();
        assert_eq!(name.parent(), "projects/demo/locations/us-central1");
    }
}
