use serde::{Deserialize, Serialize};

use crate::domain::{CampusName, CourseName, DegreeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusesRequest {
    pub degrees: Vec<DegreeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursesRequest {
    pub degrees: Vec<DegreeId>,
    pub campus: CampusName,
}

/// Immutable snapshot of the selection submitted for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub degrees: Vec<DegreeId>,
    pub campus: CampusName,
    pub courses: Vec<CourseName>,
}

/// The generator reports the artifact either as a flag or as the path it wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactMarker {
    Flag(bool),
    Path(String),
}

impl ArtifactMarker {
    pub fn produced(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Path(path) => !path.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<ArtifactMarker>,
}

impl GenerateResponse {
    pub fn artifact_produced(&self) -> bool {
        self.zip.as_ref().is_some_and(ArtifactMarker::produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boolean_and_path_artifact_markers() {
        let flag: GenerateResponse = serde_json::from_str(r#"{"zip": true}"#).expect("flag");
        assert!(flag.artifact_produced());

        let path: GenerateResponse =
            serde_json::from_str(r#"{"message": "ok", "zip": "/tmp/out.zip"}"#).expect("path");
        assert!(path.artifact_produced());
        assert_eq!(path.message.as_deref(), Some("ok"));

        let missing: GenerateResponse =
            serde_json::from_str(r#"{"message": "nothing"}"#).expect("missing");
        assert!(!missing.artifact_produced());

        let empty: GenerateResponse = serde_json::from_str(r#"{"zip": ""}"#).expect("empty");
        assert!(!empty.artifact_produced());
    }

    #[test]
    fn request_bodies_serialize_as_plain_string_arrays() {
        let body = GenerateRequest {
            degrees: vec![DegreeId::from("CS")],
            campus: CampusName::from("North"),
            courses: vec![CourseName::from("Algorithms"), CourseName::from("Networks")],
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "degrees": ["CS"],
                "campus": "North",
                "courses": ["Algorithms", "Networks"],
            })
        );
    }
}
