//! Ranker input configuration.
//!
//! ```json
//! {
//!   "documents": [{ "filename": "guide.pdf", "title": "Guide" }],
//!   "persona": { "role": "Travel Planner", "expertise": "...", "background": "..." },
//!   "job_to_be_done": { "task": "Plan a trip", "objectives": ["..."] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::rank::RankError;

/// Only this many objectives are folded into the query.
pub const QUERY_OBJECTIVES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub challenge_id: String,
    pub test_case_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
    #[serde(default)]
    pub expertise: String,
    #[serde(default)]
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
    #[serde(default)]
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_info: Option<ChallengeInfo>,
    pub documents: Vec<DocumentRef>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl InputConfig {
    pub fn from_json(json: &str) -> Result<Self, RankError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Task, then role, then the first [`QUERY_OBJECTIVES`] objectives.
    pub fn query(&self) -> String {
        let mut query = format!("{} {}", self.job_to_be_done.task, self.persona.role);
        let objectives: Vec<&str> = self
            .job_to_be_done
            .objectives
            .iter()
            .take(QUERY_OBJECTIVES)
            .map(String::as_str)
            .collect();
        if !objectives.is_empty() {
            query.push(' ');
            query.push_str(&objectives.join(" "));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "challenge_info": { "challenge_id": "round_1b_002", "test_case_name": "travel" },
        "documents": [
            { "filename": "south-of-france.pdf", "title": "South of France" },
            { "filename": "cuisine.pdf", "title": "Cuisine" }
        ],
        "persona": { "role": "Travel Planner", "expertise": "Itineraries", "background": "Agency" },
        "job_to_be_done": {
            "task": "Plan a trip of 4 days",
            "objectives": ["budget", "nightlife", "food", "museums"]
        }
    }"#;

    #[test]
    fn test_parse_full_config() {
        let config = InputConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.documents.len(), 2);
        assert_eq!(config.documents[1].filename, "cuisine.pdf");
        assert_eq!(config.persona.role, "Travel Planner");
        assert_eq!(
            config.challenge_info.map(|c| c.test_case_name),
            Some("travel".to_string())
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let config = InputConfig::from_json(
            r#"{
                "documents": [],
                "persona": { "role": "Chef" },
                "job_to_be_done": { "task": "Cook dinner" }
            }"#,
        )
        .unwrap();
        assert!(config.challenge_info.is_none());
        assert!(config.job_to_be_done.objectives.is_empty());
        assert_eq!(config.query(), "Cook dinner Chef");
    }

    #[test]
    fn test_query_uses_first_three_objectives() {
        let config = InputConfig::from_json(CONFIG).unwrap();
        assert_eq!(
            config.query(),
            "Plan a trip of 4 days Travel Planner budget nightlife food"
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            InputConfig::from_json("{ nope"),
            Err(RankError::Config(_))
        ));
    }
}
