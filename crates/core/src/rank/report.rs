//! The ranker's output document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{char_prefix, RankOptions, Section};
use crate::config::InputConfig;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_REFINED_CHARS: usize = 400;
pub const REPORT_KEY_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
    /// Seconds.
    pub total_processing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: usize,
    pub parent_section: Option<String>,
    pub relevance_score: f64,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

/// Ranked sections of one input document.
#[derive(Debug, Clone)]
pub struct RankedDocument {
    pub filename: String,
    pub sections: Vec<Section>,
}

/// Assemble the report from per-document rankings.
///
/// Each document contributes its best `sections_per_document` sections.
/// Entries from all documents are then ordered by relevance (ties keep input
/// order) and `importance_rank` counts from 1 in that order.
pub fn build_report(
    config: &InputConfig,
    documents: &[RankedDocument],
    options: &RankOptions,
    started_at: DateTime<Utc>,
    elapsed_secs: f64,
) -> RankReport {
    let mut entries: Vec<(&str, &Section)> = documents
        .iter()
        .flat_map(|doc| {
            doc.sections
                .iter()
                .take(options.sections_per_document)
                .map(move |section| (doc.filename.as_str(), section))
        })
        .collect();

    entries.sort_by(|a, b| {
        b.1.relevance_score
            .partial_cmp(&a.1.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let extracted_sections = entries
        .iter()
        .enumerate()
        .map(|(i, (document, section))| ExtractedSection {
            document: document.to_string(),
            section_title: char_prefix(&section.title, MAX_TITLE_CHARS).to_string(),
            importance_rank: i + 1,
            page_number: section.page_number,
        })
        .collect();

    let subsection_analysis = entries
        .iter()
        .map(|(document, section)| SubsectionAnalysis {
            document: document.to_string(),
            refined_text: char_prefix(&section.content, MAX_REFINED_CHARS).to_string(),
            page_number: section.page_number,
            parent_section: section.parent_section.clone(),
            relevance_score: section.relevance_score.clamp(0.0, 1.0),
            key_points: section
                .key_points
                .iter()
                .take(REPORT_KEY_POINTS)
                .cloned()
                .collect(),
        })
        .collect();

    RankReport {
        metadata: ReportMetadata {
            input_documents: config.documents.iter().map(|d| d.filename.clone()).collect(),
            persona: config.persona.role.clone(),
            job_to_be_done: config.job_to_be_done.task.clone(),
            processing_timestamp: started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_processing_time: elapsed_secs,
        },
        extracted_sections,
        subsection_analysis,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn config() -> InputConfig {
        InputConfig::from_json(
            r#"{
                "documents": [
                    { "filename": "a.pdf", "title": "A" },
                    { "filename": "b.pdf", "title": "B" }
                ],
                "persona": { "role": "Food Critic" },
                "job_to_be_done": { "task": "Find the best dishes" }
            }"#,
        )
        .unwrap()
    }

    fn section(title: &str, score: f64) -> Section {
        Section {
            title: title.to_string(),
            content: format!("{title} content"),
            page_number: 1,
            relevance_score: score,
            key_points: vec!["one".into(), "two".into(), "three".into()],
            parent_section: None,
        }
    }

    fn started_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_entries_are_ranked_across_documents() {
        let documents = vec![
            RankedDocument {
                filename: "a.pdf".into(),
                sections: vec![section("A1", 0.4), section("A2", 0.1)],
            },
            RankedDocument {
                filename: "b.pdf".into(),
                sections: vec![section("B1", 0.9), section("B2", 0.4)],
            },
        ];
        let report = build_report(&config(), &documents, &RankOptions::default(), started_at(), 1.5);

        let order: Vec<(&str, &str, usize)> = report
            .extracted_sections
            .iter()
            .map(|s| (s.document.as_str(), s.section_title.as_str(), s.importance_rank))
            .collect();
        assert_eq!(
            order,
            vec![
                ("b.pdf", "B1", 1),
                ("a.pdf", "A1", 2),
                ("b.pdf", "B2", 3),
                ("a.pdf", "A2", 4),
            ]
        );
        assert_eq!(report.subsection_analysis[0].refined_text, "B1 content");
        assert_eq!(report.subsection_analysis[0].key_points, vec!["one", "two"]);
    }

    #[test]
    fn test_sections_per_document_limit_and_truncation() {
        let mut long = section(&"T".repeat(150), 0.5);
        long.content = "c".repeat(1000);
        let documents = vec![RankedDocument {
            filename: "a.pdf".into(),
            sections: vec![long, section("second", 0.2)],
        }];
        let options = RankOptions {
            sections_per_document: 1,
            ..RankOptions::default()
        };
        let report = build_report(&config(), &documents, &options, started_at(), 0.0);
        assert_eq!(report.extracted_sections.len(), 1);
        assert_eq!(report.extracted_sections[0].section_title.chars().count(), 100);
        assert_eq!(report.subsection_analysis[0].refined_text.chars().count(), 400);
    }

    #[test]
    fn test_metadata_and_json_shape() {
        let report = build_report(&config(), &[], &RankOptions::default(), started_at(), 2.25);
        assert_eq!(report.metadata.input_documents, vec!["a.pdf", "b.pdf"]);
        assert_eq!(report.metadata.persona, "Food Critic");
        assert_eq!(report.metadata.job_to_be_done, "Find the best dishes");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metadata"]["processing_timestamp"], "2024-05-01T12:30:00Z");
        assert_eq!(json["metadata"]["total_processing_time"], 2.25);
        assert_eq!(json["extracted_sections"], serde_json::json!([]));
        assert_eq!(json["subsection_analysis"], serde_json::json!([]));
    }
}
