use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Skill profile extracted from a résumé by the analysis service.
///
/// Each list is unique within itself. Duplicates coming off the wire are
/// dropped on decode, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSkills {
    #[serde(default, deserialize_with = "unique_skills")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "unique_skills")]
    pub frameworks: Vec<String>,
    #[serde(default, deserialize_with = "unique_skills")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "unique_skills")]
    pub tools: Vec<String>,
    #[serde(default, deserialize_with = "unique_skills")]
    pub soft_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
}

/// A labelled, non-empty skill list, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillCategory<'a> {
    pub label: &'static str,
    pub skills: &'a [String],
}

impl ExtractedSkills {
    /// Non-empty categories in the order they are displayed.
    pub fn categories(&self) -> Vec<SkillCategory<'_>> {
        [
            ("Technical Skills", &self.technical_skills),
            ("Frameworks", &self.frameworks),
            ("Tools", &self.tools),
            ("Soft Skills", &self.soft_skills),
            ("Languages", &self.languages),
        ]
        .into_iter()
        .filter(|(_, skills)| !skills.is_empty())
        .map(|(label, skills)| SkillCategory {
            label,
            skills: skills.as_slice(),
        })
        .collect()
    }

    pub fn total_skills(&self) -> usize {
        self.technical_skills.len()
            + self.frameworks.len()
            + self.languages.len()
            + self.tools.len()
            + self.soft_skills.len()
    }
}

/// One analyzed résumé. Replaced wholesale in the store, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub id: String,
    pub file_name: String,
    pub extracted_skills: ExtractedSkills,
    /// Server-side embedding reference; opaque to the client.
    #[serde(default)]
    pub vector_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn unique_skills<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup_preserving_order(raw))
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_data_deserializes_camel_case() {
        let json = r#"{
            "id": "r-1",
            "fileName": "jane.pdf",
            "extractedSkills": {
                "technicalSkills": ["Go", "SQL"],
                "frameworks": [],
                "languages": ["English"],
                "tools": ["Docker"],
                "softSkills": ["Mentoring"],
                "yearsOfExperience": 6,
                "currentRole": "Backend Engineer"
            },
            "vectorId": null,
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let resume: ResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(resume.id, "r-1");
        assert_eq!(resume.file_name, "jane.pdf");
        assert_eq!(resume.extracted_skills.technical_skills, vec!["Go", "SQL"]);
        assert_eq!(resume.extracted_skills.years_of_experience, Some(6));
        assert_eq!(
            resume.extracted_skills.current_role.as_deref(),
            Some("Backend Engineer")
        );
        assert!(resume.vector_id.is_none());
        assert!(resume.extracted_skills.education.is_none());
    }

    #[test]
    fn test_duplicate_skills_dropped_within_category_only() {
        let json = r#"{
            "technicalSkills": ["Rust", "Go", "Rust"],
            "frameworks": ["Axum", "Axum"],
            "languages": [],
            "tools": ["Rust"],
            "softSkills": []
        }"#;

        let skills: ExtractedSkills = serde_json::from_str(json).unwrap();
        assert_eq!(skills.technical_skills, vec!["Rust", "Go"]);
        assert_eq!(skills.frameworks, vec!["Axum"]);
        // Same name in another category is allowed.
        assert_eq!(skills.tools, vec!["Rust"]);
    }

    #[test]
    fn test_missing_skill_lists_default_to_empty() {
        let skills: ExtractedSkills = serde_json::from_str(r#"{"technicalSkills": ["Go"]}"#).unwrap();
        assert!(skills.frameworks.is_empty());
        assert!(skills.soft_skills.is_empty());
        assert_eq!(skills.total_skills(), 1);
    }

    #[test]
    fn test_categories_skip_empty_and_keep_display_order() {
        let skills = ExtractedSkills {
            technical_skills: vec!["Go".to_string()],
            languages: vec!["English".to_string()],
            tools: vec!["Docker".to_string()],
            ..Default::default()
        };

        let labels: Vec<&str> = skills.categories().iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Technical Skills", "Tools", "Languages"]);
    }

    #[test]
    fn test_optional_fields_not_serialized_when_absent() {
        let value = serde_json::to_value(ExtractedSkills::default()).unwrap();
        assert!(value.get("yearsOfExperience").is_none());
        assert!(value.get("certifications").is_none());
        assert!(value.get("technicalSkills").is_some());
    }
}
