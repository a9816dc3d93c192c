use serde::{Deserialize, Serialize};

/// Three-way partition of the job's required skills relative to the résumé.
/// The service keeps the lists disjoint; the client does not deduplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub partial: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

impl SkillGap {
    /// Total required skills: matched + partial + missing.
    pub fn total(&self) -> usize {
        self.matched.len() + self.partial.len() + self.missing.len()
    }

    /// Percentage of required skills fully matched, rounded. Zero when the
    /// job lists no skills.
    pub fn match_rate(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.matched.len() as f64 / total as f64) * 100.0).round() as u32
    }
}

/// Outcome of matching one résumé against one job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    pub id: String,
    pub resume_id: String,
    pub job_id: String,
    pub job_title: String,
    /// 0 – 100
    pub similarity_score: u8,
    pub skill_gaps: SkillGap,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub interview_questions: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// One entry of a find-candidates response. The server owns the shape.
pub type CandidateMatch = serde_json::Value;
