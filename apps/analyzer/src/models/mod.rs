// Wire types shared by the gateway, the store, and the presenter.
// All payloads use camelCase field names on the wire.

pub mod envelope;
pub mod job_match;
pub mod resume;

pub use envelope::{ApiEnvelope, ApiErrorBody};
pub use job_match::{CandidateMatch, JobMatchResult, SkillGap};
pub use resume::{ExtractedSkills, ResumeData, SkillCategory};
