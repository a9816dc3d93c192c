// Phase orchestrators: upload (résumé analysis) then match (job comparison).
// Both talk to the service only through `AnalysisGateway` and write results
// only through `WorkflowStore`.

pub mod matching;
pub mod progress;
pub mod upload;

pub use matching::{MatchForm, MatchOrchestrator, MIN_DESCRIPTION_CHARS};
pub use upload::{UploadOrchestrator, UploadState};
