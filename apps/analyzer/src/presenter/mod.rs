//! Result Presenter: a read-only view over the current match result.
//!
//! The presenter keeps only ephemeral view state (active tab, question reveal
//! and copy marks). It follows the store through its event stream and goes
//! back to the score tab every time a match result arrives or is cleared.

pub mod accordion;
pub mod questions;

use std::fmt;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::errors::ClipboardError;
use crate::models::{JobMatchResult, SkillGap};
use crate::store::{StoreEvent, WorkflowStore};

pub use accordion::{Accordion, AccordionMode};
pub use questions::{format_numbered, Clipboard, QuestionItem, QuestionSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Score,
    Gaps,
    Questions,
}

// ============================================================================
// Derived views
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreRating {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            Self::Excellent
        } else if score >= 60 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match",
            Self::Good => "Good Match",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ScoreRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSummary {
    pub job_title: String,
    pub score: u8,
    pub rating: ScoreRating,
    pub matched_skills: usize,
    pub skills_to_improve: usize,
}

impl From<&JobMatchResult> for ScoreSummary {
    fn from(result: &JobMatchResult) -> Self {
        Self {
            job_title: result.job_title.clone(),
            score: result.similarity_score,
            rating: ScoreRating::for_score(result.similarity_score),
            matched_skills: result.matched_skills.len(),
            skills_to_improve: result.skill_gaps.missing.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapBreakdown {
    pub matched: Vec<String>,
    pub partial: Vec<String>,
    pub missing: Vec<String>,
    pub total: usize,
    /// Percentage, rounded.
    pub match_rate: u32,
}

impl From<&SkillGap> for GapBreakdown {
    fn from(gaps: &SkillGap) -> Self {
        Self {
            matched: gaps.matched.clone(),
            partial: gaps.partial.clone(),
            missing: gaps.missing.clone(),
            total: gaps.total(),
            match_rate: gaps.match_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionsView {
    pub questions: Vec<QuestionItem>,
    pub recommendations: Vec<String>,
}

/// What the active tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Score(ScoreSummary),
    Gaps(GapBreakdown),
    Questions(QuestionsView),
}

// ============================================================================
// Presenter
// ============================================================================

pub struct ResultPresenter {
    store: WorkflowStore,
    events: broadcast::Receiver<StoreEvent>,
    active: ResultTab,
    sheet: QuestionSheet,
}

impl ResultPresenter {
    pub fn new(store: WorkflowStore) -> Self {
        let events = store.subscribe();
        let sheet = Self::sheet_for(store.current_match().as_ref());
        Self {
            store,
            events,
            active: ResultTab::default(),
            sheet,
        }
    }

    pub fn active_tab(&mut self) -> ResultTab {
        self.sync();
        self.active
    }

    pub fn select_tab(&mut self, tab: ResultTab) {
        self.sync();
        self.active = tab;
    }

    /// The active tab's content, or `None` while there is no match result.
    pub fn render(&mut self) -> Option<ResultPanel> {
        self.sync();
        let result = self.store.current_match()?;
        Some(self.panel(&result, self.active))
    }

    /// Every tab, in display order. Used for non-interactive output.
    pub fn render_all(&mut self) -> Vec<ResultPanel> {
        self.sync();
        let Some(result) = self.store.current_match() else {
            return Vec::new();
        };
        [ResultTab::Score, ResultTab::Gaps, ResultTab::Questions]
            .into_iter()
            .map(|tab| self.panel(&result, tab))
            .collect()
    }

    pub fn toggle_question(&mut self, index: usize) -> bool {
        self.sync();
        self.sheet.toggle(index)
    }

    pub fn copy_question(
        &mut self,
        index: usize,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        self.sync();
        self.sheet.copy(index, clipboard)
    }

    pub fn copy_all_questions(&mut self, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
        self.sync();
        self.sheet.copy_all(clipboard)
    }

    fn panel(&self, result: &JobMatchResult, tab: ResultTab) -> ResultPanel {
        match tab {
            ResultTab::Score => ResultPanel::Score(ScoreSummary::from(result)),
            ResultTab::Gaps => ResultPanel::Gaps(GapBreakdown::from(&result.skill_gaps)),
            ResultTab::Questions => ResultPanel::Questions(QuestionsView {
                questions: self.sheet.items(),
                recommendations: result.recommendations.clone(),
            }),
        }
    }

    /// Drains pending store events. A new or cleared match resets the view.
    fn sync(&mut self) {
        let mut match_changed = false;
        loop {
            match self.events.try_recv() {
                Ok(StoreEvent::MatchChanged | StoreEvent::Reset) => match_changed = true,
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Presenter lagged by {skipped} store events");
                    match_changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if match_changed {
            self.active = ResultTab::Score;
            self.sheet = Self::sheet_for(self.store.current_match().as_ref());
        }
    }

    fn sheet_for(result: Option<&JobMatchResult>) -> QuestionSheet {
        QuestionSheet::new(
            result
                .map(|r| r.interview_questions.clone())
                .unwrap_or_default(),
        )
    }
}
