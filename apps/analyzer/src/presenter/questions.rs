//! Interview question sheet: per-question reveal state and clipboard copy.

use std::time::Duration;

use tokio::time::Instant;

use crate::errors::ClipboardError;
use crate::presenter::accordion::{Accordion, AccordionMode};

/// How long a question stays marked as copied.
pub const COPIED_MARK_DURATION: Duration = Duration::from_secs(2);

/// Sink for copied text. Implemented by whatever front end hosts the sheet.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionItem {
    /// 1-based, as displayed.
    pub number: usize,
    pub text: String,
    pub revealed: bool,
    pub copied: bool,
}

#[derive(Debug, Clone)]
pub struct QuestionSheet {
    questions: Vec<String>,
    reveal: Accordion<usize>,
    copied: Option<(usize, Instant)>,
}

impl QuestionSheet {
    /// First question revealed, the rest collapsed.
    pub fn new(questions: Vec<String>) -> Self {
        let first = (!questions.is_empty()).then_some(0);
        Self {
            questions,
            reveal: Accordion::with_open(AccordionMode::Multiple, first),
            copied: None,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.reveal.is_open(&index)
    }

    /// Returns whether the question is now revealed. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.reveal.toggle(index)
    }

    /// The most recently copied question, until its mark expires.
    pub fn copied(&self) -> Option<usize> {
        self.copied
            .filter(|(_, at)| at.elapsed() < COPIED_MARK_DURATION)
            .map(|(index, _)| index)
    }

    pub fn clear_copied(&mut self) {
        self.copied = None;
    }

    pub fn copy(&mut self, index: usize, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
        let question = self
            .questions
            .get(index)
            .ok_or(ClipboardError::NoSuchQuestion(index))?;
        clipboard.write_text(question)?;
        self.copied = Some((index, Instant::now()));
        Ok(())
    }

    pub fn copy_all(&self, clipboard: &mut dyn Clipboard) -> Result<(), ClipboardError> {
        clipboard.write_text(&format_numbered(&self.questions))
    }

    pub fn items(&self) -> Vec<QuestionItem> {
        let copied = self.copied();
        self.questions
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionItem {
                number: i + 1,
                text: text.clone(),
                revealed: self.is_revealed(i),
                copied: copied == Some(i),
            })
            .collect()
    }
}

/// `"1. first\n\n2. second"`
pub fn format_numbered(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {q}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::strings;

    #[derive(Default)]
    pub(crate) struct MemoryClipboard {
        pub(crate) text: Option<String>,
        pub(crate) fail: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("permission denied".to_string()));
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn sheet() -> QuestionSheet {
        QuestionSheet::new(strings(&["Why Go?", "Why SQL?", "Why Kubernetes?"]))
    }

    #[test]
    fn test_first_question_revealed_by_default() {
        let sheet = sheet();
        assert!(sheet.is_revealed(0));
        assert!(!sheet.is_revealed(1));
    }

    #[test]
    fn test_questions_reveal_independently() {
        let mut sheet = sheet();
        assert!(sheet.toggle(2));
        assert!(sheet.is_revealed(0));
        assert!(sheet.is_revealed(2));
        assert!(!sheet.toggle(7));
    }

    #[test]
    fn test_copy_all_format() {
        let mut clipboard = MemoryClipboard::default();
        sheet().copy_all(&mut clipboard).unwrap();
        assert_eq!(
            clipboard.text.as_deref(),
            Some("1. Why Go?\n\n2. Why SQL?\n\n3. Why Kubernetes?")
        );
    }

    #[test]
    fn test_copy_marks_item() {
        let mut sheet = sheet();
        let mut clipboard = MemoryClipboard::default();

        sheet.copy(1, &mut clipboard).unwrap();

        assert_eq!(clipboard.text.as_deref(), Some("Why SQL?"));
        let items = sheet.items();
        assert!(items[1].copied);
        assert_eq!(items[1].number, 2);
        assert!(!items[0].copied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_copied_mark_expires() {
        let mut sheet = sheet();
        sheet.copy(0, &mut MemoryClipboard::default()).unwrap();

        tokio::time::advance(Duration::from_millis(1_900)).await;
        assert_eq!(sheet.copied(), Some(0));

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(sheet.copied(), None);
        assert!(sheet.items().iter().all(|item| !item.copied));
    }

    #[test]
    fn test_clear_copied() {
        let mut sheet = sheet();
        sheet.copy(2, &mut MemoryClipboard::default()).unwrap();
        sheet.clear_copied();
        assert_eq!(sheet.copied(), None);
    }

    #[test]
    fn test_copy_failure_leaves_sheet_unchanged() {
        let mut sheet = sheet();
        let mut clipboard = MemoryClipboard {
            fail: true,
            ..Default::default()
        };

        let err = sheet.copy(0, &mut clipboard).unwrap_err();

        assert!(matches!(err, ClipboardError::Unavailable(_)));
        assert_eq!(sheet.copied(), None);
    }

    #[test]
    fn test_copy_out_of_range() {
        let mut sheet = sheet();
        let err = sheet.copy(9, &mut MemoryClipboard::default()).unwrap_err();
        assert_eq!(err, ClipboardError::NoSuchQuestion(9));
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = QuestionSheet::new(Vec::new());
        assert!(sheet.is_empty());
        assert_eq!(format_numbered(&[]), "");
    }
}
