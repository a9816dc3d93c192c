//! Expand/collapse state for a list of items.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionMode {
    /// Opening an item closes every other item.
    Single,
    /// Items open and close independently.
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion<K: Ord + Clone> {
    mode: AccordionMode,
    initial: BTreeSet<K>,
    open: BTreeSet<K>,
}

impl<K: Ord + Clone> Accordion<K> {
    pub fn new(mode: AccordionMode) -> Self {
        Self::with_open(mode, std::iter::empty())
    }

    /// Starts with `open` expanded. In `Single` mode only the first key is kept.
    pub fn with_open(mode: AccordionMode, open: impl IntoIterator<Item = K>) -> Self {
        let mut initial: BTreeSet<K> = BTreeSet::new();
        for key in open {
            if mode == AccordionMode::Single && !initial.is_empty() {
                break;
            }
            initial.insert(key);
        }
        Self {
            mode,
            open: initial.clone(),
            initial,
        }
    }

    pub fn mode(&self) -> AccordionMode {
        self.mode
    }

    pub fn is_open(&self, key: &K) -> bool {
        self.open.contains(key)
    }

    /// Flips `key` and returns whether it is now open.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.open.remove(&key) {
            return false;
        }
        self.open(key);
        true
    }

    pub fn open(&mut self, key: K) {
        if self.mode == AccordionMode::Single {
            self.open.clear();
        }
        self.open.insert(key);
    }

    pub fn close(&mut self, key: &K) {
        self.open.remove(key);
    }

    pub fn close_all(&mut self) {
        self.open.clear();
    }

    /// Back to the open set given at construction.
    pub fn reset(&mut self) {
        self.open = self.initial.clone();
    }

    pub fn open_items(&self) -> impl Iterator<Item = &K> {
        self.open.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_mode_keeps_one_open() {
        let mut accordion = Accordion::new(AccordionMode::Single);
        accordion.toggle(1);
        accordion.toggle(2);

        assert!(!accordion.is_open(&1));
        assert!(accordion.is_open(&2));
        assert_eq!(accordion.open_items().count(), 1);
    }

    #[test]
    fn test_multiple_mode_toggles_independently() {
        let mut accordion = Accordion::new(AccordionMode::Multiple);
        assert!(accordion.toggle(1));
        assert!(accordion.toggle(2));
        assert!(!accordion.toggle(1));

        assert!(!accordion.is_open(&1));
        assert!(accordion.is_open(&2));
    }

    #[test]
    fn test_toggling_open_item_closes_it_in_single_mode() {
        let mut accordion = Accordion::with_open(AccordionMode::Single, ["a"]);
        assert!(!accordion.toggle("a"));
        assert_eq!(accordion.open_items().count(), 0);
    }

    #[test]
    fn test_single_mode_initial_set_keeps_first_key() {
        let accordion = Accordion::with_open(AccordionMode::Single, [3, 1]);
        assert!(accordion.is_open(&3));
        assert!(!accordion.is_open(&1));
    }

    #[test]
    fn test_reset_restores_initial_open_set() {
        let mut accordion = Accordion::with_open(AccordionMode::Multiple, [0]);
        accordion.toggle(0);
        accordion.toggle(4);

        accordion.reset();

        assert_eq!(accordion.open_items().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_close_all() {
        let mut accordion = Accordion::with_open(AccordionMode::Multiple, [0, 1, 2]);
        accordion.close(&1);
        assert_eq!(accordion.open_items().count(), 2);
        accordion.close_all();
        assert!(!accordion.is_open(&0));
    }
}
