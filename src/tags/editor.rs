use log::debug;
use crate::entities::Tag;
use crate::tags::catalog::{suggest, COMMON_HOBBIES};
use crate::tags::{categorize, confirm_choice, CategorizedTag, TagSet};

/// In-session state of the hobby input: the selected tags, what is currently typed,
/// and the suggestions derived from both.
#[derive(Debug, Clone)]
pub struct TagEditor {
    catalog: &'static [&'static str],
    tags: TagSet,
    partial_input: String,
    suggestions: Vec<String>,
    show_suggestions: bool,
}

impl TagEditor {
    pub fn new(tags: TagSet) -> Self {
        Self::with_catalog(tags, COMMON_HOBBIES)
    }

    pub fn with_catalog(tags: TagSet, catalog: &'static [&'static str]) -> Self {
        Self {
            catalog,
            tags,
            partial_input: String::new(),
            suggestions: vec![],
            show_suggestions: false,
        }
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn partial_input(&self) -> &str {
        &self.partial_input
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_showing_suggestions(&self) -> bool {
        self.show_suggestions && !self.suggestions.is_empty()
    }

    pub fn categorized(&self) -> Vec<CategorizedTag> {
        categorize(&self.tags)
    }

    pub fn set_partial_input(&mut self, input: &str) {
        self.partial_input = input.to_string();
        self.show_suggestions = true;
        self.refresh_suggestions();
    }

    pub fn dismiss_suggestions(&mut self) {
        self.show_suggestions = false;
    }

    /// Adds `raw` as a tag. Blank and duplicate input is ignored and leaves the typed
    /// text in place.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let added = self.tags.add(raw);
        if added {
            debug!("tag added: {}", raw.trim());
            self.partial_input.clear();
        } else {
            debug!("tag ignored: {:?}", raw);
        }
        self.refresh_suggestions();
        added
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let removed = self.tags.remove(tag);
        if removed {
            debug!("tag removed: {}", tag);
            self.refresh_suggestions();
        }
        removed
    }

    /// Handles a confirm keystroke on the current input.
    pub fn confirm(&mut self) -> bool {
        if self.partial_input.trim().is_empty() {
            return false;
        }
        let choice = confirm_choice(&self.suggestions, &self.partial_input);
        self.add_tag(&choice)
    }

    /// Replaces the tag set, e.g. after a reload or a cancelled edit.
    pub fn reset(&mut self, tags: TagSet) {
        self.tags = tags;
        self.partial_input.clear();
        self.show_suggestions = false;
        self.refresh_suggestions();
    }

    pub fn to_persisted(&self) -> Vec<Tag> {
        self.tags.as_slice().to_vec()
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggest(self.catalog, &self.partial_input, self.tags.as_slice());
    }
}

impl Default for TagEditor {
    fn default() -> Self {
        Self::new(TagSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_updates_suggestions() {
        let mut editor = TagEditor::default();
        editor.set_partial_input("gui");
        assert_eq!(editor.suggestions(), &["Playing Guitar"]);
        assert!(editor.is_showing_suggestions());
        editor.set_partial_input("");
        assert!(editor.suggestions().is_empty());
        assert!(!editor.is_showing_suggestions());
    }

    #[test]
    fn test_confirm_prefers_completing_suggestion() {
        let mut editor = TagEditor::default();
        editor.set_partial_input("photo");
        assert!(editor.confirm());
        assert_eq!(editor.tags().as_slice(), &["Photography"]);
        assert_eq!(editor.partial_input(), "");
        assert!(editor.suggestions().is_empty());
    }

    #[test]
    fn test_confirm_falls_back_to_typed_text() {
        let mut editor = TagEditor::default();
        // top suggestion "Playing Guitar" does not start with "guitar"
        editor.set_partial_input("guitar");
        assert!(editor.confirm());
        assert_eq!(editor.tags().as_slice(), &["guitar"]);

        editor.set_partial_input("  Ukulele ");
        assert!(editor.confirm());
        assert_eq!(editor.tags().as_slice(), &["guitar", "Ukulele"]);
    }

    #[test]
    fn test_confirm_on_blank_input() {
        let mut editor = TagEditor::default();
        editor.set_partial_input("   ");
        assert!(!editor.confirm());
        assert!(editor.tags().is_empty());
    }

    #[test]
    fn test_duplicate_add_keeps_input() {
        let mut editor = TagEditor::default();
        assert!(editor.add_tag("Chess"));
        editor.set_partial_input("Chess");
        assert!(!editor.confirm());
        assert_eq!(editor.partial_input(), "Chess");
        assert_eq!(editor.tags().len(), 1);
    }

    #[test]
    fn test_selected_tags_leave_suggestions() {
        let mut editor = TagEditor::default();
        editor.set_partial_input("gui");
        assert!(editor.add_tag("Playing Guitar"));
        editor.set_partial_input("gui");
        assert!(editor.suggestions().is_empty());
        assert!(editor.remove_tag("Playing Guitar"));
        assert_eq!(editor.suggestions(), &["Playing Guitar"]);
    }

    #[test]
    fn test_dismiss_and_reset() {
        let mut editor = TagEditor::default();
        editor.add_tag("Golf");
        editor.set_partial_input("read");
        editor.dismiss_suggestions();
        assert!(!editor.is_showing_suggestions());
        assert_eq!(editor.suggestions(), &["Reading"]);

        let mut tags = TagSet::new();
        tags.add("Chess");
        editor.reset(tags);
        assert_eq!(editor.to_persisted(), vec!["Chess"]);
        assert_eq!(editor.partial_input(), "");
    }
}
