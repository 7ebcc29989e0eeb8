pub mod catalog;
pub mod editor;
pub mod taxonomy;

use itertools::Itertools;
use serde::Serialize;
use crate::entities::{HobbiesValue, Tag};
use crate::tags::taxonomy::{classify, Category, TAXONOMY};
use crate::utils::str_utils::StringExtensions;

pub use crate::tags::catalog::{suggest, COMMON_HOBBIES, MAX_SUGGESTIONS};
pub use crate::tags::editor::TagEditor;

pub const TAG_DELIMITER: char = ';';

/// Trims `raw`; `None` if nothing is left.
pub fn normalize(raw: &str) -> Option<Tag> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

pub fn parse(source: &HobbiesValue) -> Vec<Tag> {
    match source {
        HobbiesValue::List(list) => list.iter().filter_map(|x| normalize(x)).collect(),
        HobbiesValue::Delimited(text) => parse_delimited(text),
    }
}

pub fn parse_delimited(text: &str) -> Vec<Tag> {
    text.split(TAG_DELIMITER).filter_map(normalize).collect()
}

/// Ordered tag collection without duplicates or blank entries. Equality is exact,
/// so "Reading" and "reading" are distinct tags.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_source(source: Option<&HobbiesValue>) -> Self {
        let mut tags = Self::new();
        for tag in source.map(parse).unwrap_or_default() {
            tags.add(&tag);
        }
        tags
    }

    /// Returns `false` when `raw` is blank or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        match normalize(raw) {
            Some(tag) if !self.contains(&tag) => {
                self.0.push(tag);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        match self.0.iter().position(|x| x == tag) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|x| x == tag)
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

pub fn add_tag(tags: &TagSet, raw: &str) -> TagSet {
    let mut next = tags.clone();
    next.add(raw);
    next
}

pub fn remove_tag(tags: &TagSet, tag: &str) -> TagSet {
    let mut next = tags.clone();
    next.remove(tag);
    next
}

/// What a confirm keystroke commits: the top suggestion when it completes what was
/// typed, otherwise the typed text itself.
pub fn confirm_choice(suggestions: &[String], typed: &str) -> String {
    match suggestions.first() {
        Some(top) if top.starts_with_ignore_case(typed) => top.clone(),
        _ => typed.to_string(),
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CategorizedTag {
    pub name: Tag,
    pub category: Category,
    pub accent: &'static str,
}

impl From<&Tag> for CategorizedTag {
    fn from(tag: &Tag) -> Self {
        let category = classify(tag);
        Self {
            name: tag.clone(),
            category,
            accent: category.accent(),
        }
    }
}

pub fn categorize(tags: &TagSet) -> Vec<CategorizedTag> {
    tags.iter().map(CategorizedTag::from).collect()
}

/// Tags bucketed by category, buckets in taxonomy order, tags in insertion order.
pub fn group_by_category(tags: &TagSet) -> Vec<(Category, Vec<Tag>)> {
    let mut groups = tags.iter().cloned().into_group_map_by(|x| classify(x));
    TAXONOMY.iter()
        .filter_map(|x| groups.remove(&x.category).map(|tags| (x.category, tags)))
        .collect()
}
