use crate::utils::str_utils::StringExtensions;

pub const MAX_SUGGESTIONS: usize = 5;

pub const COMMON_HOBBIES: &[&str] = &[
    "Reading", "Running", "Swimming", "Cooking", "Baking", "Painting",
    "Photography", "Hiking", "Gardening", "Yoga", "Meditation", "Cycling",
    "Playing Guitar", "Piano", "Singing", "Dancing", "Writing", "Traveling",
    "Fishing", "Camping", "Basketball", "Soccer", "Tennis", "Golf",
    "Video Games", "Programming", "Chess", "Puzzles", "Watching Movies",
    "Collecting Stamps", "Knitting", "Sewing", "Woodworking",
];

/// Catalog entries containing `partial_input` (case-insensitive), minus the ones
/// already selected, capped at [`MAX_SUGGESTIONS`] and kept in catalog order.
pub fn suggest<S: AsRef<str>>(catalog: &[&str], partial_input: &str, already_selected: &[S]) -> Vec<String> {
    let input = partial_input.trim();
    if input.is_empty() {
        return vec![];
    }
    catalog.iter()
        .filter(|x| x.contains_ignore_case(input))
        .filter(|x| !already_selected.iter().any(|selected| selected.as_ref() == **x))
        .take(MAX_SUGGESTIONS)
        .map(|x| x.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_suggest_substring() {
        let suggestions = suggest(COMMON_HOBBIES, "gui", NONE);
        assert_eq!(suggestions, vec!["Playing Guitar"]);
        let suggestions = suggest(COMMON_HOBBIES, "  GUI ", NONE);
        assert_eq!(suggestions, vec!["Playing Guitar"]);
    }

    #[test]
    fn test_suggest_excludes_selected() {
        let suggestions = suggest(COMMON_HOBBIES, "gui", &["Playing Guitar"]);
        assert!(suggestions.is_empty());
        // exact match only: a differently cased tag does not hide the entry
        let suggestions = suggest(COMMON_HOBBIES, "gui", &["playing guitar"]);
        assert_eq!(suggestions, vec!["Playing Guitar"]);
    }

    #[test]
    fn test_suggest_empty_input() {
        assert!(suggest(COMMON_HOBBIES, "", NONE).is_empty());
        assert!(suggest(COMMON_HOBBIES, "   ", NONE).is_empty());
    }

    #[test]
    fn test_suggest_caps_and_keeps_order() {
        // "ing" matches most of the catalog
        let suggestions = suggest(COMMON_HOBBIES, "ing", NONE);
        assert_eq!(suggestions, vec!["Reading", "Running", "Swimming", "Cooking", "Baking"]);

        let selected = vec!["Reading".to_string(), "Cooking".to_string()];
        let suggestions = suggest(COMMON_HOBBIES, "ing", &selected);
        assert_eq!(suggestions, vec!["Running", "Swimming", "Baking", "Painting", "Hiking"]);
    }

    #[test]
    fn test_suggest_never_exceeds_cap() {
        let big_catalog = (0..100).map(|i| format!("Hobby {}", i)).collect::<Vec<String>>();
        let big_catalog = big_catalog.iter().map(String::as_str).collect::<Vec<&str>>();
        for input in ["h", "hobby", "1", "9"] {
            assert!(suggest(&big_catalog, input, NONE).len() <= MAX_SUGGESTIONS);
        }
        assert_eq!(suggest(&big_catalog, "hobby", NONE).len(), MAX_SUGGESTIONS);
    }
}
