pub trait StringExtensions {
    /// Case-insensitive substring test. Both sides are lower-cased, so
    /// `"Playing Guitar".contains_ignore_case("GUI")` holds.
    fn contains_ignore_case(&self, needle: &str) -> bool;

    /// Case-insensitive prefix test.
    fn starts_with_ignore_case(&self, prefix: &str) -> bool;
}

impl StringExtensions for str {
    fn contains_ignore_case(&self, needle: &str) -> bool {
        self.to_lowercase().contains(&needle.to_lowercase())
    }

    fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

#[test]
fn test_contains_ignore_case() {
    assert!("Playing Guitar".contains_ignore_case("gui"));
    assert!("Playing Guitar".contains_ignore_case("PLAYING g"));
    assert!(!"Playing Guitar".contains_ignore_case("piano"));
}

#[test]
fn test_starts_with_ignore_case() {
    assert!("Photography".starts_with_ignore_case("photo"));
    assert!("Photography".starts_with_ignore_case(""));
    assert!(!"Playing Guitar".starts_with_ignore_case("guitar"));
}
