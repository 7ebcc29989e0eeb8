use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sports,
    Arts,
    Music,
    Outdoor,
    Technology,
    Reading,
    Culinary,
    Collecting,
    Entertainment,
    Wellness,
    Travel,
    Other,
}

pub struct CategoryDefinition {
    pub category: Category,
    pub accent: &'static str,
    /// Matched anywhere in the lowercased tag.
    pub keywords: &'static [&'static str],
    /// Matched only as a whole word, for keywords too short to match as substrings.
    pub words: &'static [&'static str],
}

/// Declaration order is the match order: the first category with a matching keyword wins.
pub const TAXONOMY: &[CategoryDefinition] = &[
    CategoryDefinition {
        category: Category::Sports,
        accent: "bg-orange-500",
        keywords: &["sport", "ball", "running", "swim", "tennis", "soccer", "basketball", "football", "volleyball", "baseball", "golf", "cycling", "gym", "fitness", "workout", "boxing", "martial"],
        words: &["run"],
    },
    CategoryDefinition {
        category: Category::Arts,
        accent: "bg-purple-500",
        keywords: &["art", "paint", "draw", "craft", "sketch", "photography", "design", "pottery", "sculpture", "creative", "writing", "knitting"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Music,
        accent: "bg-amber-700",
        keywords: &["music", "guitar", "piano", "sing", "drum", "bass", "violin", "instrument", "band", "concert", "compose", "dj"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Outdoor,
        accent: "bg-green-600",
        keywords: &["hike", "camp", "nature", "fish", "hunt", "garden", "outdoor", "climbing", "mountain", "beach", "surf"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Technology,
        accent: "bg-blue-600",
        keywords: &["tech", "code", "program", "computer", "game", "gaming", "robot", "software", "hardware", "develop"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Reading,
        accent: "bg-indigo-600",
        keywords: &["read", "book", "literature", "novel", "poetry", "writing", "blog"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Culinary,
        accent: "bg-red-500",
        keywords: &["cook", "bake", "food", "culinary", "recipe", "wine", "coffee", "beer", "taste", "kitchen"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Collecting,
        accent: "bg-yellow-600",
        keywords: &["collect", "stamp", "coin", "figure", "model", "antique", "vintage"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Entertainment,
        accent: "bg-pink-500",
        keywords: &["movie", "film", "tv", "show", "theater", "cinema", "series", "streaming", "actor", "actress"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Wellness,
        accent: "bg-teal-500",
        keywords: &["yoga", "meditate", "meditation", "wellness", "mindful", "health", "spiritual", "relax"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Travel,
        accent: "bg-cyan-600",
        keywords: &["travel", "adventure", "explore", "trip", "journey", "backpack", "tourist", "vacation"],
        words: &[],
    },
    CategoryDefinition {
        category: Category::Other,
        accent: "bg-gray-500",
        keywords: &[],
        words: &[],
    },
];

impl Category {
    pub fn definition(&self) -> &'static CategoryDefinition {
        TAXONOMY.iter()
            .find(|x| x.category == *self)
            .unwrap_or(&TAXONOMY[TAXONOMY.len() - 1])
    }

    pub fn accent(&self) -> &'static str {
        self.definition().accent
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Sports => "sports",
            Category::Arts => "arts",
            Category::Music => "music",
            Category::Outdoor => "outdoor",
            Category::Technology => "technology",
            Category::Reading => "reading",
            Category::Culinary => "culinary",
            Category::Collecting => "collecting",
            Category::Entertainment => "entertainment",
            Category::Wellness => "wellness",
            Category::Travel => "travel",
            Category::Other => "other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn classify(tag: &str) -> Category {
    let tag = tag.to_lowercase();
    let words = tag.split(|c: char| !c.is_alphanumeric()).collect::<Vec<&str>>();
    TAXONOMY.iter()
        .filter(|x| x.category != Category::Other)
        .find(|x| x.keywords.iter().any(|keyword| tag.contains(keyword)) || x.words.iter().any(|word| words.contains(word)))
        .map(|x| x.category)
        .unwrap_or(Category::Other)
}
