use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterestEntry {
    pub label: &'static str,
    pub aliases: &'static [&'static str],
    pub categories: &'static [&'static str],
}

impl InterestEntry {
    fn matches(&self, normalized: &str) -> bool {
        self.label == normalized || self.aliases.iter().any(|alias| *alias == normalized)
    }

    /// Category terms joined with `|`, read by the place search as alternatives.
    pub fn query_terms(&self) -> String {
        self.categories.join("|")
    }
}

const STANDARD_ENTRIES: &[InterestEntry] = &[
    InterestEntry {
        label: "culture",
        aliases: &["culture/history", "history", "문화/역사"],
        categories: &["museum", "art_gallery", "historical_landmark"],
    },
    InterestEntry {
        label: "nature",
        aliases: &["nature/scenery", "scenery", "자연/풍경"],
        categories: &["park", "tourist_attraction"],
    },
    InterestEntry {
        label: "food",
        aliases: &["food/restaurants", "restaurants", "맛집/음식"],
        categories: &["restaurant", "cafe"],
    },
    InterestEntry {
        label: "shopping",
        aliases: &["쇼핑"],
        categories: &["shopping_mall", "store"],
    },
];

/// Closed table of interest labels and the place categories they search for.
#[derive(Debug, Clone)]
pub struct InterestCatalog {
    entries: Vec<InterestEntry>,
}

impl Default for InterestCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl InterestCatalog {
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_ENTRIES.to_vec(),
        }
    }

    pub fn with_entries(entries: Vec<InterestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[InterestEntry] {
        &self.entries
    }

    pub fn lookup(&self, interest: &str) -> Option<&InterestEntry> {
        let normalized = interest.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.matches(&normalized))
    }

    /// Category query for an interest label; `None` for labels outside the catalog.
    pub fn category_query(&self, interest: &str) -> Option<String> {
        self.lookup(interest).map(InterestEntry::query_terms)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.label).collect()
    }
}
