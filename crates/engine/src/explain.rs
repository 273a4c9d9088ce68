//! Explanation generator.
//!
//! Compares the metadata of a base item and a recommended candidate and
//! renders the shared attributes as a few templated sentences, followed by
//! a shortened candidate description.
//!
//! ## Signals
//! 1. Shared categories (case-insensitive)
//! 2. Shared lead contributor (exact match)
//! 3. Shared cast members (case-insensitive)
//! 4. Description token overlap, computed but not rendered
//!
//! Each signal only contributes text when it is non-empty; with no signal
//! at all the generic fallback sentence is used.

use crate::text::{description_tokens, title_case, truncate_description};
use metadata::ItemMetadata;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Used when no comparison signal produced text
pub const FALLBACK_EXPLANATION: &str =
    "Recommendations are based on content similarity (genre, themes, plot and crew).";

/// Default maximum length of the appended candidate description
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 180;

/// Default number of shared cast members named
pub const DEFAULT_MAX_SHARED_CAST: usize = 2;

/// What two items have in common
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSignals {
    /// Title-cased, sorted
    pub shared_categories: Vec<String>,
    pub shared_lead_contributor: Option<String>,
    /// Title-cased, in the base item's billing order
    pub shared_cast: Vec<String>,
    pub description_overlap: BTreeSet<String>,
}

impl ComparisonSignals {
    /// Rendered sentences (without trailing periods), in display order
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if !self.shared_categories.is_empty() {
            reasons.push(format!(
                "Both movies share genres: {}",
                self.shared_categories.join(", ")
            ));
        }
        if let Some(name) = &self.shared_lead_contributor {
            reasons.push(format!("Both are directed by {}", name));
        }
        if !self.shared_cast.is_empty() {
            reasons.push(format!("Shared cast: {}", self.shared_cast.join(", ")));
        }
        reasons
    }
}

/// Builds explanations from pairs of `ItemMetadata`
#[derive(Debug, Clone)]
pub struct ExplanationGenerator {
    description_limit: usize,
    max_shared_cast: usize,
}

impl Default for ExplanationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplanationGenerator {
    pub fn new() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            max_shared_cast: DEFAULT_MAX_SHARED_CAST,
        }
    }

    /// Configure the description length limit (default: 180)
    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.description_limit = limit;
        self
    }

    /// Configure how many shared cast members are named (default: 2)
    pub fn with_max_shared_cast(mut self, max: usize) -> Self {
        self.max_shared_cast = max;
        self
    }

    /// Compute every comparison signal between `base` and `candidate`
    pub fn compare(&self, base: &ItemMetadata, candidate: &ItemMetadata) -> ComparisonSignals {
        let shared_categories = {
            let base_categories = folded_set(&base.categories);
            let shared: BTreeSet<String> = folded_set(&candidate.categories)
                .intersection(&base_categories)
                .map(|c| title_case(c))
                .collect();
            shared.into_iter().collect()
        };

        let shared_lead_contributor = match (&base.lead_contributor, &candidate.lead_contributor) {
            (Some(a), Some(b)) if !a.trim().is_empty() && a == b => Some(a.clone()),
            _ => None,
        };

        let shared_cast = {
            let candidate_cast = folded_set(&candidate.cast);
            let mut seen = HashSet::new();
            base.cast
                .iter()
                .map(|name| name.trim().to_lowercase())
                .filter(|name| candidate_cast.contains(name) && seen.insert(name.clone()))
                .take(self.max_shared_cast)
                .map(|name| title_case(&name))
                .collect()
        };

        let description_overlap: BTreeSet<String> = description_tokens(&base.description)
            .intersection(&description_tokens(&candidate.description))
            .cloned()
            .collect();

        ComparisonSignals {
            shared_categories,
            shared_lead_contributor,
            shared_cast,
            description_overlap,
        }
    }

    /// Render signals plus the candidate's shortened description
    pub fn render(&self, signals: &ComparisonSignals, candidate: &ItemMetadata) -> String {
        let reasons = signals.reasons();
        let mut explanation = if reasons.is_empty() {
            FALLBACK_EXPLANATION.to_string()
        } else {
            format!("{}.", reasons.join(". "))
        };

        let short = truncate_description(&candidate.description, self.description_limit);
        if !short.is_empty() {
            explanation.push(' ');
            explanation.push_str(&short);
        }
        explanation
    }

    /// Explain why `candidate` was recommended for `base`
    pub fn explain(&self, base: &ItemMetadata, candidate: &ItemMetadata) -> String {
        let signals = self.compare(base, candidate);
        trace!(
            base_id = base.id,
            candidate_id = candidate.id,
            overlap = ?signals.description_overlap,
            "Description token overlap"
        );
        self.render(&signals, candidate)
    }
}

/// Lower-cased, trimmed, non-empty names
fn folded_set(names: &[String]) -> HashSet<String> {
    names
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_knight() -> ItemMetadata {
        ItemMetadata::new(155, "The Dark Knight")
            .with_categories(["Drama", "Action", "Crime", "Thriller"])
            .with_description("Batman raises the stakes in his war on crime.")
            .with_lead_contributor("Christopher Nolan")
            .with_cast([
                "Christian Bale",
                "Heath Ledger",
                "Aaron Eckhart",
                "Michael Caine",
                "Maggie Gyllenhaal",
            ])
    }

    fn dark_knight_rises() -> ItemMetadata {
        ItemMetadata::new(49026, "The Dark Knight Rises")
            .with_categories(["Action", "Crime", "Drama", "Thriller"])
            .with_description("Following the death of District Attorney Harvey Dent, Batman assumes responsibility for Dent's crimes.")
            .with_lead_contributor("Christopher Nolan")
            .with_cast([
                "Christian Bale",
                "Michael Caine",
                "Gary Oldman",
                "Anne Hathaway",
                "Tom Hardy",
            ])
    }

    #[test]
    fn test_shared_genre_example() {
        let base = ItemMetadata::new(1, "Base").with_categories(["Action", "Drama"]);
        let candidate = ItemMetadata::new(2, "Candidate").with_categories(["drama", "Comedy"]);

        let explanation = ExplanationGenerator::new().explain(&base, &candidate);
        assert_eq!(explanation, "Both movies share genres: Drama.");
    }

    #[test]
    fn test_full_explanation() {
        let generator = ExplanationGenerator::new();
        let explanation = generator.explain(&dark_knight(), &dark_knight_rises());

        assert_eq!(
            explanation,
            "Both movies share genres: Action, Crime, Drama, Thriller. \
             Both are directed by Christopher Nolan. \
             Shared cast: Christian Bale, Michael Caine. \
             Following the death of District Attorney Harvey Dent, Batman assumes responsibility for Dent's crimes."
        );
    }

    #[test]
    fn test_self_comparison_never_falls_back() {
        let meta = dark_knight();
        let generator = ExplanationGenerator::new();
        let signals = generator.compare(&meta, &meta);

        assert_eq!(signals.shared_categories.len(), 4);
        assert_eq!(signals.shared_lead_contributor.as_deref(), Some("Christopher Nolan"));

        let explanation = generator.explain(&meta, &meta);
        assert!(!explanation.contains(FALLBACK_EXPLANATION));
        assert!(explanation.starts_with("Both movies share genres:"));
    }

    #[test]
    fn test_fallback_when_nothing_shared() {
        let base = ItemMetadata::new(1, "Base").with_categories(["Horror"]);
        let candidate = ItemMetadata::new(2, "Candidate")
            .with_categories(["Family"])
            .with_description("A   heartwarming\ntale.");

        let explanation = ExplanationGenerator::new().explain(&base, &candidate);
        assert_eq!(explanation, format!("{} A heartwarming tale.", FALLBACK_EXPLANATION));
    }

    #[test]
    fn test_empty_metadata_degrades_to_fallback() {
        let explanation =
            ExplanationGenerator::new().explain(&ItemMetadata::default(), &ItemMetadata::default());
        assert_eq!(explanation, FALLBACK_EXPLANATION);
    }

    #[test]
    fn test_director_requires_both_and_exact_match() {
        let generator = ExplanationGenerator::new();
        let base = ItemMetadata::new(1, "Base").with_lead_contributor("Ridley Scott");

        let missing = ItemMetadata::new(2, "Candidate");
        assert!(generator.compare(&base, &missing).shared_lead_contributor.is_none());

        let different_case = ItemMetadata::new(3, "Candidate").with_lead_contributor("ridley scott");
        assert!(generator.compare(&base, &different_case).shared_lead_contributor.is_none());

        let same = ItemMetadata::new(4, "Candidate").with_lead_contributor("Ridley Scott");
        assert_eq!(
            generator.explain(&base, &same),
            "Both are directed by Ridley Scott."
        );
    }

    #[test]
    fn test_shared_cast_is_case_insensitive_and_bounded() {
        let base = ItemMetadata::new(1, "Base").with_cast(["Tom Hanks", "Meg Ryan", "Bill Pullman"]);
        let candidate =
            ItemMetadata::new(2, "Candidate").with_cast(["BILL PULLMAN", "meg ryan", "tom hanks"]);

        let generator = ExplanationGenerator::new();
        let signals = generator.compare(&base, &candidate);
        assert_eq!(signals.shared_cast, vec!["Tom Hanks", "Meg Ryan"]);

        let wider = generator.clone().with_max_shared_cast(5);
        assert_eq!(wider.compare(&base, &candidate).shared_cast.len(), 3);
    }

    #[test]
    fn test_blank_names_are_ignored() {
        let base = ItemMetadata::new(1, "Base")
            .with_categories(["", " "])
            .with_lead_contributor("")
            .with_cast([""]);
        let candidate = base.clone();

        let signals = ExplanationGenerator::new().compare(&base, &candidate);
        assert!(signals.reasons().is_empty());
    }

    #[test]
    fn test_description_overlap_is_computed_but_not_rendered() {
        let base = ItemMetadata::new(1, "Base").with_description("A heist across Gotham.");
        let candidate =
            ItemMetadata::new(2, "Candidate").with_description("Another heist, in Gotham!");

        let generator = ExplanationGenerator::new();
        let signals = generator.compare(&base, &candidate);
        let expected: BTreeSet<String> = ["heist", "gotham"].into_iter().map(String::from).collect();
        assert_eq!(signals.description_overlap, expected);

        let explanation = generator.render(&signals, &candidate);
        assert_eq!(explanation, format!("{} Another heist, in Gotham!", FALLBACK_EXPLANATION));
    }

    #[test]
    fn test_long_description_is_truncated() {
        let candidate = ItemMetadata::new(2, "Candidate").with_description("word ".repeat(100));
        let generator = ExplanationGenerator::new().with_description_limit(20);

        let explanation = generator.explain(&ItemMetadata::default(), &candidate);
        assert_eq!(
            explanation,
            format!("{} word word word word...", FALLBACK_EXPLANATION)
        );
    }
}
