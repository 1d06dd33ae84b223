//! Transient overlay and filter selection feeding marker reconciliation.

use crate::{
    data::entity::{Category, MapEntity, SearchPoint},
    prelude::HashSet,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which catalog categories are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Filter buttons in display order
    pub const CHOICES: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Residential),
        CategoryFilter::Only(Category::Landmark),
        CategoryFilter::Only(Category::Sightseeing),
    ];

    /// Unclassified entities only pass the `All` filter.
    pub fn matches(&self, entity: &MapEntity) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entity.category() == Some(*category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Only)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("ALL"),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

/// Data overlay requested by the host; presentational only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverlayType {
    #[default]
    None,
    Safety,
    Commerce,
}

/// Selection state for the lifetime of one map view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub category_filter: CategoryFilter,
    pub highlighted_ids: Vec<String>,
    pub search_results: Vec<SearchPoint>,
    pub overlay: OverlayType,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category_filter = filter;
    }

    pub fn set_highlighted_ids(&mut self, ids: Vec<String>) {
        self.highlighted_ids = ids;
    }

    pub fn set_search_results(&mut self, results: Vec<SearchPoint>) {
        self.search_results = results;
    }

    pub fn set_overlay(&mut self, overlay: OverlayType) {
        self.overlay = overlay;
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted_ids.iter().any(|highlighted| highlighted == id)
    }

    /// Search results with duplicate ids removed, first occurrence wins
    pub fn unique_search_results(&self) -> Vec<&SearchPoint> {
        let mut seen = HashSet::default();
        self.search_results
            .iter()
            .filter(|point| seen.insert(point.id.as_str()))
            .collect()
    }

    /// The most recently added result (last in the list, duplicates included)
    pub fn latest_search_result(&self) -> Option<&SearchPoint> {
        self.search_results.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::entity::CatalogEntity;

    #[test]
    fn test_filter_parsing_and_display() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Sightseeing".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Sightseeing)
        );
        assert!("parks".parse::<CategoryFilter>().is_err());
        assert_eq!(CategoryFilter::Only(Category::Landmark).to_string(), "LANDMARK");
        assert_eq!(CategoryFilter::All.to_string(), "ALL");
    }

    #[test]
    fn test_unclassified_only_passes_all() {
        let odd = MapEntity::from(CatalogEntity::new("x", "X", Category::Unclassified));
        assert!(CategoryFilter::All.matches(&odd));
        for filter in &CategoryFilter::CHOICES[1..] {
            assert!(!filter.matches(&odd));
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_and_latest_is_last() {
        let mut selection = SelectionState::new();
        selection.set_search_results(vec![
            SearchPoint::new("a", "first a"),
            SearchPoint::new("a", "second a"),
            SearchPoint::new("b", "b"),
            SearchPoint::new("a", "third a"),
        ]);

        let unique: Vec<_> = selection
            .unique_search_results()
            .into_iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(unique, vec!["first a", "b"]);
        assert_eq!(selection.latest_search_result().unwrap().label, "third a");
    }
}
