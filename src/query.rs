//! Lesson search, filtering and sorting.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{Lesson, LessonType, Level};

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Default,
    Rating,
    Duration,
    Completion,
    Recent,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Default,
        Self::Rating,
        Self::Duration,
        Self::Completion,
        Self::Recent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Rating => "rating",
            Self::Duration => "duration",
            Self::Completion => "completion",
            Self::Recent => "recent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Rating => "Highest Rated",
            Self::Duration => "Duration",
            Self::Completion => "Completion Rate",
            Self::Recent => "Recently Viewed",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Default => Self::Rating,
            Self::Rating => Self::Duration,
            Self::Duration => Self::Completion,
            Self::Completion => Self::Recent,
            Self::Recent => Self::Default,
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current search, filter and sort selections. `None` filters mean "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub search: String,
    pub level: Option<Level>,
    pub kind: Option<LessonType>,
    pub tags: BTreeSet<String>,
    pub sort: SortKey,
}

impl QueryParams {
    /// Add the tag if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    /// Whether anything besides the sort order narrows the result.
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.level.is_some() || self.kind.is_some() || !self.tags.is_empty()
    }

    fn matches(&self, lesson: &Lesson, needle: &str) -> bool {
        matches_search(lesson, needle)
            && self.level.map_or(true, |level| lesson.level == level)
            && self.kind.map_or(true, |kind| lesson.kind == kind)
            && self.tags.iter().all(|tag| lesson.has_tag(tag))
    }
}

/// `needle` must already be lowercase.
fn matches_search(lesson: &Lesson, needle: &str) -> bool {
    needle.is_empty()
        || lesson.title.to_lowercase().contains(needle)
        || lesson.description.to_lowercase().contains(needle)
        || lesson.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Filter `catalog` by `params`, then sort the survivors.
///
/// The sort is stable, so lessons with equal keys keep their catalog order.
/// `recently_viewed` is most-recent-first and only matters for
/// [`SortKey::Recent`]; lessons missing from it go to the end.
pub fn query<'a>(
    catalog: &'a [Lesson],
    params: &QueryParams,
    recently_viewed: &[u32],
) -> Vec<&'a Lesson> {
    let needle = params.search.to_lowercase();

    let mut results: Vec<&Lesson> = catalog
        .iter()
        .filter(|lesson| params.matches(lesson, &needle))
        .collect();

    match params.sort {
        SortKey::Default => {}
        SortKey::Rating => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Duration => {
            results.sort_by_key(|lesson| parse_minutes(&lesson.duration));
        }
        SortKey::Completion => {
            results.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));
        }
        SortKey::Recent => {
            let rank = |lesson: &Lesson| {
                recently_viewed
                    .iter()
                    .position(|&id| id == lesson.id)
                    .unwrap_or(usize::MAX)
            };
            results.sort_by_key(|lesson| rank(lesson));
        }
    }

    results
}

/// Leading integer of a duration like "30 min". No leading digits gives 0;
/// values too large for `u32` saturate at `u32::MAX`.
pub fn parse_minutes(duration: &str) -> u32 {
    duration
        .trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}

/// Every tag in the catalog, once, in order of first appearance.
pub fn all_tags(catalog: &[Lesson]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    catalog
        .iter()
        .flat_map(|lesson| lesson.tags.iter().map(String::as_str))
        .filter(|tag| seen.insert(*tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundled_catalog;

    fn ids(results: &[&Lesson]) -> Vec<u32> {
        results.iter().map(|l| l.id).collect()
    }

    fn lesson(id: u32, rating: f32, duration: &str) -> Lesson {
        Lesson {
            id,
            title: format!("Lesson {}", id),
            description: String::new(),
            kind: LessonType::Grammar,
            level: Level::Beginner,
            duration: duration.to_string(),
            tags: Vec::new(),
            rating,
            completion_rate: 50,
            is_new: false,
        }
    }

    #[test]
    fn default_params_return_catalog_order() {
        let catalog = bundled_catalog().unwrap();
        let results = query(&catalog, &QueryParams::default(), &[]);
        assert_eq!(ids(&results), vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_gram_finds_basic_grammar_only() {
        let catalog = bundled_catalog().unwrap();
        let params = QueryParams {
            search: "gram".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![1]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = bundled_catalog().unwrap();

        let title = QueryParams {
            search: "BUSINESS".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &title, &[])), vec![3]);

        let description = QueryParams {
            search: "Word Stress".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &description, &[])), vec![4]);

        let tag = QueryParams {
            search: "accen".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &tag, &[])), vec![4]);
    }

    #[test]
    fn speaking_tag_selects_lessons_two_and_four() {
        let catalog = bundled_catalog().unwrap();
        let mut params = QueryParams::default();
        params.toggle_tag("speaking");
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![2, 4]);
    }

    #[test]
    fn tag_filter_requires_every_selected_tag() {
        let mut catalog = vec![lesson(1, 3.0, "10 min")];
        catalog[0].tags = vec!["a".into(), "b".into(), "c".into()];

        let mut params = QueryParams::default();
        params.toggle_tag("a");
        params.toggle_tag("b");
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![1]);

        params.toggle_tag("b");
        params.toggle_tag("d");
        assert!(query(&catalog, &params, &[]).is_empty());
    }

    #[test]
    fn level_and_type_filters() {
        let catalog = bundled_catalog().unwrap();

        let intermediate = QueryParams {
            level: Some(Level::Intermediate),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &intermediate, &[])), vec![2, 4]);

        let speaking = QueryParams {
            kind: Some(LessonType::Speaking),
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &speaking, &[])), vec![2]);

        let none = QueryParams {
            level: Some(Level::Advanced),
            kind: Some(LessonType::Grammar),
            ..Default::default()
        };
        assert!(query(&catalog, &none, &[]).is_empty());
    }

    #[test]
    fn filters_are_independent_predicates() {
        let catalog = bundled_catalog().unwrap();
        let mut combined = QueryParams {
            search: "s".to_string(),
            level: Some(Level::Intermediate),
            ..Default::default()
        };
        combined.toggle_tag("speaking");

        // Intersecting the single-filter results gives the combined result.
        let singles = [
            QueryParams {
                search: "s".to_string(),
                ..Default::default()
            },
            QueryParams {
                level: Some(Level::Intermediate),
                ..Default::default()
            },
            QueryParams {
                tags: combined.tags.clone(),
                ..Default::default()
            },
        ];
        let expected: Vec<u32> = catalog
            .iter()
            .map(|l| l.id)
            .filter(|id| {
                singles
                    .iter()
                    .all(|p| ids(&query(&catalog, p, &[])).contains(id))
            })
            .collect();

        assert_eq!(ids(&query(&catalog, &combined, &[])), expected);
    }

    #[test]
    fn duration_sort_is_ascending_by_minutes() {
        let catalog = bundled_catalog().unwrap();
        let params = QueryParams {
            sort: SortKey::Duration,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![4, 1, 2, 3]);
    }

    #[test]
    fn rating_and_completion_sorts_are_descending() {
        let catalog = bundled_catalog().unwrap();

        let rating = QueryParams {
            sort: SortKey::Rating,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &rating, &[])), vec![2, 4, 3, 1]);

        let completion = QueryParams {
            sort: SortKey::Completion,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &completion, &[])), vec![2, 4, 1, 3]);
    }

    #[test]
    fn rating_sort_keeps_catalog_order_for_ties() {
        let catalog = vec![
            lesson(10, 4.0, "1 min"),
            lesson(11, 5.0, "1 min"),
            lesson(12, 4.0, "1 min"),
            lesson(13, 4.0, "1 min"),
        ];
        let params = QueryParams {
            sort: SortKey::Rating,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![11, 10, 12, 13]);
    }

    #[test]
    fn malformed_duration_sorts_as_zero() {
        let catalog = vec![
            lesson(1, 1.0, "15 min"),
            lesson(2, 1.0, "about an hour"),
            lesson(3, 1.0, "5 min"),
        ];
        let params = QueryParams {
            sort: SortKey::Duration,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![2, 3, 1]);
    }

    #[test]
    fn recent_sort_puts_unviewed_lessons_last() {
        let catalog = bundled_catalog().unwrap();
        let params = QueryParams {
            sort: SortKey::Recent,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[3, 1])), vec![3, 1, 2, 4]);
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![1, 2, 3, 4]);
    }

    #[test]
    fn sorting_does_not_change_the_filtered_set() {
        let catalog = bundled_catalog().unwrap();
        for sort in SortKey::ALL {
            let params = QueryParams {
                level: Some(Level::Intermediate),
                sort,
                ..Default::default()
            };
            let mut found = ids(&query(&catalog, &params, &[4]));
            found.sort_unstable();
            assert_eq!(found, vec![2, 4], "sort {}", sort);
        }
    }

    #[test]
    fn empty_catalog_gives_empty_result() {
        let params = QueryParams {
            search: "anything".to_string(),
            sort: SortKey::Rating,
            ..Default::default()
        };
        assert!(query(&[], &params, &[1, 2]).is_empty());
    }

    #[test]
    fn parse_minutes_reads_leading_integer() {
        assert_eq!(parse_minutes("30 min"), 30);
        assert_eq!(parse_minutes("  45min"), 45);
        assert_eq!(parse_minutes("min"), 0);
        assert_eq!(parse_minutes(""), 0);
        assert_eq!(parse_minutes("99999999999999 min"), u32::MAX);
        assert_eq!(parse_minutes("5000000000 min"), u32::MAX);
    }

    #[test]
    fn oversized_duration_sorts_last() {
        let catalog = vec![
            lesson(1, 4.0, "5000000000 min"),
            lesson(2, 4.0, "20 min"),
            lesson(3, 4.0, "n/a"),
        ];
        let params = QueryParams {
            sort: SortKey::Duration,
            ..Default::default()
        };
        assert_eq!(ids(&query(&catalog, &params, &[])), vec![3, 2, 1]);
    }

    #[test]
    fn all_tags_in_first_appearance_order() {
        let catalog = bundled_catalog().unwrap();
        let tags = all_tags(&catalog);
        assert_eq!(&tags[..4], &["basics", "grammar", "essential", "speaking"]);
        assert_eq!(tags.iter().filter(|t| **t == "speaking").count(), 1);
        assert_eq!(tags.len(), 11);
    }

    #[test]
    fn sort_key_cycles_and_parses() {
        let mut key = SortKey::Default;
        for _ in 0..SortKey::ALL.len() {
            key = key.next();
        }
        assert_eq!(key, SortKey::Default);
        assert_eq!("completion".parse::<SortKey>(), Ok(SortKey::Completion));
        assert!("newest".parse::<SortKey>().is_err());
    }
}
