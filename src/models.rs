//! Data models for lessons and users.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Bundled lesson catalog shipped with the binary.
const BUNDLED_LESSONS: &str = include_str!("../assets/lessons.json");

/// Category of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Grammar,
    Speaking,
    Vocabulary,
    Pronunciation,
}

impl LessonType {
    pub const ALL: [LessonType; 4] = [
        Self::Grammar,
        Self::Speaking,
        Self::Vocabulary,
        Self::Pronunciation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Speaking => "speaking",
            Self::Vocabulary => "vocabulary",
            Self::Pronunciation => "pronunciation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Speaking => "Speaking",
            Self::Vocabulary => "Vocabulary",
            Self::Pronunciation => "Pronunciation",
        }
    }

    /// Step through an "all, then each type" filter cycle.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Grammar),
            Some(Self::Grammar) => Some(Self::Speaking),
            Some(Self::Speaking) => Some(Self::Vocabulary),
            Some(Self::Vocabulary) => Some(Self::Pronunciation),
            Some(Self::Pronunciation) => None,
        }
    }
}

impl FromStr for LessonType {
    type Err = String;

    /// Type names match exactly; "Grammar" is not a type, "grammar" is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown lesson type '{}'", s))
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty level, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Beginner),
            Some(Self::Beginner) => Some(Self::Intermediate),
            Some(Self::Intermediate) => Some(Self::Advanced),
            Some(Self::Advanced) => None,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown level '{}'", s))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single lesson in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: LessonType,
    pub level: Level,
    /// Display text such as "30 min".
    pub duration: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub rating: f32,
    pub completion_rate: u8,
    #[serde(default)]
    pub is_new: bool,
}

impl Lesson {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Parse and validate a catalog from JSON.
pub fn parse_catalog(json: &str) -> Result<Vec<Lesson>, CatalogError> {
    let lessons: Vec<Lesson> = serde_json::from_str(json)?;
    validate_catalog(&lessons)?;
    Ok(lessons)
}

/// The catalog bundled into the binary.
pub fn bundled_catalog() -> Result<Vec<Lesson>, CatalogError> {
    parse_catalog(BUNDLED_LESSONS)
}

fn validate_catalog(lessons: &[Lesson]) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();

    for lesson in lessons {
        if !ids.insert(lesson.id) {
            return Err(CatalogError::DuplicateId(lesson.id));
        }

        if !lesson.rating.is_finite() || !(0.0..=5.0).contains(&lesson.rating) {
            return Err(CatalogError::RatingOutOfRange {
                id: lesson.id,
                rating: lesson.rating,
            });
        }

        if lesson.completion_rate > 100 {
            return Err(CatalogError::CompletionOutOfRange {
                id: lesson.id,
                rate: lesson.completion_rate,
            });
        }

        let mut tags = HashSet::new();
        for tag in &lesson.tags {
            if !tags.insert(tag.as_str()) {
                return Err(CatalogError::DuplicateTag {
                    id: lesson.id,
                    tag: tag.clone(),
                });
            }
        }
    }

    Ok(())
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}
