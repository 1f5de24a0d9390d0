use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic unit of generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub content: String,
}

impl ContentItem {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A literary review with optional attribution metadata.
///
/// Absent metadata is `None`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContent {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ReviewContent {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: None,
            tag: None,
            source: None,
        }
    }

    /// Drop the metadata, keeping title and content
    #[must_use]
    pub fn into_item(self) -> ContentItem {
        ContentItem {
            title: self.title,
            content: self.content,
        }
    }
}

impl From<ContentItem> for ReviewContent {
    fn from(item: ContentItem) -> Self {
        Self::new(item.title, item.content)
    }
}

/// The three generated items for one calendar date.
///
/// `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBundle {
    pub date: NaiveDate,
    pub review: ReviewContent,
    pub concept: ContentItem,
    pub question: ContentItem,
}

impl DailyBundle {
    /// Bundle whose three sections all carry the same title and content
    #[must_use]
    pub fn uniform(date: NaiveDate, title: &str, content: &str) -> Self {
        Self {
            date,
            review: ReviewContent::new(title, content),
            concept: ContentItem::new(title, content),
            question: ContentItem::new(title, content),
        }
    }

    /// Name of the first required field that is empty or whitespace-only,
    /// using the flat `section_field` naming of the stored record.
    #[must_use]
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("review_title", &self.review.title),
            ("review_content", &self.review.content),
            ("concept_title", &self.concept.title),
            ("concept_content", &self.concept.content),
            ("question_title", &self.question.title),
            ("question_content", &self.question.content),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// What the presentation layer receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPair {
    pub today: DailyBundle,
    pub yesterday: DailyBundle,
}

/// One of the three fixed prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Review,
    Concept,
    Question,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [Self::Review, Self::Concept, Self::Question];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Concept => "concept",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated model output, tagged by the prompt kind that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent {
    Review(ReviewContent),
    Concept(ContentItem),
    Question(ContentItem),
}

impl GeneratedContent {
    #[must_use]
    pub fn kind(&self) -> PromptKind {
        match self {
            Self::Review(_) => PromptKind::Review,
            Self::Concept(_) => PromptKind::Concept,
            Self::Question(_) => PromptKind::Question,
        }
    }

    #[must_use]
    pub fn into_review(self) -> ReviewContent {
        match self {
            Self::Review(review) => review,
            Self::Concept(item) | Self::Question(item) => item.into(),
        }
    }

    #[must_use]
    pub fn into_item(self) -> ContentItem {
        match self {
            Self::Review(review) => review.into_item(),
            Self::Concept(item) | Self::Question(item) => item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_bundle_serializes_iso_date_and_omits_absent_metadata() {
        let bundle = DailyBundle::uniform(date("2025-05-20"), "t", "c");
        let json = serde_json::to_value(&bundle).unwrap();

        assert_eq!(json["date"], "2025-05-20");
        assert_eq!(json["review"]["title"], "t");
        let review = json["review"].as_object().unwrap();
        assert!(!review.contains_key("author"));
        assert!(!review.contains_key("tag"));
        assert!(!review.contains_key("source"));
    }

    #[test]
    fn test_blank_field_names_first_empty_required_value() {
        let mut bundle = DailyBundle::uniform(date("2025-05-20"), "t", "c");
        bundle.review.author = Some(String::new());
        assert_eq!(bundle.blank_field(), None);

        bundle.concept.content = " \n".to_string();
        bundle.question.title = String::new();
        assert_eq!(bundle.blank_field(), Some("concept_content"));
        assert_eq!(
            DailyBundle::uniform(date("2025-05-20"), "", "c").blank_field(),
            Some("review_title")
        );
    }

    #[test]
    fn test_review_metadata_round_trips_through_json() {
        let mut review = ReviewContent::new("红楼梦评", "内容");
        review.author = Some("林清".to_string());
        let json = serde_json::to_string(&review).unwrap();
        let back: ReviewContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, review);
        assert!(back.tag.is_none());
    }

    #[test]
    fn test_generated_content_conversions() {
        let concept = GeneratedContent::Concept(ContentItem::new("意象", "..."));
        assert_eq!(concept.kind(), PromptKind::Concept);
        let review = concept.clone().into_review();
        assert_eq!(review.title, "意象");
        assert!(review.author.is_none());
        assert_eq!(concept.into_item(), ContentItem::new("意象", "..."));
    }

    #[test]
    fn test_prompt_kind_labels() {
        let labels: Vec<_> = PromptKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["review", "concept", "question"]);
    }
}
