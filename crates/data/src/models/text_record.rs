//! Homepage snapshot text record.
//!
//! One record per archival snapshot attempt: the day it was meant to
//! capture, the timestamp of the snapshot the archive actually returned, and
//! the headline text pulled from the page's fixed layout slots.

use chrono::NaiveDate;
use headline_alpha_core::dates::{normalize, FormatError};
use serde::{Deserialize, Serialize};

/// The named text slots of a homepage snapshot, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    MainTitle,
    MainContent,
    FeatureTitle0,
    FeatureTitle1,
    FeatureTitle2,
    VideoTitle0,
    VideoTitle1,
    VideoTitle2,
    StoriesTitle0,
    StoriesTitle1,
    StoriesTitle2,
    StoriesTitle3,
    StoriesTitle4,
    StoriesTitle5,
    StoriesContent0,
    StoriesContent1,
    StoriesContent2,
    StoriesContent3,
    StoriesContent4,
    StoriesContent5,
}

impl TextField {
    /// All fields in canonical order. Feature columns follow this order.
    pub const ALL: [TextField; 20] = [
        Self::MainTitle,
        Self::MainContent,
        Self::FeatureTitle0,
        Self::FeatureTitle1,
        Self::FeatureTitle2,
        Self::VideoTitle0,
        Self::VideoTitle1,
        Self::VideoTitle2,
        Self::StoriesTitle0,
        Self::StoriesTitle1,
        Self::StoriesTitle2,
        Self::StoriesTitle3,
        Self::StoriesTitle4,
        Self::StoriesTitle5,
        Self::StoriesContent0,
        Self::StoriesContent1,
        Self::StoriesContent2,
        Self::StoriesContent3,
        Self::StoriesContent4,
        Self::StoriesContent5,
    ];

    /// Column name used in extract files and feature names.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::MainTitle => "main_title",
            Self::MainContent => "main_content",
            Self::FeatureTitle0 => "feature_title_0",
            Self::FeatureTitle1 => "feature_title_1",
            Self::FeatureTitle2 => "feature_title_2",
            Self::VideoTitle0 => "video_title_0",
            Self::VideoTitle1 => "video_title_1",
            Self::VideoTitle2 => "video_title_2",
            Self::StoriesTitle0 => "stories_title_0",
            Self::StoriesTitle1 => "stories_title_1",
            Self::StoriesTitle2 => "stories_title_2",
            Self::StoriesTitle3 => "stories_title_3",
            Self::StoriesTitle4 => "stories_title_4",
            Self::StoriesTitle5 => "stories_title_5",
            Self::StoriesContent0 => "stories_content_0",
            Self::StoriesContent1 => "stories_content_1",
            Self::StoriesContent2 => "stories_content_2",
            Self::StoriesContent3 => "stories_content_3",
            Self::StoriesContent4 => "stories_content_4",
            Self::StoriesContent5 => "stories_content_5",
        }
    }

    /// Looks up a field by its column name.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.column() == name)
    }
}

/// Text content of one snapshot. Absent slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineFields {
    pub main_title: Option<String>,
    pub main_content: Option<String>,
    pub feature_titles: [Option<String>; 3],
    pub video_titles: [Option<String>; 3],
    pub stories_titles: [Option<String>; 6],
    pub stories_contents: [Option<String>; 6],
}

impl HeadlineFields {
    /// Returns the text in `field`, if present.
    #[must_use]
    pub fn get(&self, field: TextField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Sets `field`, treating empty or whitespace-only text as absent.
    pub fn set(&mut self, field: TextField, text: Option<String>) {
        *self.slot_mut(field) = text.filter(|t| !t.trim().is_empty());
    }

    /// Number of populated slots.
    #[must_use]
    pub fn populated(&self) -> usize {
        TextField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    fn slot(&self, field: TextField) -> &Option<String> {
        use TextField::*;
        match field {
            MainTitle => &self.main_title,
            MainContent => &self.main_content,
            FeatureTitle0 => &self.feature_titles[0],
            FeatureTitle1 => &self.feature_titles[1],
            FeatureTitle2 => &self.feature_titles[2],
            VideoTitle0 => &self.video_titles[0],
            VideoTitle1 => &self.video_titles[1],
            VideoTitle2 => &self.video_titles[2],
            StoriesTitle0 => &self.stories_titles[0],
            StoriesTitle1 => &self.stories_titles[1],
            StoriesTitle2 => &self.stories_titles[2],
            StoriesTitle3 => &self.stories_titles[3],
            StoriesTitle4 => &self.stories_titles[4],
            StoriesTitle5 => &self.stories_titles[5],
            StoriesContent0 => &self.stories_contents[0],
            StoriesContent1 => &self.stories_contents[1],
            StoriesContent2 => &self.stories_contents[2],
            StoriesContent3 => &self.stories_contents[3],
            StoriesContent4 => &self.stories_contents[4],
            StoriesContent5 => &self.stories_contents[5],
        }
    }

    fn slot_mut(&mut self, field: TextField) -> &mut Option<String> {
        use TextField::*;
        match field {
            MainTitle => &mut self.main_title,
            MainContent => &mut self.main_content,
            FeatureTitle0 => &mut self.feature_titles[0],
            FeatureTitle1 => &mut self.feature_titles[1],
            FeatureTitle2 => &mut self.feature_titles[2],
            VideoTitle0 => &mut self.video_titles[0],
            VideoTitle1 => &mut self.video_titles[1],
            VideoTitle2 => &mut self.video_titles[2],
            StoriesTitle0 => &mut self.stories_titles[0],
            StoriesTitle1 => &mut self.stories_titles[1],
            StoriesTitle2 => &mut self.stories_titles[2],
            StoriesTitle3 => &mut self.stories_titles[3],
            StoriesTitle4 => &mut self.stories_titles[4],
            StoriesTitle5 => &mut self.stories_titles[5],
            StoriesContent0 => &mut self.stories_contents[0],
            StoriesContent1 => &mut self.stories_contents[1],
            StoriesContent2 => &mut self.stories_contents[2],
            StoriesContent3 => &mut self.stories_contents[3],
            StoriesContent4 => &mut self.stories_contents[4],
            StoriesContent5 => &mut self.stories_contents[5],
        }
    }
}

/// One archival snapshot of the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// The day this record is meant to represent, as stored (`YYYYMMDD`).
    pub collection_date: String,
    /// Timestamp of the snapshot actually archived (`YYYYMMDDhhmmss`).
    pub snapshot_timestamp: String,
    pub fields: HeadlineFields,
}

impl TextRecord {
    /// Creates a record with no text.
    pub fn new(collection_date: impl Into<String>, snapshot_timestamp: impl Into<String>) -> Self {
        Self {
            collection_date: collection_date.into(),
            snapshot_timestamp: snapshot_timestamp.into(),
            fields: HeadlineFields::default(),
        }
    }

    /// Builder method to set a text field.
    #[must_use]
    pub fn with_field(mut self, field: TextField, text: impl Into<String>) -> Self {
        self.fields.set(field, Some(text.into()));
        self
    }

    /// Normalized collection date.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the stored date is malformed.
    pub fn collection_day(&self) -> Result<NaiveDate, FormatError> {
        normalize(&self.collection_date)
    }

    /// The `YYYYMMDD` prefix of the snapshot timestamp, if it has one.
    #[must_use]
    pub fn timestamp_date_prefix(&self) -> Option<&str> {
        self.snapshot_timestamp
            .trim()
            .get(0..8)
            .filter(|p| p.bytes().all(|b| b.is_ascii_digit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_unique_and_round_trip() {
        let mut seen = std::collections::HashSet::new();
        for field in TextField::ALL {
            assert!(seen.insert(field.column()), "duplicate {}", field.column());
            assert_eq!(TextField::from_column(field.column()), Some(field));
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(TextField::from_column("timestamp"), None);
    }

    #[test]
    fn blank_text_is_stored_as_absent() {
        let mut fields = HeadlineFields::default();
        fields.set(TextField::VideoTitle2, Some("   ".to_string()));
        fields.set(TextField::StoriesContent5, Some("Oil slides".to_string()));

        assert_eq!(fields.get(TextField::VideoTitle2), None);
        assert_eq!(fields.get(TextField::StoriesContent5), Some("Oil slides"));
        assert_eq!(fields.populated(), 1);
    }

    #[test]
    fn every_field_addresses_its_own_slot() {
        let mut fields = HeadlineFields::default();
        for field in TextField::ALL {
            fields.set(field, Some(field.column().to_uppercase()));
        }
        for field in TextField::ALL {
            assert_eq!(
                fields.get(field),
                Some(field.column().to_uppercase().as_str())
            );
        }
        assert_eq!(fields.populated(), 20);
    }

    #[test]
    fn timestamp_prefix_requires_eight_digits() {
        assert_eq!(
            TextRecord::new("20200901", "20200901120000").timestamp_date_prefix(),
            Some("20200901")
        );
        assert_eq!(TextRecord::new("20200901", "2020").timestamp_date_prefix(), None);
        assert_eq!(
            TextRecord::new("20200901", "2020-09-01T12").timestamp_date_prefix(),
            None
        );
        assert_eq!(TextRecord::new("20200901", "").timestamp_date_prefix(), None);
    }

    #[test]
    fn collection_day_normalizes() {
        let record = TextRecord::new("20200901", "20200901120000");
        assert_eq!(
            record.collection_day().unwrap(),
            NaiveDate::from_ymd_opt(2020, 9, 1).unwrap()
        );
        assert!(TextRecord::new("Sept 1", "").collection_day().is_err());
    }
}
