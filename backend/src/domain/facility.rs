//! Facility metadata consumed read-only by the booking core.
//!
//! Facilities are owned by an external catalogue; the domain only needs the
//! fields that drive visibility and ordering in the day schedule.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category tag controlling who may see a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    /// Bookable by everyone.
    Shared,
    /// Teaching rooms, visible to teachers only.
    Teaching,
    /// Open-learning areas, visible to teachers only.
    OpenLearning,
}

impl FacilityCategory {
    /// Stable label used in API payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Teaching => "teaching",
            Self::OpenLearning => "open_learning",
        }
    }

    /// Map a catalogue label onto a category.
    ///
    /// The catalogue stores free-text labels; `"undervisning"` marks teaching
    /// rooms and `"open learning"` open-learning areas. Anything else,
    /// including an absent label, is a shared facility.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::to_lowercase).as_deref() {
            Some("undervisning") => Self::Teaching,
            Some("open learning") => Self::OpenLearning,
            _ => Self::Shared,
        }
    }
}

/// Static facility metadata joined into availability views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    /// Unique facility identifier.
    pub id: Uuid,
    /// Display title, e.g. `"Lokale 2.03"`.
    pub title: String,
    /// Free-text capacity, e.g. `"2-4 pers"`.
    pub capacity: Option<String>,
    /// Free-text description; may carry a teacher-only marker.
    pub description: Option<String>,
    /// Floor label; numeric when parseable.
    pub floor: Option<String>,
    /// Visibility category.
    pub category: FacilityCategory,
}

impl Facility {
    /// Sort rank derived from the floor label.
    ///
    /// Facilities without a parseable floor sort after every numbered floor.
    pub fn floor_rank(&self) -> i64 {
        self.floor
            .as_deref()
            .map(str::trim)
            .and_then(|floor| floor.parse::<i64>().ok())
            .unwrap_or(i64::MAX)
    }

    /// Whether the description reserves this facility for teachers.
    ///
    /// `markers` are compared case-insensitively as substrings; the defaults
    /// mirror the catalogue's wording.
    pub fn is_teacher_reserved(&self, markers: &[String]) -> bool {
        let Some(description) = self.description.as_deref() else {
            return false;
        };
        let description = description.to_lowercase();
        markers
            .iter()
            .any(|marker| description.contains(&marker.to_lowercase()))
    }
}

/// Markers that reserve a shared facility for teachers when present in its
/// description. Overridable through configuration.
pub fn default_teacher_only_markers() -> Vec<String> {
    vec!["kun lærere".to_owned(), "kun laerere".to_owned()]
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn facility(floor: Option<&str>, description: Option<&str>) -> Facility {
        Facility {
            id: Uuid::new_v4(),
            title: "Lokale 2.03".to_owned(),
            capacity: Some("2-4 pers".to_owned()),
            description: description.map(str::to_owned),
            floor: floor.map(str::to_owned),
            category: FacilityCategory::Shared,
        }
    }

    #[rstest]
    #[case(None, FacilityCategory::Shared)]
    #[case(Some("mødelokale"), FacilityCategory::Shared)]
    #[case(Some("undervisning"), FacilityCategory::Teaching)]
    #[case(Some("Undervisning"), FacilityCategory::Teaching)]
    #[case(Some("open learning"), FacilityCategory::OpenLearning)]
    fn category_from_label(#[case] label: Option<&str>, #[case] expected: FacilityCategory) {
        assert_eq!(FacilityCategory::from_label(label), expected);
    }

    #[rstest]
    #[case(Some("3"), 3)]
    #[case(Some(" 12 "), 12)]
    #[case(Some("stuen"), i64::MAX)]
    #[case(None, i64::MAX)]
    fn floor_rank_parses_numeric_floors(#[case] floor: Option<&str>, #[case] expected: i64) {
        assert_eq!(facility(floor, None).floor_rank(), expected);
    }

    #[rstest]
    #[case(Some("Kun lærere må booke"), true)]
    #[case(Some("kun laerere"), true)]
    #[case(Some("alle er velkomne"), false)]
    #[case(None, false)]
    fn teacher_reservation_reads_description(#[case] description: Option<&str>, #[case] expected: bool) {
        let markers = default_teacher_only_markers();
        assert_eq!(facility(None, description).is_teacher_reserved(&markers), expected);
    }
}
