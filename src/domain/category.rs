use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rule::Rule;

/// Opaque, unique identifier of a category or sub-category.
///
/// Seed data may use any string. Freshly generated identifiers are random
/// UUIDs, so they are never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Generates a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a string names none of an enumeration's variants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {field} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    field: &'static str,
    value: String,
    expected: &'static str,
}

impl UnknownVariant {
    pub(crate) fn new(field: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Whether a category is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The category is in use.
    #[default]
    Active,
    /// The category is retained but not in use.
    Inactive,
}

impl Status {
    /// Every status, in selection order.
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    /// The lowercase name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(UnknownVariant::new("status", s, "active, inactive")),
        }
    }
}

/// How tags in a category are intended to be matched.
///
/// Matching itself is not performed anywhere; this only records intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionType {
    /// Literal comparison.
    #[default]
    Exact,
    /// Approximate comparison, tuned by the match threshold.
    Fuzzy,
    /// Patterns are regular expressions.
    Regex,
}

impl PrecisionType {
    /// Every precision type, in selection order.
    pub const ALL: [Self; 3] = [Self::Exact, Self::Fuzzy, Self::Regex];

    /// The lowercase name of the precision type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for PrecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrecisionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "fuzzy" => Ok(Self::Fuzzy),
            "regex" => Ok(Self::Regex),
            _ => Err(UnknownVariant::new("precision type", s, "exact, fuzzy, regex")),
        }
    }
}

/// Who a category belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagGroup {
    /// Built-in categories.
    #[default]
    System,
    /// Categories created by users.
    User,
    /// Categories describing content.
    Content,
}

impl TagGroup {
    /// Every group, in selection order.
    pub const ALL: [Self; 3] = [Self::System, Self::User, Self::Content];

    /// The lowercase name of the group.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for TagGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagGroup {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "content" => Ok(Self::Content),
            _ => Err(UnknownVariant::new("group", s, "system, user, content")),
        }
    }
}

/// A match threshold in the closed range `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MatchThreshold(f64);

impl MatchThreshold {
    /// The threshold new drafts start with unless configured otherwise.
    pub const DEFAULT: Self = Self(0.9);

    /// Creates a threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::OutOfRange`] if the value is not a finite
    /// number between 0 and 1 inclusive.
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError::OutOfRange(value))
        }
    }

    /// Returns the threshold as a float.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for MatchThreshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MatchThreshold> for f64 {
    fn from(value: MatchThreshold) -> Self {
        value.0
    }
}

impl FromStr for MatchThreshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| ThresholdError::Invalid(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for MatchThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors produced when parsing a match threshold.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ThresholdError {
    /// The value is not a number between 0 and 1.
    #[error("match threshold {0} is outside the range [0, 1]")]
    OutOfRange(f64),
    /// The input is not a number at all.
    #[error("invalid match threshold '{0}'")]
    Invalid(String),
}

/// Nested matching configuration of a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataConfig {
    /// Whether matching distinguishes letter case.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Similarity threshold, meaningful for fuzzy precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_threshold: Option<MatchThreshold>,
    /// Ordered match and replace rules.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A lightweight reference to a sub-category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    /// Identifier of the sub-category.
    pub id: CategoryId,
    /// Display name of the sub-category.
    pub name: String,
}

impl SubCategory {
    /// Creates a reference with a fresh identifier.
    ///
    /// Returns `None` if the name is blank. The name is trimmed.
    #[must_use]
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        (!name.is_empty()).then(|| Self {
            id: CategoryId::generate(),
            name: name.to_string(),
        })
    }
}

/// The user-editable content of a category.
///
/// This is everything in a [`TagCategory`] except its identity, timestamps
/// and deletion flag. It is what a submitted form hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryValues {
    /// Display name.
    pub name: NonEmptyString,
    /// Free text description, empty when absent.
    pub description: String,
    /// Whether the category is in use.
    pub status: Status,
    /// Intended matching behaviour.
    pub precision_type: PrecisionType,
    /// Owning group.
    pub group: TagGroup,
    /// Nested matching configuration.
    pub metadata_config: MetadataConfig,
    /// Ordered sub-category references.
    pub sub_categories: Vec<SubCategory>,
}

impl CategoryValues {
    /// Applies the canonical defaults.
    ///
    /// Surrounding whitespace is trimmed from the description, so a blank
    /// description becomes empty. A name that would become empty after
    /// trimming is kept as it is.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let trimmed = self.description.trim();
        if trimmed.len() != self.description.len() {
            self.description = trimmed.to_string();
        }
        let name = self.name.as_str().trim();
        if name.len() != self.name.as_str().len() {
            if let Ok(name) = NonEmptyString::new(name.to_string()) {
                self.name = name;
            }
        }
        self
    }
}

/// A tag category record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCategory {
    id: CategoryId,
    created_at: DateTime<Utc>,
    last_updated_at: DateTime<Utc>,
    #[serde(default)]
    deleted: bool,
    name: NonEmptyString,
    #[serde(default)]
    description: String,
    status: Status,
    precision_type: PrecisionType,
    group: TagGroup,
    #[serde(default)]
    metadata_config: MetadataConfig,
    #[serde(default)]
    sub_categories: Vec<SubCategory>,
}

impl TagCategory {
    /// Creates a record with a fresh identifier.
    ///
    /// Both timestamps are set to `now`.
    #[must_use]
    pub fn new(values: CategoryValues, now: DateTime<Utc>) -> Self {
        Self::with_id(CategoryId::generate(), values, now)
    }

    /// Creates a record with the given identifier.
    #[must_use]
    pub fn with_id(id: CategoryId, values: CategoryValues, now: DateTime<Utc>) -> Self {
        let values = values.normalized();
        Self {
            id,
            created_at: now,
            last_updated_at: now,
            deleted: false,
            name: values.name,
            description: values.description,
            status: values.status,
            precision_type: values.precision_type,
            group: values.group,
            metadata_config: values.metadata_config,
            sub_categories: values.sub_categories,
        }
    }

    /// The record's identifier.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        &self.id
    }

    /// When the record was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the record was last edited or deleted.
    #[must_use]
    pub const fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    /// Whether the record has been soft deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The description, empty when absent.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the category is in use.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Intended matching behaviour.
    #[must_use]
    pub const fn precision_type(&self) -> PrecisionType {
        self.precision_type
    }

    /// The owning group.
    #[must_use]
    pub const fn group(&self) -> TagGroup {
        self.group
    }

    /// Nested matching configuration.
    #[must_use]
    pub const fn metadata_config(&self) -> &MetadataConfig {
        &self.metadata_config
    }

    /// Sub-category references, in insertion order.
    #[must_use]
    pub fn sub_categories(&self) -> &[SubCategory] {
        &self.sub_categories
    }

    /// Returns a copy of the editable content.
    #[must_use]
    pub fn values(&self) -> CategoryValues {
        CategoryValues {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            precision_type: self.precision_type,
            group: self.group,
            metadata_config: self.metadata_config.clone(),
            sub_categories: self.sub_categories.clone(),
        }
    }

    /// Replaces the editable content and refreshes the update time.
    ///
    /// Identity, creation time and the deletion flag are left untouched.
    pub(crate) fn apply(&mut self, values: CategoryValues, now: DateTime<Utc>) {
        let values = values.normalized();
        self.name = values.name;
        self.description = values.description;
        self.status = values.status;
        self.precision_type = values.precision_type;
        self.group = values.group;
        self.metadata_config = values.metadata_config;
        self.sub_categories = values.sub_categories;
        self.touch(now);
    }

    /// Marks the record as deleted and refreshes the update time.
    pub(crate) fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.touch(now);
    }

    // The update time never moves backwards, even if the clock does.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated_at = now.max(self.last_updated_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use test_case::test_case;

    use super::*;

    fn values(name: &str) -> CategoryValues {
        CategoryValues {
            name: NonEmptyString::new(name.to_string()).unwrap(),
            description: String::new(),
            status: Status::default(),
            precision_type: PrecisionType::default(),
            group: TagGroup::default(),
            metadata_config: MetadataConfig::default(),
            sub_categories: Vec::new(),
        }
    }

    #[test_case(0.0 ; "lower bound")]
    #[test_case(0.75 ; "inside")]
    #[test_case(1.0 ; "upper bound")]
    fn threshold_accepts_unit_interval(value: f64) {
        let threshold = MatchThreshold::new(value).unwrap();
        assert!((threshold.get() - value).abs() < f64::EPSILON);
    }

    #[test_case(-0.01 ; "below")]
    #[test_case(1.01 ; "above")]
    #[test_case(f64::NAN ; "nan")]
    fn threshold_rejects_values_outside_unit_interval(value: f64) {
        assert!(matches!(
            MatchThreshold::new(value),
            Err(ThresholdError::OutOfRange(_))
        ));
    }

    #[test]
    fn threshold_parse_reports_non_numbers() {
        let err = "high".parse::<MatchThreshold>().unwrap_err();
        assert_eq!(err, ThresholdError::Invalid("high".to_string()));
    }

    #[test_case("active", Status::Active)]
    #[test_case(" Inactive ", Status::Inactive)]
    fn status_parses_case_insensitively(input: &str, expected: Status) {
        assert_eq!(input.parse::<Status>().unwrap(), expected);
    }

    #[test]
    fn unknown_group_names_expected_values() {
        let err = "admin".parse::<TagGroup>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown group 'admin' (expected one of: system, user, content)"
        );
    }

    #[test]
    fn blank_sub_category_names_are_rejected() {
        assert!(SubCategory::new("   ").is_none());
        assert_eq!(SubCategory::new("  Invoices ").unwrap().name, "Invoices");
    }

    #[test]
    fn normalization_trims_description_and_name() {
        let mut input = values("  Billing  ");
        input.description = "   ".to_string();
        let normalized = input.normalized();
        assert_eq!(normalized.name.as_str(), "Billing");
        assert_eq!(normalized.description, "");
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut record = TagCategory::with_id("tc-1".into(), values("Billing"), created);

        let mut next = record.values();
        next.status = Status::Inactive;
        record.apply(next, later);

        assert_eq!(record.id().as_str(), "tc-1");
        assert_eq!(record.created_at(), created);
        assert_eq!(record.last_updated_at(), later);
        assert_eq!(record.status(), Status::Inactive);
        assert!(!record.is_deleted());
    }

    #[test]
    fn update_time_never_moves_backwards() {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut record = TagCategory::with_id("tc-1".into(), values("Billing"), created);

        record.mark_deleted(earlier);

        assert!(record.is_deleted());
        assert_eq!(record.last_updated_at(), created);
    }

    #[test]
    fn deserializes_camel_case_and_defaults_optional_fields() {
        let json = r#"{
            "id": "tc-9",
            "createdAt": "2024-01-01T00:00:00Z",
            "lastUpdatedAt": "2024-01-02T00:00:00Z",
            "name": "Topics",
            "status": "active",
            "precisionType": "fuzzy",
            "group": "content"
        }"#;

        let record: TagCategory = serde_json::from_str(json).unwrap();

        assert_eq!(record.name(), "Topics");
        assert_eq!(record.description(), "");
        assert!(!record.is_deleted());
        assert_eq!(record.metadata_config(), &MetadataConfig::default());
        assert!(record.sub_categories().is_empty());
    }

    #[test]
    fn rejects_out_of_range_threshold_in_data() {
        let json = r#"{ "caseSensitive": true, "matchThreshold": 1.5 }"#;
        assert!(serde_json::from_str::<MetadataConfig>(json).is_err());
    }
}
