//! Domain models for tag category management.
//!
//! This module contains the category record and its nested metadata, the
//! draft form used to create and edit records, and the canonical catalog.

/// Tag category records and their enumerated fields.
pub mod category;
pub use category::{
    CategoryId, CategoryValues, MatchThreshold, MetadataConfig, PrecisionType, Status,
    SubCategory, TagCategory, TagGroup, ThresholdError, UnknownVariant,
};

/// Match and replace rules.
pub mod rule;
pub use rule::{IncompleteRule, Rule, RuleDraft, RuleKind};

/// Draft editor for creating and editing categories.
pub mod form;
pub use form::{CategoryDraft, CategoryForm, FieldUpdate, FormEvent, FormMode};

mod catalog;
pub use catalog::{AlwaysConfirm, Catalog, Confirm, DeleteOutcome};

mod config;
pub use config::{Config, ConfigError};
