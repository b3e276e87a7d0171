//! Tag Category Management
//!
//! Tag categories are held in an in-memory catalog seeded from static sample
//! data. Records are created and edited through a draft form and removed with
//! a soft delete.

pub mod domain;
pub use domain::{
    AlwaysConfirm, Catalog, CategoryForm, CategoryId, CategoryValues, Config, Confirm,
    DeleteOutcome, FieldUpdate, FormEvent, FormMode, MatchThreshold, MetadataConfig,
    PrecisionType, Rule, RuleDraft, RuleKind, Status, SubCategory, TagCategory, TagGroup,
};

/// Loading of the static seed collection.
pub mod storage;
pub use storage::{SeedError, SeedSource};

/// Presentation of categories: cards and the page container.
pub mod view;
pub use view::{CardAction, CategoryCard, Page, PageHead};
