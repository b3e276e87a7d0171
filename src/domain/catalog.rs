//! The canonical in-memory collection of tag categories.
//!
//! The [`Catalog`] is the single owner of every record. Records are never
//! physically removed: a delete only sets the record's deletion flag, and
//! [`Catalog::visible`] filters those records out.

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::domain::category::{CategoryId, CategoryValues, TagCategory};

/// A yes/no confirmation step injected into destructive operations.
pub trait Confirm {
    /// Asks the user to confirm `message`.
    ///
    /// Returns `true` to proceed.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// A confirmation step that always proceeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// The result of a soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No record has the requested identifier.
    NotFound,
    /// The user declined the confirmation. Nothing changed.
    Declined,
    /// The record is now marked as deleted.
    Deleted,
}

/// The canonical, ordered list of tag categories.
///
/// New records are prepended, so the most recently created record comes
/// first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<TagCategory>,
}

impl Catalog {
    /// Builds the catalog from seed records.
    ///
    /// Records already marked as deleted in the seed are dropped.
    #[must_use]
    pub fn from_seed(seed: impl IntoIterator<Item = TagCategory>) -> Self {
        let categories: Vec<_> = seed
            .into_iter()
            .filter(|category| !category.is_deleted())
            .collect();
        debug!(count = categories.len(), "catalog initialized");
        Self { categories }
    }

    /// Creates a record from submitted values and puts it first.
    ///
    /// Returns the new record's identifier.
    #[instrument(level = "debug", skip_all, fields(name = %values.name))]
    pub fn create(&mut self, values: CategoryValues) -> CategoryId {
        let record = TagCategory::new(values, Utc::now());
        let id = record.id().clone();
        self.categories.insert(0, record);
        info!(%id, "created category");
        id
    }

    /// Replaces the content of the record with the given identifier.
    ///
    /// Identity, creation time and the deletion flag are kept. Returns `false`
    /// if no record matches.
    #[instrument(level = "debug", skip(self, values))]
    pub fn edit(&mut self, id: &CategoryId, values: CategoryValues) -> bool {
        let Some(record) = self.get_mut(id) else {
            debug!("no category to edit");
            return false;
        };
        record.apply(values, Utc::now());
        info!("edited category");
        true
    }

    /// Soft deletes the record with the given identifier, after confirmation.
    ///
    /// The confirmation names the record. Declining leaves the catalog
    /// untouched.
    #[instrument(level = "debug", skip(self, confirm))]
    pub fn soft_delete(&mut self, id: &CategoryId, confirm: &mut impl Confirm) -> DeleteOutcome {
        let Some(record) = self.get_mut(id) else {
            return DeleteOutcome::NotFound;
        };

        let message = format!(
            "Delete \"{}\"? This is a soft delete and can be undone by editing data.",
            record.name()
        );
        if !confirm.confirm(&message) {
            debug!("delete declined");
            return DeleteOutcome::Declined;
        }

        record.mark_deleted(Utc::now());
        info!("deleted category");
        DeleteOutcome::Deleted
    }

    /// Records that are not deleted, in stored order.
    pub fn visible(&self) -> impl Iterator<Item = &TagCategory> + '_ {
        self.categories
            .iter()
            .filter(|category| !category.is_deleted())
    }

    /// Every record, including deleted ones, in stored order.
    #[must_use]
    pub fn all(&self) -> &[TagCategory] {
        &self.categories
    }

    /// Looks up a record by identifier, including deleted records.
    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<&TagCategory> {
        self.categories.iter().find(|category| category.id() == id)
    }

    /// The number of records, including deleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn get_mut(&mut self, id: &CategoryId) -> Option<&mut TagCategory> {
        self.categories.iter_mut().find(|category| category.id() == id)
    }
}
