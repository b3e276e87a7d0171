//! The draft editor behind the create and edit forms.
//!
//! A [`CategoryForm`] works on a [`CategoryDraft`] that is entirely separate
//! from the catalog. Nothing it does reaches the catalog until the caller
//! acts on the [`FormEvent`] returned from [`CategoryForm::submit`].

use non_empty_string::NonEmptyString;
use tracing::debug;

use crate::domain::{
    category::{
        CategoryId, CategoryValues, MatchThreshold, MetadataConfig, PrecisionType, Status,
        SubCategory, TagCategory, TagGroup,
    },
    rule::{IncompleteRule, Rule, RuleDraft},
};

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting creates a new record.
    #[default]
    Create,
    /// Submitting replaces the content of an existing record.
    Edit,
}

/// The in-progress, not yet committed content of a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    /// Display name. May be blank while editing.
    pub name: String,
    /// Free text description.
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

impl CategoryDraft {
    /// An empty draft with the default selections.
    #[must_use]
    pub fn new(default_threshold: Option<MatchThreshold>) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: Status::default(),
            precision_type: PrecisionType::default(),
            group: TagGroup::default(),
            metadata_config: MetadataConfig {
                match_threshold: default_threshold,
                ..MetadataConfig::default()
            },
            sub_categories: Vec::new(),
        }
    }

    /// A draft holding a copy of a record's editable content.
    #[must_use]
    pub fn from_record(record: &TagCategory) -> Self {
        let values = record.values().normalized();
        Self {
            name: values.name.as_str().to_string(),
            description: values.description,
            status: values.status,
            precision_type: values.precision_type,
            group: values.group,
            metadata_config: values.metadata_config,
            sub_categories: values.sub_categories,
        }
    }

    /// Whether the draft can be submitted.
    ///
    /// The enumerated fields always hold a valid choice, so only the name
    /// can make a draft invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Converts the draft into normalized values, if it is valid.
    #[must_use]
    pub fn to_values(&self) -> Option<CategoryValues> {
        let name = NonEmptyString::new(self.name.trim().to_string()).ok()?;
        let values = CategoryValues {
            name,
            description: self.description.clone(),
            status: self.status,
            precision_type: self.precision_type,
            group: self.group,
            metadata_config: self.metadata_config.clone(),
            sub_categories: self.sub_categories.clone(),
        };
        Some(values.normalized())
    }
}

/// A change to exactly one field of the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Replace the name.
    Name(String),
    /// Replace the description.
    Description(String),
    /// Select a status.
    Status(Status),
    /// Select a precision type.
    PrecisionType(PrecisionType),
    /// Select a group.
    Group(TagGroup),
    /// Set the nested case sensitivity flag.
    CaseSensitive(bool),
    /// Set or clear the nested match threshold.
    MatchThreshold(Option<MatchThreshold>),
}

/// What the form hands back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The draft was valid and submitted.
    Submitted(CategoryValues),
    /// The user abandoned the form.
    Cancelled,
}

/// A create or edit form over a category draft.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    mode: FormMode,
    draft: CategoryDraft,
    rule_draft: RuleDraft,
    default_threshold: Option<MatchThreshold>,
}

impl CategoryForm {
    /// A form for creating a new category.
    #[must_use]
    pub fn create(default_threshold: Option<MatchThreshold>) -> Self {
        Self {
            mode: FormMode::Create,
            draft: CategoryDraft::new(default_threshold),
            rule_draft: RuleDraft::default(),
            default_threshold,
        }
    }

    /// A form for editing an existing category.
    #[must_use]
    pub fn edit(record: &TagCategory, default_threshold: Option<MatchThreshold>) -> Self {
        Self {
            mode: FormMode::Edit,
            draft: CategoryDraft::from_record(record),
            rule_draft: RuleDraft::default(),
            default_threshold,
        }
    }

    /// Re-initializes the draft for a new target.
    ///
    /// With a record the form switches to edit mode and copies it. Without
    /// one it switches to create mode with an empty draft. The rule adder's
    /// inputs are cleared either way.
    pub fn reseed(&mut self, initial: Option<&TagCategory>) {
        *self = match initial {
            Some(record) => Self::edit(record, self.default_threshold),
            None => Self::create(self.default_threshold),
        };
    }

    /// The current mode.
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    /// The in-progress draft.
    #[must_use]
    pub const fn draft(&self) -> &CategoryDraft {
        &self.draft
    }

    /// Whether the draft can be submitted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.draft.is_valid()
    }

    /// The rule adder's in-progress inputs.
    #[must_use]
    pub const fn rule_draft(&self) -> &RuleDraft {
        &self.rule_draft
    }

    /// The rule adder's inputs, for editing.
    pub const fn rule_draft_mut(&mut self) -> &mut RuleDraft {
        &mut self.rule_draft
    }

    /// The heading of the form.
    #[must_use]
    pub const fn legend(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Tag Category",
            FormMode::Edit => "Edit Tag Category",
        }
    }

    /// The label of the submit control.
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Category",
            FormMode::Edit => "Save Changes",
        }
    }

    /// Replaces a single field, leaving every other field as it was.
    pub fn update(&mut self, update: FieldUpdate) {
        let draft = &mut self.draft;
        match update {
            FieldUpdate::Name(name) => draft.name = name,
            FieldUpdate::Description(description) => draft.description = description,
            FieldUpdate::Status(status) => draft.status = status,
            FieldUpdate::PrecisionType(precision) => draft.precision_type = precision,
            FieldUpdate::Group(group) => draft.group = group,
            FieldUpdate::CaseSensitive(flag) => draft.metadata_config.case_sensitive = flag,
            FieldUpdate::MatchThreshold(threshold) => {
                draft.metadata_config.match_threshold = threshold;
            }
        }
    }

    /// Appends a sub-category with a fresh identifier.
    ///
    /// Returns `false`, leaving the draft unchanged, if the name is blank.
    pub fn add_sub_category(&mut self, name: &str) -> bool {
        let Some(sub) = SubCategory::new(name) else {
            return false;
        };
        self.draft.sub_categories.push(sub);
        true
    }

    /// Removes the sub-category with the given identifier.
    ///
    /// Returns `false` if there was no such sub-category.
    pub fn remove_sub_category(&mut self, id: &CategoryId) -> bool {
        let before = self.draft.sub_categories.len();
        self.draft.sub_categories.retain(|sub| &sub.id != id);
        self.draft.sub_categories.len() != before
    }

    /// Appends the rule built from `draft` to the rule list.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteRule`] if the draft is missing input. The rule list
    /// is left unchanged.
    pub fn add_rule(&mut self, draft: &RuleDraft) -> Result<(), IncompleteRule> {
        let rule = draft.build().inspect_err(|e| debug!("rule rejected: {e}"))?;
        self.draft.metadata_config.rules.push(rule);
        Ok(())
    }

    /// Appends the rule built from the rule adder's inputs.
    ///
    /// The inputs of the current kind are cleared once the rule is added. A
    /// rejected rule keeps them for another attempt.
    ///
    /// # Errors
    ///
    /// Returns [`IncompleteRule`] if the inputs are incomplete.
    pub fn add_drafted_rule(&mut self) -> Result<(), IncompleteRule> {
        let rule_draft = self.rule_draft.clone();
        self.add_rule(&rule_draft)?;
        self.rule_draft.clear();
        Ok(())
    }

    /// Removes the rule at `index`, shifting later rules down.
    ///
    /// Returns `None` if the index is out of bounds.
    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        let rules = &mut self.draft.metadata_config.rules;
        (index < rules.len()).then(|| rules.remove(index))
    }

    /// Submits the draft.
    ///
    /// Returns `None` if the draft is invalid. The draft itself is never
    /// cleared; the owner decides what happens next.
    #[must_use]
    pub fn submit(&self) -> Option<FormEvent> {
        self.draft.to_values().map(FormEvent::Submitted)
    }

    /// Abandons the form.
    #[must_use]
    pub const fn cancel(&self) -> FormEvent {
        FormEvent::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::rule::RuleKind;

    fn threshold(value: f64) -> Option<MatchThreshold> {
        Some(MatchThreshold::new(value).unwrap())
    }

    fn record() -> TagCategory {
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("Billing".to_string()));
        form.update(FieldUpdate::Group(TagGroup::User));
        form.add_sub_category("Invoices");
        form.add_rule(&RuleDraft::matching("inv-*")).unwrap();
        let Some(FormEvent::Submitted(values)) = form.submit() else {
            panic!("form should be valid");
        };
        TagCategory::new(values, Utc::now())
    }

    #[test]
    fn create_mode_starts_from_defaults() {
        let form = CategoryForm::create(threshold(0.9));
        let draft = form.draft();

        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(draft.name, "");
        assert_eq!(draft.status, Status::Active);
        assert_eq!(draft.precision_type, PrecisionType::Exact);
        assert_eq!(draft.group, TagGroup::System);
        assert!(!draft.metadata_config.case_sensitive);
        assert_eq!(draft.metadata_config.match_threshold, threshold(0.9));
        assert!(draft.metadata_config.rules.is_empty());
        assert!(draft.sub_categories.is_empty());
        assert_eq!(form.submit_label(), "Create Category");
    }

    #[test]
    fn edit_mode_copies_the_record() {
        let record = record();
        let form = CategoryForm::edit(&record, threshold(0.9));

        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.draft().name, "Billing");
        assert_eq!(form.draft().group, TagGroup::User);
        assert_eq!(form.draft().sub_categories, record.sub_categories());
        assert_eq!(form.draft().metadata_config, *record.metadata_config());
        assert_eq!(form.legend(), "Edit Tag Category");
    }

    #[test]
    fn reseed_switches_between_modes() {
        let record = record();
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("scratch".to_string()));

        form.reseed(Some(&record));
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.draft().name, "Billing");

        form.reseed(None);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.draft().name, "");
    }

    #[test]
    fn updates_touch_only_one_field() {
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("Topics".to_string()));
        let before = form.draft().clone();

        form.update(FieldUpdate::CaseSensitive(true));

        let mut expected = before;
        expected.metadata_config.case_sensitive = true;
        assert_eq!(form.draft(), &expected);
    }

    #[test]
    fn blank_names_cannot_be_submitted() {
        let mut form = CategoryForm::create(None);
        assert!(form.submit().is_none());

        form.update(FieldUpdate::Name("   ".to_string()));
        assert!(!form.is_valid());
        assert!(form.submit().is_none());
    }

    #[test]
    fn submit_trims_name_and_description() {
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("  Billing ".to_string()));
        form.update(FieldUpdate::Description("  ".to_string()));

        let Some(FormEvent::Submitted(values)) = form.submit() else {
            panic!("form should be valid");
        };
        assert_eq!(values.name.as_str(), "Billing");
        assert_eq!(values.description, "");
        // the draft is left as typed
        assert_eq!(form.draft().name, "  Billing ");
    }

    #[test]
    fn sub_categories_are_added_and_removed() {
        let mut form = CategoryForm::create(None);
        assert!(!form.add_sub_category("  "));
        assert!(form.add_sub_category(" Invoices "));
        assert!(form.add_sub_category("Refunds"));

        let names: Vec<_> = form.draft().sub_categories.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Invoices", "Refunds"]);

        let id = form.draft().sub_categories[0].id.clone();
        assert!(form.remove_sub_category(&id));
        assert!(!form.remove_sub_category(&id));
        assert_eq!(form.draft().sub_categories.len(), 1);
        assert_eq!(form.draft().sub_categories[0].name, "Refunds");
    }

    #[test]
    fn rule_inputs_survive_rejection_but_not_reseed() {
        let mut form = CategoryForm::create(None);
        form.rule_draft_mut().kind = RuleKind::Replace;
        form.rule_draft_mut().from = "colour".to_string();

        assert_eq!(
            form.add_drafted_rule(),
            Err(IncompleteRule::MissingReplacement)
        );
        assert_eq!(form.rule_draft().from, "colour");

        form.rule_draft_mut().to = "color".to_string();
        form.add_drafted_rule().unwrap();
        assert_eq!(
            form.rule_draft(),
            &RuleDraft {
                kind: RuleKind::Replace,
                ..RuleDraft::default()
            }
        );
        assert_eq!(form.draft().metadata_config.rules.len(), 1);

        form.rule_draft_mut().pattern = "half typed".to_string();
        form.reseed(None);
        assert_eq!(form.rule_draft(), &RuleDraft::default());
    }

    #[test]
    fn incomplete_rules_leave_the_list_unchanged() {
        let mut form = CategoryForm::create(None);

        assert_eq!(
            form.add_rule(&RuleDraft::matching(" ")),
            Err(IncompleteRule::MissingPattern)
        );
        assert_eq!(
            form.add_rule(&RuleDraft::replacing("a", "")),
            Err(IncompleteRule::MissingReplacement)
        );
        assert!(form.draft().metadata_config.rules.is_empty());
    }

    #[test]
    fn removing_a_rule_preserves_order_of_the_rest() {
        let mut form = CategoryForm::create(None);
        for pattern in ["a", "b", "c"] {
            form.add_rule(&RuleDraft::matching(pattern)).unwrap();
        }
        form.add_rule(&RuleDraft::replacing("x", "y")).unwrap();

        let removed = form.remove_rule(1).unwrap();
        assert_eq!(removed, Rule::Match { pattern: "b".to_string() });
        assert!(form.remove_rule(10).is_none());

        let rules = &form.draft().metadata_config.rules;
        let rendered: Vec<_> = rules.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["match: a", "match: c", "replace: x → y"]);
        assert_eq!(rules[2].kind(), RuleKind::Replace);
    }

    #[test]
    fn cancel_keeps_the_draft() {
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("Half done".to_string()));

        assert_eq!(form.cancel(), FormEvent::Cancelled);
        assert_eq!(form.draft().name, "Half done");
    }
}
