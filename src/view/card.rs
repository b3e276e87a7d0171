use std::fmt;

use crate::{
    domain::{CategoryId, TagCategory},
    view::terminal::{badge, status_badge, Colorize},
};

/// An action triggered from a category card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAction {
    /// Open the form for the record.
    Edit(TagCategory),
    /// Delete the record with this identifier.
    Delete(CategoryId),
}

/// A read-only summary of one category.
///
/// The card holds no state of its own. Its actions are returned to the
/// caller rather than applied.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCard<'a> {
    category: &'a TagCategory,
}

impl<'a> CategoryCard<'a> {
    /// A card for the given record.
    #[must_use]
    pub const fn new(category: &'a TagCategory) -> Self {
        Self { category }
    }

    /// The record this card summarizes.
    #[must_use]
    pub const fn category(&self) -> &'a TagCategory {
        self.category
    }

    /// The edit action, carrying the full record.
    #[must_use]
    pub fn edit(&self) -> CardAction {
        CardAction::Edit(self.category.clone())
    }

    /// The delete action, carrying only the identifier.
    #[must_use]
    pub fn delete(&self) -> CardAction {
        CardAction::Delete(self.category.id().clone())
    }

    /// A one-line label, e.g. for selection menus.
    #[must_use]
    pub fn label(&self) -> String {
        let c = self.category;
        format!(
            "{} ({}, {}, {})",
            c.name(),
            c.status(),
            c.precision_type(),
            c.group()
        )
    }
}

impl fmt::Display for CategoryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.category;
        let meta = c.metadata_config();
        let badges = format!(
            "{} {} {}",
            status_badge(c.status()),
            badge(c.precision_type().as_str()),
            badge(c.group().as_str())
        );

        writeln!(f, "{}  {badges}", c.name().heading())?;

        if !c.description().is_empty() {
            writeln!(f, "{}", c.description())?;
        }

        let case = if meta.case_sensitive { "Yes" } else { "No" };
        writeln!(f, "  {} {case}", "Case sensitive:".dim())?;
        if let Some(threshold) = meta.match_threshold {
            writeln!(f, "  {} {threshold}", "Threshold:     ".dim())?;
        }
        writeln!(f, "  {} {}", "Rules:         ".dim(), meta.rules.len())?;
        writeln!(f, "  {} {}", "Sub-categories:".dim(), c.sub_categories().len())?;
        write!(f, "  {}", format!("id {}", c.id()).dim())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        domain::{CategoryForm, FieldUpdate, FormEvent, MatchThreshold, RuleDraft},
        view::terminal::{set_color_choice, ColorChoice},
    };

    fn record(threshold: Option<f64>, description: &str) -> TagCategory {
        let mut form = CategoryForm::create(None);
        form.update(FieldUpdate::Name("Topics".to_string()));
        form.update(FieldUpdate::Description(description.to_string()));
        form.update(FieldUpdate::MatchThreshold(
            threshold.map(|t| MatchThreshold::new(t).unwrap()),
        ));
        form.add_rule(&RuleDraft::matching("tech*")).unwrap();
        form.add_sub_category("Science");
        form.add_sub_category("Health");
        let Some(FormEvent::Submitted(values)) = form.submit() else {
            panic!("form should be valid");
        };
        TagCategory::with_id("tc-1".into(), values, Utc::now())
    }

    #[test]
    fn renders_summary_fields() {
        set_color_choice(ColorChoice::Never);
        let record = record(Some(0.85), "Subject areas");
        let rendered = CategoryCard::new(&record).to_string();

        assert!(rendered.contains("Topics"));
        assert!(rendered.contains("[active] [exact] [system]"));
        assert!(rendered.contains("Subject areas"));
        assert!(rendered.contains("Case sensitive: No"));
        assert!(rendered.contains("Threshold:      0.85"));
        assert!(rendered.contains("Rules:          1"));
        assert!(rendered.contains("Sub-categories: 2"));
    }

    #[test]
    fn omits_absent_description_and_threshold() {
        set_color_choice(ColorChoice::Never);
        let record = record(None, "");
        let rendered = CategoryCard::new(&record).to_string();

        assert!(!rendered.contains("Threshold"));
        assert_eq!(
            rendered.lines().take(2).collect::<Vec<_>>(),
            ["Topics  [active] [exact] [system]", "  Case sensitive: No"]
        );
    }

    #[test]
    fn actions_carry_record_and_id() {
        let record = record(None, "");
        let card = CategoryCard::new(&record);

        assert_eq!(card.edit(), CardAction::Edit(record.clone()));
        assert_eq!(card.delete(), CardAction::Delete("tc-1".into()));
        assert_eq!(card.label(), "Topics (active, exact, system)");
    }
}
