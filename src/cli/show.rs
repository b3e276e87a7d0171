use std::fmt;

use anyhow::bail;
use clap::Parser;
use tagcat::{view::terminal::Colorize, CategoryCard, CategoryId, TagCategory};
use tracing::instrument;

use crate::cli::{list::OutputFormat, Context};

/// Command arguments for `tagcat show`.
#[derive(Debug, Parser)]
#[command(about = "Show a single tag category")]
pub struct Show {
    /// The category identifier.
    id: CategoryId,

    /// Output format (default: pretty).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Show {
    #[instrument(level = "debug", skip(context))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let records = context.records()?;
        let Some(category) = find(&records, &self.id) else {
            bail!("no category with id {}", self.id);
        };

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(category)?),
            OutputFormat::Pretty => print!("{}", Details(category)),
        }
        Ok(())
    }
}

/// Looks up a record, including one marked as deleted.
fn find<'a>(records: &'a [TagCategory], id: &CategoryId) -> Option<&'a TagCategory> {
    records.iter().find(|category| category.id() == id)
}

/// A card followed by timestamps, rules and sub-categories.
struct Details<'a>(&'a TagCategory);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = self.0;
        writeln!(f, "{}", CategoryCard::new(category))?;
        if category.is_deleted() {
            writeln!(f, "  {}", "deleted".warning())?;
        }
        writeln!(f, "  {} {}", "Created:".dim(), category.created_at())?;
        writeln!(f, "  {} {}", "Updated:".dim(), category.last_updated_at())?;

        let rules = &category.metadata_config().rules;
        if !rules.is_empty() {
            writeln!(f, "{}", "Rules".heading())?;
            for (index, rule) in rules.iter().enumerate() {
                writeln!(f, "  {}. {rule}", index + 1)?;
            }
        }

        if !category.sub_categories().is_empty() {
            writeln!(f, "{}", "Sub-categories".heading())?;
            for sub in category.sub_categories() {
                writeln!(f, "  • {} {}", sub.name, format!("({})", sub.id).dim())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tagcat::{
        view::terminal::{set_color_choice, ColorChoice},
        SeedSource,
    };

    use super::*;

    #[test]
    fn deleted_records_are_still_shown() {
        set_color_choice(ColorChoice::Never);
        let records = SeedSource::Builtin.load().unwrap();
        let category = find(&records, &"tc-1004".into()).unwrap();

        let rendered = Details(category).to_string();

        assert!(rendered.starts_with("Legacy Labels"));
        assert!(rendered.contains("  deleted\n"));
    }

    #[test]
    fn lists_rules_and_sub_categories() {
        set_color_choice(ColorChoice::Never);
        let records = SeedSource::Builtin.load().unwrap();
        let category = find(&records, &"tc-1001".into()).unwrap();

        let rendered = Details(category).to_string();

        assert!(rendered.contains("Sub-categories\n  • Technology (sc-2001)\n"));
        assert!(!rendered.contains("deleted"));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let records = SeedSource::Builtin.load().unwrap();
        assert!(find(&records, &"tc-missing".into()).is_none());
    }
}
