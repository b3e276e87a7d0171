use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use regex::Regex;
use tagcat::{view::terminal::Colorize, CategoryCard, Status, TagCategory, TagGroup};

use crate::cli::Context;
use tracing::instrument;

/// Command arguments for `tagcat list`.
#[derive(Debug, Parser)]
#[command(about = "List tag categories with optional filters")]
pub struct List {
    /// Output format (default: pretty).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Filter by group (comma-separated, case-insensitive).
    #[arg(long, value_delimiter = ',', value_name = "GROUP")]
    group: Vec<TagGroup>,

    /// Filter by status.
    #[arg(long)]
    status: Option<Status>,

    /// Regular expression match against the name.
    #[arg(long)]
    regex: Option<String>,

    /// Include records marked as deleted in the seed.
    #[arg(long)]
    include_deleted: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug)]
struct Filters {
    groups: Vec<TagGroup>,
    status: Option<Status>,
    regex: Option<Regex>,
    include_deleted: bool,
}

impl Filters {
    fn from_args(cmd: &List) -> anyhow::Result<Self> {
        let regex = cmd
            .regex
            .as_deref()
            .map(|pattern| Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}")))
            .transpose()?;
        Ok(Self {
            groups: cmd.group.clone(),
            status: cmd.status,
            regex,
            include_deleted: cmd.include_deleted,
        })
    }

    fn is_empty(&self) -> bool {
        self.groups.is_empty()
            && self.status.is_none()
            && self.regex.is_none()
            && !self.include_deleted
    }

    fn matches(&self, category: &TagCategory) -> bool {
        (self.include_deleted || !category.is_deleted())
            && (self.groups.is_empty() || self.groups.contains(&category.group()))
            && self.status.is_none_or(|status| status == category.status())
            && self
                .regex
                .as_ref()
                .is_none_or(|regex| regex.is_match(category.name()))
    }
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let filters = Filters::from_args(&self)?;

        if self.output == OutputFormat::Pretty && filters.is_empty() {
            println!("{}", context.page()?);
            return Ok(());
        }

        let records = context.records()?;
        let selected = select(&records, &filters);
        tracing::debug!(count = selected.len(), "filtered categories");

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&selected)?);
            }
            OutputFormat::Pretty => {
                if selected.is_empty() {
                    println!("{}", "No matching categories.".dim());
                }
                for category in selected {
                    println!("{}", CategoryCard::new(category));
                    if category.is_deleted() {
                        println!("  {}", "deleted".warning());
                    }
                    println!();
                }
            }
        }
        Ok(())
    }
}

/// Records passing the filters, in seed order.
fn select<'a>(records: &'a [TagCategory], filters: &Filters) -> Vec<&'a TagCategory> {
    records
        .iter()
        .filter(|category| filters.matches(category))
        .collect()
}
