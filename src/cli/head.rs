use clap::{Parser, ValueEnum};
use tagcat::PageHead;
use tracing::instrument;

/// Command arguments for `tagcat head`.
#[derive(Debug, Parser)]
#[command(about = "Print the page title, description and structured data")]
pub struct Head {
    /// Output format (default: json).
    #[arg(long, value_enum, default_value_t)]
    output: HeadFormat,

    /// Canonical URL to include.
    #[arg(long, value_name = "URL")]
    canonical: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum HeadFormat {
    #[default]
    Json,
    Html,
}

impl Head {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        let head = self
            .canonical
            .map_or_else(PageHead::default, |url| PageHead::default().with_canonical(url));

        match self.output {
            HeadFormat::Json => println!("{}", serde_json::to_string_pretty(&head.to_json())?),
            HeadFormat::Html => println!("{}", head.to_html()),
        }
        Ok(())
    }
}
