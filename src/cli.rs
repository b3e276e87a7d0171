use std::path::PathBuf;

mod head;
mod list;
mod session;
mod show;

use anyhow::Context as _;
use clap::ArgAction;
use head::Head;
use list::List;
use session::Session;
use show::Show;
use tagcat::{
    view::terminal::{self, ColorChoice},
    Config, Page, SeedSource, TagCategory,
};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = "tagcat.toml", global = true)]
    config: PathBuf,

    /// Seed file to start from (JSON, or YAML by extension)
    ///
    /// Overrides the seed named in the configuration file. Without either,
    /// the built-in sample data is used.
    #[arg(short, long, global = true)]
    seed: Option<PathBuf>,

    /// When to colour output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        terminal::set_color_choice(self.color);

        let config = Config::load_or_default(&self.config)?;
        let seed = SeedSource::from_path(self.seed.or_else(|| config.seed.clone()));
        let context = Context { config, seed };

        self.command
            .unwrap_or_else(|| Command::Session(Session::default()))
            .run(&context)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    config: Config,
    seed: SeedSource,
}

impl Context {
    /// Builds a fresh page from the seed.
    #[instrument(level = "debug", skip(self))]
    fn page(&self) -> anyhow::Result<Page> {
        Page::initialize(&self.seed, &self.config).context("failed to load seed data")
    }

    /// Every seed record, including those marked as deleted.
    fn records(&self) -> anyhow::Result<Vec<TagCategory>> {
        self.seed.load().context("failed to load seed data")
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Manage categories interactively (default)
    ///
    /// Changes last for the session only.
    Session(Session),

    /// List categories
    List(List),

    /// Show a single category
    Show(Show),

    /// Print the page metadata
    Head(Head),
}

impl Command {
    fn run(self, context: &Context) -> anyhow::Result<()> {
        match self {
            Self::Session(command) => command.run(context.page()?, &context.config)?,
            Self::List(command) => command.run(context)?,
            Self::Show(command) => command.run(context)?,
            Self::Head(command) => command.run()?,
        }
        Ok(())
    }
}
