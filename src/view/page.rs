//! The page container.
//!
//! A [`Page`] owns the [`Catalog`] together with the form state: whether the
//! form is shown and which record, if any, it edits. Cards and forms never
//! touch the catalog themselves. They hand actions and events to the page,
//! which applies them.

use std::fmt;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::{
    domain::{
        Catalog, CategoryForm, CategoryId, Config, Confirm, DeleteOutcome, FormEvent,
        MatchThreshold, TagCategory,
    },
    storage::{SeedError, SeedSource},
    view::{
        card::{CardAction, CategoryCard},
        form::FormView,
        terminal::{separator, Colorize},
    },
};

const TITLE: &str = "Tag Category Management";
const EMPTY_PLACEHOLDER: &str =
    "No categories yet. Click “Add Category” to create your first one.";
const LEGEND: &str = "Status, precision, and group control how tags behave in your system. \
                      Use metadata rules for matching or replacing patterns.";

/// The canonical list plus the state of the create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    catalog: Catalog,
    form: Option<CategoryForm>,
    editing: Option<CategoryId>,
    default_threshold: Option<MatchThreshold>,
    scroll_to_top: bool,
}

impl Page {
    /// A page over an existing catalog, with the form closed.
    #[must_use]
    pub const fn new(catalog: Catalog, default_threshold: Option<MatchThreshold>) -> Self {
        Self {
            catalog,
            form: None,
            editing: None,
            default_threshold,
            scroll_to_top: false,
        }
    }

    /// Loads the seed and builds the page.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded.
    #[instrument(level = "debug", skip(config))]
    pub fn initialize(seed: &SeedSource, config: &Config) -> Result<Self, SeedError> {
        let catalog = Catalog::from_seed(seed.load()?);
        Ok(Self::new(catalog, config.default_match_threshold()))
    }

    /// The canonical list.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cards for every visible record, in stored order.
    pub fn cards(&self) -> impl Iterator<Item = CategoryCard<'_>> + '_ {
        self.catalog.visible().map(CategoryCard::new)
    }

    /// Whether the form is shown.
    #[must_use]
    pub const fn is_form_shown(&self) -> bool {
        self.form.is_some()
    }

    /// The record being edited, if the form is in edit mode.
    #[must_use]
    pub const fn editing(&self) -> Option<&CategoryId> {
        self.editing.as_ref()
    }

    /// The mounted form, if shown.
    #[must_use]
    pub const fn form(&self) -> Option<&CategoryForm> {
        self.form.as_ref()
    }

    /// The mounted form, for draft updates.
    pub const fn form_mut(&mut self) -> Option<&mut CategoryForm> {
        self.form.as_mut()
    }

    /// The label of the add button.
    #[must_use]
    pub const fn add_button_label(&self) -> &'static str {
        if self.form.is_some() && self.editing.is_none() {
            "Close"
        } else {
            "Add Category"
        }
    }

    /// Presses the add button.
    ///
    /// Always clears the editing target. Opens an empty create form when the
    /// form is closed and closes it when it is open.
    pub fn toggle_add(&mut self) {
        self.editing = None;
        self.form = match self.form {
            Some(_) => None,
            None => Some(CategoryForm::create(self.default_threshold)),
        };
        debug!(shown = self.form.is_some(), "toggled form");
    }

    /// Opens the form in edit mode for `record`.
    ///
    /// Also requests that the view scroll back to the top, where the form is.
    pub fn select_for_edit(&mut self, record: &TagCategory) {
        self.editing = Some(record.id().clone());
        self.form = Some(CategoryForm::edit(record, self.default_threshold));
        self.scroll_to_top = true;
    }

    /// Takes a pending scroll-to-top request.
    pub const fn take_scroll_request(&mut self) -> bool {
        std::mem::replace(&mut self.scroll_to_top, false)
    }

    /// Closes the form and clears the editing target.
    pub fn cancel_form(&mut self) {
        self.form = None;
        self.editing = None;
    }

    /// Submits the mounted form.
    ///
    /// An invalid draft changes nothing and leaves the form open. A valid one
    /// is handed to [`Page::handle_form_event`].
    pub fn submit_form(&mut self) -> Option<CategoryId> {
        let event = self.form.as_ref()?.submit()?;
        self.handle_form_event(event)
    }

    /// Applies an event emitted by the form.
    ///
    /// A submission creates a record, or edits one when the form was opened
    /// for editing. Either way the form closes. Returns the identifier of the
    /// record written, if any.
    #[instrument(level = "debug", skip_all)]
    pub fn handle_form_event(&mut self, event: FormEvent) -> Option<CategoryId> {
        let FormEvent::Submitted(values) = event else {
            self.cancel_form();
            return None;
        };

        let written = match self.editing.take() {
            Some(id) => self.catalog.edit(&id, values).then_some(id),
            None => Some(self.catalog.create(values)),
        };
        self.form = None;
        written
    }

    /// Soft deletes a record after confirmation.
    pub fn delete(&mut self, id: &CategoryId, confirm: &mut impl Confirm) -> DeleteOutcome {
        self.catalog.soft_delete(id, confirm)
    }

    /// Applies an action emitted by a card.
    ///
    /// Returns the outcome when the action was a delete.
    pub fn handle_card(
        &mut self,
        action: CardAction,
        confirm: &mut impl Confirm,
    ) -> Option<DeleteOutcome> {
        match action {
            CardAction::Edit(record) => {
                self.select_for_edit(&record);
                None
            }
            CardAction::Delete(id) => Some(self.delete(&id, confirm)),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = separator();
        writeln!(f, "{}  [{}]", TITLE.heading(), self.add_button_label())?;
        writeln!(f, "{rule}")?;

        if let Some(form) = &self.form {
            writeln!(f, "{}", FormView(form))?;
            writeln!(f, "{rule}")?;
        }

        let mut cards = self.cards().peekable();
        if cards.peek().is_none() {
            writeln!(f, "{}", EMPTY_PLACEHOLDER.dim())?;
        }
        for card in cards {
            writeln!(f, "{card}")?;
            writeln!(f)?;
        }

        writeln!(f, "{rule}")?;
        write!(f, "{}", LEGEND.dim())
    }
}

/// Document metadata for the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageHead {
    canonical: Option<String>,
}

impl PageHead {
    /// The document title.
    pub const TITLE: &'static str = "Tag Category Management | Admin";

    /// The meta description.
    pub const DESCRIPTION: &'static str = "Manage tag categories: create, edit, and soft delete \
                                           with nested metadata and sub-categories.";

    /// Adds a canonical URL.
    #[must_use]
    pub fn with_canonical(mut self, url: impl Into<String>) -> Self {
        self.canonical = Some(url.into());
        self
    }

    /// The schema.org description of the page.
    #[must_use]
    pub fn structured_data(&self) -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
            "name": TITLE,
            "description": "CRUD for tag categories with metadata and sub-categories",
        })
    }

    /// The metadata as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "title": Self::TITLE,
            "description": Self::DESCRIPTION,
            "structuredData": self.structured_data(),
        });
        if let Some(url) = &self.canonical {
            value["canonical"] = json!(url);
        }
        value
    }

    /// The metadata as an HTML `<head>` fragment.
    #[must_use]
    pub fn to_html(&self) -> String {
        let canonical = self.canonical.as_deref().map_or_else(String::new, |url| {
            format!("<link rel=\"canonical\" href=\"{}\" />\n", escape(url))
        });
        // `</` cannot close the script element once escaped
        let structured_data = self.structured_data().to_string().replace("</", "<\\/");
        format!(
            "<title>{}</title>\n<meta name=\"description\" content=\"{}\" />\n{canonical}\
             <script type=\"application/ld+json\">{structured_data}</script>",
            escape(Self::TITLE),
            escape(Self::DESCRIPTION)
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
