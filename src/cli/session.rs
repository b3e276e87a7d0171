use clap::Parser;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm as ConfirmPrompt, Input, Select};
use tagcat::{
    view::terminal::Colorize, CategoryForm, CategoryId, Config, Confirm, DeleteOutcome,
    FieldUpdate, MatchThreshold, Page, PrecisionType, RuleKind, Status, TagGroup,
};
use tracing::{instrument, warn};

/// Command arguments for `tagcat session`.
#[derive(Debug, Default, Parser)]
#[command(about = "Manage tag categories interactively")]
pub struct Session {
    /// Delete without asking for confirmation.
    #[arg(short, long)]
    yes: bool,
}

/// A choice offered by the session menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Name,
    Description,
    Status,
    Precision,
    Group,
    CaseSensitive,
    Threshold,
    AddRule,
    RemoveRule,
    AddSubCategory,
    RemoveSubCategory,
    Submit,
    Cancel,
    ToggleAdd,
    Edit,
    Delete,
    Quit,
}

impl Session {
    #[instrument(level = "debug", skip_all, fields(yes = self.yes))]
    pub fn run(self, mut page: Page, config: &Config) -> anyhow::Result<()> {
        let theme = ColorfulTheme::default();
        let term = Term::stdout();
        let mut confirm = PromptConfirm {
            theme: &theme,
            skip: self.yes || !config.confirm_deletes,
        };
        loop {
            if page.take_scroll_request() {
                term.clear_screen()?;
            }
            println!("{page}\n");

            let entries = menu(&page);
            let labels: Vec<&str> = entries.iter().map(|(label, _)| label.as_str()).collect();
            let selection = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(&labels[..])
                .default(0)
                .interact()?;

            match entries[selection].1 {
                Action::Quit => break,
                Action::ToggleAdd => page.toggle_add(),
                Action::Edit => {
                    let action = pick_card(&theme, &page, "Edit which category?")?
                        .and_then(|index| page.cards().nth(index))
                        .map(|card| card.edit());
                    if let Some(action) = action {
                        page.handle_card(action, &mut confirm);
                    }
                }
                Action::Delete => {
                    let action = pick_card(&theme, &page, "Delete which category?")?
                        .and_then(|index| page.cards().nth(index))
                        .map(|card| card.delete());
                    if let Some(outcome) = action.and_then(|a| page.handle_card(a, &mut confirm)) {
                        report_delete(outcome);
                    }
                }
                Action::Submit => match page.submit_form() {
                    Some(id) => println!("{}", format!("Saved {id}").success()),
                    None if page.is_form_shown() => {
                        println!("{}", "A name is required.".warning());
                    }
                    None => println!("{}", "The category no longer exists.".warning()),
                },
                Action::Cancel => {
                    if let Some(event) = page.form().map(CategoryForm::cancel) {
                        page.handle_form_event(event);
                    }
                }
                field => {
                    if let Some(form) = page.form_mut() {
                        edit_form(&theme, form, field)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// The menu entries for the current state of the page.
///
/// Form entries come first while the form is shown. Edit and delete are
/// only offered when there are cards to act on.
fn menu(page: &Page) -> Vec<(String, Action)> {
    let mut entries = Vec::new();

    if let Some(form) = page.form() {
        let draft = form.draft();
        let threshold = draft
            .metadata_config
            .match_threshold
            .map_or_else(|| "unset".to_string(), |t| t.to_string());
        entries.extend([
            (format!("Name: {}", draft.name), Action::Name),
            ("Description".to_string(), Action::Description),
            (format!("Status: {}", draft.status), Action::Status),
            (format!("Precision: {}", draft.precision_type), Action::Precision),
            (format!("Group: {}", draft.group), Action::Group),
            (
                format!("Case sensitive: {}", draft.metadata_config.case_sensitive),
                Action::CaseSensitive,
            ),
            (format!("Match threshold: {threshold}"), Action::Threshold),
            ("Add rule".to_string(), Action::AddRule),
        ]);
        if !draft.metadata_config.rules.is_empty() {
            entries.push(("Remove rule".to_string(), Action::RemoveRule));
        }
        entries.push(("Add sub-category".to_string(), Action::AddSubCategory));
        if !draft.sub_categories.is_empty() {
            entries.push(("Remove sub-category".to_string(), Action::RemoveSubCategory));
        }
        entries.push((form.submit_label().to_string(), Action::Submit));
        entries.push(("Cancel".to_string(), Action::Cancel));
    }

    entries.push((page.add_button_label().to_string(), Action::ToggleAdd));
    if page.cards().next().is_some() {
        entries.push(("Edit a category".to_string(), Action::Edit));
        entries.push(("Delete a category".to_string(), Action::Delete));
    }
    entries.push(("Quit".to_string(), Action::Quit));
    entries
}

/// Asks for one of the visible cards. `None` means the user backed out.
fn pick_card(theme: &ColorfulTheme, page: &Page, prompt: &str) -> anyhow::Result<Option<usize>> {
    let mut labels: Vec<String> = page.cards().map(|card| card.label()).collect();
    let count = labels.len();
    labels.push("Back".to_string());

    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels[..])
        .default(0)
        .interact()?;
    Ok((selection < count).then_some(selection))
}

fn report_delete(outcome: DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted => println!("{}", "Deleted.".success()),
        DeleteOutcome::Declined => println!("{}", "Kept.".dim()),
        DeleteOutcome::NotFound => println!("{}", "The category no longer exists.".warning()),
    }
}

fn edit_form(theme: &ColorfulTheme, form: &mut CategoryForm, action: Action) -> anyhow::Result<()> {
    let draft = form.draft();
    let update = match action {
        Action::Name => FieldUpdate::Name(text(theme, "Name", &draft.name)?),
        Action::Description => {
            FieldUpdate::Description(text(theme, "Description", &draft.description)?)
        }
        Action::Status => FieldUpdate::Status(choose(theme, "Status", &Status::ALL, draft.status)?),
        Action::Precision => FieldUpdate::PrecisionType(choose(
            theme,
            "Precision",
            &PrecisionType::ALL,
            draft.precision_type,
        )?),
        Action::Group => FieldUpdate::Group(choose(theme, "Group", &TagGroup::ALL, draft.group)?),
        Action::CaseSensitive => FieldUpdate::CaseSensitive(
            ConfirmPrompt::with_theme(theme)
                .with_prompt("Case sensitive?")
                .default(draft.metadata_config.case_sensitive)
                .interact()?,
        ),
        Action::Threshold => FieldUpdate::MatchThreshold(threshold(
            theme,
            draft.metadata_config.match_threshold,
        )?),
        Action::AddRule => {
            add_rule(theme, form)?;
            return Ok(());
        }
        Action::RemoveRule => {
            let labels: Vec<String> = draft
                .metadata_config
                .rules
                .iter()
                .map(ToString::to_string)
                .collect();
            if let Some(index) = pick(theme, "Remove which rule?", labels)? {
                form.remove_rule(index);
            }
            return Ok(());
        }
        Action::AddSubCategory => {
            let name = text(theme, "Sub-category name", "")?;
            if !form.add_sub_category(&name) {
                println!("{}", "A sub-category needs a name.".warning());
            }
            return Ok(());
        }
        Action::RemoveSubCategory => {
            let subs: Vec<(CategoryId, String)> = draft
                .sub_categories
                .iter()
                .map(|sub| (sub.id.clone(), sub.name.clone()))
                .collect();
            let labels = subs.iter().map(|(_, name)| name.clone()).collect();
            if let Some(index) = pick(theme, "Remove which sub-category?", labels)? {
                form.remove_sub_category(&subs[index].0);
            }
            return Ok(());
        }
        _ => return Ok(()),
    };
    form.update(update);
    Ok(())
}

/// Fills in the form's rule adder and appends the rule.
fn add_rule(theme: &ColorfulTheme, form: &mut CategoryForm) -> anyhow::Result<()> {
    let rule_draft = form.rule_draft_mut();
    rule_draft.kind = choose(theme, "Rule kind", &RuleKind::ALL, rule_draft.kind)?;
    match rule_draft.kind {
        RuleKind::Match => rule_draft.pattern = text(theme, "Pattern", &rule_draft.pattern)?,
        RuleKind::Replace => {
            rule_draft.from = text(theme, "Replace", &rule_draft.from)?;
            rule_draft.to = text(theme, "With", &rule_draft.to)?;
        }
    }

    if let Err(e) = form.add_drafted_rule() {
        println!("{}", e.to_string().warning());
    }
    Ok(())
}

fn text(theme: &ColorfulTheme, prompt: &str, initial: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()?)
}

fn choose<T>(theme: &ColorfulTheme, prompt: &str, options: &[T], current: T) -> anyhow::Result<T>
where
    T: Copy + PartialEq + ToString,
{
    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let default = options.iter().position(|o| *o == current).unwrap_or(0);
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels[..])
        .default(default)
        .interact()?;
    Ok(options[selection])
}

/// Picks one of `labels`, with a trailing "Back" entry.
fn pick(theme: &ColorfulTheme, prompt: &str, mut labels: Vec<String>) -> anyhow::Result<Option<usize>> {
    let count = labels.len();
    labels.push("Back".to_string());
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels[..])
        .default(0)
        .interact()?;
    Ok((selection < count).then_some(selection))
}

/// Prompts for a threshold. An empty answer clears it.
fn threshold(
    theme: &ColorfulTheme,
    current: Option<MatchThreshold>,
) -> anyhow::Result<Option<MatchThreshold>> {
    let initial = current.map(|t| t.to_string()).unwrap_or_default();
    let input = Input::<String>::with_theme(theme)
        .with_prompt("Match threshold (0-1, empty to unset)")
        .with_initial_text(initial)
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            parse_threshold(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(parse_threshold(&input)?)
}

fn parse_threshold(input: &str) -> Result<Option<MatchThreshold>, tagcat::domain::ThresholdError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}

/// Asks before a delete, unless confirmations are switched off.
struct PromptConfirm<'a> {
    theme: &'a ColorfulTheme,
    skip: bool,
}

impl Confirm for PromptConfirm<'_> {
    fn confirm(&mut self, message: &str) -> bool {
        if self.skip {
            return true;
        }
        ConfirmPrompt::with_theme(self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!("confirmation failed: {e}");
                false
            })
    }
}

#[cfg(test)]
mod tests {
    use tagcat::{Catalog, SeedSource};

    use super::*;

    fn actions(page: &Page) -> Vec<Action> {
        menu(page).into_iter().map(|(_, action)| action).collect()
    }

    fn seeded() -> Page {
        Page::initialize(&SeedSource::Builtin, &Config::default()).unwrap()
    }

    #[test]
    fn closed_form_offers_page_actions() {
        let page = seeded();

        assert_eq!(
            menu(&page)[0],
            ("Add Category".to_string(), Action::ToggleAdd)
        );
        assert_eq!(
            actions(&page),
            [Action::ToggleAdd, Action::Edit, Action::Delete, Action::Quit]
        );
    }

    #[test]
    fn empty_page_hides_card_actions() {
        let page = Page::new(Catalog::default(), None);
        assert_eq!(actions(&page), [Action::ToggleAdd, Action::Quit]);
    }

    #[test]
    fn open_form_lists_fields_first() {
        let mut page = seeded();
        page.toggle_add();

        let entries = menu(&page);

        assert_eq!(entries[0].1, Action::Name);
        assert!(entries.contains(&("Match threshold: 0.9".to_string(), Action::Threshold)));
        assert!(entries.contains(&("Create Category".to_string(), Action::Submit)));
        assert!(entries.contains(&("Close".to_string(), Action::ToggleAdd)));
        assert!(!entries.iter().any(|(_, a)| *a == Action::RemoveRule));
    }

    #[test]
    fn editing_offers_removals_for_existing_entries() {
        let mut page = seeded();
        let action = page.cards().next().unwrap().edit();
        page.handle_card(action, &mut tagcat::AlwaysConfirm);

        let actions = actions(&page);

        assert!(actions.contains(&Action::RemoveSubCategory));
        assert!(menu(&page).contains(&("Save Changes".to_string(), Action::Submit)));
    }

    #[test]
    fn blank_threshold_input_unsets() {
        assert_eq!(parse_threshold("  ").unwrap(), None);
        assert_eq!(
            parse_threshold("0.25").unwrap(),
            Some(MatchThreshold::new(0.25).unwrap())
        );
        assert!(parse_threshold("2").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn skipped_confirmation_proceeds() {
        let theme = ColorfulTheme::default();
        let mut confirm = PromptConfirm {
            theme: &theme,
            skip: true,
        };
        assert!(confirm.confirm("Delete \"Topics\"?"));
    }
}
